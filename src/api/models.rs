use serde::{Deserialize, Serialize};

pub type ContactId = u64;
pub type ConversationId = u64;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Online,
    #[default]
    Offline,
    Busy,
    Away,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: ContactId,
    pub full_name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub status: Status,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MessageFeedback {
    pub is_sent: bool,
    pub is_delivered: bool,
    pub is_seen: bool,
}

/// A single chat message. Ordering within a conversation is positional;
/// `time` is informational only.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub message: String,
    #[serde(default)]
    pub time: Option<String>,
    pub sender_id: ContactId,
    #[serde(default)]
    pub feedback: Option<MessageFeedback>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: ConversationId,
    pub user_id: ContactId,
    #[serde(default)]
    pub unseen_msgs: u32,
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Conversation {
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

/// Conversation summary embedded in a sidebar entry.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatSummary {
    pub id: ConversationId,
    #[serde(default)]
    pub unseen_msgs: u32,
    #[serde(default)]
    pub last_message: Option<Message>,
}

impl From<&Conversation> for ChatSummary {
    fn from(chat: &Conversation) -> Self {
        Self {
            id: chat.id,
            unseen_msgs: chat.unseen_msgs,
            last_message: chat.last_message().cloned(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ContactWithChat {
    #[serde(flatten)]
    pub contact: Contact,
    pub chat: ChatSummary,
}

/// The conversation currently open. `chat` stays `None` until the first
/// message exchange creates it on the gateway.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ActiveConversation {
    pub contact: Contact,
    #[serde(default)]
    pub chat: Option<Conversation>,
}

/// Body of `GET /apps/chat/chats-and-contacts`. Every field may be missing.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChatsAndContacts {
    #[serde(default, alias = "contactsWithConversation")]
    pub chats_contacts: Option<Vec<ContactWithChat>>,
    #[serde(default)]
    pub contacts: Option<Vec<Contact>>,
    #[serde(default)]
    pub profile_user: Option<Contact>,
}

impl ChatsAndContacts {
    /// Both lists empty or missing: the gateway had nothing usable.
    pub fn is_empty(&self) -> bool {
        let chats_empty = self.chats_contacts.as_ref().is_none_or(|c| c.is_empty());
        let contacts_empty = self.contacts.as_ref().is_none_or(|c| c.is_empty());
        chats_empty && contacts_empty
    }
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageBody<'a> {
    pub message: &'a str,
    pub sender_id: ContactId,
}

/// Raw body of `POST /apps/chat/chats/{id}`; see `SendOutcome` for the
/// decoded form.
#[derive(Debug, Deserialize, Clone)]
pub struct SendMessageResponse {
    pub msg: Message,
    #[serde(default)]
    pub chat: Option<Conversation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_with_chat_is_flat_on_the_wire() {
        let raw = r#"{
            "id": 3,
            "fullName": "Jason Miller",
            "role": "Designer",
            "about": "hi",
            "status": "busy",
            "chat": { "id": 7, "unseenMsgs": 2, "lastMessage": { "message": "yo", "senderId": 3 } }
        }"#;
        let entry: ContactWithChat = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.contact.full_name, "Jason Miller");
        assert_eq!(entry.contact.status, Status::Busy);
        assert_eq!(entry.chat.id, 7);
        assert_eq!(entry.chat.last_message.unwrap().message, "yo");
    }

    #[test]
    fn empty_payload_is_detected() {
        let body: ChatsAndContacts = serde_json::from_str("{}").unwrap();
        assert!(body.is_empty());

        let body: ChatsAndContacts =
            serde_json::from_str(r#"{"contactsWithConversation": [], "contacts": []}"#).unwrap();
        assert!(body.is_empty());

        let body: ChatsAndContacts = serde_json::from_str(
            r#"{"chatsContacts": [], "contacts": [{"id": 1, "fullName": "A"}]}"#,
        )
        .unwrap();
        assert!(!body.is_empty());
    }

    #[test]
    fn send_response_without_chat_decodes() {
        let resp: SendMessageResponse =
            serde_json::from_str(r#"{"msg": {"message": "Hi", "senderId": 11}}"#).unwrap();
        assert!(resp.chat.is_none());
        assert_eq!(resp.msg.sender_id, 11);
    }
}
