//! Built-in seed data used when the gateway cannot be reached or has
//! nothing to offer. Records here are never handed out by reference to
//! session state; callers get owned copies.

use once_cell::sync::Lazy;

use crate::api::models::{
    ChatSummary, Contact, ContactWithChat, Conversation, Message, MessageFeedback, Status,
};
use crate::utils::contains_lowered;

#[derive(Debug, Clone)]
pub struct FallbackDataset {
    pub profile_user: Contact,
    pub contacts: Vec<Contact>,
    /// In insertion order; the newest conversation is last.
    pub chats: Vec<Conversation>,
}

static DATASET: Lazy<FallbackDataset> = Lazy::new(seed);

fn contact(id: u64, full_name: &str, role: &str, about: &str, status: Status) -> Contact {
    Contact {
        id,
        full_name: full_name.to_string(),
        role: role.to_string(),
        about: about.to_string(),
        avatar: Some(format!("/images/avatars/avatar-{}.png", id)),
        status,
    }
}

fn msg(text: &str, time: &str, sender_id: u64) -> Message {
    Message {
        message: text.to_string(),
        time: Some(time.to_string()),
        sender_id,
        feedback: Some(MessageFeedback {
            is_sent: true,
            is_delivered: true,
            is_seen: true,
        }),
    }
}

fn seed() -> FallbackDataset {
    const ME: u64 = 11;
    let profile_user = contact(ME, "John Doe", "admin", "Dessert chocolate cake lemon drops jujubes.", Status::Online);

    let contacts = vec![
        contact(1, "Gavin Griffith", "Frontend Developer", "Cake pie jelly jelly beans.", Status::Offline),
        contact(2, "Harriet McBride", "UI/UX Designer", "Toffee caramels jelly-o tart gummi bears.", Status::Busy),
        contact(3, "Jason Miller", "Town planner", "Soufflé soufflé caramels sweet roll.", Status::Busy),
        contact(4, "Brian Lambert", "Data scientist", "Chupa chups candy canes chocolate bar.", Status::Online),
        contact(5, "Felecia Rower", "Dietitian", "Jelly-o icing gummi bears macaroon.", Status::Away),
        contact(6, "Adalberto Granzin", "Marketing manager", "Biscuit powder oat cake donut brownie.", Status::Offline),
        contact(7, "Natasha Cassidy", "Project manager", "Lemon drops wafer pudding sugar plum.", Status::Online),
        contact(8, "Marcus Bass", "Web designer", "Pie tart candy cotton candy.", Status::Away),
    ];

    let chats = vec![
        Conversation {
            id: 1,
            user_id: 2,
            unseen_msgs: 0,
            messages: vec![
                msg("Hi", "2024-05-18T09:00:00Z", ME),
                msg("Hello. How can I help you?", "2024-05-18T09:01:00Z", 2),
                msg("Can I get details of my last transaction I made last month?", "2024-05-18T09:02:00Z", ME),
                msg("We need to check if we can provide you such information.", "2024-05-18T09:05:00Z", 2),
                msg("I will inform you as I get update on this.", "2024-05-18T09:06:00Z", 2),
                msg("If it takes long you can mail me at my mail address.", "2024-05-18T09:10:00Z", ME),
            ],
        },
        Conversation {
            id: 2,
            user_id: 3,
            unseen_msgs: 1,
            messages: vec![
                msg("How can we help? We're here for you!", "2024-05-19T14:00:00Z", ME),
                msg("Hey John, I am looking for the best admin template.", "2024-05-19T14:02:00Z", 3),
                msg("It should use nice framework and be easily customizable.", "2024-05-19T14:03:00Z", 3),
                msg("Absolutely!", "2024-05-19T14:10:00Z", ME),
                msg("Looks clean and fresh UI.", "2024-05-19T14:12:00Z", 3),
            ],
        },
        Conversation {
            id: 3,
            user_id: 7,
            unseen_msgs: 2,
            messages: vec![
                msg("Are we still on for Friday?", "2024-05-20T08:30:00Z", 7),
                msg("Yes, see you then.", "2024-05-20T08:45:00Z", ME),
                msg("Great, I'll bring the roadmap.", "2024-05-20T08:46:00Z", 7),
            ],
        },
    ];

    FallbackDataset {
        profile_user,
        contacts,
        chats,
    }
}

impl FallbackDataset {
    pub fn get() -> &'static FallbackDataset {
        &DATASET
    }

    pub fn find_contact(&self, id: u64) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.id == id)
    }

    /// Conversation summaries, newest conversation first, as owned records.
    pub fn contacts_with_chats(&self) -> Vec<ContactWithChat> {
        self.chats
            .iter()
            .rev()
            .filter_map(|chat| match self.find_contact(chat.user_id) {
                Some(owner) => Some(ContactWithChat {
                    contact: owner.clone(),
                    chat: ChatSummary::from(chat),
                }),
                None => {
                    log::warn!("fallback chat {} has no contact {}", chat.id, chat.user_id);
                    None
                }
            })
            .collect()
    }

    /// Owned copies of the contact and conversation lists whose names
    /// contain `query`, ignoring case.
    pub fn filtered(&self, query: &str) -> (Vec<ContactWithChat>, Vec<Contact>) {
        let q = query.to_lowercase();
        let chats = self
            .contacts_with_chats()
            .into_iter()
            .filter(|c| contains_lowered(&c.contact.full_name, &q))
            .collect();
        let contacts = self
            .contacts
            .iter()
            .filter(|c| contains_lowered(&c.full_name, &q))
            .cloned()
            .collect();
        (chats, contacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_chat_has_an_owner() {
        let ds = FallbackDataset::get();
        for chat in &ds.chats {
            assert!(ds.find_contact(chat.user_id).is_some(), "chat {}", chat.id);
        }
    }

    #[test]
    fn summaries_are_newest_first_with_last_message() {
        let ds = FallbackDataset::get();
        let list = ds.contacts_with_chats();
        let ids: Vec<_> = list.iter().map(|c| c.chat.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(
            list[1].chat.last_message.as_ref().unwrap().message,
            "Looks clean and fresh UI."
        );
    }

    #[test]
    fn filter_matches_case_insensitively() {
        let ds = FallbackDataset::get();
        let (chats, contacts) = ds.filtered("AS");
        let names: Vec<_> = contacts.iter().map(|c| c.full_name.as_str()).collect();
        assert_eq!(names, vec!["Jason Miller", "Natasha Cassidy", "Marcus Bass"]);
        let chat_names: Vec<_> = chats.iter().map(|c| c.contact.full_name.as_str()).collect();
        assert_eq!(chat_names, vec!["Natasha Cassidy", "Jason Miller"]);
    }

    #[test]
    fn empty_query_keeps_everything() {
        let ds = FallbackDataset::get();
        let (chats, contacts) = ds.filtered("");
        assert_eq!(chats.len(), ds.chats.len());
        assert_eq!(contacts.len(), ds.contacts.len());
    }

    #[test]
    fn chats_without_owner_are_skipped() {
        let ds = FallbackDataset::get();
        let mut custom = ds.clone();
        let orphan = Conversation {
            id: 99,
            user_id: 4242,
            unseen_msgs: 5,
            messages: vec![msg("anyone there?", "2024-05-21T10:00:00Z", 4242)],
        };
        custom.chats.insert(1, orphan);

        let ids: Vec<_> = custom.contacts_with_chats().iter().map(|c| c.chat.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        let (chats, _) = custom.filtered("");
        assert!(chats.iter().all(|c| c.chat.id != 99));
    }

    #[test]
    fn mutating_copies_leaves_dataset_intact() {
        let ds = FallbackDataset::get();
        let (mut chats, _) = ds.filtered("");
        chats[0].contact.full_name.push_str(" (edited)");
        chats[0].chat.last_message = None;
        let fresh = ds.contacts_with_chats();
        assert_eq!(fresh[0].contact.full_name, "Natasha Cassidy");
        assert!(fresh[0].chat.last_message.is_some());
    }
}
