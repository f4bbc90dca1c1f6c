use serde::Serialize;

use crate::api::models::{ActiveConversation, Contact, ContactId, ContactWithChat};

/// Where the current contact lists came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Remote,
    Fallback,
}

/// Session-scoped chat state. Lives for one signed-in session and is only
/// written by `SyncEngine`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatStore {
    pub(crate) chats_contacts: Vec<ContactWithChat>,
    pub(crate) contacts: Vec<Contact>,
    pub(crate) profile_user: Option<Contact>,
    pub(crate) active_chat: Option<ActiveConversation>,
    pub(crate) source: Option<DataSource>,
}

impl ChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chats_contacts(&self) -> &[ContactWithChat] {
        &self.chats_contacts
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn profile_user(&self) -> Option<&Contact> {
        self.profile_user.as_ref()
    }

    pub fn active_chat(&self) -> Option<&ActiveConversation> {
        self.active_chat.as_ref()
    }

    /// `None` until the first list refresh.
    pub fn source(&self) -> Option<DataSource> {
        self.source
    }

    pub fn contact_with_chat(&self, contact_id: ContactId) -> Option<&ContactWithChat> {
        self.chats_contacts.iter().find(|c| c.contact.id == contact_id)
    }

    pub(crate) fn contact_with_chat_mut(
        &mut self,
        contact_id: ContactId,
    ) -> Option<&mut ContactWithChat> {
        self.chats_contacts
            .iter_mut()
            .find(|c| c.contact.id == contact_id)
    }

    pub fn unseen_total(&self) -> u64 {
        self.chats_contacts
            .iter()
            .map(|c| u64::from(c.chat.unseen_msgs))
            .sum()
    }

    /// Installs both lists and the profile in one step.
    pub(crate) fn replace_lists(
        &mut self,
        source: DataSource,
        chats_contacts: Vec<ContactWithChat>,
        contacts: Vec<Contact>,
        profile_user: Option<Contact>,
    ) {
        self.chats_contacts = chats_contacts;
        self.contacts = contacts;
        self.profile_user = profile_user;
        self.source = Some(source);
    }
}
