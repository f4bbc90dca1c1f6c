//! Keeps a `ChatStore` in line with the chat gateway.
//!
//! Every operation takes `&mut self`, so a load and a send for the same
//! session can never interleave. Share an engine between tasks through
//! [`SharedEngine`].

use std::sync::Arc;

use thiserror::Error;

use crate::api::gateway::{ChatGateway, GatewayError, SendOutcome};
use crate::api::models::{ChatSummary, ContactId, ContactWithChat, Conversation, Message};
use crate::fallback::FallbackDataset;
use crate::storage::{ChatStore, DataSource};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("no conversation is open")]
    NoActiveConversation,
    #[error("no profile user; refresh contacts first")]
    NoProfileUser,
    #[error("chat state invariant violated: {0}")]
    InvariantViolation(String),
}

pub type SyncResult<T> = Result<T, SyncError>;

pub type SharedEngine<G> = Arc<tokio::sync::Mutex<SyncEngine<G>>>;

pub struct SyncEngine<G> {
    gateway: G,
    store: ChatStore,
}

impl<G: ChatGateway> SyncEngine<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            store: ChatStore::new(),
        }
    }

    pub fn shared(gateway: G) -> SharedEngine<G> {
        Arc::new(tokio::sync::Mutex::new(Self::new(gateway)))
    }

    pub fn store(&self) -> &ChatStore {
        &self.store
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Drops all session state (logout or profile switch).
    pub fn reset_session(&mut self) -> ChatStore {
        log::info!("chat session reset");
        std::mem::take(&mut self.store)
    }

    pub fn into_store(self) -> ChatStore {
        self.store
    }

    /// Refreshes the contact and conversation lists. Never fails: when the
    /// gateway errors or has no data the built-in dataset is used instead.
    pub async fn fetch_contacts_and_conversations(&mut self, query: &str) -> DataSource {
        match self.gateway.chats_and_contacts(query).await {
            Ok(body) if !body.is_empty() => {
                let chats = body.chats_contacts.unwrap_or_default();
                let contacts = body.contacts.unwrap_or_default();
                log::info!(
                    "loaded {} chats and {} contacts from gateway",
                    chats.len(),
                    contacts.len()
                );
                self.store
                    .replace_lists(DataSource::Remote, chats, contacts, body.profile_user);
                DataSource::Remote
            }
            Ok(_) => {
                log::warn!("gateway returned no contacts for {:?}; using fallback data", query);
                self.install_fallback(query)
            }
            Err(e) => {
                log::warn!("contact fetch failed ({}); using fallback data", e);
                self.install_fallback(query)
            }
        }
    }

    fn install_fallback(&mut self, query: &str) -> DataSource {
        let dataset = FallbackDataset::get();
        let (chats, contacts) = dataset.filtered(query);
        self.store.replace_lists(
            DataSource::Fallback,
            chats,
            contacts,
            Some(dataset.profile_user.clone()),
        );
        DataSource::Fallback
    }

    /// Opens the conversation with `contact_id`, replacing whatever was open.
    pub async fn load_conversation(&mut self, contact_id: ContactId) -> SyncResult<()> {
        let active = self.gateway.conversation(contact_id).await?;
        log::debug!(
            "opened conversation with {} ({} messages)",
            active.contact.id,
            active.chat.as_ref().map_or(0, |c| c.messages.len())
        );
        self.store.active_chat = Some(active);
        Ok(())
    }

    /// Sends `text` to the open conversation and records the result.
    ///
    /// Nothing is written to the store until the gateway has accepted the
    /// message.
    pub async fn send_message(&mut self, text: &str) -> SyncResult<Message> {
        let contact_id = self
            .store
            .active_chat
            .as_ref()
            .map(|a| a.contact.id)
            .ok_or(SyncError::NoActiveConversation)?;
        let sender_id = self
            .store
            .profile_user
            .as_ref()
            .map(|p| p.id)
            .ok_or(SyncError::NoProfileUser)?;

        let outcome = self
            .gateway
            .send_message(contact_id, text, sender_id)
            .await?;
        self.apply_sent(outcome)
    }

    fn apply_sent(&mut self, outcome: SendOutcome) -> SyncResult<Message> {
        let store = &mut self.store;
        let active = store
            .active_chat
            .as_mut()
            .ok_or(SyncError::NoActiveConversation)?;
        let contact_id = active.contact.id;

        match outcome {
            SendOutcome::CreatedNew(msg, created) => {
                let summary = ChatSummary {
                    id: created.id,
                    unseen_msgs: 0,
                    last_message: None,
                };
                active.chat = Some(Conversation {
                    id: created.id,
                    user_id: contact_id,
                    unseen_msgs: 0,
                    messages: vec![msg.clone()],
                });
                let contact = active.contact.clone();
                match store.contact_with_chat_mut(contact_id) {
                    Some(entry) => {
                        log::warn!(
                            "gateway created chat {} for contact {} which already had chat {}",
                            created.id,
                            contact_id,
                            entry.chat.id
                        );
                        entry.contact = contact;
                        entry.chat = summary;
                    }
                    None => store.chats_contacts.push(ContactWithChat {
                        contact,
                        chat: summary,
                    }),
                }
                log::info!("started chat {} with contact {}", created.id, contact_id);
                Self::set_last_message(store, contact_id, &msg)?;
                Ok(msg)
            }
            SendOutcome::AppendedExisting(msg) => {
                if store.contact_with_chat(contact_id).is_none() {
                    return Err(Self::violation(format!(
                        "sent message to contact {} has no chat list entry",
                        contact_id
                    )));
                }
                let Some(active) = store.active_chat.as_mut() else {
                    return Err(SyncError::NoActiveConversation);
                };
                let Some(chat) = active.chat.as_mut() else {
                    return Err(Self::violation(format!(
                        "gateway appended to a chat with contact {} that is not loaded",
                        contact_id
                    )));
                };
                chat.messages.push(msg.clone());
                Self::set_last_message(store, contact_id, &msg)?;
                Ok(msg)
            }
        }
    }

    fn set_last_message(store: &mut ChatStore, contact_id: ContactId, msg: &Message) -> SyncResult<()> {
        let entry = store.contact_with_chat_mut(contact_id).ok_or_else(|| {
            Self::violation(format!("no chat list entry for contact {}", contact_id))
        })?;
        entry.chat.last_message = Some(msg.clone());
        Ok(())
    }

    fn violation(details: String) -> SyncError {
        log::error!("chat state invariant violated: {}", details);
        SyncError::InvariantViolation(details)
    }
}
