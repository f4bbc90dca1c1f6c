use async_trait::async_trait;
use thiserror::Error;

use crate::api::models::{
    ActiveConversation, ChatsAndContacts, ContactId, Conversation, Message, SendMessageResponse,
};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP {status} from {endpoint}")]
    Status { status: u16, endpoint: String },
    #[error("invalid endpoint: {0}")]
    Url(#[from] url::ParseError),
    #[error("unexpected response: {0}")]
    Decode(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// What the gateway did with a sent message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    AppendedExisting(Message),
    /// The contact had no conversation yet; the returned id is authoritative.
    CreatedNew(Message, Conversation),
}

impl SendOutcome {
    pub fn message(&self) -> &Message {
        match self {
            SendOutcome::AppendedExisting(msg) | SendOutcome::CreatedNew(msg, _) => msg,
        }
    }
}

impl From<SendMessageResponse> for SendOutcome {
    fn from(resp: SendMessageResponse) -> Self {
        match resp.chat {
            Some(chat) => SendOutcome::CreatedNew(resp.msg, chat),
            None => SendOutcome::AppendedExisting(resp.msg),
        }
    }
}

/// Contract of the remote chat service. One attempt per call, no retries.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    async fn chats_and_contacts(&self, query: &str) -> GatewayResult<ChatsAndContacts>;

    async fn conversation(&self, contact_id: ContactId) -> GatewayResult<ActiveConversation>;

    async fn send_message(
        &self,
        contact_id: ContactId,
        message: &str,
        sender_id: ContactId,
    ) -> GatewayResult<SendOutcome>;
}
