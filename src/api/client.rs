use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

use crate::api::gateway::{ChatGateway, GatewayError, GatewayResult, SendOutcome};
use crate::api::models::{
    ActiveConversation, ChatsAndContacts, ContactId, SendMessageBody, SendMessageResponse,
};
use crate::app::Settings;
use crate::utils::endpoint;

const CHATS_AND_CONTACTS: &str = "apps/chat/chats-and-contacts";
const CHATS: &str = "apps/chat/chats";

pub struct ApiClient {
    pub http: HttpClient,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(settings: &Settings) -> GatewayResult<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: settings.base_url.clone(),
            token: settings.token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn with_auth(&self, mut req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(t) = self.token.as_deref() {
            req = req.header("Authorization", format!("Bearer {}", t));
        }
        req
    }

    fn chat_url(&self, contact_id: ContactId) -> GatewayResult<url::Url> {
        Ok(endpoint(&self.base_url, &format!("{}/{}", CHATS, contact_id))?)
    }

    async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> GatewayResult<T> {
        if !resp.status().is_success() {
            return Err(GatewayError::Status {
                status: resp.status().as_u16(),
                endpoint: resp.url().to_string(),
            });
        }
        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ChatGateway for ApiClient {
    async fn chats_and_contacts(&self, query: &str) -> GatewayResult<ChatsAndContacts> {
        let mut url = endpoint(&self.base_url, CHATS_AND_CONTACTS)?;
        url.query_pairs_mut().append_pair("q", query);
        log::debug!("GET {}", url);
        let resp = self.with_auth(self.http.get(url)).send().await?;
        Self::read_json(resp).await
    }

    async fn conversation(&self, contact_id: ContactId) -> GatewayResult<ActiveConversation> {
        let url = self.chat_url(contact_id)?;
        log::debug!("GET {}", url);
        let resp = self.with_auth(self.http.get(url)).send().await?;
        Self::read_json(resp).await
    }

    async fn send_message(
        &self,
        contact_id: ContactId,
        message: &str,
        sender_id: ContactId,
    ) -> GatewayResult<SendOutcome> {
        let url = self.chat_url(contact_id)?;
        log::debug!("POST {}", url);
        let body = SendMessageBody { message, sender_id };
        let resp = self
            .with_auth(self.http.post(url).json(&body))
            .send()
            .await?;
        let decoded: SendMessageResponse = Self::read_json(resp).await?;
        Ok(decoded.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        let settings = Settings {
            base_url: base.to_string(),
            ..Settings::default()
        };
        ApiClient::new(&settings).unwrap()
    }

    #[test]
    fn chat_url_uses_contact_id() {
        let c = client("http://127.0.0.1:8000/api/v1");
        assert_eq!(
            c.chat_url(5).unwrap().as_str(),
            "http://127.0.0.1:8000/api/v1/apps/chat/chats/5"
        );
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        // Port 9 (discard) on localhost is expected to refuse connections.
        let c = client("http://127.0.0.1:9");
        let err = c.chats_and_contacts("x").await.unwrap_err();
        assert!(matches!(err, GatewayError::Transport(_)));
    }
}
