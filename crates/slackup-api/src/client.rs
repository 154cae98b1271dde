//! Reqwest-based Slack Web API client.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Response, StatusCode, header};
use serde::de::DeserializeOwned;
use slackup_core::{CursorPage, WindowBounds, WindowPage};

use crate::TRACING_TARGET;
use crate::config::ApiConfig;
use crate::envelope::{
    Acked, ChannelsPayload, HistoryPayload, MembersPayload, OpenPayload, decode,
};
use crate::error::{Error, Result};
use crate::types::{AuthIdentity, Channel, Member, Message};

/// Inner client that holds the HTTP client and configuration.
struct ApiClientInner {
    http: Client,
    config: ApiConfig,
}

/// Slack Web API client.
///
/// Wraps the listing, history, identity, and deletion methods the backup
/// flow needs. Read methods go out as GET with query parameters, mutations
/// as POST form bodies; the token travels as a bearer header either way.
///
/// # Examples
///
/// ```rust,ignore
/// use slackup_api::{ApiClient, ApiConfig};
///
/// let client = ApiClient::new(ApiConfig::new("xoxp-..."))?;
/// let identity = client.auth_test().await?;
/// ```
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.config.effective_base_url())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: ApiConfig) -> Result<Self> {
        config.validate()?;

        let timeout = config.effective_timeout();
        let user_agent = config.effective_user_agent();

        tracing::debug!(
            target: TRACING_TARGET,
            base_url = config.effective_base_url(),
            timeout_ms = timeout.as_millis(),
            "creating Slack API client"
        );

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(&user_agent)
            .build()?;

        let inner = ApiClientInner { http, config };
        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Gets the underlying HTTP client.
    fn http(&self) -> &Client {
        &self.inner.http
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Identity of the token holder.
    pub async fn auth_test(&self) -> Result<AuthIdentity> {
        self.get("auth.test", &[]).await
    }

    /// One page of the workspace member listing.
    pub async fn users_list(
        &self,
        limit: u32,
        cursor: Option<String>,
    ) -> Result<CursorPage<Member>> {
        let mut query = vec![("limit", limit.to_string())];
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor));
        }

        let payload: MembersPayload = self.get("users.list", &query).await?;
        Ok(CursorPage::new(
            payload.members,
            Some(payload.response_metadata.next_cursor),
        ))
    }

    /// One page of the channel listing.
    pub async fn conversations_list(
        &self,
        limit: u32,
        cursor: Option<String>,
    ) -> Result<CursorPage<Channel>> {
        let mut query = vec![
            ("limit", limit.to_string()),
            ("types", "public_channel,private_channel".to_string()),
        ];
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor));
        }

        let payload: ChannelsPayload = self.get("conversations.list", &query).await?;
        Ok(CursorPage::new(
            payload.channels,
            Some(payload.response_metadata.next_cursor),
        ))
    }

    /// One page of a conversation's history within the given window.
    pub async fn conversations_history(
        &self,
        channel: &str,
        count: u32,
        window: &WindowBounds,
    ) -> Result<WindowPage<Message>> {
        let mut query = vec![
            ("channel", channel.to_string()),
            ("limit", count.to_string()),
        ];
        if let Some(oldest) = &window.oldest {
            query.push(("oldest", oldest.clone()));
        }
        if let Some(latest) = &window.latest {
            query.push(("latest", latest.clone()));
        }

        let payload: HistoryPayload = self.get("conversations.history", &query).await?;
        Ok(WindowPage::new(payload.messages, payload.has_more))
    }

    /// Opens (or resolves) the direct-message channel with a user and
    /// returns its channel id.
    pub async fn conversations_open(&self, user_id: &str) -> Result<String> {
        let payload: OpenPayload = self
            .post("conversations.open", &[("users", user_id.to_string())])
            .await?;
        Ok(payload.channel.id)
    }

    /// Deletes one message. Irreversible.
    pub async fn chat_delete(&self, channel: &str, ts: &str) -> Result<()> {
        let _: Acked = self
            .post(
                "chat.delete",
                &[("channel", channel.to_string()), ("ts", ts.to_string())],
            )
            .await?;
        Ok(())
    }

    /// Deletes one file. Irreversible.
    pub async fn files_delete(&self, file_id: &str) -> Result<()> {
        let _: Acked = self
            .post("files.delete", &[("file", file_id.to_string())])
            .await?;
        Ok(())
    }

    /// Downloads a `url_private` attachment with the token as bearer auth.
    pub async fn fetch_file(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!(target: TRACING_TARGET, url, "downloading attachment");

        let response = self
            .http()
            .get(url)
            .bearer_auth(&self.inner.config.token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::api_with_status("file_fetch_failed", status.as_u16()));
        }

        Ok(response.bytes().await?.to_vec())
    }

    /// Issues a GET request against a Web API method.
    async fn get<T: DeserializeOwned>(&self, method: &str, query: &[(&str, String)]) -> Result<T> {
        let response = self
            .http()
            .get(self.endpoint(method))
            .bearer_auth(&self.inner.config.token)
            .query(query)
            .send()
            .await?;

        self.read_envelope(method, response).await
    }

    /// Issues a POST form request against a Web API method.
    async fn post<T: DeserializeOwned>(&self, method: &str, form: &[(&str, String)]) -> Result<T> {
        let response = self
            .http()
            .post(self.endpoint(method))
            .bearer_auth(&self.inner.config.token)
            .form(form)
            .send()
            .await?;

        self.read_envelope(method, response).await
    }

    /// Checks HTTP-level failures, then decodes the Slack envelope.
    async fn read_envelope<T: DeserializeOwned>(
        &self,
        method: &str,
        response: Response,
    ) -> Result<T> {
        let status = response.status();

        tracing::debug!(
            target: TRACING_TARGET,
            method,
            status = status.as_u16(),
            "received Slack API response"
        );

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(Error::rate_limit(retry_after));
        }

        if !status.is_success() {
            return Err(Error::api_with_status("http_error", status.as_u16()));
        }

        let value: serde_json::Value = response.json().await?;
        decode(value)
    }

    /// Full URL of a Web API method.
    fn endpoint(&self, method: &str) -> String {
        format!(
            "{}/{}",
            self.inner.config.effective_base_url().trim_end_matches('/'),
            method
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = ApiClient::new(ApiConfig::new("xoxp-test")).unwrap();
        assert_eq!(
            client.config().effective_base_url(),
            crate::config::defaults::BASE_URL
        );
    }

    #[test]
    fn test_client_rejects_empty_token() {
        let result = ApiClient::new(ApiConfig::new(""));
        assert!(result.is_err());
    }

    #[test]
    fn test_endpoint_joins_base_and_method() {
        let client =
            ApiClient::new(ApiConfig::new("xoxp-test").with_base_url("https://example.com/api/"))
                .unwrap();
        assert_eq!(
            client.endpoint("conversations.history"),
            "https://example.com/api/conversations.history"
        );
    }
}
