//! Slack API client configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default values for configuration options.
pub mod defaults {
    /// Slack Web API base URL.
    pub const BASE_URL: &str = "https://slack.com/api";

    /// Default timeout for HTTP requests: 30 seconds.
    pub const TIMEOUT_SECS: u64 = 30;

    /// Default page size for cursor-paged listings.
    pub const PAGE_LIMIT: u32 = 200;

    /// Default page size for history fetches.
    pub const HISTORY_COUNT: u32 = 1000;
}

/// Configuration for the Slack API client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct ApiConfig {
    /// Slack API token (user or bot token)
    #[cfg_attr(
        feature = "config",
        arg(long = "token", env = "SLACK_API_TOKEN", hide_env_values = true)
    )]
    pub token: String,

    /// Web API base URL override
    #[cfg_attr(feature = "config", arg(long = "api-url", env = "SLACK_API_URL"))]
    #[serde(default)]
    pub base_url: Option<String>,

    /// HTTP request timeout in seconds
    #[cfg_attr(
        feature = "config",
        arg(long = "http-timeout", env = "HTTP_TIMEOUT", default_value = "30")
    )]
    #[serde(default = "default_timeout_secs")]
    pub http_timeout: u64,

    /// User-Agent header to send with requests
    #[cfg_attr(
        feature = "config",
        arg(long = "http-user-agent", env = "HTTP_USER_AGENT")
    )]
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_timeout_secs() -> u64 {
    defaults::TIMEOUT_SECS
}

impl ApiConfig {
    /// Creates a configuration for the given token with defaults elsewhere.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: None,
            http_timeout: default_timeout_secs(),
            user_agent: None,
        }
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the timeout in seconds.
    #[must_use]
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.http_timeout = timeout_secs;
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.token.is_empty() {
            return Err(Error::config("Slack API token is empty"));
        }

        if let Some(base_url) = &self.base_url
            && !base_url.starts_with("http://")
            && !base_url.starts_with("https://")
        {
            return Err(Error::config(format!(
                "base URL must start with http:// or https://, got {base_url}"
            )));
        }

        Ok(())
    }

    /// Returns the effective base URL, using the default if not set.
    pub fn effective_base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(defaults::BASE_URL)
    }

    /// Returns the effective timeout, using default if zero.
    pub fn effective_timeout(&self) -> Duration {
        if self.http_timeout == 0 {
            Duration::from_secs(defaults::TIMEOUT_SECS)
        } else {
            Duration::from_secs(self.http_timeout)
        }
    }

    /// Returns the effective user agent, using default if not set.
    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(Self::default_user_agent)
    }

    /// Returns the default user agent string.
    fn default_user_agent() -> String {
        format!("slackup/{}", env!("CARGO_PKG_VERSION"))
    }
}
