//! Structured error handling for Slack Web API operations.

use std::time::Duration;

/// Result type for Slack API operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failure modes when talking to the Slack Web API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The API answered with `ok: false` and an error code, or with a
    /// non-success HTTP status.
    #[error("Slack API error: {code}")]
    Api {
        /// Slack's error code (e.g. `channel_not_found`), or a synthesized
        /// one for HTTP-level failures.
        code: String,
        /// HTTP status code if the failure was HTTP-level.
        status_code: Option<u16>,
    },

    /// Network or transport failure from the HTTP client.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The API rejected the call for exceeding its rate limit.
    #[error("rate limit exceeded")]
    RateLimit {
        /// Time until the limit resets, from the `Retry-After` header when
        /// present.
        retry_after: Option<Duration>,
    },

    /// The token was rejected.
    #[error("authentication error: {code}")]
    Auth {
        /// Slack's auth error code (e.g. `invalid_auth`, `token_revoked`).
        code: String,
    },

    /// The response body did not match the expected shape.
    #[error("malformed response: {0}")]
    Decode(#[source] serde_json::Error),

    /// Client-side configuration problem.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration problem.
        message: String,
    },
}

impl Error {
    /// Creates an API error from a Slack error code.
    pub fn api(code: impl Into<String>) -> Self {
        Self::Api {
            code: code.into(),
            status_code: None,
        }
    }

    /// Creates an API error carrying an HTTP status.
    pub fn api_with_status(code: impl Into<String>, status_code: u16) -> Self {
        Self::Api {
            code: code.into(),
            status_code: Some(status_code),
        }
    }

    /// Creates a rate-limit error.
    pub fn rate_limit(retry_after: Option<Duration>) -> Self {
        Self::RateLimit { retry_after }
    }

    /// Creates an authentication error.
    pub fn auth(code: impl Into<String>) -> Self {
        Self::Auth { code: code.into() }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Maps a Slack `error` code from an `ok: false` envelope to the
    /// matching variant.
    pub(crate) fn from_code(code: String) -> Self {
        match code.as_str() {
            "ratelimited" => Self::RateLimit { retry_after: None },
            "invalid_auth" | "not_authed" | "token_revoked" | "token_expired"
            | "account_inactive" => Self::Auth { code },
            _ => Self::Api {
                code,
                status_code: None,
            },
        }
    }

    /// Returns true for rate-limit rejections.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Error::RateLimit { .. })
    }

    /// Returns true for token/auth failures.
    pub fn is_auth(&self) -> bool {
        matches!(self, Error::Auth { .. })
    }

    /// Returns the retry delay if the API provided one.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Error::RateLimit { retry_after } => *retry_after,
            _ => None,
        }
    }

    /// Returns the HTTP status code if available.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api { status_code, .. } => *status_code,
            Error::Network(error) => error.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
