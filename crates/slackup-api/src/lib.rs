//! Typed Slack Web API client.
//!
//! This crate wraps the handful of Web API methods the backup/delete flow
//! needs behind [`ApiClient`], decoding Slack's `ok`/`error` response
//! envelope into structured [`Error`]s and adapting paged listings into the
//! page types `slackup-core` collects over.
//!
//! # Example
//!
//! ```rust,ignore
//! use slackup_api::{ApiClient, ApiConfig};
//!
//! let config = ApiConfig::new("xoxp-...");
//! let client = ApiClient::new(config)?;
//!
//! let identity = client.auth_test().await?;
//! let page = client.users_list(200, None).await?;
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod client;
mod envelope;
mod error;
mod types;

pub mod config;

pub use crate::client::ApiClient;
pub use crate::config::ApiConfig;
pub use crate::error::{Error, Result};
pub use crate::types::{
    AuthIdentity, Channel, FileObject, Member, MemberProfile, Message, MessageAttachment,
};

/// Tracing target for Slack API client operations.
pub const TRACING_TARGET: &str = "slackup_api::client";
