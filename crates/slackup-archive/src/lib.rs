//! Local archive layout and transcript rendering.
//!
//! An archive is a plain directory: `conversation.txt` with one line per
//! message in chronological order, and `files/` holding attachments
//! downloaded through the authenticated client.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod layout;
mod render;
mod writer;

pub use crate::error::{Error, Result};
pub use crate::layout::ArchiveLayout;
pub use crate::render::{UNKNOWN_USER, UserDirectory, format_timestamp, message_body, transcript_line};
pub use crate::writer::ArchiveWriter;

/// Tracing target for archive operations.
pub const TRACING_TARGET: &str = "slackup_archive";
