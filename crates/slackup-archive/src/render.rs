//! Transcript line rendering.
//!
//! One message renders as `[YYYY-MM-DD HH:MM:SS] <who>: <what>`. Messages
//! with no text fall back to markers for their media and attachments;
//! thread replies are prefixed so the flattened transcript keeps that
//! context visible.

use std::collections::HashMap;

use slackup_api::{Member, Message};

use crate::error::{Error, Result};
use crate::layout::ArchiveLayout;

/// Rendered name for message authors missing from the member listing.
pub const UNKNOWN_USER: &str = "!Unknown!";

/// Lookup from user id to display name, built from the member listing.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    names: HashMap<String, String>,
}

impl UserDirectory {
    /// Builds the directory from collected members.
    pub fn from_members(members: &[Member]) -> Self {
        let names = members
            .iter()
            .map(|member| (member.id.clone(), member.display_name().to_string()))
            .collect();
        Self { names }
    }

    /// Number of known users.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the directory is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Finds the user id carrying the given display name, if any.
    pub fn find_by_name(&self, display_name: &str) -> Option<&str> {
        self.names
            .iter()
            .find(|(_, name)| name.as_str() == display_name)
            .map(|(id, _)| id.as_str())
    }

    /// Display name for a message author; unknown or absent authors render
    /// as [`UNKNOWN_USER`].
    pub fn display_name(&self, user_id: Option<&str>) -> &str {
        user_id
            .and_then(|id| self.names.get(id))
            .map(String::as_str)
            .unwrap_or(UNKNOWN_USER)
    }
}

/// Formats a Slack message timestamp (`"1503435956.000247"`) as a UTC
/// `YYYY-MM-DD HH:MM:SS` wall-clock string.
pub fn format_timestamp(ts: &str) -> Result<String> {
    let seconds = ts
        .parse::<f64>()
        .map_err(|_| Error::timestamp(ts))? as i64;
    let timestamp = jiff::Timestamp::from_second(seconds).map_err(|_| Error::timestamp(ts))?;
    Ok(timestamp.strftime("%Y-%m-%d %H:%M:%S").to_string())
}

/// Renders the body of a message.
///
/// Non-empty text is used as-is. Otherwise media markers
/// (`{media} <files/<name>>`) and attachment markers (`{attach} <fallback>`)
/// are joined with ` & ` within each group and ` + ` between groups.
/// Thread replies get a `{thread} ` prefix either way.
pub fn message_body(message: &Message) -> String {
    let mut what = message.text.clone();

    if what.is_empty() {
        let mut parts = Vec::new();

        if !message.files.is_empty() {
            let files: Vec<String> = message
                .files
                .iter()
                .map(|file| {
                    format!(
                        "{{media}} <{}>",
                        ArchiveLayout::file_reference(&file.archive_name())
                    )
                })
                .collect();
            parts.push(files.join(" & "));
        }

        if !message.attachments.is_empty() {
            let attachments: Vec<String> = message
                .attachments
                .iter()
                .map(|attachment| format!("{{attach}} {}", attachment.fallback))
                .collect();
            parts.push(attachments.join(" & "));
        }

        what = parts.join(" + ");
    }

    if message.is_thread_reply() {
        what = format!("{{thread}} {what}");
    }

    what
}

/// Renders one full transcript line.
pub fn transcript_line(message: &Message, users: &UserDirectory) -> Result<String> {
    Ok(format!(
        "[{}] {}: {}",
        format_timestamp(&message.ts)?,
        users.display_name(message.user.as_deref()),
        message_body(message)
    ))
}
