//! Wire types for the Slack Web API surface slackup consumes.
//!
//! Only the fields the backup/delete flow reads are modeled; everything
//! else in the responses is ignored.

use serde::{Deserialize, Serialize};
use slackup_core::Timestamped;

/// One message of a conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message timestamp, the stable identifier within a channel
    /// (e.g. `"1503435956.000247"`).
    pub ts: String,
    /// Id of the authoring user, absent for some bot/system messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Message text; may be empty for file-only messages.
    #[serde(default)]
    pub text: String,
    /// Parent thread timestamp when this message is a thread reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
    /// Files shared with the message.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<FileObject>,
    /// Legacy attachments (link unfurls, integrations).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<MessageAttachment>,
}

impl Message {
    /// Whether this message is a thread reply.
    pub fn is_thread_reply(&self) -> bool {
        self.thread_ts.is_some()
    }
}

impl Timestamped for Message {
    fn timestamp(&self) -> &str {
        &self.ts
    }
}

/// A file shared in a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileObject {
    /// Slack file id.
    pub id: String,
    /// File extension reported by Slack (e.g. `png`).
    #[serde(default)]
    pub filetype: String,
    /// Authenticated download URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_private: Option<String>,
}

impl FileObject {
    /// Local filename the archive stores this file under.
    pub fn archive_name(&self) -> String {
        format!("{}.{}", self.id, self.filetype)
    }
}

/// A legacy message attachment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageAttachment {
    /// Plain-text summary of the attachment.
    #[serde(default)]
    pub fallback: String,
}

/// A workspace member from `users.list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// User id.
    pub id: String,
    /// Profile fields.
    #[serde(default)]
    pub profile: MemberProfile,
}

impl Member {
    /// The member's display name.
    pub fn display_name(&self) -> &str {
        &self.profile.display_name
    }
}

/// The profile subset slackup reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberProfile {
    /// Display name shown in the client.
    #[serde(default)]
    pub display_name: String,
}

/// A channel from `conversations.list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    /// Channel id.
    pub id: String,
    /// Channel name without the `#` prefix.
    #[serde(default)]
    pub name: String,
}

/// Identity of the token holder from `auth.test`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthIdentity {
    /// User id of the authenticated user.
    pub user_id: String,
    /// User name of the authenticated user.
    #[serde(default)]
    pub user: String,
    /// Workspace name.
    #[serde(default)]
    pub team: String,
}
