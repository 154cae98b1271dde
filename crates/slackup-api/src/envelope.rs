//! Slack response envelope decoding.
//!
//! Every Web API response carries `ok: bool` and, on failure, an `error`
//! code at the top level next to the payload fields. Decoding therefore
//! goes through a raw [`serde_json::Value`]: the acknowledgment is checked
//! first, then the same value is decoded into the typed payload.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::types::{Channel, Member, Message};

/// The acknowledgment part of every Slack response.
#[derive(Debug, Deserialize)]
struct Ack {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Cursor metadata attached to paged listings.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ResponseMetadata {
    #[serde(default)]
    pub next_cursor: String,
}

/// Payload of `users.list`.
#[derive(Debug, Deserialize)]
pub(crate) struct MembersPayload {
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub response_metadata: ResponseMetadata,
}

/// Payload of `conversations.list`.
#[derive(Debug, Deserialize)]
pub(crate) struct ChannelsPayload {
    #[serde(default)]
    pub channels: Vec<Channel>,
    #[serde(default)]
    pub response_metadata: ResponseMetadata,
}

/// Payload of `conversations.history`.
#[derive(Debug, Deserialize)]
pub(crate) struct HistoryPayload {
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub has_more: bool,
}

/// Payload of `conversations.open`.
#[derive(Debug, Deserialize)]
pub(crate) struct OpenPayload {
    pub channel: ChannelRef,
}

/// Bare channel reference.
#[derive(Debug, Deserialize)]
pub(crate) struct ChannelRef {
    pub id: String,
}

/// Acknowledgment-only payload for mutation endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct Acked {}

/// Checks the `ok`/`error` acknowledgment, then decodes the typed payload
/// from the same response value.
pub(crate) fn decode<T: DeserializeOwned>(value: serde_json::Value) -> Result<T> {
    let ack: Ack = serde_json::from_value(value.clone()).map_err(Error::Decode)?;

    if !ack.ok {
        let code = ack.error.unwrap_or_else(|| "unknown_error".to_string());
        return Err(Error::from_code(code));
    }

    serde_json::from_value(value).map_err(Error::Decode)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_history_payload() {
        let value = json!({
            "ok": true,
            "messages": [
                {"ts": "2.000000", "user": "U1", "text": "later"},
                {"ts": "1.000000", "user": "U2", "text": "earlier"}
            ],
            "has_more": true
        });

        let payload: HistoryPayload = decode(value).unwrap();
        assert_eq!(payload.messages.len(), 2);
        assert!(payload.has_more);
        assert_eq!(payload.messages[0].ts, "2.000000");
    }

    #[test]
    fn decodes_members_with_cursor() {
        let value = json!({
            "ok": true,
            "members": [{"id": "U1", "profile": {"display_name": "ada"}}],
            "response_metadata": {"next_cursor": "dXNlcjpVMDYxTkZUVDI="}
        });

        let payload: MembersPayload = decode(value).unwrap();
        assert_eq!(payload.members.len(), 1);
        assert_eq!(payload.response_metadata.next_cursor, "dXNlcjpVMDYxTkZUVDI=");
    }

    #[test]
    fn not_ok_maps_the_error_code() {
        let value = json!({"ok": false, "error": "channel_not_found"});
        let error = decode::<HistoryPayload>(value).unwrap_err();
        assert!(matches!(error, Error::Api { .. }));
    }

    #[test]
    fn not_ok_ratelimited_maps_to_rate_limit() {
        let value = json!({"ok": false, "error": "ratelimited"});
        let error = decode::<Acked>(value).unwrap_err();
        assert!(error.is_rate_limit());
    }

    #[test]
    fn not_ok_without_code_is_still_an_error() {
        let value = json!({"ok": false});
        let error = decode::<Acked>(value).unwrap_err();
        assert_eq!(error.to_string(), "Slack API error: unknown_error");
    }

    #[test]
    fn missing_cursor_defaults_to_empty() {
        let value = json!({"ok": true, "channels": [{"id": "C1", "name": "general"}]});
        let payload: ChannelsPayload = decode(value).unwrap();
        assert!(payload.response_metadata.next_cursor.is_empty());
    }
}
