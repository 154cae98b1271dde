//! Backup and deletion orchestration.
//!
//! These functions wire the generic collectors and mutator from
//! `slackup-core` to the concrete Slack endpoints: listing members and
//! channels to resolve the target conversation, walking its history, and
//! deleting the caller's own messages with rate-limit pacing.

use std::time::Duration;

use anyhow::Context;
use slackup_api::config::defaults;
use slackup_api::{ApiClient, Message};
use slackup_archive::UserDirectory;
use slackup_core::{History, MutationReport, WindowBounds, apply_all, collect_cursor, collect_window};

use crate::TRACING_TARGET_RUN;
use crate::target::BackupTarget;

/// A resolved backup target: the channel to walk and the member directory
/// for rendering author names.
#[derive(Debug)]
pub struct ResolvedTarget {
    /// Channel id of the conversation (DMs resolve through
    /// `conversations.open`).
    pub channel_id: String,
    /// Display names of all workspace members.
    pub users: UserDirectory,
}

/// Resolves the target conversation, collecting the full member listing
/// (and channel listing for `#` targets) through the cursor pager.
pub async fn resolve(client: &ApiClient, target: &BackupTarget) -> anyhow::Result<ResolvedTarget> {
    let members = collect_cursor(
        |limit, cursor| client.users_list(limit, cursor),
        defaults::PAGE_LIMIT,
    )
    .await
    .context("failed to list workspace members")?;
    let users = UserDirectory::from_members(&members);

    tracing::debug!(target: TRACING_TARGET_RUN, members = users.len(), "member listing collected");

    let channel_id = match target {
        BackupTarget::User(name) => {
            let user_id = users
                .find_by_name(name)
                .with_context(|| format!("could not find user {name}"))?
                .to_string();
            client
                .conversations_open(&user_id)
                .await
                .context("failed to open direct message conversation")?
        }
        BackupTarget::Channel(name) => {
            let channels = collect_cursor(
                |limit, cursor| client.conversations_list(limit, cursor),
                defaults::PAGE_LIMIT,
            )
            .await
            .context("failed to list channels")?;

            channels
                .iter()
                .find(|channel| channel.name == *name)
                .map(|channel| channel.id.clone())
                .with_context(|| format!("could not find channel {name}"))?
        }
    };

    Ok(ResolvedTarget { channel_id, users })
}

/// Walks the conversation's full history within the given window.
pub async fn fetch_history(
    client: &ApiClient,
    channel_id: &str,
    bounds: WindowBounds,
) -> anyhow::Result<History<Message>> {
    collect_window(
        |window| {
            let client = client.clone();
            let channel = channel_id.to_string();
            async move {
                client
                    .conversations_history(&channel, defaults::HISTORY_COUNT, &window)
                    .await
            }
        },
        bounds,
    )
    .await
    .context("failed to fetch conversation history")
}

/// Deletes the authenticated user's own messages from the conversation,
/// paced with the given delay; files shared with a deleted message are
/// deleted right after it, under the same pacing.
///
/// Failures are per-message: they are logged and counted, and the batch
/// always runs to completion.
pub async fn delete_messages(
    client: &ApiClient,
    channel_id: &str,
    messages: &[Message],
    own_user_id: &str,
    delay: Duration,
) -> MutationReport {
    let outcomes = apply_all(
        messages,
        |message| message.user.as_deref() == Some(own_user_id),
        |message| {
            let client = client.clone();
            let channel = channel_id.to_string();
            let message = message.clone();
            async move {
                client.chat_delete(&channel, &message.ts).await?;
                for file in &message.files {
                    client.files_delete(&file.id).await?;
                    tokio::time::sleep(delay).await;
                }
                Ok::<(), slackup_api::Error>(())
            }
        },
        delay,
        |message, error| {
            tracing::warn!(
                target: TRACING_TARGET_RUN,
                ts = %message.ts,
                error = %error,
                "failed to delete message"
            );
        },
    )
    .await;

    MutationReport::from_outcomes(&outcomes)
}
