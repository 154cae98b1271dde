#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod ops;
mod prompt;
mod target;

use std::process;

use anyhow::Context;
use clap::Parser;
use slackup_api::ApiClient;
use slackup_archive::{ArchiveLayout, ArchiveWriter};

use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "slackup_cli::startup";
pub const TRACING_TARGET_CONFIG: &str = "slackup_cli::config";
pub const TRACING_TARGET_RUN: &str = "slackup_cli::run";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_RUN,
            error = %error,
            "backup terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    log_startup_info();

    cli.api.validate().context("invalid API configuration")?;

    tracing::debug!(
        target: TRACING_TARGET_CONFIG,
        destination = %cli.backup.effective_destination().display(),
        delete = cli.delete.delete,
        delete_delay_ms = cli.delete.delete_delay_ms,
        "configuration loaded"
    );

    let client = ApiClient::new(cli.api.clone()).context("failed to create Slack client")?;

    tracing::info!(target: TRACING_TARGET_RUN, target_name = %cli.target, "retrieving users");
    let resolved = ops::resolve(&client, &cli.target).await?;

    let bounds = cli
        .backup
        .window_bounds()
        .context("invalid --from/--to dates")?;

    tracing::info!(
        target: TRACING_TARGET_RUN,
        channel = %resolved.channel_id,
        "retrieving messages"
    );
    let history = ops::fetch_history(&client, &resolved.channel_id, bounds).await?;
    tracing::info!(
        target: TRACING_TARGET_RUN,
        messages = history.len(),
        "history collected"
    );

    let layout = ArchiveLayout::new(cli.backup.effective_destination());
    let writer = ArchiveWriter::new(client.clone(), layout);

    // The collector accumulates newest-first; the transcript reads oldest
    // first, while deletion below walks the delivery order.
    let chronological = history.clone().into_chronological();
    let delivery = history.into_delivery_order();

    writer
        .write_transcript(&chronological, &resolved.users)
        .await
        .context("failed to write archive")?;

    if cli.delete.delete {
        let confirmed = cli.delete.yes
            || prompt::confirm(
                "Are you sure you want to delete all these messages? (CANNOT BE UNDONE!)",
            );
        if !confirmed {
            anyhow::bail!("deletion not confirmed");
        }

        let identity = client
            .auth_test()
            .await
            .context("failed to resolve token identity")?;

        tracing::info!(
            target: TRACING_TARGET_RUN,
            user_id = %identity.user_id,
            "deleting messages"
        );
        let report = ops::delete_messages(
            &client,
            &resolved.channel_id,
            &delivery,
            &identity.user_id,
            cli.delete.delay(),
        )
        .await;

        tracing::info!(
            target: TRACING_TARGET_RUN,
            applied = report.applied,
            skipped = report.skipped,
            failed = report.failed,
            "deletion complete"
        );
    }

    Ok(())
}

/// Logs startup information.
fn log_startup_info() {
    tracing::debug!(
        target: TRACING_TARGET_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        pid = process::id(),
        arch = std::env::consts::ARCH,
        os = std::env::consts::OS,
        "starting slackup"
    );
}
