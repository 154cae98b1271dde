//! Archive writing: transcript plus attachment download placement.

use slackup_api::{ApiClient, Message};
use tokio::io::AsyncWriteExt;

use crate::TRACING_TARGET;
use crate::error::Result;
use crate::layout::ArchiveLayout;
use crate::render::{UserDirectory, transcript_line};

/// Writes one conversation into an archive directory.
///
/// Attachments referenced from file-only messages are downloaded through
/// the authenticated client as their transcript lines are rendered, so the
/// `files/<name>` references in the transcript always point at content the
/// archive actually holds. Download failures abort the archive: a transcript
/// pointing at files that were never fetched would be silently incomplete.
#[derive(Debug, Clone)]
pub struct ArchiveWriter {
    client: ApiClient,
    layout: ArchiveLayout,
}

impl ArchiveWriter {
    /// Creates a writer for the given archive root.
    pub fn new(client: ApiClient, layout: ArchiveLayout) -> Self {
        Self { client, layout }
    }

    /// The archive layout this writer fills.
    pub fn layout(&self) -> &ArchiveLayout {
        &self.layout
    }

    /// Writes the transcript for messages already in chronological order,
    /// downloading attachments along the way.
    pub async fn write_transcript(
        &self,
        messages: &[Message],
        users: &UserDirectory,
    ) -> Result<()> {
        self.layout.ensure_root().await?;

        let path = self.layout.transcript_path();
        let mut transcript = tokio::fs::File::create(&path).await?;

        for message in messages {
            self.download_attachments(message).await?;

            let line = transcript_line(message, users)?;
            transcript.write_all(line.as_bytes()).await?;
            transcript.write_all(b"\n").await?;
        }

        transcript.flush().await?;

        tracing::info!(
            target: TRACING_TARGET,
            path = %path.display(),
            messages = messages.len(),
            "transcript written"
        );

        Ok(())
    }

    /// Downloads the attachments of a file-only message into `files/`.
    ///
    /// Messages with text never render media markers, so their files are
    /// not fetched; this mirrors what the transcript references.
    async fn download_attachments(&self, message: &Message) -> Result<()> {
        if !message.text.is_empty() || message.files.is_empty() {
            return Ok(());
        }

        self.layout.ensure_files_dir().await?;

        for file in &message.files {
            let Some(url) = &file.url_private else {
                continue;
            };

            let bytes = self.client.fetch_file(url).await?;
            let target = self.layout.files_dir().join(file.archive_name());
            tokio::fs::write(&target, bytes).await?;

            tracing::debug!(
                target: TRACING_TARGET,
                file = %target.display(),
                "attachment stored"
            );
        }

        Ok(())
    }
}
