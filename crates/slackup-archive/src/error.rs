//! Archive error handling.

/// Result type for archive operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failure modes while writing an archive.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Filesystem failure while laying out the archive.
    #[error("archive I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Attachment download or other API failure.
    #[error("attachment fetch failed: {0}")]
    Api(#[from] slackup_api::Error),

    /// A message carried a timestamp that does not parse.
    #[error("unparseable message timestamp: {ts}")]
    Timestamp {
        /// The offending timestamp string.
        ts: String,
    },
}

impl Error {
    /// Creates a timestamp error.
    pub(crate) fn timestamp(ts: impl Into<String>) -> Self {
        Self::Timestamp { ts: ts.into() }
    }
}
