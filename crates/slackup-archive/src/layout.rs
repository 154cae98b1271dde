//! Archive directory layout.

use std::path::{Path, PathBuf};

/// On-disk layout of one conversation archive.
///
/// ```text
/// <root>/
/// ├── conversation.txt     # transcript, oldest first
/// └── files/               # downloaded attachments, <id>.<filetype>
/// ```
#[derive(Debug, Clone)]
pub struct ArchiveLayout {
    root: PathBuf,
}

impl ArchiveLayout {
    /// Transcript filename inside the archive root.
    pub const TRANSCRIPT: &'static str = "conversation.txt";

    /// Attachment directory name inside the archive root.
    pub const FILES_DIR: &'static str = "files";

    /// Creates a layout rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Default archive root name for a backup started now, e.g.
    /// `slack-backup-2017-08-22T21-45-56`.
    pub fn default_root_name() -> String {
        format!(
            "slack-backup-{}",
            jiff::Zoned::now().strftime("%Y-%m-%dT%H-%M-%S")
        )
    }

    /// The archive root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the transcript file.
    pub fn transcript_path(&self) -> PathBuf {
        self.root.join(Self::TRANSCRIPT)
    }

    /// Path of the attachment directory.
    pub fn files_dir(&self) -> PathBuf {
        self.root.join(Self::FILES_DIR)
    }

    /// Archive-relative reference to an attachment, as written into the
    /// transcript (`files/<name>`).
    pub fn file_reference(name: &str) -> String {
        format!("{}/{name}", Self::FILES_DIR)
    }

    /// Creates the archive root if it does not exist.
    pub async fn ensure_root(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    /// Creates the attachment directory if it does not exist.
    pub async fn ensure_files_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(self.files_dir()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_hang_off_the_root() {
        let layout = ArchiveLayout::new("/tmp/backup");
        assert_eq!(
            layout.transcript_path(),
            PathBuf::from("/tmp/backup/conversation.txt")
        );
        assert_eq!(layout.files_dir(), PathBuf::from("/tmp/backup/files"));
    }

    #[test]
    fn default_root_name_is_timestamped() {
        let name = ArchiveLayout::default_root_name();
        assert!(name.starts_with("slack-backup-"));
        assert!(name.len() > "slack-backup-".len());
    }

    #[test]
    fn file_reference_is_archive_relative() {
        assert_eq!(ArchiveLayout::file_reference("F1.png"), "files/F1.png");
    }

    #[tokio::test]
    async fn ensure_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ArchiveLayout::new(dir.path().join("archive"));

        layout.ensure_root().await.unwrap();
        layout.ensure_files_dir().await.unwrap();

        assert!(layout.root().is_dir());
        assert!(layout.files_dir().is_dir());
    }
}
