use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Filesystem-backed store for uploaded ticket attachments. Files are written
/// under `upload_dir` with a generated name and referenced by the stable
/// `/uploads/<name>` path the router serves statically.
#[derive(Debug, Clone)]
pub struct AttachmentStore {
    upload_dir: PathBuf,
}

impl AttachmentStore {
    pub fn new(upload_dir: impl Into<PathBuf>) -> Result<Self, std::io::Error> {
        let upload_dir = upload_dir.into();
        std::fs::create_dir_all(&upload_dir)?;
        Ok(AttachmentStore { upload_dir })
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Durably store one attachment payload and return its public path.
    pub async fn store(
        &self,
        original_filename: &str,
        data: &[u8],
    ) -> Result<String, std::io::Error> {
        let stored_name = match extension(original_filename) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };

        let path = self.upload_dir.join(&stored_name);
        tokio::fs::write(&path, data).await?;

        tracing::debug!("stored attachment {} ({} bytes)", stored_name, data.len());

        Ok(format!("/uploads/{}", stored_name))
    }
}

fn extension(filename: &str) -> Option<&str> {
    let ext = filename.rsplit('.').next()?;
    if ext.is_empty() || ext.len() == filename.len() {
        return None;
    }
    Some(ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn store_writes_bytes_and_returns_public_path() {
        let dir = tempfile::tempdir().unwrap();
        let store = AttachmentStore::new(dir.path()).unwrap();

        let url = store.store("screenshot.png", b"fake png bytes").await.unwrap();

        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with(".png"));

        let stored_name = url.strip_prefix("/uploads/").unwrap();
        let contents = std::fs::read(dir.path().join(stored_name)).unwrap();
        assert_eq!(contents, b"fake png bytes");
    }

    #[tokio::test]
    async fn store_handles_filenames_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = AttachmentStore::new(dir.path()).unwrap();

        let url = store.store("recording", b"bytes").await.unwrap();
        let stored_name = url.strip_prefix("/uploads/").unwrap();
        assert!(!stored_name.contains('.'));
    }

    #[tokio::test]
    async fn stored_names_are_unique_per_upload() {
        let dir = tempfile::tempdir().unwrap();
        let store = AttachmentStore::new(dir.path()).unwrap();

        let a = store.store("a.png", b"one").await.unwrap();
        let b = store.store("a.png", b"two").await.unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn new_creates_the_upload_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("public").join("uploads");
        let store = AttachmentStore::new(&nested).unwrap();
        assert!(store.upload_dir().is_dir());
    }
}
