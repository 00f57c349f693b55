//! Local-filesystem blob storage.

use std::path::PathBuf;

use uuid::Uuid;

use super::{BlobStore, SavedBlob, StorageError, PROJECT_ICONS_DIR, UPLOADS_PREFIX};

/// Stores uploads under a local directory that the HTTP server serves back
/// via `ServeDir`.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn extension_for(mime_type: &str) -> &'static str {
        match mime_type {
            "image/png" => ".png",
            "image/jpeg" => ".jpg",
            "image/gif" => ".gif",
            "image/webp" => ".webp",
            _ => ".bin",
        }
    }
}

#[async_trait::async_trait]
impl BlobStore for LocalBlobStore {
    async fn save(
        &self,
        bytes: &[u8],
        mime_type: &str,
        _original_name: Option<&str>,
    ) -> Result<SavedBlob, StorageError> {
        let filename = format!("{}{}", Uuid::new_v4(), Self::extension_for(mime_type));
        let dir = self.root.join(PROJECT_ICONS_DIR);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&filename), bytes).await?;

        Ok(SavedBlob {
            public_url: format!("{UPLOADS_PREFIX}/{PROJECT_ICONS_DIR}/{filename}"),
            storage_key: format!("{PROJECT_ICONS_DIR}/{filename}"),
        })
    }
}
