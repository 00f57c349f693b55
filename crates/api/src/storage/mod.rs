//! Byte-storage boundary for uploaded files.
//!
//! The services only depend on the [`BlobStore`] trait; the shipped backend
//! writes to the local filesystem and serves files back over
//! `/api/uploads`. An S3-compatible backend can slot in behind the same
//! trait, selected by configuration.

mod local;

pub use local::LocalBlobStore;

use depot_core::error::CoreError;

/// URL prefix the upload directory is served under.
pub const UPLOADS_PREFIX: &str = "/api/uploads";

/// Subdirectory (and storage-key prefix) for project icons.
pub const PROJECT_ICONS_DIR: &str = "project-icons";

/// Allowed MIME types for project icon uploads.
pub const ICON_MIME_TYPES: &[&str] = &["image/png", "image/jpeg", "image/gif", "image/webp"];

/// Max file size for a project icon (2 MiB).
pub const ICON_MAX_SIZE_BYTES: usize = 2 * 1024 * 1024;

/// Validate an icon upload's MIME type and size before it reaches storage.
pub fn validate_icon_upload(size: usize, mime_type: &str) -> Result<(), CoreError> {
    if !ICON_MIME_TYPES.contains(&mime_type) {
        return Err(CoreError::Validation(format!(
            "Invalid file type '{mime_type}'. Allowed: {}",
            ICON_MIME_TYPES.join(", ")
        )));
    }
    if size > ICON_MAX_SIZE_BYTES {
        return Err(CoreError::Validation(format!(
            "File too large. Max size: {} MB",
            ICON_MAX_SIZE_BYTES / 1024 / 1024
        )));
    }
    Ok(())
}

/// Result of persisting a blob.
#[derive(Debug, Clone)]
pub struct SavedBlob {
    /// URL clients can fetch the blob from.
    pub public_url: String,
    /// Backend-specific key (relative path or object key).
    pub storage_key: String,
}

/// Errors raised by a storage backend. Treated opaquely by callers.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Write-once byte storage for uploads.
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    /// Persist `bytes` and return where they can be fetched from.
    async fn save(
        &self,
        bytes: &[u8],
        mime_type: &str,
        original_name: Option<&str>,
    ) -> Result<SavedBlob, StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_mime_types_accepted() {
        for mime in ICON_MIME_TYPES {
            assert!(validate_icon_upload(1024, mime).is_ok());
        }
    }

    #[test]
    fn disallowed_mime_type_rejected() {
        let err = validate_icon_upload(1024, "image/svg+xml").unwrap_err();
        assert!(err.to_string().contains("image/png"));
    }

    #[test]
    fn oversized_upload_rejected() {
        assert!(validate_icon_upload(ICON_MAX_SIZE_BYTES, "image/png").is_ok());
        let err = validate_icon_upload(ICON_MAX_SIZE_BYTES + 1, "image/png").unwrap_err();
        assert!(err.to_string().contains("2 MB"));
    }
}
