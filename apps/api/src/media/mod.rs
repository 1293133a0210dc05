//! Media Pipeline — validated upload storage plus image derivatives.
//!
//! One file per request: validate type and size, persist the original under a
//! collision-resistant name, and for images produce a resized WebP derivative.
//! Derivative failures degrade to serving the original; they are logged and
//! never surfaced to the caller.

pub mod handlers;
pub mod optimize;

use std::path::{Path, PathBuf};

use chrono::Utc;
use uuid::Uuid;

use crate::errors::AppError;

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Slack over `MAX_UPLOAD_BYTES` for multipart framing, so the pipeline's own
/// size check is what rejects oversized files (400, not 413).
pub const UPLOAD_BODY_LIMIT: usize = 12 * 1024 * 1024;

const ALLOWED_MIME_TYPES: [&str; 6] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/webp",
    "image/gif",
    "application/pdf",
];

pub fn is_allowed_mime(mime: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&mime)
}

pub fn is_image_mime(mime: &str) -> bool {
    mime.starts_with("image/")
}

/// Gate run before anything touches disk: a rejected upload persists nothing.
pub fn validate_upload(len: usize, mime: &str) -> Result<(), AppError> {
    if len > MAX_UPLOAD_BYTES {
        return Err(AppError::Validation(format!(
            "File too large: {len} bytes (max {MAX_UPLOAD_BYTES} bytes)"
        )));
    }
    if !is_allowed_mime(mime) {
        return Err(AppError::Validation(
            "Invalid file type. Only images and PDFs allowed.".to_string(),
        ));
    }
    Ok(())
}

/// Generates a stored filename: millisecond timestamp plus a random suffix,
/// preserving the original extension.
pub fn generate_filename(original_name: &str) -> String {
    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}{}", Utc::now().timestamp_millis(), &suffix[..9], ext)
}

/// Stored filenames never contain path separators; anything else is a
/// traversal attempt on the delete endpoint.
fn validate_filename(filename: &str) -> Result<(), AppError> {
    if filename.is_empty()
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains("..")
    {
        return Err(AppError::Validation("Invalid filename".to_string()));
    }
    Ok(())
}

/// Owns the public-servable uploads directory.
#[derive(Clone)]
pub struct MediaStore {
    uploads_dir: PathBuf,
}

impl MediaStore {
    pub fn new(uploads_dir: impl Into<PathBuf>) -> Self {
        MediaStore {
            uploads_dir: uploads_dir.into(),
        }
    }

    pub async fn init(&self) -> Result<(), AppError> {
        tokio::fs::create_dir_all(&self.uploads_dir).await?;
        Ok(())
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    pub async fn save(&self, filename: &str, bytes: &[u8]) -> Result<(), AppError> {
        tokio::fs::write(self.uploads_dir.join(filename), bytes).await?;
        Ok(())
    }

    pub async fn delete(&self, filename: &str) -> Result<(), AppError> {
        validate_filename(filename)?;
        let path = self.uploads_dir.join(filename);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound("File not found".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_filenames_preserve_extension_and_differ() {
        let a = generate_filename("photo.PNG");
        let b = generate_filename("photo.PNG");
        assert!(a.ends_with(".PNG"));
        assert_ne!(a, b);

        let bare = generate_filename("README");
        assert!(!bare.contains('.'));
    }

    #[test]
    fn mime_allow_list() {
        assert!(is_allowed_mime("image/jpeg"));
        assert!(is_allowed_mime("application/pdf"));
        assert!(!is_allowed_mime("text/html"));
        assert!(!is_allowed_mime("image/svg+xml"));

        assert!(is_image_mime("image/gif"));
        assert!(!is_image_mime("application/pdf"));
    }

    #[test]
    fn uploads_over_the_size_cap_are_rejected() {
        assert!(validate_upload(MAX_UPLOAD_BYTES, "image/png").is_ok());
        let err = validate_upload(MAX_UPLOAD_BYTES + 1, "image/png").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn disallowed_mime_types_are_rejected() {
        let err = validate_upload(100, "application/zip").unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("Invalid file type")));
    }

    #[test]
    fn traversal_filenames_are_rejected() {
        for bad in ["../secret", "a/b.png", "a\\b.png", "", "..%2f"] {
            assert!(
                validate_filename(bad).is_err(),
                "expected {bad:?} to be rejected"
            );
        }
        assert!(validate_filename("1700000000000-abc.png").is_ok());
    }

    #[tokio::test]
    async fn save_then_delete_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let media = MediaStore::new(dir.path());

        media.save("x.bin", b"payload").await.unwrap();
        assert!(dir.path().join("x.bin").exists());

        media.delete("x.bin").await.unwrap();
        assert!(!dir.path().join("x.bin").exists());

        let err = media.delete("x.bin").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
