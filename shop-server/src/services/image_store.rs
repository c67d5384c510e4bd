//! Product image storage
//!
//! Uploaded images are validated (size, type, decodable), named by the
//! SHA-256 of their content and served from `/images`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::utils::{AppError, ErrorCode};

/// Public URL prefix of stored images
pub const IMAGES_ROUTE: &str = "/images";

/// Supported image formats
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg"];

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File too large: {size} bytes (maximum {max} bytes)")]
    TooLarge { size: usize, max: usize },

    #[error("Unsupported file format '{0}'. Supported: png, jpg, jpeg")]
    UnsupportedType(String),

    #[error("Invalid image file: {0}")]
    InvalidImage(String),

    #[error("Storage failure: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        let code = match &err {
            StorageError::TooLarge { .. } => ErrorCode::FileTooLarge,
            StorageError::UnsupportedType(_) => ErrorCode::UnsupportedImageType,
            StorageError::InvalidImage(_) => ErrorCode::InvalidImageFile,
            StorageError::Io(_) => ErrorCode::StorageError,
        };
        AppError::with_message(code, err.to_string())
    }
}

/// Stores image bytes and returns the URL they are served under
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn put(&self, data: Vec<u8>, file_name: &str) -> Result<String, StorageError>;
}

/// Images on the local filesystem (`WORK_DIR/images`)
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl LocalImageStore {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Calculate SHA256 hash of data
fn calculate_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Normalized extension of a supported image file name
fn image_extension(file_name: &str) -> Result<&'static str, StorageError> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
        return Err(StorageError::UnsupportedType(ext));
    }

    match mime_guess::from_ext(&ext).first_raw() {
        Some("image/png") => Ok("png"),
        Some("image/jpeg") => Ok("jpg"),
        _ => Err(StorageError::UnsupportedType(ext)),
    }
}

/// Validate image file
fn validate_image(data: &[u8], file_name: &str, max_bytes: usize) -> Result<&'static str, StorageError> {
    if data.len() > max_bytes {
        return Err(StorageError::TooLarge {
            size: data.len(),
            max: max_bytes,
        });
    }
    if data.is_empty() {
        return Err(StorageError::InvalidImage("Empty file provided".to_string()));
    }

    let ext = image_extension(file_name)?;

    // Verify it's actually an image by trying to load it
    image::load_from_memory(data).map_err(|e| StorageError::InvalidImage(e.to_string()))?;

    Ok(ext)
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn put(&self, data: Vec<u8>, file_name: &str) -> Result<String, StorageError> {
        let max_bytes = self.max_bytes;
        let file_name_owned = file_name.to_string();
        let (data, ext) = tokio::task::spawn_blocking(move || {
            validate_image(&data, &file_name_owned, max_bytes).map(|ext| (data, ext))
        })
        .await
        .map_err(|e| StorageError::InvalidImage(format!("Validation task failed: {e}")))??;

        let stored_name = format!("{}.{}", calculate_hash(&data), ext);
        let path = self.dir.join(&stored_name);

        // Same content, same name: skip the write
        if tokio::fs::try_exists(&path).await? {
            tracing::debug!(file = %stored_name, "Image already stored");
        } else {
            tokio::fs::create_dir_all(&self.dir).await?;
            tokio::fs::write(&path, &data).await?;
            tracing::info!(file = %stored_name, size = data.len(), "Image stored");
        }

        Ok(format!("{IMAGES_ROUTE}/{stored_name}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbImage::new(2, 2);
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, image::ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_extension_check() {
        assert_eq!(image_extension("photo.PNG").unwrap(), "png");
        assert_eq!(image_extension("photo.jpeg").unwrap(), "jpg");
        assert!(matches!(
            image_extension("photo.gif"),
            Err(StorageError::UnsupportedType(_))
        ));
        assert!(image_extension("no-extension").is_err());
    }

    #[test]
    fn test_size_limit() {
        let err = validate_image(&[0u8; 16], "a.png", 8).unwrap_err();
        assert!(matches!(err, StorageError::TooLarge { size: 16, max: 8 }));
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::FileTooLarge);
    }

    #[test]
    fn test_rejects_non_image_content() {
        let err = validate_image(b"definitely not a png", "a.png", 1024).unwrap_err();
        assert!(matches!(err, StorageError::InvalidImage(_)));
    }

    #[tokio::test]
    async fn test_put_stores_by_content_hash() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(dir.path(), 1024 * 1024);
        let data = png_bytes();

        let url = store.put(data.clone(), "lamp.png").await.unwrap();
        let again = store.put(data.clone(), "other-name.png").await.unwrap();
        assert_eq!(url, again);
        assert!(url.starts_with("/images/"));
        assert!(url.ends_with(".png"));

        let file = dir.path().join(url.trim_start_matches("/images/"));
        assert_eq!(std::fs::read(file).unwrap(), data);
    }
}
