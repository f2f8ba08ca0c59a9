//! Driving port for image upload use-cases.

use async_trait::async_trait;

use crate::domain::{Error, ImageFile, ImageUpload, StoredImage};

/// Domain use-case port for storing and serving uploaded images.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageUploads: Send + Sync {
    /// Persist an upload and return its public location.
    async fn upload(&self, upload: ImageUpload) -> Result<StoredImage, Error>;

    /// Read a previously stored image.
    async fn fetch(&self, name: &str) -> Result<ImageFile, Error>;
}
