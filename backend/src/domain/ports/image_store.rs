//! Driven port for uploaded image bytes.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by image storage adapters.
    pub enum ImageStoreError {
        /// Reading or writing the backing store failed.
        Io { message: String } => "image store i/o failed: {message}",
        /// No image is stored under the name.
        NotFound { name: String } => "image not found: {name}",
    }
}

/// Flat key/value store for uploaded images.
///
/// Names handed to adapters are already sanitised single path segments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn save(&self, name: &str, bytes: &[u8]) -> Result<(), ImageStoreError>;

    async fn load(&self, name: &str) -> Result<Vec<u8>, ImageStoreError>;
}
