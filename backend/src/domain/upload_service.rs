//! Image upload use-cases.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{ImageStore, ImageStoreError, ImageUploads};
use crate::domain::{
    Error, ImageFile, ImageUpload, StoredImage, UploadValidationError, content_type_for,
    validate_stored_name,
};

fn map_store_error(error: ImageStoreError) -> Error {
    match error {
        ImageStoreError::Io { message } => {
            debug!(%message, "image store failure");
            Error::internal(format!("image store error: {message}"))
        }
        ImageStoreError::NotFound { name } => Error::not_found(format!("image not found: {name}")),
    }
}

fn invalid_name(error: &UploadValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": "name",
        "code": error.code(),
    }))
}

/// Upload service implementing [`ImageUploads`] over an [`ImageStore`].
pub struct ImageUploadService<S: ?Sized> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S: ?Sized> ImageUploadService<S> {
    /// Service writing into `store`, naming files by `clock`.
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}

#[async_trait]
impl<S> ImageUploads for ImageUploadService<S>
where
    S: ImageStore + ?Sized,
{
    async fn upload(&self, upload: ImageUpload) -> Result<StoredImage, Error> {
        let millis = self.clock.utc().timestamp_millis();
        let name = format!("{millis}-{}", upload.file_name());
        self.store
            .save(&name, upload.bytes())
            .await
            .map_err(map_store_error)?;
        info!(%name, bytes = upload.bytes().len(), "stored upload");
        Ok(StoredImage::new(name))
    }

    async fn fetch(&self, name: &str) -> Result<ImageFile, Error> {
        validate_stored_name(name).map_err(|error| invalid_name(&error))?;
        let bytes = self.store.load(name).await.map_err(map_store_error)?;
        Ok(ImageFile {
            content_type: content_type_for(name),
            bytes,
        })
    }
}
