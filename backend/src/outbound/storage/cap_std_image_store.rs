//! [`ImageStore`] backed by a capability-scoped upload directory.
//!
//! All access goes through a `cap_std::fs::Dir` opened once at startup, so
//! names can never escape the directory even if validation upstream slips.

use std::io;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{ImageStore, ImageStoreError};

/// Upload directory handle.
#[derive(Clone)]
pub struct CapStdImageStore {
    dir: Arc<Dir>,
}

impl CapStdImageStore {
    /// Open `path`, creating it when missing.
    pub fn open(path: &Path) -> io::Result<Self> {
        Dir::create_ambient_dir_all(path, ambient_authority())?;
        let dir = Dir::open_ambient_dir(path, ambient_authority())?;
        Ok(Self { dir: Arc::new(dir) })
    }

    async fn blocking<T, F>(&self, operation: F) -> Result<T, io::Error>
    where
        T: Send + 'static,
        F: FnOnce(&Dir) -> io::Result<T> + Send + 'static,
    {
        let dir = Arc::clone(&self.dir);
        tokio::task::spawn_blocking(move || operation(&dir))
            .await
            .map_err(io::Error::other)?
    }
}

fn write_atomically(dir: &Dir, name: &str, bytes: &[u8]) -> io::Result<()> {
    let staging = format!(".tmp-{}", Uuid::new_v4().simple());
    dir.write(&staging, bytes)?;
    dir.rename(&staging, dir, name).inspect_err(|_| {
        let _cleanup = dir.remove_file(&staging);
    })
}

#[async_trait]
impl ImageStore for CapStdImageStore {
    async fn save(&self, name: &str, bytes: &[u8]) -> Result<(), ImageStoreError> {
        let owned_name = name.to_owned();
        let owned_bytes = bytes.to_vec();
        self.blocking(move |dir| write_atomically(dir, &owned_name, &owned_bytes))
            .await
            .map_err(|error| {
                debug!(%error, name, "failed to store image");
                ImageStoreError::io(error.to_string())
            })
    }

    async fn load(&self, name: &str) -> Result<Vec<u8>, ImageStoreError> {
        let owned_name = name.to_owned();
        self.blocking(move |dir| dir.read(&owned_name))
            .await
            .map_err(|error| match error.kind() {
                io::ErrorKind::NotFound => ImageStoreError::not_found(name),
                _ => ImageStoreError::io(error.to_string()),
            })
    }
}
