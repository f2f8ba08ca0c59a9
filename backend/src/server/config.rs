//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::domain::{AdminCredentials, DEFAULT_EXCERPT_LENGTH, SlugPolicy};
use crate::inbound::http::session_config::SessionSettings;
use crate::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) upload_dir: PathBuf,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) admin: Option<AdminCredentials>,
    pub(crate) slug_policy: SlugPolicy,
    pub(crate) excerpt_length: usize,
}

impl ServerConfig {
    /// Construct a configuration with in-memory storage, login disabled and
    /// default slug and excerpt settings.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr, upload_dir: PathBuf) -> Self {
        Self {
            session,
            bind_addr,
            upload_dir,
            db_pool: None,
            admin: None,
            slug_policy: SlugPolicy::default(),
            excerpt_length: DEFAULT_EXCERPT_LENGTH,
        }
    }

    /// Store articles in PostgreSQL instead of memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Enable admin login for the given account.
    #[must_use]
    pub fn with_admin(mut self, admin: Option<AdminCredentials>) -> Self {
        self.admin = admin;
        self
    }

    /// Slug collision budget.
    #[must_use]
    pub fn with_slug_policy(mut self, slug_policy: SlugPolicy) -> Self {
        self.slug_policy = slug_policy;
        self
    }

    /// Excerpt length for list views.
    #[must_use]
    pub fn with_excerpt_length(mut self, excerpt_length: usize) -> Self {
        self.excerpt_length = excerpt_length;
        self
    }

    /// Address the server binds to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Directory holding uploaded images.
    #[must_use]
    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }
}
