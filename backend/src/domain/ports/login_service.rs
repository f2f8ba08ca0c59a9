//! Driving port for admin login.
//!
//! Inbound adapters authenticate credentials through this port without
//! knowing where the admin account is configured.

use async_trait::async_trait;
use tracing::warn;

use crate::domain::{AdminCredentials, AdminId, Error, LoginCredentials};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated admin.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AdminId, Error>;
}

/// Authenticates against the single configured admin account.
#[derive(Debug, Clone)]
pub struct AdminLoginService {
    admin: AdminCredentials,
}

impl AdminLoginService {
    /// Service accepting only `admin`.
    #[must_use]
    pub fn new(admin: AdminCredentials) -> Self {
        Self { admin }
    }
}

#[async_trait]
impl LoginService for AdminLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AdminId, Error> {
        if !self.admin.verify(credentials) {
            warn!(username = credentials.username(), "rejected admin login");
            return Err(Error::unauthorized("invalid credentials"));
        }
        AdminId::new(self.admin.username())
            .ok_or_else(|| Error::internal("configured admin username is blank"))
    }
}

/// Rejects every login; used when no admin account is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledLoginService;

#[async_trait]
impl LoginService for DisabledLoginService {
    async fn authenticate(&self, _credentials: &LoginCredentials) -> Result<AdminId, Error> {
        Err(Error::unauthorized("admin login is not configured"))
    }
}
