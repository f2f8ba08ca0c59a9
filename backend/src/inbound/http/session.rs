//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Wraps the Actix session so handlers only persist, read, or drop the
//! signed-in admin.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::{AdminId, Error};

pub(crate) const ADMIN_ID_KEY: &str = "admin_id";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated admin in the session cookie.
    ///
    /// The session is renewed first so a pre-login cookie cannot be reused.
    pub fn persist_admin(&self, admin: &AdminId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(ADMIN_ID_KEY, admin.as_ref())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the signed-in admin, if any.
    pub fn admin_id(&self) -> Result<Option<AdminId>, Error> {
        let id = self
            .0
            .get::<String>(ADMIN_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(id.and_then(|raw| {
            let admin = AdminId::new(raw);
            if admin.is_none() {
                tracing::warn!("blank admin id in session cookie");
            }
            admin
        }))
    }

    /// Require a signed-in admin or return `401 Unauthorized`.
    pub fn require_admin(&self) -> Result<AdminId, Error> {
        self.admin_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Drop every session entry and expire the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
