//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::ServiceResponse;
use actix_web::{HttpResponse, test, web};

use super::ApiResult;
use super::session::SessionContext;
use super::session_config::SessionSettings;
use super::state::{HttpState, HttpStatePorts};
use crate::domain::AdminId;
use crate::domain::ports::{
    MockArticleCommand, MockArticleQuery, MockImageUploads, MockLoginService,
};

/// Route that signs the caller in as `admin` without checking credentials.
pub const TEST_LOGIN_PATH: &str = "/test-login";

/// Production session middleware with a fresh key and the `Secure` flag
/// off, so plain-HTTP test requests carry the cookie back.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionSettings {
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
        ttl_hours: 1,
    }
    .middleware()
}

/// Mocked driving ports; set expectations before calling [`mock_state`].
#[derive(Default)]
pub struct StatePorts {
    pub login: MockLoginService,
    pub command: MockArticleCommand,
    pub query: MockArticleQuery,
    pub uploads: MockImageUploads,
}

pub fn mock_state(ports: StatePorts) -> HttpState {
    HttpState::new(HttpStatePorts {
        login: Arc::new(ports.login),
        articles: Arc::new(ports.command),
        articles_query: Arc::new(ports.query),
        uploads: Arc::new(ports.uploads),
    })
}

async fn test_login(session: SessionContext) -> ApiResult<HttpResponse> {
    let admin = AdminId::new("admin").ok_or_else(|| crate::domain::Error::internal("admin id"))?;
    session.persist_admin(&admin)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Register [`TEST_LOGIN_PATH`] on an app or scope.
pub fn test_login_route(cfg: &mut web::ServiceConfig) {
    cfg.route(TEST_LOGIN_PATH, web::post().to(test_login));
}

pub fn test_login_request() -> test::TestRequest {
    test::TestRequest::post().uri(TEST_LOGIN_PATH)
}

/// The `session` cookie set by `res`.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(|cookie| cookie.into_owned())
        .expect("session cookie set")
}
