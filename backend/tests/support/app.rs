//! Shared wiring for end-to-end HTTP tests.
//!
//! Builds the production application over in-memory article storage, a
//! temporary upload directory and an admin account whose password is
//! `password`.

use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};
use actix_web::web;
use blog_backend::domain::ports::AdminLoginService;
use blog_backend::domain::{AdminCredentials, ArticleService, ImageUploadService};
use blog_backend::inbound::http::health::HealthState;
use blog_backend::inbound::http::session_config::SessionSettings;
use blog_backend::inbound::http::state::{HttpState, HttpStatePorts};
use blog_backend::outbound::memory::InMemoryArticleRepository;
use blog_backend::outbound::storage::CapStdImageStore;
use blog_backend::server::AppDependencies;
use mockable::{Clock, DefaultClock};
use tempfile::TempDir;

pub const ADMIN_USERNAME: &str = "editor";
pub const ADMIN_PASSWORD: &str = "password";
/// SHA-256 of `password`.
const ADMIN_PASSWORD_SHA256: &str =
    "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8";

/// Application dependencies plus the upload directory keeping them alive.
pub struct TestApp {
    pub deps: AppDependencies,
    pub uploads: TempDir,
}

pub fn test_app() -> TestApp {
    let uploads = TempDir::new().expect("temp upload dir");
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let articles = Arc::new(ArticleService::new(
        Arc::new(InMemoryArticleRepository::new()),
        Arc::clone(&clock),
    ));
    let store = CapStdImageStore::open(uploads.path()).expect("open upload store");
    let admin = AdminCredentials::from_hex_digest(ADMIN_USERNAME, ADMIN_PASSWORD_SHA256)
        .expect("valid admin digest");

    let http_state = HttpState::new(HttpStatePorts {
        login: Arc::new(AdminLoginService::new(admin)),
        articles: articles.clone(),
        articles_query: articles,
        uploads: Arc::new(ImageUploadService::new(Arc::new(store), clock)),
    });

    TestApp {
        deps: AppDependencies {
            health_state: web::Data::new(HealthState::default()),
            http_state: web::Data::new(http_state),
            session: SessionSettings {
                key: Key::generate(),
                cookie_secure: false,
                same_site: SameSite::Lax,
                ttl_hours: 1,
            },
        },
        uploads,
    }
}

/// Sign in through `POST /api/v1/login` and yield the session cookie.
macro_rules! sign_in {
    ($app:expr) => {{
        let res = actix_web::test::call_service(
            &$app,
            actix_web::test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(serde_json::json!({
                    "username": support::ADMIN_USERNAME,
                    "password": support::ADMIN_PASSWORD,
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), actix_web::http::StatusCode::OK, "login failed");
        res.response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned()
    }};
}
