//! Builders wiring outbound adapters into the HTTP state ports.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use crate::domain::ports::{
    AdminLoginService, ArticleCommand, ArticleQuery, ArticleRepository, DisabledLoginService,
    ImageUploads, LoginService,
};
use crate::domain::{ArticleService, ImageUploadService};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::InMemoryArticleRepository;
use crate::outbound::persistence::DieselArticleRepository;
use crate::outbound::storage::CapStdImageStore;

use super::ServerConfig;

/// Pick the article store: PostgreSQL when a pool is configured, memory
/// otherwise.
fn build_article_repository(config: &ServerConfig) -> Arc<dyn ArticleRepository> {
    match &config.db_pool {
        Some(pool) => Arc::new(DieselArticleRepository::new(pool.clone())),
        None => {
            warn!("no database configured; articles are kept in memory");
            Arc::new(InMemoryArticleRepository::new())
        }
    }
}

fn build_login_service(config: &ServerConfig) -> Arc<dyn LoginService> {
    match &config.admin {
        Some(admin) => {
            info!(username = admin.username(), "admin login enabled");
            Arc::new(AdminLoginService::new(admin.clone()))
        }
        None => {
            warn!("no admin credentials configured; login is disabled");
            Arc::new(DisabledLoginService)
        }
    }
}

/// Assemble the HTTP state from the server configuration.
///
/// # Errors
///
/// Returns [`std::io::Error`] when the upload directory cannot be opened.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let articles = Arc::new(
        ArticleService::new(build_article_repository(config), Arc::clone(&clock))
            .with_slug_policy(config.slug_policy)
            .with_excerpt_length(config.excerpt_length),
    );
    let store = CapStdImageStore::open(&config.upload_dir).map_err(|err| {
        std::io::Error::other(format!(
            "failed to open upload directory {}: {err}",
            config.upload_dir.display()
        ))
    })?;
    let uploads: Arc<dyn ImageUploads> =
        Arc::new(ImageUploadService::new(Arc::new(store), clock));

    let command: Arc<dyn ArticleCommand> = articles.clone();
    let query: Arc<dyn ArticleQuery> = articles;
    Ok(web::Data::new(HttpState::new(HttpStatePorts {
        login: build_login_service(config),
        articles: command,
        articles_query: query,
        uploads,
    })))
}
