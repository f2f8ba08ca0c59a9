//! Backend entry-point: loads settings, prepares storage and starts the server.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use blog_backend::inbound::http::health::HealthState;
use blog_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use blog_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use blog_backend::server::{ServerConfig, create_server};
use blog_backend::settings::AppSettings;

fn invalid_config(err: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, err.to_string())
}

async fn connect_database(database_url: &str) -> io::Result<DbPool> {
    run_pending_migrations(database_url)
        .await
        .map_err(|err| io::Error::other(format!("database migrations failed: {err}")))?;
    DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(|err| io::Error::other(format!("database pool creation failed: {err}")))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os()).map_err(invalid_config)?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(invalid_config)?;
    info!(
        fingerprint = %session.key_fingerprint(),
        ttl_hours = session.ttl_hours,
        "session key loaded"
    );

    let mut config = ServerConfig::new(
        session,
        settings.bind_addr().map_err(invalid_config)?,
        settings.upload_dir(),
    )
    .with_admin(settings.admin_credentials().map_err(invalid_config)?)
    .with_slug_policy(settings.slug_policy().map_err(invalid_config)?)
    .with_excerpt_length(settings.excerpt_length().map_err(invalid_config)?);

    if let Some(database_url) = settings.database_url() {
        config = config.with_db_pool(connect_database(database_url).await?);
    }

    info!(
        bind_addr = %config.bind_addr(),
        upload_dir = %config.upload_dir().display(),
        "starting server"
    );
    let health_state = web::Data::new(HealthState::default());
    create_server(health_state, config)?.await
}
