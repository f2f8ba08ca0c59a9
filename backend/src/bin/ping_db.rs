//! Keep a hosted database awake by creating and deleting a throwaway article.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::io;
use std::sync::Arc;

use blog_backend::domain::ports::ArticleCommand;
use blog_backend::domain::{ArticleDraft, ArticleService};
use blog_backend::outbound::persistence::{DbPool, DieselArticleRepository, PoolConfig};
use clap::Parser;
use mockable::{Clock, DefaultClock};
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// `ping-db` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ping-db",
    about = "Create and delete a throwaway article to keep the database active",
    version
)]
struct CliArgs {
    /// Database connection URL. Falls back to `BLOG_DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> io::Result<()> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    if let Err(error) = fmt().with_env_filter(EnvFilter::from_default_env()).try_init() {
        warn!(%error, "tracing init failed");
    }

    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let database_url = resolve_database_url(args.database_url)?;
    let pool = DbPool::new(PoolConfig::new(&database_url).with_max_size(1))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;

    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let title = format!("ping-{}", clock.utc().timestamp_millis());
    let service = ArticleService::new(Arc::new(DieselArticleRepository::new(pool)), clock);

    let draft = ArticleDraft::try_from_parts(&title, "ping-db", "Keep-alive probe.", None)
        .map_err(io::Error::other)?;
    let created = service
        .create(draft)
        .await
        .map_err(|error| io::Error::other(format!("create ping article: {error}")))?;
    let id = created.article.id;
    service
        .delete(id)
        .await
        .map_err(|error| io::Error::other(format!("delete ping article {id}: {error}")))?;

    info!(%id, slug = %created.article.slug, "database ping succeeded");
    Ok(())
}

fn resolve_database_url(cli_value: Option<String>) -> io::Result<String> {
    cli_value
        .or_else(|| env::var("BLOG_DATABASE_URL").ok())
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "missing database URL: pass --database-url or set BLOG_DATABASE_URL",
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn cli_url_is_used_when_present() {
        let url = resolve_database_url(Some("postgres://localhost/blog".to_owned()))
            .expect("url resolves");
        assert_eq!(url, "postgres://localhost/blog");
    }

    #[rstest]
    fn blank_url_is_rejected() {
        let _guard = env_lock::lock_env([("BLOG_DATABASE_URL", None::<&str>)]);
        let error = resolve_database_url(Some("  ".to_owned())).expect_err("blank url");
        assert_eq!(error.kind(), io::ErrorKind::InvalidInput);
    }
}
