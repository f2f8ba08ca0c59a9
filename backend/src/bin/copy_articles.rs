//! Copy every article from one PostgreSQL database into another.
//!
//! The target schema is migrated first. Articles keep their ids; rows whose
//! id or slug already exists in the target are skipped. The target's id
//! sequence is advanced past the copied ids afterwards.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io::{self, Write};

use blog_backend::domain::ports::ArticleRepository;
use blog_backend::outbound::persistence::{
    DbPool, DieselArticleRepository, PoolConfig, run_pending_migrations,
};
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, bail};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// `copy-articles` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "copy-articles",
    about = "Copy articles between databases, skipping ones already present",
    version
)]
struct CliArgs {
    /// Database to read articles from.
    #[arg(long = "source", value_name = "url")]
    source: String,
    /// Database to write articles into.
    #[arg(long = "target", value_name = "url")]
    target: String,
}

/// Outcome counters for one copy run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct CopySummary {
    copied: usize,
    skipped: usize,
    failed: usize,
}

impl CopySummary {
    fn total(self) -> usize {
        self.copied + self.skipped + self.failed
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(error) = fmt().with_env_filter(EnvFilter::from_default_env()).try_init() {
        warn!(%error, "tracing init failed");
    }

    let args = CliArgs::parse();
    if args.source == args.target {
        bail!("source and target must be different databases");
    }

    let source = connect(&args.source).await.wrap_err("connect to source")?;
    run_pending_migrations(&args.target)
        .await
        .wrap_err("migrate target schema")?;
    let target = connect(&args.target).await.wrap_err("connect to target")?;

    let articles = source.list().await.wrap_err("list source articles")?;
    info!(count = articles.len(), "copying articles");

    let mut summary = CopySummary::default();
    for article in &articles {
        match target.import(article).await {
            Ok(true) => summary.copied += 1,
            Ok(false) => {
                info!(id = %article.id, slug = %article.slug, "already present; skipped");
                summary.skipped += 1;
            }
            Err(error) => {
                warn!(id = %article.id, slug = %article.slug, %error, "copy failed");
                summary.failed += 1;
            }
        }
    }
    target
        .sync_id_sequence()
        .await
        .wrap_err("advance target id sequence")?;

    let mut stdout = io::stdout().lock();
    writeln!(
        stdout,
        "articles: {} copied, {} skipped, {} failed ({} total)",
        summary.copied,
        summary.skipped,
        summary.failed,
        summary.total()
    )?;

    if summary.failed > 0 {
        bail!("{} article(s) could not be copied", summary.failed);
    }
    Ok(())
}

async fn connect(database_url: &str) -> Result<DieselArticleRepository> {
    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(2)).await?;
    Ok(DieselArticleRepository::new(pool))
}
