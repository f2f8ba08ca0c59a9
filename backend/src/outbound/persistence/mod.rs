//! PostgreSQL persistence adapters using Diesel and `diesel-async`.
//!
//! Row structs (`models.rs`) and table definitions (`schema.rs`) stay private
//! to this module; repositories translate them into domain types and map
//! database failures into port errors.
//!
//! ```no_run
//! use blog_backend::outbound::persistence::{DbPool, DieselArticleRepository, PoolConfig};
//!
//! # async fn connect() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/blog")).await?;
//! let repository = DieselArticleRepository::new(pool);
//! # let _ = repository;
//! # Ok(())
//! # }
//! ```

mod diesel_article_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_article_repository::DieselArticleRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
