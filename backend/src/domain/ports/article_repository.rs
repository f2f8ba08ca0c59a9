//! Driven port for article persistence.
//!
//! Adapters must enforce slug uniqueness themselves (a unique index in
//! PostgreSQL, a scan under lock in memory) and report collisions as
//! [`ArticleRepositoryError::DuplicateSlug`]. The slug generator's lookups
//! are advisory; this constraint is the authoritative guard.

use async_trait::async_trait;

use crate::domain::{Article, ArticleId, ArticleRevision, NewArticle, Slug};

use super::define_port_error;

define_port_error! {
    /// Errors raised by article repository adapters.
    pub enum ArticleRepositoryError {
        /// Storage could not be reached.
        Connection { message: String } =>
            "article repository connection failed: {message}",
        /// A query or mutation failed during execution.
        Query { message: String } =>
            "article repository query failed: {message}",
        /// Another article already holds the slug.
        DuplicateSlug { slug: String } =>
            "slug already in use: {slug}",
    }
}

/// Port for storing and retrieving articles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Insert a new article and return it with its assigned id.
    async fn insert(&self, article: &NewArticle) -> Result<Article, ArticleRepositoryError>;

    /// Replace the mutable fields of an article.
    ///
    /// Returns `None` when no article has the id, even if the new slug is
    /// held elsewhere.
    async fn update(
        &self,
        id: ArticleId,
        revision: &ArticleRevision,
    ) -> Result<Option<Article>, ArticleRepositoryError>;

    /// Delete an article, returning `false` when it did not exist.
    async fn delete(&self, id: ArticleId) -> Result<bool, ArticleRepositoryError>;

    /// Article stored under `id`.
    async fn find_by_id(&self, id: ArticleId) -> Result<Option<Article>, ArticleRepositoryError>;

    /// Article holding `slug`.
    async fn find_by_slug(&self, slug: &Slug) -> Result<Option<Article>, ArticleRepositoryError>;

    /// Every article, newest first (ties broken by descending id).
    async fn list(&self) -> Result<Vec<Article>, ArticleRepositoryError>;

    /// Number of stored articles.
    async fn count(&self) -> Result<u64, ArticleRepositoryError>;

    /// `true` when an article other than `exclude` holds `slug`.
    async fn slug_exists(
        &self,
        slug: &Slug,
        exclude: Option<ArticleId>,
    ) -> Result<bool, ArticleRepositoryError>;
}
