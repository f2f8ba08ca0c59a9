//! Driving port for article mutations.

use async_trait::async_trait;

use crate::domain::{ArticleDetail, ArticleDraft, ArticleId, Error, Slug};

/// Request payload for replacing an article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateArticleRequest {
    /// Article to replace.
    pub id: ArticleId,
    /// Validated replacement fields.
    pub draft: ArticleDraft,
    /// Explicit slug requested by the editor, if any.
    pub slug: Option<Slug>,
}

/// Domain use-case port for creating, updating and deleting articles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleCommand: Send + Sync {
    /// Store a new article under a freshly generated unique slug.
    async fn create(&self, draft: ArticleDraft) -> Result<ArticleDetail, Error>;

    /// Replace an existing article's fields.
    async fn update(&self, request: UpdateArticleRequest) -> Result<ArticleDetail, Error>;

    /// Remove an article.
    async fn delete(&self, id: ArticleId) -> Result<(), Error>;
}
