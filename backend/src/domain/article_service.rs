//! Article use-cases.
//!
//! [`ArticleService`] implements the [`ArticleCommand`] and [`ArticleQuery`]
//! driving ports on top of an [`ArticleRepository`]. It owns slug
//! allocation, creation timestamps, excerpts and HTML rendering.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    ArticleCommand, ArticleListFilter, ArticleQuery, ArticleRepository, ArticleRepositoryError,
    RepositorySlugLookup, SlugLookup, UpdateArticleRequest,
};
use crate::domain::{
    Article, ArticleDetail, ArticleDraft, ArticleId, ArticleRevision, ArticleSummary, Error,
    ExcerptGenerator, NewArticle, Slug, SlugGenerationError, SlugPolicy, Timeline,
    build_timeline, generate_unique_slug, render_markdown,
};

/// Times a write is retried when storage reports a slug collision that the
/// lookup did not see.
pub const MAX_SLUG_WRITE_ATTEMPTS: u32 = 3;

fn map_repository_error(error: ArticleRepositoryError) -> Error {
    match error {
        ArticleRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("article repository unavailable: {message}"))
        }
        ArticleRepositoryError::Query { message } => {
            Error::internal(format!("article repository error: {message}"))
        }
        ArticleRepositoryError::DuplicateSlug { slug } => slug_conflict(&slug),
    }
}

fn map_slug_error(error: SlugGenerationError<ArticleRepositoryError>) -> Error {
    match error {
        SlugGenerationError::Exhausted { base, attempts } => Error::conflict(
            "slug space exhausted",
        )
        .with_details(json!({
            "field": "slug",
            "code": "slug_exhausted",
            "base": base.as_str(),
            "attempts": attempts,
        })),
        SlugGenerationError::Lookup(inner) => map_repository_error(inner),
    }
}

fn slug_conflict(slug: &str) -> Error {
    Error::conflict(format!("slug already in use: {slug}")).with_details(json!({
        "field": "slug",
        "code": "duplicate_slug",
        "slug": slug,
    }))
}

fn not_found(reference: impl std::fmt::Display) -> Error {
    Error::not_found(format!("article not found: {reference}"))
}

/// How the slug of an updated article is chosen.
enum SlugChoice {
    Keep(Slug),
    Requested(Slug),
    Regenerate,
}

/// Article service implementing the article driving ports.
pub struct ArticleService<R: ?Sized> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    slug_policy: SlugPolicy,
    excerpts: ExcerptGenerator,
}

impl<R: ?Sized> Clone for ArticleService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
            slug_policy: self.slug_policy,
            excerpts: self.excerpts.clone(),
        }
    }
}

impl<R: ?Sized> ArticleService<R> {
    /// Create a service with the default slug policy and excerpt length.
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            clock,
            slug_policy: SlugPolicy::default(),
            excerpts: ExcerptGenerator::default(),
        }
    }

    /// Override the slug collision budget.
    #[must_use]
    pub fn with_slug_policy(mut self, slug_policy: SlugPolicy) -> Self {
        self.slug_policy = slug_policy;
        self
    }

    /// Override the excerpt length used for list views.
    #[must_use]
    pub fn with_excerpt_length(mut self, max_length: usize) -> Self {
        self.excerpts = ExcerptGenerator::new(max_length);
        self
    }
}

impl<R> ArticleService<R>
where
    R: ArticleRepository + ?Sized,
{
    fn summarize(&self, article: Article) -> ArticleSummary {
        let excerpt = self.excerpts.generate(&article.content);
        ArticleSummary::from_article(article, excerpt)
    }

    fn detail(&self, article: Article) -> ArticleDetail {
        ArticleDetail {
            excerpt: self.excerpts.generate(&article.content),
            content_html: render_markdown(&article.content),
            article,
        }
    }

    async fn unique_slug(&self, title: &str, exclude: Option<ArticleId>) -> Result<Slug, Error> {
        let lookup = RepositorySlugLookup::new(self.repository.as_ref());
        generate_unique_slug(title, &lookup, exclude, &self.slug_policy)
            .await
            .map_err(map_slug_error)
    }

    async fn existing(&self, id: ArticleId) -> Result<Article, Error> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(id))
    }

    async fn choose_slug(
        &self,
        existing: &Article,
        draft: &ArticleDraft,
        requested: Option<Slug>,
    ) -> Result<SlugChoice, Error> {
        if let Some(slug) = requested.filter(|slug| *slug != existing.slug) {
            let lookup = RepositorySlugLookup::new(self.repository.as_ref());
            let taken = lookup
                .slug_taken(&slug, Some(existing.id))
                .await
                .map_err(map_repository_error)?;
            if taken {
                return Err(slug_conflict(slug.as_str()));
            }
            return Ok(SlugChoice::Requested(slug));
        }
        if draft.title() != existing.title {
            return Ok(SlugChoice::Regenerate);
        }
        Ok(SlugChoice::Keep(existing.slug.clone()))
    }

    async fn resolve(&self, id_or_slug: &str) -> Result<Option<Article>, Error> {
        let reference = id_or_slug.trim();
        if let Ok(id) = reference.parse::<ArticleId>() {
            if let Some(article) = self
                .repository
                .find_by_id(id)
                .await
                .map_err(map_repository_error)?
            {
                return Ok(Some(article));
            }
        }
        let Ok(slug) = Slug::new(reference) else {
            return Ok(None);
        };
        self.repository
            .find_by_slug(&slug)
            .await
            .map_err(map_repository_error)
    }
}

#[async_trait]
impl<R> ArticleCommand for ArticleService<R>
where
    R: ArticleRepository + ?Sized,
{
    async fn create(&self, draft: ArticleDraft) -> Result<ArticleDetail, Error> {
        let created_at = self.clock.utc();
        let mut last_slug = None;
        for attempt in 1..=MAX_SLUG_WRITE_ATTEMPTS {
            let slug = self.unique_slug(draft.title(), None).await?;
            let new_article = NewArticle::from_draft(draft.clone(), slug, created_at);
            match self.repository.insert(&new_article).await {
                Ok(article) => {
                    info!(id = %article.id, slug = %article.slug, "created article");
                    return Ok(self.detail(article));
                }
                Err(ArticleRepositoryError::DuplicateSlug { slug }) => {
                    warn!(%slug, attempt, "slug taken concurrently; retrying");
                    last_slug = Some(slug);
                }
                Err(other) => return Err(map_repository_error(other)),
            }
        }
        Err(slug_conflict(last_slug.as_deref().unwrap_or_default()))
    }

    async fn update(&self, request: UpdateArticleRequest) -> Result<ArticleDetail, Error> {
        let UpdateArticleRequest { id, draft, slug } = request;
        let existing = self.existing(id).await?;
        let choice = self.choose_slug(&existing, &draft, slug).await?;

        let mut last_slug = None;
        for attempt in 1..=MAX_SLUG_WRITE_ATTEMPTS {
            let (slug, retryable) = match &choice {
                SlugChoice::Keep(slug) | SlugChoice::Requested(slug) => (slug.clone(), false),
                SlugChoice::Regenerate => (self.unique_slug(draft.title(), Some(id)).await?, true),
            };
            let revision = ArticleRevision::from_draft(draft.clone(), slug);
            match self.repository.update(id, &revision).await {
                Ok(Some(article)) => {
                    info!(id = %article.id, slug = %article.slug, "updated article");
                    return Ok(self.detail(article));
                }
                Ok(None) => return Err(not_found(id)),
                Err(ArticleRepositoryError::DuplicateSlug { slug }) if retryable => {
                    warn!(%slug, attempt, "slug taken concurrently; retrying");
                    last_slug = Some(slug);
                }
                Err(other) => return Err(map_repository_error(other)),
            }
        }
        Err(slug_conflict(last_slug.as_deref().unwrap_or_default()))
    }

    async fn delete(&self, id: ArticleId) -> Result<(), Error> {
        let deleted = self
            .repository
            .delete(id)
            .await
            .map_err(map_repository_error)?;
        if deleted {
            info!(%id, "deleted article");
            Ok(())
        } else {
            Err(not_found(id))
        }
    }
}

#[async_trait]
impl<R> ArticleQuery for ArticleService<R>
where
    R: ArticleRepository + ?Sized,
{
    async fn list(&self, filter: ArticleListFilter) -> Result<Vec<ArticleSummary>, Error> {
        let articles = self
            .repository
            .list()
            .await
            .map_err(map_repository_error)?;
        Ok(articles
            .into_iter()
            .filter(|article| filter.matches(article))
            .map(|article| self.summarize(article))
            .collect())
    }

    async fn find(&self, id_or_slug: &str) -> Result<ArticleDetail, Error> {
        self.resolve(id_or_slug)
            .await?
            .map(|article| self.detail(article))
            .ok_or_else(|| not_found(id_or_slug.trim()))
    }

    async fn timeline(&self) -> Result<Timeline, Error> {
        let articles = self
            .repository
            .list()
            .await
            .map_err(map_repository_error)?;
        Ok(build_timeline(&articles))
    }

    async fn count(&self) -> Result<u64, Error> {
        self.repository.count().await.map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "article_service_tests.rs"]
mod tests;
