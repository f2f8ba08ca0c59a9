//! Driven port answering "is this slug already used?".
//!
//! The slug generator only needs this single question, so it depends on this
//! narrow trait instead of the full article repository.

use async_trait::async_trait;

use crate::domain::{ArticleId, Slug};

use super::{ArticleRepository, ArticleRepositoryError};

/// Lookup consulted while probing slug candidates.
#[async_trait]
pub trait SlugLookup: Send + Sync {
    /// Failure raised by the backing store.
    type Error: std::error::Error + Send + Sync + 'static;

    /// `true` when an article other than `exclude` already holds `slug`.
    async fn slug_taken(&self, slug: &Slug, exclude: Option<ArticleId>)
    -> Result<bool, Self::Error>;
}

/// Adapts any [`ArticleRepository`] into a [`SlugLookup`].
pub struct RepositorySlugLookup<'a, R: ?Sized> {
    repository: &'a R,
}

impl<'a, R: ?Sized> RepositorySlugLookup<'a, R> {
    /// Borrow `repository` for slug probes.
    pub fn new(repository: &'a R) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R> SlugLookup for RepositorySlugLookup<'_, R>
where
    R: ArticleRepository + ?Sized,
{
    type Error = ArticleRepositoryError;

    async fn slug_taken(
        &self,
        slug: &Slug,
        exclude: Option<ArticleId>,
    ) -> Result<bool, Self::Error> {
        self.repository.slug_exists(slug, exclude).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockArticleRepository;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn delegates_to_repository() {
        let id = ArticleId::new(3).expect("valid id");
        let slug = Slug::new("hello-world").expect("valid slug");
        let mut repo = MockArticleRepository::new();
        repo.expect_slug_exists()
            .with(eq(slug.clone()), eq(Some(id)))
            .times(1)
            .return_once(|_, _| Ok(true));

        let lookup = RepositorySlugLookup::new(&repo);
        let taken = lookup.slug_taken(&slug, Some(id)).await.expect("lookup");
        assert!(taken);
    }

    #[tokio::test]
    async fn propagates_repository_errors() {
        let mut repo = MockArticleRepository::new();
        repo.expect_slug_exists()
            .times(1)
            .return_once(|_, _| Err(ArticleRepositoryError::connection("refused")));

        let lookup = RepositorySlugLookup::new(&repo);
        let slug = Slug::new("a").expect("valid slug");
        let error = lookup.slug_taken(&slug, None).await.expect_err("error");
        assert_eq!(error, ArticleRepositoryError::connection("refused"));
    }
}
