//! [`ArticleRepository`] kept in process memory.
//!
//! Used when no database URL is configured and by HTTP tests. A single
//! mutex serialises every operation, so the slug uniqueness check inside
//! `insert` and `update` is exact.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{ArticleRepository, ArticleRepositoryError};
use crate::domain::{Article, ArticleId, ArticleRevision, NewArticle, Slug};

#[derive(Debug, Default)]
struct Store {
    articles: BTreeMap<ArticleId, Article>,
    last_id: i64,
}

impl Store {
    fn slug_held_by_other(&self, slug: &Slug, exclude: Option<ArticleId>) -> bool {
        self.articles
            .values()
            .any(|article| article.slug == *slug && Some(article.id) != exclude)
    }
}

/// Mutex-guarded article map.
#[derive(Debug, Default)]
pub struct InMemoryArticleRepository {
    store: Mutex<Store>,
}

impl InMemoryArticleRepository {
    /// Empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Store>, ArticleRepositoryError> {
        self.store
            .lock()
            .map_err(|_| ArticleRepositoryError::query("article store lock poisoned"))
    }
}

#[async_trait]
impl ArticleRepository for InMemoryArticleRepository {
    async fn insert(&self, article: &NewArticle) -> Result<Article, ArticleRepositoryError> {
        let mut store = self.lock()?;
        if store.slug_held_by_other(&article.slug, None) {
            return Err(ArticleRepositoryError::duplicate_slug(article.slug.as_str()));
        }
        let next = store.last_id.saturating_add(1);
        let id = ArticleId::new(next)
            .map_err(|err| ArticleRepositoryError::query(format!("id allocation: {err}")))?;
        store.last_id = next;
        let stored = article.clone().into_article(id);
        store.articles.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        id: ArticleId,
        revision: &ArticleRevision,
    ) -> Result<Option<Article>, ArticleRepositoryError> {
        let mut store = self.lock()?;
        if !store.articles.contains_key(&id) {
            return Ok(None);
        }
        if store.slug_held_by_other(&revision.slug, Some(id)) {
            return Err(ArticleRepositoryError::duplicate_slug(revision.slug.as_str()));
        }
        let Some(existing) = store.articles.get_mut(&id) else {
            return Ok(None);
        };
        *existing = revision.clone().apply_to(existing);
        Ok(Some(existing.clone()))
    }

    async fn delete(&self, id: ArticleId) -> Result<bool, ArticleRepositoryError> {
        Ok(self.lock()?.articles.remove(&id).is_some())
    }

    async fn find_by_id(&self, id: ArticleId) -> Result<Option<Article>, ArticleRepositoryError> {
        Ok(self.lock()?.articles.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &Slug) -> Result<Option<Article>, ArticleRepositoryError> {
        Ok(self
            .lock()?
            .articles
            .values()
            .find(|article| article.slug == *slug)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Article>, ArticleRepositoryError> {
        let mut articles: Vec<Article> = self.lock()?.articles.values().cloned().collect();
        articles.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(articles)
    }

    async fn count(&self) -> Result<u64, ArticleRepositoryError> {
        let total = self.lock()?.articles.len();
        u64::try_from(total).map_err(|_| ArticleRepositoryError::query("article count overflow"))
    }

    async fn slug_exists(
        &self,
        slug: &Slug,
        exclude: Option<ArticleId>,
    ) -> Result<bool, ArticleRepositoryError> {
        Ok(self.lock()?.slug_held_by_other(slug, exclude))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use rstest::{fixture, rstest};

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, day, 10, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn new_article(slug: &str, day: u32) -> NewArticle {
        NewArticle {
            title: slug.to_owned(),
            content: "Body".to_owned(),
            author: "Ada".to_owned(),
            slug: Slug::new(slug).expect("valid slug"),
            created_at: at(day),
            preview_image: None,
        }
    }

    fn revision(slug: &str) -> ArticleRevision {
        ArticleRevision {
            title: "Renamed".to_owned(),
            content: "New body".to_owned(),
            author: "Grace".to_owned(),
            slug: Slug::new(slug).expect("valid slug"),
            preview_image: Some("https://example.com/a.png".to_owned()),
        }
    }

    #[fixture]
    fn repo() -> InMemoryArticleRepository {
        InMemoryArticleRepository::new()
    }

    #[rstest]
    #[tokio::test]
    async fn assigns_sequential_ids_and_lists_newest_first(repo: InMemoryArticleRepository) {
        let first = repo.insert(&new_article("first", 1)).await.expect("insert");
        let second = repo.insert(&new_article("second", 5)).await.expect("insert");
        assert_eq!((first.id.get(), second.id.get()), (1, 2));

        let slugs: Vec<String> = repo
            .list()
            .await
            .expect("list")
            .into_iter()
            .map(|article| article.slug.to_string())
            .collect();
        assert_eq!(slugs, vec!["second", "first"]);
        assert_eq!(repo.count().await.expect("count"), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn rejects_duplicate_slugs(repo: InMemoryArticleRepository) {
        repo.insert(&new_article("taken", 1)).await.expect("insert");
        let error = repo
            .insert(&new_article("taken", 2))
            .await
            .expect_err("duplicate");
        assert_eq!(error, ArticleRepositoryError::duplicate_slug("taken"));
    }

    #[rstest]
    #[tokio::test]
    async fn update_replaces_fields_but_keeps_creation_time(repo: InMemoryArticleRepository) {
        let stored = repo.insert(&new_article("post", 3)).await.expect("insert");
        let updated = repo
            .update(stored.id, &revision("post"))
            .await
            .expect("update")
            .expect("present");
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.created_at, at(3));
        assert_eq!(
            repo.find_by_slug(&updated.slug).await.expect("find"),
            Some(updated)
        );
    }

    #[rstest]
    #[tokio::test]
    async fn update_guards_slugs_held_by_others(repo: InMemoryArticleRepository) {
        repo.insert(&new_article("one", 1)).await.expect("insert");
        let two = repo.insert(&new_article("two", 2)).await.expect("insert");
        let error = repo
            .update(two.id, &revision("one"))
            .await
            .expect_err("duplicate");
        assert_eq!(error, ArticleRepositoryError::duplicate_slug("one"));
    }

    #[rstest]
    #[tokio::test]
    async fn missing_articles_are_reported(repo: InMemoryArticleRepository) {
        let id = ArticleId::new(42).expect("valid id");
        assert!(repo.update(id, &revision("x")).await.expect("ok").is_none());
        assert!(!repo.delete(id).await.expect("ok"));
        assert!(repo.find_by_id(id).await.expect("ok").is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn missing_article_wins_over_slug_conflict(repo: InMemoryArticleRepository) {
        repo.insert(&new_article("taken", 1)).await.expect("insert");
        let id = ArticleId::new(99).expect("valid id");
        assert!(repo.update(id, &revision("taken")).await.expect("ok").is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn slug_exists_honours_exclusion(repo: InMemoryArticleRepository) {
        let stored = repo.insert(&new_article("mine", 1)).await.expect("insert");
        let slug = Slug::new("mine").expect("valid slug");
        assert!(repo.slug_exists(&slug, None).await.expect("ok"));
        assert!(!repo.slug_exists(&slug, Some(stored.id)).await.expect("ok"));
    }
}
