//! PostgreSQL-backed [`ArticleRepository`] using Diesel.

use async_trait::async_trait;
use diesel::dsl::{count_star, exists, select};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{ArticleRepository, ArticleRepositoryError};
use crate::domain::{Article, ArticleId, ArticleRevision, NewArticle, Slug};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{ArticleChangeset, ArticleRow, ArticleWithIdRow, NewArticleRow};
use super::pool::DbPool;
use super::schema::articles;

/// Diesel-backed article store.
#[derive(Clone)]
pub struct DieselArticleRepository {
    pool: DbPool,
}

impl DieselArticleRepository {
    /// Repository drawing connections from `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert `article` keeping its id; existing ids or slugs are skipped.
    ///
    /// Returns `true` when a row was written.
    pub async fn import(&self, article: &Article) -> Result<bool, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = ArticleWithIdRow {
            id: article.id.get(),
            title: &article.title,
            content: &article.content,
            author: &article.author,
            slug: article.slug.as_str(),
            created_at: article.created_at,
            preview_image: article.preview_image.as_deref(),
        };
        let written = diesel::insert_into(articles::table)
            .values(&row)
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, Some(article.slug.as_str())))?;
        Ok(written > 0)
    }

    /// Move the id sequence past the highest stored id after imports.
    pub async fn sync_id_sequence(&self) -> Result<(), ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::sql_query(
            "SELECT setval(pg_get_serial_sequence('articles', 'id'), \
             COALESCE((SELECT MAX(id) FROM articles), 0) + 1, false)",
        )
        .execute(&mut conn)
        .await
        .map_err(|err| map_diesel_error(err, None))?;
        Ok(())
    }
}

fn row_to_article(row: ArticleRow) -> Result<Article, ArticleRepositoryError> {
    let id = ArticleId::new(row.id).map_err(|err| {
        ArticleRepositoryError::query(format!("stored article id {}: {err}", row.id))
    })?;
    let slug = Slug::new(&row.slug).map_err(|err| {
        warn!(id = row.id, slug = %row.slug, "stored slug fails validation");
        ArticleRepositoryError::query(format!("stored slug {:?}: {err}", row.slug))
    })?;
    Ok(Article {
        id,
        title: row.title,
        content: row.content,
        author: row.author,
        slug,
        created_at: row.created_at,
        preview_image: row.preview_image,
    })
}

#[async_trait]
impl ArticleRepository for DieselArticleRepository {
    async fn insert(&self, article: &NewArticle) -> Result<Article, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewArticleRow {
            title: &article.title,
            content: &article.content,
            author: &article.author,
            slug: article.slug.as_str(),
            created_at: article.created_at,
            preview_image: article.preview_image.as_deref(),
        };
        let stored: ArticleRow = diesel::insert_into(articles::table)
            .values(&row)
            .returning(ArticleRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, Some(article.slug.as_str())))?;
        row_to_article(stored)
    }

    async fn update(
        &self,
        id: ArticleId,
        revision: &ArticleRevision,
    ) -> Result<Option<Article>, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = ArticleChangeset {
            title: &revision.title,
            content: &revision.content,
            author: &revision.author,
            slug: revision.slug.as_str(),
            preview_image: revision.preview_image.as_deref(),
        };
        let stored: Option<ArticleRow> = diesel::update(articles::table.find(id.get()))
            .set(&changes)
            .returning(ArticleRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, Some(revision.slug.as_str())))?;
        stored.map(row_to_article).transpose()
    }

    async fn delete(&self, id: ArticleId) -> Result<bool, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(articles::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))?;
        Ok(deleted > 0)
    }

    async fn find_by_id(&self, id: ArticleId) -> Result<Option<Article>, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ArticleRow> = articles::table
            .find(id.get())
            .select(ArticleRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;
        row.map(row_to_article).transpose()
    }

    async fn find_by_slug(&self, slug: &Slug) -> Result<Option<Article>, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ArticleRow> = articles::table
            .filter(articles::slug.eq(slug.as_str()))
            .select(ArticleRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;
        row.map(row_to_article).transpose()
    }

    async fn list(&self) -> Result<Vec<Article>, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ArticleRow> = articles::table
            .order((articles::created_at.desc(), articles::id.desc()))
            .select(ArticleRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))?;
        rows.into_iter().map(row_to_article).collect()
    }

    async fn count(&self) -> Result<u64, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = articles::table
            .select(count_star())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))?;
        u64::try_from(total)
            .map_err(|_| ArticleRepositoryError::query(format!("negative article count {total}")))
    }

    async fn slug_exists(
        &self,
        slug: &Slug,
        exclude: Option<ArticleId>,
    ) -> Result<bool, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let excluded_id = exclude.map_or(0, ArticleId::get);
        select(exists(
            articles::table
                .filter(articles::slug.eq(slug.as_str()))
                .filter(articles::id.ne(excluded_id)),
        ))
        .get_result(&mut conn)
        .await
        .map_err(|err| map_diesel_error(err, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn row(id: i64, slug: &str) -> ArticleRow {
        ArticleRow {
            id,
            title: "Title".to_owned(),
            content: "Body".to_owned(),
            author: "Ada".to_owned(),
            slug: slug.to_owned(),
            created_at: Utc
                .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
                .single()
                .expect("valid timestamp"),
            preview_image: Some("/uploads/1-a.png".to_owned()),
        }
    }

    #[rstest]
    fn converts_valid_rows() {
        let article = row_to_article(row(3, "title")).expect("valid row");
        assert_eq!(article.id.get(), 3);
        assert_eq!(article.slug.as_str(), "title");
        assert_eq!(article.preview_image.as_deref(), Some("/uploads/1-a.png"));
    }

    #[rstest]
    #[case(0, "title")]
    #[case(3, "Bad Slug")]
    fn rejects_corrupt_rows(#[case] id: i64, #[case] slug: &str) {
        let error = row_to_article(row(id, slug)).expect_err("corrupt row");
        assert!(matches!(error, ArticleRepositoryError::Query { .. }));
    }
}
