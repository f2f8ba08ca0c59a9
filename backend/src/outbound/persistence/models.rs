//! Internal Diesel row structs for the `articles` table.
//!
//! These types never leave the persistence layer.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::articles;

/// Row read from `articles`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = articles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ArticleRow {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub preview_image: Option<String>,
}

/// Insertable article; the database assigns `id`.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = articles)]
pub(crate) struct NewArticleRow<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub author: &'a str,
    pub slug: &'a str,
    pub created_at: DateTime<Utc>,
    pub preview_image: Option<&'a str>,
}

/// Insertable row with an explicit id, used when copying between databases.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = articles)]
pub(crate) struct ArticleWithIdRow<'a> {
    pub id: i64,
    pub title: &'a str,
    pub content: &'a str,
    pub author: &'a str,
    pub slug: &'a str,
    pub created_at: DateTime<Utc>,
    pub preview_image: Option<&'a str>,
}

/// Full replacement of mutable columns.
///
/// `treat_none_as_null` lets an update clear the preview image.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = articles)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ArticleChangeset<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub author: &'a str,
    pub slug: &'a str,
    pub preview_image: Option<&'a str>,
}
