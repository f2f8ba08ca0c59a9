//! Translation of pool and Diesel failures into article repository errors.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::ArticleRepositoryError;

use super::pool::PoolError;

/// Name of the unique constraint guarding `articles.slug`.
pub(crate) const SLUG_CONSTRAINT: &str = "articles_slug_key";

pub(crate) fn map_pool_error(error: PoolError) -> ArticleRepositoryError {
    ArticleRepositoryError::connection(error.message())
}

/// Map a Diesel error raised while writing `slug`.
///
/// Unique violations on the slug constraint become
/// [`ArticleRepositoryError::DuplicateSlug`] so the service can retry.
pub(crate) fn map_diesel_error(error: DieselError, slug: Option<&str>) -> ArticleRepositoryError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info)
            if info.constraint_name() == Some(SLUG_CONSTRAINT) =>
        {
            ArticleRepositoryError::duplicate_slug(slug.unwrap_or_default())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ArticleRepositoryError::connection("database connection error")
        }
        DieselError::NotFound => ArticleRepositoryError::query("record not found"),
        DieselError::QueryBuilderError(_) => ArticleRepositoryError::query("database query error"),
        _ => ArticleRepositoryError::query("database error"),
    }
}
