//! Driving port for read-only article use-cases.

use std::fmt;

use async_trait::async_trait;
use chrono::Datelike;

use crate::domain::{Article, ArticleDetail, ArticleSummary, Error, Timeline};

/// Validation errors for [`ArticleListFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleListFilterError {
    /// A month was supplied without a year.
    MonthWithoutYear,
    /// The month was outside `1..=12`.
    MonthOutOfRange,
}

impl fmt::Display for ArticleListFilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MonthWithoutYear => write!(f, "month filter requires a year"),
            Self::MonthOutOfRange => write!(f, "month must be between 1 and 12"),
        }
    }
}

impl std::error::Error for ArticleListFilterError {}

/// Optional calendar filter for article listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArticleListFilter {
    year: Option<i32>,
    month: Option<u32>,
}

impl ArticleListFilter {
    /// No filtering.
    pub const fn all() -> Self {
        Self {
            year: None,
            month: None,
        }
    }

    /// Validate a year/month pair.
    ///
    /// # Examples
    /// ```
    /// use blog_backend::domain::ports::ArticleListFilter;
    ///
    /// assert!(ArticleListFilter::new(Some(2024), Some(3)).is_ok());
    /// assert!(ArticleListFilter::new(None, Some(3)).is_err());
    /// ```
    pub fn new(year: Option<i32>, month: Option<u32>) -> Result<Self, ArticleListFilterError> {
        if let Some(month) = month {
            if year.is_none() {
                return Err(ArticleListFilterError::MonthWithoutYear);
            }
            if !(1..=12).contains(&month) {
                return Err(ArticleListFilterError::MonthOutOfRange);
            }
        }
        Ok(Self { year, month })
    }

    /// Year restriction, if any.
    pub fn year(&self) -> Option<i32> {
        self.year
    }

    /// Month restriction, if any.
    pub fn month(&self) -> Option<u32> {
        self.month
    }

    /// `true` when `article` was created inside the filtered period.
    pub fn matches(&self, article: &Article) -> bool {
        let created = article.created_at;
        self.year.is_none_or(|year| created.year() == year)
            && self.month.is_none_or(|month| created.month() == month)
    }
}

/// Domain use-case port for reading articles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleQuery: Send + Sync {
    /// Summaries newest first, restricted by `filter`.
    async fn list(&self, filter: ArticleListFilter) -> Result<Vec<ArticleSummary>, Error>;

    /// Resolve a numeric id or a slug to the full article.
    async fn find(&self, id_or_slug: &str) -> Result<ArticleDetail, Error>;

    /// Archive grouping of every article.
    async fn timeline(&self) -> Result<Timeline, Error>;

    /// Number of stored articles.
    async fn count(&self) -> Result<u64, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ArticleId, Slug};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn created(year: i32, month: u32) -> Article {
        Article {
            id: ArticleId::new(1).expect("valid id"),
            title: "Title".to_owned(),
            content: "Body".to_owned(),
            author: "Ada".to_owned(),
            slug: Slug::new("title").expect("valid slug"),
            created_at: Utc
                .with_ymd_and_hms(year, month, 10, 12, 0, 0)
                .single()
                .expect("valid date"),
            preview_image: None,
        }
    }

    #[rstest]
    #[case(None, Some(1), ArticleListFilterError::MonthWithoutYear)]
    #[case(Some(2024), Some(0), ArticleListFilterError::MonthOutOfRange)]
    #[case(Some(2024), Some(13), ArticleListFilterError::MonthOutOfRange)]
    fn rejects_invalid_filters(
        #[case] year: Option<i32>,
        #[case] month: Option<u32>,
        #[case] expected: ArticleListFilterError,
    ) {
        assert_eq!(ArticleListFilter::new(year, month), Err(expected));
    }

    #[rstest]
    #[case(None, None, true)]
    #[case(Some(2024), None, true)]
    #[case(Some(2023), None, false)]
    #[case(Some(2024), Some(5), true)]
    #[case(Some(2024), Some(6), false)]
    fn matches_creation_period(
        #[case] year: Option<i32>,
        #[case] month: Option<u32>,
        #[case] expected: bool,
    ) {
        let filter = ArticleListFilter::new(year, month).expect("valid filter");
        assert_eq!(filter.matches(&created(2024, 5)), expected);
    }
}
