//! Archive view grouping articles by year and month.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::article::{Article, ArticleId};
use super::slug::Slug;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Articles grouped newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    /// Number of articles across all years.
    pub total: usize,
    /// Years, newest first.
    pub years: Vec<TimelineYear>,
}

/// One calendar year of articles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimelineYear {
    /// Calendar year.
    pub year: i32,
    /// Articles in the year.
    pub count: usize,
    /// Months, newest first.
    pub months: Vec<TimelineMonth>,
}

/// One calendar month of articles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimelineMonth {
    /// 1-based month number.
    pub month: u32,
    /// English month name.
    pub name: String,
    /// Articles in the month.
    pub count: usize,
    /// Articles, newest first.
    pub articles: Vec<TimelineEntry>,
}

/// Minimal article reference shown in the archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    /// Article identifier.
    pub id: ArticleId,
    /// Display title.
    pub title: String,
    /// URL slug.
    #[schema(value_type = String)]
    pub slug: Slug,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

fn month_name(month: u32) -> String {
    usize::try_from(month)
        .ok()
        .and_then(|number| number.checked_sub(1))
        .and_then(|index| MONTH_NAMES.get(index))
        .map_or_else(|| month.to_string(), |name| (*name).to_owned())
}

/// Group `articles` by the year and month of their creation time.
///
/// Years and months are ordered newest first, as are the articles inside
/// each month, whatever order the input arrives in.
pub fn build_timeline<'a, I>(articles: I) -> Timeline
where
    I: IntoIterator<Item = &'a Article>,
{
    let mut grouped: BTreeMap<i32, BTreeMap<u32, Vec<TimelineEntry>>> = BTreeMap::new();
    let mut total = 0_usize;
    for article in articles {
        total = total.saturating_add(1);
        let created = article.created_at;
        grouped
            .entry(created.year())
            .or_default()
            .entry(created.month())
            .or_default()
            .push(TimelineEntry {
                id: article.id,
                title: article.title.clone(),
                slug: article.slug.clone(),
                created_at: created,
            });
    }

    let years = grouped
        .into_iter()
        .rev()
        .map(|(year, months)| {
            let months: Vec<TimelineMonth> = months
                .into_iter()
                .rev()
                .map(|(month, mut entries)| {
                    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
                    TimelineMonth {
                        month,
                        name: month_name(month),
                        count: entries.len(),
                        articles: entries,
                    }
                })
                .collect();
            TimelineYear {
                year,
                count: months.iter().map(|month| month.count).sum(),
                months,
            }
        })
        .collect();

    Timeline { total, years }
}
