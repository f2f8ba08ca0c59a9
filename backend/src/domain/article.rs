//! Article entities and validated inputs.
//!
//! Handlers build an [`ArticleDraft`] from request payloads; the article
//! service turns drafts into [`NewArticle`] or [`ArticleRevision`] values once
//! a slug has been settled, and repositories hand back full [`Article`]s.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::slug::Slug;
use super::upload::UPLOADS_URL_PREFIX as UPLOADS_PREFIX;

/// Maximum title length in characters.
pub const TITLE_MAX: usize = 200;
/// Maximum author name length in characters.
pub const AUTHOR_MAX: usize = 100;


/// Validation errors for article identifiers and drafts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleValidationError {
    /// Identifiers are positive integers.
    InvalidId,
    /// Title was blank once trimmed.
    EmptyTitle,
    /// Title exceeded [`TITLE_MAX`] characters.
    TitleTooLong { max: usize },
    /// Author was blank once trimmed.
    EmptyAuthor,
    /// Author exceeded [`AUTHOR_MAX`] characters.
    AuthorTooLong { max: usize },
    /// Content was blank.
    EmptyContent,
    /// Preview image was neither an http(s) URL nor an uploads path.
    InvalidPreviewImage,
}

impl ArticleValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "id",
            Self::EmptyTitle | Self::TitleTooLong { .. } => "title",
            Self::EmptyAuthor | Self::AuthorTooLong { .. } => "author",
            Self::EmptyContent => "content",
            Self::InvalidPreviewImage => "previewImage",
        }
    }

    /// Stable machine-readable code for error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidId => "invalid_id",
            Self::EmptyTitle => "empty_title",
            Self::TitleTooLong { .. } => "title_too_long",
            Self::EmptyAuthor => "empty_author",
            Self::AuthorTooLong { .. } => "author_too_long",
            Self::EmptyContent => "empty_content",
            Self::InvalidPreviewImage => "invalid_preview_image",
        }
    }
}

impl fmt::Display for ArticleValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "article id must be a positive integer"),
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::EmptyAuthor => write!(f, "author must not be empty"),
            Self::AuthorTooLong { max } => write!(f, "author must be at most {max} characters"),
            Self::EmptyContent => write!(f, "content must not be empty"),
            Self::InvalidPreviewImage => write!(
                f,
                "preview image must be an http(s) URL or an {UPLOADS_PREFIX} path"
            ),
        }
    }
}

impl std::error::Error for ArticleValidationError {}

/// Store-assigned article identifier.
///
/// # Examples
/// ```
/// use blog_backend::domain::ArticleId;
///
/// let id: ArticleId = "42".parse().unwrap();
/// assert_eq!(id.get(), 42);
/// assert!(ArticleId::new(0).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
/// Positive database identifier of an article.
#[serde(try_from = "i64", into = "i64")]
pub struct ArticleId(i64);

impl ArticleId {
    /// Validate a raw identifier.
    pub fn new(raw: i64) -> Result<Self, ArticleValidationError> {
        if raw > 0 {
            Ok(Self(raw))
        } else {
            Err(ArticleValidationError::InvalidId)
        }
    }

    /// Raw integer value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ArticleId {
    type Err = ArticleValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>()
            .map_err(|_| ArticleValidationError::InvalidId)
            .and_then(Self::new)
    }
}

impl TryFrom<i64> for ArticleId {
    type Error = ArticleValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ArticleId> for i64 {
    fn from(value: ArticleId) -> Self {
        value.0
    }
}

/// A stored article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Store-assigned identifier.
    pub id: ArticleId,
    /// Display title.
    pub title: String,
    /// Markdown source.
    pub content: String,
    /// Byline.
    pub author: String,
    /// Unique URL slug.
    #[schema(value_type = String, example = "hello-world")]
    pub slug: Slug,
    /// Creation time; never changes on update.
    pub created_at: DateTime<Utc>,
    /// Cover image URL, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_image: Option<String>,
}

/// Validated create or update input.
///
/// ## Invariants
/// - `title` and `author` are trimmed and non-empty.
/// - `content` is non-blank; its whitespace is preserved.
/// - `preview_image`, when present, is an `http(s)://` URL or an
///   `/uploads/...` path. Blank input counts as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDraft {
    title: String,
    author: String,
    content: String,
    preview_image: Option<String>,
}

impl ArticleDraft {
    /// Validate raw request fields.
    ///
    /// # Examples
    /// ```
    /// use blog_backend::domain::ArticleDraft;
    ///
    /// let draft = ArticleDraft::try_from_parts(" Hello ", "Ada", "Body", None).unwrap();
    /// assert_eq!(draft.title(), "Hello");
    /// ```
    pub fn try_from_parts(
        title: &str,
        author: &str,
        content: &str,
        preview_image: Option<&str>,
    ) -> Result<Self, ArticleValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ArticleValidationError::EmptyTitle);
        }
        if title.chars().count() > TITLE_MAX {
            return Err(ArticleValidationError::TitleTooLong { max: TITLE_MAX });
        }

        let author = author.trim();
        if author.is_empty() {
            return Err(ArticleValidationError::EmptyAuthor);
        }
        if author.chars().count() > AUTHOR_MAX {
            return Err(ArticleValidationError::AuthorTooLong { max: AUTHOR_MAX });
        }

        if content.trim().is_empty() {
            return Err(ArticleValidationError::EmptyContent);
        }

        let preview_image = preview_image
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(validate_preview_image)
            .transpose()?;

        Ok(Self {
            title: title.to_owned(),
            author: author.to_owned(),
            content: content.to_owned(),
            preview_image,
        })
    }

    /// Trimmed title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Trimmed author name.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Markdown source.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Validated cover image URL.
    pub fn preview_image(&self) -> Option<&str> {
        self.preview_image.as_deref()
    }
}

fn validate_preview_image(value: &str) -> Result<String, ArticleValidationError> {
    let acceptable = value.starts_with("https://")
        || value.starts_with("http://")
        || (value.starts_with(UPLOADS_PREFIX) && !value.contains(".."));
    if acceptable && !value.chars().any(char::is_whitespace) {
        Ok(value.to_owned())
    } else {
        Err(ArticleValidationError::InvalidPreviewImage)
    }
}

/// Article awaiting insertion; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    /// Display title.
    pub title: String,
    /// Markdown source.
    pub content: String,
    /// Byline.
    pub author: String,
    /// Settled unique slug.
    pub slug: Slug,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Cover image URL, if any.
    pub preview_image: Option<String>,
}

impl NewArticle {
    /// Combine a draft with its settled slug and creation time.
    pub fn from_draft(draft: ArticleDraft, slug: Slug, created_at: DateTime<Utc>) -> Self {
        let ArticleDraft {
            title,
            author,
            content,
            preview_image,
        } = draft;
        Self {
            title,
            content,
            author,
            slug,
            created_at,
            preview_image,
        }
    }

    /// The article as stored under `id`.
    pub fn into_article(self, id: ArticleId) -> Article {
        Article {
            id,
            title: self.title,
            content: self.content,
            author: self.author,
            slug: self.slug,
            created_at: self.created_at,
            preview_image: self.preview_image,
        }
    }
}

/// Replacement for every mutable article field.
///
/// `created_at` and the id never change on update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRevision {
    /// Display title.
    pub title: String,
    /// Markdown source.
    pub content: String,
    /// Byline.
    pub author: String,
    /// Slug after the update.
    pub slug: Slug,
    /// Cover image URL, if any.
    pub preview_image: Option<String>,
}

impl ArticleRevision {
    /// Combine a draft with the slug chosen for the update.
    pub fn from_draft(draft: ArticleDraft, slug: Slug) -> Self {
        let ArticleDraft {
            title,
            author,
            content,
            preview_image,
        } = draft;
        Self {
            title,
            content,
            author,
            slug,
            preview_image,
        }
    }

    /// Apply the revision to a stored article.
    pub fn apply_to(self, article: &Article) -> Article {
        Article {
            id: article.id,
            title: self.title,
            content: self.content,
            author: self.author,
            slug: self.slug,
            created_at: article.created_at,
            preview_image: self.preview_image,
        }
    }
}

/// List-view projection with a plain-text preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    /// Article identifier.
    pub id: ArticleId,
    /// Display title.
    pub title: String,
    /// Byline.
    pub author: String,
    /// Unique URL slug.
    #[schema(value_type = String, example = "hello-world")]
    pub slug: Slug,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Cover image URL, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_image: Option<String>,
    /// Plain-text preview.
    pub excerpt: String,
}

impl ArticleSummary {
    /// Project a stored article, attaching the supplied excerpt.
    pub fn from_article(article: Article, excerpt: String) -> Self {
        Self {
            id: article.id,
            title: article.title,
            author: article.author,
            slug: article.slug,
            created_at: article.created_at,
            preview_image: article.preview_image,
            excerpt,
        }
    }
}

/// Detail-view projection with rendered HTML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDetail {
    /// Stored article fields.
    #[serde(flatten)]
    pub article: Article,
    /// Plain-text preview.
    pub excerpt: String,
    /// Markdown rendered to HTML.
    pub content_html: String,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for article validation and projections.
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn stored() -> Article {
        Article {
            id: ArticleId::new(7).expect("valid id"),
            title: "Hello".to_owned(),
            content: "Body".to_owned(),
            author: "Ada".to_owned(),
            slug: Slug::new("hello").expect("valid slug"),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().expect("valid date"),
            preview_image: None,
        }
    }

    #[rstest]
    #[case("", "Ada", "Body", None, ArticleValidationError::EmptyTitle)]
    #[case("  ", "Ada", "Body", None, ArticleValidationError::EmptyTitle)]
    #[case("Title", " ", "Body", None, ArticleValidationError::EmptyAuthor)]
    #[case("Title", "Ada", "\n\t", None, ArticleValidationError::EmptyContent)]
    #[case("Title", "Ada", "Body", Some("ftp://x"), ArticleValidationError::InvalidPreviewImage)]
    #[case("Title", "Ada", "Body", Some("/uploads/../etc"), ArticleValidationError::InvalidPreviewImage)]
    #[case("Title", "Ada", "Body", Some("https://a b"), ArticleValidationError::InvalidPreviewImage)]
    fn rejects_invalid_drafts(
        #[case] title: &str,
        #[case] author: &str,
        #[case] content: &str,
        #[case] preview: Option<&str>,
        #[case] expected: ArticleValidationError,
    ) {
        let err = ArticleDraft::try_from_parts(title, author, content, preview)
            .expect_err("draft should be rejected");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn rejects_overlong_title() {
        let title = "x".repeat(TITLE_MAX + 1);
        let err = ArticleDraft::try_from_parts(&title, "Ada", "Body", None).expect_err("too long");
        assert_eq!(err, ArticleValidationError::TitleTooLong { max: TITLE_MAX });
        assert_eq!(err.field(), "title");
        assert_eq!(err.code(), "title_too_long");
    }

    #[rstest]
    #[case(Some("https://cdn.example.com/a.png"), Some("https://cdn.example.com/a.png"))]
    #[case(Some("/uploads/1700000000000-a.png"), Some("/uploads/1700000000000-a.png"))]
    #[case(Some("   "), None)]
    #[case(None, None)]
    fn normalises_preview_images(#[case] input: Option<&str>, #[case] expected: Option<&str>) {
        let draft = ArticleDraft::try_from_parts("Title", "Ada", "Body", input).expect("valid draft");
        assert_eq!(draft.preview_image(), expected);
    }

    #[rstest]
    #[case("1", true)]
    #[case("0", false)]
    #[case("-3", false)]
    #[case("hello-world", false)]
    fn parses_article_ids(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(raw.parse::<ArticleId>().is_ok(), ok);
    }

    #[rstest]
    fn revision_preserves_identity_and_creation_time(stored: Article) {
        let draft = ArticleDraft::try_from_parts("New title", "Grace", "New body", Some("/uploads/x.png"))
            .expect("valid draft");
        let updated = ArticleRevision::from_draft(draft, Slug::new("new-title").expect("slug"))
            .apply_to(&stored);

        assert_eq!(updated.id, stored.id);
        assert_eq!(updated.created_at, stored.created_at);
        assert_eq!(updated.title, "New title");
        assert_eq!(updated.slug.as_str(), "new-title");
        assert_eq!(updated.preview_image.as_deref(), Some("/uploads/x.png"));
    }

    #[rstest]
    fn summary_serialises_camel_case(stored: Article) {
        let summary = ArticleSummary::from_article(stored, "Body".to_owned());
        let value = serde_json::to_value(&summary).expect("serialise summary");
        assert_eq!(value["slug"], "hello");
        assert_eq!(value["createdAt"], "2024-05-01T12:00:00Z");
        assert_eq!(value["excerpt"], "Body");
        assert!(value.get("previewImage").is_none());
    }

    #[rstest]
    fn detail_flattens_article_fields(stored: Article) {
        let detail = ArticleDetail {
            article: stored,
            excerpt: "Body".to_owned(),
            content_html: "<p>Body</p>\n".to_owned(),
        };
        let value = serde_json::to_value(&detail).expect("serialise detail");
        assert_eq!(value["id"], 7);
        assert_eq!(value["title"], "Hello");
        assert_eq!(value["contentHtml"], "<p>Body</p>\n");
    }
}
