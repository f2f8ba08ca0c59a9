//! Domain primitives, use-cases and ports.
//!
//! Purpose: define the blog's strongly typed entities (articles, slugs,
//! uploads, admin identity), the pure text pipelines that derive slugs,
//! excerpts and HTML from them, and the services that drive the ports.
//! Nothing here knows about HTTP or SQL.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: API error payload and stable identifier.
//! - [`Article`] and its projections ([`ArticleSummary`], [`ArticleDetail`]).
//! - [`generate_unique_slug`] and [`ExcerptGenerator`]: the text core.
//! - [`ArticleService`] and [`ImageUploadService`]: driving port
//!   implementations.

pub mod article;
mod article_service;
pub mod auth;
pub mod error;
pub mod excerpt;
pub mod markdown;
pub mod ports;
pub mod slug;
mod slug_generator;
pub mod timeline;
mod trace_id;
pub mod upload;
mod upload_service;

pub use self::article::{
    AUTHOR_MAX, Article, ArticleDetail, ArticleDraft, ArticleId, ArticleRevision, ArticleSummary,
    ArticleValidationError, NewArticle, TITLE_MAX,
};
pub use self::article_service::{ArticleService, MAX_SLUG_WRITE_ATTEMPTS};
pub use self::auth::{
    AdminCredentials, AdminCredentialsError, AdminId, LoginCredentials, LoginValidationError,
};
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::excerpt::{
    ClassifierRules, DEFAULT_EXCERPT_LENGTH, ExcerptGenerator, HeadingClassifier,
    RuleBasedClassifier, generate_excerpt,
};
pub use self::markdown::render_markdown;
pub use self::slug::{Slug, SlugValidationError, UNTITLED_SLUG, is_valid_slug, slugify};
pub use self::slug_generator::{
    DEFAULT_SLUG_MAX_ATTEMPTS, SlugGenerationError, SlugPolicy, generate_unique_slug,
};
pub use self::timeline::{Timeline, TimelineEntry, TimelineMonth, TimelineYear, build_timeline};
pub use self::trace_id::TraceId;
pub use self::upload::{
    ImageFile, ImageUpload, MAX_UPLOAD_BYTES, StoredImage, UploadValidationError,
    content_type_for, sanitize_file_name, validate_stored_name,
};
pub use self::upload_service::ImageUploadService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use blog_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
