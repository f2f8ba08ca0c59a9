//! Article API handlers.
//!
//! ```text
//! GET    /api/v1/articles?year=2024&month=5
//! GET    /api/v1/articles/{idOrSlug}
//! POST   /api/v1/articles {"title":"Hello","author":"Ada","content":"..."}
//! PUT    /api/v1/articles/{id} {"title":"Hello","author":"Ada","content":"...","slug":"hello"}
//! DELETE /api/v1/articles/{id}
//! ```
//!
//! Reads are public. Writes require an admin session.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{ArticleListFilter, UpdateArticleRequest};
use crate::domain::{ArticleDetail, ArticleDraft, ArticleId, ArticleSummary, Error, Slug};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Calendar filter for `GET /api/v1/articles`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListArticlesQuery {
    /// Four-digit year, e.g. `2024`.
    pub year: Option<i32>,
    /// Month `1..=12`; requires `year`.
    pub month: Option<u32>,
}

/// Create or update body.
///
/// `slug` is honoured on update only; creation always derives it from the
/// title.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticlePayload {
    /// Display title.
    #[schema(example = "Hello World")]
    pub title: String,
    /// Byline.
    #[schema(example = "Ada Lovelace")]
    pub author: String,
    /// Markdown source.
    pub content: String,
    /// Cover image URL.
    #[serde(default)]
    #[schema(example = "/uploads/1715932800000-cover.png")]
    pub preview_image: Option<String>,
    /// Requested slug; ignored on create.
    #[serde(default)]
    pub slug: Option<String>,
}

impl TryFrom<&ArticlePayload> for ArticleDraft {
    type Error = Error;

    fn try_from(value: &ArticlePayload) -> Result<Self, Self::Error> {
        Ok(Self::try_from_parts(
            &value.title,
            &value.author,
            &value.content,
            value.preview_image.as_deref(),
        )?)
    }
}

/// Body of `GET /api/v1/articles`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ArticleListResponse {
    /// Summaries, newest first.
    pub posts: Vec<ArticleSummary>,
}

/// Body of single-article responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct ArticleResponse {
    /// The article.
    pub post: ArticleDetail,
}

/// Body of `POST /api/v1/articles`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ArticleCreatedResponse {
    /// Always `true`.
    pub success: bool,
    /// New article id.
    pub id: ArticleId,
    /// The stored article.
    pub post: ArticleDetail,
}

fn parse_article_id(raw: &str) -> Result<ArticleId, Error> {
    Ok(raw.trim().parse::<ArticleId>()?)
}

/// A blank requested slug counts as absent.
fn parse_requested_slug(raw: Option<&str>) -> Result<Option<Slug>, Error> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(Slug::new)
        .transpose()
        .map_err(Error::from)
}

/// List articles newest first, optionally narrowed to a year or month.
#[utoipa::path(
    get,
    path = "/api/v1/articles",
    params(ListArticlesQuery),
    responses(
        (status = 200, description = "Article summaries", body = ArticleListResponse),
        (status = 400, description = "Invalid filter", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["articles"],
    operation_id = "listArticles",
    security([])
)]
#[get("/articles")]
pub async fn list_articles(
    state: web::Data<HttpState>,
    query: web::Query<ListArticlesQuery>,
) -> ApiResult<web::Json<ArticleListResponse>> {
    let ListArticlesQuery { year, month } = query.into_inner();
    let filter = ArticleListFilter::new(year, month)?;
    let posts = state.articles_query.list(filter).await?;
    Ok(web::Json(ArticleListResponse { posts }))
}

/// Fetch one article by numeric id or slug.
#[utoipa::path(
    get,
    path = "/api/v1/articles/{idOrSlug}",
    params(("idOrSlug" = String, Path, description = "Numeric id or slug")),
    responses(
        (status = 200, description = "Article", body = ArticleResponse),
        (status = 404, description = "Not found", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["articles"],
    operation_id = "getArticle",
    security([])
)]
#[get("/articles/{id_or_slug}")]
pub async fn get_article(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ArticleResponse>> {
    let post = state.articles_query.find(&path.into_inner()).await?;
    Ok(web::Json(ArticleResponse { post }))
}

/// Publish a new article.
#[utoipa::path(
    post,
    path = "/api/v1/articles",
    request_body = ArticlePayload,
    responses(
        (status = 201, description = "Created", body = ArticleCreatedResponse),
        (status = 400, description = "Invalid article", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 409, description = "Slug conflict", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["articles"],
    operation_id = "createArticle"
)]
#[post("/articles")]
pub async fn create_article(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ArticlePayload>,
) -> ApiResult<HttpResponse> {
    let admin = session.require_admin()?;
    let draft = ArticleDraft::try_from(&payload.into_inner())?;
    let post = state.articles.create(draft).await?;
    info!(admin = %admin, id = %post.article.id, slug = %post.article.slug, "article created");
    Ok(HttpResponse::Created().json(ArticleCreatedResponse {
        success: true,
        id: post.article.id,
        post,
    }))
}

/// Replace an article's fields.
#[utoipa::path(
    put,
    path = "/api/v1/articles/{id}",
    params(("id" = i64, Path, description = "Article id")),
    request_body = ArticlePayload,
    responses(
        (status = 200, description = "Updated", body = ArticleResponse),
        (status = 400, description = "Invalid article", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Slug conflict", body = Error)
    ),
    tags = ["articles"],
    operation_id = "updateArticle"
)]
#[put("/articles/{id}")]
pub async fn update_article(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ArticlePayload>,
) -> ApiResult<web::Json<ArticleResponse>> {
    session.require_admin()?;
    let id = parse_article_id(&path.into_inner())?;
    let payload = payload.into_inner();
    let draft = ArticleDraft::try_from(&payload)?;
    let slug = parse_requested_slug(payload.slug.as_deref())?;
    let post = state
        .articles
        .update(UpdateArticleRequest { id, draft, slug })
        .await?;
    Ok(web::Json(ArticleResponse { post }))
}

/// Remove an article.
#[utoipa::path(
    delete,
    path = "/api/v1/articles/{id}",
    params(("id" = i64, Path, description = "Article id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["articles"],
    operation_id = "deleteArticle"
)]
#[delete("/articles/{id}")]
pub async fn delete_article(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let admin = session.require_admin()?;
    let id = parse_article_id(&path.into_inner())?;
    state.articles.delete(id).await?;
    info!(admin = %admin, id = %id, "article deleted");
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "articles_tests.rs"]
mod tests;
