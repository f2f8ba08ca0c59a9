//! Archive timeline handler.
//!
//! ```text
//! GET /api/v1/archive
//! ```

use actix_web::{get, web};

use crate::domain::{Error, Timeline};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Every article grouped by year and month, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/archive",
    responses(
        (status = 200, description = "Archive timeline", body = Timeline),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["articles"],
    operation_id = "archive",
    security([])
)]
#[get("/archive")]
pub async fn archive(state: web::Data<HttpState>) -> ApiResult<web::Json<Timeline>> {
    Ok(web::Json(state.articles_query.timeline().await?))
}
