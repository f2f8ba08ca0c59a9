//! Image upload handlers.
//!
//! ```text
//! POST /api/v1/uploads?filename=cover.png   (raw image body, Content-Type: image/png)
//! GET  /uploads/1715932800000-cover.png
//! ```
//!
//! The request body is the image itself; its `Content-Type` header must be
//! an `image/*` type. Bodies are read incrementally and abandoned as soon as
//! they pass the upload limit.

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use futures_util::StreamExt as _;
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, ImageUpload, MAX_UPLOAD_BYTES, UploadValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Stored names embed a timestamp, so responses never change.
const UPLOAD_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// Query string of `POST /api/v1/uploads`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UploadQuery {
    /// Original file name; sanitised before storage.
    pub filename: Option<String>,
}

/// Body returned after a successful upload.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    /// Always `true`.
    pub success: bool,
    /// Public path of the stored image.
    #[schema(example = "/uploads/1715932800000-cover.png")]
    pub url: String,
}

async fn read_limited(mut payload: web::Payload) -> ApiResult<Vec<u8>> {
    let mut body = Vec::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|err| {
            debug!(error = %err, "upload body interrupted");
            Error::invalid_request("upload body could not be read")
        })?;
        if body.len().saturating_add(chunk.len()) > MAX_UPLOAD_BYTES {
            return Err(UploadValidationError::TooLarge {
                max: MAX_UPLOAD_BYTES,
            }
            .into());
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// Store an image and return its public URL.
#[utoipa::path(
    post,
    path = "/api/v1/uploads",
    params(UploadQuery),
    request_body(content = Vec<u8>, content_type = "image/*", description = "Raw image bytes, at most 5 MiB"),
    responses(
        (status = 200, description = "Stored", body = UploadResponse),
        (status = 400, description = "Empty, oversized or non-image body", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 500, description = "Storage failure", body = Error)
    ),
    tags = ["uploads"],
    operation_id = "uploadImage"
)]
#[post("/uploads")]
pub async fn upload_image(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
    query: web::Query<UploadQuery>,
    payload: web::Payload,
) -> ApiResult<web::Json<UploadResponse>> {
    session.require_admin()?;
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    let body = read_limited(payload).await?;
    let file_name = query.into_inner().filename.unwrap_or_default();
    let upload = ImageUpload::try_new(&file_name, &content_type, body)?;
    let stored = state.uploads.upload(upload).await?;
    Ok(web::Json(UploadResponse {
        success: true,
        url: stored.url,
    }))
}

/// Serve a stored image.
#[utoipa::path(
    get,
    path = "/uploads/{name}",
    params(("name" = String, Path, description = "Stored file name")),
    responses(
        (status = 200, description = "Image bytes"),
        (status = 400, description = "Malformed name", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["uploads"],
    operation_id = "serveImage",
    security([])
)]
#[get("/uploads/{name}")]
pub async fn serve_image(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let file = state.uploads.fetch(&path.into_inner()).await?;
    Ok(HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, UPLOAD_CACHE_CONTROL))
        .insert_header((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .insert_header((header::CONTENT_TYPE, file.content_type))
        .body(file.bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ImageFile, StoredImage};
    use crate::inbound::http::test_utils::{
        StatePorts, mock_state, session_cookie, test_login_request, test_login_route,
        test_session_middleware,
    };
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::Value;

    fn build_app(
        ports: StatePorts,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(mock_state(ports)))
            .wrap(test_session_middleware())
            .configure(test_login_route)
            .service(web::scope("/api/v1").service(upload_image))
            .service(serve_image)
    }

    fn upload_request(content_type: &str, body: Vec<u8>) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/api/v1/uploads?filename=my%20cover!.png")
            .insert_header((header::CONTENT_TYPE, content_type.to_owned()))
            .set_payload(body)
    }

    #[actix_web::test]
    async fn upload_requires_admin() {
        let mut ports = StatePorts::default();
        ports.uploads.expect_upload().never();
        let app = test::init_service(build_app(ports)).await;

        let res =
            test::call_service(&app, upload_request("image/png", vec![1, 2]).to_request()).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn upload_stores_sanitised_image() {
        let mut ports = StatePorts::default();
        ports
            .uploads
            .expect_upload()
            .withf(|upload| {
                upload.file_name() == "mycover.png"
                    && upload.content_type() == "image/png"
                    && upload.bytes() == [1, 2, 3]
            })
            .times(1)
            .returning(|upload| Ok(StoredImage::new(format!("1700-{}", upload.file_name()))));
        let app = test::init_service(build_app(ports)).await;
        let login = test::call_service(&app, test_login_request().to_request()).await;

        let res = test::call_service(
            &app,
            upload_request("image/png", vec![1, 2, 3])
                .cookie(session_cookie(&login))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["url"], "/uploads/1700-mycover.png");
    }

    #[rstest]
    #[case("image/png", Vec::new(), "empty_payload")]
    #[case("text/plain", vec![1], "unsupported_content_type")]
    #[case("image/png", vec![0; MAX_UPLOAD_BYTES + 1], "payload_too_large")]
    #[actix_web::test]
    async fn upload_rejects_invalid_bodies(
        #[case] content_type: &str,
        #[case] body: Vec<u8>,
        #[case] code: &str,
    ) {
        let mut ports = StatePorts::default();
        ports.uploads.expect_upload().never();
        let app = test::init_service(build_app(ports)).await;
        let login = test::call_service(&app, test_login_request().to_request()).await;

        let res = test::call_service(
            &app,
            upload_request(content_type, body)
                .cookie(session_cookie(&login))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["details"]["code"], code);
    }

    #[actix_web::test]
    async fn serves_stored_bytes_with_type() {
        let mut ports = StatePorts::default();
        ports
            .uploads
            .expect_fetch()
            .withf(|name| name == "1700-cover.png")
            .returning(|_| {
                Ok(ImageFile {
                    content_type: "image/png",
                    bytes: vec![9, 8, 7],
                })
            });
        let app = test::init_service(build_app(ports)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/uploads/1700-cover.png")
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("image/png")
        );
        let body = test::read_body(res).await;
        assert_eq!(body.as_ref(), [9, 8, 7]);
    }

    #[actix_web::test]
    async fn missing_image_is_not_found() {
        let mut ports = StatePorts::default();
        ports
            .uploads
            .expect_fetch()
            .returning(|name| Err(Error::not_found(format!("image {name} not found"))));
        let app = test::init_service(build_app(ports)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/uploads/gone.png").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
