//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP handler, the response schemas, and the
//! `SessionCookie` security scheme guarding admin writes. Swagger UI serves it
//! in debug builds and `openapi-dump` prints it for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    Article, ArticleDetail, ArticleSummary, Error, ErrorCode, Timeline, TimelineEntry,
    TimelineMonth, TimelineYear,
};
use crate::inbound::http::articles::{
    ArticleCreatedResponse, ArticleListResponse, ArticlePayload, ArticleResponse,
};
use crate::inbound::http::auth::LoginRequest;
use crate::inbound::http::health::{DatabaseStatus, HealthReport, HealthStatus};
use crate::inbound::http::uploads::UploadResponse;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Admin session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the blog API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Blog backend API",
        description = "Articles with generated slugs and excerpts, image uploads, and admin sessions."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::articles::list_articles,
        crate::inbound::http::articles::get_article,
        crate::inbound::http::articles::create_article,
        crate::inbound::http::articles::update_article,
        crate::inbound::http::articles::delete_article,
        crate::inbound::http::archive::archive,
        crate::inbound::http::uploads::upload_image,
        crate::inbound::http::uploads::serve_image,
        crate::inbound::http::health::health,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Article,
        ArticleSummary,
        ArticleDetail,
        ArticlePayload,
        ArticleListResponse,
        ArticleResponse,
        ArticleCreatedResponse,
        Timeline,
        TimelineYear,
        TimelineMonth,
        TimelineEntry,
        LoginRequest,
        UploadResponse,
        HealthReport,
        HealthStatus,
        DatabaseStatus,
    )),
    tags(
        (name = "auth", description = "Admin sign-in and sign-out"),
        (name = "articles", description = "Articles and the archive timeline"),
        (name = "uploads", description = "Image uploads"),
        (name = "health", description = "Storage health and orchestration probes")
    )
)]
/// OpenAPI document for the blog REST API.
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn schema_fields(name: &str) -> Vec<String> {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        match schemas.get(name).unwrap_or_else(|| panic!("{name} schema")) {
            RefOr::T(Schema::Object(obj)) => obj.properties.keys().cloned().collect(),
            RefOr::T(Schema::AllOf(all)) => all
                .items
                .iter()
                .filter_map(|item| match item {
                    RefOr::T(Schema::Object(obj)) => Some(obj.properties.keys().cloned()),
                    _ => None,
                })
                .flatten()
                .collect(),
            _ => panic!("{name} should be an object schema"),
        }
    }

    #[rstest]
    #[case("Error", &["code", "message"])]
    #[case("ArticleSummary", &["id", "slug", "excerpt", "createdAt"])]
    #[case("ArticlePayload", &["title", "author", "content", "previewImage"])]
    #[case("HealthReport", &["status", "database", "timestamp"])]
    fn schemas_expose_camel_case_fields(#[case] name: &str, #[case] fields: &[&str]) {
        let present = schema_fields(name);
        for field in fields {
            assert!(
                present.iter().any(|key| key == field),
                "{name} should have field {field}"
            );
        }
    }

    #[rstest]
    #[case("/api/v1/articles")]
    #[case("/api/v1/articles/{idOrSlug}")]
    #[case("/api/v1/articles/{id}")]
    #[case("/api/v1/archive")]
    #[case("/api/v1/uploads")]
    #[case("/api/v1/login")]
    #[case("/api/v1/health")]
    fn documents_every_api_path(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "{path} missing");
    }

    #[rstest]
    fn registers_session_cookie_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
