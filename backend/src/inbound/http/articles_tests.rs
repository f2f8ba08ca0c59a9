//! Handler tests for the article endpoints.

use actix_web::http::StatusCode;
use actix_web::{App, test};
use chrono::{TimeZone, Utc};
use mockall::predicate::eq;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::Article;
use crate::inbound::http::test_utils::{
    StatePorts, mock_state, session_cookie, test_login_request, test_login_route,
    test_session_middleware,
};

fn article(raw_id: i64, raw_slug: &str) -> Article {
    Article {
        id: ArticleId::new(raw_id).expect("valid id"),
        title: "Hello World".to_owned(),
        content: "Hello **there**.".to_owned(),
        author: "Ada".to_owned(),
        slug: Slug::new(raw_slug).expect("valid slug"),
        created_at: Utc
            .with_ymd_and_hms(2024, 5, 17, 8, 0, 0)
            .single()
            .expect("valid timestamp"),
        preview_image: None,
    }
}

fn detail(raw_id: i64, raw_slug: &str) -> ArticleDetail {
    ArticleDetail {
        article: article(raw_id, raw_slug),
        excerpt: "Hello there.".to_owned(),
        content_html: "<p>Hello <strong>there</strong>.</p>\n".to_owned(),
    }
}

fn payload() -> Value {
    json!({
        "title": "Hello World",
        "author": "Ada",
        "content": "Hello **there**.",
    })
}

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
        .service(
            web::scope("/api/v1")
                .service(list_articles)
                .service(get_article)
                .service(create_article)
                .service(update_article)
                .service(delete_article),
        )
}

macro_rules! signed_in {
    ($app:expr) => {{
        let res = test::call_service(&$app, test_login_request().to_request()).await;
        session_cookie(&res)
    }};
}

#[rstest]
#[case("", None, None)]
#[case("?year=2024", Some(2024), None)]
#[case("?year=2024&month=5", Some(2024), Some(5))]
#[actix_web::test]
async fn list_passes_filter_through(
    #[case] query: &str,
    #[case] year: Option<i32>,
    #[case] month: Option<u32>,
) {
    let mut ports = StatePorts::default();
    let expected = ArticleListFilter::new(year, month).expect("valid filter");
    ports
        .query
        .expect_list()
        .with(eq(expected))
        .times(1)
        .returning(|_| {
            Ok(vec![ArticleSummary::from_article(
                article(1, "hello-world"),
                "Hello there.".to_owned(),
            )])
        });
    let app = test::init_service(build_app(ports)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/articles{query}"))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["posts"][0]["slug"], "hello-world");
    assert_eq!(body["posts"][0]["excerpt"], "Hello there.");
    assert_eq!(body["posts"][0]["createdAt"], "2024-05-17T08:00:00Z");
}

#[rstest]
#[case("?month=5", "month_without_year")]
#[case("?year=2024&month=13", "month_out_of_range")]
#[actix_web::test]
async fn list_rejects_invalid_filters(#[case] query: &str, #[case] code: &str) {
    let mut ports = StatePorts::default();
    ports.query.expect_list().never();
    let app = test::init_service(build_app(ports)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/articles{query}"))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], "month");
    assert_eq!(body["details"]["code"], code);
}

#[actix_web::test]
async fn get_returns_flattened_detail() {
    let mut ports = StatePorts::default();
    ports
        .query
        .expect_find()
        .withf(|reference| reference == "hello-world")
        .times(1)
        .returning(|_| Ok(detail(4, "hello-world")));
    let app = test::init_service(build_app(ports)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/articles/hello-world")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["post"]["id"], 4);
    assert_eq!(body["post"]["content"], "Hello **there**.");
    assert_eq!(
        body["post"]["contentHtml"],
        "<p>Hello <strong>there</strong>.</p>\n"
    );
}

#[actix_web::test]
async fn get_missing_article_is_not_found() {
    let mut ports = StatePorts::default();
    ports
        .query
        .expect_find()
        .returning(|_| Err(Error::not_found("article not found")));
    let app = test::init_service(build_app(ports)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/articles/42").to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[case::create(test::TestRequest::post().uri("/api/v1/articles").set_json(payload()))]
#[case::update(test::TestRequest::put().uri("/api/v1/articles/1").set_json(payload()))]
#[case::delete(test::TestRequest::delete().uri("/api/v1/articles/1"))]
#[actix_web::test]
async fn writes_require_admin_session(#[case] request: test::TestRequest) {
    let mut ports = StatePorts::default();
    ports.command.expect_create().never();
    ports.command.expect_update().never();
    ports.command.expect_delete().never();
    let app = test::init_service(build_app(ports)).await;

    let res = test::call_service(&app, request.to_request()).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn create_returns_created_post() {
    let mut ports = StatePorts::default();
    ports
        .command
        .expect_create()
        .withf(|draft| draft.title() == "Hello World" && draft.preview_image().is_none())
        .times(1)
        .returning(|_| Ok(detail(9, "hello-world")));
    let app = test::init_service(build_app(ports)).await;
    let cookie = signed_in!(app);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/articles")
            .cookie(cookie)
            .set_json(payload())
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["id"], 9);
    assert_eq!(body["post"]["slug"], "hello-world");
}

#[rstest]
#[case(json!({"title": " ", "author": "Ada", "content": "x"}), "title", "empty_title")]
#[case(json!({"title": "T", "author": "", "content": "x"}), "author", "empty_author")]
#[case(json!({"title": "T", "author": "Ada", "content": "\n"}), "content", "empty_content")]
#[case(
    json!({"title": "T", "author": "Ada", "content": "x", "previewImage": "javascript:alert(1)"}),
    "previewImage",
    "invalid_preview_image"
)]
#[actix_web::test]
async fn create_validates_fields(#[case] body: Value, #[case] field: &str, #[case] code: &str) {
    let mut ports = StatePorts::default();
    ports.command.expect_create().never();
    let app = test::init_service(build_app(ports)).await;
    let cookie = signed_in!(app);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/articles")
            .cookie(cookie)
            .set_json(body)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], code);
}

#[actix_web::test]
async fn create_conflict_is_reported() {
    let mut ports = StatePorts::default();
    ports
        .command
        .expect_create()
        .returning(|_| Err(Error::conflict("slug already in use: hello-world")));
    let app = test::init_service(build_app(ports)).await;
    let cookie = signed_in!(app);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/articles")
            .cookie(cookie)
            .set_json(payload())
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[rstest]
#[case(None, None)]
#[case(Some(""), None)]
#[case(Some("custom-slug"), Some("custom-slug"))]
#[actix_web::test]
async fn update_forwards_requested_slug(
    #[case] requested: Option<&str>,
    #[case] expected: Option<&'static str>,
) {
    let mut ports = StatePorts::default();
    ports
        .command
        .expect_update()
        .withf(move |request| {
            request.id.get() == 3 && request.slug.as_ref().map(Slug::as_str) == expected
        })
        .times(1)
        .returning(|request| Ok(detail(request.id.get(), "custom-slug")));
    let app = test::init_service(build_app(ports)).await;
    let cookie = signed_in!(app);
    let mut body = payload();
    if let Some(slug) = requested {
        body["slug"] = Value::from(slug);
    }

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/v1/articles/3")
            .cookie(cookie)
            .set_json(body)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["post"]["id"], 3);
}

#[rstest]
#[case("/api/v1/articles/abc", json!({"title": "T", "author": "A", "content": "x"}), "id")]
#[case("/api/v1/articles/0", json!({"title": "T", "author": "A", "content": "x"}), "id")]
#[case(
    "/api/v1/articles/3",
    json!({"title": "T", "author": "A", "content": "x", "slug": "Not A Slug"}),
    "slug"
)]
#[actix_web::test]
async fn update_rejects_bad_identifiers(
    #[case] uri: &str,
    #[case] body: Value,
    #[case] field: &str,
) {
    let mut ports = StatePorts::default();
    ports.command.expect_update().never();
    let app = test::init_service(build_app(ports)).await;
    let cookie = signed_in!(app);

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(uri)
            .cookie(cookie)
            .set_json(body)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], field);
}

#[rstest]
#[case(Ok(()), StatusCode::NO_CONTENT)]
#[case(Err(Error::not_found("article not found")), StatusCode::NOT_FOUND)]
#[actix_web::test]
async fn delete_maps_outcome(#[case] outcome: Result<(), Error>, #[case] status: StatusCode) {
    let mut ports = StatePorts::default();
    ports
        .command
        .expect_delete()
        .with(eq(ArticleId::new(5).expect("valid id")))
        .times(1)
        .returning(move |_| outcome.clone());
    let app = test::init_service(build_app(ports)).await;
    let cookie = signed_in!(app);

    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri("/api/v1/articles/5")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), status);
}
