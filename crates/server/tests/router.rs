//! Router tests driven with `tower::ServiceExt::oneshot`.
//!
//! The pool connects lazily and these requests are all rejected or served
//! before any query runs, so no database is needed.

#![allow(clippy::unwrap_used)]

use std::path::PathBuf;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use secrecy::SecretString;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use nighthawk_server::app;
use nighthawk_server::config::ServerConfig;
use nighthawk_server::state::AppState;

fn test_config() -> ServerConfig {
    ServerConfig {
        database_url: SecretString::from("postgres://nighthawk@localhost/nighthawk_test"),
        host: "127.0.0.1".parse().unwrap(),
        port: 8085,
        base_url: "http://localhost:8085".to_string(),
        static_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/static")),
        seed_on_startup: false,
        defaults: None,
        log_json: false,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

fn test_app() -> Router {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://nighthawk@localhost/nighthawk_test")
        .unwrap();
    app(AppState::new(test_config(), pool))
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn health_is_ok_and_carries_headers() {
    let response = test_app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(response.headers()["x-frame-options"], "DENY");
    assert!(response.headers().contains_key(header::CONTENT_SECURITY_POLICY));
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn sane_upstream_request_id_is_echoed() {
    let response = test_app()
        .oneshot(
            Request::get("/health")
                .header("x-request-id", "edge-1234")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "edge-1234");
}

#[tokio::test]
async fn root_redirects_to_customer_list() {
    let response = test_app()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/mvc/customer/read");
}

#[tokio::test]
async fn create_rejects_unparsable_date() {
    let response = test_app()
        .oneshot(
            Request::post(
                "/api/customer/post?email=ada@example.com&password=pw&name=Ada%20Lovelace&dob=13-40-2020",
            )
            .body(Body::empty())
            .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "13-40-2020 error; try MM-dd-yyyy");
}

#[tokio::test]
async fn create_rejects_invalid_email() {
    let response = test_app()
        .oneshot(
            Request::post("/api/customer/post?email=nope&password=pw&name=Ada&dob=12-10-1815")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_rejects_missing_parameters() {
    let response = test_app()
        .oneshot(
            Request::post("/api/customer/post?email=ada@example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn set_stats_requires_an_id() {
    let response = test_app()
        .oneshot(
            Request::post("/api/customer/setStats")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"date":"2024-01-01","product":"Eggs"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "id is required");
}

#[tokio::test]
async fn set_stats_rejects_non_numeric_id() {
    let response = test_app()
        .oneshot(
            Request::post("/api/customer/setStats")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"id":"seven","date":"2024-01-01"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn customer_id_must_be_numeric() {
    let response = test_app()
        .oneshot(Request::get("/api/customer/abc").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_form_renders() {
    let response = test_app()
        .oneshot(Request::get("/mvc/customer/create").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"action="/mvc/customer/create""#));
    assert!(html.contains("Sign in"));
}

#[tokio::test]
async fn invalid_create_form_is_rerendered_with_errors() {
    let response = test_app()
        .oneshot(
            Request::post("/mvc/customer/create")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("email=x&password=&name=A&last_visited=01-01-1850"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Name (2 to 30 chars)"));
    assert!(html.contains("Password is required"));
    assert!(html.contains("try yyyy-MM-dd"));
}

#[tokio::test]
async fn login_page_renders() {
    let response = test_app()
        .oneshot(
            Request::get("/login?logged_out=true")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("You have been signed out."));
}

#[tokio::test]
async fn stylesheet_is_served() {
    let response = test_app()
        .oneshot(
            Request::get("/static/css/main.css")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
