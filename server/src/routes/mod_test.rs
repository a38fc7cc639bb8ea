use std::net::SocketAddr;

use axum::http::HeaderValue;
use serde_json::Value;

use super::*;
use crate::state::test_helpers::test_app_state;

fn test_config(origin: AllowedOrigin) -> ServerConfig {
    let mut config = ServerConfig::from_lookup(|_| None).expect("default config");
    config.allowed_origin = origin;
    config
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Bind the full router on an ephemeral port and return its base URL.
async fn spawn_app(origin: AllowedOrigin) -> String {
    let (state, _store) = test_app_state();
    let app = app(state, &test_config(origin));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .await
            .unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn healthz_returns_ok() {
    let base = spawn_app(AllowedOrigin::Any).await;
    let resp = client().get(format!("{base}/healthz")).send().await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
}

#[tokio::test]
async fn comments_are_served_on_both_paths() {
    let base = spawn_app(AllowedOrigin::Any).await;
    let client = client();

    let resp = client
        .post(format!("{base}{LEGACY_COMMENTS_PATH}"))
        .header("content-type", "application/json")
        .body(r#"{"name":"Ada","msg":"hello"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);

    let listed: Vec<Value> = client.get(format!("{base}{COMMENTS_PATH}")).send().await.unwrap().json().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["msg"], "hello");
    assert!(listed[0].get("ip").is_none());
}

#[tokio::test]
async fn peer_address_rate_limits_without_forwarding_headers() {
    let base = spawn_app(AllowedOrigin::Any).await;
    let client = client();
    let post = || client.post(format!("{base}{COMMENTS_PATH}")).body(r#"{"msg":"hi"}"#).send();

    assert_eq!(post().await.unwrap().status(), reqwest::StatusCode::CREATED);
    let second = post().await.unwrap();
    assert_eq!(second.status(), reqwest::StatusCode::TOO_MANY_REQUESTS);
    assert!(second.headers().contains_key("retry-after"));
}

#[tokio::test]
async fn unsupported_method_returns_405_json() {
    let base = spawn_app(AllowedOrigin::Any).await;
    let resp = client().delete(format!("{base}{COMMENTS_PATH}")).send().await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::METHOD_NOT_ALLOWED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Method not allowed");
}

#[tokio::test]
async fn cors_headers_follow_configured_origin() {
    let base = spawn_app(AllowedOrigin::Exact(HeaderValue::from_static("https://course.example.edu"))).await;
    let client = client();

    let resp = client
        .get(format!("{base}{COMMENTS_PATH}"))
        .header("origin", "https://course.example.edu")
        .send()
        .await
        .unwrap();
    assert_eq!(
        resp.headers().get("access-control-allow-origin").and_then(|v| v.to_str().ok()),
        Some("https://course.example.edu")
    );

    let preflight = client
        .request(reqwest::Method::OPTIONS, format!("{base}{COMMENTS_PATH}"))
        .header("origin", "https://course.example.edu")
        .header("access-control-request-method", "POST")
        .send()
        .await
        .unwrap();
    assert!(preflight.status().is_success());
    let methods = preflight
        .headers()
        .get("access-control-allow-methods")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    assert!(methods.contains("POST"));
}

#[tokio::test]
async fn plain_options_returns_empty_200() {
    let base = spawn_app(AllowedOrigin::Any).await;
    let resp = client()
        .request(reqwest::Method::OPTIONS, format!("{base}{COMMENTS_PATH}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    assert!(resp.text().await.unwrap().is_empty());
}

#[tokio::test]
async fn course_routes_respond() {
    let base = spawn_app(AllowedOrigin::Any).await;
    for path in ["/api/course", "/api/syllabus", "/api/students", "/api/grades", "/api/homework", "/api/books", "/api/notes"] {
        let resp = client().get(format!("{base}{path}")).send().await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK, "{path}");
    }
    let missing = client().get(format!("{base}/api/students/NOPE/grades")).send().await.unwrap();
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn simple_responses_carry_all_cors_headers() {
    let base = spawn_app(AllowedOrigin::Any).await;
    let resp = client().get(format!("{base}{COMMENTS_PATH}")).send().await.unwrap();
    let header = |name: &str| resp.headers().get(name).and_then(|v| v.to_str().ok()).map(str::to_owned);
    assert_eq!(header("access-control-allow-origin").as_deref(), Some("*"));
    assert_eq!(header("access-control-allow-methods").as_deref(), Some("GET,POST,OPTIONS"));
    assert_eq!(header("access-control-allow-headers").as_deref(), Some("content-type"));
}
