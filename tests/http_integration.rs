use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use pixeltv::http::page::PlayerOptions;
use pixeltv::http::{build_router, state::AppState};

const TEST_PORT: u16 = 43117;
const TEST_ID: &str = "dQw4w9WgXcQ";

fn make_app() -> axum::Router {
    build_router(AppState::new(TEST_PORT, PlayerOptions::default()))
}

fn request(method: &str, uri: &str, host: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(host) = host {
        builder = builder.header("host", host);
    }
    builder.body(Body::empty()).unwrap()
}

fn own_host() -> String {
    format!("127.0.0.1:{TEST_PORT}")
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// ── method ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn post_returns_405_with_empty_body() {
    let response = make_app()
        .oneshot(request("POST", "/?v=dQw4w9WgXcQ", Some(&own_host())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers().get("allow").unwrap(), "GET");
    assert!(body_text(response).await.is_empty());
}

#[tokio::test]
async fn method_checked_before_host() {
    let response = make_app()
        .oneshot(request("DELETE", "/?v=dQw4w9WgXcQ", Some("evil.example")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// ── host ──────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn foreign_host_returns_403_with_empty_body() {
    let response = make_app()
        .oneshot(request("GET", "/?v=dQw4w9WgXcQ", Some(&format!("evil.example:{TEST_PORT}"))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(body_text(response).await.is_empty());
}

#[tokio::test]
async fn wrong_port_or_missing_host_returns_403() {
    for host in [Some("127.0.0.1:1"), Some("127.0.0.1"), Some("localhost"), Some("[::1]:43117"), None] {
        let response = make_app()
            .oneshot(request("GET", "/?v=dQw4w9WgXcQ", host))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "host {host:?}");
    }
}

#[tokio::test]
async fn localhost_alias_accepted() {
    let response = make_app()
        .oneshot(request("GET", "/?v=dQw4w9WgXcQ", Some(&format!("localhost:{TEST_PORT}"))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn host_checked_before_video_id() {
    let response = make_app()
        .oneshot(request("GET", "/?v=short", Some("evil.example")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ── video id ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn short_id_returns_400_invalid_video_id() {
    let response = make_app()
        .oneshot(request("GET", "/?v=short", Some(&own_host())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let ct = response.headers().get("content-type").unwrap().to_str().unwrap();
    assert!(ct.starts_with("text/plain"), "Expected text/plain, got: {ct}");
    assert_eq!(body_text(response).await, "Invalid Video ID");
}

#[tokio::test]
async fn missing_id_returns_400() {
    for uri in ["/", "/?", "/?video=dQw4w9WgXcQ", "/?v="] {
        let response = make_app()
            .oneshot(request("GET", uri, Some(&own_host())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "uri {uri}");
    }
}

#[tokio::test]
async fn encoded_injection_attempts_return_400() {
    for uri in [
        "/?v=dQw4w9WgXc%22",
        "/?v=%3Cscript%3E%3C",
        "/?v=..%2F..%2F..%2Fx",
        "/?v=dQw4w9WgXcQ%00",
        "/?v=dQw4w9WgXc+",
    ] {
        let response = make_app()
            .oneshot(request("GET", uri, Some(&own_host())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "uri {uri}");
    }
}

#[tokio::test]
async fn unknown_path_returns_404() {
    let response = make_app()
        .oneshot(request("GET", "/player?v=dQw4w9WgXcQ", Some(&own_host())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ── success ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn valid_request_returns_player_page() {
    let response = make_app()
        .oneshot(request("GET", "/?v=dQw4w9WgXcQ", Some(&own_host())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let ct = response.headers().get("content-type").unwrap().to_str().unwrap();
    assert!(ct.starts_with("text/html"), "Expected text/html, got: {ct}");
    let text = body_text(response).await;
    assert!(
        text.contains(&format!("src=\"https://www.youtube-nocookie.com/embed/{TEST_ID}?")),
        "Expected embed iframe for {TEST_ID}:\n{text}"
    );
}

#[tokio::test]
async fn valid_request_sets_security_headers() {
    let response = make_app()
        .oneshot(request("GET", "/?v=dQw4w9WgXcQ", Some(&own_host())))
        .await
        .unwrap();
    let headers = response.headers();
    let csp = headers.get("content-security-policy").unwrap().to_str().unwrap();
    assert!(csp.contains("default-src 'none'"), "{csp}");
    assert!(csp.contains("frame-src https://www.youtube-nocookie.com"), "{csp}");
    assert_eq!(
        headers.get("access-control-allow-origin").unwrap(),
        format!("http://127.0.0.1:{TEST_PORT}").as_str()
    );
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("cache-control").unwrap(), "no-store");
}

#[tokio::test]
async fn extra_query_parameters_ignored() {
    let response = make_app()
        .oneshot(request("GET", "/?list=abc&v=dQw4w9WgXcQ&t=30", Some(&own_host())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn repeated_requests_are_byte_identical() {
    let first = body_text(
        make_app()
            .oneshot(request("GET", "/?v=dQw4w9WgXcQ", Some(&own_host())))
            .await
            .unwrap(),
    )
    .await;
    let second = body_text(
        make_app()
            .oneshot(request("GET", "/?v=dQw4w9WgXcQ", Some(&own_host())))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(first, second);
}
