use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use futures_util::stream;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tower::ServiceExt; // for `oneshot`
use wiremock::matchers::{any, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use terafetch::api::router;
use terafetch::api::state::AppState;
use terafetch::config::{ByteSize, Config};
use terafetch::pipeline::Pipeline;

/// Config whose upstreams all live on the mock server
fn test_config(upstream: &MockServer) -> Config {
    let mut config = Config::default();
    config.upstreams.primary_api = format!("{}/primary", upstream.uri());
    config.upstreams.backup_api = format!("{}/backup", upstream.uri());
    config.upstreams.cors_proxy = format!("{}/proxy", upstream.uri());
    config.resolver.attempt_timeout_secs = 5;
    config
}

fn build_test_app(config: Config) -> Router {
    let pipeline = Pipeline::from_config(&config).expect("pipeline builds");
    router(AppState::new(config, pipeline))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_primary_api_end_to_end() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/primary"))
        .and(query_param("url", "https://terabox.com/s/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "downloadUrl": "https://x/y.mp4",
            "title": "T",
            "size": 2048
        })))
        .expect(1)
        .mount(&upstream)
        .await;
    Mock::given(path("/backup"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&upstream)
        .await;

    let app = build_test_app(test_config(&upstream));
    let response = app
        .oneshot(post_json("/", json!({ "url": "https://terabox.com/s/abc123" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(
        body,
        json!({
            "success": true,
            "videoUrl": "https://x/y.mp4",
            "title": "T",
            "size": "2.00 KB",
            "method": "PrimaryAPI"
        })
    );
}

#[tokio::test]
async fn test_invalid_domain_makes_no_upstream_calls() {
    let upstream = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;

    let app = build_test_app(test_config(&upstream));
    let response = app
        .oneshot(post_json("/", json!({ "url": "https://notarealsite.com/x" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json(response).await,
        json!({ "success": false, "error": "Invalid TeraBox URL" })
    );
}

#[tokio::test]
async fn test_missing_url() {
    let upstream = MockServer::start().await;
    let app = build_test_app(test_config(&upstream));

    let request = Request::builder()
        .uri("/api/resolve")
        .method("GET")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json(response).await,
        json!({ "success": false, "error": "No URL provided" })
    );
}

#[tokio::test]
async fn test_query_parameter_and_backup_fallback() {
    let upstream = MockServer::start().await;
    Mock::given(path("/primary"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&upstream)
        .await;
    Mock::given(method("POST"))
        .and(path("/backup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "directUrl": "https://cdn.example/b.mp4",
            "filename": "b.mp4",
            "size": "1500000"
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = build_test_app(test_config(&upstream));
    let request = Request::builder()
        .uri("/api/resolve?url=https%3A%2F%2Fwww.1024tera.com%2Fs%2Fq1")
        .method("GET")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["videoUrl"], "https://cdn.example/b.mp4");
    assert_eq!(body["size"], "1.43 MB");
    assert_eq!(body["method"], "BackupAPI");
}

#[tokio::test]
async fn test_form_body() {
    let upstream = MockServer::start().await;
    Mock::given(path("/primary"))
        .and(query_param("url", "https://terasharelink.com/s/form"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "videoUrl": "https://cdn.example/f.mp4"
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = build_test_app(test_config(&upstream));
    let request = Request::builder()
        .uri("/")
        .method("POST")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("url=https%3A%2F%2Fterasharelink.com%2Fs%2Fform"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["videoUrl"], "https://cdn.example/f.mp4");
    assert_eq!(body["title"], "TeraBox Video");
    assert_eq!(body["size"], "Unknown");
}

#[tokio::test]
async fn test_all_strategies_fail() {
    let upstream = MockServer::start().await;
    Mock::given(path("/primary"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&upstream)
        .await;
    Mock::given(path("/backup"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(1)
        .mount(&upstream)
        .await;
    // The loose domain check lets the scrape target live on the mock server
    Mock::given(path("/terabox.com/s/dead"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&upstream)
        .await;
    Mock::given(path("/proxy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "contents": "<p>gone</p>" })))
        .expect(1)
        .mount(&upstream)
        .await;

    let link = format!("{}/terabox.com/s/dead", upstream.uri());
    let app = build_test_app(test_config(&upstream));
    let response = app
        .oneshot(post_json("/api/resolve", json!({ "url": link })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(
        read_json(response).await,
        json!({ "success": false, "error": "All extraction methods failed" })
    );
}

#[tokio::test]
async fn test_body_too_large() {
    let upstream = MockServer::start().await;
    let mut config = test_config(&upstream);
    config.server.max_body_bytes = ByteSize(16);

    let app = build_test_app(config);
    let response = app
        .oneshot(post_json("/", json!({ "url": "https://terabox.com/s/a-very-long-share-id" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body = read_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_streamed_body_stops_at_limit() {
    let upstream = MockServer::start().await;
    let mut config = test_config(&upstream);
    config.server.max_body_bytes = ByteSize(16);

    let chunks_read = Arc::new(AtomicUsize::new(0));
    let counter = chunks_read.clone();
    let chunks = stream::iter((0..1000).map(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok::<_, std::io::Error>(vec![b'a'; 64 * 1024])
    }));

    let app = build_test_app(config);
    let request = Request::builder()
        .uri("/")
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from_stream(chunks))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(
        read_json(response).await,
        json!({ "success": false, "error": "Payload exceeds 16 bytes" })
    );
    assert!(chunks_read.load(Ordering::SeqCst) <= 2);
}

#[tokio::test]
async fn test_cors_preflight() {
    let upstream = MockServer::start().await;
    let app = build_test_app(test_config(&upstream));

    let request = Request::builder()
        .uri("/")
        .method("OPTIONS")
        .header(header::ORIGIN, "https://player.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn test_health_endpoint() {
    let upstream = MockServer::start().await;
    let app = build_test_app(test_config(&upstream));

    let request = Request::builder()
        .uri("/health")
        .method("GET")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let health = read_json(response).await;

    assert_eq!(health["status"], "healthy");
    assert!(health.get("version").is_some());
    assert_eq!(
        health["strategies"],
        json!(["PrimaryAPI", "BackupAPI", "DirectScrape", "ProxyFetch"])
    );
    assert_eq!(health["metrics"]["requests_received"], 0);
}
