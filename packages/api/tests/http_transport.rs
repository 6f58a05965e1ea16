//! Requests against a local axum server through the built-in `http` transport

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use axum::Router;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use serde_json::{Value, json};

use courier::{AbortController, Body, HttpClient, Kind, RequestBuilder, RequestConfig};

async fn serve() -> String {
    let _ = env_logger::builder().is_test(true).try_init();

    let app = Router::new()
        .route("/users", get(|| async { axum::Json(json!([{"id": 1, "name": "Ada"}])) }))
        .route(
            "/echo",
            post(|headers: HeaderMap, body: String| async move {
                let content_type = headers
                    .get("content-type")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                let authorization = headers
                    .get("authorization")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                axum::Json(json!({
                    "content_type": content_type,
                    "authorization": authorization,
                    "body": body,
                }))
            }),
        )
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                "late"
            }),
        )
        .route("/big", get(|| async { "x".repeat(4096) }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn get_parses_json_responses() {
    let base = serve().await;
    let response = courier::get(&format!("{base}/users"), None).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.status_text, "OK");
    assert_eq!(response.headers.content_type(), Some("application/json"));
    assert_eq!(response.data, Body::Json(json!([{"id": 1, "name": "Ada"}])));
    assert!(response.config.is_some());
}

#[tokio::test]
async fn builder_posts_serialised_bodies() {
    let base = serve().await;
    let response = RequestBuilder::new(&HttpClient::new())
        .bearer_auth("t0k3n")
        .body(&json!({"name": "Ada"}))
        .post(&format!("{base}/echo"))
        .await
        .unwrap();

    let echoed: Value = response.data.json().unwrap();
    assert_eq!(echoed["content_type"], "application/json");
    assert_eq!(echoed["authorization"], "Bearer t0k3n");
    assert_eq!(echoed["body"], "{\"name\":\"Ada\"}");
}

#[tokio::test]
async fn form_bodies_are_urlencoded_on_the_wire() {
    let base = serve().await;
    let response = courier::Courier::with_client(&HttpClient::new())
        .content_type(courier::ContentType::ApplicationFormUrlEncoded)
        .body(&json!({"q": "a b", "page": 2}))
        .post(&format!("{base}/echo"))
        .await
        .unwrap();

    let echoed: Value = response.data.json().unwrap();
    assert_eq!(echoed["content_type"], "application/x-www-form-urlencoded");
    assert_eq!(echoed["body"], "page=2&q=a+b");
}

#[tokio::test]
async fn missing_routes_reject_with_the_response_attached() {
    let base = serve().await;
    let err = courier::get(&format!("{base}/missing"), None).await.unwrap_err();

    assert!(err.is_status());
    assert_eq!(err.code(), "ERR_BAD_REQUEST");
    assert_eq!(err.status(), Some(404));
    assert!(err.response().is_some_and(|response| response.status_text == "Not Found"));
}

#[tokio::test]
async fn clearing_the_validator_accepts_any_status() {
    let base = serve().await;
    let config = RequestConfig::new().clear_validate_status();
    let response = courier::get(&format!("{base}/missing"), Some(config)).await.unwrap();
    assert_eq!(response.status, 404);
}

#[tokio::test]
async fn slow_responses_time_out() {
    let base = serve().await;
    let err = RequestBuilder::new(&HttpClient::new())
        .timeout(Duration::from_millis(50))
        .get(&format!("{base}/slow"))
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(err.code(), "ECONNABORTED");
    assert_eq!(err.message(), Some("timeout of 50ms exceeded"));
}

#[tokio::test]
async fn abort_stops_a_request_in_flight() {
    let base = serve().await;
    let controller = AbortController::new();
    let pending = RequestBuilder::new(&HttpClient::new())
        .signal(controller.signal())
        .get(&format!("{base}/slow"));

    let abort = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        controller.abort();
    });
    let err = pending.await.unwrap_err();
    abort.await.unwrap();

    assert!(courier::is_cancel(&err));
    assert_eq!(err.kind(), Kind::Cancelled);
}

#[tokio::test]
async fn oversized_responses_are_rejected() {
    let base = serve().await;
    let config = RequestConfig::new().max_content_length(1024);
    let err = courier::get(&format!("{base}/big"), Some(config)).await.unwrap_err();

    assert_eq!(err.kind(), Kind::BadResponse);
    assert_eq!(err.message(), Some("maxContentLength size of 1024 exceeded"));
}

#[tokio::test]
async fn download_progress_reaches_the_full_length() {
    let base = serve().await;
    let loaded = Arc::new(AtomicU64::new(0));
    let seen = Arc::clone(&loaded);
    let config = RequestConfig::new().on_download_progress(move |event| {
        seen.store(event.loaded, Ordering::SeqCst);
    });

    let response = courier::get(&format!("{base}/big"), Some(config)).await.unwrap();
    assert_eq!(response.data.as_text().map(str::len), Some(4096));
    assert_eq!(loaded.load(Ordering::SeqCst), 4096);
}

#[tokio::test]
async fn all_keeps_request_order() {
    let base = serve().await;
    let responses = courier::all([
        courier::get(&format!("{base}/big"), None),
        courier::get(&format!("{base}/users"), None),
    ])
    .await
    .unwrap();

    assert_eq!(responses.len(), 2);
    assert!(responses[0].data.as_text().is_some_and(|text| text.len() == 4096));
    assert!(matches!(responses[1].data, Body::Json(_)));
}

#[tokio::test]
async fn all_fails_with_the_first_error() {
    let base = serve().await;
    let err = courier::all([
        courier::get(&format!("{base}/users"), None),
        courier::get(&format!("{base}/missing"), None),
    ])
    .await
    .unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn non_http_schemes_are_unsupported() {
    let err = courier::get("ftp://127.0.0.1/file", None).await.unwrap_err();
    assert_eq!(err.kind(), Kind::UnsupportedProtocol);
    assert_eq!(err.code(), "ERR_NOT_SUPPORT");
}
