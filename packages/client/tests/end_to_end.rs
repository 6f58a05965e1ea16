use std::sync::{Arc, Mutex};

use courier_client::adapter::{from_fn, settle};
use courier_client::{Body, HttpClient, RequestConfig, Response};
use serde_json::json;

#[derive(Debug, Default, Clone)]
struct Seen {
    url: String,
    content_type: Option<String>,
    body: Option<Body>,
}

#[tokio::test]
async fn post_json_round_trip_through_an_echo_transport() {
    let _ = env_logger::builder().is_test(true).try_init();
    let seen = Arc::new(Mutex::new(Seen::default()));
    let recorder = seen.clone();
    let echo = from_fn(move |config: RequestConfig, _cancel| {
        let body = config.data.clone().unwrap_or_default();
        *recorder.lock().unwrap() = Seen {
            url: config.full_url(),
            content_type: config
                .own_headers()
                .and_then(|headers| headers.content_type())
                .map(str::to_string),
            body: Some(body.clone()),
        };
        async move {
            let response = Response::new(200, body).with_header("Content-Type", "application/json");
            settle(response, &config)
        }
    });

    let client = HttpClient::new().create(RequestConfig::new().base_url("http://h").adapter(echo));
    let response = client.post("/x", json!({"a": 1}), None).await.unwrap();

    let seen = seen.lock().unwrap().clone();
    assert_eq!(seen.url, "http://h/x");
    assert_eq!(seen.content_type.as_deref(), Some("application/json"));
    assert_eq!(seen.body, Some(Body::from("{\"a\":1}")));

    assert_eq!(response.status, 200);
    assert_eq!(response.status_text, "OK");
    assert_eq!(response.data, Body::Json(json!({"a": 1})));
    assert_eq!(response.config.and_then(|config| config.url), Some("/x".to_string()));
}

#[tokio::test]
async fn loaded_configuration_drives_the_request() {
    let spec = r#"{
        "baseURL": "http://api.local/v1",
        "timeout": 250,
        "headers": {"common": {"X-Client": "courier"}, "get": {"X-Read": "yes"}},
        "params": {"tags": ["a", "b"]}
    }"#;
    let loaded = RequestConfig::from_json(spec).unwrap();
    let inspect = from_fn(|config: RequestConfig, _cancel| async move {
        let headers = config.own_headers().cloned().unwrap_or_default();
        let summary = format!(
            "{} {} {} {}",
            config.full_url(),
            config.timeout_ms.unwrap_or_default(),
            headers.get("x-client").unwrap_or("-"),
            headers.get("x-read").unwrap_or("-"),
        );
        Ok(Response::new(200, summary))
    });

    let client = HttpClient::new().create(loaded.adapter(inspect));
    let response = client.get("/items", None).await.unwrap();
    assert_eq!(
        response.data,
        Body::from("http://api.local/v1/items?tags[]=a&tags[]=b 250 courier yes")
    );
}

#[tokio::test]
async fn form_shorthand_sends_multipart() {
    let inspect = from_fn(|config: RequestConfig, _cancel| async move {
        let content_type = config
            .own_headers()
            .and_then(|headers| headers.content_type())
            .unwrap_or_default()
            .to_string();
        Ok(Response::new(200, content_type))
    });
    let client = HttpClient::new().create(RequestConfig::new().adapter(inspect));
    let response = client.post_form("/upload", json!({"name": "x"}), None).await.unwrap();
    let content_type = response.data.as_text().unwrap_or_default().to_string();
    assert!(content_type.starts_with("multipart/form-data; boundary=----courier-"));
}
