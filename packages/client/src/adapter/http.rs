//! Socket transport on top of the hyper legacy client

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use ::http::header::CONTENT_LENGTH;
use ::http::response::Parts;
use bytes::{Bytes, BytesMut};
use futures::FutureExt;
use futures::future::BoxFuture;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use tracing::{debug, trace};

use super::{Adapter, Transport, settle};
use crate::cancel::Cancellation;
use crate::config::{RequestConfig, ResponseType};
use crate::error::{self, Result};
use crate::http::{Body, Direction, Headers, ProgressTracker, RequestInfo, Response};

static SHARED: LazyLock<Adapter> = LazyLock::new(|| -> Adapter { Arc::new(HttpTransport::new()) });

/// HTTP/1 transport registered as `http`.
///
/// Keeps no idle connections, so one instance can serve requests from
/// independent runtimes.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client<HttpConnector, Full<Bytes>>,
}

impl HttpTransport {
    #[must_use]
    pub fn new() -> Self {
        let client = Client::builder(TokioExecutor::new())
            .pool_max_idle_per_host(0)
            .build_http();
        HttpTransport { client }
    }

    /// The process-wide instance.
    #[must_use]
    pub fn shared() -> Adapter {
        SHARED.clone()
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        HttpTransport::new()
    }
}

impl Transport for HttpTransport {
    fn send(&self, config: RequestConfig, cancel: Cancellation) -> BoxFuture<'static, Result<Response>> {
        let client = self.client.clone();
        async move { exchange(client, config, cancel).await }.boxed()
    }

    fn name(&self) -> &str {
        "http"
    }
}

async fn exchange(
    client: Client<HttpConnector, Full<Bytes>>,
    config: RequestConfig,
    cancel: Cancellation,
) -> Result<Response> {
    cancel.check()?;

    let url = config.full_url();
    let uri: ::http::Uri = url.parse().map_err(error::invalid_url)?;
    match uri.scheme_str() {
        Some("http") => {}
        Some(other) => return Err(error::unsupported_protocol(other)),
        None => return Err(error::invalid_url(format!("missing scheme in {url}"))),
    }

    let method = config.method_or_default();
    let body = match &config.data {
        Some(data) => data.to_bytes()?,
        None => Bytes::new(),
    };
    if let Some(limit) = config.max_body_length
        && body.len() as u64 > limit
    {
        return Err(error::bad_request("Request body larger than maxBodyLength limit")
            .with_code("ERR_FR_MAX_BODY_LENGTH_EXCEEDED"));
    }
    let length = body.len() as u64;

    let mut request = ::http::Request::builder()
        .method(method.to_http())
        .uri(uri)
        .body(Full::new(body))
        .map_err(error::bad_request)?;
    if let Some(headers) = config.own_headers() {
        *request.headers_mut() = headers.as_header_map().clone();
    }

    let info = RequestInfo::new(method, url);
    debug!(method = %method, url = %info.url, "sending request");

    if let Some(on_upload) = &config.on_upload_progress {
        on_upload(&ProgressTracker::new(Direction::Upload, Some(length)).advance(length));
    }

    let timeout_ms = config.timeout_ms.unwrap_or(0);
    let clarify = config
        .transitional
        .as_ref()
        .is_some_and(|transitional| transitional.clarify_timeout());

    let io = async {
        let roundtrip = roundtrip(&client, request, &config);
        if timeout_ms == 0 {
            return roundtrip.await;
        }
        tokio::time::timeout(Duration::from_millis(timeout_ms), roundtrip)
            .await
            .unwrap_or_else(|_| Err(error::timeout(timeout_ms, clarify)))
    };

    let outcome = tokio::select! {
        reason = cancel.cancelled() => {
            trace!("request aborted by cancellation");
            Err(error::cancelled(&reason))
        }
        result = io => result,
    };
    let (parts, bytes) = outcome.map_err(|err| err.with_request(info.clone()))?;

    let data = match config.response_type {
        Some(ResponseType::Bytes | ResponseType::Stream) => Body::Bytes(bytes),
        _ => Body::Text(String::from_utf8_lossy(&bytes).into_owned()),
    };
    let response = Response::new(parts.status.as_u16(), data)
        .with_headers(Headers::from(parts.headers))
        .with_request(info);
    debug!(status = response.status, "response received");

    settle(response, &config)
}

async fn roundtrip(
    client: &Client<HttpConnector, Full<Bytes>>,
    request: ::http::Request<Full<Bytes>>,
    config: &RequestConfig,
) -> Result<(Parts, Bytes)> {
    let response = client.request(request).await.map_err(error::network)?;
    let (parts, mut body): (Parts, Incoming) = response.into_parts();

    let total = parts
        .headers
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok());
    let mut tracker = ProgressTracker::new(Direction::Download, total);
    let mut buf = BytesMut::new();

    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(error::network)?;
        let Ok(chunk) = frame.into_data() else {
            continue;
        };
        buf.extend_from_slice(&chunk);
        if let Some(limit) = config.max_content_length
            && buf.len() as u64 > limit
        {
            return Err(error::bad_response(format!("maxContentLength size of {limit} exceeded")));
        }
        let event = tracker.advance(chunk.len() as u64);
        if let Some(on_download) = &config.on_download_progress {
            on_download(&event);
        }
    }

    Ok((parts, buf.freeze()))
}
