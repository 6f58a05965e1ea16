//! Settled responses and request descriptions

use http::StatusCode;

use super::{Body, Headers, Method};
use crate::config::RequestConfig;

/// What was actually put on the wire for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestInfo {
    pub method: Method,
    pub url: String,
}

impl RequestInfo {
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        RequestInfo {
            method,
            url: url.into(),
        }
    }
}

/// A response produced by a transport.
///
/// The dispatcher attaches the request's config before handing it to the
/// response interceptors.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub data: Body,
    pub status: u16,
    pub status_text: String,
    pub headers: Headers,
    pub config: Option<RequestConfig>,
    pub request: Option<RequestInfo>,
}

impl Response {
    /// Create a response with the canonical reason phrase for `status`.
    #[must_use]
    pub fn new(status: u16, data: impl Into<Body>) -> Self {
        Response {
            data: data.into(),
            status,
            status_text: canonical_reason(status).to_string(),
            headers: Headers::new(),
            config: None,
            request: None,
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.set(name, value);
        self
    }

    #[must_use]
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    #[must_use]
    pub fn with_status_text(mut self, status_text: impl Into<String>) -> Self {
        self.status_text = status_text.into();
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: RequestConfig) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn with_request(mut self, request: RequestInfo) -> Self {
        self.request = Some(request);
        self
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

fn canonical_reason(status: u16) -> &'static str {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("")
}
