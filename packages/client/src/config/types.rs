//! The per-request configuration record

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{ParamsSerializer, Transitional};
use crate::adapter::AdapterSpec;
use crate::cancel::{AbortSignal, CancelToken};
use crate::http::{Body, HeaderConfig, Headers, Method, ProgressCallback, ProgressEvent, build_full_path, build_url};
use crate::transform::{RequestTransform, ResponseTransform};

/// Free-form structured options (query params, extension keys).
pub type Params = Map<String, Value>;

/// Decides whether a response status fulfils the request.
pub type ValidateStatus = Arc<dyn Fn(u16) -> bool + Send + Sync>;

/// Shape the transport should give the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    Text,
    Json,
    #[serde(alias = "arraybuffer", alias = "blob")]
    Bytes,
    /// Buffered like `Bytes`; the body is not interpreted.
    Stream,
}

/// Configuration of one request, or the defaults of a client.
///
/// Every field is optional so "not set" stays distinguishable from any
/// value. `validate_status` has a third state: `Some(None)` means the
/// caller cleared the validator explicitly and every status is accepted.
#[derive(Clone, Default)]
pub struct RequestConfig {
    pub url: Option<String>,
    pub method: Option<Method>,
    pub base_url: Option<String>,
    pub headers: Option<HeaderConfig>,
    pub data: Option<Body>,
    pub params: Option<Params>,
    pub params_serializer: Option<ParamsSerializer>,
    /// `0` disables the timeout.
    pub timeout_ms: Option<u64>,
    pub response_type: Option<ResponseType>,
    pub adapter: Option<AdapterSpec>,
    pub cancel_token: Option<CancelToken>,
    pub signal: Option<AbortSignal>,
    pub validate_status: Option<Option<ValidateStatus>>,
    pub transform_request: Option<Vec<RequestTransform>>,
    pub transform_response: Option<Vec<ResponseTransform>>,
    pub transitional: Option<Transitional>,
    pub on_upload_progress: Option<ProgressCallback>,
    pub on_download_progress: Option<ProgressCallback>,
    /// Response body limit in bytes. `None` is unlimited.
    pub max_content_length: Option<u64>,
    /// Request body limit in bytes. `None` is unlimited.
    pub max_body_length: Option<u64>,
    pub xsrf_cookie_name: Option<String>,
    pub xsrf_header_name: Option<String>,
    pub with_credentials: Option<bool>,
    /// Keys with no dedicated field. Deep-merged like any plain object.
    pub extensions: Option<Params>,
}

impl RequestConfig {
    #[must_use]
    pub fn new() -> Self {
        RequestConfig::default()
    }

    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set one of the request's own headers.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers_mut().set(name, value);
        self
    }

    #[must_use]
    pub fn headers(mut self, headers: impl Into<HeaderConfig>) -> Self {
        self.headers = Some(headers.into());
        self
    }

    #[must_use]
    pub fn data(mut self, data: impl Into<Body>) -> Self {
        self.data = Some(data.into());
        self
    }

    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params
            .get_or_insert_with(Params::new)
            .insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn params(mut self, params: Params) -> Self {
        self.params = Some(params);
        self
    }

    #[must_use]
    pub fn params_serializer(mut self, serializer: ParamsSerializer) -> Self {
        self.params_serializer = Some(serializer);
        self
    }

    #[must_use]
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    #[must_use]
    pub fn response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = Some(response_type);
        self
    }

    #[must_use]
    pub fn adapter(mut self, adapter: impl Into<AdapterSpec>) -> Self {
        self.adapter = Some(adapter.into());
        self
    }

    #[must_use]
    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel_token = Some(token);
        self
    }

    #[must_use]
    pub fn signal(mut self, signal: AbortSignal) -> Self {
        self.signal = Some(signal);
        self
    }

    #[must_use]
    pub fn validate_status<F>(mut self, validate: F) -> Self
    where
        F: Fn(u16) -> bool + Send + Sync + 'static,
    {
        self.validate_status = Some(Some(Arc::new(validate)));
        self
    }

    /// Explicitly accept every status, overriding any inherited validator.
    #[must_use]
    pub fn clear_validate_status(mut self) -> Self {
        self.validate_status = Some(None);
        self
    }

    #[must_use]
    pub fn transform_request(mut self, transforms: Vec<RequestTransform>) -> Self {
        self.transform_request = Some(transforms);
        self
    }

    #[must_use]
    pub fn transform_response(mut self, transforms: Vec<ResponseTransform>) -> Self {
        self.transform_response = Some(transforms);
        self
    }

    #[must_use]
    pub fn transitional(mut self, transitional: Transitional) -> Self {
        self.transitional = Some(transitional);
        self
    }

    #[must_use]
    pub fn on_upload_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ProgressEvent) + Send + Sync + 'static,
    {
        self.on_upload_progress = Some(Arc::new(callback));
        self
    }

    #[must_use]
    pub fn on_download_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ProgressEvent) + Send + Sync + 'static,
    {
        self.on_download_progress = Some(Arc::new(callback));
        self
    }

    #[must_use]
    pub fn max_content_length(mut self, limit: u64) -> Self {
        self.max_content_length = Some(limit);
        self
    }

    #[must_use]
    pub fn max_body_length(mut self, limit: u64) -> Self {
        self.max_body_length = Some(limit);
        self
    }

    #[must_use]
    pub fn with_credentials(mut self, enabled: bool) -> Self {
        self.with_credentials = Some(enabled);
        self
    }

    #[must_use]
    pub fn extension(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extensions
            .get_or_insert_with(Params::new)
            .insert(name.into(), value.into());
        self
    }

    /// The request's own headers, created on first use.
    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers.get_or_insert_with(HeaderConfig::default).own
    }

    /// The request's own headers. Buckets are ignored.
    #[must_use]
    pub fn own_headers(&self) -> Option<&Headers> {
        self.headers.as_ref().map(|headers| &headers.own)
    }

    #[must_use]
    pub fn method_or_default(&self) -> Method {
        self.method.unwrap_or_default()
    }

    /// `base_url` joined with `url`, plus the serialized `params`.
    #[must_use]
    pub fn full_url(&self) -> String {
        let path = build_full_path(self.base_url.as_deref(), self.url.as_deref().unwrap_or(""));
        build_url(&path, self.params.as_ref(), self.params_serializer.as_ref())
    }
}

fn same_arc<T: ?Sized>(a: &Option<Arc<T>>, b: &Option<Arc<T>>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        _ => false,
    }
}

fn same_arcs<T: ?Sized>(a: &Option<Vec<Arc<T>>>, b: &Option<Vec<Arc<T>>>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.len() == b.len() && a.iter().zip(b).all(|(a, b)| Arc::ptr_eq(a, b)),
        _ => false,
    }
}

impl PartialEq for RequestConfig {
    /// Data fields compare by value, callbacks and tokens by identity.
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url
            && self.method == other.method
            && self.base_url == other.base_url
            && self.headers == other.headers
            && self.data == other.data
            && self.params == other.params
            && self.params_serializer == other.params_serializer
            && self.timeout_ms == other.timeout_ms
            && self.response_type == other.response_type
            && self.adapter == other.adapter
            && self.cancel_token == other.cancel_token
            && self.signal == other.signal
            && match (&self.validate_status, &other.validate_status) {
                (None, None) => true,
                (Some(a), Some(b)) => same_arc(a, b),
                _ => false,
            }
            && same_arcs(&self.transform_request, &other.transform_request)
            && same_arcs(&self.transform_response, &other.transform_response)
            && self.transitional == other.transitional
            && same_arc(&self.on_upload_progress, &other.on_upload_progress)
            && same_arc(&self.on_download_progress, &other.on_download_progress)
            && self.max_content_length == other.max_content_length
            && self.max_body_length == other.max_body_length
            && self.xsrf_cookie_name == other.xsrf_cookie_name
            && self.xsrf_header_name == other.xsrf_header_name
            && self.with_credentials == other.with_credentials
            && self.extensions == other.extensions
    }
}

impl fmt::Debug for RequestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let validate_status = self.validate_status.as_ref().map(|v| match v {
            Some(_) => "<fn>",
            None => "cleared",
        });
        f.debug_struct("RequestConfig")
            .field("url", &self.url)
            .field("method", &self.method)
            .field("base_url", &self.base_url)
            .field("headers", &self.headers)
            .field("data", &self.data)
            .field("params", &self.params)
            .field("params_serializer", &self.params_serializer)
            .field("timeout_ms", &self.timeout_ms)
            .field("response_type", &self.response_type)
            .field("adapter", &self.adapter)
            .field("cancel_token", &self.cancel_token)
            .field("signal", &self.signal)
            .field("validate_status", &validate_status)
            .field(
                "transform_request",
                &self.transform_request.as_ref().map(Vec::len),
            )
            .field(
                "transform_response",
                &self.transform_response.as_ref().map(Vec::len),
            )
            .field("transitional", &self.transitional)
            .field("max_content_length", &self.max_content_length)
            .field("max_body_length", &self.max_body_length)
            .field("xsrf_cookie_name", &self.xsrf_cookie_name)
            .field("xsrf_header_name", &self.xsrf_header_name)
            .field("with_credentials", &self.with_credentials)
            .field("extensions", &self.extensions)
            .finish_non_exhaustive()
    }
}
