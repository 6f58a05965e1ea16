//! Process defaults every client starts from

use std::sync::{Arc, LazyLock};

use super::{RequestConfig, Transitional, ValidateStatus};
use crate::adapter::AdapterSpec;
use crate::http::HeaderConfig;
use crate::transform::{self, RequestTransform, ResponseTransform};

pub const DEFAULT_ACCEPT: &str = "application/json, text/plain, */*";
pub const XSRF_COOKIE_NAME: &str = "XSRF-TOKEN";
pub const XSRF_HEADER_NAME: &str = "X-XSRF-TOKEN";

// Shared so configs built from separate `defaults()` calls compare equal.
static DEFAULT_REQUEST_TRANSFORM: LazyLock<RequestTransform> =
    LazyLock::new(|| -> RequestTransform { Arc::new(transform::transform_request_default) });
static DEFAULT_RESPONSE_TRANSFORM: LazyLock<ResponseTransform> =
    LazyLock::new(|| -> ResponseTransform { Arc::new(transform::transform_response_default) });
static DEFAULT_VALIDATE_STATUS: LazyLock<ValidateStatus> =
    LazyLock::new(|| -> ValidateStatus { Arc::new(|status: u16| (200..300).contains(&status)) });

/// Adapter candidates tried in order when a config names none.
#[must_use]
pub fn default_adapter() -> AdapterSpec {
    AdapterSpec::List(vec![AdapterSpec::from("xhr"), AdapterSpec::from("http")])
}

/// The configuration a fresh client starts with.
#[must_use]
pub fn defaults() -> RequestConfig {
    RequestConfig {
        adapter: Some(default_adapter()),
        transform_request: Some(vec![DEFAULT_REQUEST_TRANSFORM.clone()]),
        transform_response: Some(vec![DEFAULT_RESPONSE_TRANSFORM.clone()]),
        timeout_ms: Some(0),
        xsrf_cookie_name: Some(XSRF_COOKIE_NAME.to_string()),
        xsrf_header_name: Some(XSRF_HEADER_NAME.to_string()),
        max_content_length: None,
        max_body_length: None,
        validate_status: Some(Some(DEFAULT_VALIDATE_STATUS.clone())),
        headers: Some(HeaderConfig::new().common("Accept", DEFAULT_ACCEPT)),
        transitional: Some(Transitional::defaults()),
        ..RequestConfig::default()
    }
}
