//! Combining client defaults with a call-site config
//!
//! Every field follows one of four policies:
//!
//! | policy                        | fields                                                       |
//! |-------------------------------|--------------------------------------------------------------|
//! | override wins                 | `url`, `method`, `data`                                      |
//! | defaults unless overridden    | `base_url`, `timeout_ms`, `response_type`, `adapter`, transforms, callbacks, limits, xsrf names |
//! | present in override controls  | `validate_status`                                            |
//! | caseless deep merge           | `headers`                                                    |
//!
//! Plain objects (`params`, `transitional`, `extensions`) are deep merged.
//! Vectors are copied, never shared with either input.

use super::{Params, RequestConfig};
use crate::http::HeaderConfig;
use serde_json::Value;

/// Merge `overrides` onto `defaults`, field by field.
///
/// Pure and deterministic. An absent override is `RequestConfig::default()`.
#[must_use]
pub fn merge_config(defaults: &RequestConfig, overrides: &RequestConfig) -> RequestConfig {
    RequestConfig {
        url: override_wins(&defaults.url, &overrides.url),
        method: override_wins(&defaults.method, &overrides.method),
        data: override_wins(&defaults.data, &overrides.data),

        base_url: default_to_override(&defaults.base_url, &overrides.base_url),
        params_serializer: default_to_override(&defaults.params_serializer, &overrides.params_serializer),
        timeout_ms: default_to_override(&defaults.timeout_ms, &overrides.timeout_ms),
        response_type: default_to_override(&defaults.response_type, &overrides.response_type),
        adapter: default_to_override(&defaults.adapter, &overrides.adapter),
        cancel_token: default_to_override(&defaults.cancel_token, &overrides.cancel_token),
        signal: default_to_override(&defaults.signal, &overrides.signal),
        transform_request: default_to_override(&defaults.transform_request, &overrides.transform_request),
        transform_response: default_to_override(&defaults.transform_response, &overrides.transform_response),
        on_upload_progress: default_to_override(&defaults.on_upload_progress, &overrides.on_upload_progress),
        on_download_progress: default_to_override(&defaults.on_download_progress, &overrides.on_download_progress),
        max_content_length: default_to_override(&defaults.max_content_length, &overrides.max_content_length),
        max_body_length: default_to_override(&defaults.max_body_length, &overrides.max_body_length),
        xsrf_cookie_name: default_to_override(&defaults.xsrf_cookie_name, &overrides.xsrf_cookie_name),
        xsrf_header_name: default_to_override(&defaults.xsrf_header_name, &overrides.xsrf_header_name),
        with_credentials: default_to_override(&defaults.with_credentials, &overrides.with_credentials),

        validate_status: merge_direct_keys(&defaults.validate_status, &overrides.validate_status),

        headers: merge_headers(&defaults.headers, &overrides.headers),

        params: merge_deep_properties(&defaults.params, &overrides.params),
        extensions: merge_deep_properties(&defaults.extensions, &overrides.extensions),
        transitional: match (&defaults.transitional, &overrides.transitional) {
            (Some(a), Some(b)) => Some(a.merge(b)),
            (a, b) => b.clone().or_else(|| a.clone()),
        },
    }
}

fn override_wins<T: Clone>(defaults: &Option<T>, overrides: &Option<T>) -> Option<T> {
    overrides.clone().or_else(|| defaults.clone())
}

fn default_to_override<T: Clone>(defaults: &Option<T>, overrides: &Option<T>) -> Option<T> {
    match overrides {
        Some(value) => Some(value.clone()),
        None => defaults.clone(),
    }
}

// Presence of the key in `overrides` decides, even when it holds an explicit
// clear (`Some(None)`). That clear survives the merge.
fn merge_direct_keys<T: Clone>(
    defaults: &Option<Option<T>>,
    overrides: &Option<Option<T>>,
) -> Option<Option<T>> {
    if overrides.is_some() {
        overrides.clone()
    } else {
        defaults.clone()
    }
}

fn merge_headers(defaults: &Option<HeaderConfig>, overrides: &Option<HeaderConfig>) -> Option<HeaderConfig> {
    match (defaults, overrides) {
        (Some(a), Some(b)) => Some(a.merge(b)),
        (a, b) => b.clone().or_else(|| a.clone()),
    }
}

fn merge_deep_properties(defaults: &Option<Params>, overrides: &Option<Params>) -> Option<Params> {
    match (defaults, overrides) {
        (Some(a), Some(b)) => Some(deep_merge(a, b)),
        (a, b) => b.clone().or_else(|| a.clone()),
    }
}

/// Recursively merge two JSON objects; `source` wins on non-object collisions.
#[must_use]
pub fn deep_merge(target: &Params, source: &Params) -> Params {
    let mut merged = target.clone();
    for (key, value) in source {
        let next = match (merged.get(key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                Value::Object(deep_merge(existing, incoming))
            }
            _ => value.clone(),
        };
        merged.insert(key.clone(), next);
    }
    merged
}
