//! Header container and per-method header buckets, built on `http::HeaderMap`

use hashbrown::HashMap;
use http::header::{self, HeaderMap, HeaderName, HeaderValue};
use serde_json::{Map, Value};
use thiserror::Error;

use super::Method;
use crate::error::{self, Error as HttpError};

// Response headers that never accept a repeated value.
const IGNORE_DUPLICATE_OF: &[&str] = &[
    "age",
    "authorization",
    "content-length",
    "content-type",
    "etag",
    "expires",
    "from",
    "host",
    "if-modified-since",
    "if-unmodified-since",
    "last-modified",
    "location",
    "max-forwards",
    "proxy-authorization",
    "referer",
    "retry-after",
    "user-agent",
];

/// Header-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("Invalid header name: {name}")]
    InvalidHeaderName { name: String },
    #[error("Invalid header value for {name}")]
    InvalidHeaderValue { name: String },
}

impl From<HeaderError> for HttpError {
    fn from(err: HeaderError) -> Self {
        error::config_validation(err.to_string()).with(err)
    }
}

/// Case-insensitive ordered header container.
///
/// Setters never fail. The first invalid name or value is kept as a deferred
/// error and surfaced by [`Headers::check`] when the request is prepared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Headers {
    map: HeaderMap,
    error: Option<HeaderError>,
}

impl Headers {
    #[must_use]
    pub fn new() -> Self {
        Headers::default()
    }

    /// Build a container from a JSON object of `name: string | [string]`.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        let mut headers = Headers::new();
        if let Value::Object(object) = value {
            for (name, value) in object {
                match value {
                    Value::Array(values) => {
                        for value in values {
                            headers.append(name, &json_to_header_text(value));
                        }
                    }
                    Value::Null | Value::Bool(false) => {}
                    other => {
                        headers.set(name, &json_to_header_text(other));
                    }
                }
            }
        }
        headers
    }

    /// Parse a raw `Name: value` block as sent on the wire.
    ///
    /// Repeated `set-cookie` lines are kept as separate values, repeated
    /// singleton headers keep their first value and everything else is
    /// joined with `", "`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut headers = Headers::new();
        for line in raw.lines() {
            let Some((name, value)) = line.split_once(':') else {
                continue;
            };
            let name = name.trim().to_ascii_lowercase();
            let value = value.trim();
            if name.is_empty() {
                continue;
            }
            if name == "set-cookie" {
                headers.append(&name, value);
                continue;
            }
            match headers.get(&name).map(str::to_string) {
                Some(_) if IGNORE_DUPLICATE_OF.contains(&name.as_str()) => {}
                Some(existing) => {
                    headers.set(&name, &format!("{existing}, {value}"));
                }
                None => {
                    headers.set(&name, value);
                }
            }
        }
        headers
    }

    /// Replace every value of `name` with `value`.
    pub fn set(&mut self, name: &str, value: &str) -> &mut Self {
        if let Some((name, value)) = self.pair(name, value) {
            self.map.insert(name, value);
        }
        self
    }

    /// Add `value` to `name`, keeping existing values.
    pub fn append(&mut self, name: &str, value: &str) -> &mut Self {
        if let Some((name, value)) = self.pair(name, value) {
            self.map.append(name, value);
        }
        self
    }

    /// Consuming variant of [`Headers::set`].
    #[must_use]
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.set(name, value);
        self
    }

    fn pair(&mut self, name: &str, value: &str) -> Option<(HeaderName, HeaderValue)> {
        let Ok(header_name) = HeaderName::from_bytes(name.trim().as_bytes()) else {
            self.error.get_or_insert(HeaderError::InvalidHeaderName {
                name: name.to_string(),
            });
            return None;
        };
        let Ok(header_value) = HeaderValue::from_str(value) else {
            self.error.get_or_insert(HeaderError::InvalidHeaderValue {
                name: name.to_string(),
            });
            return None;
        };
        Some((header_name, header_value))
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(name).and_then(|value| value.to_str().ok())
    }

    #[must_use]
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.map
            .get_all(name)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.map
            .remove(name)
            .and_then(|value| value.to_str().ok().map(str::to_string))
    }

    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.get(header::CONTENT_TYPE.as_str())
    }

    /// Set or clear `Content-Type`.
    ///
    /// Without `rewrite` an existing value is left alone. `None` clears the header.
    pub fn set_content_type(&mut self, value: Option<&str>, rewrite: bool) -> &mut Self {
        if !rewrite && self.contains(header::CONTENT_TYPE.as_str()) {
            return self;
        }
        match value {
            Some(value) => self.set(header::CONTENT_TYPE.as_str(), value),
            None => {
                self.map.remove(header::CONTENT_TYPE);
                self
            }
        }
    }

    /// Trim surrounding whitespace from every value.
    pub fn normalize(&mut self) -> &mut Self {
        let mut normalized = HeaderMap::with_capacity(self.map.len());
        for (name, value) in &self.map {
            let trimmed = value
                .to_str()
                .ok()
                .map(str::trim)
                .and_then(|text| HeaderValue::from_str(text).ok())
                .unwrap_or_else(|| value.clone());
            normalized.append(name.clone(), trimmed);
        }
        self.map = normalized;
        self
    }

    /// Overlay `other` onto `self`. Names present in `other` replace ours.
    pub fn merge(&mut self, other: &Headers) -> &mut Self {
        for name in other.map.keys() {
            self.map.remove(name);
        }
        for (name, value) in &other.map {
            self.map.append(name.clone(), value.clone());
        }
        if self.error.is_none() {
            self.error = other.error.clone();
        }
        self
    }

    /// Render as a JSON object; repeated headers become arrays.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        for name in self.map.keys() {
            let values = self.get_all(name.as_str());
            let value = match values.as_slice() {
                [single] => Value::String((*single).to_string()),
                many => Value::Array(many.iter().map(|v| Value::String((*v).to_string())).collect()),
            };
            object.insert(name.as_str().to_string(), value);
        }
        Value::Object(object)
    }

    /// Surface the first invalid name or value recorded by a setter.
    pub fn check(&self) -> Result<(), HeaderError> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&HeaderError> {
        self.error.as_ref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map
            .iter()
            .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.as_str(), v)))
    }

    #[must_use]
    pub fn as_header_map(&self) -> &HeaderMap {
        &self.map
    }
}

impl From<HeaderMap> for Headers {
    fn from(map: HeaderMap) -> Self {
        Headers { map, error: None }
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for Headers {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.append(name, value);
        }
        headers
    }
}

fn json_to_header_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Request headers split into the shared bucket, per-method buckets and the
/// request's own headers.
///
/// Buckets only exist before dispatch. [`HeaderConfig::flatten`] folds them
/// into `own` for the active method.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderConfig {
    pub common: Headers,
    pub per_method: HashMap<Method, Headers>,
    pub own: Headers,
}

impl HeaderConfig {
    #[must_use]
    pub fn new() -> Self {
        HeaderConfig::default()
    }

    #[must_use]
    pub fn common(mut self, name: &str, value: &str) -> Self {
        self.common.set(name, value);
        self
    }

    #[must_use]
    pub fn for_method(mut self, method: Method, name: &str, value: &str) -> Self {
        self.per_method.entry(method).or_default().set(name, value);
        self
    }

    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.own.set(name, value);
        self
    }

    /// Caseless deep merge, `other` wins on every bucket.
    #[must_use]
    pub fn merge(&self, other: &HeaderConfig) -> HeaderConfig {
        let mut merged = self.clone();
        merged.common.merge(&other.common);
        for (method, headers) in &other.per_method {
            merged.per_method.entry(*method).or_default().merge(headers);
        }
        merged.own.merge(&other.own);
        merged
    }

    /// Fold `common`, then the bucket for `method`, then `own` into a flat
    /// header set and drop every bucket.
    #[must_use]
    pub fn flatten(&self, method: Method) -> HeaderConfig {
        let mut own = self.common.clone();
        if let Some(bucket) = self.per_method.get(&method) {
            own.merge(bucket);
        }
        own.merge(&self.own);
        HeaderConfig {
            own,
            ..HeaderConfig::default()
        }
    }

    #[must_use]
    pub fn is_flat(&self) -> bool {
        self.common.is_empty() && self.per_method.values().all(Headers::is_empty)
    }

    /// The first deferred error recorded in any bucket.
    pub fn check(&self) -> Result<(), HeaderError> {
        self.common.check()?;
        for headers in self.per_method.values() {
            headers.check()?;
        }
        self.own.check()
    }
}

impl From<Headers> for HeaderConfig {
    fn from(own: Headers) -> Self {
        HeaderConfig {
            own,
            ..HeaderConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_caseless() {
        let mut headers = Headers::new();
        headers.set("X-Trace", "1");
        headers.set("x-trace", "2");
        assert_eq!(headers.get("X-TRACE"), Some("2"));
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn invalid_values_are_deferred() {
        let headers = Headers::new().with("x-ok", "1").with("x-bad", "line\nbreak");
        assert_eq!(headers.get("x-ok"), Some("1"));
        assert!(matches!(
            headers.check(),
            Err(HeaderError::InvalidHeaderValue { .. })
        ));
    }

    #[test]
    fn content_type_respects_rewrite() {
        let mut headers = Headers::new().with("Content-Type", "text/plain");
        headers.set_content_type(Some("application/json"), false);
        assert_eq!(headers.content_type(), Some("text/plain"));
        headers.set_content_type(Some("application/json"), true);
        assert_eq!(headers.content_type(), Some("application/json"));
        headers.set_content_type(None, true);
        assert_eq!(headers.content_type(), None);
    }

    #[test]
    fn parse_joins_and_keeps_cookies() {
        let raw = "Content-Type: text/html\r\nContent-Type: text/plain\r\nX-A: 1\r\nx-a: 2\r\nSet-Cookie: a=1\r\nSet-Cookie: b=2\r\n";
        let headers = Headers::parse(raw);
        assert_eq!(headers.content_type(), Some("text/html"));
        assert_eq!(headers.get("x-a"), Some("1, 2"));
        assert_eq!(headers.get_all("set-cookie"), vec!["a=1", "b=2"]);
    }

    #[test]
    fn normalize_trims_values() {
        let mut headers = Headers::new().with("x-pad", "  v  ");
        headers.normalize();
        assert_eq!(headers.get("x-pad"), Some("v"));
    }

    #[test]
    fn flatten_prefers_method_bucket_then_own() {
        let config = HeaderConfig::new()
            .common("A", "1")
            .for_method(Method::Get, "B", "2")
            .for_method(Method::Post, "A", "3");

        let flat = config.flatten(Method::Get);
        assert!(flat.is_flat());
        assert_eq!(flat.own.get("a"), Some("1"));
        assert_eq!(flat.own.get("b"), Some("2"));
        assert_eq!(flat.own.len(), 2);

        let post = config.header("a", "own").flatten(Method::Post);
        assert_eq!(post.own.get("a"), Some("own"));
    }

    #[test]
    fn merge_is_caseless_and_right_biased() {
        let defaults = HeaderConfig::new().common("Accept", "*/*").header("X-Id", "1");
        let overrides = HeaderConfig::new().common("accept", "text/plain").header("x-id", "2");
        let merged = defaults.merge(&overrides);
        assert_eq!(merged.common.get("accept"), Some("text/plain"));
        assert_eq!(merged.own.get("x-id"), Some("2"));
        assert_eq!(merged.own.len(), 1);
    }

    #[test]
    fn json_round_trip_keeps_arrays() {
        let headers = Headers::new().with("a", "1");
        let mut headers = headers;
        headers.append("b", "x");
        headers.append("b", "y");
        let json = headers.to_json();
        assert_eq!(json["a"], "1");
        assert_eq!(json["b"], serde_json::json!(["x", "y"]));
        assert_eq!(Headers::from_json(&json), headers);
    }
}
