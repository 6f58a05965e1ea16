//! Core `RequestBuilder` structures and base functionality
//!
//! Contains the main `RequestBuilder` struct, body state markers and the
//! foundational methods shared by every builder state.

use std::fmt;
use std::time::Duration;

use serde_json::Value;

use courier_client::{AbortSignal, CancelToken, Error, HttpClient, RequestConfig};

/// Content type enumeration for elegant API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    /// application/json content type
    ApplicationJson,
    /// application/x-www-form-urlencoded content type
    ApplicationFormUrlEncoded,
    /// application/octet-stream content type
    ApplicationOctetStream,
    /// text/plain content type
    TextPlain,
    /// text/html content type
    TextHtml,
    /// multipart/form-data content type
    MultipartFormData,
}

impl ContentType {
    /// Convert content type to string representation
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::ApplicationJson => "application/json",
            ContentType::ApplicationFormUrlEncoded => "application/x-www-form-urlencoded",
            ContentType::ApplicationOctetStream => "application/octet-stream",
            ContentType::TextPlain => "text/plain",
            ContentType::TextHtml => "text/html",
            ContentType::MultipartFormData => "multipart/form-data",
        }
    }
}

impl From<&str> for ContentType {
    fn from(s: &str) -> Self {
        match s {
            "application/x-www-form-urlencoded" => ContentType::ApplicationFormUrlEncoded,
            "application/octet-stream" => ContentType::ApplicationOctetStream,
            "text/plain" => ContentType::TextPlain,
            "text/html" => ContentType::TextHtml,
            "multipart/form-data" => ContentType::MultipartFormData,
            _ => ContentType::ApplicationJson,
        }
    }
}

/// State marker indicating no body has been set
#[derive(Debug, Clone, Copy)]
pub struct BodyNotSet;

/// State marker indicating a body has been set
#[derive(Debug, Clone, Copy)]
pub struct BodySet;

/// Fluent builder that produces a [`RequestConfig`] and sends it through an
/// [`HttpClient`].
///
/// Type parameter `S` tracks the body state:
/// - `BodyNotSet`: body methods and body-less verbs are available
/// - `BodySet`: only the verbs that carry a body are available
#[derive(Clone)]
pub struct RequestBuilder<S = BodyNotSet> {
    /// Client the request is sent through
    pub(crate) client: HttpClient,
    /// Configuration being built
    pub(crate) config: RequestConfig,
    /// Body state marker
    pub(crate) state: S,
    /// Debug logging enabled flag
    pub(crate) debug_enabled: bool,
    /// First error raised while building, reported when the request is sent
    pub(crate) error: Option<Error>,
}

impl RequestBuilder<BodyNotSet> {
    /// Start building a new request with a shared client instance
    #[must_use]
    pub fn new(client: &HttpClient) -> Self {
        Self {
            client: client.clone(),
            config: RequestConfig::new(),
            state: BodyNotSet,
            debug_enabled: false,
            error: None,
        }
    }

    /// Shorthand for a builder on the default instance that sends JSON
    #[must_use]
    pub fn json() -> Self {
        Self::new(crate::instance()).content_type(ContentType::ApplicationJson)
    }

    /// Shorthand for a builder on the default instance that sends
    /// `application/x-www-form-urlencoded`
    #[must_use]
    pub fn form_urlencoded() -> Self {
        Self::new(crate::instance()).content_type(ContentType::ApplicationFormUrlEncoded)
    }
}

impl<S> RequestBuilder<S> {
    /// Log each step of the request at debug level
    #[must_use]
    pub fn debug(mut self) -> Self {
        self.debug_enabled = true;
        self
    }

    /// Set the base URL relative request URLs are resolved against
    #[must_use]
    pub fn base_url(mut self, base_url: &str) -> Self {
        self.config = self.config.base_url(base_url);
        self
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.config = self.config.param(name, value);
        self
    }

    /// Set the request timeout. A zero duration disables it.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self.config = self.config.timeout_ms(millis);
        self
    }

    #[must_use]
    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.config = self.config.cancel_token(token);
        self
    }

    #[must_use]
    pub fn signal(mut self, signal: AbortSignal) -> Self {
        self.config = self.config.signal(signal);
        self
    }

    /// Apply an arbitrary change to the configuration being built
    #[must_use]
    pub fn configure(mut self, f: impl FnOnce(RequestConfig) -> RequestConfig) -> Self {
        self.config = f(self.config);
        self
    }

    /// The configuration built so far
    #[must_use]
    pub fn config(&self) -> &RequestConfig {
        &self.config
    }

    #[must_use]
    pub fn into_config(self) -> RequestConfig {
        self.config
    }

    pub(crate) fn with_state<T>(self, state: T) -> RequestBuilder<T> {
        RequestBuilder {
            client: self.client,
            config: self.config,
            state,
            debug_enabled: self.debug_enabled,
            error: self.error,
        }
    }

    pub(crate) fn fail(mut self, error: Error) -> Self {
        if self.error.is_none() {
            self.error = Some(error);
        }
        self
    }
}

impl<S: fmt::Debug> fmt::Debug for RequestBuilder<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("debug_enabled", &self.debug_enabled)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_types_round_trip_through_strings() {
        for content_type in [
            ContentType::ApplicationJson,
            ContentType::ApplicationFormUrlEncoded,
            ContentType::TextPlain,
            ContentType::MultipartFormData,
        ] {
            assert_eq!(ContentType::from(content_type.as_str()), content_type);
        }
        assert_eq!(ContentType::from("application/unknown"), ContentType::ApplicationJson);
    }

    #[test]
    fn builder_collects_query_and_timeout() {
        let builder = RequestBuilder::new(&HttpClient::new())
            .query("page", 2)
            .timeout(Duration::from_millis(1500));
        let config = builder.config();
        assert_eq!(config.params.as_ref().and_then(|p| p.get("page")), Some(&Value::from(2)));
        assert_eq!(config.timeout_ms, Some(1500));
    }
}
