//! Header management and manipulation functionality
//!
//! Provides methods for setting and managing HTTP headers including
//! common headers like Content-Type, Accept, and custom headers.

use crate::builder::core::{ContentType, RequestBuilder};

/// Helper type for accept method that can handle both strings and ContentType enums
pub enum AcceptValue {
    /// String representation of content type
    String(String),
    /// ContentType enum variant
    ContentType(ContentType),
}

impl AcceptValue {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            AcceptValue::String(s) => s,
            AcceptValue::ContentType(ct) => ct.as_str(),
        }
    }
}

impl From<&str> for AcceptValue {
    fn from(s: &str) -> Self {
        AcceptValue::String(s.to_string())
    }
}

impl From<String> for AcceptValue {
    fn from(s: String) -> Self {
        AcceptValue::String(s)
    }
}

impl From<ContentType> for AcceptValue {
    fn from(ct: ContentType) -> Self {
        AcceptValue::ContentType(ct)
    }
}

/// Header constants for common HTTP headers
pub mod header {
    pub use http::header::*;

    /// Custom X-API-Key header for API authentication
    pub const X_API_KEY: &str = "x-api-key";
}

impl<S> RequestBuilder<S> {
    /// Set a header on the request, replacing any previous value
    ///
    /// Invalid names or values fail the request when it is sent.
    ///
    /// # Examples
    /// ```no_run
    /// use courier::RequestBuilder;
    /// use courier::header;
    ///
    /// let response = RequestBuilder::json()
    ///     .header(header::USER_AGENT, "MyApp/1.0")
    ///     .get("http://localhost:8080/data");
    /// ```
    #[must_use]
    pub fn header(mut self, name: impl AsRef<str>, value: &str) -> Self {
        self.config.headers_mut().set(name.as_ref(), value);
        self
    }

    /// Set several headers at once
    #[must_use]
    pub fn headers<'a>(mut self, headers: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let own = self.config.headers_mut();
        for (name, value) in headers {
            own.set(name, value);
        }
        self
    }

    /// Set the Accept header
    #[must_use]
    pub fn accept<T: Into<AcceptValue>>(self, accept: T) -> Self {
        let accept = accept.into();
        self.header(header::ACCEPT, accept.as_str())
    }

    /// Set the Content-Type header
    #[must_use]
    pub fn content_type(self, content_type: ContentType) -> Self {
        self.header(header::CONTENT_TYPE, content_type.as_str())
    }

    #[must_use]
    pub fn user_agent(self, user_agent: &str) -> Self {
        self.header(header::USER_AGENT, user_agent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_client::HttpClient;

    #[test]
    fn headers_land_in_the_request_own_headers() {
        let builder = RequestBuilder::new(&HttpClient::new())
            .accept(ContentType::ApplicationJson)
            .headers([("X-A", "1"), ("X-B", "2")])
            .header("x-a", "3");
        let own = builder.config().own_headers().cloned().unwrap_or_default();
        assert_eq!(own.get("accept"), Some("application/json"));
        assert_eq!(own.get_all("x-a"), vec!["3"]);
        assert_eq!(own.get("x-b"), Some("2"));
    }
}
