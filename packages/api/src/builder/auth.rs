//! Authentication methods for HTTP requests
//!
//! Provides convenient methods for setting authentication headers including
//! API keys, basic authentication, and bearer token authentication.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::builder::core::RequestBuilder;
use crate::builder::headers::header;

impl<S> RequestBuilder<S> {
    /// Set API key authentication header
    ///
    /// Adds an `X-API-Key` header with the provided API key value.
    ///
    /// # Examples
    /// ```no_run
    /// use courier::RequestBuilder;
    ///
    /// let response = RequestBuilder::json()
    ///     .api_key("your-api-key-here")
    ///     .get("http://localhost:8080/protected");
    /// ```
    #[must_use]
    pub fn api_key(self, key: &str) -> Self {
        self.header(header::X_API_KEY, key)
    }

    /// Set basic authentication header
    ///
    /// The credentials are base64 encoded as `user:password`.
    ///
    /// # Examples
    /// ```no_run
    /// use courier::RequestBuilder;
    ///
    /// let response = RequestBuilder::json()
    ///     .basic_auth("username", "password")
    ///     .get("http://localhost:8080/protected");
    /// ```
    #[must_use]
    pub fn basic_auth(self, user: &str, password: &str) -> Self {
        let encoded = STANDARD.encode(format!("{user}:{password}"));
        self.header(header::AUTHORIZATION, &format!("Basic {encoded}"))
    }

    /// Set bearer token authentication header
    ///
    /// # Examples
    /// ```no_run
    /// use courier::RequestBuilder;
    ///
    /// let response = RequestBuilder::json()
    ///     .bearer_auth("your-oauth-token-here")
    ///     .get("http://localhost:8080/protected");
    /// ```
    #[must_use]
    pub fn bearer_auth(self, token: &str) -> Self {
        self.header(header::AUTHORIZATION, &format!("Bearer {token}"))
    }
}

#[cfg(test)]
mod tests {
    use crate::RequestBuilder;
    use courier_client::HttpClient;

    fn authorization(builder: &RequestBuilder) -> Option<String> {
        builder
            .config()
            .own_headers()
            .and_then(|headers| headers.get("authorization"))
            .map(str::to_string)
    }

    #[test]
    fn basic_credentials_are_base64_encoded() {
        let builder = RequestBuilder::new(&HttpClient::new()).basic_auth("user", "pass");
        assert_eq!(authorization(&builder).as_deref(), Some("Basic dXNlcjpwYXNz"));
    }

    #[test]
    fn later_credentials_replace_earlier_ones() {
        let builder = RequestBuilder::new(&HttpClient::new())
            .basic_auth("user", "pass")
            .bearer_auth("t0k3n");
        assert_eq!(authorization(&builder).as_deref(), Some("Bearer t0k3n"));
    }

    #[test]
    fn api_keys_use_their_own_header() {
        let builder = RequestBuilder::new(&HttpClient::new()).api_key("k-1");
        let own = builder.config().own_headers().cloned().unwrap_or_default();
        assert_eq!(own.get("x-api-key"), Some("k-1"));
    }
}
