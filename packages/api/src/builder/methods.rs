//! HTTP method implementations
//!
//! Terminal methods that send the built request. Body-less verbs are only
//! available before a body is set, verbs that carry a body only after.

use courier_client::{Method, ResponseFuture};

use crate::builder::core::{BodyNotSet, BodySet, RequestBuilder};

impl RequestBuilder<BodyNotSet> {
    /// Execute a GET request
    ///
    /// # Examples
    /// ```no_run
    /// # async fn run() -> courier::Result<()> {
    /// use courier::RequestBuilder;
    ///
    /// let response = RequestBuilder::json()
    ///     .accept("application/json")
    ///     .get("http://localhost:8080/users")
    ///     .await?;
    /// println!("{}", response.status);
    /// # Ok(())
    /// # }
    /// ```
    pub fn get(self, url: &str) -> ResponseFuture {
        self.send(Method::Get, url)
    }

    /// Execute a DELETE request
    pub fn delete(self, url: &str) -> ResponseFuture {
        self.send(Method::Delete, url)
    }

    /// Execute a HEAD request
    pub fn head(self, url: &str) -> ResponseFuture {
        self.send(Method::Head, url)
    }

    /// Execute an OPTIONS request
    pub fn options(self, url: &str) -> ResponseFuture {
        self.send(Method::Options, url)
    }
}

impl RequestBuilder<BodySet> {
    /// Execute a POST request with the body set earlier
    ///
    /// # Examples
    /// ```no_run
    /// # async fn run() -> courier::Result<()> {
    /// use courier::RequestBuilder;
    /// use serde_json::json;
    ///
    /// let response = RequestBuilder::json()
    ///     .body(&json!({"name": "Ada"}))
    ///     .post("http://localhost:8080/users")
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn post(self, url: &str) -> ResponseFuture {
        self.send(Method::Post, url)
    }

    /// Execute a PUT request with the body set earlier
    pub fn put(self, url: &str) -> ResponseFuture {
        self.send(Method::Put, url)
    }

    /// Execute a PATCH request with the body set earlier
    pub fn patch(self, url: &str) -> ResponseFuture {
        self.send(Method::Patch, url)
    }
}

impl<S> RequestBuilder<S> {
    fn send(self, method: Method, url: &str) -> ResponseFuture {
        if let Some(error) = self.error {
            log::debug!("courier builder: {method} {url} not sent: {error}");
            return ResponseFuture::ready(Err(error));
        }
        if self.debug_enabled {
            log::debug!("courier builder: {method} {url}");
            log::debug!("courier builder: config {:?}", self.config);
        }
        self.client.request(self.config.method(method).url(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_client::adapter::from_fn;
    use courier_client::{HttpClient, RequestConfig, Response};
    use futures::FutureExt;

    fn echo_client() -> HttpClient {
        HttpClient::with_defaults(RequestConfig::new().adapter(from_fn(|config, _| async move {
            let body = format!("{} {}", config.method_or_default(), config.full_url());
            Ok(Response::new(200, body))
        })))
    }

    #[tokio::test]
    async fn verbs_set_method_and_url() {
        let response = RequestBuilder::new(&echo_client())
            .query("q", "1")
            .get("http://h/a")
            .await
            .unwrap();
        assert_eq!(response.data.as_text(), Some("get http://h/a?q=1"));

        let response = RequestBuilder::new(&echo_client())
            .text_body("x")
            .patch("http://h/b")
            .await
            .unwrap();
        assert_eq!(response.data.as_text(), Some("patch http://h/b"));
    }

    #[test]
    fn deferred_errors_settle_without_sending() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(vec![0u8], 1);
        let outcome = RequestBuilder::new(&echo_client())
            .body(&map)
            .post("http://h/c")
            .now_or_never();
        assert!(matches!(outcome, Some(Err(err)) if err.code() == "ERR_BAD_REQUEST"));
    }
}
