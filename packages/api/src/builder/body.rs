//! Request body handling functionality
//!
//! Structured bodies are kept as JSON values; the client's default request
//! transform serialises them according to the Content-Type header.

use serde::Serialize;

use courier_client::Body;
use courier_client::error;

use crate::builder::core::{BodyNotSet, BodySet, RequestBuilder};

impl RequestBuilder<BodyNotSet> {
    /// Set a serialisable body
    ///
    /// The body is sent as JSON unless the Content-Type asks for a form or
    /// multipart encoding. A value that cannot be serialised fails the
    /// request when it is sent.
    ///
    /// # Examples
    /// ```no_run
    /// use courier::RequestBuilder;
    /// use serde::Serialize;
    ///
    /// #[derive(Serialize)]
    /// struct User {
    ///     name: String,
    /// }
    ///
    /// let response = RequestBuilder::json()
    ///     .body(&User { name: "Ada".into() })
    ///     .post("http://localhost:8080/users");
    /// ```
    #[must_use]
    pub fn body<T: Serialize>(self, body: &T) -> RequestBuilder<BodySet> {
        match serde_json::to_value(body) {
            Ok(value) => {
                if self.debug_enabled {
                    log::debug!("courier builder: set structured body");
                }
                self.set_body(Body::Json(value))
            }
            Err(e) => {
                log::warn!("courier builder: body serialization failed: {e}");
                self.fail(error::bad_request(e)).set_body(Body::Empty)
            }
        }
    }

    /// Set a plain text body
    #[must_use]
    pub fn text_body(self, text: impl Into<String>) -> RequestBuilder<BodySet> {
        self.set_body(Body::Text(text.into()))
    }

    /// Set raw bytes as request body, sent without any serialisation
    #[must_use]
    pub fn raw_body(self, bytes: impl Into<Vec<u8>>) -> RequestBuilder<BodySet> {
        self.set_body(Body::from(bytes.into()))
    }

    fn set_body(mut self, body: Body) -> RequestBuilder<BodySet> {
        self.config = self.config.data(body);
        self.with_state(BodySet)
    }
}
