//! # Courier
//!
//! HTTP client with request and response interceptors, layered
//! configuration, pluggable transports and cancellation.
//!
//! The free functions send through a process-wide default client created
//! on first use. [`create`] derives independent clients and
//! [`RequestBuilder`] builds a request fluently.
//!
//! ```no_run
//! # async fn run() -> courier::Result<()> {
//! use serde_json::json;
//!
//! let users = courier::get("http://localhost:8080/users", None).await?;
//! println!("{} {:?}", users.status, users.data);
//!
//! let created = courier::json()
//!     .bearer_auth("t0k3n")
//!     .body(&json!({"name": "Ada"}))
//!     .post("http://localhost:8080/users")
//!     .await?;
//! assert_eq!(created.status, 201);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all)]

use std::sync::OnceLock;

use futures::future::try_join_all;

pub mod builder;

pub use builder::*;

pub use courier_client::prelude::*;
pub use courier_client::{adapter, cancel, config, error, interceptor, transform};

static INSTANCE: OnceLock<HttpClient> = OnceLock::new();

/// The process-wide default client, created on first use with the
/// library defaults.
///
/// Interceptors registered on it apply to every free-function request.
pub fn instance() -> &'static HttpClient {
    INSTANCE.get_or_init(|| {
        log::debug!("courier: creating default client");
        HttpClient::new()
    })
}

/// Create a client whose defaults are the default client's merged with
/// `config`. The new client starts without interceptors.
#[must_use]
pub fn create(config: RequestConfig) -> HttpClient {
    instance().create(config)
}

/// Send `config` through the default client.
pub fn request(config: RequestConfig) -> ResponseFuture {
    instance().request(config)
}

pub fn get(url: &str, config: Option<RequestConfig>) -> ResponseFuture {
    instance().get(url, config)
}

pub fn delete(url: &str, config: Option<RequestConfig>) -> ResponseFuture {
    instance().delete(url, config)
}

pub fn head(url: &str, config: Option<RequestConfig>) -> ResponseFuture {
    instance().head(url, config)
}

pub fn options(url: &str, config: Option<RequestConfig>) -> ResponseFuture {
    instance().options(url, config)
}

pub fn post(url: &str, data: impl Into<Body>, config: Option<RequestConfig>) -> ResponseFuture {
    instance().post(url, data, config)
}

pub fn put(url: &str, data: impl Into<Body>, config: Option<RequestConfig>) -> ResponseFuture {
    instance().put(url, data, config)
}

pub fn patch(url: &str, data: impl Into<Body>, config: Option<RequestConfig>) -> ResponseFuture {
    instance().patch(url, data, config)
}

/// Returns true if `error` comes from a cancel token or an abort signal.
#[must_use]
pub fn is_cancel(error: &Error) -> bool {
    error.is_cancel()
}

/// Wait for every request, failing with the first error.
///
/// Responses keep the order of `requests`.
pub async fn all<I>(requests: I) -> Result<Vec<Response>>
where
    I: IntoIterator<Item = ResponseFuture>,
{
    try_join_all(requests).await
}

/// Main entry point providing static builder constructors
pub struct Courier;

impl Courier {
    /// Shorthand for `RequestBuilder::json()`
    #[must_use]
    pub fn json() -> RequestBuilder {
        RequestBuilder::json()
    }

    /// Shorthand for `RequestBuilder::form_urlencoded()`
    #[must_use]
    pub fn form_urlencoded() -> RequestBuilder {
        RequestBuilder::form_urlencoded()
    }

    /// Start a builder that sends through `client`
    #[must_use]
    pub fn with_client(client: &HttpClient) -> RequestBuilder {
        RequestBuilder::new(client)
    }
}

/// Create a new JSON request builder on the default client
#[must_use]
pub fn json() -> RequestBuilder {
    RequestBuilder::json()
}

/// Create a new form-urlencoded request builder on the default client
#[must_use]
pub fn form() -> RequestBuilder {
    RequestBuilder::form_urlencoded()
}
