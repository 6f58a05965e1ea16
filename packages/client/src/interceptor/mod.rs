//! Request and response interceptors
//!
//! Request interceptors run newest first, before dispatch. Response
//! interceptors run in registration order, after dispatch. Each entry is a
//! fulfilment handler plus an optional rejection handler.

pub mod handler;
pub mod manager;

pub use handler::{
    Handler, Interceptor, InterceptorOptions, OnFulfilled, OnRejected, RunWhen, SyncInterceptor,
};
pub use manager::InterceptorManager;

use crate::config::RequestConfig;
use crate::http::Response;

/// The two registries owned by a client.
#[derive(Default)]
pub struct Interceptors {
    pub request: InterceptorManager<RequestConfig>,
    pub response: InterceptorManager<Response>,
}

impl Interceptors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
