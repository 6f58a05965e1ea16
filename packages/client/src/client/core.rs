//! Core HTTP client implementation
//!
//! Owns the client defaults and interceptor registries, merges every call
//! into a complete config and runs it through the interceptor chains and
//! the dispatcher.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::config::{RequestConfig, Validator, defaults, merge_config};
use crate::dispatch::{ResponseFuture, dispatch_request};
use crate::error::Result;
use crate::http::Response;
use crate::interceptor::{Interceptor, Interceptors, SyncInterceptor};

/// Request orchestrator.
///
/// Clones share the interceptor registries. [`HttpClient::create`] derives
/// an independent client.
#[derive(Clone)]
pub struct HttpClient {
    defaults: RequestConfig,
    interceptors: Arc<Interceptors>,
}

impl Default for HttpClient {
    fn default() -> Self {
        HttpClient::new()
    }
}

impl HttpClient {
    /// Create HttpClient with the process defaults
    #[must_use]
    pub fn new() -> Self {
        HttpClient::with_defaults(defaults())
    }

    /// Create HttpClient with custom defaults
    #[must_use]
    pub fn with_defaults(defaults: RequestConfig) -> Self {
        HttpClient {
            defaults,
            interceptors: Arc::new(Interceptors::new()),
        }
    }

    #[must_use]
    pub fn defaults(&self) -> &RequestConfig {
        &self.defaults
    }

    /// Changes apply to requests started afterwards.
    pub fn defaults_mut(&mut self) -> &mut RequestConfig {
        &mut self.defaults
    }

    #[must_use]
    pub fn interceptors(&self) -> &Interceptors {
        &self.interceptors
    }

    /// A new client whose defaults are this client's defaults merged with
    /// `config`. Interceptors are not inherited.
    #[must_use]
    pub fn create(&self, config: RequestConfig) -> HttpClient {
        HttpClient::with_defaults(merge_config(&self.defaults, &config))
    }

    /// Like [`request`](Self::request) with `url` taking precedence over `config.url`.
    pub fn request_url(&self, url: &str, config: RequestConfig) -> ResponseFuture {
        self.request(config.url(url))
    }

    /// Run one request through the interceptor chains and the dispatcher.
    ///
    /// When every applicable request interceptor is synchronous, the
    /// request chain and the dispatch (up to the transport call) run before
    /// this returns, and invalid options settle the future immediately.
    /// Otherwise nothing runs until the future is polled.
    pub fn request(&self, config: RequestConfig) -> ResponseFuture {
        let (config, validation) = self.prepare(config);

        let request_chain: Vec<Arc<Interceptor<RequestConfig>>> = self
            .interceptors
            .request
            .snapshot()
            .into_iter()
            .rev()
            .filter(|interceptor| interceptor.should_run(&config))
            .collect();
        let response_chain = self.interceptors.response.snapshot();
        trace!(
            request = request_chain.len(),
            response = response_chain.len(),
            "interceptor chain built"
        );

        let sync_chain: Option<Vec<SyncInterceptor<RequestConfig>>> =
            request_chain.iter().map(|interceptor| interceptor.as_sync()).collect();

        match sync_chain {
            Some(sync_chain) => {
                if let Err(err) = validation {
                    return ResponseFuture::ready(Err(err));
                }
                let state = sync_chain
                    .iter()
                    .fold(Ok(config), |state, interceptor| interceptor.apply(state));
                let dispatched = match state {
                    Ok(config) => dispatch_request(config),
                    Err(err) => ResponseFuture::ready(Err(err)),
                };
                ResponseFuture::new(async move {
                    run_response_chain(dispatched.await, &response_chain).await
                })
            }
            None => ResponseFuture::new(async move {
                let mut state = validation.map(|()| config);
                for interceptor in &request_chain {
                    state = interceptor.apply(state).await;
                }
                let outcome = match state {
                    Ok(config) => dispatch_request(config).await,
                    Err(err) => Err(err),
                };
                run_response_chain(outcome, &response_chain).await
            }),
        }
    }

    /// The URL a request with `config` would be sent to.
    #[must_use]
    pub fn get_uri(&self, config: &RequestConfig) -> String {
        merge_config(&self.defaults, config).full_url()
    }

    fn prepare(&self, config: RequestConfig) -> (RequestConfig, Result<()>) {
        let mut merged = merge_config(&self.defaults, &config);
        let validation = validate(&merged);

        let method = merged.method_or_default();
        merged.method = Some(method);
        if let Some(headers) = &merged.headers {
            merged.headers = Some(headers.flatten(method));
        }
        (merged, validation)
    }
}

fn validate(config: &RequestConfig) -> Result<()> {
    if let Some(headers) = &config.headers {
        headers.check()?;
    }
    if let Some(transitional) = &config.transitional {
        transitional.validate()?;
    }
    if let Some(serializer) = &config.params_serializer {
        serializer.validate()?;
    }
    Ok(())
}

async fn run_response_chain(
    outcome: Result<Response>,
    chain: &[Arc<Interceptor<Response>>],
) -> Result<Response> {
    let mut state = outcome;
    for interceptor in chain {
        state = interceptor.apply(state).await;
    }
    state
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("defaults", &self.defaults)
            .field("request_interceptors", &self.interceptors.request.len())
            .field("response_interceptors", &self.interceptors.response.len())
            .finish()
    }
}
