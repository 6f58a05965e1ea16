//! Per-request pipeline between the interceptor chains and the transport

use std::fmt;
use std::future::Future;
use std::mem;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::{debug, trace};

use crate::adapter::get_adapter;
use crate::cancel::Cancellation;
use crate::config::{RequestConfig, default_adapter};
use crate::error::Result;
use crate::http::Response;
use crate::transform::{ResponseContext, run_request, run_response};

/// The eventual outcome of a request.
#[must_use = "futures do nothing unless polled"]
pub struct ResponseFuture {
    inner: BoxFuture<'static, Result<Response>>,
}

impl ResponseFuture {
    pub(crate) fn new<F>(future: F) -> Self
    where
        F: Future<Output = Result<Response>> + Send + 'static,
    {
        ResponseFuture {
            inner: future.boxed(),
        }
    }

    /// A future that is already settled.
    pub fn ready(result: Result<Response>) -> Self {
        ResponseFuture::new(futures::future::ready(result))
    }
}

impl Future for ResponseFuture {
    type Output = Result<Response>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.poll_unpin(cx)
    }
}

impl fmt::Debug for ResponseFuture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ResponseFuture")
    }
}

/// Send one prepared config through the transform pipeline and its adapter.
///
/// Everything up to the transport call happens before this returns:
/// cancellation checkpoint, header flattening, request transforms and
/// adapter resolution. Failures there settle the returned future right
/// away. The response (or the error's response) passes through the
/// response transforms before the future settles.
pub fn dispatch_request(config: RequestConfig) -> ResponseFuture {
    match prepare(config) {
        Ok((config, pending, cancellation)) => ResponseFuture::new(complete(config, pending, cancellation)),
        Err(err) => ResponseFuture::ready(Err(err)),
    }
}

fn prepare(mut config: RequestConfig) -> Result<(RequestConfig, BoxFuture<'static, Result<Response>>, Cancellation)> {
    let cancellation = Cancellation::from_config(&config);
    if let Err(err) = cancellation.check() {
        return Err(err.with_config(config));
    }

    let method = config.method_or_default();
    if let Some(headers) = &config.headers
        && !headers.is_flat()
    {
        config.headers = Some(headers.flatten(method));
    }
    config.headers_mut().normalize();

    let data = config.data.take().unwrap_or_default();
    let transforms = config.transform_request.clone().unwrap_or_default();
    let data = match run_request(&transforms, data, config.headers_mut()) {
        Ok(data) => data,
        Err(err) => return Err(err.with_config(config)),
    };
    config.data = Some(data);

    if method.has_body() {
        config
            .headers_mut()
            .set_content_type(Some("application/x-www-form-urlencoded"), false);
    }

    let spec = config.adapter.clone().unwrap_or_else(default_adapter);
    let adapter = match get_adapter(&spec) {
        Ok(adapter) => adapter,
        Err(err) => return Err(err.with_config(config)),
    };

    debug!(method = %method, url = ?config.url, adapter = adapter.name(), "dispatching request");
    let pending = adapter.send(config.clone(), cancellation.clone());
    Ok((config, pending, cancellation))
}

async fn complete(
    config: RequestConfig,
    pending: BoxFuture<'static, Result<Response>>,
    cancellation: Cancellation,
) -> Result<Response> {
    match pending.await {
        Ok(mut response) => {
            trace!(status = response.status, "transport resolved");
            if let Err(err) = cancellation.check() {
                return Err(err.with_config(config));
            }
            if let Err(err) = transform_response(&config, &mut response) {
                return Err(err.with_config(config));
            }
            Ok(response.with_config(config))
        }
        Err(mut err) => {
            debug!(error = %err, "transport rejected");
            if err.is_cancel() {
                return Err(err.with_config(config));
            }
            if let Err(cancelled) = cancellation.check() {
                return Err(cancelled.with_config(config));
            }
            if let Some(response) = err.response_mut()
                && let Err(transform_err) = transform_response(&config, response)
            {
                return Err(transform_err.with_config(config));
            }
            Err(err.with_config(config))
        }
    }
}

fn transform_response(config: &RequestConfig, response: &mut Response) -> Result<()> {
    response.headers.normalize();
    let transforms = config.transform_response.as_deref().unwrap_or_default();
    let context = ResponseContext {
        config,
        headers: &response.headers,
        status: Some(response.status),
    };
    let data = mem::take(&mut response.data);
    response.data = run_response(transforms, data, &context)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::from_fn;
    use crate::cancel::CancelToken;
    use crate::error::Kind;
    use crate::http::Body;

    #[test]
    fn adapter_errors_settle_immediately() {
        let config = RequestConfig::new().url("/x").adapter("nonexistent");
        let outcome = dispatch_request(config).now_or_never();
        match outcome {
            Some(Err(err)) => {
                assert_eq!(err.kind(), Kind::UnknownAdapter);
                assert!(err.config().is_some());
            }
            other => panic!("expected an immediate failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn body_methods_default_to_urlencoded() {
        let adapter = from_fn(|config: RequestConfig, _cancel| async move {
            let content_type = config
                .own_headers()
                .and_then(|headers| headers.content_type())
                .unwrap_or_default()
                .to_string();
            Ok(Response::new(200, content_type))
        });
        let config = RequestConfig::new()
            .method(crate::http::Method::Post)
            .data("raw")
            .adapter(adapter);
        let response = dispatch_request(config).await.unwrap();
        assert_eq!(response.data, Body::from("application/x-www-form-urlencoded"));
        assert!(response.config.is_some());
    }

    #[tokio::test]
    async fn cancellation_before_resolution_rejects() {
        let source = CancelToken::source();
        let canceller = source.clone();
        let adapter = from_fn(move |_config, _cancel| {
            canceller.cancel("late");
            async { Ok(Response::new(200, "ok")) }
        });
        let config = RequestConfig::new().adapter(adapter).cancel_token(source.token());
        let err = dispatch_request(config).await.unwrap_err();
        assert!(err.is_cancel());
        assert_eq!(err.message(), Some("late"));
    }
}
