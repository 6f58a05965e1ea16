//! Request and response body transforms
//!
//! Transforms run in registration order. Request transforms see the body and
//! may rewrite headers; response transforms see the body plus a read-only
//! view of the response.

use std::sync::Arc;

use crate::config::RequestConfig;
use crate::error::Result;
use crate::http::{Body, Headers};

pub mod defaults;
pub mod multipart;

pub use defaults::{transform_request_default, transform_response_default};
pub use multipart::FormData;

/// `(body, headers) -> body`, run before the transport.
pub type RequestTransform = Arc<dyn Fn(Body, &mut Headers) -> Result<Body> + Send + Sync>;

/// `(body, context) -> body`, run on every response, including those
/// carried by a failed request.
pub type ResponseTransform = Arc<dyn Fn(Body, &ResponseContext<'_>) -> Result<Body> + Send + Sync>;

/// What a response transform may inspect.
#[derive(Debug, Clone, Copy)]
pub struct ResponseContext<'a> {
    pub config: &'a RequestConfig,
    pub headers: &'a Headers,
    pub status: Option<u16>,
}

#[must_use]
pub fn request_transform<F>(transform: F) -> RequestTransform
where
    F: Fn(Body, &mut Headers) -> Result<Body> + Send + Sync + 'static,
{
    Arc::new(transform)
}

#[must_use]
pub fn response_transform<F>(transform: F) -> ResponseTransform
where
    F: Fn(Body, &ResponseContext<'_>) -> Result<Body> + Send + Sync + 'static,
{
    Arc::new(transform)
}

/// Thread `data` through every request transform in order.
pub fn run_request(transforms: &[RequestTransform], data: Body, headers: &mut Headers) -> Result<Body> {
    transforms
        .iter()
        .try_fold(data, |data, transform| transform(data, headers))
}

/// Thread `data` through every response transform in order.
pub fn run_response(
    transforms: &[ResponseTransform],
    data: Body,
    context: &ResponseContext<'_>,
) -> Result<Body> {
    transforms
        .iter()
        .try_fold(data, |data, transform| transform(data, context))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_transforms_run_in_order_and_see_headers() {
        let transforms = vec![
            request_transform(|data, headers| {
                headers.set("x-step", "1");
                Ok(Body::Text(format!("{}a", data.as_text().unwrap_or(""))))
            }),
            request_transform(|data, headers| {
                let step = headers.get("x-step").unwrap_or("0").to_string();
                Ok(Body::Text(format!("{}b{step}", data.as_text().unwrap_or(""))))
            }),
        ];
        let mut headers = Headers::new();
        let out = run_request(&transforms, Body::from(">"), &mut headers).unwrap();
        assert_eq!(out, Body::from(">ab1"));
    }

    #[test]
    fn response_transforms_stop_at_first_error() {
        let transforms = vec![
            response_transform(|_, _| Err(crate::error::bad_response("boom"))),
            response_transform(|_, _| Ok(Body::from("unreachable"))),
        ];
        let config = RequestConfig::new();
        let headers = Headers::new();
        let context = ResponseContext {
            config: &config,
            headers: &headers,
            status: Some(200),
        };
        assert!(run_response(&transforms, Body::Empty, &context).is_err());
    }
}
