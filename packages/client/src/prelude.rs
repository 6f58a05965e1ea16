//! Courier prelude
//!
//! The types most callers need to build, send and inspect requests.

// Orchestrator and its future
pub use crate::client::HttpClient;
pub use crate::dispatch::ResponseFuture;

// Configuration
pub use crate::config::{ConfigSpec, ParamsSerializer, RequestConfig, ResponseType, Transitional};

// Messages
pub use crate::http::{Body, HeaderConfig, Headers, Method, ProgressEvent, RequestInfo, Response};

// Interceptors
pub use crate::interceptor::{Handler, InterceptorOptions};

// Transports
pub use crate::adapter::{Adapter, AdapterSpec, Transport};

// Cancellation
pub use crate::cancel::{AbortController, AbortSignal, CancelSource, CancelToken, Cancellation};

// Error types
pub use crate::error::{Error, HttpError, Kind, Result};
