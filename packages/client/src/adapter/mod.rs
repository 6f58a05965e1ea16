//! Transport abstraction and adapter resolution
//!
//! A [`Transport`] performs the I/O of one request. Configs name the
//! transport they want through an [`AdapterSpec`]; the [`AdapterRegistry`]
//! turns that into a callable [`Adapter`].

pub mod http;
pub mod registry;
pub mod settle;

pub use self::http::HttpTransport;
pub use registry::{AdapterRegistry, Registration, get_adapter, global, init};
pub use settle::settle;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;

use crate::cancel::Cancellation;
use crate::config::RequestConfig;
use crate::error::Result;
use crate::http::Response;

/// Performs the network exchange for one fully prepared request.
///
/// The config handed over is merged, header-flattened and body-transformed.
/// Implementations should honor `timeout_ms`, abort promptly when
/// `cancel` fires, and report progress through the config's callbacks.
pub trait Transport: Send + Sync {
    fn send(&self, config: RequestConfig, cancel: Cancellation) -> BoxFuture<'static, Result<Response>>;

    /// Name used in logs.
    fn name(&self) -> &str {
        "custom"
    }
}

/// A shareable transport.
pub type Adapter = Arc<dyn Transport>;

struct FnTransport<F> {
    send: F,
}

impl<F, Fut> Transport for FnTransport<F>
where
    F: Fn(RequestConfig, Cancellation) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response>> + Send + 'static,
{
    fn send(&self, config: RequestConfig, cancel: Cancellation) -> BoxFuture<'static, Result<Response>> {
        (self.send)(config, cancel).boxed()
    }
}

/// Wrap a closure as an [`Adapter`].
pub fn from_fn<F, Fut>(send: F) -> Adapter
where
    F: Fn(RequestConfig, Cancellation) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response>> + Send + 'static,
{
    Arc::new(FnTransport { send })
}

/// What a config asks for as its transport.
#[derive(Clone)]
pub enum AdapterSpec {
    /// A registry name, matched case-insensitively.
    Name(String),
    /// A transport used as-is.
    Transport(Adapter),
    /// Explicitly marks the candidate as unsupported here.
    Disabled,
    /// A value that is neither a name nor a transport. Never callable.
    Value(Value),
    /// Candidates tried in order; the first usable one wins.
    List(Vec<AdapterSpec>),
}

impl AdapterSpec {
    /// Read an adapter option from JSON: strings are names, `false` disables,
    /// arrays are candidate lists and `null` means "not set".
    #[must_use]
    pub fn from_value(value: Value) -> Option<AdapterSpec> {
        match value {
            Value::Null => None,
            Value::String(name) => Some(AdapterSpec::Name(name)),
            Value::Bool(false) => Some(AdapterSpec::Disabled),
            Value::Array(items) => Some(AdapterSpec::List(
                items
                    .into_iter()
                    .map(|item| AdapterSpec::from_value(item.clone()).unwrap_or(AdapterSpec::Value(item)))
                    .collect(),
            )),
            other => Some(AdapterSpec::Value(other)),
        }
    }

    /// The candidates in the order they are tried.
    #[must_use]
    pub fn candidates(&self) -> &[AdapterSpec] {
        match self {
            AdapterSpec::List(items) => items,
            single => std::slice::from_ref(single),
        }
    }
}

impl From<&str> for AdapterSpec {
    fn from(name: &str) -> Self {
        AdapterSpec::Name(name.to_string())
    }
}

impl From<String> for AdapterSpec {
    fn from(name: String) -> Self {
        AdapterSpec::Name(name)
    }
}

impl From<Adapter> for AdapterSpec {
    fn from(adapter: Adapter) -> Self {
        AdapterSpec::Transport(adapter)
    }
}

impl From<Vec<AdapterSpec>> for AdapterSpec {
    fn from(candidates: Vec<AdapterSpec>) -> Self {
        AdapterSpec::List(candidates)
    }
}

impl PartialEq for AdapterSpec {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AdapterSpec::Name(a), AdapterSpec::Name(b)) => a == b,
            (AdapterSpec::Transport(a), AdapterSpec::Transport(b)) => Arc::ptr_eq(a, b),
            (AdapterSpec::Disabled, AdapterSpec::Disabled) => true,
            (AdapterSpec::Value(a), AdapterSpec::Value(b)) => a == b,
            (AdapterSpec::List(a), AdapterSpec::List(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for AdapterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdapterSpec::Name(name) => f.debug_tuple("Name").field(name).finish(),
            AdapterSpec::Transport(adapter) => f.debug_tuple("Transport").field(&adapter.name()).finish(),
            AdapterSpec::Disabled => f.write_str("Disabled"),
            AdapterSpec::Value(value) => f.debug_tuple("Value").field(value).finish(),
            AdapterSpec::List(items) => f.debug_list().entries(items).finish(),
        }
    }
}
