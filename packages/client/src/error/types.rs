use std::error::Error as StdError;
use std::fmt;

use crate::config::RequestConfig;
use crate::http::{RequestInfo, Response};

/// A Result alias where the Err case is `courier_client::Error`.
pub type Result<T> = std::result::Result<T, Error>;

pub(crate) type BoxError = Box<dyn StdError + Send + Sync>;

/// Represents every failure a request can settle with.
///
/// The error always knows its [`Kind`]. Once the request has been merged it
/// also carries the originating config, and once the transport has answered
/// it carries the request description and (for status failures) the response.
pub struct Error {
    pub(crate) inner: Box<Inner>,
}

pub(crate) struct Inner {
    pub(crate) kind: Kind,
    pub(crate) code: Option<&'static str>,
    pub(crate) message: Option<String>,
    pub(crate) source: Option<BoxError>,
    pub(crate) config: Option<RequestConfig>,
    pub(crate) request: Option<RequestInfo>,
    pub(crate) response: Option<Response>,
}

impl Clone for Inner {
    fn clone(&self) -> Self {
        Inner {
            kind: self.kind,
            code: self.code,
            message: self.message.clone(),
            source: None, // Cannot clone trait objects, so we lose the source
            config: self.config.clone(),
            request: self.request.clone(),
            response: self.response.clone(),
        }
    }
}

impl Clone for Error {
    fn clone(&self) -> Self {
        Error {
            inner: self.inner.clone(),
        }
    }
}

/// Failure taxonomy shared by the orchestrator, the dispatcher and transports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Malformed `transitional`, `paramsSerializer` or header options.
    ConfigValidation,
    /// The adapter name is not in the registry.
    UnknownAdapter,
    /// The adapter name is known but was not built into this binary.
    AdapterUnavailable,
    /// The adapter is not supported by the running environment.
    NotSupported,
    /// The resolved adapter candidate is not a transport.
    InvalidAdapter,
    /// Cancelled through a cancel token or an abort signal.
    Cancelled,
    /// The transport gave up after `timeout_ms`.
    Timeout,
    /// The transport could not reach the server.
    Network,
    /// The URL scheme is not handled by the transport.
    UnsupportedProtocol,
    /// `validate_status` rejected the response status.
    BadStatus,
    /// The request could not be prepared (serialization, body limits).
    BadRequest,
    /// The response could not be interpreted (strict JSON, content limits).
    BadResponse,
    /// Any other transport failure.
    Transport,
    /// Raised by a user interceptor.
    Interceptor,
}

impl Kind {
    /// Stable error code exposed to callers.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Kind::ConfigValidation => "ERR_BAD_OPTION_VALUE",
            Kind::UnknownAdapter | Kind::AdapterUnavailable | Kind::InvalidAdapter => {
                "ERR_BAD_ADAPTER"
            }
            Kind::NotSupported | Kind::UnsupportedProtocol => "ERR_NOT_SUPPORT",
            Kind::Cancelled => "ERR_CANCELED",
            Kind::Timeout => "ECONNABORTED",
            Kind::Network => "ERR_NETWORK",
            Kind::BadStatus | Kind::BadResponse => "ERR_BAD_RESPONSE",
            Kind::BadRequest => "ERR_BAD_REQUEST",
            Kind::Transport => "ERR_TRANSPORT",
            Kind::Interceptor => "ERR_INTERCEPTOR",
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Kind::ConfigValidation => "invalid configuration",
            Kind::UnknownAdapter => "unknown adapter",
            Kind::AdapterUnavailable => "adapter not available in this build",
            Kind::NotSupported => "not supported by the environment",
            Kind::InvalidAdapter => "adapter is not a transport",
            Kind::Cancelled => "canceled",
            Kind::Timeout => "request timeout",
            Kind::Network => "network error",
            Kind::UnsupportedProtocol => "unsupported protocol",
            Kind::BadStatus => "request failed with status code",
            Kind::BadRequest => "bad request",
            Kind::BadResponse => "bad response",
            Kind::Transport => "transport error",
            Kind::Interceptor => "interceptor error",
        }
    }
}

impl Error {
    pub fn new(kind: Kind) -> Error {
        Error {
            inner: Box::new(Inner {
                kind,
                code: None,
                message: None,
                source: None,
                config: None,
                request: None,
                response: None,
            }),
        }
    }

    #[must_use = "Error builder methods return a new Error and should be used"]
    pub fn with<E: Into<BoxError>>(mut self, source: E) -> Error {
        self.inner.source = Some(source.into());
        self
    }

    #[must_use = "Error builder methods return a new Error and should be used"]
    pub fn with_message(mut self, message: impl Into<String>) -> Error {
        self.inner.message = Some(message.into());
        self
    }

    #[must_use = "Error builder methods return a new Error and should be used"]
    pub fn with_code(mut self, code: &'static str) -> Error {
        self.inner.code = Some(code);
        self
    }

    /// Attach the originating config. An already attached config is kept.
    #[must_use = "Error builder methods return a new Error and should be used"]
    pub fn with_config(mut self, config: RequestConfig) -> Error {
        if self.inner.config.is_none() {
            self.inner.config = Some(config);
        }
        self
    }

    #[must_use = "Error builder methods return a new Error and should be used"]
    pub fn with_request(mut self, request: RequestInfo) -> Error {
        self.inner.request = Some(request);
        self
    }

    #[must_use = "Error builder methods return a new Error and should be used"]
    pub fn with_response(mut self, response: Response) -> Error {
        self.inner.response = Some(response);
        self
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        self.inner.kind
    }

    /// The error code: an explicit override, else the kind's code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        self.inner.code.unwrap_or_else(|| self.inner.kind.code())
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.inner.message.as_deref()
    }

    #[must_use]
    pub fn config(&self) -> Option<&RequestConfig> {
        self.inner.config.as_ref()
    }

    #[must_use]
    pub fn request(&self) -> Option<&RequestInfo> {
        self.inner.request.as_ref()
    }

    #[must_use]
    pub fn response(&self) -> Option<&Response> {
        self.inner.response.as_ref()
    }

    pub fn response_mut(&mut self) -> Option<&mut Response> {
        self.inner.response.as_mut()
    }

    #[must_use]
    pub fn into_response(self) -> Option<Response> {
        self.inner.response
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut f = f.debug_struct("courier::Error");

        f.field("kind", &self.inner.kind);
        f.field("code", &self.code());

        if let Some(ref message) = self.inner.message {
            f.field("message", message);
        }

        if let Some(ref source) = self.inner.source {
            f.field("source", source);
        }

        if let Some(ref request) = self.inner.request {
            f.field("request", request);
        }

        if let Some(ref response) = self.inner.response {
            f.field("status", &response.status);
        }

        f.finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.inner.kind, &self.inner.message) {
            (_, Some(message)) => f.write_str(message),
            (Kind::BadStatus, None) => match &self.inner.response {
                Some(response) => write!(f, "{} {}", Kind::BadStatus.describe(), response.status),
                None => f.write_str(Kind::BadStatus.describe()),
            },
            (kind, None) => f.write_str(kind.describe()),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner
            .source
            .as_ref()
            .map(|err| &**err as &(dyn StdError + 'static))
    }
}
