use super::types::{BoxError, Error, Kind};
use crate::cancel::CancelReason;
use crate::http::Response;

/// Creates an `Error` for malformed options.
pub fn config_validation(message: impl Into<String>) -> Error {
    Error::new(Kind::ConfigValidation).with_message(message)
}

/// Creates an `Error` for an option name not present in a closed schema.
pub fn unknown_option(option: &str) -> Error {
    Error::new(Kind::ConfigValidation)
        .with_code("ERR_BAD_OPTION")
        .with_message(format!("Unknown option {option}"))
}

pub fn unknown_adapter(name: &str) -> Error {
    Error::new(Kind::UnknownAdapter).with_message(format!("Unknown adapter '{name}'"))
}

pub fn adapter_unavailable(name: &str) -> Error {
    Error::new(Kind::AdapterUnavailable)
        .with_message(format!("Adapter '{name}' is not available in the build"))
}

pub fn not_supported(name: &str) -> Error {
    Error::new(Kind::NotSupported)
        .with_message(format!("Adapter {name} is not supported by the environment"))
}

pub fn invalid_adapter() -> Error {
    Error::new(Kind::InvalidAdapter).with_message("adapter is not a function")
}

/// Creates an `Error` for a cancelled request, carrying the cancellation message.
pub fn cancelled(reason: &CancelReason) -> Error {
    Error::new(Kind::Cancelled).with_message(reason.message().unwrap_or("canceled").to_string())
}

/// Creates an `Error` for a transport timeout.
///
/// `clarify` selects the `ETIMEDOUT` code over the historical `ECONNABORTED`.
pub fn timeout(timeout_ms: u64, clarify: bool) -> Error {
    Error::new(Kind::Timeout)
        .with_code(if clarify { "ETIMEDOUT" } else { "ECONNABORTED" })
        .with_message(format!("timeout of {timeout_ms}ms exceeded"))
}

pub fn network<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Network).with_message("Network Error").with(e.into())
}

pub fn unsupported_protocol(protocol: &str) -> Error {
    Error::new(Kind::UnsupportedProtocol)
        .with_message(format!("Unsupported protocol {protocol}:"))
}

/// Creates an `Error` for a status rejected by `validate_status`.
pub fn bad_status(response: Response) -> Error {
    let code = if (400..500).contains(&response.status) {
        "ERR_BAD_REQUEST"
    } else {
        "ERR_BAD_RESPONSE"
    };
    Error::new(Kind::BadStatus)
        .with_code(code)
        .with_message(format!("Request failed with status code {}", response.status))
        .with_response(response)
}

pub fn bad_request<E: Into<BoxError>>(e: E) -> Error {
    let source = e.into();
    Error::new(Kind::BadRequest)
        .with_message(source.to_string())
        .with(source)
}

pub fn bad_response<E: Into<BoxError>>(e: E) -> Error {
    let source = e.into();
    Error::new(Kind::BadResponse)
        .with_message(source.to_string())
        .with(source)
}

pub fn invalid_url<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::BadRequest)
        .with_code("ERR_INVALID_URL")
        .with_message("Invalid URL")
        .with(e.into())
}

pub fn transport<E: Into<BoxError>>(e: E) -> Error {
    let source = e.into();
    Error::new(Kind::Transport)
        .with_message(source.to_string())
        .with(source)
}

/// Creates an `Error` raised from inside an interceptor.
pub fn interceptor<E: Into<BoxError>>(e: E) -> Error {
    let source = e.into();
    Error::new(Kind::Interceptor)
        .with_message(source.to_string())
        .with(source)
}
