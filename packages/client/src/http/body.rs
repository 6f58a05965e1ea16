//! Request and response payloads

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{self, Result};

/// Payload carried by a request config or a response.
///
/// Request transforms turn structured variants into `Text` or `Bytes`
/// before the transport sees them. Response transforms may turn `Text`
/// back into `Json`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Body {
    #[default]
    Empty,
    Text(String),
    Bytes(Bytes),
    Json(Value),
    /// Ordered key/value pairs, urlencoded by the default request transform.
    Form(Vec<(String, String)>),
}

impl Body {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Body::Empty => true,
            Body::Text(text) => text.is_empty(),
            Body::Bytes(bytes) => bytes.is_empty(),
            Body::Json(_) => false,
            Body::Form(pairs) => pairs.is_empty(),
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Body::Text(text) => Some(text),
            Body::Bytes(bytes) => std::str::from_utf8(bytes).ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Body::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Serialize the payload to wire bytes.
    pub fn to_bytes(&self) -> Result<Bytes> {
        match self {
            Body::Empty => Ok(Bytes::new()),
            Body::Text(text) => Ok(Bytes::copy_from_slice(text.as_bytes())),
            Body::Bytes(bytes) => Ok(bytes.clone()),
            Body::Json(value) => serde_json::to_vec(value)
                .map(Bytes::from)
                .map_err(error::bad_request),
            Body::Form(pairs) => serde_urlencoded::to_string(pairs)
                .map(Bytes::from)
                .map_err(error::bad_request),
        }
    }

    /// Deserialize the payload as JSON into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        match self {
            Body::Json(value) => serde_json::from_value(value.clone()).map_err(error::bad_response),
            Body::Text(text) => serde_json::from_str(text).map_err(error::bad_response),
            Body::Bytes(bytes) => serde_json::from_slice(bytes).map_err(error::bad_response),
            Body::Empty => serde_json::from_value(Value::Null).map_err(error::bad_response),
            Body::Form(pairs) => {
                let object = pairs
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect();
                serde_json::from_value(Value::Object(object)).map_err(error::bad_response)
            }
        }
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.to_string())
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Body::Bytes(Bytes::from(bytes))
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Body::Bytes(bytes)
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Body::Json(value)
    }
}

impl From<Vec<(String, String)>> for Body {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Body::Form(pairs)
    }
}
