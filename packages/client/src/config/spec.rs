//! Serde-loadable configuration
//!
//! Only the data part of a [`RequestConfig`] can be loaded: callbacks,
//! transports and cancellation handles are attached in code.

use serde::Deserialize;
use serde_json::Value;

use super::{Params, ParamsSerializer, RequestConfig, ResponseType, Transitional};
use crate::adapter::AdapterSpec;
use crate::error::{self, Result};
use crate::http::{Body, HeaderConfig, Headers, Method};

/// A configuration as written in JSON, with the usual camelCase keys.
///
/// Unrecognised keys are kept in `extra` and land in
/// [`RequestConfig::extensions`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSpec {
    pub url: Option<String>,
    pub method: Option<Method>,
    #[serde(rename = "baseURL", alias = "baseUrl")]
    pub base_url: Option<String>,
    pub headers: Option<Params>,
    pub data: Option<Value>,
    pub params: Option<Params>,
    pub params_serializer: Option<Params>,
    pub timeout: Option<u64>,
    pub response_type: Option<ResponseType>,
    pub adapter: Option<Value>,
    pub transitional: Option<Transitional>,
    /// Negative values mean unlimited.
    pub max_content_length: Option<i64>,
    pub max_body_length: Option<i64>,
    pub xsrf_cookie_name: Option<String>,
    pub xsrf_header_name: Option<String>,
    pub with_credentials: Option<bool>,
    #[serde(flatten)]
    pub extra: Params,
}

impl ConfigSpec {
    /// Parse a JSON document.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the text is not valid JSON or a
    /// field has the wrong type.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| error::config_validation(format!("invalid configuration: {e}")).with(e))
    }

    #[must_use]
    pub fn into_config(self) -> RequestConfig {
        RequestConfig {
            url: self.url,
            method: self.method,
            base_url: self.base_url,
            headers: self.headers.map(header_config),
            data: self.data.map(Body::Json),
            params: self.params,
            params_serializer: self.params_serializer.map(|options| ParamsSerializer {
                options,
                ..ParamsSerializer::default()
            }),
            timeout_ms: self.timeout,
            response_type: self.response_type,
            adapter: self.adapter.and_then(AdapterSpec::from_value),
            transitional: self.transitional,
            max_content_length: self.max_content_length.and_then(|n| u64::try_from(n).ok()),
            max_body_length: self.max_body_length.and_then(|n| u64::try_from(n).ok()),
            xsrf_cookie_name: self.xsrf_cookie_name,
            xsrf_header_name: self.xsrf_header_name,
            with_credentials: self.with_credentials,
            extensions: (!self.extra.is_empty()).then_some(self.extra),
            ..RequestConfig::default()
        }
    }
}

impl From<ConfigSpec> for RequestConfig {
    fn from(spec: ConfigSpec) -> Self {
        spec.into_config()
    }
}

impl RequestConfig {
    /// Load a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// See [`ConfigSpec::from_json`].
    pub fn from_json(text: &str) -> Result<Self> {
        ConfigSpec::from_json(text).map(ConfigSpec::into_config)
    }
}

// `common` and verb keys holding objects become buckets; every other key is
// one of the request's own headers.
fn header_config(object: Params) -> HeaderConfig {
    let mut config = HeaderConfig::new();
    for (name, value) in object {
        let bucket = value.is_object();
        let method = name.parse::<Method>().ok();
        match method {
            _ if bucket && name.eq_ignore_ascii_case("common") => {
                config.common = Headers::from_json(&value);
            }
            Some(method) if bucket => {
                config.per_method.insert(method, Headers::from_json(&value));
            }
            _ => {
                let mut single = Params::new();
                single.insert(name, value);
                config.own.merge(&Headers::from_json(&Value::Object(single)));
            }
        }
    }
    config
}
