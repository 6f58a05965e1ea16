//! Transforms installed by `config::defaults()`

use serde_json::Value;
use tracing::trace;

use super::{FormData, ResponseContext};
use crate::config::ResponseType;
use crate::error::{self, Result};
use crate::http::{ArrayFormat, Body, Headers, encode, serialize_params};

const JSON: &str = "application/json";
const MULTIPART: &str = "multipart/form-data";
const URLENCODED: &str = "application/x-www-form-urlencoded";

/// Serialize structured request bodies.
///
/// JSON bodies become JSON text unless the content type asks for a form.
/// Form pairs are urlencoded. Text and bytes pass through.
pub fn transform_request_default(data: Body, headers: &mut Headers) -> Result<Body> {
    let content_type = headers
        .content_type()
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match data {
        Body::Json(Value::Object(object)) if content_type.starts_with(MULTIPART) => {
            let form = FormData::from_object(&object);
            headers.set_content_type(Some(&form.content_type()), true);
            Ok(Body::Bytes(form.encode()))
        }
        Body::Json(Value::Object(object)) if content_type.starts_with(URLENCODED) => Ok(Body::Text(
            serialize_params(&object, ArrayFormat::Brackets, &encode),
        )),
        Body::Json(value) => {
            headers.set_content_type(Some(JSON), false);
            serde_json::to_string(&value)
                .map(Body::Text)
                .map_err(error::bad_request)
        }
        Body::Form(pairs) if content_type.starts_with(MULTIPART) => {
            let mut form = FormData::new();
            for (name, value) in &pairs {
                form.append(name, value);
            }
            headers.set_content_type(Some(&form.content_type()), true);
            Ok(Body::Bytes(form.encode()))
        }
        Body::Form(pairs) => {
            headers.set_content_type(Some("application/x-www-form-urlencoded;charset=utf-8"), false);
            serde_urlencoded::to_string(&pairs)
                .map(Body::Text)
                .map_err(error::bad_request)
        }
        other => Ok(other),
    }
}

/// Parse textual response bodies as JSON when asked to.
///
/// Parsing happens for `ResponseType::Json`, or when no response type was
/// set and forced parsing is on. A parse failure is an error only when the
/// caller asked for JSON and silent parsing is off.
pub fn transform_response_default(data: Body, context: &ResponseContext<'_>) -> Result<Body> {
    let transitional = context.config.transitional.clone().unwrap_or_default();
    let json_requested = context.config.response_type == Some(ResponseType::Json);
    let forced = transitional.forced_json() && context.config.response_type.is_none();

    let text = match data {
        Body::Text(text) => text,
        other => return Ok(other),
    };
    if text.is_empty() || !(forced || json_requested) {
        return Ok(Body::Text(text));
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(value) => Ok(Body::Json(value)),
        Err(e) if !transitional.silent_json() && json_requested => Err(error::bad_response(e)),
        Err(e) => {
            trace!(error = %e, "keeping unparsable response body as text");
            Ok(Body::Text(text))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RequestConfig, Transitional};
    use serde_json::json;

    fn context<'a>(config: &'a RequestConfig, headers: &'a Headers) -> ResponseContext<'a> {
        ResponseContext {
            config,
            headers,
            status: Some(200),
        }
    }

    #[test]
    fn json_bodies_serialize_with_content_type() {
        let mut headers = Headers::new();
        let out = transform_request_default(Body::Json(json!({"a": 1})), &mut headers).unwrap();
        assert_eq!(out, Body::from("{\"a\":1}"));
        assert_eq!(headers.content_type(), Some(JSON));
    }

    #[test]
    fn caller_content_type_is_kept() {
        let mut headers = Headers::new().with("Content-Type", "application/vnd.api+json");
        transform_request_default(Body::Json(json!([1])), &mut headers).unwrap();
        assert_eq!(headers.content_type(), Some("application/vnd.api+json"));
    }

    #[test]
    fn multipart_content_type_builds_form() {
        let mut headers = Headers::new().with("Content-Type", MULTIPART);
        let out = transform_request_default(Body::Json(json!({"a": "1"})), &mut headers).unwrap();
        assert!(matches!(out, Body::Bytes(_)));
        assert!(headers
            .content_type()
            .is_some_and(|ct| ct.starts_with("multipart/form-data; boundary=")));
    }

    #[test]
    fn urlencoded_content_type_encodes_objects() {
        let mut headers = Headers::new().with("Content-Type", URLENCODED);
        let out = transform_request_default(Body::Json(json!({"a": "x y", "b": [1, 2]})), &mut headers).unwrap();
        assert_eq!(out, Body::from("a=x+y&b[]=1&b[]=2"));
    }

    #[test]
    fn forms_are_urlencoded() {
        let mut headers = Headers::new();
        let out = transform_request_default(Body::Form(vec![("k".into(), "v w".into())]), &mut headers).unwrap();
        assert_eq!(out, Body::from("k=v+w"));
        assert!(headers.content_type().is_some_and(|ct| ct.starts_with(URLENCODED)));
    }

    #[test]
    fn forced_parsing_applies_without_response_type() {
        let config = crate::config::defaults();
        let headers = Headers::new();
        let out = transform_response_default(Body::from("{\"ok\":true}"), &context(&config, &headers)).unwrap();
        assert_eq!(out, Body::Json(json!({"ok": true})));

        let text = transform_response_default(Body::from("plain"), &context(&config, &headers)).unwrap();
        assert_eq!(text, Body::from("plain"));
    }

    #[test]
    fn text_response_type_skips_parsing() {
        let config = RequestConfig::new().response_type(ResponseType::Text);
        let headers = Headers::new();
        let out = transform_response_default(Body::from("{}"), &context(&config, &headers)).unwrap();
        assert_eq!(out, Body::from("{}"));
    }

    #[test]
    fn strict_parsing_fails_with_bad_response() {
        let config = RequestConfig::new()
            .response_type(ResponseType::Json)
            .transitional(Transitional {
                silent_json_parsing: Some(false),
                ..Transitional::defaults()
            });
        let headers = Headers::new();
        let err = transform_response_default(Body::from("{oops"), &context(&config, &headers)).unwrap_err();
        assert_eq!(err.kind(), crate::error::Kind::BadResponse);
        assert_eq!(err.code(), "ERR_BAD_RESPONSE");
    }
}
