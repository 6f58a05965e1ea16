//! URL joining and query-string construction

use serde_json::Value;

use crate::config::{Params, ParamsSerializer};

/// How flat arrays are rendered in a query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayFormat {
    /// `key[]=a&key[]=b`
    Brackets,
    /// `key[0]=a&key[1]=b`
    Indices,
    /// `key=a&key=b`
    Repeat,
}

impl ArrayFormat {
    /// Read the `indexes` serializer option: absent or `false` means brackets,
    /// `true` means indices and `null` means repeated keys.
    #[must_use]
    pub fn from_options(options: &Params) -> Self {
        match options.get("indexes") {
            Some(Value::Bool(true)) => ArrayFormat::Indices,
            Some(Value::Null) => ArrayFormat::Repeat,
            _ => ArrayFormat::Brackets,
        }
    }
}

/// Whether `url` starts with `<scheme>://` or is protocol-relative (`//host`).
#[must_use]
pub fn is_absolute_url(url: &str) -> bool {
    if url.starts_with("//") {
        return true;
    }
    let Some((scheme, rest)) = url.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        && rest.starts_with("//")
}

/// Join `base` and `relative` with exactly one slash between them.
#[must_use]
pub fn combine_urls(base: &str, relative: &str) -> String {
    if relative.is_empty() {
        return base.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        relative.trim_start_matches('/')
    )
}

/// Prefix `requested` with `base` unless `requested` is already absolute.
#[must_use]
pub fn build_full_path(base: Option<&str>, requested: &str) -> String {
    match base {
        Some(base) if !base.is_empty() && !is_absolute_url(requested) => {
            combine_urls(base, requested)
        }
        _ => requested.to_string(),
    }
}

/// Percent-encode a query component, keeping `:$,[]` readable and spaces as `+`.
#[must_use]
pub fn encode(text: &str) -> String {
    const KEEP: [(&str, &str); 11] = [
        ("%3A", ":"),
        ("%24", "$"),
        ("%2C", ","),
        ("%20", "+"),
        ("%5B", "["),
        ("%5D", "]"),
        ("%21", "!"),
        ("%27", "'"),
        ("%28", "("),
        ("%29", ")"),
        ("%2A", "*"),
    ];
    let mut encoded = urlencoding::encode(text).into_owned();
    for (from, to) in KEEP {
        if encoded.contains(from) {
            encoded = encoded.replace(from, to);
        }
    }
    encoded
}

/// Append serialized `params` to `url`, dropping any fragment.
#[must_use]
pub fn build_url(url: &str, params: Option<&Params>, serializer: Option<&ParamsSerializer>) -> String {
    let Some(params) = params else {
        return url.to_string();
    };

    let serialized = match serializer {
        Some(ParamsSerializer {
            serialize: Some(serialize),
            options,
            ..
        }) => serialize(params, options),
        Some(ParamsSerializer { encode, options, .. }) => {
            let format = ArrayFormat::from_options(options);
            match encode {
                Some(encode) => serialize_params(params, format, &|text| encode(text)),
                None => serialize_params(params, format, &encode_default),
            }
        }
        None => serialize_params(params, ArrayFormat::Brackets, &encode_default),
    };

    if serialized.is_empty() {
        return url.to_string();
    }

    let base = url.split_once('#').map_or(url, |(before, _)| before);
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}{serialized}")
}

fn encode_default(text: &str) -> String {
    encode(text)
}

/// Serialize a params object into `key=value` pairs joined by `&`.
///
/// Nested objects render as `outer[inner]`, `null` values are skipped and a
/// key ending in `{}` is sent as the JSON text of its value.
#[must_use]
pub fn serialize_params(params: &Params, format: ArrayFormat, encode: &dyn Fn(&str) -> String) -> String {
    let mut pairs = Vec::new();
    for (key, value) in params {
        if let Some(stripped) = key.strip_suffix("{}") {
            if !value.is_null() {
                pairs.push((stripped.to_string(), value.to_string()));
            }
            continue;
        }
        visit(key.clone(), value, format, &mut pairs);
    }
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", encode(key), encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn visit(key: String, value: &Value, format: ArrayFormat, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Object(object) => {
            for (inner, value) in object {
                visit(format!("{key}[{inner}]"), value, format, pairs);
            }
        }
        Value::Array(items) if items.iter().all(is_primitive) => {
            for (index, item) in items.iter().enumerate() {
                let name = match format {
                    ArrayFormat::Brackets => format!("{key}[]"),
                    ArrayFormat::Indices => format!("{key}[{index}]"),
                    ArrayFormat::Repeat => key.clone(),
                };
                visit(name, item, format, pairs);
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                visit(format!("{key}[{index}]"), item, format, pairs);
            }
        }
        Value::String(text) => pairs.push((key, text.clone())),
        Value::Bool(flag) => pairs.push((key, flag.to_string())),
        Value::Number(number) => pairs.push((key, number.to_string())),
    }
}

fn is_primitive(value: &Value) -> bool {
    !matches!(value, Value::Object(_) | Value::Array(_))
}
