//! Query-string serializer options

use std::fmt;
use std::sync::Arc;

use super::Params;
use super::validation::{Rule, ValidationError, Validator, assert_options};

/// Replaces the default component encoder.
pub type EncodeFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Replaces query serialization entirely. Receives the params and the raw options.
pub type SerializeFn = Arc<dyn Fn(&Params, &Params) -> String + Send + Sync>;

/// How `params` become a query string.
///
/// `options` holds data options such as `indexes`; configs loaded from JSON
/// land here wholesale, which is why it is validated before each request.
#[derive(Clone, Default)]
pub struct ParamsSerializer {
    pub encode: Option<EncodeFn>,
    pub serialize: Option<SerializeFn>,
    pub options: Params,
}

impl ParamsSerializer {
    #[must_use]
    pub fn new() -> Self {
        ParamsSerializer::default()
    }

    #[must_use]
    pub fn encode<F>(mut self, encode: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.encode = Some(Arc::new(encode));
        self
    }

    #[must_use]
    pub fn serialize<F>(mut self, serialize: F) -> Self
    where
        F: Fn(&Params, &Params) -> String + Send + Sync + 'static,
    {
        self.serialize = Some(Arc::new(serialize));
        self
    }

    /// `Some(true)` renders `k[0]`, `Some(false)` renders `k[]`, `None` repeats `k`.
    #[must_use]
    pub fn indexes(mut self, indexes: Option<bool>) -> Self {
        let value = indexes.map_or(serde_json::Value::Null, serde_json::Value::Bool);
        self.options.insert("indexes".to_string(), value);
        self
    }
}

impl Validator for ParamsSerializer {
    fn validate(&self) -> Result<(), ValidationError> {
        assert_options(
            &self.options,
            &[
                ("encode", Rule::Function),
                ("serialize", Rule::Function),
                ("indexes", Rule::NullableBoolean),
            ],
            true,
        )
    }
}

impl PartialEq for ParamsSerializer {
    fn eq(&self, other: &Self) -> bool {
        let same_encode = match (&self.encode, &other.encode) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        let same_serialize = match (&self.serialize, &other.serialize) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        same_encode && same_serialize && self.options == other.options
    }
}

impl fmt::Debug for ParamsSerializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamsSerializer")
            .field("encode", &self.encode.as_ref().map(|_| "<fn>"))
            .field("serialize", &self.serialize.as_ref().map(|_| "<fn>"))
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn typed_serializer_is_valid() {
        let serializer = ParamsSerializer::new().encode(str::to_uppercase).indexes(None);
        assert!(serializer.validate().is_ok());
    }

    #[test]
    fn data_in_function_slots_is_rejected() {
        let mut serializer = ParamsSerializer::new();
        serializer.options.insert("encode".into(), json!("upper"));
        assert_eq!(
            serializer.validate(),
            Err(ValidationError::BadValue {
                option: "encode".into(),
                expected: "a function",
            })
        );
    }

    #[test]
    fn unknown_keys_are_allowed() {
        let mut serializer = ParamsSerializer::new();
        serializer.options.insert("dots".into(), json!(true));
        assert!(serializer.validate().is_ok());
    }
}
