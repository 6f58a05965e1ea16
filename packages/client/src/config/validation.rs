//! Option-map validation

use serde_json::Value;

use super::Params;
use crate::error::{self, Error};

/// Option validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("option {option} must be {expected}")]
    BadValue {
        option: String,
        expected: &'static str,
    },

    #[error("Unknown option {option}")]
    UnknownOption { option: String },
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        let converted = match &err {
            ValidationError::UnknownOption { option } => error::unknown_option(option),
            ValidationError::BadValue { .. } => error::config_validation(err.to_string()),
        };
        converted.with(err)
    }
}

/// Option validation trait
pub trait Validator {
    /// Validates the options this value carries
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if an option has the wrong shape, or is
    /// unknown to a closed schema.
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Expected shape of one option value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Boolean,
    NullableBoolean,
    /// Only a typed callback satisfies this; any data value fails.
    Function,
}

impl Rule {
    fn check(self, value: &Value) -> Result<(), &'static str> {
        match (self, value) {
            (Rule::Boolean, Value::Bool(_)) => Ok(()),
            (Rule::Boolean, _) => Err("a boolean"),
            (Rule::NullableBoolean, Value::Bool(_) | Value::Null) => Ok(()),
            (Rule::NullableBoolean, _) => Err("a boolean or null"),
            (Rule::Function, _) => Err("a function"),
        }
    }
}

/// Check every entry of `options` against `schema`.
///
/// Entries missing from the schema fail unless `allow_unknown` is set.
pub fn assert_options(
    options: &Params,
    schema: &[(&str, Rule)],
    allow_unknown: bool,
) -> Result<(), ValidationError> {
    for (option, value) in options {
        match schema.iter().find(|(name, _)| name == option) {
            Some((_, rule)) => rule
                .check(value)
                .map_err(|expected| ValidationError::BadValue {
                    option: option.clone(),
                    expected,
                })?,
            None if allow_unknown => {}
            None => {
                return Err(ValidationError::UnknownOption {
                    option: option.clone(),
                });
            }
        }
    }
    Ok(())
}
