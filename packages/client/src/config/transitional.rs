//! Behaviour switches kept for compatibility with older clients

use serde::Deserialize;
use serde_json::Value;

use super::Params;
use super::merge::deep_merge;
use super::validation::{Rule, ValidationError, Validator, assert_options};

const SILENT_JSON_PARSING: &str = "silentJSONParsing";
const FORCED_JSON_PARSING: &str = "forcedJSONParsing";
const CLARIFY_TIMEOUT_ERROR: &str = "clarifyTimeoutError";

/// Transitional options.
///
/// Entries that are not one of the recognised boolean switches are kept in
/// `other` and rejected by [`Validator::validate`] before the request runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transitional {
    /// Keep a response body that fails JSON parsing instead of failing.
    pub silent_json_parsing: Option<bool>,
    /// Parse textual bodies as JSON even when no response type was asked for.
    pub forced_json_parsing: Option<bool>,
    /// Report timeouts as `ETIMEDOUT` instead of `ECONNABORTED`.
    pub clarify_timeout_error: Option<bool>,
    pub other: Params,
}

impl Transitional {
    /// The process defaults: silent and forced JSON parsing, unclarified timeouts.
    #[must_use]
    pub fn defaults() -> Self {
        Transitional {
            silent_json_parsing: Some(true),
            forced_json_parsing: Some(true),
            clarify_timeout_error: Some(false),
            other: Params::new(),
        }
    }

    /// Build from a loaded options map.
    #[must_use]
    pub fn from_options(mut options: Params) -> Self {
        let mut take = |name: &str| match options.get(name) {
            Some(Value::Bool(flag)) => {
                let flag = *flag;
                options.remove(name);
                Some(flag)
            }
            _ => None,
        };
        let silent_json_parsing = take(SILENT_JSON_PARSING);
        let forced_json_parsing = take(FORCED_JSON_PARSING);
        let clarify_timeout_error = take(CLARIFY_TIMEOUT_ERROR);
        Transitional {
            silent_json_parsing,
            forced_json_parsing,
            clarify_timeout_error,
            other: options,
        }
    }

    /// Render every set entry as an options map.
    #[must_use]
    pub fn to_options(&self) -> Params {
        let mut options = self.other.clone();
        for (name, flag) in [
            (SILENT_JSON_PARSING, self.silent_json_parsing),
            (FORCED_JSON_PARSING, self.forced_json_parsing),
            (CLARIFY_TIMEOUT_ERROR, self.clarify_timeout_error),
        ] {
            if let Some(flag) = flag {
                options.insert(name.to_string(), Value::Bool(flag));
            }
        }
        options
    }

    /// Field-wise merge; `other` wins where it sets a value.
    #[must_use]
    pub fn merge(&self, other: &Transitional) -> Transitional {
        Transitional {
            silent_json_parsing: other.silent_json_parsing.or(self.silent_json_parsing),
            forced_json_parsing: other.forced_json_parsing.or(self.forced_json_parsing),
            clarify_timeout_error: other.clarify_timeout_error.or(self.clarify_timeout_error),
            other: deep_merge(&self.other, &other.other),
        }
    }

    #[must_use]
    pub fn silent_json(&self) -> bool {
        self.silent_json_parsing.unwrap_or(true)
    }

    #[must_use]
    pub fn forced_json(&self) -> bool {
        self.forced_json_parsing.unwrap_or(true)
    }

    #[must_use]
    pub fn clarify_timeout(&self) -> bool {
        self.clarify_timeout_error.unwrap_or(false)
    }
}

impl Validator for Transitional {
    fn validate(&self) -> Result<(), ValidationError> {
        assert_options(
            &self.to_options(),
            &[
                (SILENT_JSON_PARSING, Rule::Boolean),
                (FORCED_JSON_PARSING, Rule::Boolean),
                (CLARIFY_TIMEOUT_ERROR, Rule::Boolean),
            ],
            false,
        )
    }
}

impl<'de> Deserialize<'de> for Transitional {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Params::deserialize(deserializer).map(Transitional::from_options)
    }
}
