//! Request verbs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::error::{self, Error};

/// HTTP verb of a request. Always rendered lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    #[default]
    Get,
    Delete,
    Head,
    Options,
    Post,
    Put,
    Patch,
}

impl Method {
    /// All verbs that may own a per-method header bucket.
    pub const ALL: [Method; 7] = [
        Method::Get,
        Method::Delete,
        Method::Head,
        Method::Options,
        Method::Post,
        Method::Put,
        Method::Patch,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "get",
            Method::Delete => "delete",
            Method::Head => "head",
            Method::Options => "options",
            Method::Post => "post",
            Method::Put => "put",
            Method::Patch => "patch",
        }
    }

    /// Whether the verb carries a request body by default.
    #[must_use]
    pub fn has_body(&self) -> bool {
        matches!(self, Method::Post | Method::Put | Method::Patch)
    }

    /// Convert into the wire-level `http::Method`.
    #[must_use]
    pub fn to_http(&self) -> http::Method {
        match self {
            Method::Get => http::Method::GET,
            Method::Delete => http::Method::DELETE,
            Method::Head => http::Method::HEAD,
            Method::Options => http::Method::OPTIONS,
            Method::Post => http::Method::POST,
            Method::Put => http::Method::PUT,
            Method::Patch => http::Method::PATCH,
        }
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| error::config_validation(format!("Unsupported method '{s}'")))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Method {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("POST".parse::<Method>().ok(), Some(Method::Post));
        assert_eq!("Patch".parse::<Method>().ok(), Some(Method::Patch));
        assert_eq!(Method::Post.as_str(), "post");
    }

    #[test]
    fn rejects_unknown_verbs() {
        let err = "trace".parse::<Method>().unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn body_methods() {
        let with_body: Vec<_> = Method::ALL.into_iter().filter(Method::has_body).collect();
        assert_eq!(with_body, vec![Method::Post, Method::Put, Method::Patch]);
    }
}
