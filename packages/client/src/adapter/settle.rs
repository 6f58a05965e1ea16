use tracing::debug;

use crate::config::RequestConfig;
use crate::error::{self, Result};
use crate::http::Response;

/// Fulfil or reject `response` according to `config.validate_status`.
///
/// A status of `0` (no status at all) and an absent or cleared validator
/// always fulfil.
pub fn settle(response: Response, config: &RequestConfig) -> Result<Response> {
    let validate = match &config.validate_status {
        Some(Some(validate)) if response.status != 0 => validate,
        _ => return Ok(response),
    };
    if validate(response.status) {
        return Ok(response);
    }
    debug!(status = response.status, "response rejected by validate_status");
    Err(error::bad_status(response).with_config(config.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults;
    use crate::error::Kind;

    #[test]
    fn default_validator_accepts_2xx_only() {
        let config = defaults();
        assert!(settle(Response::new(204, ""), &config).is_ok());

        let err = settle(Response::new(404, "missing"), &config).unwrap_err();
        assert_eq!(err.kind(), Kind::BadStatus);
        assert_eq!(err.code(), "ERR_BAD_REQUEST");
        assert_eq!(err.status(), Some(404));

        let err = settle(Response::new(503, ""), &config).unwrap_err();
        assert_eq!(err.code(), "ERR_BAD_RESPONSE");
    }

    #[test]
    fn cleared_or_absent_validator_accepts_everything() {
        assert!(settle(Response::new(500, ""), &RequestConfig::new()).is_ok());
        let cleared = defaults().clear_validate_status();
        assert!(settle(Response::new(500, ""), &cleared).is_ok());
    }

    #[test]
    fn missing_status_is_never_validated() {
        let config = RequestConfig::new().validate_status(|_| false);
        assert!(settle(Response::new(0, ""), &config).is_ok());
    }
}
