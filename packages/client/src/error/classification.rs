use super::types::{Error, Kind};

impl Error {
    /// Returns true if the request was cancelled by a token or an abort signal.
    #[must_use]
    pub fn is_cancel(&self) -> bool {
        matches!(self.inner.kind, Kind::Cancelled)
    }

    /// Returns true if the error is related to a timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self.inner.kind, Kind::Timeout)
    }

    /// Returns true if `validate_status` rejected the response.
    #[must_use]
    pub fn is_status(&self) -> bool {
        matches!(self.inner.kind, Kind::BadStatus)
    }

    /// Returns true if the error came from adapter resolution.
    ///
    /// These failures are fatal and never worth retrying.
    #[must_use]
    pub fn is_adapter_error(&self) -> bool {
        matches!(
            self.inner.kind,
            Kind::UnknownAdapter | Kind::AdapterUnavailable | Kind::NotSupported | Kind::InvalidAdapter
        )
    }

    /// Returns true if the options failed validation before any I/O.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self.inner.kind, Kind::ConfigValidation)
    }

    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self.inner.kind, Kind::Network)
    }

    /// Returns the response status, if the error carries a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.inner.response.as_ref().map(|response| response.status)
    }
}
