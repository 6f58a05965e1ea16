//! The per-request cancellation context handed to transports

use std::sync::{Arc, Mutex, PoisonError};

use futures::channel::oneshot;
use tracing::trace;

use super::trigger::ListenerId;
use super::{AbortSignal, CancelReason, CancelToken};
use crate::config::RequestConfig;
use crate::error::{self, Result};

/// Both cancellation sources of one request, threaded explicitly from the
/// dispatcher into the transport.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    token: Option<CancelToken>,
    signal: Option<AbortSignal>,
}

impl Cancellation {
    #[must_use]
    pub fn new(token: Option<CancelToken>, signal: Option<AbortSignal>) -> Self {
        Cancellation { token, signal }
    }

    #[must_use]
    pub fn from_config(config: &RequestConfig) -> Self {
        Cancellation::new(config.cancel_token.clone(), config.signal.clone())
    }

    /// A context that never cancels.
    #[must_use]
    pub fn none() -> Self {
        Cancellation::default()
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.as_ref().is_some_and(CancelToken::is_cancelled)
            || self.signal.as_ref().is_some_and(AbortSignal::aborted)
    }

    #[must_use]
    pub fn reason(&self) -> Option<CancelReason> {
        self.token
            .as_ref()
            .and_then(CancelToken::reason)
            .or_else(|| self.signal.as_ref().and_then(AbortSignal::reason))
    }

    /// Checkpoint: fail with `Cancelled` if either source already fired.
    pub fn check(&self) -> Result<()> {
        if let Some(token) = &self.token {
            token.throw_if_requested()?;
        }
        if let Some(signal) = &self.signal
            && signal.aborted()
        {
            trace!("abort signal observed at checkpoint");
            return Err(error::cancelled(&signal.reason().unwrap_or_default()));
        }
        Ok(())
    }

    /// Run `listener` at most once, on whichever source fires first.
    ///
    /// Listeners stay registered until the returned guard is dropped.
    pub fn on_cancel<F>(&self, listener: F) -> CancelGuard
    where
        F: FnOnce(&CancelReason) + Send + 'static,
    {
        let shared = Arc::new(Mutex::new(Some(listener)));
        let fire = move |shared: &Arc<Mutex<Option<F>>>, reason: &CancelReason| {
            let taken = shared.lock().unwrap_or_else(PoisonError::into_inner).take();
            if let Some(listener) = taken {
                listener(reason);
            }
        };

        let mut guard = CancelGuard::default();
        if let Some(token) = &self.token {
            let shared = shared.clone();
            let fire = fire.clone();
            if let Some(id) = token.subscribe(move |reason| fire(&shared, reason)) {
                guard.token = Some((token.clone(), id));
            }
        }
        if let Some(signal) = &self.signal {
            let shared = shared.clone();
            if let Some(id) = signal.add_listener(move |reason| fire(&shared, reason)) {
                guard.signal = Some((signal.clone(), id));
            }
        }
        guard
    }

    /// Resolves when either source fires. Never resolves without sources.
    pub async fn cancelled(&self) -> CancelReason {
        let (tx, rx) = oneshot::channel();
        let _guard = self.on_cancel(move |reason| {
            let _ = tx.send(reason.clone());
        });
        match rx.await {
            Ok(reason) => reason,
            Err(_) => futures::future::pending().await,
        }
    }
}

/// Unsubscribes the listeners of [`Cancellation::on_cancel`] on drop.
#[derive(Default)]
#[must_use = "dropping the guard unsubscribes the listener"]
pub struct CancelGuard {
    token: Option<(CancelToken, ListenerId)>,
    signal: Option<(AbortSignal, ListenerId)>,
}

impl Drop for CancelGuard {
    fn drop(&mut self) {
        if let Some((token, id)) = self.token.take() {
            token.unsubscribe(id);
        }
        if let Some((signal, id)) = self.signal.take() {
            signal.remove_listener(id);
        }
    }
}
