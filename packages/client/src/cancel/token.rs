//! Caller-owned cancellation tokens

use std::fmt;
use std::sync::Arc;

use futures::channel::oneshot;

use super::trigger::{ListenerId, Trigger};
use crate::error::{self, Result};

/// Why a request was cancelled.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CancelReason {
    message: Option<String>,
}

impl CancelReason {
    #[must_use]
    pub fn new(message: Option<String>) -> Self {
        CancelReason { message }
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// Token handed to a request through `RequestConfig::cancel_token`.
///
/// Cloning shares the token. Created together with its [`CancelSource`].
#[derive(Clone)]
pub struct CancelToken {
    trigger: Arc<Trigger>,
}

/// The owning half of a [`CancelToken`].
#[derive(Clone, Debug)]
pub struct CancelSource {
    token: CancelToken,
}

impl CancelToken {
    /// Create a token and the source that cancels it.
    #[must_use]
    pub fn source() -> CancelSource {
        CancelSource {
            token: CancelToken {
                trigger: Arc::new(Trigger::default()),
            },
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.trigger.is_fired()
    }

    #[must_use]
    pub fn reason(&self) -> Option<CancelReason> {
        self.trigger.reason()
    }

    /// Fail with `Cancelled` if cancellation was already requested.
    pub fn throw_if_requested(&self) -> Result<()> {
        match self.trigger.reason() {
            Some(reason) => Err(error::cancelled(&reason)),
            None => Ok(()),
        }
    }

    /// Run `listener` once when the token is cancelled.
    ///
    /// Runs it immediately and returns `None` if it already was.
    pub fn subscribe<F>(&self, listener: F) -> Option<ListenerId>
    where
        F: FnOnce(&CancelReason) + Send + 'static,
    {
        self.trigger.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.trigger.unsubscribe(id)
    }

    /// Resolves once the token is cancelled.
    pub async fn cancelled(&self) -> CancelReason {
        let (tx, rx) = oneshot::channel();
        let id = self.subscribe(move |reason| {
            let _ = tx.send(reason.clone());
        });
        let reason = rx.await.unwrap_or_default();
        if let Some(id) = id {
            self.unsubscribe(id);
        }
        reason
    }

    #[cfg(test)]
    pub(crate) fn listener_count(&self) -> usize {
        self.trigger.listener_count()
    }
}

impl CancelSource {
    #[must_use]
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Cancel with a message. Returns false if already cancelled.
    pub fn cancel(&self, message: impl Into<String>) -> bool {
        self.token.trigger.fire(CancelReason::new(Some(message.into())))
    }

    /// Cancel without a message.
    pub fn cancel_silently(&self) -> bool {
        self.token.trigger.fire(CancelReason::default())
    }
}

impl PartialEq for CancelToken {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.trigger, &other.trigger)
    }
}

impl fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelToken")
            .field("reason", &self.trigger.reason())
            .finish()
    }
}
