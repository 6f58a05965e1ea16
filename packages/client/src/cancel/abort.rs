//! Externally owned abort signals

use std::fmt;
use std::sync::Arc;

use super::CancelReason;
use super::trigger::{ListenerId, Trigger};

/// Owner of an [`AbortSignal`].
#[derive(Debug, Default)]
pub struct AbortController {
    signal: AbortSignal,
}

impl AbortController {
    #[must_use]
    pub fn new() -> Self {
        AbortController::default()
    }

    #[must_use]
    pub fn signal(&self) -> AbortSignal {
        self.signal.clone()
    }

    /// Abort. Returns false if the signal was already aborted.
    pub fn abort(&self) -> bool {
        self.signal.trigger.fire(CancelReason::default())
    }
}

/// Read side of an abort: a flag plus one-shot listeners.
#[derive(Clone, Default)]
pub struct AbortSignal {
    trigger: Arc<Trigger>,
}

impl AbortSignal {
    /// A signal that is already aborted.
    #[must_use]
    pub fn aborted_signal() -> Self {
        AbortSignal {
            trigger: Arc::new(Trigger::fired(CancelReason::default())),
        }
    }

    #[must_use]
    pub fn aborted(&self) -> bool {
        self.trigger.is_fired()
    }

    #[must_use]
    pub fn reason(&self) -> Option<CancelReason> {
        self.trigger.reason()
    }

    /// Run `listener` once on abort; synchronously if already aborted.
    pub fn add_listener<F>(&self, listener: F) -> Option<ListenerId>
    where
        F: FnOnce(&CancelReason) + Send + 'static,
    {
        self.trigger.subscribe(listener)
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.trigger.unsubscribe(id)
    }
}

impl PartialEq for AbortSignal {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.trigger, &other.trigger)
    }
}

impl fmt::Debug for AbortSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbortSignal")
            .field("aborted", &self.aborted())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn pre_aborted_signal_fires_listeners_synchronously() {
        let signal = AbortSignal::aborted_signal();
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        assert!(signal.add_listener(move |_| flag.store(true, Ordering::SeqCst)).is_none());
        assert!(ran.load(Ordering::SeqCst));
    }

    #[test]
    fn abort_is_idempotent() {
        let controller = AbortController::new();
        let signal = controller.signal();
        assert!(!signal.aborted());
        assert!(controller.abort());
        assert!(!controller.abort());
        assert!(signal.aborted());
    }
}
