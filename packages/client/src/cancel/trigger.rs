//! One-shot listener list shared by cancel tokens and abort signals

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::CancelReason;

type Listener = Box<dyn FnOnce(&CancelReason) + Send>;

/// Handle returned by a subscription, used only to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
struct State {
    reason: Option<CancelReason>,
    next_id: u64,
    listeners: Vec<(ListenerId, Listener)>,
}

/// Fires at most once. Listeners run outside the lock, each exactly once.
#[derive(Default)]
pub(crate) struct Trigger {
    state: Mutex<State>,
}

impl Trigger {
    pub(crate) fn fired(reason: CancelReason) -> Self {
        Trigger {
            state: Mutex::new(State {
                reason: Some(reason),
                ..State::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn reason(&self) -> Option<CancelReason> {
        self.lock().reason.clone()
    }

    pub(crate) fn is_fired(&self) -> bool {
        self.lock().reason.is_some()
    }

    /// Register `listener`, or run it right away if the trigger already fired.
    pub(crate) fn subscribe<F>(&self, listener: F) -> Option<ListenerId>
    where
        F: FnOnce(&CancelReason) + Send + 'static,
    {
        let mut state = self.lock();
        if let Some(reason) = state.reason.clone() {
            drop(state);
            listener(&reason);
            return None;
        }
        let id = ListenerId(state.next_id);
        state.next_id += 1;
        state.listeners.push((id, Box::new(listener)));
        Some(id)
    }

    pub(crate) fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut state = self.lock();
        let before = state.listeners.len();
        state.listeners.retain(|(listener, _)| *listener != id);
        state.listeners.len() != before
    }

    /// Returns false if the trigger had already fired.
    pub(crate) fn fire(&self, reason: CancelReason) -> bool {
        let listeners = {
            let mut state = self.lock();
            if state.reason.is_some() {
                return false;
            }
            state.reason = Some(reason.clone());
            std::mem::take(&mut state.listeners)
        };
        for (_, listener) in listeners {
            listener(&reason);
        }
        true
    }

    #[cfg(test)]
    pub(crate) fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }
}
