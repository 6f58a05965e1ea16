//! Cooperative cancellation
//!
//! A request can be cancelled through a [`CancelToken`] or an externally
//! owned [`AbortSignal`]. The dispatcher folds both into a [`Cancellation`]
//! and checks it at fixed checkpoints; transports subscribe to it to stop
//! I/O early.

pub mod abort;
pub mod context;
pub mod token;
mod trigger;

pub use abort::{AbortController, AbortSignal};
pub use context::{CancelGuard, Cancellation};
pub use token::{CancelReason, CancelSource, CancelToken};
pub use trigger::ListenerId;
