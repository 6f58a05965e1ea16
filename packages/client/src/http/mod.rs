//! HTTP building blocks
//!
//! Verbs, payloads, the case-insensitive header container with its
//! per-method buckets, responses, progress snapshots and URL helpers.

pub mod body;
pub mod headers;
pub mod method;
pub mod progress;
pub mod response;
pub mod url;

pub use body::*;
pub use headers::*;
pub use method::*;
pub use progress::*;
pub use response::*;
pub use url::*;
