//! The request orchestrator
//!
//! `core` owns the merge → interceptors → dispatch pipeline, `methods`
//! adds the verb shorthands on top of it.

pub mod core;
pub mod methods;

pub use self::core::HttpClient;
