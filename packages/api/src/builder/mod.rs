//! Fluent request builder
//!
//! Builds a request config step by step and sends it through an
//! [`HttpClient`](courier_client::HttpClient) with a terminal verb method.

pub mod auth;
pub mod body;
pub mod core;
pub mod headers;
pub mod methods;

pub use self::core::*;
pub use headers::*;
