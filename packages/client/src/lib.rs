//! # Courier client core
//!
//! Request orchestration for an HTTP client: layered configuration,
//! interceptor chains, a pluggable transport boundary and cooperative
//! cancellation.
//!
//! ## Features
//!
//! - **Layered configuration** with per-field merge policies
//! - **Request and response interceptors** that can be ejected at any time
//! - **Pluggable transports** resolved by name, reference or candidate list
//! - **Cancellation** through cancel tokens and abort signals
//! - **Default transforms** for JSON, urlencoded and multipart bodies
//!
//! ## Usage
//!
//! ```no_run
//! use courier_client::{HttpClient, RequestConfig};
//!
//! # async fn run() -> courier_client::Result<()> {
//! let client = HttpClient::new();
//! let response = client
//!     .request(RequestConfig::new().url("http://localhost:8080/health"))
//!     .await?;
//! println!("{} {}", response.status, response.status_text);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all)]

pub mod adapter;
pub mod cancel;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod interceptor;
pub mod transform;

// Prelude with canonical types
pub mod prelude;

pub use crate::prelude::*;
