//! Request configuration
//!
//! The per-request [`RequestConfig`], the process [`defaults`], the
//! per-field merge policy and the option validation applied before any I/O.

pub mod defaults;
pub mod merge;
pub mod params;
pub mod spec;
pub mod transitional;
pub mod types;
pub mod validation;

pub use defaults::{default_adapter, defaults};
pub use merge::{deep_merge, merge_config};
pub use params::{EncodeFn, ParamsSerializer, SerializeFn};
pub use spec::ConfigSpec;
pub use transitional::Transitional;
pub use types::{Params, RequestConfig, ResponseType, ValidateStatus};
pub use validation::{Rule, ValidationError, Validator, assert_options};
