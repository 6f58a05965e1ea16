pub mod classification;
pub mod constructors;
pub mod types;

pub use constructors::*;
pub use types::{Error, Kind, Result};

// Type alias for call sites that read better with an HTTP prefix
pub type HttpError = Error;
