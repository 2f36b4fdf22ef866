pub mod config;
pub mod error;

pub use config::{RelayConfig, Site};
pub use error::{RelayError, Result};
