//! Shared types for the service utilities
//!
//! This crate contains the constant tables, the environment snapshot, the
//! log level enum and the error types shared by the `config` and `logger`
//! crates.

pub mod constants;
pub mod env;
pub mod error;
pub mod level;
pub mod source;
pub mod utils;

// Re-export commonly used types
pub use env::EnvSnapshot;
pub use error::{ConfigError, Result, ValidationErrors};
pub use level::{LogLevel, ParseLevelError};
pub use source::ConfigSource;
pub use utils::{is_truthy, parse_bool};
