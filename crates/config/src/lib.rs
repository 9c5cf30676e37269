//! Configuration management for services
//!
//! This crate resolves a declared set of configuration variables from their
//! defaults, the environment and optional `.env` override files, validates
//! them, and documents them as a table or a sample file.

pub mod loader;
pub mod output;
pub mod schema;
pub mod validation;
pub mod variable;

pub use loader::AppConfig;
pub use schema::basic_schema;
pub use validation::*;
pub use variable::Variable;
