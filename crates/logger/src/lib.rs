//! Structured logging with mandatory default fields
//!
//! Build the application's root logger with [`Logger::from_configuration`]
//! (or [`Logger::common`]), derive per-component loggers with
//! [`Logger::component`], and create entries with [`Logger::entry`],
//! [`Logger::with_field`], [`Logger::with_fields`] and [`Logger::with_error`].

pub mod fields;
pub mod logger;
pub mod orm;
pub mod sink;

pub use fields::{FieldValue, Fields};
pub use logger::{format_error, Entry, Logger, LoggerOptions};
pub use orm::{DriverLogger, OrmConfig, OrmLevel, OrmLogger};
pub use sink::{Format, Record, Sink, TracingSink, WriterSink};
pub use types::LogLevel;
