//! The logger wrapper and its entries

use crate::fields::{FieldValue, Fields};
use crate::orm::{OrmConfig, OrmLevel};
use crate::sink::{Format, Record, Sink, WriterSink};
use chrono::Utc;
use std::error::Error;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;
use types::constants::{
    APP_DEBUG, APP_ENV, APP_LOG_DEV, APP_LOG_FORMAT_ERRORS, APP_LOG_LEVEL, LOG_DEV,
    LOG_FORMAT_ERRORS, LOG_LEVEL,
};
use types::{is_truthy, ConfigSource, EnvSnapshot, LogLevel};

/// Settings fixed when a [`Logger`] is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoggerOptions {
    /// Collapse multi-line error chains into one line, see [`format_error`].
    pub format_errors: bool,
    /// Settings inherited by ORM adapters.
    pub orm: OrmConfig,
}

/// A sink plus the default fields attached to every entry.
///
/// Cloning is cheap; clones share the sink.
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn Sink>,
    default_fields: Fields,
    options: LoggerOptions,
}

impl Logger {
    /// Create a logger over an already configured sink.
    ///
    /// The error formatting toggle is read from `LOG_FORMAT_ERRORS` in `env`.
    pub fn new(sink: Arc<dyn Sink>, default_fields: Fields, env: &EnvSnapshot) -> Self {
        let options = LoggerOptions {
            format_errors: env.get(LOG_FORMAT_ERRORS).is_some_and(is_truthy),
            ..LoggerOptions::default()
        };
        Self::with_options(sink, default_fields, options)
    }

    pub fn with_options(sink: Arc<dyn Sink>, default_fields: Fields, options: LoggerOptions) -> Self {
        Self {
            sink,
            default_fields,
            options,
        }
    }

    /// Standalone logger writing to stdout, configured from `LOG_LEVEL` and `LOG_DEV`.
    ///
    /// `debug` forces the debug level and reports call sites. Prefer
    /// [`from_configuration`](Self::from_configuration) when an
    /// `AppConfig` is available.
    pub fn common(
        service: &str,
        version: &str,
        env_name: &str,
        host: &str,
        debug: bool,
        env: &EnvSnapshot,
    ) -> Self {
        let level = if debug {
            LogLevel::Debug
        } else {
            LogLevel::parse_or_info(env.get(LOG_LEVEL).unwrap_or_default())
        };
        let format = if env.get(LOG_DEV).is_some_and(is_truthy) {
            Format::Text
        } else {
            Format::Json
        };

        let sink = WriterSink::stdout()
            .with_level(level)
            .with_format(format)
            .with_report_caller(debug);

        Self::new(
            Arc::new(sink),
            crate::fields! {
                "service" => service,
                "version" => version,
                "env" => env_name,
                "host" => host,
            },
            env,
        )
    }

    /// The preferred way to build the application's root logger.
    ///
    /// Reads `APP_DEBUG`, `APP_LOG_LEVEL`, `APP_LOG_DEV`, `APP_LOG_FORMAT_ERRORS`
    /// and `APP_ENV`, and quiets ORM adapters when the application itself
    /// only logs warnings or errors.
    pub fn from_configuration(service: &str, version: &str, config: &impl ConfigSource) -> Self {
        let debug = is_truthy(&config.get(APP_DEBUG));
        let level = LogLevel::parse_or_info(&config.get(APP_LOG_LEVEL));
        let format = if is_truthy(&config.get(APP_LOG_DEV)) {
            Format::Text
        } else {
            Format::Json
        };

        let sink = WriterSink::stdout()
            .with_level(level)
            .with_format(format)
            .with_report_caller(debug);

        let options = LoggerOptions {
            format_errors: is_truthy(&config.get(APP_LOG_FORMAT_ERRORS)),
            orm: OrmConfig {
                level: OrmLevel::for_log_level(level),
                ..OrmConfig::default()
            },
        };

        Self::with_options(
            Arc::new(sink),
            crate::fields! {
                "service" => service,
                "version" => version,
                "env" => config.get(APP_ENV),
                "host" => config.hostname(),
            },
            options,
        )
    }

    /// A logger over the same sink with an extra `component` field.
    ///
    /// The default fields are copied, so later changes to either logger do not
    /// affect the other.
    pub fn component(&self, name: &str) -> Logger {
        let mut default_fields = self.default_fields.clone();
        default_fields.insert("component".to_string(), name.into());
        Logger {
            sink: Arc::clone(&self.sink),
            default_fields,
            options: self.options,
        }
    }

    /// A new entry carrying the default fields.
    pub fn entry(&self) -> Entry {
        Entry {
            sink: Arc::clone(&self.sink),
            fields: self.default_fields.clone(),
            format_errors: self.options.format_errors,
        }
    }

    pub fn with_field(&self, key: &str, value: impl Into<FieldValue>) -> Entry {
        self.entry().with_field(key, value)
    }

    pub fn with_fields(&self, fields: Fields) -> Entry {
        self.entry().with_fields(fields)
    }

    /// An entry with an `error` field, see [`format_error`].
    pub fn with_error(&self, err: Option<&(dyn Error + 'static)>) -> Entry {
        self.entry().with_error(err)
    }

    pub fn default_fields(&self) -> &Fields {
        &self.default_fields
    }

    /// Add or replace a default field of this logger only.
    pub fn insert_default_field(&mut self, key: &str, value: impl Into<FieldValue>) {
        self.default_fields.insert(key.to_string(), value.into());
    }

    pub fn options(&self) -> &LoggerOptions {
        &self.options
    }

    pub fn set_orm_config(&mut self, orm: OrmConfig) {
        self.options.orm = orm;
    }

    pub fn sink(&self) -> &Arc<dyn Sink> {
        &self.sink
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("default_fields", &self.default_fields)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// A log entry under construction. Finish it with one of the level methods.
#[derive(Clone)]
pub struct Entry {
    sink: Arc<dyn Sink>,
    fields: Fields,
    format_errors: bool,
}

impl Entry {
    pub fn with_field(mut self, key: &str, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields.extend(fields);
        self
    }

    pub fn with_error(self, err: Option<&(dyn Error + 'static)>) -> Self {
        let formatted = format_error(err, self.format_errors);
        self.with_field("error", formatted)
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Emit the entry at `level`. The call site is recorded for caller reporting.
    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl fmt::Display) {
        if !self.sink.enabled(level) {
            return;
        }
        let message = message.to_string();
        self.sink.emit(&Record {
            time: Utc::now(),
            level,
            message: &message,
            fields: &self.fields,
            caller: Some(Location::caller()),
        });
    }

    #[track_caller]
    pub fn trace(&self, message: impl fmt::Display) {
        self.log(LogLevel::Trace, message)
    }

    #[track_caller]
    pub fn debug(&self, message: impl fmt::Display) {
        self.log(LogLevel::Debug, message)
    }

    #[track_caller]
    pub fn info(&self, message: impl fmt::Display) {
        self.log(LogLevel::Info, message)
    }

    #[track_caller]
    pub fn warn(&self, message: impl fmt::Display) {
        self.log(LogLevel::Warn, message)
    }

    #[track_caller]
    pub fn error(&self, message: impl fmt::Display) {
        self.log(LogLevel::Error, message)
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

/// The value of the `error` field for `err`.
///
/// - no error: `"<nil>"`
/// - an error without a source: its message
/// - an error with a source: the source and its whole chain, one cause per
///   line. With `format_errors` the newlines become `" --- "` and tabs are
///   removed, keeping the chain on one log line.
pub fn format_error(err: Option<&(dyn Error + 'static)>, format_errors: bool) -> String {
    let Some(err) = err else {
        return "<nil>".to_string();
    };
    let Some(cause) = err.source() else {
        return err.to_string();
    };

    let detailed = error_chain(cause);
    if format_errors {
        detailed
            .replace("\r\n", " --- ")
            .replace('\n', " --- ")
            .replace('\t', "")
    } else {
        detailed
    }
}

fn error_chain(err: &(dyn Error + 'static)) -> String {
    let mut chain = err.to_string();
    let mut next = err.source();
    while let Some(cause) = next {
        chain.push_str("\n\tcaused by: ");
        chain.push_str(&cause.to_string());
        next = cause.source();
    }
    chain
}
