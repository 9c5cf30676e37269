//! Adapter for ORM and database driver logging callbacks

use crate::logger::Logger;
use regex::Regex;
use std::error::Error;
use std::sync::LazyLock;
use std::time::Duration;
use types::constants::{LOG_LEVEL_ERROR, LOG_LEVEL_INFO, LOG_LEVEL_WARN};
use types::LogLevel;

/// Matches everything inside `[brackets]`.
static IN_BRACKETS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]").expect("valid bracket pattern"));

/// Verbosity of an ORM adapter, from quietest to loudest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum OrmLevel {
    Silent,
    Error,
    Warn,
    #[default]
    Info,
}

impl OrmLevel {
    /// Keep driver logs proportionate to the application's own verbosity.
    pub fn for_log_level(level: LogLevel) -> Self {
        match level {
            LogLevel::Panic | LogLevel::Fatal | LogLevel::Error => OrmLevel::Error,
            LogLevel::Warn => OrmLevel::Warn,
            _ => OrmLevel::Info,
        }
    }
}

/// ORM adapter settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrmConfig {
    /// Statements slower than this are logged as warnings. Zero disables the check.
    pub slow_threshold: Duration,
    pub level: OrmLevel,
}

impl Default for OrmConfig {
    fn default() -> Self {
        Self {
            slow_threshold: Duration::from_millis(200),
            level: OrmLevel::Info,
        }
    }
}

/// The logging callbacks an ORM or database driver calls into.
pub trait DriverLogger {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);

    /// Entry point for callers that prefix messages with a `[level]` tag.
    fn printf(&self, message: &str);

    /// Report an executed statement.
    fn trace(&self, elapsed: Duration, sql: &str, rows: Option<u64>, err: Option<&(dyn Error + 'static)>);
}

/// [`DriverLogger`] writing through a component [`Logger`].
#[derive(Debug, Clone)]
pub struct OrmLogger {
    logger: Logger,
    config: OrmConfig,
}

impl Logger {
    /// An ORM adapter logging through a new component logger named `component`.
    pub fn orm_logger(&self, component: &str) -> OrmLogger {
        let logger = self.component(component);
        OrmLogger {
            config: logger.options().orm,
            logger,
        }
    }
}

impl OrmLogger {
    pub fn config(&self) -> &OrmConfig {
        &self.config
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// A copy of the adapter with a different verbosity.
    pub fn with_level(mut self, level: OrmLevel) -> Self {
        self.config.level = level;
        self
    }

    fn enabled(&self, level: OrmLevel) -> bool {
        self.config.level >= level
    }
}

impl DriverLogger for OrmLogger {
    fn info(&self, message: &str) {
        if self.enabled(OrmLevel::Info) {
            self.printf(&format!("[info] {}", message));
        }
    }

    fn warn(&self, message: &str) {
        if self.enabled(OrmLevel::Warn) {
            self.printf(&format!("[warn] {}", message));
        }
    }

    fn error(&self, message: &str) {
        if self.enabled(OrmLevel::Error) {
            self.printf(&format!("[error] {}", message));
        }
    }

    fn printf(&self, message: &str) {
        let entry = self.logger.entry();
        match tag_level(message) {
            LOG_LEVEL_ERROR => entry.log(LogLevel::Error, message.replacen("[error] ", "", 1)),
            LOG_LEVEL_WARN => entry.log(LogLevel::Warn, message.replacen("[warn] ", "", 1)),
            _ => entry.log(LogLevel::Info, message.replacen("[info] ", "", 1)),
        }
    }

    fn trace(&self, elapsed: Duration, sql: &str, rows: Option<u64>, err: Option<&(dyn Error + 'static)>) {
        if self.config.level == OrmLevel::Silent {
            return;
        }

        let millis = elapsed.as_secs_f64() * 1000.0;
        let rows = rows.map_or_else(|| "-".to_string(), |rows| rows.to_string());
        let threshold = self.config.slow_threshold;

        match err {
            Some(err) if self.enabled(OrmLevel::Error) => self.printf(&format!(
                "[error] {} [{:.3}ms] [rows:{}] {}",
                err, millis, rows, sql
            )),
            Some(_) => {}
            None if !threshold.is_zero() && elapsed > threshold && self.enabled(OrmLevel::Warn) => {
                self.printf(&format!(
                    "[warn] SLOW SQL >= {:?} [{:.3}ms] [rows:{}] {}",
                    threshold, millis, rows, sql
                ))
            }
            None if self.enabled(OrmLevel::Info) => {
                self.printf(&format!("[info] [{:.3}ms] [rows:{}] {}", millis, rows, sql))
            }
            None => {}
        }
    }
}

/// Level name of the first bracketed tag in `message`, info when it is not error or warn.
fn tag_level(message: &str) -> &'static str {
    let tag = IN_BRACKETS
        .captures(message)
        .and_then(|captures| captures.get(1))
        .map(|tag| tag.as_str());

    match tag {
        Some("error") => LOG_LEVEL_ERROR,
        Some("warn") => LOG_LEVEL_WARN,
        _ => LOG_LEVEL_INFO,
    }
}
