//! Destinations for log records

use crate::fields::{FieldValue, Fields};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::fmt;
use std::io::{self, Write};
use std::panic::Location;
use std::sync::Mutex;
use types::LogLevel;

/// A single log event handed to a [`Sink`].
#[derive(Debug, Clone)]
pub struct Record<'a> {
    pub time: DateTime<Utc>,
    pub level: LogLevel,
    pub message: &'a str,
    pub fields: &'a Fields,
    pub caller: Option<&'static Location<'static>>,
}

/// Where log records go.
pub trait Sink: Send + Sync {
    /// Whether records at `level` would be written. Checked before a record is built.
    fn enabled(&self, level: LogLevel) -> bool {
        let _ = level;
        true
    }

    fn emit(&self, record: &Record<'_>);
}

/// Output format of a [`WriterSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Json,
    /// `key=value` pairs, for humans.
    Text,
}

const RESERVED_KEYS: [&str; 4] = ["time", "level", "msg", "file"];

/// Writes one line per record to stdout or any other writer.
pub struct WriterSink {
    writer: Mutex<Box<dyn Write + Send>>,
    format: Format,
    level: LogLevel,
    report_caller: bool,
}

impl WriterSink {
    /// JSON lines at info level
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            format: Format::default(),
            level: LogLevel::Info,
            report_caller: false,
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Add the `file` field holding the call site of each entry.
    pub fn with_report_caller(mut self, report_caller: bool) -> Self {
        self.report_caller = report_caller;
        self
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn reports_caller(&self) -> bool {
        self.report_caller
    }

    /// Render a record the way [`emit`](Sink::emit) writes it, without the trailing newline.
    pub fn render(&self, record: &Record<'_>) -> String {
        match self.format {
            Format::Json => self.render_json(record),
            Format::Text => self.render_text(record),
        }
    }

    fn caller(&self, record: &Record<'_>) -> Option<String> {
        record
            .caller
            .filter(|_| self.report_caller)
            .map(|location| format!("{}:{}", location.file(), location.line()))
    }

    fn render_json(&self, record: &Record<'_>) -> String {
        let mut object = Map::new();
        for (key, value) in record.fields {
            let key = if RESERVED_KEYS.contains(&key.as_str()) {
                format!("fields.{}", key)
            } else {
                key.clone()
            };
            object.insert(key, serde_json::to_value(value).unwrap_or(Value::Null));
        }
        object.insert("time".into(), timestamp(record).into());
        object.insert("level".into(), record.level.as_str().into());
        object.insert("msg".into(), record.message.into());
        if let Some(caller) = self.caller(record) {
            object.insert("file".into(), caller.into());
        }
        Value::Object(object).to_string()
    }

    fn render_text(&self, record: &Record<'_>) -> String {
        let mut line = format!(
            "time={} level={} msg={}",
            quote(&timestamp(record)),
            record.level,
            quote(record.message)
        );
        if let Some(caller) = self.caller(record) {
            line.push_str(&format!(" file={}", quote(&caller)));
        }
        for (key, value) in record.fields {
            let value = match value {
                FieldValue::Str(s) => quote(s),
                other => other.to_string(),
            };
            line.push_str(&format!(" {}={}", key, value));
        }
        line
    }
}

impl fmt::Debug for WriterSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterSink")
            .field("format", &self.format)
            .field("level", &self.level)
            .field("report_caller", &self.report_caller)
            .finish()
    }
}

impl Sink for WriterSink {
    fn enabled(&self, level: LogLevel) -> bool {
        self.level.enables(level)
    }

    fn emit(&self, record: &Record<'_>) {
        let line = self.render(record);
        let mut writer = self.writer.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(err) = writeln!(writer, "{}", line) {
            eprintln!("Failed to write to log, {}", err);
        }
    }
}

fn timestamp(record: &Record<'_>) -> String {
    record.time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Quote a text value unless it is made of plain characters only.
fn quote(value: &str) -> String {
    let plain = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '/' | '@' | '^' | '+' | ':'));
    if plain {
        value.to_string()
    } else {
        format!("{:?}", value)
    }
}

/// Forwards records to `tracing`, for applications that install a
/// `tracing-subscriber` pipeline instead of writing through a [`WriterSink`].
///
/// Fields travel as one JSON object in the `fields` value, so numbers and
/// booleans keep their types for whoever decodes the event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl Sink for TracingSink {
    fn emit(&self, record: &Record<'_>) {
        let fields = serde_json::to_string(record.fields).unwrap_or_default();
        match record.level {
            LogLevel::Panic | LogLevel::Fatal | LogLevel::Error => {
                tracing::error!(fields = %fields, "{}", record.message)
            }
            LogLevel::Warn => tracing::warn!(fields = %fields, "{}", record.message),
            LogLevel::Info => tracing::info!(fields = %fields, "{}", record.message),
            LogLevel::Debug => tracing::debug!(fields = %fields, "{}", record.message),
            LogLevel::Trace => tracing::trace!(fields = %fields, "{}", record.message),
        }
    }
}
