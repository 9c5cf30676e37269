//! Error types for the service utilities

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Errors returned while loading, validating or documenting configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An override file could not be read or parsed
    #[error("failed to load env file {path}: {source}")]
    EnvFile {
        path: String,
        #[source]
        source: dotenvy::Error,
    },

    /// One or more validation rules rejected a resolved value
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// The sample file could not be created or written
    #[error("failed to write sample file {path}: {source}")]
    SampleFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Every failing rule of every invalid variable.
///
/// Keyed by `"<NAME> = <value>"`, then by rule name. Both levels are kept in
/// lexicographic order so the rendered message is reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    entries: BTreeMap<String, BTreeMap<String, String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `rule` rejected `value` of the variable `name`.
    pub fn add(&mut self, name: &str, value: &str, rule: &str, message: impl Into<String>) {
        self.entries
            .entry(format!("{} = {}", name, value))
            .or_default()
            .insert(rule.to_string(), message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of invalid variables.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, String>)> {
        self.entries.iter().map(|(key, rules)| (key.as_str(), rules))
    }

    /// Failing rules of the variable `name`, keyed by rule name.
    pub fn failures_for(&self, name: &str) -> Option<&BTreeMap<String, String>> {
        self.entries
            .iter()
            .find(|(key, _)| key.split_once(" = ").map(|(n, _)| n) == Some(name))
            .map(|(_, rules)| rules)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, rules)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: (", key)?;
            for (j, (rule, message)) in rules.iter().enumerate() {
                if j > 0 {
                    f.write_str("; ")?;
                }
                write!(f, "{}: {}", rule, message)?;
            }
            f.write_str(".)")?;
        }
        if !self.entries.is_empty() {
            f.write_str(".")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
