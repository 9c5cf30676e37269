//! Validation rules applied to resolved configuration values

use thiserror::Error;

/// Message produced by a [`Rule`] that rejects a value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct RuleError(pub String);

impl RuleError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A named check applied to a variable's resolved value.
///
/// Closures of the form `Fn(&str) -> Result<(), String>` are rules too, so
/// callers can supply their own without declaring a type.
pub trait Rule: Send + Sync {
    fn validate(&self, value: &str) -> Result<(), RuleError>;
}

impl<F> Rule for F
where
    F: Fn(&str) -> Result<(), String> + Send + Sync,
{
    fn validate(&self, value: &str) -> Result<(), RuleError> {
        self(value).map_err(RuleError)
    }
}

/// Fix a closure's signature so it can serve as a rule without annotations.
pub fn rule_fn<F>(rule: F) -> F
where
    F: Fn(&str) -> Result<(), String> + Send + Sync,
{
    rule
}

/// Rejects the empty string.
#[derive(Debug, Clone, Copy, Default)]
pub struct Required;

impl Rule for Required {
    fn validate(&self, value: &str) -> Result<(), RuleError> {
        if value.is_empty() {
            return Err(RuleError::new("cannot be blank"));
        }
        Ok(())
    }
}

/// Accepts only values from a fixed list. Empty values pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct In {
    allowed: Vec<String>,
}

impl In {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }
}

impl Rule for In {
    fn validate(&self, value: &str) -> Result<(), RuleError> {
        if value.is_empty() || self.allowed.iter().any(|allowed| allowed == value) {
            return Ok(());
        }
        Err(RuleError::new("must be a valid value"))
    }
}

/// Shorthand for [`In::new`] over a constant table.
pub fn one_of(allowed: &[&str]) -> In {
    In::new(allowed.iter().copied())
}

/// Accepts TCP/UDP port numbers in `1..=65535`. Empty values pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct Port;

impl Rule for Port {
    fn validate(&self, value: &str) -> Result<(), RuleError> {
        if value.is_empty() {
            return Ok(());
        }
        match value.parse::<u16>() {
            Ok(port) if port > 0 => Ok(()),
            _ => Err(RuleError::new("must be a valid port number")),
        }
    }
}

/// Wraps a boolean check with a fixed failure message. Empty values pass.
pub struct Predicate<F> {
    check: F,
    message: String,
}

impl<F> Rule for Predicate<F>
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn validate(&self, value: &str) -> Result<(), RuleError> {
        if value.is_empty() || (self.check)(value) {
            return Ok(());
        }
        Err(RuleError::new(self.message.clone()))
    }
}

/// Build a [`Predicate`] rule.
pub fn predicate<F>(message: impl Into<String>, check: F) -> Predicate<F>
where
    F: Fn(&str) -> bool + Send + Sync,
{
    Predicate {
        check,
        message: message.into(),
    }
}
