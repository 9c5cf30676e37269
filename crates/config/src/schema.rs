//! The standard variable set shared by services

use crate::validation::{one_of, Port, Required};
use crate::variable::Variable;
use std::collections::BTreeMap;
use types::constants::{
    APP_DB_SECRET_NAME, APP_DEBUG, APP_ENV, APP_LOG_DEV, APP_LOG_FORMAT_ERRORS, APP_LOG_LEVEL,
    APP_PORT, ENV_DEV, LOG_LEVEL_INFO, TRUTHY_VALUES, VALID_ENVIRONMENTS, VALID_LOG_LEVELS,
};

/// Schema covering the basic environment variables every service reads.
///
/// Returned as a map so services can insert their own variables before
/// building an [`AppConfig`](crate::AppConfig).
pub fn basic_schema() -> BTreeMap<String, Variable> {
    let mut schema = BTreeMap::new();

    schema.insert(
        APP_PORT.to_string(),
        Variable::new("8080")
            .with_description("TCP/IP Port where the application listens")
            .with_rule("Required", Required)
            .with_rule("Valid port", Port),
    );
    schema.insert(
        APP_ENV.to_string(),
        Variable::new(ENV_DEV)
            .with_description("The environment of the application")
            .with_rule("Required", Required)
            .with_rule("Valid environment", one_of(VALID_ENVIRONMENTS)),
    );
    schema.insert(
        APP_DEBUG.to_string(),
        Variable::new("false")
            .with_description("Debug mode")
            .with_rule("Truthy value", one_of(TRUTHY_VALUES)),
    );
    schema.insert(
        APP_LOG_LEVEL.to_string(),
        Variable::new(LOG_LEVEL_INFO)
            .with_description("Level of logging")
            .with_rule("Required", Required)
            .with_rule("Valid log level", one_of(VALID_LOG_LEVELS)),
    );
    schema.insert(
        APP_LOG_DEV.to_string(),
        Variable::new("")
            .with_description("Log development mode (Text formatter instead of JSON)")
            .with_rule("Truthy value", one_of(TRUTHY_VALUES)),
    );
    schema.insert(
        APP_LOG_FORMAT_ERRORS.to_string(),
        Variable::new("")
            .with_description("Format error log entries by switching newlines to --- and removing tabs")
            .with_rule("Truthy value", one_of(TRUTHY_VALUES)),
    );
    schema.insert(
        APP_DB_SECRET_NAME.to_string(),
        Variable::new("").with_description("The Database's secret's name in AWS SecretsManager"),
    );

    schema
}

/// The basic schema with test-friendly defaults.
#[cfg(test)]
pub(crate) fn test_schema() -> BTreeMap<String, Variable> {
    use types::constants::{ENV_TEST, LOG_LEVEL_DEBUG};

    let mut schema = basic_schema();
    schema.insert(
        APP_ENV.to_string(),
        Variable::new(ENV_TEST)
            .with_description("The environment of the application")
            .with_rule("Required", Required)
            .with_rule("Valid environment", one_of(VALID_ENVIRONMENTS)),
    );
    schema.insert(
        APP_DEBUG.to_string(),
        Variable::new("true")
            .with_description("Debug mode")
            .with_rule("Truthy value", one_of(TRUTHY_VALUES)),
    );
    schema.insert(
        APP_LOG_LEVEL.to_string(),
        Variable::new(LOG_LEVEL_DEBUG)
            .with_description("Level of logging")
            .with_rule("Required", Required)
            .with_rule("Valid log level", one_of(VALID_LOG_LEVELS)),
    );
    schema
}
