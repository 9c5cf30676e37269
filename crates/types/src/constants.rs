//! Well-known environment variable names and value tables

/// Enables debug mode (caller reporting in logs).
pub const APP_DEBUG: &str = "APP_DEBUG";

/// Minimum log level of the application.
pub const APP_LOG_LEVEL: &str = "APP_LOG_LEVEL";

/// Switches the log output to the human readable text format.
pub const APP_LOG_DEV: &str = "APP_LOG_DEV";

/// Deployment environment, one of [`VALID_ENVIRONMENTS`].
pub const APP_ENV: &str = "APP_ENV";

/// TCP port the application listens on.
pub const APP_PORT: &str = "APP_PORT";

/// Name of the secret holding the database credentials.
pub const APP_DB_SECRET_NAME: &str = "APP_DB_SECRET_NAME";

/// Collapses multi-line error chains into a single log line.
pub const APP_LOG_FORMAT_ERRORS: &str = "APP_LOG_FORMAT_ERRORS";

/// EC2 instance identifier, preferred over the OS hostname.
pub const EC2_ID: &str = "EC2_ID";

/// Log level read by the standalone logger constructor.
pub const LOG_LEVEL: &str = "LOG_LEVEL";

/// Text format toggle read by the standalone logger constructor.
pub const LOG_DEV: &str = "LOG_DEV";

/// Error formatting toggle read by the logger constructors.
pub const LOG_FORMAT_ERRORS: &str = "LOG_FORMAT_ERRORS";

/// The environment variables every service is expected to understand.
pub const BASIC_ENVS: &[&str] = &[
    EC2_ID,
    APP_ENV,
    APP_PORT,
    APP_LOG_LEVEL,
    APP_LOG_DEV,
    APP_LOG_FORMAT_ERRORS,
    APP_DEBUG,
    APP_DB_SECRET_NAME,
];

pub const ENV_TEST: &str = "test";
pub const ENV_DEV: &str = "dev";
pub const ENV_STAGING: &str = "stage";
pub const ENV_ACCEPTANCE: &str = "acceptance";
pub const ENV_PRODUCTION: &str = "production";

/// Valid values of [`APP_ENV`].
pub const VALID_ENVIRONMENTS: &[&str] = &[
    ENV_DEV,
    ENV_TEST,
    ENV_STAGING,
    ENV_ACCEPTANCE,
    ENV_PRODUCTION,
];

pub const LOG_LEVEL_ERROR: &str = "error";
pub const LOG_LEVEL_WARN: &str = "warn";
pub const LOG_LEVEL_INFO: &str = "info";
pub const LOG_LEVEL_DEBUG: &str = "debug";

/// Valid values of [`APP_LOG_LEVEL`].
pub const VALID_LOG_LEVELS: &[&str] = &[
    LOG_LEVEL_DEBUG,
    LOG_LEVEL_INFO,
    LOG_LEVEL_WARN,
    LOG_LEVEL_ERROR,
];

/// Tokens recognised as booleans, see [`parse_bool`](crate::parse_bool).
pub const TRUTHY_VALUES: &[&str] = &[
    "1", "t", "T", "TRUE", "true", "True", "0", "f", "F", "FALSE", "false", "False",
];

// PostgreSQL sslmode values, see https://www.postgresql.org/docs/current/libpq-ssl.html

/// Disables SSL.
pub const SSL_MODE_DISABLE: &str = "disable";
/// Tries a non-SSL connection first.
pub const SSL_MODE_ALLOW: &str = "allow";
/// Tries an SSL connection first.
pub const SSL_MODE_PREFER: &str = "prefer";
/// Requires SSL without certificate verification.
pub const SSL_MODE_REQUIRE: &str = "require";
/// Requires SSL and verifies the server certificate against a CA.
pub const SSL_MODE_VERIFY_CA: &str = "verify-ca";
/// Like `verify-ca`, and also checks the server host name.
pub const SSL_MODE_VERIFY_FULL: &str = "verify-full";

/// Valid SSL modes, used in validation.
pub const VALID_SSL_MODES: &[&str] = &[
    SSL_MODE_DISABLE,
    SSL_MODE_ALLOW,
    SSL_MODE_PREFER,
    SSL_MODE_REQUIRE,
    SSL_MODE_VERIFY_CA,
    SSL_MODE_VERIFY_FULL,
];
