//! The configuration store

use crate::variable::Variable;
use std::collections::BTreeMap;
use std::path::Path;
use types::constants::{
    APP_DB_SECRET_NAME, APP_DEBUG, APP_ENV, APP_LOG_DEV, APP_LOG_FORMAT_ERRORS, APP_LOG_LEVEL,
    APP_PORT, ENV_ACCEPTANCE, ENV_DEV, ENV_PRODUCTION, ENV_STAGING, ENV_TEST,
};
use types::{is_truthy, ConfigSource, EnvSnapshot, LogLevel, Result, ValidationErrors};

/// The configuration items of an application.
///
/// Built once from a schema, resolved by [`setup`](Self::setup), then only read.
#[derive(Debug, Default)]
pub struct AppConfig {
    vars: BTreeMap<String, Variable>,
    env: EnvSnapshot,
}

impl AppConfig {
    /// Create a store from a schema of variables keyed by name
    pub fn new<I, K>(schema: I) -> Self
    where
        I: IntoIterator<Item = (K, Variable)>,
        K: Into<String>,
    {
        Self {
            vars: schema
                .into_iter()
                .map(|(name, var)| (name.into(), var))
                .collect(),
            env: EnvSnapshot::host(),
        }
    }

    /// A store with no variables
    pub fn empty() -> Self {
        Self::new(std::iter::empty::<(String, Variable)>())
    }

    /// Resolve every variable, then validate.
    ///
    /// Precedence, highest first: the override files (later files win), the
    /// environment snapshot, the variable's default. When a file cannot be
    /// loaded the store is left untouched and the error names the file.
    pub fn setup(&mut self, env: EnvSnapshot, env_files: &[&Path]) -> Result<()> {
        self.load_env(env, env_files)?;
        self.validate()
    }

    /// [`setup`](Self::setup) against a fresh snapshot of the process environment.
    pub fn setup_from_process(&mut self, env_files: &[&Path]) -> Result<()> {
        self.setup(EnvSnapshot::capture(), env_files)
    }

    fn load_env(&mut self, mut env: EnvSnapshot, env_files: &[&Path]) -> Result<()> {
        for path in env_files {
            let entries = env.overlay_file(path)?;
            tracing::debug!(path = %path.display(), entries, "Loaded env file");
        }

        for (name, var) in self.vars.iter_mut() {
            var.resolve(name, &env);
        }
        self.env = env;

        tracing::debug!(variables = self.vars.len(), "Configuration resolved");
        Ok(())
    }

    /// Apply every variable's rules, collecting all failures.
    pub fn validation_errors(&self) -> Option<ValidationErrors> {
        let mut errors = ValidationErrors::new();

        for (name, var) in &self.vars {
            for (rule, err) in var.failures() {
                errors.add(name, var.value(), rule, err.to_string());
            }
        }

        if errors.is_empty() {
            None
        } else {
            Some(errors)
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        match self.validation_errors() {
            Some(errors) => Err(errors.into()),
            None => Ok(()),
        }
    }

    /// Resolved value of the named variable, `None` when it is not registered.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(Variable::value)
    }

    /// Resolved value of the named variable, empty when it is not registered.
    pub fn get(&self, name: &str) -> &str {
        self.lookup(name).unwrap_or_default()
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.vars.get(name)
    }

    /// Registered variable names in lexicographic order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    pub(crate) fn variables(&self) -> impl Iterator<Item = (&str, &Variable)> {
        self.vars.iter().map(|(name, var)| (name.as_str(), var))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// The environment the store was resolved against, override files included.
    pub fn environment(&self) -> &EnvSnapshot {
        &self.env
    }

    pub fn is_debug(&self) -> bool {
        is_truthy(self.get(APP_DEBUG))
    }

    pub fn is_log_dev(&self) -> bool {
        is_truthy(self.get(APP_LOG_DEV))
    }

    pub fn is_log_format_errors(&self) -> bool {
        is_truthy(self.get(APP_LOG_FORMAT_ERRORS))
    }

    pub fn is_dev(&self) -> bool {
        self.env() == ENV_DEV
    }

    pub fn is_test(&self) -> bool {
        self.env() == ENV_TEST
    }

    pub fn is_staging(&self) -> bool {
        self.env() == ENV_STAGING
    }

    pub fn is_acceptance(&self) -> bool {
        self.env() == ENV_ACCEPTANCE
    }

    pub fn is_production(&self) -> bool {
        self.env() == ENV_PRODUCTION
    }

    /// The application's environment name.
    pub fn env(&self) -> &str {
        self.get(APP_ENV)
    }

    /// The log level as configured.
    pub fn log_level(&self) -> &str {
        self.get(APP_LOG_LEVEL)
    }

    /// The log level parsed, [`LogLevel::Info`] when it cannot be parsed.
    pub fn log_level_enum(&self) -> LogLevel {
        LogLevel::parse_or_info(self.log_level())
    }

    pub fn port(&self) -> &str {
        self.get(APP_PORT)
    }

    /// Listen address in the form `:PORT`.
    pub fn address(&self) -> String {
        format!(":{}", self.port())
    }

    pub fn db_secret_name(&self) -> &str {
        self.get(APP_DB_SECRET_NAME)
    }

    /// `EC2_ID` if set, otherwise the OS hostname, otherwise `"localhost"`.
    ///
    /// Before [`setup`](Self::setup) only the OS hostname is known.
    pub fn hostname(&self) -> String {
        self.env.hostname()
    }
}

impl ConfigSource for AppConfig {
    fn get(&self, name: &str) -> String {
        AppConfig::get(self, name).to_string()
    }

    fn hostname(&self) -> String {
        AppConfig::hostname(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::test_schema;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use types::constants::EC2_ID;
    use types::ConfigError;

    fn env_file(entries: &[(&str, &str)]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for (key, value) in entries {
            writeln!(file, "{}={}", key, value).unwrap();
        }
        file
    }

    fn docker_env<'a>(vars: &[(&'a str, &'a str)]) -> EnvSnapshot {
        EnvSnapshot::from_pairs(vars.iter().copied()).with_hostname("docker")
    }

    #[test]
    fn test_new_empty() {
        let mut conf = AppConfig::new(Vec::<(String, Variable)>::new());
        assert!(conf.is_empty());
        assert!(conf.setup(EnvSnapshot::default(), &[]).is_ok());
        assert_eq!(conf.get("APP_PORT"), "");
    }

    #[test]
    fn test_defaults() {
        let mut conf = AppConfig::new(test_schema());
        conf.setup(docker_env(&[]), &[]).unwrap();

        for name in conf.names() {
            let var = conf.variable(name).unwrap();
            assert_eq!(var.value(), var.default_value(), "{name}");
        }
        assert_eq!(conf.hostname(), "docker");
        assert_eq!(conf.port(), "8080");
        assert_eq!(conf.address(), ":8080");
        assert_eq!(conf.env(), "test");
        assert!(conf.is_debug());
        assert!(!conf.is_dev());
        assert!(conf.is_test());
        assert!(!conf.is_staging());
        assert!(!conf.is_acceptance());
        assert!(!conf.is_production());
        assert_eq!(conf.log_level(), "debug");
        assert_eq!(conf.log_level_enum(), LogLevel::Debug);
        assert_eq!(conf.db_secret_name(), "");
    }

    #[test]
    fn test_lookup_unregistered() {
        let conf = AppConfig::new(test_schema());
        assert_eq!(conf.lookup("Som-var-which-is-not-set"), None);
        assert_eq!(conf.get("Som-var-which-is-not-set"), "");
        assert_eq!(conf.lookup(APP_PORT), Some(""));
    }

    #[test]
    fn test_wrong_env_file() {
        let mut conf = AppConfig::new(test_schema());
        let err = conf
            .setup(EnvSnapshot::default(), &[Path::new("AfileThatDoesNotExists")])
            .unwrap_err();

        assert!(matches!(err, ConfigError::EnvFile { .. }));
        assert!(err.to_string().contains("AfileThatDoesNotExists"));
        assert_eq!(conf.port(), "", "store should stay unresolved");
    }

    #[test]
    fn test_precedence() {
        let file = env_file(&[(APP_PORT, "9090")]);
        let env = docker_env(&[(APP_PORT, "5050")]);

        let mut conf = AppConfig::new(test_schema());
        conf.setup(env.clone(), &[file.path()]).unwrap();
        assert_eq!(conf.port(), "9090");

        conf.setup(env, &[]).unwrap();
        assert_eq!(conf.port(), "5050");

        conf.setup(docker_env(&[]), &[]).unwrap();
        assert_eq!(conf.port(), "8080");
    }

    #[test]
    fn test_later_env_file_wins() {
        let first = env_file(&[(APP_PORT, "9090"), (APP_LOG_LEVEL, "error")]);
        let second = env_file(&[(APP_PORT, "7070")]);

        let mut conf = AppConfig::new(test_schema());
        conf.setup(docker_env(&[]), &[first.path(), second.path()])
            .unwrap();

        assert_eq!(conf.port(), "7070");
        assert_eq!(conf.log_level(), "error");
    }

    #[test]
    fn test_env_file_values_reach_hostname() {
        let file = env_file(&[(EC2_ID, "i-from-file")]);
        let mut conf = AppConfig::new(test_schema());
        conf.setup(docker_env(&[]), &[file.path()]).unwrap();
        assert_eq!(conf.hostname(), "i-from-file");
    }

    struct Case {
        env_file: &'static [(&'static str, &'static str)],
        env_vars: &'static [(&'static str, &'static str)],
        validation_errors: &'static [&'static str],
        strings: &'static [(&'static str, &'static str)],
        debug: Option<bool>,
        log_level: Option<LogLevel>,
    }

    const EMPTY: Case = Case {
        env_file: &[],
        env_vars: &[],
        validation_errors: &[],
        strings: &[],
        debug: None,
        log_level: None,
    };

    fn string_helper(conf: &AppConfig, name: &str) -> String {
        match name {
            "LogLevel" => conf.log_level().to_string(),
            "Hostname" => conf.hostname(),
            "Env" => conf.env().to_string(),
            "Port" => conf.port().to_string(),
            "Address" => conf.address(),
            "DBSecretName" => conf.db_secret_name().to_string(),
            other => panic!("unknown helper {other}"),
        }
    }

    #[test]
    fn test_load_config() {
        let cases: HashMap<&str, Case> = HashMap::from([
            (
                "Default configs",
                Case {
                    strings: &[
                        ("LogLevel", "debug"),
                        ("Hostname", "docker"),
                        ("Env", "test"),
                        ("Port", "8080"),
                        ("Address", ":8080"),
                    ],
                    debug: Some(true),
                    log_level: Some(LogLevel::Debug),
                    ..EMPTY
                },
            ),
            (
                "Debug off",
                Case {
                    env_file: &[(APP_DEBUG, "0")],
                    debug: Some(false),
                    ..EMPTY
                },
            ),
            (
                "APP_PORT and APP_LOG_LEVEL in envfile",
                Case {
                    env_file: &[(APP_PORT, "9090"), (APP_LOG_LEVEL, "error")],
                    strings: &[("LogLevel", "error"), ("Address", ":9090")],
                    log_level: Some(LogLevel::Error),
                    ..EMPTY
                },
            ),
            (
                "APP_PORT and APP_LOG_LEVEL in environment",
                Case {
                    env_vars: &[(APP_PORT, "5050"), (APP_LOG_LEVEL, "warn")],
                    strings: &[("LogLevel", "warn"), ("Address", ":5050")],
                    log_level: Some(LogLevel::Warn),
                    ..EMPTY
                },
            ),
            (
                "APP_PORT and APP_LOG_LEVEL in both envfile and environment",
                Case {
                    env_file: &[(APP_PORT, "9090"), (APP_LOG_LEVEL, "error")],
                    env_vars: &[(APP_PORT, "5050"), (APP_LOG_LEVEL, "warn")],
                    strings: &[("LogLevel", "error"), ("Address", ":9090")],
                    log_level: Some(LogLevel::Error),
                    ..EMPTY
                },
            ),
            (
                "Invalid APP_PORT, not a number",
                Case {
                    env_vars: &[(APP_PORT, "notAportNum")],
                    validation_errors: &["PORT", "must be a valid port number"],
                    ..EMPTY
                },
            ),
            (
                "Invalid APP_PORT, too low",
                Case {
                    env_vars: &[(APP_PORT, "-1")],
                    validation_errors: &["PORT", "must be a valid port number"],
                    ..EMPTY
                },
            ),
            (
                "Invalid APP_PORT, too high",
                Case {
                    env_vars: &[(APP_PORT, "999999")],
                    validation_errors: &["PORT", "Valid port", "must be a valid port number"],
                    ..EMPTY
                },
            ),
            (
                "Invalid APP_ENV",
                Case {
                    env_vars: &[(APP_ENV, "Nasa")],
                    validation_errors: &["Valid environment", "must be a valid value"],
                    ..EMPTY
                },
            ),
            (
                "Invalid APP_LOG_LEVEL",
                Case {
                    env_vars: &[(APP_LOG_LEVEL, "kernel_panic")],
                    validation_errors: &["Valid log level", "must be a valid value"],
                    ..EMPTY
                },
            ),
            (
                "EC2_ID is set",
                Case {
                    env_vars: &[(EC2_ID, "i-asdf12345")],
                    strings: &[("Hostname", "i-asdf12345")],
                    log_level: Some(LogLevel::Debug),
                    ..EMPTY
                },
            ),
            (
                "APP_DB_SECRET_NAME is set",
                Case {
                    env_vars: &[(APP_DB_SECRET_NAME, "super-secret-name")],
                    strings: &[("DBSecretName", "super-secret-name")],
                    ..EMPTY
                },
            ),
        ]);

        for (name, case) in cases {
            let file = env_file(case.env_file);
            let mut conf = AppConfig::new(test_schema());
            let result = conf.setup(docker_env(case.env_vars), &[file.path()]);

            if !case.validation_errors.is_empty() {
                let err = result.expect_err(name).to_string();
                for clue in case.validation_errors {
                    assert!(err.contains(clue), "{name}: {err:?} should contain {clue:?}");
                }
                continue;
            }

            assert!(result.is_ok(), "{name}: {result:?}");
            if let Some(debug) = case.debug {
                assert_eq!(conf.is_debug(), debug, "{name}");
            }
            if let Some(level) = case.log_level {
                assert_eq!(conf.log_level_enum(), level, "{name}");
            }
            for (helper, expected) in case.strings {
                assert_eq!(string_helper(&conf, helper), *expected, "{name}: {helper}");
            }
        }
    }

    #[test]
    fn test_required_rule_on_empty_value() {
        let mut conf = AppConfig::new([(
            "DATABASE_URL",
            Variable::new("").with_rule("Required", crate::Required),
        )]);

        let err = conf.setup(EnvSnapshot::default(), &[]).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("DATABASE_URL"));
        assert!(message.contains("Required"));

        let errors = conf.validation_errors().unwrap();
        assert_eq!(
            errors.failures_for("DATABASE_URL").unwrap().get("Required").unwrap(),
            "cannot be blank"
        );
    }

    #[test]
    fn test_port_scenario() {
        let schema = || [("PORT", Variable::new("8080").with_rule("valid port", crate::Port))];

        let mut conf = AppConfig::new(schema());
        assert!(conf.setup(EnvSnapshot::default(), &[]).is_ok());
        assert_eq!(conf.get("PORT"), "8080");
        assert!(conf.validate().is_ok());

        let mut conf = AppConfig::new(schema());
        let err = conf
            .setup(EnvSnapshot::from_pairs([("PORT", "999999")]), &[])
            .unwrap_err()
            .to_string();
        assert!(err.contains("PORT"));
        assert!(err.contains("valid port"));
    }

    #[test]
    fn test_config_source() {
        let mut conf = AppConfig::new(test_schema());
        conf.setup(docker_env(&[(EC2_ID, "i-123")]), &[]).unwrap();

        let source: &dyn ConfigSource = &conf;
        assert_eq!(source.get(APP_ENV), "test");
        assert_eq!(source.get("UNKNOWN"), "");
        assert_eq!(source.hostname(), "i-123");
    }

    #[test]
    fn test_hostname_before_setup() {
        let conf = AppConfig::new(test_schema());
        let expected = EnvSnapshot::host().hostname();
        assert_eq!(conf.hostname(), expected);
        assert_eq!(AppConfig::empty().hostname(), expected);
    }
}
