//! Snapshot of the process environment
//!
//! The process environment is read exactly once, by [`EnvSnapshot::capture`].
//! Everything else receives the snapshot as a parameter, so resolution and
//! logger construction never depend on ambient state.

use crate::constants::EC2_ID;
use crate::error::{ConfigError, Result};
use std::collections::HashMap;
use std::path::Path;

/// Environment variables and the OS hostname, captured at a single point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
    os_hostname: Option<String>,
}

impl EnvSnapshot {
    /// Capture the current process environment and OS hostname.
    ///
    /// Variables whose name or value is not valid unicode are skipped.
    pub fn capture() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect();

        Self {
            vars,
            os_hostname: read_os_hostname(),
        }
    }

    /// An empty snapshot that only knows the OS hostname.
    pub fn host() -> Self {
        Self {
            vars: HashMap::new(),
            os_hostname: read_os_hostname(),
        }
    }

    /// Build a snapshot from explicit pairs, without an OS hostname.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
            os_hostname: None,
        }
    }

    /// Replace the OS hostname recorded in the snapshot.
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.os_hostname = Some(hostname.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Like [`get`](Self::get), but treats an empty value as unset.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.vars.remove(key)
    }

    /// Overlay another snapshot; its variables win over the ones already here.
    ///
    /// The OS hostname is replaced only when `other` carries one.
    pub fn merge(&mut self, other: EnvSnapshot) {
        self.vars.extend(other.vars);
        if other.os_hostname.is_some() {
            self.os_hostname = other.os_hostname;
        }
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Load a `.env` style file on top of the snapshot.
    ///
    /// Keys present in the file overwrite the ones already in the snapshot.
    /// Nothing is applied when the file cannot be read or a line fails to parse.
    /// Returns the number of entries read from the file.
    pub fn overlay_file(&mut self, path: &Path) -> Result<usize> {
        let env_file_error = |source| ConfigError::EnvFile {
            path: path.display().to_string(),
            source,
        };

        // `${VAR}` references are expanded by dotenvy from earlier lines of
        // the same file or, failing that, from the live process environment.
        let entries = dotenvy::from_path_iter(path)
            .map_err(env_file_error)?
            .collect::<std::result::Result<Vec<(String, String)>, _>>()
            .map_err(env_file_error)?;

        let count = entries.len();
        self.vars.extend(entries);
        Ok(count)
    }

    /// Hostname as reported by the operating system when the snapshot was taken.
    pub fn os_hostname(&self) -> Option<&str> {
        self.os_hostname.as_deref()
    }

    /// Hostname of the machine where the application runs.
    ///
    /// `EC2_ID` wins when set, then the OS hostname, then `"localhost"`.
    pub fn hostname(&self) -> String {
        self.get_non_empty(EC2_ID)
            .or_else(|| self.os_hostname().filter(|name| !name.is_empty()))
            .unwrap_or("localhost")
            .to_string()
    }
}

fn read_os_hostname() -> Option<String> {
    gethostname::gethostname()
        .into_string()
        .ok()
        .filter(|name| !name.is_empty())
}
