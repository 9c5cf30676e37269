//! Human readable renderings of the configuration schema

use crate::loader::AppConfig;
use comfy_table::{presets, Cell, CellAlignment, ContentArrangement, Table};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use types::{ConfigError, Result};

const SAMPLE_HEADER: &str = "# Automatically created by the application from the config object\n\n";

impl AppConfig {
    /// Render every variable as a table of name, description, constraints and default.
    pub fn dump_table(&self) -> String {
        let mut table = Table::new();
        table
            .load_preset(presets::ASCII_FULL)
            .set_content_arrangement(ContentArrangement::Disabled)
            .set_header(
                ["Variable Name", "Description", "Constraints", "Default Value"]
                    .into_iter()
                    .map(|h| Cell::new(h).set_alignment(CellAlignment::Left)),
            );

        for (name, var) in self.variables() {
            table.add_row(vec![
                name.to_string(),
                var.description().to_string(),
                var.constraints(),
                var.default_value().to_string(),
            ]);
        }

        table.to_string()
    }

    /// Contents of the `.env.sample` file written by [`create_sample_file`](Self::create_sample_file).
    pub fn sample_contents(&self) -> String {
        let mut contents = String::from(SAMPLE_HEADER);
        for (name, var) in self.variables() {
            contents.push_str(&format!(
                "# Description: {} # Constraints: {}\n",
                var.description(),
                var.constraints()
            ));
            contents.push_str(&format!("{}={}\n\n", name, sample_value(var.default_value())));
        }
        contents
    }

    /// Write a documented sample env file, overwriting any existing file.
    pub fn create_sample_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let sample_file_error = |source| ConfigError::SampleFile {
            path: path.display().to_string(),
            source,
        };

        let file = File::create(path).map_err(sample_file_error)?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(self.sample_contents().as_bytes())
            .map_err(sample_file_error)?;
        writer.flush().map_err(sample_file_error)?;

        tracing::debug!(path = %path.display(), variables = self.len(), "Sample file created");
        Ok(())
    }
}

/// Quote a default so it reads back verbatim from an env file.
///
/// Single quotes keep everything literal but cannot hold a `'` or span lines,
/// so those values are double-quoted with `\`, `"`, `$` and newlines escaped.
fn sample_value(value: &str) -> String {
    if value.chars().any(|c| c == '\'' || c.is_control()) {
        let mut quoted = String::with_capacity(value.len() + 2);
        quoted.push('"');
        for c in value.chars() {
            match c {
                '\\' | '"' | '$' => {
                    quoted.push('\\');
                    quoted.push(c);
                }
                '\n' => quoted.push_str("\\n"),
                _ => quoted.push(c),
            }
        }
        quoted.push('"');
        return quoted;
    }

    let needs_quotes = value
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '#' | '"' | '\\' | '$'));
    if needs_quotes {
        format!("'{}'", value)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::test_schema;
    use crate::variable::Variable;
    use tempfile::{tempdir, NamedTempFile};
    use types::EnvSnapshot;

    #[test]
    fn test_dump_table() {
        let conf = AppConfig::new(test_schema());
        let table = conf.dump_table();

        assert!(table.contains("Variable Name"));
        assert!(table.contains("The Database's secret's name in AWS SecretsManager"));
        assert!(table.contains("TCP/IP Port where the application listens"));
        assert!(table.contains("Required, Valid port"));

        let debug = table.find("APP_DEBUG").unwrap();
        let port = table.find("APP_PORT").unwrap();
        assert!(debug < port, "rows should be sorted by name");
    }

    #[test]
    fn test_create_sample_file() {
        let conf = AppConfig::new(test_schema());
        let dir = tempdir().unwrap();
        let path = dir.path().join(".env.sample");

        conf.create_sample_file(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        for clue in [
            "# Automatically created by the application from the config object",
            "# Description: Level of logging # Constraints: Required, Valid log level\nAPP_LOG_LEVEL=debug\n",
            "# Description: Log development mode (Text formatter instead of JSON) # Constraints: Truthy value",
            "APP_DB_SECRET_NAME=\n",
        ] {
            assert!(content.contains(clue), "sample file should contain: {clue}");
        }
    }

    #[test]
    fn test_create_sample_file_overwrites() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "STALE=1\n".repeat(100)).unwrap();

        let conf = AppConfig::new([("ONLY", Variable::new("x"))]);
        conf.create_sample_file(file.path()).unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        assert!(!content.contains("STALE"));
        assert!(content.ends_with("ONLY=x\n\n"));
    }

    #[test]
    fn test_create_sample_file_in_missing_directory() {
        let dir = tempdir().unwrap();
        let conf = AppConfig::new(test_schema());
        let err = conf
            .create_sample_file(dir.path().join("missing").join(".env.sample"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::SampleFile { .. }));
    }

    #[test]
    fn test_sample_value_quoting() {
        assert_eq!(sample_value("8080"), "8080");
        assert_eq!(sample_value("two words"), "'two words'");
        assert_eq!(sample_value("it's"), r#""it's""#);
        assert_eq!(sample_value("don't $HOME"), r#""don't \$HOME""#);
        assert_eq!(sample_value("a\nb"), r#""a\nb""#);
    }

    #[test]
    fn test_sample_file_reads_back_as_defaults() {
        let schema = || {
            let mut schema = test_schema();
            schema.insert("GREETING".to_string(), Variable::new("hello world # not a comment"));
            schema.insert("APOSTROPHE".to_string(), Variable::new("it's"));
            schema.insert("MOTTO".to_string(), Variable::new("don't # stop"));
            schema.insert("PRICE".to_string(), Variable::new("costs $5 \"net\" C:\\tmp"));
            schema.insert("BANNER".to_string(), Variable::new("line1\nline2"));
            schema
        };
        let dir = tempdir().unwrap();
        let path = dir.path().join(".env.sample");
        AppConfig::new(schema()).create_sample_file(&path).unwrap();

        let mut conf = AppConfig::new(schema());
        conf.setup(EnvSnapshot::default(), &[path.as_path()]).unwrap();

        let defaults = AppConfig::new(schema());
        for name in defaults.names() {
            let expected = defaults.variable(name).unwrap().default_value();
            assert_eq!(conf.get(name), expected, "{name}");
        }
    }
}
