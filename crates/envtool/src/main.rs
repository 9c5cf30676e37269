//! envtool - inspect, document and check the standard service configuration

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use config::{basic_schema, AppConfig};
use logger::Logger;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use types::{ConfigError, EnvSnapshot};

#[derive(Parser, Debug)]
#[command(name = "envtool", version, about = "Inspect and document service configuration")]
struct Cli {
    /// Format of envtool's own diagnostics
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Print every variable with its description, constraints and default value
    Table,
    /// Write a documented sample env file
    Sample {
        #[arg(default_value = ".env.sample")]
        path: PathBuf,
    },
    /// Resolve the configuration from the environment and env files, then validate it
    Check {
        /// Env file applied on top of the environment; may be repeated, later files win
        #[arg(long = "env-file", value_name = "PATH")]
        env_files: Vec<PathBuf>,
        /// Service name reported in the summary log entry
        #[arg(long, default_value = "envtool")]
        service: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Json,
    Pretty,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let env = EnvSnapshot::capture();

    init_logging(cli.log_format, &env)?;
    debug!(variables = env.len(), "Environment captured");

    let output = run(cli.command, env)?;
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}

/// Initialize envtool's own diagnostics from `RUST_LOG` in the snapshot
fn init_logging(format: LogFormat, env: &EnvSnapshot) -> Result<()> {
    let directives = env.get("RUST_LOG").unwrap_or("warn");
    let env_filter = tracing_subscriber::EnvFilter::try_new(directives)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init()
            .context("Failed to initialize pretty logging")?,
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .context("Failed to initialize JSON logging")?,
    }

    Ok(())
}

/// Execute a command, returning what should be printed to stdout
fn run(command: Command, env: EnvSnapshot) -> Result<String> {
    match command {
        Command::Table => Ok(AppConfig::new(basic_schema()).dump_table()),
        Command::Sample { path } => {
            AppConfig::new(basic_schema())
                .create_sample_file(&path)
                .context("Failed to create sample file")?;
            info!(path = %path.display(), "Sample file written");
            Ok(format!("Sample file written to {}", path.display()))
        }
        Command::Check { env_files, service } => check(&env_files, &service, env),
    }
}

fn check(env_files: &[PathBuf], service: &str, env: EnvSnapshot) -> Result<String> {
    let files: Vec<&Path> = env_files.iter().map(PathBuf::as_path).collect();
    let mut conf = AppConfig::new(basic_schema());

    match conf.setup(env, &files) {
        Ok(()) => {}
        Err(ConfigError::Validation(errors)) => {
            let mut report = format!("{} invalid variable(s):", errors.len());
            for (variable, rules) in errors.iter() {
                for (rule, message) in rules {
                    report.push_str(&format!("\n  {}: {} {}", variable, rule, message));
                }
            }
            anyhow::bail!(report);
        }
        Err(err) => return Err(err).context("Failed to load configuration"),
    }

    let log = Logger::from_configuration(service, env!("CARGO_PKG_VERSION"), &conf).component("envtool");
    log.with_field("address", conf.address())
        .with_field("debug", conf.is_debug())
        .info("Configuration is valid");

    Ok(String::new())
}
