//! Command-line front end: ships messages given as arguments, or each line of
//! stdin, through a pipeline built from the config file.

use crate::config::Config;
use crate::internal;
use crate::level::Level;
use crate::logger::Logger;
use crate::record::Field;
use clap::Parser;
use serde_json::Value;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;

/// Log level for CLI arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Fatal,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => Self::Debug,
            LogLevel::Info => Self::Info,
            LogLevel::Warn => Self::Warn,
            LogLevel::Error => Self::Error,
            LogLevel::Fatal => Self::Fatal,
        }
    }
}

/// logship - ship log lines to the configured sinks.
#[derive(Debug, Parser)]
#[command(name = "logship", version, about = "Ship log lines to the configured sinks")]
pub struct Cli {
    /// Config file (default: <config dir>/logship/logship.toml)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Level of the logged messages
    #[arg(short, long, value_enum, default_value_t = LogLevel::Info)]
    pub level: LogLevel,

    /// Structured field, repeatable; values that parse as JSON keep their type
    #[arg(short = 'f', long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
    pub fields: Vec<Field>,

    /// Diagnostics from logship itself at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Message; read line by line from stdin when omitted
    pub message: Vec<String>,
}

/// `key=value`; the value is JSON when it parses as JSON, a string otherwise.
///
/// # Errors
/// Missing `=` or an empty key.
pub fn parse_field(s: &str) -> Result<Field, String> {
    let (key, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    let value = serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::from(raw));
    Ok(Field::new(key, value))
}

/// Builds the pipeline, logs, and closes it so remote buffers are shipped.
#[must_use]
pub fn run(cli: Cli) -> ExitCode {
    if cli.verbose {
        internal::set_level(Level::Debug);
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let logger = match config.and_then(|c| Logger::from_config_with(&c)) {
        Ok(logger) => logger,
        Err(e) => {
            internal::error("CLI", &format!("{e}"));
            return ExitCode::FAILURE;
        }
    };

    let level = Level::from(cli.level);
    let mut status = ExitCode::SUCCESS;

    if cli.message.is_empty() {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) if line.trim().is_empty() => {}
                Ok(line) => emit(&logger, level, &line, &cli.fields),
                Err(e) => {
                    internal::error("CLI", &format!("Reading stdin: {e}"));
                    status = ExitCode::FAILURE;
                    break;
                }
            }
        }
    } else {
        emit(&logger, level, &cli.message.join(" "), &cli.fields);
    }

    if let Err(e) = logger.close() {
        internal::error("CLI", &format!("Closing sinks: {e}"));
        status = ExitCode::FAILURE;
    }
    status
}

// Fatal would exit on the first line; the CLI logs it like any other level and
// lets `run` close the pipeline.
fn emit(logger: &Logger, level: Level, msg: &str, fields: &[Field]) {
    logger.log(level, msg, fields.to_vec());
}
