//! Logger construction from a loaded [`Config`].

use super::{Logger, LoggerBuilder};
use crate::config::Config;
use crate::internal;
use crate::level::Level;
use crate::sink::{FileSink, RemoteSink, Rotation};
use std::time::Duration;

const MB: u64 = 1024 * 1024;
const DAY: u64 = 24 * 60 * 60;

impl Logger {
    /// Loads the default config file (plus environment overrides) and builds from it.
    ///
    /// # Errors
    /// Config loading errors and sink construction errors, see [`from_config_with`](Self::from_config_with).
    pub fn from_config() -> Result<Self, crate::Error> {
        internal::debug("LOGGER", "Building logger from config");
        let config = Config::load()?;
        Self::from_config_with(&config)
    }

    /// Builds every enabled sink. The file is opened and the remote service
    /// checked here, so a misconfigured sink fails now rather than on the first
    /// record.
    ///
    /// # Errors
    /// `InvalidLevel` for bad level strings, `InvalidConfig` for a bad palette
    /// color, `Io` when the log file can't be created, and the remote sink's
    /// construction errors.
    pub fn from_config_with(config: &Config) -> Result<Self, crate::Error> {
        let level = config.level()?;
        internal::debug("LOGGER", &format!("Log level: {level}"));

        let mut builder = LoggerBuilder::new()
            .level(level)
            .stacktrace_level(config.stacktrace_level()?);
        let mut enabled: Vec<&str> = Vec::new();

        if config.terminal.enabled {
            builder = Self::configure_terminal(builder, config)?;
            enabled.push("terminal");
        }

        if config.file.enabled {
            builder = builder.sink(Self::open_file(config)?);
            enabled.push("file");
        }

        if config.remote.enabled {
            let threshold = config.sink_level(config.remote.level.as_deref())?;
            builder = builder.sink(RemoteSink::connect(&config.remote, threshold)?);
            enabled.push("remote");
        }

        if enabled.is_empty() {
            internal::warn("LOGGER", "No sinks enabled, using terminal");
        } else {
            internal::debug("LOGGER", &format!("Sinks enabled: [{}]", enabled.join(", ")));
        }

        Ok(builder.build())
    }

    fn configure_terminal(
        builder: LoggerBuilder,
        config: &Config,
    ) -> Result<LoggerBuilder, crate::Error> {
        let threshold = config.sink_level(config.terminal.level.as_deref())?;
        internal::debug(
            "TERMINAL",
            &format!(
                "Colors: {}, level: {threshold}",
                if config.terminal.colors {
                    "enabled"
                } else {
                    "disabled"
                }
            ),
        );
        Ok(builder
            .terminal()
            .level(threshold)
            .colors(config.terminal.colors)
            .palette(config.palette()?)
            .done())
    }

    fn open_file(config: &Config) -> Result<FileSink, crate::Error> {
        let file = &config.file;
        let threshold: Level = config.sink_level(file.level.as_deref())?;
        let sink = FileSink::new(&file.path).level(threshold).rotation(Rotation {
            max_size: file.max_size_mb.saturating_mul(MB),
            max_backups: file.max_backups,
            max_age: Duration::from_secs(file.max_age_days.saturating_mul(DAY)),
            compress: file.compress,
        });
        sink.open()?;
        internal::debug("FILE", &format!("Writing to {}", sink.path().display()));
        Ok(sink)
    }
}
