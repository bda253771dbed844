//! TOML configuration loading with environment overrides.
//!
//! Separated from struct definitions so that the loading logic (file I/O, env
//! lookup, level parsing) stays independent of the serde schema.

mod env;
mod structs;

pub use env::{parse_bool, parse_number};
pub use structs::{FileConfig, GeneralConfig, RemoteConfig, TerminalConfig};

use crate::encode::{Color, Palette};
use crate::internal;
use crate::level::Level;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// An empty file must still produce a working pipeline: `#[serde(default)]` on
/// every section gives a terminal-only logger at Info.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub terminal: TerminalConfig,
    pub file: FileConfig,
    pub remote: RemoteConfig,
}

impl Config {
    /// Loads the default config file, then applies environment overrides.
    ///
    /// # Errors
    /// Fails if the config directory can't be determined or the file doesn't parse.
    pub fn load() -> Result<Self, crate::Error> {
        let path = Self::default_path()?;
        Self::load_from(&path)
    }

    /// Loads `path` (defaults when it doesn't exist), then applies environment overrides.
    ///
    /// # Errors
    /// I/O errors other than "not found", and TOML syntax errors.
    pub fn load_from(path: &Path) -> Result<Self, crate::Error> {
        let mut config = Self::read_file(path)?;
        config.apply_env();
        Ok(config)
    }

    /// Parses `path` without consulting the environment.
    ///
    /// # Errors
    /// I/O errors other than "not found", and TOML syntax errors.
    pub fn read_file(path: &Path) -> Result<Self, crate::Error> {
        if !path.exists() {
            internal::debug(
                "CONFIG",
                &format!("{} not found, using defaults", path.display()),
            );
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        internal::debug("CONFIG", &format!("Config loaded from {}", path.display()));
        Ok(config)
    }

    /// Parses TOML text.
    ///
    /// # Errors
    /// TOML syntax or type errors.
    pub fn parse(content: &str) -> Result<Self, crate::Error> {
        Ok(toml::from_str(content)?)
    }

    /// `<config_dir>/logship/logship.toml`.
    ///
    /// # Errors
    /// Fails when the platform has no config directory.
    pub fn default_path() -> Result<PathBuf, crate::Error> {
        directories::BaseDirs::new()
            .map(|dirs| dirs.config_dir().join("logship").join("logship.toml"))
            .ok_or(crate::Error::ConfigDirNotFound)
    }

    /// The default threshold.
    ///
    /// # Errors
    /// `Error::InvalidLevel` for an unknown level string.
    pub fn level(&self) -> Result<Level, crate::Error> {
        Ok(self.general.level.parse()?)
    }

    /// Level at which stack traces are attached.
    ///
    /// # Errors
    /// `Error::InvalidLevel` for an unknown level string.
    pub fn stacktrace_level(&self) -> Result<Level, crate::Error> {
        Ok(self.general.stacktrace_level.parse()?)
    }

    /// A sink's own level if set, the general level otherwise.
    ///
    /// # Errors
    /// `Error::InvalidLevel` for an unknown level string.
    pub fn sink_level(&self, sink_level: Option<&str>) -> Result<Level, crate::Error> {
        match sink_level {
            Some(level) => Ok(level.parse()?),
            None => self.level(),
        }
    }

    /// The default palette with the `[terminal.palette]` overrides applied.
    ///
    /// # Errors
    /// `Error::InvalidLevel` for an unknown level key, `Error::InvalidConfig`
    /// for a color that isn't `#RRGGBB`.
    pub fn palette(&self) -> Result<Palette, crate::Error> {
        let mut palette = Palette::default();
        for (level, hex) in &self.terminal.palette {
            let level: Level = level.parse()?;
            let color = Color::from_hex(hex).ok_or_else(|| {
                crate::Error::InvalidConfig(format!(
                    "terminal.palette.{level}: '{hex}' is not #RRGGBB"
                ))
            })?;
            palette = palette.set(level, color);
        }
        Ok(palette)
    }
}
