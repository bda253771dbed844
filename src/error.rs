//! Unified error type for all logship operations.

use crate::level::ParseLevelError;
use crate::shipper::TransportError;

/// Error type for logship operations.
///
/// Construction-time variants (`ConfigParse`, `InvalidLevel`, `MissingField`,
/// `InvalidConfig`, `Unreachable`) stop startup. `ShipperClosed` is returned for
/// every append after a remote sink has been closed.
#[derive(Debug)]
pub enum Error {
    /// I/O error.
    Io(std::io::Error),
    /// TOML config parsing error.
    ConfigParse(toml::de::Error),
    /// Config directory not found.
    ConfigDirNotFound,
    /// Invalid severity string.
    InvalidLevel(String),
    /// A mandatory remote sink field is empty.
    MissingField(&'static str),
    /// A config value is out of range.
    InvalidConfig(String),
    /// The remote log service failed the reachability check.
    Unreachable(String),
    /// Transport failure surfaced outside the best-effort transmit path.
    Transport(TransportError),
    /// Format/serialization error.
    Format(String),
    /// Append or flush after the shipper was closed.
    ShipperClosed,
}

impl Error {
    /// True for errors that belong to sink construction.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(
            self,
            Self::ConfigParse(_)
                | Self::InvalidLevel(_)
                | Self::MissingField(_)
                | Self::InvalidConfig(_)
                | Self::Unreachable(_)
        )
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::ConfigParse(e) => write!(f, "parse error: {e}"),
            Self::ConfigDirNotFound => write!(f, "config directory not found"),
            Self::InvalidLevel(level) => write!(f, "invalid log level: {level}"),
            Self::MissingField(field) => write!(f, "remote sink: {field} is required"),
            Self::InvalidConfig(s) => write!(f, "invalid config: {s}"),
            Self::Unreachable(s) => write!(f, "failed to connect to log service: {s}"),
            Self::Transport(e) => write!(f, "transport error: {e}"),
            Self::Format(s) => write!(f, "format error: {s}"),
            Self::ShipperClosed => write!(f, "shipper closed"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::ConfigParse(e) => Some(e),
            Self::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Self::ConfigParse(e)
    }
}

impl From<ParseLevelError> for Error {
    fn from(e: ParseLevelError) -> Self {
        Self::InvalidLevel(e.input().to_string())
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}
