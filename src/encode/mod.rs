//! Record encodings. The terminal gets a human-readable line; file and remote
//! sinks get the same structured field set in two shapes (a JSON line, or
//! stringified key/value contents for the wire).

mod color;
mod console;
mod structured;

pub use color::{Color, Palette};
pub use console::{ConsoleEncoder, DEFAULT_TIME_FORMAT, is_valid_time_format};
pub use structured::{
    CALLER_KEY, LEVEL_KEY, MESSAGE_KEY, STACKTRACE_KEY, TIME_KEY, contents, json_line, structured,
};

use crate::record::LogRecord;

/// Which of the two encodings a sink uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoder {
    /// Human-readable, optionally colored.
    Console(ConsoleEncoder),
    /// One JSON object per record.
    Json,
}

impl Encoder {
    /// Renders one line, without the trailing newline.
    ///
    /// # Errors
    /// Returns `Error::Format` if JSON serialization fails.
    pub fn encode(&self, record: &LogRecord) -> Result<String, crate::Error> {
        match self {
            Self::Console(console) => Ok(console.encode(record)),
            Self::Json => json_line(record),
        }
    }

    #[must_use]
    pub const fn is_structured(&self) -> bool {
        matches!(self, Self::Json)
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::Console(ConsoleEncoder::default())
    }
}
