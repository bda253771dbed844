//! Tab-separated human-readable lines: time, level, caller, message, then the
//! fields as a compact JSON object. A stack trace, when present, follows on its
//! own lines.

use super::Palette;
use crate::internal;
use crate::record::LogRecord;
use chrono::format::{Item, StrftimeItems};
use serde_json::{Map, Value};

pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%:z";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleEncoder {
    /// Piped output and CI logs can't render ANSI escapes.
    colors: bool,
    palette: Palette,
    /// strftime pattern for the time column.
    time_format: String,
}

impl Default for ConsoleEncoder {
    fn default() -> Self {
        Self {
            colors: true,
            palette: Palette::default(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
        }
    }
}

impl ConsoleEncoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn colors(mut self, enabled: bool) -> Self {
        self.colors = enabled;
        self
    }

    #[must_use]
    pub const fn palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// A pattern chrono can't render is reported and the current one kept,
    /// since formatting it later would panic inside the log call.
    #[must_use]
    pub fn time_format(mut self, format: impl Into<String>) -> Self {
        let format = format.into();
        if is_valid_time_format(&format) {
            self.time_format = format;
        } else {
            internal::warn(
                "CONSOLE",
                &format!("Invalid time format '{format}', keeping '{}'", self.time_format),
            );
        }
        self
    }

    #[must_use]
    pub fn time_format_str(&self) -> &str {
        &self.time_format
    }

    #[must_use]
    pub const fn colors_enabled(&self) -> bool {
        self.colors
    }

    #[must_use]
    pub fn encode(&self, record: &LogRecord) -> String {
        let label = format!("{:<5}", record.level.label());
        let level = if self.colors {
            self.palette.paint(record.level, &label)
        } else {
            label
        };

        let mut line = format!("{}\t{level}", record.time.format(&self.time_format));

        if let Some(caller) = &record.caller {
            line.push('\t');
            line.push_str(caller);
        }

        line.push('\t');
        line.push_str(&record.message);

        if !record.fields.is_empty() {
            let fields: Map<String, Value> = record
                .fields
                .iter()
                .map(|f| (f.key.clone(), f.value.clone()))
                .collect();
            line.push('\t');
            line.push_str(&Value::Object(fields).to_string());
        }

        if let Some(trace) = &record.stacktrace {
            line.push('\n');
            line.push_str(trace.trim_end());
        }

        line
    }
}

/// True when every strftime item in `format` is one chrono understands.
#[must_use]
pub fn is_valid_time_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;

    #[test]
    fn plain_line_has_level_caller_message_and_fields() {
        let record = LogRecord::new(Level::Warn, "disk almost full")
            .field("free_mb", 12)
            .field("mount", "/var");
        let mut record = record;
        record.caller = Some("src/main.rs:7".to_string());

        let line = ConsoleEncoder::new().colors(false).encode(&record);
        let cols: Vec<&str> = line.split('\t').collect();

        assert_eq!(cols[1], "WARN ");
        assert_eq!(cols[2], "src/main.rs:7");
        assert_eq!(cols[3], "disk almost full");
        assert_eq!(cols[4], r#"{"free_mb":12,"mount":"/var"}"#);
    }

    #[test]
    fn colored_level_is_wrapped_in_escape_codes() {
        let record = LogRecord::new(Level::Error, "boom");
        let line = ConsoleEncoder::new().encode(&record);
        assert!(line.contains("\x1b[38;2;"));
        assert!(line.contains("ERROR\x1b[0m"));
    }

    #[test]
    fn invalid_time_format_falls_back_instead_of_panicking() {
        let encoder = ConsoleEncoder::new().time_format("%Q");
        assert_eq!(encoder.time_format_str(), DEFAULT_TIME_FORMAT);

        let line = encoder
            .colors(false)
            .encode(&LogRecord::new(Level::Info, "still logged"));
        assert!(line.ends_with("still logged"));
    }

    #[test]
    fn valid_time_format_is_used() {
        assert!(is_valid_time_format("%H:%M"));
        assert!(!is_valid_time_format("%H:%"));

        let line = ConsoleEncoder::new()
            .colors(false)
            .time_format("%Y")
            .encode(&LogRecord::new(Level::Info, "m"));
        let year = line.split('\t').next().unwrap();
        assert_eq!(year.len(), 4);
        assert!(year.bytes().all(|b| b.is_ascii_digit()));
    }

    #[test]
    fn stacktrace_follows_on_next_line() {
        let mut record = LogRecord::new(Level::Error, "boom");
        record.stacktrace = Some("frame 0\nframe 1\n".to_string());
        let line = ConsoleEncoder::new().colors(false).encode(&record);
        assert!(line.ends_with("boom\nframe 0\nframe 1"));
    }
}
