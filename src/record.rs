//! The immutable record built once per log call and read by every sink it reaches.

use crate::level::Level;
use chrono::{DateTime, Local};
use serde_json::Value;
use std::backtrace::Backtrace;
use std::panic::Location;

/// One structured key/value pair attached to a record.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: String,
    pub value: Value,
}

impl Field {
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Carries everything a sink needs to encode one log line.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level: Level,
    pub message: String,
    pub fields: Vec<Field>,
    pub time: DateTime<Local>,
    /// `file:line` of the log call, when known.
    pub caller: Option<String>,
    /// Captured for records at or above the logger's stack-trace level.
    pub stacktrace: Option<String>,
}

impl LogRecord {
    /// Stamps the current time; no caller, no stack trace.
    #[must_use]
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            fields: Vec::new(),
            time: Local::now(),
            caller: None,
            stacktrace: None,
        }
    }

    #[must_use]
    pub fn fields(mut self, fields: Vec<Field>) -> Self {
        self.fields = fields;
        self
    }

    #[must_use]
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push(Field::new(key, value));
        self
    }

    #[must_use]
    pub fn caller(mut self, location: &Location<'_>) -> Self {
        self.caller = Some(format!("{}:{}", location.file(), location.line()));
        self
    }

    /// Forces capture regardless of `RUST_BACKTRACE`.
    #[must_use]
    pub fn with_stacktrace(mut self) -> Self {
        self.stacktrace = Some(Backtrace::force_capture().to_string());
        self
    }
}
