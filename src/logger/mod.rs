//! The logger builds one record per call (time, caller, optional stack trace) and
//! hands it to the multiplexer. Sink-specific setup lives in the builder so the
//! logger itself only knows about routing.

mod builder;
mod from_config;

pub use builder::{FileBuilder, LoggerBuilder, TerminalBuilder};

use crate::internal;
use crate::level::Level;
use crate::record::{Field, LogRecord};
use crate::sink::Multiplexer;
use std::panic::Location;

/// Immutable after build; every method takes `&self`, so one logger can be
/// shared across threads behind an `Arc`.
pub struct Logger {
    mux: Multiplexer,
    /// Records below this reach no sink and are not built at all.
    gate: Level,
    stacktrace_level: Level,
}

impl Default for Logger {
    /// A single colored terminal sink at Info.
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Logger {
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub(crate) fn from_parts(mux: Multiplexer, stacktrace_level: Level) -> Self {
        Self {
            gate: mux.min_threshold(),
            mux,
            stacktrace_level,
        }
    }

    /// Core dispatch. Returns how many sinks received the record.
    #[track_caller]
    pub fn log(&self, level: Level, msg: &str, fields: Vec<Field>) -> usize {
        if level < self.gate {
            return 0;
        }
        let mut record = LogRecord::new(level, msg)
            .fields(fields)
            .caller(Location::caller());
        if level >= self.stacktrace_level {
            record = record.with_stacktrace();
        }
        self.route(&record)
    }

    /// Sends an already-built record through the sinks, bypassing record construction.
    pub fn route(&self, record: &LogRecord) -> usize {
        self.mux.route(record)
    }

    #[track_caller]
    pub fn debug(&self, msg: &str) {
        self.log(Level::Debug, msg, Vec::new());
    }

    #[track_caller]
    pub fn info(&self, msg: &str) {
        self.log(Level::Info, msg, Vec::new());
    }

    #[track_caller]
    pub fn warn(&self, msg: &str) {
        self.log(Level::Warn, msg, Vec::new());
    }

    #[track_caller]
    pub fn error(&self, msg: &str) {
        self.log(Level::Error, msg, Vec::new());
    }

    /// Logs, closes every sink so buffered remote entries are shipped, then
    /// exits the process with status 1.
    #[track_caller]
    pub fn fatal(&self, msg: &str) -> ! {
        self.fatal_with(msg, Vec::new())
    }

    #[track_caller]
    pub fn debug_with(&self, msg: &str, fields: Vec<Field>) {
        self.log(Level::Debug, msg, fields);
    }

    #[track_caller]
    pub fn info_with(&self, msg: &str, fields: Vec<Field>) {
        self.log(Level::Info, msg, fields);
    }

    #[track_caller]
    pub fn warn_with(&self, msg: &str, fields: Vec<Field>) {
        self.log(Level::Warn, msg, fields);
    }

    #[track_caller]
    pub fn error_with(&self, msg: &str, fields: Vec<Field>) {
        self.log(Level::Error, msg, fields);
    }

    #[track_caller]
    pub fn fatal_with(&self, msg: &str, fields: Vec<Field>) -> ! {
        self.log(Level::Fatal, msg, fields);
        // Each failing sink was already named by the multiplexer.
        if let Err(e) = self.close() {
            internal::error("LOGGER", &format!("Exiting with unflushed sinks: {e}"));
        }
        std::process::exit(1);
    }

    /// Pushes out anything sinks have buffered.
    ///
    /// # Errors
    /// Returns the first error across sinks; the others are still flushed.
    pub fn flush(&self) -> Result<(), crate::Error> {
        self.mux.flush()
    }

    /// Final flush of every sink. Remote sinks stop their flush worker and
    /// reject later records. Also runs on drop.
    ///
    /// # Errors
    /// Returns the first error across sinks; the others are still closed.
    pub fn close(&self) -> Result<(), crate::Error> {
        self.mux.close()
    }

    /// Lowest level any sink accepts.
    #[must_use]
    pub const fn min_level(&self) -> Level {
        self.gate
    }

    #[must_use]
    pub const fn stacktrace_level(&self) -> Level {
        self.stacktrace_level
    }

    #[must_use]
    pub fn sink_count(&self) -> usize {
        self.mux.len()
    }

    #[must_use]
    pub fn sink_names(&self) -> Vec<&str> {
        self.mux.names()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        let _ = self.mux.close();
    }
}
