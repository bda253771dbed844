//! Fan-out of one record to every sink whose threshold admits it.

use super::{Sink, TerminalSink};
use crate::internal;
use crate::level::Level;
use crate::record::LogRecord;

/// Owns the sinks of one logger. Never empty: constructing it without sinks
/// installs a default [`TerminalSink`], so records always have somewhere to go.
pub struct Multiplexer {
    sinks: Vec<Box<dyn Sink>>,
}

impl Default for Multiplexer {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Multiplexer {
    #[must_use]
    pub fn new(mut sinks: Vec<Box<dyn Sink>>) -> Self {
        if sinks.is_empty() {
            internal::debug("MUX", "No sinks configured, falling back to terminal");
            sinks.push(Box::new(TerminalSink::new()));
        }
        Self { sinks }
    }

    /// Writes `record` to each sink that accepts its level and returns how many
    /// did. A failing sink is reported and skipped; the others still get the record.
    pub fn route(&self, record: &LogRecord) -> usize {
        let mut delivered = 0;
        for sink in &self.sinks {
            if !sink.enabled(record.level) {
                continue;
            }
            match sink.write(record) {
                Ok(()) => delivered += 1,
                Err(e) => internal::warn("MUX", &format!("{} sink write failed: {e}", sink.name())),
            }
        }
        delivered
    }

    /// Lowest threshold across sinks; records below it reach nobody.
    #[must_use]
    pub fn min_threshold(&self) -> Level {
        self.sinks
            .iter()
            .map(|s| s.threshold())
            .min()
            .unwrap_or_default()
    }

    /// Flushes every sink, continuing past failures.
    ///
    /// # Errors
    /// Returns the first error encountered.
    pub fn flush(&self) -> Result<(), crate::Error> {
        self.each(|s| s.flush(), "flush")
    }

    /// Closes every sink, continuing past failures.
    ///
    /// # Errors
    /// Returns the first error encountered.
    pub fn close(&self) -> Result<(), crate::Error> {
        self.each(|s| s.close(), "close")
    }

    fn each<F>(&self, op: F, what: &str) -> Result<(), crate::Error>
    where
        F: Fn(&dyn Sink) -> Result<(), crate::Error>,
    {
        let mut first = None;
        for sink in &self.sinks {
            if let Err(e) = op(sink.as_ref()) {
                internal::warn("MUX", &format!("{} sink {what} failed: {e}", sink.name()));
                first.get_or_insert(e);
            }
        }
        first.map_or(Ok(()), Err)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Always false; kept for the `len`/`is_empty` pair.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.sinks.iter().map(|s| s.name()).collect()
    }
}
