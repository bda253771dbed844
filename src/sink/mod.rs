//! Log destinations. Each sink owns its threshold, its encoding, and its
//! transport; the [`Multiplexer`] decides which sinks see which records.
//!
//! The built-in sinks (terminal, rotating file, remote shipper) can't cover every
//! use case; implementing [`Sink`] adds a custom one.

mod file;
mod mux;
mod remote;
mod terminal;

pub use file::{FileSink, Rotation};
pub use mux::Multiplexer;
pub use remote::RemoteSink;
pub use terminal::{Stream, TerminalSink};

use crate::level::Level;
use crate::record::LogRecord;

/// `Send + Sync` so one logger can be shared across producer threads.
pub trait Sink: Send + Sync {
    /// Short identifier used in diagnostics ("terminal", "file", "remote").
    fn name(&self) -> &str;

    /// Lowest level this sink accepts.
    fn threshold(&self) -> Level;

    /// True when a record at `level` should be written here.
    fn enabled(&self, level: Level) -> bool {
        level >= self.threshold()
    }

    /// Encodes and writes one record.
    ///
    /// # Errors
    /// I/O or encoding failures, or `Error::ShipperClosed` for a closed remote sink.
    fn write(&self, record: &LogRecord) -> Result<(), crate::Error>;

    /// Pushes out anything buffered.
    ///
    /// # Errors
    /// I/O errors from the underlying transport.
    fn flush(&self) -> Result<(), crate::Error>;

    /// Final flush and release. Writes after close may fail.
    ///
    /// # Errors
    /// I/O errors from the final flush.
    fn close(&self) -> Result<(), crate::Error> {
        self.flush()
    }
}
