//! Batched delivery of log entries to a remote log service.
//!
//! ```text
//!  producers ──append──▶ BatchBuffer ──(size threshold)──▶ Transmitter ──▶ LogTransport
//!                            ▲                                 ▲
//!                            └──── FlushTrigger (tick, stop) ──┘
//! ```
//!
//! The buffer lock is held only to append or drain; transmission always runs on
//! a batch that was already taken out of the buffer.

mod buffer;
mod transmit;
mod transport;
mod trigger;

pub use buffer::BatchBuffer;
pub use transmit::{DEFAULT_CHUNK_SIZE, TransmitReport, Transmitter, chunk, unix_seconds};
pub use transport::{
    HttpTarget, HttpTransport, LogContent, LogEntry, LogGroup, LogTransport, TransportError,
};
pub use trigger::TriggerState;

use crate::Error;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use trigger::FlushTrigger;

/// Tunables for one shipper.
#[derive(Debug, Clone)]
pub struct ShipperOptions {
    /// Buffered entries that force a synchronous flush inside `append`.
    pub batch_size: usize,
    /// Period of the background flush.
    pub flush_interval: Duration,
    /// Entries per remote call.
    pub chunk_size: usize,
    pub topic: String,
    pub source: String,
}

impl Default for ShipperOptions {
    fn default() -> Self {
        Self {
            batch_size: 100,
            flush_interval: Duration::from_secs(5),
            chunk_size: DEFAULT_CHUNK_SIZE,
            topic: "app-log".to_string(),
            source: "localhost".to_string(),
        }
    }
}

/// Cumulative counters since the shipper started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShipperStats {
    /// Non-empty drains, whatever triggered them.
    pub flushes: u64,
    /// Remote calls attempted.
    pub calls: u64,
    pub entries_sent: u64,
    pub entries_dropped: u64,
}

#[derive(Default)]
struct Counters {
    flushes: AtomicU64,
    calls: AtomicU64,
    entries_sent: AtomicU64,
    entries_dropped: AtomicU64,
}

/// State shared by producers and the flush worker.
pub(crate) struct Core {
    buffer: BatchBuffer,
    transmitter: Transmitter,
    counters: Counters,
}

impl Core {
    fn transmit(&self, batch: Vec<LogEntry>) -> TransmitReport {
        if batch.is_empty() {
            return TransmitReport::default();
        }
        let report = self.transmitter.send(batch);
        let c = &self.counters;
        c.flushes.fetch_add(1, Ordering::Relaxed);
        c.calls.fetch_add(report.calls() as u64, Ordering::Relaxed);
        c.entries_sent
            .fetch_add(report.entries_sent as u64, Ordering::Relaxed);
        c.entries_dropped
            .fetch_add(report.entries_dropped as u64, Ordering::Relaxed);
        report
    }

    pub(crate) fn flush(&self) -> TransmitReport {
        self.transmit(self.buffer.drain())
    }

    /// Closes the buffer and ships whatever was left in it.
    pub(crate) fn shutdown(&self) -> TransmitReport {
        self.transmit(self.buffer.close())
    }
}

/// Buffer + flush trigger + transmitter for one remote sink.
///
/// Dropping the shipper closes it, so buffered entries are shipped before the
/// owning sink goes away.
pub struct BatchShipper {
    core: Arc<Core>,
    trigger: Mutex<FlushTrigger>,
}

impl BatchShipper {
    /// Spawns the flush worker.
    ///
    /// # Errors
    /// `Error::InvalidConfig` for a zero batch size, chunk size, or interval;
    /// `Error::Io` if the worker thread cannot be spawned.
    pub fn start(transport: Arc<dyn LogTransport>, options: ShipperOptions) -> Result<Self, Error> {
        if options.batch_size == 0 {
            return Err(Error::InvalidConfig("batch_size must be > 0".into()));
        }
        if options.chunk_size == 0 {
            return Err(Error::InvalidConfig("chunk_size must be > 0".into()));
        }
        if options.flush_interval.is_zero() {
            return Err(Error::InvalidConfig("flush_interval must be > 0".into()));
        }

        let core = Arc::new(Core {
            buffer: BatchBuffer::new(options.batch_size),
            transmitter: Transmitter::new(
                transport,
                options.topic,
                options.source,
                options.chunk_size,
            ),
            counters: Counters::default(),
        });
        let trigger = FlushTrigger::start(options.flush_interval, Arc::clone(&core))?;

        Ok(Self {
            core,
            trigger: Mutex::new(trigger),
        })
    }

    /// Buffers one entry. When that fills the batch, the batch is transmitted on
    /// the caller's thread before this returns.
    ///
    /// # Errors
    /// `Error::ShipperClosed` after [`close`](Self::close).
    pub fn append(&self, entry: LogEntry) -> Result<(), Error> {
        if let Some(batch) = self.core.buffer.push(entry)? {
            self.core.transmit(batch);
        }
        Ok(())
    }

    /// Drains and transmits everything buffered; a no-op when empty.
    ///
    /// # Errors
    /// `Error::ShipperClosed` after [`close`](Self::close).
    pub fn flush(&self) -> Result<TransmitReport, Error> {
        if self.core.buffer.is_closed() {
            return Err(Error::ShipperClosed);
        }
        Ok(self.core.flush())
    }

    /// Stops the worker, which ships the remainder, and waits for it. Idempotent.
    pub fn close(&self) {
        self.trigger
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .stop();
        // Covers a worker that died before its final flush.
        self.core.shutdown();
    }

    #[must_use]
    pub fn state(&self) -> TriggerState {
        self.trigger
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .state()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.core.buffer.is_closed()
    }

    /// Entries waiting for the next flush.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.core.buffer.len()
    }

    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.core.buffer.threshold()
    }

    #[must_use]
    pub fn stats(&self) -> ShipperStats {
        let c = &self.core.counters;
        ShipperStats {
            flushes: c.flushes.load(Ordering::Relaxed),
            calls: c.calls.load(Ordering::Relaxed),
            entries_sent: c.entries_sent.load(Ordering::Relaxed),
            entries_dropped: c.entries_dropped.load(Ordering::Relaxed),
        }
    }
}

impl Drop for BatchShipper {
    fn drop(&mut self) {
        self.close();
    }
}
