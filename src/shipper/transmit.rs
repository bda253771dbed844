//! Splits a drained batch into service-sized groups and sends them, best effort.

use super::transport::{LogEntry, LogGroup, LogTransport};
use crate::internal;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Per-call record limit of the remote service.
pub const DEFAULT_CHUNK_SIZE: usize = 10;

/// Outcome of one [`Transmitter::send`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransmitReport {
    pub chunks_sent: usize,
    pub chunks_failed: usize,
    pub entries_sent: usize,
    pub entries_dropped: usize,
}

impl TransmitReport {
    #[must_use]
    pub const fn calls(&self) -> usize {
        self.chunks_sent + self.chunks_failed
    }
}

/// Owns the transport and the group metadata (topic, source).
pub struct Transmitter {
    transport: Arc<dyn LogTransport>,
    topic: String,
    source: String,
    chunk_size: usize,
}

impl Transmitter {
    /// `chunk_size` of zero is treated as one.
    #[must_use]
    pub fn new(
        transport: Arc<dyn LogTransport>,
        topic: impl Into<String>,
        source: impl Into<String>,
        chunk_size: usize,
    ) -> Self {
        Self {
            transport,
            topic: topic.into(),
            source: source.into(),
            chunk_size: chunk_size.max(1),
        }
    }

    #[must_use]
    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// One remote call per chunk of at most `chunk_size` entries, in buffer order.
    /// A failed call is reported and its entries are dropped; there is no retry
    /// and no error for the caller.
    pub fn send(&self, entries: Vec<LogEntry>) -> TransmitReport {
        let mut report = TransmitReport::default();

        for chunk in chunk(entries, self.chunk_size) {
            let group = LogGroup {
                topic: self.topic.clone(),
                source: self.source.clone(),
                time: unix_seconds(SystemTime::now()),
                logs: chunk,
            };
            let n = group.logs.len();

            match self.transport.put_logs(&group) {
                Ok(()) => {
                    report.chunks_sent += 1;
                    report.entries_sent += n;
                }
                Err(e) => {
                    internal::error(
                        "SHIPPER",
                        &format!("failed to ship {n} log entries, dropping them: {e}"),
                    );
                    report.chunks_failed += 1;
                    report.entries_dropped += n;
                }
            }
        }

        report
    }
}

/// Order-preserving split into groups of at most `size` (zero is treated as one).
/// Produces `ceil(len / size)` groups.
#[must_use]
pub fn chunk(entries: Vec<LogEntry>, size: usize) -> Vec<Vec<LogEntry>> {
    let size = size.max(1);
    let mut chunks = Vec::with_capacity(entries.len().div_ceil(size));
    let mut iter = entries.into_iter().peekable();
    while iter.peek().is_some() {
        chunks.push(iter.by_ref().take(size).collect());
    }
    chunks
}

/// Whole seconds since the epoch, clamped into `u32`: pre-epoch times map to 0,
/// times past 2106 saturate at `u32::MAX`.
#[must_use]
pub fn unix_seconds(t: SystemTime) -> u32 {
    t.duration_since(UNIX_EPOCH)
        .map_or(0, |d| u32::try_from(d.as_secs()).unwrap_or(u32::MAX))
}
