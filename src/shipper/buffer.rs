//! Pending entries of one remote sink behind a single mutex.
//!
//! Every mutation, including the threshold check and the drain, happens inside
//! one critical section, so an append racing a flush lands in exactly one batch.
//! Callers transmit the returned batch after the lock is released.

use super::transport::LogEntry;
use crate::Error;
use std::mem;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct State {
    entries: Vec<LogEntry>,
    closed: bool,
}

#[derive(Debug)]
pub struct BatchBuffer {
    state: Mutex<State>,
    threshold: usize,
}

impl BatchBuffer {
    /// `threshold` of zero is treated as one.
    #[must_use]
    pub fn new(threshold: usize) -> Self {
        let threshold = threshold.max(1);
        Self {
            state: Mutex::new(State {
                entries: Vec::with_capacity(threshold),
                closed: false,
            }),
            threshold,
        }
    }

    #[must_use]
    pub const fn threshold(&self) -> usize {
        self.threshold
    }

    // A panic while holding the lock leaves the Vec intact, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Appends; when the length reaches the threshold, drains in the same
    /// critical section and hands the batch back for immediate transmission.
    ///
    /// # Errors
    /// `Error::ShipperClosed` after [`close`](Self::close).
    pub fn push(&self, entry: LogEntry) -> Result<Option<Vec<LogEntry>>, Error> {
        let mut state = self.lock();
        if state.closed {
            return Err(Error::ShipperClosed);
        }
        state.entries.push(entry);
        if state.entries.len() >= self.threshold {
            let batch = mem::replace(&mut state.entries, Vec::with_capacity(self.threshold));
            return Ok(Some(batch));
        }
        Ok(None)
    }

    /// Takes everything currently buffered; empty when there is nothing.
    pub fn drain(&self) -> Vec<LogEntry> {
        mem::take(&mut self.lock().entries)
    }

    /// Marks the buffer closed and takes what is left, atomically.
    pub fn close(&self) -> Vec<LogEntry> {
        let mut state = self.lock();
        state.closed = true;
        mem::take(&mut state.entries)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }
}
