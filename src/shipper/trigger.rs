//! The background worker that decides when the buffer is drained on a timer.
//!
//! Size-triggered flushes happen on the producer's thread inside `append`;
//! this worker only handles the periodic tick and the final flush on shutdown.

use super::Core;
use crate::internal;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Running until the stop signal is observed and the final flush is done; Stopped is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    Running,
    Stopped,
}

pub(super) struct FlushTrigger {
    stop: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
    stopped: Arc<AtomicBool>,
}

impl FlushTrigger {
    pub(super) fn start(interval: Duration, core: Arc<Core>) -> io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let stopped = Arc::new(AtomicBool::new(false));
        let stopped_flag = Arc::clone(&stopped);

        let worker = thread::Builder::new()
            .name("logship-flush".into())
            .spawn(move || {
                let mut next_tick = Instant::now() + interval;
                loop {
                    let wait = next_tick.saturating_duration_since(Instant::now());
                    match rx.recv_timeout(wait) {
                        Err(RecvTimeoutError::Timeout) => {
                            core.flush();
                            next_tick += interval;
                            // Re-anchor when a slow transmit made us miss ticks.
                            let now = Instant::now();
                            if next_tick <= now {
                                next_tick = now + interval;
                            }
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                core.shutdown();
                stopped_flag.store(true, Ordering::Release);
                internal::debug("SHIPPER", "flush worker stopped");
            })?;

        internal::debug(
            "SHIPPER",
            &format!("flush worker started, interval={interval:?}"),
        );

        Ok(Self {
            stop: Some(tx),
            worker: Some(worker),
            stopped,
        })
    }

    pub(super) fn state(&self) -> TriggerState {
        if self.stopped.load(Ordering::Acquire) {
            TriggerState::Stopped
        } else {
            TriggerState::Running
        }
    }

    /// Signals the worker and blocks until its final flush has finished. Later calls are no-ops.
    pub(super) fn stop(&mut self) {
        if let Some(tx) = self.stop.take() {
            // The worker may already be gone (panicked); join below reports that.
            let _ = tx.send(());
        }
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            internal::error("SHIPPER", "flush worker panicked");
            self.stopped.store(true, Ordering::Release);
        }
    }
}
