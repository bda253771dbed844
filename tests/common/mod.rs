//! Shared fixtures: a transport that records every group it is handed, and a
//! sink that keeps every record it is written.

#![allow(dead_code)]

use logship::config::RemoteConfig;
use logship::shipper::{LogContent, LogEntry, LogGroup, LogTransport, TransportError};
use logship::sink::Sink;
use logship::{Level, LogRecord};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct RecordingTransport {
    groups: Mutex<Vec<LogGroup>>,
    pub fail_puts: AtomicBool,
    pub fail_check: AtomicBool,
    pub checks: AtomicUsize,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        let t = Self::default();
        t.fail_puts.store(true, Ordering::SeqCst);
        Arc::new(t)
    }

    pub fn unreachable() -> Arc<Self> {
        let t = Self::default();
        t.fail_check.store(true, Ordering::SeqCst);
        Arc::new(t)
    }

    pub fn groups(&self) -> Vec<LogGroup> {
        self.groups.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.groups.lock().unwrap().len()
    }

    pub fn group_sizes(&self) -> Vec<usize> {
        self.groups().iter().map(|g| g.logs.len()).collect()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.groups().into_iter().flat_map(|g| g.logs).collect()
    }
}

impl LogTransport for RecordingTransport {
    fn put_logs(&self, group: &LogGroup) -> Result<(), TransportError> {
        self.groups.lock().unwrap().push(group.clone());
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(TransportError::Other("service unavailable".into()));
        }
        Ok(())
    }

    fn check(&self) -> Result<(), TransportError> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        if self.fail_check.load(Ordering::SeqCst) {
            return Err(TransportError::Status {
                status: 404,
                body: "ProjectNotExist".into(),
            });
        }
        Ok(())
    }
}

pub fn entry(id: impl Into<String>) -> LogEntry {
    LogEntry::new(vec![LogContent {
        key: "id".into(),
        value: id.into(),
    }])
}

/// A remote config that passes validation.
pub fn remote_config() -> RemoteConfig {
    RemoteConfig {
        enabled: true,
        endpoint: "log.example.com".into(),
        project: "proj".into(),
        logstore: "store".into(),
        access_key_id: "id".into(),
        access_key_secret: "secret".into(),
        ..RemoteConfig::default()
    }
}

pub struct CaptureSink {
    name: &'static str,
    threshold: Level,
    pub records: Arc<Mutex<Vec<LogRecord>>>,
}

impl CaptureSink {
    pub fn new(name: &'static str, threshold: Level) -> (Self, Arc<Mutex<Vec<LogRecord>>>) {
        let records = Arc::new(Mutex::new(Vec::new()));
        let sink = Self {
            name,
            threshold,
            records: Arc::clone(&records),
        };
        (sink, records)
    }
}

impl Sink for CaptureSink {
    fn name(&self) -> &str {
        self.name
    }

    fn threshold(&self) -> Level {
        self.threshold
    }

    fn write(&self, record: &LogRecord) -> Result<(), logship::Error> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    fn flush(&self) -> Result<(), logship::Error> {
        Ok(())
    }
}

/// Cloneable in-memory writer for terminal sink output.
#[derive(Clone, Default)]
pub struct SharedBuf(pub Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
