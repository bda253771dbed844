//! `fatal` ends the process, so the test re-runs itself as a child process and
//! inspects the exit status and what the remote sink shipped before exiting.

mod common;

use common::remote_config;
use logship::shipper::{LogGroup, LogTransport, TransportError};
use logship::sink::RemoteSink;
use logship::{Level, Logger};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;
use std::sync::Arc;
use tempfile::TempDir;

const CHILD_ENV: &str = "LOGSHIP_FATAL_CHILD_OUT";
const TEST_NAME: &str = "fatal_ships_buffer_and_exits_with_status_1";

/// Appends the `msg` of every shipped entry to a file, one per line.
struct FileTransport(PathBuf);

impl LogTransport for FileTransport {
    fn put_logs(&self, group: &LogGroup) -> Result<(), TransportError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.0)
            .map_err(|e| TransportError::Other(e.to_string()))?;
        for entry in &group.logs {
            writeln!(file, "{}", entry.get("msg").unwrap_or_default())
                .map_err(|e| TransportError::Other(e.to_string()))?;
        }
        Ok(())
    }

    fn check(&self) -> Result<(), TransportError> {
        Ok(())
    }
}

fn run_child(out: PathBuf) -> ! {
    let transport = Arc::new(FileTransport(out));
    // Large batch and interval: nothing ships unless `fatal` closes the sink.
    let mut config = remote_config();
    config.batch_size = 1000;
    config.flush_interval_secs = 3600;
    let sink = RemoteSink::with_transport(&config, transport, Level::Info).unwrap();
    let logger = Logger::builder().sink(sink).build();

    logger.info("before fatal");
    logger.fatal("shutting down");
}

#[test]
fn fatal_ships_buffer_and_exits_with_status_1() {
    if let Some(out) = std::env::var_os(CHILD_ENV) {
        run_child(PathBuf::from(out));
    }

    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("shipped.txt");
    let status = Command::new(std::env::current_exe().unwrap())
        .args([TEST_NAME, "--exact", "--test-threads=1", "--nocapture"])
        .env(CHILD_ENV, &out)
        .status()
        .unwrap();

    assert_eq!(status.code(), Some(1));
    let shipped = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = shipped.lines().collect();
    assert_eq!(lines, ["before fatal", "shutting down"]);
}
