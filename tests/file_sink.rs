//! Rotating file sink: JSON lines, rotation, pruning, compression.

use flate2::read::GzDecoder;
use logship::sink::{FileSink, Rotation, Sink};
use logship::{Level, LogRecord};
use serde_json::Value;
use std::fs;
use std::io::Read;
use std::time::Duration;
use tempfile::TempDir;

fn record(i: usize) -> LogRecord {
    LogRecord::new(Level::Info, format!("message number {i}")).field("i", i)
}

fn small_rotation(max_backups: usize, compress: bool) -> Rotation {
    Rotation {
        max_size: 300,
        max_backups,
        max_age: Duration::ZERO,
        compress,
    }
}

#[test]
fn writes_one_json_object_per_line() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("app.log");
    let sink = FileSink::new(&path);

    sink.write(&record(1)).unwrap();
    sink.write(&LogRecord::new(Level::Warn, "second").field("msg", "shadow"))
        .unwrap();
    sink.close().unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<Value> = content
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["msg"], "message number 1");
    assert_eq!(lines[0]["level"], "info");
    assert_eq!(lines[0]["i"], 1);
    assert_eq!(lines[1]["msg"], "second");
    assert_eq!(lines[1]["fields.msg"], "shadow");
}

#[test]
fn open_creates_parent_directories() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("nested").join("deeper").join("app.log");
    let sink = FileSink::new(&path);

    sink.open().unwrap();
    assert!(path.exists());
}

#[test]
fn open_fails_when_parent_is_a_file() {
    let tmp = TempDir::new().unwrap();
    let blocker = tmp.path().join("blocker");
    fs::write(&blocker, b"not a directory").unwrap();

    let sink = FileSink::new(blocker.join("app.log"));
    assert!(matches!(sink.open(), Err(logship::Error::Io(_))));
}

#[test]
fn appends_across_reopen() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("app.log");

    let sink = FileSink::new(&path);
    sink.write(&record(1)).unwrap();
    sink.close().unwrap();

    let sink = FileSink::new(&path);
    sink.write(&record(2)).unwrap();
    sink.close().unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 2);
}

#[test]
fn rotates_when_size_exceeded() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("app.log");
    let sink = FileSink::new(&path).rotation(small_rotation(0, false));

    for i in 0..20 {
        sink.write(&record(i)).unwrap();
    }
    sink.close().unwrap();

    let backups = sink.backups().unwrap();
    assert!(!backups.is_empty());
    for backup in &backups {
        let name = backup.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("app-"), "{name}");
        assert!(name.ends_with(".log"), "{name}");
    }
    assert!(fs::metadata(&path).unwrap().len() <= 300);

    // Nothing lost across rotation.
    let mut total = fs::read_to_string(&path).unwrap().lines().count();
    for backup in &backups {
        total += fs::read_to_string(backup).unwrap().lines().count();
    }
    assert_eq!(total, 20);
}

#[test]
fn prunes_beyond_max_backups() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("app.log");
    let sink = FileSink::new(&path).rotation(small_rotation(2, false));

    for i in 0..40 {
        sink.write(&record(i)).unwrap();
    }
    sink.close().unwrap();

    assert_eq!(sink.backups().unwrap().len(), 2);
}

#[test]
fn pruning_leaves_unrelated_files_alone() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("app.log");
    let siblings = ["app-0-audit.log", "app-audit.log", "app-worker.log.gz"];
    for name in siblings {
        fs::write(tmp.path().join(name), b"keep me\n").unwrap();
    }

    let sink = FileSink::new(&path).rotation(Rotation {
        max_size: 200,
        max_backups: 1,
        max_age: Duration::ZERO,
        compress: false,
    });
    for i in 0..20 {
        sink.write(&record(i)).unwrap();
    }
    sink.close().unwrap();

    for name in siblings {
        let sibling = tmp.path().join(name);
        assert!(sibling.exists(), "{name} was removed");
        assert_eq!(fs::read_to_string(&sibling).unwrap(), "keep me\n");
    }
    let backups = sink.backups().unwrap();
    assert_eq!(backups.len(), 1);
    assert!(
        backups
            .iter()
            .all(|p| !siblings.iter().any(|s| p.ends_with(s)))
    );
}

#[test]
fn compresses_rotated_files() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("app.log");
    let sink = FileSink::new(&path).rotation(small_rotation(0, true));

    for i in 0..10 {
        sink.write(&record(i)).unwrap();
    }
    sink.close().unwrap();

    let backups = sink.backups().unwrap();
    assert!(!backups.is_empty());
    assert!(
        backups
            .iter()
            .all(|p| p.extension().is_some_and(|e| e == "gz"))
    );

    let mut text = String::new();
    GzDecoder::new(fs::File::open(&backups[0]).unwrap())
        .read_to_string(&mut text)
        .unwrap();
    let first: Value = serde_json::from_str(text.lines().next().unwrap()).unwrap();
    assert_eq!(first["level"], "info");
}

#[test]
fn no_rotation_keeps_single_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("app.log");
    let sink = FileSink::new(&path).rotation(Rotation::none());

    for i in 0..50 {
        sink.write(&record(i)).unwrap();
    }
    sink.close().unwrap();

    assert!(sink.backups().unwrap().is_empty());
    assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 50);
}

#[test]
fn threshold_is_per_sink() {
    let tmp = TempDir::new().unwrap();
    let sink = FileSink::new(tmp.path().join("app.log")).level(Level::Error);
    assert_eq!(sink.name(), "file");
    assert!(!sink.enabled(Level::Warn));
    assert!(sink.enabled(Level::Fatal));
}
