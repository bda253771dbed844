//! Hot paths of a log call: encoding and buffering.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use logship::encode::{ConsoleEncoder, contents, json_line};
use logship::shipper::{BatchShipper, LogGroup, LogTransport, ShipperOptions, TransportError};
use logship::{Level, LogRecord};
use std::sync::Arc;
use std::time::Duration;

struct NullTransport;

impl LogTransport for NullTransport {
    fn put_logs(&self, _group: &LogGroup) -> Result<(), TransportError> {
        Ok(())
    }

    fn check(&self) -> Result<(), TransportError> {
        Ok(())
    }
}

fn record() -> LogRecord {
    LogRecord::new(Level::Info, "request handled")
        .field("method", "GET")
        .field("path", "/api/v1/orders")
        .field("status", 200)
        .field("ms", 12.5)
}

fn bench_encode(c: &mut Criterion) {
    let record = record();
    let console = ConsoleEncoder::new().colors(false);

    c.bench_function("encode_console", |b| {
        b.iter(|| console.encode(black_box(&record)));
    });
    c.bench_function("encode_json", |b| {
        b.iter(|| json_line(black_box(&record)));
    });
    c.bench_function("encode_contents", |b| {
        b.iter(|| contents(black_box(&record)));
    });
}

fn bench_append(c: &mut Criterion) {
    let shipper = BatchShipper::start(
        Arc::new(NullTransport),
        ShipperOptions {
            flush_interval: Duration::from_secs(3600),
            ..ShipperOptions::default()
        },
    )
    .unwrap();
    let entry = logship::shipper::LogEntry::new(contents(&record()));

    c.bench_function("shipper_append", |b| {
        b.iter(|| shipper.append(black_box(entry.clone())));
    });
    shipper.close();
}

criterion_group!(benches, bench_encode, bench_append);
criterion_main!(benches);
