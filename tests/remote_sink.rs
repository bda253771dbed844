//! Remote sink construction: every configuration problem surfaces before the
//! flush worker starts.

mod common;

use common::{RecordingTransport, remote_config};
use logship::config::RemoteConfig;
use logship::sink::{RemoteSink, Sink};
use logship::{Error, Level, LogRecord};
use std::sync::atomic::Ordering;

fn build_err(config: &RemoteConfig) -> Error {
    RemoteSink::with_transport(config, RecordingTransport::new(), Level::Info).unwrap_err()
}

#[test]
fn missing_required_fields() {
    let cases: [(&str, fn(&mut RemoteConfig)); 5] = [
        ("endpoint", |c| c.endpoint.clear()),
        ("project", |c| c.project.clear()),
        ("logstore", |c| c.logstore = "   ".into()),
        ("access_key_id", |c| c.access_key_id.clear()),
        ("access_key_secret", |c| c.access_key_secret.clear()),
    ];
    for (name, clear) in cases {
        let mut config = remote_config();
        clear(&mut config);
        match build_err(&config) {
            Error::MissingField(field) => assert_eq!(field, name),
            other => panic!("{name}: unexpected {other}"),
        }
    }
}

#[test]
fn zero_sizes_are_invalid() {
    let mut config = remote_config();
    config.batch_size = 0;
    assert!(matches!(build_err(&config), Error::InvalidConfig(_)));

    let mut config = remote_config();
    config.chunk_size = 0;
    assert!(matches!(build_err(&config), Error::InvalidConfig(_)));

    let mut config = remote_config();
    config.flush_interval_secs = 0;
    assert!(matches!(build_err(&config), Error::InvalidConfig(_)));
}

#[test]
fn failed_check_is_unreachable() {
    let transport = RecordingTransport::unreachable();
    let result = RemoteSink::with_transport(&remote_config(), transport.clone(), Level::Info);

    let Err(err) = result else {
        panic!("expected Unreachable");
    };
    assert!(matches!(err, Error::Unreachable(_)));
    assert!(err.is_config());
    assert!(err.to_string().contains("ProjectNotExist"));
    assert_eq!(transport.checks.load(Ordering::SeqCst), 1);
    assert_eq!(transport.calls(), 0);
}

#[test]
fn validation_runs_before_check() {
    let transport = RecordingTransport::new();
    let mut config = remote_config();
    config.project.clear();

    assert!(RemoteSink::with_transport(&config, transport.clone(), Level::Info).is_err());
    assert_eq!(transport.checks.load(Ordering::SeqCst), 0);
}

#[test]
fn writes_go_through_batches() {
    let transport = RecordingTransport::new();
    let mut config = remote_config();
    config.batch_size = 2;
    config.topic = "audit".into();
    let sink = RemoteSink::with_transport(&config, transport.clone(), Level::Warn)
        .unwrap();

    assert_eq!(sink.name(), "remote");
    assert!(!sink.enabled(Level::Info));
    assert!(sink.enabled(Level::Error));

    sink.write(&LogRecord::new(Level::Warn, "one")).unwrap();
    assert_eq!(transport.calls(), 0);
    sink.write(&LogRecord::new(Level::Error, "two")).unwrap();
    assert_eq!(transport.calls(), 1);
    assert_eq!(transport.groups()[0].topic, "audit");

    sink.write(&LogRecord::new(Level::Warn, "three")).unwrap();
    sink.flush().unwrap();
    assert_eq!(transport.calls(), 2);
    assert_eq!(sink.stats().entries_sent, 3);
}

#[test]
fn write_after_close_fails() {
    let transport = RecordingTransport::new();
    let sink = RemoteSink::with_transport(&remote_config(), transport, Level::Info)
        .unwrap();

    sink.close().unwrap();
    assert!(sink.shipper().is_closed());
    assert!(matches!(
        sink.write(&LogRecord::new(Level::Info, "late")),
        Err(Error::ShipperClosed)
    ));
}

#[test]
fn connect_to_closed_port_is_unreachable() {
    let mut config = remote_config();
    config.endpoint = "http://127.0.0.1:1".into();
    config.timeout_secs = 2;

    let Err(err) = RemoteSink::connect(&config, Level::Info) else {
        panic!("expected Unreachable");
    };
    assert!(matches!(err, Error::Unreachable(_)));
}

#[test]
fn debug_output_hides_secret() {
    let config = remote_config();
    let dbg = format!("{config:?}");
    assert!(!dbg.contains("secret\""));
    assert!(dbg.contains("***"));
}

#[test]
fn sink_debug_shows_state_without_credentials() {
    let sink = RemoteSink::with_transport(&remote_config(), RecordingTransport::new(), Level::Info)
        .unwrap();
    sink.write(&LogRecord::new(Level::Info, "queued")).unwrap();

    let dbg = format!("{sink:?}");
    assert!(dbg.starts_with("RemoteSink"));
    assert!(dbg.contains("Running"));
    assert!(dbg.contains("pending: 1"));
    assert!(!dbg.contains("secret"));
}
