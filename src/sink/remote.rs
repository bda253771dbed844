//! Ships records to a remote log service through a [`BatchShipper`].

use super::Sink;
use crate::config::RemoteConfig;
use crate::encode;
use crate::internal;
use crate::level::Level;
use crate::record::LogRecord;
use crate::shipper::{
    BatchShipper, HttpTarget, HttpTransport, LogEntry, LogTransport, ShipperOptions, ShipperStats,
};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub struct RemoteSink {
    threshold: Level,
    shipper: BatchShipper,
}

// Credentials stay inside the transport; only shipping state is shown.
impl fmt::Debug for RemoteSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteSink")
            .field("threshold", &self.threshold)
            .field("state", &self.shipper.state())
            .field("pending", &self.shipper.pending())
            .field("stats", &self.shipper.stats())
            .finish_non_exhaustive()
    }
}

impl RemoteSink {
    /// Validates `config`, builds the HTTP transport, and checks that the
    /// project and logstore exist before starting the shipper.
    ///
    /// # Errors
    /// `MissingField`/`InvalidConfig` for bad settings, `Transport` when the HTTP
    /// client can't be built, `Unreachable` when the service can't be reached or
    /// rejects the target.
    pub fn connect(config: &RemoteConfig, threshold: Level) -> Result<Self, crate::Error> {
        validate(config)?;
        let target = HttpTarget {
            endpoint: config.endpoint.clone(),
            project: config.project.clone(),
            logstore: config.logstore.clone(),
            region: Some(config.region.clone()).filter(|r| !r.is_empty()),
            access_key_id: config.access_key_id.clone(),
            access_key_secret: config.access_key_secret.clone(),
            timeout: Duration::from_secs(config.timeout_secs.max(1)),
        };
        let transport = HttpTransport::new(target)?;
        Self::with_transport(config, Arc::new(transport), threshold)
    }

    /// Same as [`connect`](Self::connect) over a caller-supplied transport.
    ///
    /// # Errors
    /// See [`connect`](Self::connect).
    pub fn with_transport(
        config: &RemoteConfig,
        transport: Arc<dyn LogTransport>,
        threshold: Level,
    ) -> Result<Self, crate::Error> {
        validate(config)?;

        transport.check().map_err(|e| {
            crate::Error::Unreachable(format!(
                "{}/{} at {}: {e}",
                config.project, config.logstore, config.endpoint
            ))
        })?;

        let shipper = BatchShipper::start(
            transport,
            ShipperOptions {
                batch_size: config.batch_size,
                flush_interval: Duration::from_secs(config.flush_interval_secs),
                chunk_size: config.chunk_size,
                topic: config.topic.clone(),
                source: config.source.clone(),
            },
        )?;

        internal::debug(
            "REMOTE",
            &format!(
                "Shipping to {}/{} (batch {}, every {}s)",
                config.project, config.logstore, config.batch_size, config.flush_interval_secs
            ),
        );
        Ok(Self { threshold, shipper })
    }

    #[must_use]
    pub fn stats(&self) -> ShipperStats {
        self.shipper.stats()
    }

    #[must_use]
    pub const fn shipper(&self) -> &BatchShipper {
        &self.shipper
    }
}

fn validate(config: &RemoteConfig) -> Result<(), crate::Error> {
    let required = [
        ("endpoint", &config.endpoint),
        ("project", &config.project),
        ("logstore", &config.logstore),
        ("access_key_id", &config.access_key_id),
        ("access_key_secret", &config.access_key_secret),
    ];
    if let Some((name, _)) = required.into_iter().find(|(_, v)| v.trim().is_empty()) {
        return Err(crate::Error::MissingField(name));
    }
    if config.batch_size == 0 {
        return Err(crate::Error::InvalidConfig("batch_size must be > 0".into()));
    }
    if config.chunk_size == 0 {
        return Err(crate::Error::InvalidConfig("chunk_size must be > 0".into()));
    }
    if config.flush_interval_secs == 0 {
        return Err(crate::Error::InvalidConfig(
            "flush_interval_secs must be > 0".into(),
        ));
    }
    Ok(())
}

impl Sink for RemoteSink {
    fn name(&self) -> &str {
        "remote"
    }

    fn threshold(&self) -> Level {
        self.threshold
    }

    fn write(&self, record: &LogRecord) -> Result<(), crate::Error> {
        self.shipper.append(LogEntry::new(encode::contents(record)))
    }

    fn flush(&self) -> Result<(), crate::Error> {
        self.shipper.flush().map(|_| ())
    }

    fn close(&self) -> Result<(), crate::Error> {
        self.shipper.close();
        Ok(())
    }
}
