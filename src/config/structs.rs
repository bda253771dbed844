//! Configuration struct definitions.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// Settings that apply to every sink.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default threshold for sinks without their own `level`.
    pub level: String,
    /// Stack traces are attached at this level and above.
    pub stacktrace_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            stacktrace_level: "error".to_string(),
        }
    }
}

/// Terminal sink.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    pub enabled: bool,
    pub colors: bool,
    /// Per-sink threshold override.
    pub level: Option<String>,
    /// Level name to `#RRGGBB`; unlisted levels keep their default color.
    pub palette: BTreeMap<String, String>,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            colors: true,
            level: None,
            palette: BTreeMap::new(),
        }
    }
}

/// Rotating file sink.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub enabled: bool,
    /// `~` is expanded.
    pub path: String,
    /// Megabytes before rotation; 0 disables rotation.
    pub max_size_mb: u64,
    /// Rotated files to keep; 0 keeps all.
    pub max_backups: usize,
    /// Days to keep rotated files; 0 keeps them forever.
    pub max_age_days: u64,
    /// Gzip rotated files.
    pub compress: bool,
    pub level: Option<String>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: "./logs/app.log".to_string(),
            max_size_mb: 100,
            max_backups: 10,
            max_age_days: 30,
            compress: true,
            level: None,
        }
    }
}

/// Remote batch shipper sink.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub enabled: bool,
    /// Host or base URL of the log service.
    pub endpoint: String,
    pub project: String,
    pub logstore: String,
    /// Sent as `x-log-region` when non-empty.
    pub region: String,
    pub access_key_id: String,
    pub access_key_secret: String,
    pub topic: String,
    pub source: String,
    /// Buffered entries that force an immediate flush.
    pub batch_size: usize,
    /// Seconds between background flushes.
    pub flush_interval_secs: u64,
    /// Entries per remote call.
    pub chunk_size: usize,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    pub level: Option<String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: String::new(),
            project: String::new(),
            logstore: String::new(),
            region: String::new(),
            access_key_id: String::new(),
            access_key_secret: String::new(),
            topic: "app-log".to_string(),
            source: "localhost".to_string(),
            batch_size: 100,
            flush_interval_secs: 5,
            chunk_size: crate::shipper::DEFAULT_CHUNK_SIZE,
            timeout_secs: 10,
            level: None,
        }
    }
}

// Hand-written so the secret never reaches debug output.
impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("enabled", &self.enabled)
            .field("endpoint", &self.endpoint)
            .field("project", &self.project)
            .field("logstore", &self.logstore)
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"***")
            .field("topic", &self.topic)
            .field("source", &self.source)
            .field("batch_size", &self.batch_size)
            .field("flush_interval_secs", &self.flush_interval_secs)
            .field("chunk_size", &self.chunk_size)
            .field("timeout_secs", &self.timeout_secs)
            .field("level", &self.level)
            .finish()
    }
}
