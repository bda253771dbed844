//! The seam between the transmitter and the remote log service, plus the wire types.

use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// One key/value pair of a shipped record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogContent {
    pub key: String,
    pub value: String,
}

/// One record on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub contents: Vec<LogContent>,
}

impl LogEntry {
    #[must_use]
    pub const fn new(contents: Vec<LogContent>) -> Self {
        Self { contents }
    }

    /// Looks up a content value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.contents
            .iter()
            .find(|c| c.key == key)
            .map(|c| c.value.as_str())
    }
}

/// Payload of exactly one remote call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogGroup {
    pub topic: String,
    pub source: String,
    /// Unix seconds captured at send time.
    pub time: u32,
    pub logs: Vec<LogEntry>,
}

/// Why a remote call failed.
#[derive(Debug)]
pub enum TransportError {
    /// Connection, timeout, or body error from the HTTP client.
    Http(reqwest::Error),
    /// The service answered with a non-success status.
    Status { status: u16, body: String },
    /// Anything else a custom transport wants to report.
    Other(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "http: {e}"),
            Self::Status { status, body } if body.is_empty() => write!(f, "status {status}"),
            Self::Status { status, body } => write!(f, "status {status}: {body}"),
            Self::Other(s) => f.write_str(s),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

/// `Send + Sync` so the worker thread and producer threads can share one transport.
pub trait LogTransport: Send + Sync {
    /// Delivers one group in one call.
    ///
    /// # Errors
    /// Any failure of the call; the caller drops the group.
    fn put_logs(&self, group: &LogGroup) -> Result<(), TransportError>;

    /// Reachability check run once before a remote sink is admitted.
    ///
    /// # Errors
    /// The service, project, or logstore cannot be reached.
    fn check(&self) -> Result<(), TransportError>;
}

/// Connection parameters for [`HttpTransport`].
#[derive(Clone)]
pub struct HttpTarget {
    pub endpoint: String,
    pub project: String,
    pub logstore: String,
    pub region: Option<String>,
    pub access_key_id: String,
    pub access_key_secret: String,
    pub timeout: Duration,
}

impl fmt::Debug for HttpTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTarget")
            .field("endpoint", &self.endpoint)
            .field("project", &self.project)
            .field("logstore", &self.logstore)
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"***")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// JSON-over-HTTP transport.
///
/// `check` issues `GET {base}/projects/{project}` and
/// `GET {base}/projects/{project}/logstores/{logstore}`; `put_logs` posts the
/// group to `{base}/projects/{project}/logstores/{logstore}/logs`. Requests carry
/// basic auth built from the access key pair.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    base: String,
    target: HttpTarget,
}

impl HttpTransport {
    /// # Errors
    /// Returns `TransportError::Http` if the client cannot be built (TLS backend init).
    pub fn new(target: HttpTarget) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(target.timeout)
            .build()?;
        Ok(Self {
            client,
            base: base_url(&target.endpoint),
            target,
        })
    }

    fn project_url(&self) -> String {
        format!("{}/projects/{}", self.base, self.target.project)
    }

    fn logstore_url(&self) -> String {
        format!("{}/logstores/{}", self.project_url(), self.target.logstore)
    }

    fn authorize(
        &self,
        req: reqwest::blocking::RequestBuilder,
    ) -> reqwest::blocking::RequestBuilder {
        let req = req.basic_auth(
            &self.target.access_key_id,
            Some(&self.target.access_key_secret),
        );
        match &self.target.region {
            Some(region) => req.header("x-log-region", region),
            None => req,
        }
    }

    fn expect_success(resp: reqwest::blocking::Response) -> Result<(), TransportError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        // Body is only read on failure; it usually carries the service's error code.
        let body = resp.text().unwrap_or_default();
        Err(TransportError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

impl LogTransport for HttpTransport {
    fn put_logs(&self, group: &LogGroup) -> Result<(), TransportError> {
        let url = format!("{}/logs", self.logstore_url());
        let resp = self.authorize(self.client.post(url)).json(group).send()?;
        Self::expect_success(resp)
    }

    fn check(&self) -> Result<(), TransportError> {
        let resp = self.authorize(self.client.get(self.project_url())).send()?;
        Self::expect_success(resp)?;
        let resp = self.authorize(self.client.get(self.logstore_url())).send()?;
        Self::expect_success(resp)
    }
}

/// Endpoints are often configured as bare hosts (`cn-beijing.log.example.com`).
fn base_url(endpoint: &str) -> String {
    let endpoint = endpoint.trim().trim_end_matches('/');
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!("https://{endpoint}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_gets_https_scheme() {
        assert_eq!(base_url("log.example.com"), "https://log.example.com");
        assert_eq!(base_url("http://127.0.0.1:8080/"), "http://127.0.0.1:8080");
    }

    #[test]
    fn entry_lookup_by_key() {
        let entry = LogEntry::new(vec![LogContent {
            key: "msg".into(),
            value: "hi".into(),
        }]);
        assert_eq!(entry.get("msg"), Some("hi"));
        assert_eq!(entry.get("level"), None);
    }
}
