//! The structured field set shared by the file and remote sinks.

use crate::record::LogRecord;
use crate::shipper::LogContent;
use serde_json::{Map, Value};

pub const TIME_KEY: &str = "time";
pub const LEVEL_KEY: &str = "level";
pub const CALLER_KEY: &str = "caller";
pub const MESSAGE_KEY: &str = "msg";
pub const STACKTRACE_KEY: &str = "stacktrace";

const RESERVED: [&str; 5] = [TIME_KEY, LEVEL_KEY, CALLER_KEY, MESSAGE_KEY, STACKTRACE_KEY];

/// Standard keys first, then user fields in call order. A user key that would
/// shadow a standard key is kept under `fields.<key>`.
#[must_use]
pub fn structured(record: &LogRecord) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(TIME_KEY.into(), Value::String(record.time.to_rfc3339()));
    map.insert(LEVEL_KEY.into(), Value::String(record.level.as_str().into()));
    if let Some(caller) = &record.caller {
        map.insert(CALLER_KEY.into(), Value::String(caller.clone()));
    }
    map.insert(MESSAGE_KEY.into(), Value::String(record.message.clone()));
    if let Some(trace) = &record.stacktrace {
        map.insert(STACKTRACE_KEY.into(), Value::String(trace.clone()));
    }

    for field in &record.fields {
        let key = if RESERVED.contains(&field.key.as_str()) {
            format!("fields.{}", field.key)
        } else {
            field.key.clone()
        };
        map.insert(key, field.value.clone());
    }

    map
}

/// One JSON object, no trailing newline.
///
/// # Errors
/// Returns `Error::Format` if serialization fails.
pub fn json_line(record: &LogRecord) -> Result<String, crate::Error> {
    serde_json::to_string(&structured(record))
        .map_err(|e| crate::Error::Format(format!("JSON serialization failed: {e}")))
}

/// Wire shape: every value stringified, strings left unquoted.
#[must_use]
pub fn contents(record: &LogRecord) -> Vec<LogContent> {
    structured(record)
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            LogContent { key, value }
        })
        .collect()
}
