//! Environment overrides. They take precedence over the file so deployments can
//! inject credentials without writing them to disk.

use super::Config;
use crate::internal;
use std::str::FromStr;

/// Accepts the usual spellings; anything else is `None`.
#[must_use]
pub fn parse_bool(v: &str) -> Option<bool> {
    match v.trim().to_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

#[must_use]
pub fn parse_number<T: FromStr>(v: &str) -> Option<T> {
    v.trim().parse().ok()
}

impl Config {
    /// Applies overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Applies overrides from `lookup`. Values are trimmed and empty ones ignored;
    /// booleans and numbers that don't parse are reported and ignored.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let set_str = |key: &str, target: &mut String| {
            if let Some(v) = get(key) {
                *target = v;
            }
        };
        let set_bool = |key: &str, target: &mut bool| {
            if let Some(v) = get(key) {
                match parse_bool(&v) {
                    Some(b) => *target = b,
                    None => internal::warn("CONFIG", &format!("Ignoring {key}={v}: not a boolean")),
                }
            }
        };

        if let Some(v) = get("LOGGER_LEVEL") {
            self.general.level = v.to_lowercase();
        }
        set_bool("LOGGER_CONSOLE", &mut self.terminal.enabled);
        set_bool("LOGGER_CONSOLE_COLORS", &mut self.terminal.colors);

        let file = &mut self.file;
        set_bool("LOGGER_FILE_ENABLED", &mut file.enabled);
        set_str("LOGGER_FILE_PATH", &mut file.path);
        set_number(&get, "LOGGER_FILE_MAX_SIZE", &mut file.max_size_mb);
        set_number(&get, "LOGGER_FILE_MAX_BACKUPS", &mut file.max_backups);
        set_number(&get, "LOGGER_FILE_MAX_AGE", &mut file.max_age_days);
        set_bool("LOGGER_FILE_COMPRESS", &mut file.compress);

        let remote = &mut self.remote;
        set_bool("LOGGER_REMOTE_ENABLED", &mut remote.enabled);
        set_str("LOGGER_REMOTE_ENDPOINT", &mut remote.endpoint);
        set_str("LOGGER_REMOTE_PROJECT", &mut remote.project);
        set_str("LOGGER_REMOTE_LOGSTORE", &mut remote.logstore);
        set_str("LOGGER_REMOTE_REGION", &mut remote.region);
        set_str("LOGGER_REMOTE_ACCESS_KEY_ID", &mut remote.access_key_id);
        set_str(
            "LOGGER_REMOTE_ACCESS_KEY_SECRET",
            &mut remote.access_key_secret,
        );
        set_str("LOGGER_REMOTE_TOPIC", &mut remote.topic);
        set_str("LOGGER_REMOTE_SOURCE", &mut remote.source);
        set_number(&get, "LOGGER_REMOTE_BATCH_SIZE", &mut remote.batch_size);
        set_number(
            &get,
            "LOGGER_REMOTE_FLUSH_INTERVAL",
            &mut remote.flush_interval_secs,
        );
    }
}

fn set_number<T, G>(get: &G, key: &str, target: &mut T)
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    if let Some(v) = get(key) {
        match parse_number(&v) {
            Some(n) => *target = n,
            None => internal::warn("CONFIG", &format!("Ignoring {key}={v}: not a number")),
        }
    }
}
