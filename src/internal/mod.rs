//! Logship's own diagnostic channel.
//!
//! Failures inside the pipeline (a remote call that failed, a sink that could not
//! write) cannot be reported through the pipeline itself without recursing into the
//! sink that is failing. They go to stderr instead, gated by a threshold read once
//! from `LOGSHIP_INTERNAL_LEVEL` (default `warn`).

use crate::encode::Palette;
use crate::level::Level;
use chrono::Local;
use std::io::{self, IsTerminal, Write};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU8, Ordering};

const UNSET: u8 = u8::MAX;

static LEVEL: OnceLock<Level> = OnceLock::new();
static OVERRIDE: AtomicU8 = AtomicU8::new(UNSET);

/// Env var consulted on first use.
pub const LEVEL_ENV: &str = "LOGSHIP_INTERNAL_LEVEL";

fn env_level() -> Level {
    *LEVEL.get_or_init(|| {
        std::env::var(LEVEL_ENV)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(Level::Warn)
    })
}

/// Active threshold: the override if one was set, the env value otherwise.
#[must_use]
pub fn level() -> Level {
    match OVERRIDE.load(Ordering::Relaxed) {
        UNSET => env_level(),
        raw => Level::all()
            .into_iter()
            .find(|l| *l as u8 == raw)
            .unwrap_or(Level::Warn),
    }
}

/// Overrides the env-derived threshold, e.g. from a CLI `--verbose` flag.
pub fn set_level(level: Level) {
    OVERRIDE.store(level as u8, Ordering::Relaxed);
}

fn log(level: Level, scope: &str, msg: &str) {
    if level < self::level() {
        return;
    }

    let stderr = io::stderr();
    let colored = stderr.is_terminal();
    let tag = if colored {
        Palette::default().paint(level, level.label())
    } else {
        level.label().to_string()
    };
    let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");

    // Nothing sensible to do if stderr itself is gone.
    let _ = writeln!(stderr.lock(), "{ts}  [logship] {tag:<5}  {scope}  {msg}");
}

/// Startup and teardown details.
pub fn debug(scope: &str, msg: &str) {
    log(Level::Debug, scope, msg);
}

pub fn info(scope: &str, msg: &str) {
    log(Level::Info, scope, msg);
}

/// Non-fatal anomalies: a sink that rejected a write, an env value that didn't parse.
pub fn warn(scope: &str, msg: &str) {
    log(Level::Warn, scope, msg);
}

/// Lost data: a failed remote call whose chunk was dropped.
pub fn error(scope: &str, msg: &str) {
    log(Level::Error, scope, msg);
}
