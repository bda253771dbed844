//! Append-only log file with size-based rotation.
//!
//! When a write would push the active file past `max_size`, it is renamed to
//! `{stem}-{YYYY-MM-DDTHH-MM-SS.mmm}-{seq}.{ext}`, optionally gzipped, and old
//! backups beyond `max_backups` or older than `max_age` are removed.

use super::Sink;
use crate::encode::Encoder;
use crate::internal;
use crate::level::Level;
use crate::record::LogRecord;
use chrono::{Local, NaiveDateTime};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime};

const MB: u64 = 1024 * 1024;
const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3f";

/// Rotation limits; zero disables the respective limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rotation {
    /// Bytes before the active file is rotated.
    pub max_size: u64,
    /// Rotated files to keep.
    pub max_backups: usize,
    /// Rotated files older than this are removed.
    pub max_age: Duration,
    /// Gzip rotated files.
    pub compress: bool,
}

impl Default for Rotation {
    fn default() -> Self {
        Self {
            max_size: 100 * MB,
            max_backups: 10,
            max_age: Duration::from_secs(30 * 24 * 60 * 60),
            compress: true,
        }
    }
}

impl Rotation {
    /// Never rotates.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_size: 0,
            max_backups: 0,
            max_age: Duration::ZERO,
            compress: false,
        }
    }
}

struct Active {
    file: File,
    size: u64,
}

pub struct FileSink {
    threshold: Level,
    encoder: Encoder,
    path: PathBuf,
    rotation: Rotation,
    active: Mutex<Option<Active>>,
}

impl FileSink {
    /// JSON lines at Info and above; `~` in `path` is expanded. Nothing is
    /// touched on disk until [`open`](Self::open) or the first write.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        let raw = path.as_ref().to_string_lossy();
        let expanded = shellexpand::tilde(&raw);
        Self {
            threshold: Level::Info,
            encoder: Encoder::Json,
            path: PathBuf::from(expanded.as_ref()),
            rotation: Rotation::default(),
            active: Mutex::new(None),
        }
    }

    #[must_use]
    pub const fn level(mut self, level: Level) -> Self {
        self.threshold = level;
        self
    }

    #[must_use]
    pub fn encoder(mut self, encoder: Encoder) -> Self {
        self.encoder = encoder;
        self
    }

    #[must_use]
    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, Option<Active>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates the parent directory and opens the file now, so a bad path fails
    /// at startup instead of on the first record.
    ///
    /// # Errors
    /// I/O errors creating the directory or opening the file.
    pub fn open(&self) -> Result<(), crate::Error> {
        let mut active = self.lock();
        if active.is_none() {
            *active = Some(self.open_active()?);
        }
        Ok(())
    }

    fn open_active(&self) -> io::Result<Active> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
            internal::debug("FILE", &format!("Created directory: {}", parent.display()));
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let size = file.metadata()?.len();
        Ok(Active { file, size })
    }

    fn rotate(&self, active: &mut Option<Active>) -> io::Result<()> {
        // Close the handle before renaming.
        active.take();

        if self.path.exists() {
            let backup = self.backup_path();
            fs::rename(&self.path, &backup)?;
            internal::debug("FILE", &format!("Rotated to {}", backup.display()));
            if self.rotation.compress {
                compress_file(&backup)?;
            }
        }

        if let Err(e) = self.prune() {
            internal::warn("FILE", &format!("Failed to prune old log files: {e}"));
        }

        *active = Some(self.open_active()?);
        Ok(())
    }

    fn stem_ext(&self) -> (String, String) {
        let stem = self
            .path
            .file_stem()
            .map_or_else(|| "log".to_string(), |s| s.to_string_lossy().into_owned());
        let ext = self
            .path
            .extension()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        (stem, ext)
    }

    fn dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Timestamped name; the sequence number keeps names unique and sortable
    /// when several rotations happen within one millisecond.
    fn backup_path(&self) -> PathBuf {
        let (stem, ext) = self.stem_ext();
        let ts = Local::now().format(BACKUP_TIME_FORMAT);
        let dir = self.dir();
        let suffix = if ext.is_empty() {
            String::new()
        } else {
            format!(".{ext}")
        };

        let mut seq = 0u32;
        loop {
            let candidate = dir.join(format!("{stem}-{ts}-{seq:03}{suffix}"));
            let gz = PathBuf::from(format!("{}.gz", candidate.display()));
            if !candidate.exists() && !gz.exists() {
                return candidate;
            }
            seq += 1;
        }
    }

    /// Rotated files of this sink, newest first. Only names produced by rotation
    /// count; unrelated files sharing the stem (`app-audit.log`) are ignored.
    ///
    /// # Errors
    /// I/O errors listing the directory.
    pub fn backups(&self) -> io::Result<Vec<PathBuf>> {
        let (stem, ext) = self.stem_ext();

        let mut found: Vec<PathBuf> = fs::read_dir(self.dir())?
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|name| is_backup_name(name, &stem, &ext))
            })
            .collect();

        found.sort_by(|a, b| b.file_name().cmp(&a.file_name()));
        Ok(found)
    }

    fn prune(&self) -> io::Result<()> {
        let backups = self.backups()?;
        let now = SystemTime::now();

        for (i, path) in backups.iter().enumerate() {
            let too_many = self.rotation.max_backups > 0 && i >= self.rotation.max_backups;
            let too_old = !self.rotation.max_age.is_zero()
                && fs::metadata(path)
                    .and_then(|m| m.modified())
                    .ok()
                    .and_then(|t| now.duration_since(t).ok())
                    .is_some_and(|age| age > self.rotation.max_age);

            if too_many || too_old {
                fs::remove_file(path)?;
                internal::debug("FILE", &format!("Removed old log file {}", path.display()));
            }
        }
        Ok(())
    }
}

impl Sink for FileSink {
    fn name(&self) -> &str {
        "file"
    }

    fn threshold(&self) -> Level {
        self.threshold
    }

    fn write(&self, record: &LogRecord) -> Result<(), crate::Error> {
        let mut line = self.encoder.encode(record)?;
        line.push('\n');
        let len = line.len() as u64;

        let mut guard = self.lock();
        if guard.is_none() {
            *guard = Some(self.open_active()?);
        }

        let needs_rotation = self.rotation.max_size > 0
            && guard
                .as_ref()
                .is_some_and(|a| a.size > 0 && a.size + len > self.rotation.max_size);
        if needs_rotation {
            self.rotate(&mut guard)?;
        }

        let Some(active) = guard.as_mut() else {
            return Err(crate::Error::Format("log file not open".into()));
        };
        // Single write per record keeps lines intact under concurrent appenders.
        active.file.write_all(line.as_bytes())?;
        active.size += len;
        Ok(())
    }

    fn flush(&self) -> Result<(), crate::Error> {
        if let Some(active) = self.lock().as_mut() {
            active.file.flush()?;
        }
        Ok(())
    }

    fn close(&self) -> Result<(), crate::Error> {
        if let Some(mut active) = self.lock().take() {
            active.file.flush()?;
        }
        Ok(())
    }
}

/// `{stem}-{timestamp}-{seq}{.ext}` with an optional `.gz`, exactly as
/// `backup_path` names them.
fn is_backup_name(name: &str, stem: &str, ext: &str) -> bool {
    let name = name.strip_suffix(".gz").unwrap_or(name);
    let name = if ext.is_empty() {
        Some(name)
    } else {
        name.strip_suffix(ext).and_then(|n| n.strip_suffix('.'))
    };
    let Some(middle) = name
        .and_then(|n| n.strip_prefix(stem))
        .and_then(|n| n.strip_prefix('-'))
    else {
        return false;
    };
    let Some((ts, seq)) = middle.rsplit_once('-') else {
        return false;
    };
    seq.len() >= 3
        && seq.bytes().all(|b| b.is_ascii_digit())
        && NaiveDateTime::parse_from_str(ts, BACKUP_TIME_FORMAT).is_ok()
}

/// Gzips `path` to `path.gz` and removes the original.
fn compress_file(path: &Path) -> io::Result<()> {
    let mut reader = BufReader::new(File::open(path)?);
    let gz_path = format!("{}.gz", path.display());
    let writer = BufWriter::new(File::create(&gz_path)?);
    let mut encoder = GzEncoder::new(writer, Compression::default());

    io::copy(&mut reader, &mut encoder)?;
    encoder.finish()?.flush()?;

    fs::remove_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_names_match_rotation_output() {
        assert!(is_backup_name("app-2026-10-18T12-30-05.123-000.log", "app", "log"));
        assert!(is_backup_name("app-2026-10-18T12-30-05.123-014.log.gz", "app", "log"));
        assert!(is_backup_name("app-2026-10-18T12-30-05.123-000", "app", ""));
    }

    #[test]
    fn sibling_files_are_not_backups() {
        for name in [
            "app.log",
            "app-audit.log",
            "app-0-audit.log",
            "app-worker.log.gz",
            "app-2026-10-18T12-30-05.123.log",
            "app-2026-10-18T12-30-05.123-0a1.log",
            "app-2026-13-18T12-30-05.123-000.log",
            "other-2026-10-18T12-30-05.123-000.log",
            "app-2026-10-18T12-30-05.123-000.txt",
        ] {
            assert!(!is_backup_name(name, "app", "log"), "{name}");
        }
    }
}
