//! Human-readable output on the process's standard streams.

use super::Sink;
use crate::encode::{ConsoleEncoder, Encoder, Palette};
use crate::level::Level;
use crate::record::LogRecord;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

/// Where terminal lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stream {
    /// Warn and above to stderr, the rest to stdout.
    #[default]
    Split,
    Stdout,
    Stderr,
}

enum Target {
    Std(Stream),
    Writer(Mutex<Box<dyn Write + Send>>),
}

pub struct TerminalSink {
    threshold: Level,
    encoder: Encoder,
    target: Target,
}

impl Default for TerminalSink {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalSink {
    /// Info threshold, colored console encoding, split streams.
    #[must_use]
    pub fn new() -> Self {
        Self {
            threshold: Level::Info,
            encoder: Encoder::Console(ConsoleEncoder::new()),
            target: Target::Std(Stream::Split),
        }
    }

    #[must_use]
    pub const fn level(mut self, level: Level) -> Self {
        self.threshold = level;
        self
    }

    /// Toggles ANSI colors; switches back to console encoding if JSON was selected.
    #[must_use]
    pub fn colors(mut self, enabled: bool) -> Self {
        self.encoder = match self.encoder {
            Encoder::Console(c) => Encoder::Console(c.colors(enabled)),
            Encoder::Json => Encoder::Console(ConsoleEncoder::new().colors(enabled)),
        };
        self
    }

    /// Level colors; ignored by JSON encoding.
    #[must_use]
    pub fn palette(mut self, palette: Palette) -> Self {
        if let Encoder::Console(c) = self.encoder {
            self.encoder = Encoder::Console(c.palette(palette));
        }
        self
    }

    #[must_use]
    pub fn encoder(mut self, encoder: Encoder) -> Self {
        self.encoder = encoder;
        self
    }

    #[must_use]
    pub fn stream(mut self, stream: Stream) -> Self {
        self.target = Target::Std(stream);
        self
    }

    /// Redirects output to an arbitrary writer (a pipe, a buffer in tests).
    #[must_use]
    pub fn writer(mut self, writer: impl Write + Send + 'static) -> Self {
        self.target = Target::Writer(Mutex::new(Box::new(writer)));
        self
    }
}

impl Sink for TerminalSink {
    fn name(&self) -> &str {
        "terminal"
    }

    fn threshold(&self) -> Level {
        self.threshold
    }

    fn write(&self, record: &LogRecord) -> Result<(), crate::Error> {
        let line = self.encoder.encode(record)?;

        match &self.target {
            Target::Std(Stream::Split) if record.level >= Level::Warn => {
                writeln!(io::stderr().lock(), "{line}")?;
            }
            Target::Std(Stream::Split | Stream::Stdout) => {
                writeln!(io::stdout().lock(), "{line}")?;
            }
            Target::Std(Stream::Stderr) => writeln!(io::stderr().lock(), "{line}")?,
            Target::Writer(w) => {
                writeln!(w.lock().unwrap_or_else(PoisonError::into_inner), "{line}")?;
            }
        }

        Ok(())
    }

    fn flush(&self) -> Result<(), crate::Error> {
        match &self.target {
            Target::Std(_) => {
                io::stdout().flush()?;
                io::stderr().flush()?;
            }
            Target::Writer(w) => w.lock().unwrap_or_else(PoisonError::into_inner).flush()?,
        }
        Ok(())
    }
}
