//! Stepwise construction. Terminal and file sinks get sub-builders for their
//! own settings; any other sink is added whole with [`LoggerBuilder::sink`].

use super::Logger;
use crate::encode::{Encoder, Palette};
use crate::level::Level;
use crate::sink::{FileSink, Multiplexer, Rotation, Sink, Stream, TerminalSink};
use std::io::Write;
use std::path::Path;

pub struct LoggerBuilder {
    pub(super) level: Level,
    pub(super) stacktrace_level: Level,
    pub(super) sinks: Vec<Box<dyn Sink>>,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggerBuilder {
    /// Info for sub-built sinks, stack traces at Error and above.
    #[must_use]
    pub fn new() -> Self {
        Self {
            level: Level::Info,
            stacktrace_level: Level::Error,
            sinks: Vec::new(),
        }
    }

    /// Default threshold for sinks created through [`terminal`](Self::terminal)
    /// and [`file`](Self::file) afterwards.
    #[must_use]
    pub const fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub const fn stacktrace_level(mut self, level: Level) -> Self {
        self.stacktrace_level = level;
        self
    }

    #[must_use]
    pub fn terminal(self) -> TerminalBuilder {
        let sink = TerminalSink::new().level(self.level);
        TerminalBuilder { parent: self, sink }
    }

    #[must_use]
    pub fn file(self, path: impl AsRef<Path>) -> FileBuilder {
        let sink = FileSink::new(path).level(self.level);
        FileBuilder { parent: self, sink }
    }

    /// Adds a fully configured sink, e.g. a [`RemoteSink`](crate::sink::RemoteSink)
    /// or a custom implementation.
    #[must_use]
    pub fn sink(mut self, sink: impl Sink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    #[must_use]
    pub fn boxed(mut self, sink: Box<dyn Sink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// With no sinks added, the logger writes to the terminal at Info.
    #[must_use]
    pub fn build(self) -> Logger {
        Logger::from_parts(Multiplexer::new(self.sinks), self.stacktrace_level)
    }
}

pub struct TerminalBuilder {
    parent: LoggerBuilder,
    sink: TerminalSink,
}

impl TerminalBuilder {
    #[must_use]
    pub fn level(mut self, level: Level) -> Self {
        self.sink = self.sink.level(level);
        self
    }

    #[must_use]
    pub fn colors(mut self, enabled: bool) -> Self {
        self.sink = self.sink.colors(enabled);
        self
    }

    #[must_use]
    pub fn palette(mut self, palette: Palette) -> Self {
        self.sink = self.sink.palette(palette);
        self
    }

    #[must_use]
    pub fn encoder(mut self, encoder: Encoder) -> Self {
        self.sink = self.sink.encoder(encoder);
        self
    }

    #[must_use]
    pub fn stream(mut self, stream: Stream) -> Self {
        self.sink = self.sink.stream(stream);
        self
    }

    #[must_use]
    pub fn writer(mut self, writer: impl Write + Send + 'static) -> Self {
        self.sink = self.sink.writer(writer);
        self
    }

    #[must_use]
    pub fn done(mut self) -> LoggerBuilder {
        self.parent.sinks.push(Box::new(self.sink));
        self.parent
    }
}

pub struct FileBuilder {
    parent: LoggerBuilder,
    sink: FileSink,
}

impl FileBuilder {
    #[must_use]
    pub fn level(mut self, level: Level) -> Self {
        self.sink = self.sink.level(level);
        self
    }

    #[must_use]
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.sink = self.sink.rotation(rotation);
        self
    }

    #[must_use]
    pub fn encoder(mut self, encoder: Encoder) -> Self {
        self.sink = self.sink.encoder(encoder);
        self
    }

    #[must_use]
    pub fn done(mut self) -> LoggerBuilder {
        self.parent.sinks.push(Box::new(self.sink));
        self.parent
    }
}
