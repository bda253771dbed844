#![forbid(unsafe_code)]

//! `logship` - structured logging with batched delivery to a remote log service.
//!
//! A [`Logger`] fans each record out to its sinks:
//! - terminal (human-readable, colored)
//! - rotating file (JSON lines, optional gzip of rotated files)
//! - remote (entries buffered and shipped in batches by a background worker)
//!
//! Each sink has its own severity threshold. The remote sink flushes when its
//! buffer reaches `batch_size`, on a fixed interval, and once more on close.
//!
//! # Example
//!
//! ```
//! use logship::{Field, Level, Logger};
//!
//! let logger = Logger::builder()
//!     .level(Level::Debug)
//!     .terminal()
//!         .colors(false)
//!         .done()
//!     .build();
//!
//! logger.info("service started");
//! logger.warn_with("slow request", vec![Field::new("ms", 1250)]);
//! logger.close().unwrap();
//! ```
//!
//! # Features
//!
//! - `cli` (default): the `logship` binary

pub mod config;
pub mod encode;
pub mod error;
pub mod internal;
pub mod level;
pub mod logger;
pub mod record;
pub mod shipper;
pub mod sink;

#[cfg(feature = "cli")]
pub mod cli;

pub use config::Config;
pub use error::Error;
pub use level::{Level, ParseLevelError};
pub use logger::{Logger, LoggerBuilder};
pub use record::{Field, LogRecord};
pub use shipper::{BatchShipper, LogTransport, ShipperOptions, ShipperStats};
pub use sink::{FileSink, Multiplexer, RemoteSink, Rotation, Sink, TerminalSink};
