//! `logship [--config PATH] [--level LEVEL] [-f key=value]... [MESSAGE...]`
//!
//! Without a message, every non-empty stdin line becomes one record, so the
//! binary can sit at the end of a pipe.

use clap::Parser;
use logship::cli::{Cli, run};
use std::process::ExitCode;

fn main() -> ExitCode {
    run(Cli::parse())
}
