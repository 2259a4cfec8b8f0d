//! # puzzle
//!
//! Command-line front end for the logic-puzzle solver. It reads one puzzle
//! file of plain English sentences, works out which people, jobs and house
//! colors go together, and answers the questions at the end of the file.
//!
//! ## Usage
//!
//! ```sh
//! puzzle [OPTIONS] <PUZZLE_FILE>
//! ```
//!
//! Without a file a short usage message with sample puzzles is printed.
//!
//! ## Options
//!
//! -   `-d, --debug`: Debug logging on stderr (`RUST_LOG` overrides it).
//! -   `-s, --stats`: Print solving statistics after the answers.
//! -   `--depth <N>`: Levels of case splitting to try (default: `1`).
//! -   `--parallel`: Evaluate case-split hypotheses on a thread pool.
//! -   `--completions <SHELL>`: Print a shell completion script.
//!
//! ## Output
//!
//! The numbered assertions, a blank line, then either `That's impossible.`
//! or each question (`Q: ...`) followed by its answer (`A: ...`). Malformed
//! puzzles print `Error: <message>` on stderr and exit with status 1.

use crate::command_line::cli::Cli;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod command_line;

/// Global allocator using `tikv-jemallocator`, which also backs the memory
/// figures in the statistics table.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.common.debug);
    command_line::cli::run(&cli)
}
