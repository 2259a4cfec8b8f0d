#![allow(clippy::cast_precision_loss)]

use clap::{Args, CommandFactory, Parser};
use logic_puzzle::error::PuzzleError;
use logic_puzzle::puzzle::Puzzle;
use logic_puzzle::solver::{SearchConfig, SolutionStats, Solver};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tikv_jemalloc_ctl::{epoch, stats};
use tracing::debug;

/// Printed when the program is run without a puzzle.
pub(crate) const USAGE: &str = "\
This program can solve logic puzzles.
Try it out on a puzzle formatted like any of these:

Sue lives around here. There is a brown house.
The professor lives around here.
What do you know about Sue?

or

John is not the carpenter.
The plumber lives in the blue house.
John lives in the yellow house.
Mary does not live in the blue house.
Tom lives around here.
The architect lives around here.
What do you know about John? What do you know about Mary?
What do you know about Tom?

or

Jack lives in the blue house.
Mary does not live in the blue house.
The mechanic lives around here.
There is a red house. The architect lives around here.
The sailor lives around here.
Who is the mechanic? What do you know about Jack?
What do you know about Mary?";

/// Defines the command-line interface for the puzzle solver.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(name = "puzzle", version, about = "Solves who-lives-where logic puzzles")]
pub(crate) struct Cli {
    /// The puzzle file to solve. Exactly one is accepted; with none, a usage
    /// message is printed.
    pub paths: Vec<PathBuf>,

    /// Print a shell completion script and exit.
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<clap_complete::Shell>,

    /// Common solver options.
    #[command(flatten)]
    pub common: CommonOptions,
}

/// Options that tune solving and reporting.
#[derive(Args, Debug, Clone)]
pub(crate) struct CommonOptions {
    /// Enable debug logging on stderr. `RUST_LOG` takes precedence.
    #[arg(short, long, default_value_t = false)]
    pub(crate) debug: bool,

    /// Print solving statistics after the answers.
    #[arg(short, long, default_value_t = false)]
    pub(crate) stats: bool,

    /// Levels of case splitting to attempt when propagation stalls.
    #[arg(long, default_value_t = 1)]
    pub(crate) depth: usize,

    /// Evaluate case-split hypotheses in parallel.
    #[arg(long, default_value_t = false)]
    pub(crate) parallel: bool,
}

impl CommonOptions {
    pub(crate) const fn search_config(&self) -> SearchConfig {
        SearchConfig {
            depth: self.depth,
            parallel: self.parallel,
        }
    }
}

/// Dispatches a parsed command line.
pub(crate) fn run(cli: &Cli) -> ExitCode {
    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "puzzle", &mut std::io::stdout());
        return ExitCode::SUCCESS;
    }

    match cli.paths.as_slice() {
        [] => {
            println!("{USAGE}");
            ExitCode::SUCCESS
        }
        [path] => match solve_file(path, &cli.common) {
            Ok(()) => ExitCode::SUCCESS,
            Err(message) => {
                eprintln!("Error: {message}");
                ExitCode::FAILURE
            }
        },
        _ => {
            eprintln!("Error: too many arguments");
            println!("{USAGE}");
            ExitCode::FAILURE
        }
    }
}

/// Parses, solves and reports one puzzle file.
///
/// # Errors
///
/// A user-facing message if the file is missing or the puzzle is malformed.
pub(crate) fn solve_file(path: &Path, common: &CommonOptions) -> Result<(), String> {
    let time = Instant::now();
    let puzzle = match Puzzle::from_file(path) {
        Ok(puzzle) => puzzle,
        Err(PuzzleError::Io(e)) if e.kind() == ErrorKind::NotFound => {
            return Err(format!("file {} not found", path.display()));
        }
        Err(e) => return Err(e.to_string()),
    };
    let parse_time = time.elapsed();

    let time = Instant::now();
    let mut solver = Solver::new();
    puzzle.inform(&mut solver, &common.search_config());
    let elapsed = time.elapsed();
    debug!(path = %path.display(), ?elapsed, "puzzle solved");

    print!("{}", puzzle.report(&solver));

    if common.stats {
        let (allocated, resident) = memory_usage().unwrap_or_default();
        print_stats(parse_time, elapsed, &solver, &solver.stats(), allocated, resident);
    }
    Ok(())
}

/// Allocated and resident memory in MiB, as reported by jemalloc.
fn memory_usage() -> Option<(f64, f64)> {
    epoch::advance().ok()?;
    let allocated = stats::allocated::mib().ok()?.read().ok()?;
    let resident = stats::resident::mib().ok()?.read().ok()?;
    Some((
        allocated as f64 / (1024.0 * 1024.0),
        resident as f64 / (1024.0 * 1024.0),
    ))
}

/// Helper function to print a single statistic line in a formatted table row.
pub(crate) fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// Helper function to print a statistic line that includes a rate (value/second).
pub(crate) fn stat_line_with_rate(label: &str, value: usize, elapsed: f64) {
    let rate = if elapsed > 0.0 {
        value as f64 / elapsed
    } else {
        0.0
    };
    println!("|  {label:<20} {value:>12} ({rate:>9.0}/sec)  |");
}

/// Prints a summary of problem and search statistics.
pub(crate) fn print_stats(
    parse_time: Duration,
    elapsed: Duration,
    solver: &Solver,
    s: &SolutionStats,
    allocated: f64,
    resident: f64,
) {
    let elapsed_secs = elapsed.as_secs_f64();

    println!("\n=======================[ Problem Statistics ]=========================");
    stat_line("Parse time (s)", format!("{:.3}", parse_time.as_secs_f64()));
    stat_line("Complexity", solver.complexity());
    stat_line("Named people", solver.people().named());
    stat_line("Named jobs", solver.jobs().named());
    stat_line("Named colors", solver.colors().named());

    println!("========================[ Search Statistics ]========================");
    stat_line("Propagation passes", s.passes);
    stat_line_with_rate("Propagations", s.propagations, elapsed_secs);
    stat_line("Associations", s.associations);
    stat_line("Disassociations", s.disassociations);
    stat_line("Hypotheses", s.hypotheses);
    stat_line("Decisions", s.decisions);
    stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
    stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    stat_line("CPU time (s)", format!("{elapsed_secs:.3}"));
    println!("=====================================================================");

    if solver.is_impossible() {
        println!("\nIMPOSSIBLE");
    } else if solver.is_solved() {
        println!("\nSOLVED");
    } else {
        println!("\nUNDETERMINED");
    }
}
