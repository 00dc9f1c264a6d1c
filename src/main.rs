// logsift - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Logging initialisation (debug mode support)
// 3. Mode dispatch: discovery listing vs filter

use clap::Parser;
use logsift::app::scan;
use logsift::core::model::SourceStats;
use logsift::util;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// logsift - Filter multi-tenant server log files by source database.
///
/// Entries may span multiple physical lines (tracebacks, wrapped messages);
/// logsift keeps every continuation line with the entry that opened it, so a
/// filtered file never mixes tenants or truncates a stack trace.
#[derive(Parser, Debug)]
#[command(name = "logsift", version, about)]
struct Cli {
    /// Input log file path.
    #[arg(short = 'i', long = "input")]
    input: PathBuf,

    /// Output log file path (filter mode).
    #[arg(short = 'o', long = "output", required_unless_present = "list")]
    output: Option<PathBuf>,

    /// Database name to filter.
    #[arg(short = 'd', long = "database", required_unless_present = "list")]
    database: Option<String>,

    /// List databases found in the input file and exit.
    #[arg(short = 'l', long = "list")]
    list: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(long = "debug")]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    util::logging::init(cli.debug);

    tracing::debug!(
        version = util::constants::APP_VERSION,
        list = cli.list,
        "logsift starting"
    );

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Operation failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> util::error::Result<ExitCode> {
    if cli.list {
        return list_databases(&cli.input);
    }

    match (cli.output, cli.database) {
        (Some(output), Some(database)) => filter_database(&cli.input, &output, &database),
        _ => {
            // clap's required_unless_present enforces this; keep a readable
            // message rather than a panic if the derive attributes drift.
            eprintln!("Error: --output and --database are required unless --list is given.");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Discovery mode: print every database present in the input, with entry and
/// line counts and the header time range.
fn list_databases(input: &Path) -> util::error::Result<ExitCode> {
    println!("Scanning databases in: {}", input.display());

    let summary = scan::scan_sources(input)?;

    if summary.sources.is_empty() {
        println!("No databases found in log file.");
        return Ok(ExitCode::FAILURE);
    }

    println!();
    println!("Found {} database(s):", summary.sources.len());
    for (name, stats) in &summary.sources {
        println!("  - {name}{}", describe(stats));
    }
    Ok(ExitCode::SUCCESS)
}

/// Filter mode: validate the target against a discovery pass first (a typo'd
/// name would otherwise produce a silently empty output file), then copy its
/// entries to the destination.
fn filter_database(input: &Path, output: &Path, database: &str) -> util::error::Result<ExitCode> {
    let summary = scan::scan_sources(input)?;

    if summary.sources.is_empty() {
        println!("Error: No databases found in log file.");
        return Ok(ExitCode::FAILURE);
    }

    if !summary.sources.contains_key(database) {
        println!("Error: Database '{database}' not found in logs.");
        println!();
        println!("Available databases:");
        for name in summary.source_ids() {
            println!("  - {name}");
        }
        return Ok(ExitCode::FAILURE);
    }

    println!("Filtering logs from database: {database}");
    println!("Input:  {}", input.display());
    println!("Output: {}", output.display());

    let stats = scan::filter_to_path(input, output, database)?;

    println!();
    println!(
        "Success! Wrote {} lines ({} entries) to output file.",
        stats.lines_written, stats.entries_matched
    );
    Ok(ExitCode::SUCCESS)
}

/// One-line statistics suffix for a discovery listing row.
fn describe(stats: &SourceStats) -> String {
    let mut text = format!(": {} entries, {} lines", stats.entries, stats.lines);
    if let (Some(earliest), Some(latest)) = (stats.earliest, stats.latest) {
        let fmt = "%Y-%m-%d %H:%M:%S";
        text.push_str(&format!(
            ", {} .. {}",
            earliest.format(fmt),
            latest.format(fmt)
        ));
    }
    text
}
