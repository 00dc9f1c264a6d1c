// logsift - app/scan.rs
//
// Path-level scan operations. Owns all filesystem access: opens the input,
// creates the output, wires buffered streams into the core partitioner, and
// maps OS errors onto the typed error taxonomy with path context.
//
// The input is opened before the output is created, so a missing input never
// leaves a stray empty output file behind.

use crate::core::model::{DiscoverySummary, FilterStats};
use crate::core::partition;
use crate::util::constants;
use crate::util::error::{Result, SiftError, StreamError};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Scan `path` once and return every distinct source identifier found, with
/// per-source statistics.
///
/// An input containing zero boundary lines yields an empty summary, not an
/// error.
pub fn scan_sources(path: &Path) -> Result<DiscoverySummary> {
    let file = File::open(path).map_err(|source| SiftError::InputNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::with_capacity(constants::READ_BUFFER_SIZE, file);

    tracing::debug!(file = %path.display(), "Discovery scan started");

    partition::discover_sources(reader).map_err(|source| SiftError::InputRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Copy the entries attributed to `target` from `input` into `output`.
///
/// The destination is created fresh (overwrite semantics; no append). A
/// target that never appears yields a correctly created, empty output file
/// and a zero count -- disambiguating a typo from a legitimately quiet
/// source is the caller's job, via [`scan_sources`].
pub fn filter_to_path(input: &Path, output: &Path, target: &str) -> Result<FilterStats> {
    let infile = File::open(input).map_err(|source| SiftError::InputNotFound {
        path: input.to_path_buf(),
        source,
    })?;
    let reader = BufReader::with_capacity(constants::READ_BUFFER_SIZE, infile);

    let outfile = File::create(output).map_err(|source| SiftError::OutputUnwritable {
        path: output.to_path_buf(),
        operation: "create",
        source,
    })?;
    let writer = BufWriter::with_capacity(constants::WRITE_BUFFER_SIZE, outfile);

    tracing::debug!(
        input = %input.display(),
        output = %output.display(),
        database = target,
        "Filter pass started"
    );

    // filter_entries flushes the writer before returning; both handles are
    // closed on every exit path when they drop here.
    partition::filter_entries(reader, writer, target).map_err(|e| match e {
        StreamError::Read(source) => SiftError::InputRead {
            path: input.to_path_buf(),
            source,
        },
        StreamError::Write(source) => SiftError::OutputUnwritable {
            path: output.to_path_buf(),
            operation: "write",
            source,
        },
    })
}
