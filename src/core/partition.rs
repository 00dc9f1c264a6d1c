// logsift - core/partition.rs
//
// Single-pass stream partitioning over the boundary classifier.
//
// Exactly one piece of state is threaded through the scan: which source the
// current entry is attributed to. Boundary lines are the only transitions;
// continuation lines inherit the open entry's attribution unchanged, which is
// what keeps a stack trace glued to the header that produced it.
//
// Core layer: accepts BufRead/Write trait objects, never touches the
// filesystem directly.

use crate::core::header::EntryHeader;
use crate::core::model::{DiscoverySummary, FilterStats};
use crate::util::constants;
use crate::util::error::StreamError;
use std::io::{self, BufRead, Write};

// =============================================================================
// State machine
// =============================================================================

/// Attribution state of the scan.
///
/// `Idle` is only inhabited before the first boundary line; an explicit
/// variant (rather than a nullable identifier plus a flag) makes "no entry
/// open yet" unrepresentable as anything but itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartitionState {
    /// No entry open yet. Lines seen here are preamble and belong to nobody.
    Idle,

    /// An entry is open, attributed to the contained source identifier
    /// (raw bytes, exactly as they appeared in the boundary header).
    InEntry(Vec<u8>),
}

/// Classification of one physical line relative to the scan state.
#[derive(Debug)]
pub enum LineClass<'a> {
    /// The line opens a new entry; carries its parsed header.
    Boundary(EntryHeader<'a>),

    /// The line continues the currently open entry.
    Continuation,

    /// No entry is open yet; the line belongs to no source.
    Preamble,
}

/// Drives the boundary classifier line-by-line, maintaining the single
/// attribution state. Both operating modes (discover, filter) are thin loops
/// over [`Partitioner::step`], so they cannot disagree on attribution.
#[derive(Debug, Default)]
pub struct Partitioner {
    state: PartitionState,
}

impl Default for PartitionState {
    fn default() -> Self {
        PartitionState::Idle
    }
}

impl Partitioner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify one physical line and apply the transition rule.
    ///
    /// A boundary replaces the attributed source unconditionally -- this is
    /// the only way attribution changes. Non-boundary lines leave the state
    /// untouched.
    pub fn step<'a>(&mut self, line: &'a [u8]) -> LineClass<'a> {
        match EntryHeader::parse(line) {
            Some(header) => {
                match &mut self.state {
                    PartitionState::InEntry(current) => {
                        current.clear();
                        current.extend_from_slice(header.source);
                    }
                    state @ PartitionState::Idle => {
                        *state = PartitionState::InEntry(header.source.to_vec());
                    }
                }
                LineClass::Boundary(header)
            }
            None => match self.state {
                PartitionState::Idle => LineClass::Preamble,
                PartitionState::InEntry(_) => LineClass::Continuation,
            },
        }
    }

    /// The source identifier the current entry is attributed to, or `None`
    /// before the first boundary.
    pub fn current_source(&self) -> Option<&[u8]> {
        match &self.state {
            PartitionState::Idle => None,
            PartitionState::InEntry(source) => Some(source),
        }
    }
}

// =============================================================================
// Line iteration
// =============================================================================

/// Read the next physical line into `buf`, terminator included.
///
/// Returns `Ok(false)` at end of stream. `read_until` keeps the `\n` (and a
/// preceding `\r`) in the buffer, so a later write of the same bytes is
/// byte-faithful; a final unterminated line is returned as-is.
fn read_line<R: BufRead>(input: &mut R, buf: &mut Vec<u8>) -> io::Result<bool> {
    if buf.capacity() > constants::LINE_BUFFER_SHRINK_THRESHOLD {
        *buf = Vec::with_capacity(constants::LINE_BUFFER_CAPACITY);
    } else {
        buf.clear();
    }
    Ok(input.read_until(b'\n', buf)? > 0)
}

// =============================================================================
// Discovery mode
// =============================================================================

/// Scan the stream once and accumulate every distinct source identifier,
/// with per-source entry/line counts and header time range.
///
/// Reaching end-of-stream always succeeds: an input with no boundary lines
/// yields an empty summary (all lines counted as preamble), which is a
/// legitimate result, not an error.
pub fn discover_sources<R: BufRead>(mut input: R) -> io::Result<DiscoverySummary> {
    let mut partitioner = Partitioner::new();
    let mut summary = DiscoverySummary::default();
    let mut line = Vec::with_capacity(constants::LINE_BUFFER_CAPACITY);

    while read_line(&mut input, &mut line)? {
        match partitioner.step(&line) {
            LineClass::Boundary(header) => {
                summary.record_boundary(header.source, header.timestamp_utc());
            }
            LineClass::Continuation => {
                // step() only reports Continuation with an entry open
                if let Some(source) = partitioner.current_source() {
                    summary.record_continuation(source);
                }
            }
            LineClass::Preamble => summary.record_preamble(),
        }
    }

    tracing::debug!(
        sources = summary.sources.len(),
        lines = summary.total_lines,
        preamble = summary.preamble_lines,
        "Discovery scan complete"
    );

    Ok(summary)
}

// =============================================================================
// Filter mode
// =============================================================================

/// Copy to `output` every line of every entry attributed to `target`,
/// byte-for-byte and in input order.
///
/// `capturing == (current source == target)` is recomputed only at boundary
/// transitions; a boundary line belonging to the target is itself written (it
/// is both the trigger and the first captured line of its entry). A target
/// that never appears legitimately yields zero lines written.
pub fn filter_entries<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
    target: &str,
) -> Result<FilterStats, StreamError> {
    let target = target.as_bytes();
    let mut partitioner = Partitioner::new();
    let mut stats = FilterStats::default();
    let mut line = Vec::with_capacity(constants::LINE_BUFFER_CAPACITY);

    loop {
        match read_line(&mut input, &mut line) {
            Ok(true) => {}
            Ok(false) => break,
            Err(source) => return Err(StreamError::Read(source)),
        }

        let opened_entry = matches!(partitioner.step(&line), LineClass::Boundary(_));
        let capturing = partitioner.current_source() == Some(target);
        if capturing {
            output.write_all(&line).map_err(StreamError::Write)?;
            stats.lines_written += 1;
            if opened_entry {
                stats.entries_matched += 1;
            }
        }
    }

    output.flush().map_err(StreamError::Write)?;

    tracing::debug!(
        source = %String::from_utf8_lossy(target),
        lines_written = stats.lines_written,
        entries = stats.entries_matched,
        "Filter pass complete"
    );

    Ok(stats)
}
