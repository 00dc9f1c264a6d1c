// logsift - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation. All errors preserve the causal
// chain for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all logsift operations.
///
/// There are deliberately few variants: malformed or non-matching log lines
/// are a normal input shape (continuation lines) and are handled by the
/// classifier's fallback, never by an error. Only I/O failures are fatal.
#[derive(Debug)]
pub enum SiftError {
    /// The input path does not resolve to a readable stream.
    /// Surfaced immediately; no partial output is produced.
    InputNotFound { path: PathBuf, source: io::Error },

    /// The input stream failed mid-scan (disk error, truncated mount).
    InputRead { path: PathBuf, source: io::Error },

    /// The destination cannot be created, written, or flushed. Any partially
    /// written output is not guaranteed clean and should be treated as
    /// invalid by the caller.
    OutputUnwritable {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for SiftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputNotFound { path, source } => {
                write!(f, "Cannot open input file '{}': {source}", path.display())
            }
            Self::InputRead { path, source } => {
                write!(f, "Error reading '{}': {source}", path.display())
            }
            Self::OutputUnwritable {
                path,
                operation,
                source,
            } => write!(
                f,
                "Cannot {operation} output file '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for SiftError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InputNotFound { source, .. } => Some(source),
            Self::InputRead { source, .. } => Some(source),
            Self::OutputUnwritable { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Stream errors (core layer)
// ---------------------------------------------------------------------------

/// I/O failure inside a core stream operation.
///
/// The core layer works on `BufRead`/`Write` trait objects and knows nothing
/// about paths; it only records which side of the copy failed. The app layer
/// maps these onto `SiftError` variants carrying the offending path.
#[derive(Debug)]
pub enum StreamError {
    /// Reading the next line from the input failed.
    Read(io::Error),

    /// Writing a captured line to the output failed.
    Write(io::Error),
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(source) => write!(f, "read error: {source}"),
            Self::Write(source) => write!(f, "write error: {source}"),
        }
    }
}

impl std::error::Error for StreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read(source) | Self::Write(source) => Some(source),
        }
    }
}

/// Convenience type alias for logsift results.
pub type Result<T> = std::result::Result<T, SiftError>;
