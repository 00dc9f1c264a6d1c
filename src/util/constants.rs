// logsift - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "logsift";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Stream I/O
// =============================================================================

/// Buffer size in bytes for the input reader.
pub const READ_BUFFER_SIZE: usize = 64 * 1024; // 64 KB

/// Buffer size in bytes for the output writer.
pub const WRITE_BUFFER_SIZE: usize = 64 * 1024; // 64 KB

/// Initial capacity of the per-line scratch buffer.
pub const LINE_BUFFER_CAPACITY: usize = 4 * 1024; // 4 KB

/// Capacity above which the per-line scratch buffer is reallocated.
///
/// A single pathological line (binary junk, a megabyte-long wrapped message)
/// grows the buffer to that line's full length. Releasing the allocation once
/// the line has been processed keeps steady-state memory bounded by the
/// threshold rather than by the worst line seen.
pub const LINE_BUFFER_SHRINK_THRESHOLD: usize = 1024 * 1024; // 1 MB

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Maximum length of a log line included in debug output.
/// Prevents accidental exposure of sensitive data in long lines.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 200;
