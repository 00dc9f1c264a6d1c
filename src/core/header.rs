// logsift - core/header.rs
//
// Entry boundary classification: decides whether a physical line opens a new
// logical log entry, and parses the header fields when it does.
//
// A line is a boundary iff its leading bytes match the fixed header shape
//
//     YYYY-MM-DD HH:MM:SS,mmm <pid> <severity> <source-id> ...
//
// anchored at byte offset zero. Anything else -- indented traceback frames,
// wrapped SQL, lines that merely contain a header-like string mid-line, even
// a header missing its source-id token -- is a continuation of whatever entry
// is currently open. A false positive splits an entry; a false negative leaks
// another tenant's entry into the current one's continuation, so the pattern
// is deliberately strict about shape and anchoring.

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::bytes::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

/// Anchored header pattern, compiled once.
///
/// Byte-level matching with Unicode classes disabled: `\d`, `\w`, `\s` are
/// ASCII, and `\S`/`[^\r\n]` match arbitrary non-UTF-8 bytes, so undecodable
/// sequences in the identifier or message can never abort classification.
fn header_pattern() -> &'static Regex {
    static HEADER_RE: OnceLock<Regex> = OnceLock::new();
    HEADER_RE.get_or_init(|| {
        Regex::new(
            r"(?-u)^(?P<timestamp>\d{4}-\d{2}-\d{2}\s+\d{2}:\d{2}:\d{2},\d{3})\s+(?P<pid>\d+)\s+(?P<level>\w+)\s+(?P<source>\S+)\s*(?P<rest>[^\r\n]*)",
        )
        .expect("header pattern: invalid regex")
    })
}

/// Parsed view of a boundary line's header. Borrows the line it was parsed
/// from; nothing is copied until a caller decides to keep a field.
///
/// Only `source` is semantically required downstream. The remaining fields
/// participate in the boundary test and are otherwise opaque -- `pid` is kept
/// as raw digits rather than an integer so an absurdly long digit run can
/// never demote a line that matched the shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryHeader<'a> {
    /// `YYYY-MM-DD HH:MM:SS,mmm` as written, including any internal run of
    /// whitespace between date and time.
    pub timestamp: &'a [u8],

    /// Process id digits.
    pub pid: &'a [u8],

    /// Severity token (INFO, WARNING, ...), taken verbatim.
    pub level: &'a [u8],

    /// Source identifier: the first non-whitespace run after the severity
    /// token, taken verbatim with no further character-set validation.
    pub source: &'a [u8],

    /// Message remainder, up to but excluding the line terminator.
    pub rest: &'a [u8],
}

impl<'a> EntryHeader<'a> {
    /// Parse a physical line (terminator included or not) as an entry header.
    ///
    /// Returns `None` for continuation lines. This is the single parse behind
    /// both classification views: `is_boundary` is `parse(..).is_some()`, and
    /// source-id extraction is the `source` field, so extraction can never
    /// fail on a line that passed the boundary test.
    pub fn parse(line: &'a [u8]) -> Option<EntryHeader<'a>> {
        let caps = header_pattern().captures(line)?;
        Some(EntryHeader {
            timestamp: caps.name("timestamp").map(|m| m.as_bytes())?,
            pid: caps.name("pid").map(|m| m.as_bytes())?,
            level: caps.name("level").map(|m| m.as_bytes())?,
            source: caps.name("source").map(|m| m.as_bytes())?,
            rest: caps.name("rest").map(|m| m.as_bytes()).unwrap_or(b""),
        })
    }

    /// The source identifier decoded for display and aggregation keys.
    /// Invalid UTF-8 is replaced, never rejected.
    pub fn source_lossy(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.source)
    }

    /// Parse the header timestamp as a UTC instant.
    ///
    /// The comma millisecond separator is swapped for a dot so chrono's `%.f`
    /// specifier accepts it, and the date/time whitespace run is collapsed to
    /// a single space. Returns `None` for calendar-invalid values (month 13,
    /// second 61) -- shape already satisfied the boundary test, so a bad
    /// calendar value degrades the per-source time range, not classification.
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        let raw = std::str::from_utf8(self.timestamp).ok()?;
        let joined = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        let normalised = joined.replace(',', ".");
        NaiveDateTime::parse_from_str(&normalised, "%Y-%m-%d %H:%M:%S%.f")
            .ok()
            .map(|ndt| ndt.and_utc())
    }
}

/// Whether `line` opens a new logical log entry.
///
/// Pure function of the line's bytes; a convenience view over
/// [`EntryHeader::parse`].
pub fn is_boundary(line: &[u8]) -> bool {
    EntryHeader::parse(line).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDARY: &[u8] = b"2024-01-15 14:30:22,123 4242 INFO vysion1 werkzeug: GET /web 200\n";

    #[test]
    fn test_boundary_basic() {
        assert!(is_boundary(BOUNDARY));
    }

    #[test]
    fn test_field_extraction() {
        let header = EntryHeader::parse(BOUNDARY).expect("boundary line should parse");
        assert_eq!(header.timestamp, b"2024-01-15 14:30:22,123");
        assert_eq!(header.pid, b"4242");
        assert_eq!(header.level, b"INFO");
        assert_eq!(header.source, b"vysion1");
        assert_eq!(header.rest, b"werkzeug: GET /web 200");
    }

    #[test]
    fn test_multiple_spaces_between_fields() {
        let line = b"2024-01-15  14:30:22,123   99   WARNING   db_main   message\n";
        let header = EntryHeader::parse(line).expect("whitespace runs are legal separators");
        assert_eq!(header.source, b"db_main");
    }

    #[test]
    fn test_anchoring_rejects_leading_whitespace() {
        assert!(!is_boundary(
            b" 2024-01-15 14:30:22,123 4242 INFO vysion1 msg\n"
        ));
        assert!(!is_boundary(
            b"\t2024-01-15 14:30:22,123 4242 INFO vysion1 msg\n"
        ));
    }

    /// A header-like string embedded mid-line must not classify as a boundary:
    /// the pattern is anchored at position zero only.
    #[test]
    fn test_embedded_header_is_not_boundary() {
        assert!(!is_boundary(
            b"retrying request from 2024-01-15 14:30:22,123 4242 INFO other msg\n"
        ));
    }

    /// The header shape without a source-id token is NOT a boundary; it falls
    /// through to continuation handling, so extraction can never fail on a
    /// line that passed the test.
    #[test]
    fn test_header_without_source_token_is_continuation() {
        assert!(!is_boundary(b"2024-01-15 14:30:22,123 4242 INFO\n"));
        assert!(!is_boundary(b"2024-01-15 14:30:22,123 4242 INFO \n"));
    }

    #[test]
    fn test_malformed_timestamps_rejected() {
        // Slash-separated date
        assert!(!is_boundary(b"2024/01/15 14:30:22,123 4242 INFO db msg\n"));
        // Dot milliseconds
        assert!(!is_boundary(b"2024-01-15 14:30:22.123 4242 INFO db msg\n"));
        // Two-digit milliseconds
        assert!(!is_boundary(b"2024-01-15 14:30:22,12 4242 INFO db msg\n"));
        // Missing time
        assert!(!is_boundary(b"2024-01-15 4242 INFO db msg\n"));
    }

    #[test]
    fn test_non_numeric_pid_rejected() {
        assert!(!is_boundary(b"2024-01-15 14:30:22,123 pid INFO db msg\n"));
    }

    #[test]
    fn test_continuation_lines_rejected() {
        assert!(!is_boundary(b"Traceback (most recent call last):\n"));
        assert!(!is_boundary(b"  File \"/usr/lib/odoo/http.py\", line 42\n"));
        assert!(!is_boundary(b"ValueError: bad input\n"));
        assert!(!is_boundary(b"\n"));
        assert!(!is_boundary(b""));
    }

    #[test]
    fn test_crlf_terminator() {
        let line = b"2024-01-15 14:30:22,123 4242 INFO vysion1 msg\r\n";
        let header = EntryHeader::parse(line).expect("CRLF line should parse");
        assert_eq!(header.rest, b"msg");
    }

    #[test]
    fn test_line_without_terminator() {
        let header = EntryHeader::parse(b"2024-01-15 14:30:22,123 4242 INFO vysion1 msg")
            .expect("unterminated final line should parse");
        assert_eq!(header.source, b"vysion1");
    }

    /// Identifiers are any non-whitespace run -- punctuation and non-UTF-8
    /// bytes included.
    #[test]
    fn test_source_id_character_set_is_unrestricted() {
        let header = EntryHeader::parse(b"2024-01-15 14:30:22,123 1 INFO prod-db.eu_01? msg\n")
            .expect("punctuated identifier should parse");
        assert_eq!(header.source, b"prod-db.eu_01?");

        let raw = b"2024-01-15 14:30:22,123 1 INFO db\xff\xfe msg\n";
        let header = EntryHeader::parse(raw).expect("non-UTF-8 identifier should parse");
        assert_eq!(header.source, b"db\xff\xfe");
        assert_eq!(header.source_lossy(), "db\u{fffd}\u{fffd}");
    }

    #[test]
    fn test_header_with_no_message_remainder() {
        let header = EntryHeader::parse(b"2024-01-15 14:30:22,123 4242 INFO vysion1\n")
            .expect("source token alone completes the header");
        assert_eq!(header.source, b"vysion1");
        assert_eq!(header.rest, b"");
    }

    /// Classification is a pure function of the line's content (P1).
    #[test]
    fn test_classification_is_idempotent() {
        for line in [
            BOUNDARY,
            b"  traceback line\n".as_slice(),
            b"2024-01-15 14:30:22,123 4242 INFO\n".as_slice(),
        ] {
            assert_eq!(is_boundary(line), is_boundary(line));
            assert_eq!(EntryHeader::parse(line), EntryHeader::parse(line));
        }
    }

    // -------------------------------------------------------------------------
    // Timestamp parsing
    // -------------------------------------------------------------------------

    #[test]
    fn test_timestamp_utc() {
        let header = EntryHeader::parse(BOUNDARY).unwrap();
        let ts = header.timestamp_utc().expect("well-formed timestamp");
        assert_eq!(
            ts.format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
            "2024-01-15 14:30:22.123"
        );
    }

    #[test]
    fn test_timestamp_utc_collapses_whitespace_run() {
        let header = EntryHeader::parse(b"2024-01-15   14:30:22,123 1 INFO db msg\n").unwrap();
        assert!(header.timestamp_utc().is_some());
    }

    /// Shape-valid but calendar-invalid: still a boundary, timestamp is None.
    #[test]
    fn test_calendar_invalid_timestamp_degrades_gracefully() {
        let line = b"2024-13-99 14:30:22,123 1 INFO db msg\n";
        let header = EntryHeader::parse(line).expect("shape matches, so still a boundary");
        assert!(header.timestamp_utc().is_none());
    }
}
