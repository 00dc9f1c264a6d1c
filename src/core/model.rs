// logsift - core/model.rs
//
// Core data model types. Pure data definitions with no I/O.
// These types are the shared vocabulary between the partitioner, the app
// layer, and the CLI.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

// =============================================================================
// Discovery summary
// =============================================================================

/// Per-source statistics accumulated during a discovery scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceStats {
    /// Number of logical entries (boundary lines) attributed to this source.
    pub entries: u64,

    /// Number of physical lines attributed to this source, continuations
    /// included.
    pub lines: u64,

    /// Earliest header timestamp seen for this source, when parseable.
    pub earliest: Option<DateTime<Utc>>,

    /// Latest header timestamp seen for this source, when parseable.
    pub latest: Option<DateTime<Utc>>,
}

/// Result of one discovery pass over a log stream.
///
/// Keys are source identifiers, lossy-decoded for presentation; the map is a
/// `BTreeMap` so iteration yields the lexicographically sorted identifier
/// sequence deterministically. The line counters make the exhaustive-partition
/// invariant checkable: `preamble_lines` plus the per-source `lines` sums
/// equal `total_lines` -- every physical line lands in exactly one bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoverySummary {
    /// Distinct source identifiers with their accumulated statistics.
    pub sources: BTreeMap<String, SourceStats>,

    /// Lines seen before the first boundary; attributed to no source.
    pub preamble_lines: u64,

    /// Total physical lines scanned.
    pub total_lines: u64,
}

impl DiscoverySummary {
    /// Record a boundary line: the source's entry opens here.
    pub fn record_boundary(&mut self, source: &[u8], timestamp: Option<DateTime<Utc>>) {
        self.total_lines += 1;
        let stats = self
            .sources
            .entry(String::from_utf8_lossy(source).into_owned())
            .or_default();
        stats.entries += 1;
        stats.lines += 1;
        if let Some(ts) = timestamp {
            stats.earliest = Some(stats.earliest.map_or(ts, |e| e.min(ts)));
            stats.latest = Some(stats.latest.map_or(ts, |l| l.max(ts)));
        }
    }

    /// Record a continuation line of the entry currently open for `source`.
    pub fn record_continuation(&mut self, source: &[u8]) {
        self.total_lines += 1;
        let key = String::from_utf8_lossy(source);
        if let Some(stats) = self.sources.get_mut(key.as_ref()) {
            stats.lines += 1;
        } else {
            // A continuation is only reported after a boundary opened the
            // entry, so its source is always present already.
            debug_assert!(false, "continuation recorded for unseen source '{key}'");
        }
    }

    /// Record a line seen before the first boundary.
    pub fn record_preamble(&mut self) {
        self.total_lines += 1;
        self.preamble_lines += 1;
    }

    /// The distinct source identifiers, sorted lexicographically.
    pub fn source_ids(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }
}

// =============================================================================
// Filter statistics
// =============================================================================

/// Result of one filter pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    /// Physical lines written to the output, boundary and continuation alike.
    pub lines_written: u64,

    /// Logical entries (boundary lines) that matched the target.
    pub entries_matched: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn test_boundary_accumulates_counts_and_range() {
        let mut summary = DiscoverySummary::default();
        summary.record_boundary(b"dbA", Some(ts(10, 0, 5)));
        summary.record_continuation(b"dbA");
        summary.record_boundary(b"dbA", Some(ts(10, 0, 1)));

        let stats = &summary.sources["dbA"];
        assert_eq!(stats.entries, 2);
        assert_eq!(stats.lines, 3);
        assert_eq!(stats.earliest, Some(ts(10, 0, 1)));
        assert_eq!(stats.latest, Some(ts(10, 0, 5)));
        assert_eq!(summary.total_lines, 3);
    }

    #[test]
    fn test_unparseable_timestamps_leave_range_empty() {
        let mut summary = DiscoverySummary::default();
        summary.record_boundary(b"dbA", None);
        let stats = &summary.sources["dbA"];
        assert_eq!(stats.earliest, None);
        assert_eq!(stats.latest, None);
    }

    #[test]
    fn test_source_ids_sorted() {
        let mut summary = DiscoverySummary::default();
        for id in [b"zz".as_slice(), b"aa", b"mm", b"aa"] {
            summary.record_boundary(id, None);
        }
        assert_eq!(summary.source_ids().collect::<Vec<_>>(), vec!["aa", "mm", "zz"]);
    }

    #[test]
    fn test_preamble_counted_separately() {
        let mut summary = DiscoverySummary::default();
        summary.record_preamble();
        summary.record_preamble();
        summary.record_boundary(b"dbA", None);
        assert_eq!(summary.preamble_lines, 2);
        assert_eq!(summary.total_lines, 3);
    }
}
