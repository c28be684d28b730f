//! Result Aggregator (§4.6): restores input order from the coordinator's
//! unordered `MatchResult` stream and tallies a `Summary`.
//!
//! Pure given its input slice — re-running on the same `MatchResult`s always
//! produces the same ordered list and the same counts.

use crate::types::{MatchResult, Summary};

/// Sorts `results` by each entry's `sequence` (restoring input order) and
/// tallies a `Summary` alongside. Idempotent: re-sorting an already-sorted,
/// already-tallied input changes nothing.
pub fn aggregate(mut results: Vec<MatchResult>) -> (Vec<MatchResult>, Summary) {
    results.sort_by_key(|r| r.sequence);

    let mut summary = Summary::default();
    for result in &results {
        summary.record(result.status);
    }

    (results, summary)
}
