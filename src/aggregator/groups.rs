//! Grouped impact aggregation by originating address.
//!
//! Records carrying a caller (from enrichment or the extractor itself)
//! are rolled up per address; records without one are excluded from the
//! grouped view only, never from the whole-population statistics.

use crate::aggregator::impact::CostResult;
use crate::loader::CallRecord;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Aggregated delta impact for one group key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupImpact {
    /// Group key (originating address)
    pub key: String,

    /// Sum of cost deltas across the group's calls
    pub total_delta: i128,

    /// Mean cost delta per call
    pub mean_delta: f64,

    /// Number of calls in the group
    pub call_count: u64,
}

/// Roll up per-record deltas by caller and keep the heaviest groups
///
/// **Public** - used by the impact aggregator
///
/// # Arguments
/// * `records` - the full record sequence
/// * `results` - per-record cost results, index-aligned with `records`
/// * `top_n` - number of groups to keep (sorted by total delta, descending)
pub fn top_group_impacts(
    records: &[CallRecord],
    results: &[CostResult],
    top_n: usize,
) -> Vec<GroupImpact> {
    let mut sums: HashMap<&str, (i128, u64)> = HashMap::new();
    let mut skipped = 0u64;

    for (record, result) in records.iter().zip(results) {
        match record.caller.as_deref() {
            Some(key) => {
                let entry = sums.entry(key).or_insert((0, 0));
                entry.0 += i128::from(result.cost_delta);
                entry.1 += 1;
            }
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!("{} records lack a group key, excluded from grouped view", skipped);
    }

    let mut groups: Vec<GroupImpact> = sums
        .into_iter()
        .map(|(key, (total_delta, call_count))| GroupImpact {
            key: key.to_string(),
            total_delta,
            mean_delta: total_delta as f64 / call_count as f64,
            call_count,
        })
        .collect();

    // Descending by total delta, key as deterministic tie-break
    groups.sort_by(|a, b| {
        b.total_delta
            .cmp(&a.total_delta)
            .then_with(|| a.key.cmp(&b.key))
    });
    groups.truncate(top_n);
    groups
}
