//! Population-level impact aggregation.
//!
//! Consumes a sequence of validated call records, prices every record
//! under both formulas, and derives:
//! - Whole-population statistics (deltas, affected counts, size buckets)
//! - Percentile tables restricted to records that actually get pricier
//! - A validation report comparing the legacy formula to on-chain charges
//! - A grouped top-N view by originating address

use crate::aggregator::groups::{top_group_impacts, GroupImpact};
use crate::aggregator::percentiles::{nearest_rank, percentile_table, Percentile};
use crate::cost::{legacy_cost, proposed_cost};
use crate::loader::CallRecord;
use crate::utils::config::{
    DELTA_PERCENTILE_RANKS, DEFAULT_SIZE_THRESHOLD, DEFAULT_TOP_GROUPS, MISMATCH_SAMPLE_LIMIT,
    RATIO_PERCENTILE_RANKS, SCHEMA_VERSION,
};
use crate::utils::error::AggregateError;
use chrono::Utc;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Both costs and their difference for a single call record
///
/// Derived on demand, never persisted independently of its record.
#[derive(Debug, Clone)]
pub struct CostResult {
    /// Gas under the legacy formula
    pub legacy_cost: u64,

    /// Gas under the proposed formula
    pub proposed_cost: u64,

    /// `proposed - legacy`; zero or positive for the current formulas
    pub cost_delta: i64,

    /// `proposed / legacy`; well-defined because the legacy floor is 200
    pub cost_ratio: f64,
}

/// Price one record under both formulas
///
/// **Public** - the per-record step of the aggregation pipeline
pub fn cost_result(record: &CallRecord) -> CostResult {
    let legacy = legacy_cost(
        record.base_length,
        record.exponent_length,
        record.modulus_length,
        &record.exponent_value,
    );
    let proposed = proposed_cost(
        record.base_length,
        record.exponent_length,
        record.modulus_length,
        &record.exponent_value,
    );
    CostResult {
        legacy_cost: legacy,
        proposed_cost: proposed,
        cost_delta: proposed as i64 - legacy as i64,
        cost_ratio: proposed as f64 / legacy as f64,
    }
}

/// Tunables for the aggregation pass
#[derive(Debug, Clone)]
pub struct AggregationConfig {
    /// Operand lengths strictly above this count toward the oversize buckets
    pub size_threshold: u64,

    /// Number of groups kept in the top-impacted view
    pub top_groups: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            size_threshold: DEFAULT_SIZE_THRESHOLD,
            top_groups: DEFAULT_TOP_GROUPS,
        }
    }
}

/// Top-level impact report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Timestamp when the report was generated
    pub generated_at: String,

    /// Whole-population statistics
    pub population: PopulationStats,

    /// Percentile tables over records with a positive delta
    pub percentiles: PercentileStats,

    /// Legacy-formula vs on-chain-charge validation signal
    pub validation: ValidationReport,

    /// Heaviest-hit group keys, descending by total delta
    pub top_groups: Vec<GroupImpact>,
}

/// Statistics over the entire record population
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationStats {
    /// Number of call records analyzed
    pub total_calls: u64,

    /// Number of distinct enclosing transactions
    pub unique_transactions: u64,

    /// Lowest block seen
    pub first_block: u64,

    /// Highest block seen
    pub last_block: u64,

    /// Sum of legacy costs
    pub total_legacy_gas: u128,

    /// Sum of proposed costs
    pub total_proposed_gas: u128,

    /// Sum of cost deltas
    pub total_delta: i128,

    /// Mean cost delta per call
    pub mean_delta: f64,

    /// Median cost delta (nearest-rank, whole population)
    pub median_delta: i64,

    /// Largest single-call delta
    pub max_delta: i64,

    /// Records whose cost increases under the proposed formula
    pub calls_with_increase: u64,

    /// Percentage of records with an increase
    pub pct_calls_affected: f64,

    /// Per-operand counts of records above the size threshold
    pub oversize: OversizeCounts,
}

/// Counts of records whose operand length exceeds the threshold
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OversizeCounts {
    /// Threshold the counts are relative to, in bytes
    pub threshold: u64,

    /// Records with base length above the threshold
    pub base: u64,

    /// Records with exponent length above the threshold
    pub exponent: u64,

    /// Records with modulus length above the threshold
    pub modulus: u64,
}

/// Percentile tables restricted to records with `cost_delta > 0`
///
/// Zero-delta records are excluded on purpose: they would drag the lower
/// percentiles to zero and hide how bad the impact is when it occurs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PercentileStats {
    /// Number of records with a positive delta
    pub sample_size: u64,

    /// Delta percentiles (nearest-rank)
    pub delta: Vec<Percentile<i64>>,

    /// Ratio percentiles (nearest-rank)
    pub ratio: Vec<Percentile<f64>>,
}

/// Accumulated disagreements between the legacy formula and the chain
///
/// A non-empty report means either a cost-model bug or malformed input;
/// it is surfaced as a warning signal, never thrown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Total number of mismatching records
    pub mismatch_count: u64,

    /// First few mismatches, for triage
    pub samples: Vec<MismatchSample>,
}

/// One record whose computed legacy cost disagrees with the chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MismatchSample {
    /// Enclosing transaction hash
    pub transaction_id: String,

    /// Block the call was included in
    pub block_number: u64,

    /// What the legacy formula says the call should have cost
    pub computed_legacy: u64,

    /// What the network actually charged
    pub recorded: u64,
}

/// Run the full impact aggregation over a record sequence
///
/// **Public** - main aggregation entry point
///
/// # Arguments
/// * `records` - validated call records (any order)
/// * `config` - thresholds and top-N sizing
///
/// # Errors
/// * `AggregateError::EmptyInput` - zero records; the mean of an empty
///   set is undefined, so degenerate statistics are never returned
pub fn analyze_impact(
    records: &[CallRecord],
    config: &AggregationConfig,
) -> Result<ImpactReport, AggregateError> {
    if records.is_empty() {
        return Err(AggregateError::EmptyInput);
    }

    info!("Pricing {} call records under both formulas", records.len());
    let results: Vec<CostResult> = records.iter().map(cost_result).collect();

    let population = population_stats(records, &results, config.size_threshold);
    let percentiles = percentile_stats(&results);
    let validation = validation_report(records, &results);
    let top_groups = top_group_impacts(records, &results, config.top_groups);

    debug!(
        "{} of {} calls get pricier ({:.1}%)",
        population.calls_with_increase, population.total_calls, population.pct_calls_affected
    );

    Ok(ImpactReport {
        version: SCHEMA_VERSION.to_string(),
        generated_at: Utc::now().to_rfc3339(),
        population,
        percentiles,
        validation,
        top_groups,
    })
}

/// Whole-population statistics
///
/// **Private** - internal to analyze_impact
fn population_stats(
    records: &[CallRecord],
    results: &[CostResult],
    size_threshold: u64,
) -> PopulationStats {
    let total_calls = records.len() as u64;

    let unique_transactions = records
        .iter()
        .map(|r| r.transaction_id.as_str())
        .collect::<BTreeSet<_>>()
        .len() as u64;

    let first_block = records.iter().map(|r| r.block_number).min().unwrap_or(0);
    let last_block = records.iter().map(|r| r.block_number).max().unwrap_or(0);

    let total_legacy_gas: u128 = results.iter().map(|r| u128::from(r.legacy_cost)).sum();
    let total_proposed_gas: u128 = results.iter().map(|r| u128::from(r.proposed_cost)).sum();
    let total_delta: i128 = results.iter().map(|r| i128::from(r.cost_delta)).sum();

    let mut deltas: Vec<i64> = results.iter().map(|r| r.cost_delta).collect();
    deltas.sort_unstable();
    let median_delta = nearest_rank(&deltas, 50).unwrap_or(0);
    let max_delta = deltas.last().copied().unwrap_or(0);
    let mean_delta = total_delta as f64 / total_calls as f64;

    let calls_with_increase = results.iter().filter(|r| r.cost_delta > 0).count() as u64;
    let pct_calls_affected = 100.0 * calls_with_increase as f64 / total_calls as f64;

    let oversize = OversizeCounts {
        threshold: size_threshold,
        base: count_over(records, size_threshold, |r| r.base_length),
        exponent: count_over(records, size_threshold, |r| r.exponent_length),
        modulus: count_over(records, size_threshold, |r| r.modulus_length),
    };

    PopulationStats {
        total_calls,
        unique_transactions,
        first_block,
        last_block,
        total_legacy_gas,
        total_proposed_gas,
        total_delta,
        mean_delta,
        median_delta,
        max_delta,
        calls_with_increase,
        pct_calls_affected,
        oversize,
    }
}

/// Count records whose selected operand length exceeds the threshold
///
/// **Private** - internal helper
fn count_over(records: &[CallRecord], threshold: u64, length: impl Fn(&CallRecord) -> u64) -> u64 {
    records.iter().filter(|r| length(r) > threshold).count() as u64
}

/// Percentile tables over the positive-delta subset
///
/// **Private** - internal to analyze_impact
fn percentile_stats(results: &[CostResult]) -> PercentileStats {
    let mut deltas = Vec::new();
    let mut ratios = Vec::new();

    for result in results.iter().filter(|r| r.cost_delta > 0) {
        deltas.push(result.cost_delta);
        if result.legacy_cost == 0 {
            // Unreachable given the 200-gas floor; skip the ratio rather
            // than divide silently.
            warn!("record with zero legacy cost excluded from ratio percentiles");
            continue;
        }
        ratios.push(result.cost_ratio);
    }

    deltas.sort_unstable();
    ratios.sort_by(f64::total_cmp);

    PercentileStats {
        sample_size: deltas.len() as u64,
        delta: percentile_table(&deltas, DELTA_PERCENTILE_RANKS),
        ratio: percentile_table(&ratios, RATIO_PERCENTILE_RANKS),
    }
}

/// Compare computed legacy costs against what the chain charged
///
/// **Private** - internal to analyze_impact
fn validation_report(records: &[CallRecord], results: &[CostResult]) -> ValidationReport {
    let mut mismatch_count = 0u64;
    let mut samples = Vec::new();

    for (record, result) in records.iter().zip(results) {
        if result.legacy_cost != record.recorded_cost {
            mismatch_count += 1;
            if samples.len() < MISMATCH_SAMPLE_LIMIT {
                samples.push(MismatchSample {
                    transaction_id: record.transaction_id.clone(),
                    block_number: record.block_number,
                    computed_legacy: result.legacy_cost,
                    recorded: record.recorded_cost,
                });
            }
        }
    }

    if mismatch_count > 0 {
        warn!(
            "{} calls disagree with the recorded on-chain cost",
            mismatch_count
        );
    }

    ValidationReport {
        mismatch_count,
        samples,
    }
}
