//! Impact aggregation over priced call records.
//!
//! This module transforms a sequence of call records into:
//! - Per-record cost results under both pricing formulas
//! - Whole-population impact statistics
//! - Nearest-rank percentile tables for the affected subset
//! - A grouped top-N view by originating address

pub mod groups;
pub mod impact;
pub mod percentiles;

// Re-export main types and functions
pub use groups::{top_group_impacts, GroupImpact};
pub use impact::{
    analyze_impact, cost_result, AggregationConfig, CostResult, ImpactReport, MismatchSample,
    OversizeCounts, PercentileStats, PopulationStats, ValidationReport,
};
pub use percentiles::{nearest_rank, percentile_table, Percentile};
