//! CSV exports for downstream spreadsheet analysis.
//!
//! Two files: a key/value summary of the population statistics and a
//! table of the top-impacted groups.

use crate::aggregator::ImpactReport;
use crate::utils::error::OutputError;
use log::info;
use std::path::Path;

/// Write the population summary as key/value CSV rows
///
/// **Public** - mirrors the shape analysts already consume
pub fn write_summary_csv(
    report: &ImpactReport,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();
    info!("Writing summary CSV to: {}", output_path.display());

    let pop = &report.population;
    let mut writer = csv::Writer::from_path(output_path)?;

    writer.write_record(["statistic", "value"])?;

    let rows: Vec<(&str, String)> = vec![
        ("total_calls", pop.total_calls.to_string()),
        ("unique_transactions", pop.unique_transactions.to_string()),
        ("first_block", pop.first_block.to_string()),
        ("last_block", pop.last_block.to_string()),
        ("total_legacy_gas", pop.total_legacy_gas.to_string()),
        ("total_proposed_gas", pop.total_proposed_gas.to_string()),
        ("total_delta", pop.total_delta.to_string()),
        ("mean_delta", format!("{:.2}", pop.mean_delta)),
        ("median_delta", pop.median_delta.to_string()),
        ("max_delta", pop.max_delta.to_string()),
        ("calls_with_increase", pop.calls_with_increase.to_string()),
        ("pct_calls_affected", format!("{:.2}", pop.pct_calls_affected)),
        ("oversize_base", pop.oversize.base.to_string()),
        ("oversize_exponent", pop.oversize.exponent.to_string()),
        ("oversize_modulus", pop.oversize.modulus.to_string()),
        ("validation_mismatches", report.validation.mismatch_count.to_string()),
    ];

    for (key, value) in rows {
        writer.write_record([key, value.as_str()])?;
    }

    writer.flush().map_err(OutputError::WriteFailed)?;
    Ok(())
}

/// Write the top-impacted groups table
///
/// **Public** - one row per group, descending by total delta
pub fn write_groups_csv(
    report: &ImpactReport,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();
    info!("Writing top groups CSV to: {}", output_path.display());

    let mut writer = csv::Writer::from_path(output_path)?;
    writer.write_record(["address", "total_delta", "mean_delta", "call_count"])?;

    for group in &report.top_groups {
        let total = group.total_delta.to_string();
        let mean = format!("{:.2}", group.mean_delta);
        let count = group.call_count.to_string();
        writer.write_record([group.key.as_str(), total.as_str(), mean.as_str(), count.as_str()])?;
    }

    writer.flush().map_err(OutputError::WriteFailed)?;
    Ok(())
}
