//! Markdown report rendering.
//!
//! Produces the human-readable analysis report: executive summary, key
//! findings, percentile tables and the top-impacted groups.

use crate::aggregator::ImpactReport;
use crate::utils::error::OutputError;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write the markdown analysis report
///
/// **Public** - main entry point for markdown output
pub fn write_markdown(
    report: &ImpactReport,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();
    info!("Writing markdown report to: {}", output_path.display());

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut w = BufWriter::new(file);
    render_markdown(report, &mut w)?;
    w.flush().map_err(OutputError::WriteFailed)?;
    Ok(())
}

/// Render the report body to any writer
///
/// **Private** - separated from file handling for testability
fn render_markdown(report: &ImpactReport, w: &mut impl Write) -> Result<(), OutputError> {
    let pop = &report.population;

    writeln!(w, "# ModExp Repricing Impact Report")?;
    writeln!(w)?;
    writeln!(w, "## Executive Summary")?;
    writeln!(w)?;
    writeln!(
        w,
        "This report analyzes the empirical impact of the proposed ModExp \
         repricing based on {} historical calls across {} transactions \
         (blocks {} to {}).",
        pop.total_calls, pop.unique_transactions, pop.first_block, pop.last_block
    )?;
    writeln!(w)?;
    writeln!(w, "### Key Findings")?;
    writeln!(w)?;
    writeln!(w, "- **Total calls analyzed**: {}", pop.total_calls)?;
    writeln!(
        w,
        "- **Calls with cost increase**: {} ({:.1}%)",
        pop.calls_with_increase, pop.pct_calls_affected
    )?;
    writeln!(w, "- **Average cost increase**: {:.0} gas", pop.mean_delta)?;
    writeln!(w, "- **Median cost increase**: {} gas", pop.median_delta)?;
    writeln!(w, "- **Maximum cost increase**: {} gas", pop.max_delta)?;
    writeln!(w, "- **Total additional gas**: {}", pop.total_delta)?;
    writeln!(w)?;

    writeln!(w, "## Input Size Analysis")?;
    writeln!(w)?;
    writeln!(
        w,
        "Calls with operands over {} bytes (most affected by the repricing):",
        pop.oversize.threshold
    )?;
    writeln!(w)?;
    writeln!(w, "- Base > {} bytes: {} calls", pop.oversize.threshold, pop.oversize.base)?;
    writeln!(
        w,
        "- Exponent > {} bytes: {} calls",
        pop.oversize.threshold, pop.oversize.exponent
    )?;
    writeln!(
        w,
        "- Modulus > {} bytes: {} calls",
        pop.oversize.threshold, pop.oversize.modulus
    )?;
    writeln!(w)?;

    writeln!(w, "## Impact Distribution (affected calls only)")?;
    writeln!(w)?;
    writeln!(
        w,
        "{} calls see an increase; percentiles below exclude unaffected calls.",
        report.percentiles.sample_size
    )?;
    writeln!(w)?;
    writeln!(w, "| Percentile | Delta (gas) |")?;
    writeln!(w, "|-----------:|------------:|")?;
    for entry in &report.percentiles.delta {
        writeln!(w, "| p{} | {} |", entry.rank, entry.value)?;
    }
    writeln!(w)?;
    writeln!(w, "| Percentile | Ratio (proposed / legacy) |")?;
    writeln!(w, "|-----------:|--------------------------:|")?;
    for entry in &report.percentiles.ratio {
        writeln!(w, "| p{} | {:.2}x |", entry.rank, entry.value)?;
    }
    writeln!(w)?;

    writeln!(w, "## Validation")?;
    writeln!(w)?;
    if report.validation.mismatch_count == 0 {
        writeln!(
            w,
            "The legacy formula matches the recorded on-chain cost for every call."
        )?;
    } else {
        writeln!(
            w,
            "**WARNING**: {} calls disagree with the recorded on-chain cost. \
             Sample mismatches:",
            report.validation.mismatch_count
        )?;
        writeln!(w)?;
        writeln!(w, "| Transaction | Block | Computed | Recorded |")?;
        writeln!(w, "|-------------|------:|---------:|---------:|")?;
        for sample in &report.validation.samples {
            writeln!(
                w,
                "| `{}` | {} | {} | {} |",
                sample.transaction_id, sample.block_number, sample.computed_legacy, sample.recorded
            )?;
        }
    }
    writeln!(w)?;

    if !report.top_groups.is_empty() {
        writeln!(w, "## Most Impacted Addresses")?;
        writeln!(w)?;
        writeln!(w, "| Address | Total Increase | Avg Increase | Call Count |")?;
        writeln!(w, "|---------|---------------:|-------------:|-----------:|")?;
        for group in &report.top_groups {
            writeln!(
                w,
                "| `{}` | {} | {:.0} | {} |",
                group.key, group.total_delta, group.mean_delta, group.call_count
            )?;
        }
        writeln!(w)?;
    }

    writeln!(w, "---")?;
    writeln!(
        w,
        "Generated at {} (schema {}).",
        report.generated_at, report.version
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{
        GroupImpact, MismatchSample, OversizeCounts, Percentile, PercentileStats, PopulationStats,
        ValidationReport,
    };

    fn sample_report() -> ImpactReport {
        ImpactReport {
            version: "1.0.0".to_string(),
            generated_at: "2024-01-01T00:00:00Z".to_string(),
            population: PopulationStats {
                total_calls: 10,
                unique_transactions: 8,
                first_block: 100,
                last_block: 900,
                total_legacy_gas: 5000,
                total_proposed_gas: 9000,
                total_delta: 4000,
                mean_delta: 400.0,
                median_delta: 341,
                max_delta: 9557,
                calls_with_increase: 9,
                pct_calls_affected: 90.0,
                oversize: OversizeCounts { threshold: 32, base: 4, exponent: 1, modulus: 4 },
            },
            percentiles: PercentileStats {
                sample_size: 9,
                delta: vec![Percentile { rank: 50, value: 341 }],
                ratio: vec![Percentile { rank: 50, value: 2.0 }],
            },
            validation: ValidationReport {
                mismatch_count: 1,
                samples: vec![MismatchSample {
                    transaction_id: "0xbad".to_string(),
                    block_number: 123,
                    computed_legacy: 341,
                    recorded: 200,
                }],
            },
            top_groups: vec![GroupImpact {
                key: "0xaa".to_string(),
                total_delta: 1000,
                mean_delta: 500.0,
                call_count: 2,
            }],
        }
    }

    #[test]
    fn test_render_contains_key_sections() {
        let mut buf = Vec::new();
        render_markdown(&sample_report(), &mut buf).unwrap();
        let body = String::from_utf8(buf).unwrap();

        assert!(body.contains("# ModExp Repricing Impact Report"));
        assert!(body.contains("**Calls with cost increase**: 9 (90.0%)"));
        assert!(body.contains("| p50 | 341 |"));
        assert!(body.contains("| p50 | 2.00x |"));
        assert!(body.contains("**WARNING**: 1 calls disagree"));
        assert!(body.contains("| `0xaa` | 1000 | 500 | 2 |"));
    }

    #[test]
    fn test_render_clean_validation() {
        let mut report = sample_report();
        report.validation = ValidationReport { mismatch_count: 0, samples: vec![] };

        let mut buf = Vec::new();
        render_markdown(&report, &mut buf).unwrap();
        let body = String::from_utf8(buf).unwrap();
        assert!(body.contains("matches the recorded on-chain cost"));
        assert!(!body.contains("WARNING"));
    }
}
