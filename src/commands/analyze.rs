//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Loads call-record batches from the data directory
//! 2. Optionally enriches records with transaction metadata
//! 3. Runs the impact aggregation
//! 4. Writes JSON, CSV and markdown outputs

use crate::aggregator::{analyze_impact, AggregationConfig, ImpactReport};
use crate::enrich::{enrich_records, EnrichClient};
use crate::loader::load_call_records;
use crate::output::{write_groups_csv, write_markdown, write_report, write_summary_csv};
use crate::utils::config::{DEFAULT_SIZE_THRESHOLD, DEFAULT_TOP_GROUPS};
use anyhow::{Context, Result};
use log::{info, warn};
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Directory containing per-block call-record batch files
    pub data_dir: PathBuf,

    /// Output directory for the report files
    pub output_dir: PathBuf,

    /// Optional cap on the number of batch files (newest blocks first)
    pub limit: Option<usize>,

    /// Operand size threshold for the oversize buckets
    pub size_threshold: u64,

    /// Number of groups in the top-impacted view
    pub top_groups: usize,

    /// Enrichment service URL (None = skip enrichment)
    pub enrich_url: Option<String>,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("analysis_output"),
            limit: None,
            size_threshold: DEFAULT_SIZE_THRESHOLD,
            top_groups: DEFAULT_TOP_GROUPS,
            enrich_url: None,
            print_summary: false,
        }
    }
}

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Load failures (missing directory, no valid records)
/// * Enrichment failures when an enrichment URL was given
/// * Aggregation and file write errors
pub fn execute_analyze(args: AnalyzeArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Starting analysis of {}", args.data_dir.display());

    // Step 1: Load call records
    info!("Step 1/4: Loading call records...");
    let mut outcome = load_call_records(&args.data_dir, args.limit)
        .context("Failed to load call records")?;

    if !outcome.rejected.is_empty() {
        warn!(
            "{} records rejected during validation (first: {} in {})",
            outcome.rejected.len(),
            outcome.rejected[0].index,
            outcome.rejected[0].file
        );
    }

    // Step 2: Enrich with transaction metadata (if requested)
    if let Some(url) = &args.enrich_url {
        info!("Step 2/4: Enriching with transaction metadata...");
        let client = EnrichClient::new(url).context("Failed to create enrichment client")?;
        let stats = enrich_records(&mut outcome.records, &client)
            .context("Failed to enrich call records")?;
        info!("Enriched {} records ({} missing)", stats.matched, stats.missing);
    } else {
        info!("Step 2/4: Skipping enrichment (no service URL given)");
    }

    // Step 3: Aggregate
    info!("Step 3/4: Running impact aggregation...");
    let config = AggregationConfig {
        size_threshold: args.size_threshold,
        top_groups: args.top_groups,
    };
    let report = analyze_impact(&outcome.records, &config)
        .context("Failed to aggregate impact statistics")?;

    // Step 4: Write outputs
    info!("Step 4/4: Writing output files...");
    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Cannot create output directory {}", args.output_dir.display()))?;

    let json_path = args.output_dir.join("impact_report.json");
    write_report(&report, &json_path).context("Failed to write JSON report")?;
    info!("✓ Report written to: {}", json_path.display());

    let summary_path = args.output_dir.join("summary_stats.csv");
    write_summary_csv(&report, &summary_path).context("Failed to write summary CSV")?;
    info!("✓ Summary written to: {}", summary_path.display());

    if !report.top_groups.is_empty() {
        let groups_path = args.output_dir.join("top_impacted_addresses.csv");
        write_groups_csv(&report, &groups_path).context("Failed to write groups CSV")?;
        info!("✓ Top groups written to: {}", groups_path.display());
    }

    let md_path = args.output_dir.join("impact_report.md");
    write_markdown(&report, &md_path).context("Failed to write markdown report")?;
    info!("✓ Markdown report written to: {}", md_path.display());

    if args.print_summary {
        print_summary(&report);
    }

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

/// Print a text summary to stdout
///
/// **Private** - internal helper for execute_analyze
fn print_summary(report: &ImpactReport) {
    let pop = &report.population;
    println!("\n{}", "=".repeat(80));
    println!("IMPACT SUMMARY");
    println!("{}", "=".repeat(80));
    println!("Calls analyzed:     {}", pop.total_calls);
    println!("Blocks:             {} to {}", pop.first_block, pop.last_block);
    println!(
        "Calls made pricier: {} ({:.1}%)",
        pop.calls_with_increase, pop.pct_calls_affected
    );
    println!("Mean increase:      {:.0} gas", pop.mean_delta);
    println!("Total extra gas:    {}", pop.total_delta);
    if report.validation.mismatch_count > 0 {
        println!(
            "WARNING: {} calls disagree with recorded on-chain costs",
            report.validation.mismatch_count
        );
    }
    println!("{}", "=".repeat(80));
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.data_dir.as_os_str().is_empty() {
        anyhow::bail!("Data directory cannot be empty");
    }

    if let Some(url) = &args.enrich_url {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            anyhow::bail!("Enrichment URL must start with http:// or https://");
        }
    }

    if args.top_groups == 0 {
        anyhow::bail!("top_groups must be greater than 0");
    }

    if args.top_groups > 1000 {
        anyhow::bail!("top_groups is too large (max 1000)");
    }

    if let Some(0) = args.limit {
        anyhow::bail!("limit must be greater than 0");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_args_valid() {
        let args = AnalyzeArgs::default();
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_bad_enrich_url() {
        let args = AnalyzeArgs {
            enrich_url: Some("ftp://somewhere".to_string()),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_zero_top_groups() {
        let args = AnalyzeArgs { top_groups: 0, ..Default::default() };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_zero_limit() {
        let args = AnalyzeArgs { limit: Some(0), ..Default::default() };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_huge_top_groups() {
        let args = AnalyzeArgs { top_groups: 2000, ..Default::default() };
        assert!(validate_args(&args).is_err());
    }
}
