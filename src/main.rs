//! ModExp Impact CLI
//!
//! Replays historical ModExp precompile calls through the current and the
//! proposed gas-pricing formulas and reports the network-wide impact.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use modexp_impact::commands::{execute_analyze, execute_verify, validate_args, AnalyzeArgs};
use modexp_impact::output::read_report;
use modexp_impact::utils::config::{DEFAULT_SIZE_THRESHOLD, DEFAULT_TOP_GROUPS, SCHEMA_VERSION};

/// ModExp Impact - empirical analysis of the ModExp repricing
#[derive(Parser, Debug)]
#[command(name = "modexp-impact")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a directory of historical call-record batches
    Analyze {
        /// Directory containing per-block call-record JSON files
        #[arg(short, long)]
        data_dir: PathBuf,

        /// Output directory for report files
        #[arg(short, long, default_value = "analysis_output")]
        output_dir: PathBuf,

        /// Limit number of batch files to process (newest blocks first)
        #[arg(long)]
        limit: Option<usize>,

        /// Operand size threshold for the oversize buckets, in bytes
        #[arg(long, default_value_t = DEFAULT_SIZE_THRESHOLD)]
        size_threshold: u64,

        /// Number of entries in the top-impacted-addresses view
        #[arg(long, default_value_t = DEFAULT_TOP_GROUPS)]
        top_groups: usize,

        /// Transaction-metadata lookup endpoint (enables grouped view)
        #[arg(long)]
        enrich_url: Option<String>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Verify both pricing formulas against the reference vectors
    Verify,

    /// Validate a previously written impact report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Analyze {
            data_dir,
            output_dir,
            limit,
            size_threshold,
            top_groups,
            enrich_url,
            summary,
        } => {
            let args = AnalyzeArgs {
                data_dir,
                output_dir,
                limit,
                size_threshold,
                top_groups,
                enrich_url,
                print_summary: summary,
            };

            // Validate args first
            validate_args(&args)?;

            // Execute analysis
            execute_analyze(args)?;
        }

        Commands::Verify => {
            execute_verify()?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Validate an impact report JSON file
///
/// **Private** - internal command implementation
fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(&file_path)?;

    println!("✓ Valid impact report JSON");
    println!("  Version: {}", report.version);
    println!("  Generated: {}", report.generated_at);
    println!("  Calls: {}", report.population.total_calls);
    println!(
        "  Blocks: {} to {}",
        report.population.first_block, report.population.last_block
    );
    println!("  Affected: {:.1}%", report.population.pct_calls_affected);
    println!("  Validation mismatches: {}", report.validation.mismatch_count);
    println!("  Top groups: {}", report.top_groups.len());

    Ok(())
}

/// Display version information
///
/// **Private** - internal command implementation
fn display_version() {
    println!("ModExp Impact v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Empirical gas-cost impact analysis for the ModExp repricing.");
}
