//! ModExp Impact
//!
//! Empirical gas-cost impact analysis for the proposed repricing of the
//! EVM ModExp precompile (EIP-7883 versus the current EIP-2565 rules).
//!
//! The crate replays historical precompile calls through both pricing
//! formulas and aggregates the differences into population statistics,
//! percentile tables and per-address impact views.
//!
//! ## Getting Started
//!
//! Most users should use the CLI:
//!
//! ```bash
//! modexp-impact analyze --data-dir ./data --output-dir ./out
//! modexp-impact verify
//! ```

pub mod aggregator;
pub mod commands;
pub mod cost;
pub mod enrich;
pub mod loader;
pub mod output;
pub mod utils;
