//! The gas-cost calculation engine.
//!
//! This module is the core of the tool: two pure functions that model the
//! ModExp precompile's metering rules under the current and the proposed
//! pricing. Any deviation here silently invalidates every downstream
//! statistic, so the formulas are pinned by worked vectors in the tests
//! and by the `verify` CLI command.

pub mod model;

// Re-export the two cost functions
pub use model::{legacy_cost, proposed_cost};
