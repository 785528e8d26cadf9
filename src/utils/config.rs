//! Configuration and constants for the CLI.

use std::time::Duration;

/// Default timeout for enrichment service requests
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

// Constants for the ModExp pricing formulas.
// Legacy = EIP-2565 (current mainnet), proposed = EIP-7883.
pub const LEGACY_FLOOR_GAS: u64 = 200;
pub const PROPOSED_FLOOR_GAS: u64 = 500;
pub const LEGACY_LONG_EXP_MULTIPLIER: u64 = 8;
pub const PROPOSED_LONG_EXP_MULTIPLIER: u64 = 16;

/// Operand bytes per pricing word (the formula's own word, not a machine word)
pub const BYTES_PER_WORD: u64 = 8;

/// Exponent lengths at or below this use the short-exponent iteration rule
pub const SHORT_EXPONENT_BYTES: u64 = 32;

/// Bits of the exponent considered by the long-exponent iteration rule
pub const EXPONENT_HEAD_BITS: usize = 256;

// Aggregation defaults
pub const DEFAULT_SIZE_THRESHOLD: u64 = 32;
pub const DEFAULT_TOP_GROUPS: usize = 20;

/// Percentile ranks reported for cost deltas (restricted to delta > 0)
pub const DELTA_PERCENTILE_RANKS: &[u8] = &[10, 25, 50, 75, 90, 95, 99];

/// Percentile ranks reported for cost ratios (restricted to delta > 0)
pub const RATIO_PERCENTILE_RANKS: &[u8] = &[50, 75, 90, 95, 99];

/// Maximum number of validation mismatches kept as samples in the report
pub const MISMATCH_SAMPLE_LIMIT: usize = 10;

/// Maximum transaction ids per enrichment lookup request
pub const DEFAULT_TX_BATCH_SIZE: usize = 500;
