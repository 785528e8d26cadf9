//! Types for the transaction-metadata lookup API.
//!
//! The enrichment service indexes canonical execution-layer transactions
//! and answers batched lookups by transaction hash within a block range.

use serde::{Deserialize, Serialize};

/// Request body for a batched transaction lookup
#[derive(Debug, Clone, Serialize)]
pub struct LookupRequest {
    /// Lower bound of the block range (inclusive)
    pub from_block: u64,

    /// Upper bound of the block range (inclusive)
    pub to_block: u64,

    /// Transaction hashes to resolve
    pub transactions: Vec<String>,
}

/// Response envelope from the lookup endpoint
#[derive(Debug, Deserialize)]
pub struct LookupResponse {
    /// Resolved rows; absent hashes are simply missing from the list
    #[serde(default)]
    pub rows: Vec<TransactionMeta>,

    /// Service-level error, if the query failed
    #[serde(default)]
    pub error: Option<ServiceError>,
}

/// Service-level error object
#[derive(Debug, Deserialize)]
pub struct ServiceError {
    pub code: i64,
    pub message: String,
}

/// Metadata for one resolved transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionMeta {
    /// Block the transaction was included in
    pub block_number: u64,

    /// Transaction hash
    #[serde(alias = "tx_hash")]
    pub transaction_id: String,

    /// Sender address
    pub from_address: String,

    /// Recipient address (absent for contract creation)
    #[serde(default)]
    pub to_address: Option<String>,

    /// Effective gas price in wei, when indexed
    #[serde(default)]
    pub gas_price: Option<u64>,
}
