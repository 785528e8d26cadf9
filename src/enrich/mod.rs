//! Post-hoc transaction-metadata enrichment.
//!
//! Optional step between loading and aggregation: resolves each record's
//! originating address from an external index so the aggregator can
//! produce the grouped top-N view.

pub mod client;
pub mod types;

// Re-export main types and functions
pub use client::{enrich_records, EnrichClient, EnrichStats};
pub use types::{LookupRequest, LookupResponse, TransactionMeta};
