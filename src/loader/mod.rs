//! Call-record loading and boundary validation.
//!
//! This module handles:
//! - Walking a directory of per-block batch files
//! - Deserializing raw records (alias-tolerant field names)
//! - Validating records into typed [`CallRecord`]s
//! - Collecting the full defect list for malformed input

pub mod batch;
pub mod record;

// Re-export main types and functions
pub use batch::{load_call_records, LoadOutcome, RejectedRecord};
pub use record::{CallRecord, RawCallRecord};
