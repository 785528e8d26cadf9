//! Output writers for impact reports.
//!
//! This module handles writing results to disk in various formats:
//! - JSON reports (machine-readable, versioned schema)
//! - CSV exports (summary key/values and top-group tables)
//! - Markdown reports (human-readable)

pub mod csv;
pub mod json;
pub mod report;

// Re-export main functions
pub use csv::{write_groups_csv, write_summary_csv};
pub use json::{read_report, write_report};
pub use report::write_markdown;
