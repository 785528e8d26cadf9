//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that reject a single raw call record at the input boundary
#[derive(Error, Debug)]
pub enum InputError {
    #[error("negative {field} length: {value}")]
    NegativeLength { field: &'static str, value: i64 },

    #[error("malformed exponent encoding: {0:?}")]
    MalformedExponent(String),
}

/// Errors that can occur while loading call-record batches from disk
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("data directory does not exist: {0}")]
    MissingDataDir(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("no valid call records found ({rejected} records rejected, {failed_files} files unreadable)")]
    NoData { rejected: usize, failed_files: usize },
}

/// Errors that can occur during impact aggregation
#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("cannot aggregate over an empty record sequence")]
    EmptyInput,
}

/// Errors that can occur while talking to the enrichment service
#[derive(Error, Debug)]
pub enum EnrichError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("invalid enrichment response: {0}")]
    InvalidResponse(String),

    #[error("enrichment service error {code}: {message}")]
    ServiceError { code: i64, message: String },
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("failed to read file: {0}")]
    ReadFailed(std::io::Error),

    #[error("failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("failed to write CSV: {0}")]
    CsvFailed(#[from] csv::Error),

    #[error("invalid output path: {0}")]
    InvalidPath(String),
}
