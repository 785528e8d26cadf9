//! Batch loader for per-block call-record files.
//!
//! The extraction pipeline writes one JSON file per block, named by block
//! number (`22000000.json`), each holding an array of raw call records.
//! The loader walks the data directory newest-block-first, tolerates
//! individually unreadable files, and collects per-record validation
//! failures into a full defect list rather than stopping at the first.

use super::record::{CallRecord, RawCallRecord};
use crate::utils::error::{InputError, LoadError};
use log::{debug, info, warn};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Result of loading a data directory
#[derive(Debug)]
pub struct LoadOutcome {
    /// Records that passed boundary validation
    pub records: Vec<CallRecord>,

    /// Records rejected at the boundary, with their provenance
    pub rejected: Vec<RejectedRecord>,

    /// Files that could not be read or parsed at all
    pub failed_files: Vec<String>,
}

/// A raw record rejected during validation
#[derive(Debug)]
pub struct RejectedRecord {
    /// File the record came from
    pub file: String,

    /// Zero-based index within the file's array
    pub index: usize,

    /// Why it was rejected
    pub error: InputError,
}

/// Load all call records from a directory of per-block batch files
///
/// **Public** - main loader entry point
///
/// # Arguments
/// * `data_dir` - directory containing `<block_number>.json` files
/// * `limit` - optional cap on the number of files (newest blocks first)
///
/// # Errors
/// * `LoadError::MissingDataDir` - directory does not exist
/// * `LoadError::NoData` - no file yielded a single valid record; the
///   error carries how many records were rejected and how many files
///   were unreadable, so an all-malformed directory is distinguishable
///   from an empty one
pub fn load_call_records(data_dir: &Path, limit: Option<usize>) -> Result<LoadOutcome, LoadError> {
    if !data_dir.is_dir() {
        return Err(LoadError::MissingDataDir(data_dir.display().to_string()));
    }

    info!("Loading call records from {}", data_dir.display());

    let mut batch_files = list_batch_files(data_dir)?;
    let total_files = batch_files.len();
    info!("Found {} batch files", total_files);

    if let Some(limit) = limit {
        if limit < total_files {
            batch_files.truncate(limit);
            info!("Limited to {} files", limit);
        }
    }

    let mut outcome = LoadOutcome {
        records: Vec::new(),
        rejected: Vec::new(),
        failed_files: Vec::new(),
    };

    for (path, block_number) in &batch_files {
        match read_batch_file(path) {
            Ok(raw_records) => {
                convert_batch(path, *block_number, raw_records, &mut outcome);
            }
            Err(e) => {
                warn!("Failed to load {}: {}", path.display(), e);
                outcome.failed_files.push(path.display().to_string());
            }
        }
    }

    if !outcome.failed_files.is_empty() {
        warn!(
            "Failed to load {} of {} files",
            outcome.failed_files.len(),
            batch_files.len()
        );
    }
    if !outcome.rejected.is_empty() {
        warn!("Rejected {} malformed records", outcome.rejected.len());
    }

    if outcome.records.is_empty() {
        return Err(LoadError::NoData {
            rejected: outcome.rejected.len(),
            failed_files: outcome.failed_files.len(),
        });
    }

    info!(
        "Loaded {} call records from {} blocks",
        outcome.records.len(),
        batch_files.len() - outcome.failed_files.len()
    );

    Ok(outcome)
}

/// List batch files sorted by block number, newest first
///
/// **Private** - internal helper for load_call_records
///
/// Files whose stem is not a block number are skipped with a debug note
/// (the pipeline drops the occasional manifest alongside the batches).
fn list_batch_files(data_dir: &Path) -> Result<Vec<(PathBuf, u64)>, LoadError> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(data_dir)? {
        let path = entry?.path();
        if path.extension().map_or(true, |ext| ext != "json") {
            continue;
        }
        match block_number_from_path(&path) {
            Some(block) => files.push((path, block)),
            None => debug!("Skipping non-batch file {}", path.display()),
        }
    }

    files.sort_by(|a, b| b.1.cmp(&a.1));
    Ok(files)
}

/// Extract the block number from a batch file's stem
///
/// **Private** - internal helper
fn block_number_from_path(path: &Path) -> Option<u64> {
    path.file_stem()?.to_str()?.parse().ok()
}

/// Read one batch file into raw records
///
/// **Private** - internal helper for load_call_records
fn read_batch_file(path: &Path) -> Result<Vec<RawCallRecord>, serde_json::Error> {
    let file = File::open(path).map_err(serde_json::Error::io)?;
    serde_json::from_reader(BufReader::new(file))
}

/// Convert a file's raw records, routing rejects into the defect list
///
/// **Private** - internal helper for load_call_records
fn convert_batch(
    path: &Path,
    block_number: u64,
    raw_records: Vec<RawCallRecord>,
    outcome: &mut LoadOutcome,
) {
    for (index, raw) in raw_records.into_iter().enumerate() {
        match CallRecord::from_raw(raw, block_number) {
            Ok(record) => outcome.records.push(record),
            Err(error) => {
                warn!(
                    "Rejected record {} in {}: {}",
                    index,
                    path.display(),
                    error
                );
                outcome.rejected.push(RejectedRecord {
                    file: path.display().to_string(),
                    index,
                    error,
                });
            }
        }
    }
}
