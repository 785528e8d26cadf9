//! HTTP client for the transaction-metadata lookup service.
//!
//! Enrichment is strictly post-hoc: it fills in the originating address
//! used as the grouping key. Records the service cannot resolve keep
//! `caller = None` and stay in the whole-population statistics.

use super::types::{LookupRequest, LookupResponse, ServiceError, TransactionMeta};
use crate::loader::CallRecord;
use crate::utils::config::{DEFAULT_HTTP_TIMEOUT, DEFAULT_TX_BATCH_SIZE};
use crate::utils::error::EnrichError;
use log::{debug, info, warn};
use reqwest::blocking::Client;
use std::collections::{BTreeSet, HashMap};

/// Client for the transaction lookup endpoint
pub struct EnrichClient {
    client: Client,
    lookup_url: String,
}

impl EnrichClient {
    /// Create a new enrichment client
    pub fn new(lookup_url: impl Into<String>) -> Result<Self, EnrichError> {
        let client = Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(EnrichError::RequestFailed)?;

        Ok(Self {
            client,
            lookup_url: lookup_url.into(),
        })
    }

    /// Resolve one batch of transaction hashes
    ///
    /// **Public** - single-request primitive; most callers want
    /// [`enrich_records`] instead
    pub fn lookup_transactions(
        &self,
        block_range: (u64, u64),
        transactions: &[String],
    ) -> Result<Vec<TransactionMeta>, EnrichError> {
        let request = LookupRequest {
            from_block: block_range.0,
            to_block: block_range.1,
            transactions: transactions.to_vec(),
        };

        debug!(
            "Looking up {} transactions in blocks {}..={}",
            transactions.len(),
            block_range.0,
            block_range.1
        );

        let response = self
            .client
            .post(&self.lookup_url)
            .json(&request)
            .send()
            .map_err(EnrichError::RequestFailed)?;

        if !response.status().is_success() {
            return Err(EnrichError::InvalidResponse(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().unwrap_or_default()
            )));
        }

        let envelope: LookupResponse = response.json().map_err(EnrichError::RequestFailed)?;

        if let Some(ServiceError { code, message }) = envelope.error {
            return Err(EnrichError::ServiceError { code, message });
        }

        Ok(envelope.rows)
    }
}

/// Outcome counters for an enrichment pass
#[derive(Debug, Clone, Copy, Default)]
pub struct EnrichStats {
    /// Records that received a caller address
    pub matched: u64,

    /// Records the service could not resolve
    pub missing: u64,
}

/// Fill in caller addresses for a record sequence
///
/// **Public** - main enrichment entry point
///
/// Deduplicates transaction hashes, batches lookups (the service caps
/// query size), and left-joins the results onto the records. Misses are
/// counted and warned about, never fatal.
pub fn enrich_records(
    records: &mut [CallRecord],
    client: &EnrichClient,
) -> Result<EnrichStats, EnrichError> {
    if records.is_empty() {
        return Ok(EnrichStats::default());
    }

    let first_block = records.iter().map(|r| r.block_number).min().unwrap_or(0);
    let last_block = records.iter().map(|r| r.block_number).max().unwrap_or(0);

    let unique_txs: Vec<String> = records
        .iter()
        .map(|r| r.transaction_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    info!(
        "Enriching {} records ({} unique transactions, blocks {}..={})",
        records.len(),
        unique_txs.len(),
        first_block,
        last_block
    );

    let mut by_tx: HashMap<String, TransactionMeta> = HashMap::new();
    for batch in unique_txs.chunks(DEFAULT_TX_BATCH_SIZE) {
        let rows = client.lookup_transactions((first_block, last_block), batch)?;
        debug!("Batch resolved {} of {} transactions", rows.len(), batch.len());
        for row in rows {
            by_tx.insert(row.transaction_id.clone(), row);
        }
    }

    let mut stats = EnrichStats::default();
    for record in records.iter_mut() {
        match by_tx.get(&record.transaction_id) {
            Some(meta) => {
                record.caller = Some(meta.from_address.clone());
                stats.matched += 1;
            }
            None => stats.missing += 1,
        }
    }

    if stats.missing > 0 {
        warn!("{} records missing transaction metadata", stats.missing);
    }

    Ok(stats)
}
