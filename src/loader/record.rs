//! Call-record schema and validated construction.
//!
//! Raw records come from batched per-block JSON files produced by the
//! extraction pipeline. Field names vary between pipeline versions (the
//! original extractor used short column names), so the raw schema accepts
//! both spellings via serde aliases. Validation happens here, at the
//! boundary: malformed records are rejected before any cost computation.

use crate::utils::error::InputError;
use num_bigint::BigUint;
use num_traits::Zero;
use serde::Deserialize;

/// One historical invocation of the ModExp precompile
///
/// Read-only input to the cost model and aggregator. Constructed only
/// through [`CallRecord::from_raw`], so every held record has passed
/// boundary validation.
#[derive(Debug, Clone)]
pub struct CallRecord {
    /// Declared byte length of the base operand
    pub base_length: u64,

    /// Declared byte length of the exponent operand
    pub exponent_length: u64,

    /// Declared byte length of the modulus operand
    pub modulus_length: u64,

    /// The exponent operand's value (may exceed 64-bit and 256-bit range)
    pub exponent_value: BigUint,

    /// Gas the network actually charged for this call
    pub recorded_cost: u64,

    /// Block the call was included in
    pub block_number: u64,

    /// Hash of the enclosing transaction
    pub transaction_id: String,

    /// Originating address, filled in by enrichment (grouping key)
    pub caller: Option<String>,
}

/// Raw call record as it appears in a batch file
///
/// Lengths are read signed so a negative value is caught explicitly
/// instead of failing as an opaque deserialization error.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCallRecord {
    /// Base operand byte length
    #[serde(alias = "Bsize")]
    pub base_length: i64,

    /// Exponent operand byte length
    #[serde(alias = "Esize")]
    pub exponent_length: i64,

    /// Modulus operand byte length
    #[serde(alias = "Msize")]
    pub modulus_length: i64,

    /// Hex-encoded exponent value (with or without 0x prefix)
    #[serde(alias = "E")]
    pub exponent: String,

    /// Gas charged on-chain for this call
    #[serde(alias = "gas_costs")]
    pub recorded_cost: u64,

    /// Enclosing transaction hash
    #[serde(alias = "tx_hash")]
    pub transaction_id: String,

    /// Originating address, if the extractor already joined it
    #[serde(default, alias = "from_address")]
    pub caller: Option<String>,
}

impl CallRecord {
    /// Validate a raw record into a [`CallRecord`]
    ///
    /// **Public** - the only way to construct a record
    ///
    /// # Errors
    /// * `InputError::NegativeLength` - any operand length below zero
    /// * `InputError::MalformedExponent` - exponent not parseable as a
    ///   non-negative hex integer
    pub fn from_raw(raw: RawCallRecord, block_number: u64) -> Result<Self, InputError> {
        let base_length = non_negative("base", raw.base_length)?;
        let exponent_length = non_negative("exponent", raw.exponent_length)?;
        let modulus_length = non_negative("modulus", raw.modulus_length)?;
        let exponent_value = parse_exponent(&raw.exponent)?;

        Ok(Self {
            base_length,
            exponent_length,
            modulus_length,
            exponent_value,
            recorded_cost: raw.recorded_cost,
            block_number,
            transaction_id: raw.transaction_id,
            caller: raw.caller,
        })
    }
}

/// Check a declared length is non-negative
///
/// **Private** - internal validation helper
fn non_negative(field: &'static str, value: i64) -> Result<u64, InputError> {
    u64::try_from(value).map_err(|_| InputError::NegativeLength { field, value })
}

/// Parse a hex-encoded exponent into a `BigUint`
///
/// **Private** - internal validation helper
///
/// Accepts an optional `0x` prefix. An empty string (or bare `0x`) is the
/// extractor's encoding for a zero exponent.
fn parse_exponent(value: &str) -> Result<BigUint, InputError> {
    let hex = value.strip_prefix("0x").unwrap_or(value);
    if hex.is_empty() {
        return Ok(BigUint::zero());
    }
    BigUint::parse_bytes(hex.as_bytes(), 16)
        .ok_or_else(|| InputError::MalformedExponent(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::One;

    fn raw(exponent: &str) -> RawCallRecord {
        RawCallRecord {
            base_length: 64,
            exponent_length: 3,
            modulus_length: 64,
            exponent: exponent.to_string(),
            recorded_cost: 341,
            transaction_id: "0xabc".to_string(),
            caller: None,
        }
    }

    #[test]
    fn test_from_raw_valid() {
        let record = CallRecord::from_raw(raw("0x10001"), 1000).unwrap();
        assert_eq!(record.base_length, 64);
        assert_eq!(record.exponent_value, BigUint::from(0x10001u32));
        assert_eq!(record.block_number, 1000);
    }

    #[test]
    fn test_from_raw_negative_length() {
        let mut bad = raw("0x03");
        bad.modulus_length = -1;
        let err = CallRecord::from_raw(bad, 1).unwrap_err();
        assert!(matches!(
            err,
            InputError::NegativeLength { field: "modulus", value: -1 }
        ));
    }

    #[test]
    fn test_from_raw_malformed_exponent() {
        let err = CallRecord::from_raw(raw("0xzz"), 1).unwrap_err();
        assert!(matches!(err, InputError::MalformedExponent(_)));
    }

    #[test]
    fn test_empty_exponent_is_zero() {
        assert_eq!(parse_exponent("").unwrap(), BigUint::zero());
        assert_eq!(parse_exponent("0x").unwrap(), BigUint::zero());
    }

    #[test]
    fn test_exponent_beyond_64_bits() {
        // 40 hex digits = 160 bits, well past u64
        let wide = parse_exponent("0x0100000000000000000000000000000000000000").unwrap();
        assert_eq!(wide, BigUint::one() << 152);
    }

    #[test]
    fn test_raw_accepts_short_column_names() {
        let json = r#"{
            "Bsize": 32, "Esize": 3, "Msize": 32,
            "E": "0x03", "gas_costs": 200, "tx_hash": "0xdead"
        }"#;
        let raw: RawCallRecord = serde_json::from_str(json).unwrap();
        assert_eq!(raw.base_length, 32);
        assert_eq!(raw.recorded_cost, 200);
        assert_eq!(raw.transaction_id, "0xdead");
    }
}
