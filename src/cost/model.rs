//! Gas pricing formulas for the ModExp precompile.
//!
//! Two deterministic cost functions sharing one skeleton:
//! - `legacy_cost`: EIP-2565, what mainnet charges today
//! - `proposed_cost`: EIP-7883, the repricing under analysis
//!
//! Every downstream statistic is derived from these two functions, so they
//! reproduce the reference pricing rules bit for bit, including the quirks
//! (negative mid-tier complexity, the iteration floor of 1).

use crate::utils::config::{
    BYTES_PER_WORD, EXPONENT_HEAD_BITS, LEGACY_FLOOR_GAS, LEGACY_LONG_EXP_MULTIPLIER,
    PROPOSED_FLOOR_GAS, PROPOSED_LONG_EXP_MULTIPLIER, SHORT_EXPONENT_BYTES,
};
use num_bigint::BigUint;
use num_traits::{One, Zero};

/// Gas cost of a ModExp call under the legacy (EIP-2565) pricing rules
///
/// **Public** - one of the two core cost functions
///
/// Pure and total: defined for all non-negative inputs, including
/// zero-length operands and a zero exponent.
///
/// # Arguments
/// * `base_length` - declared byte length of the base operand
/// * `exponent_length` - declared byte length of the exponent operand
/// * `modulus_length` - declared byte length of the modulus operand
/// * `exponent` - the exponent operand's numeric value
pub fn legacy_cost(
    base_length: u64,
    exponent_length: u64,
    modulus_length: u64,
    exponent: &BigUint,
) -> u64 {
    let max_length = base_length.max(modulus_length);
    let complexity = legacy_multiplication_complexity(max_length);
    let iterations = iteration_count(exponent_length, exponent, LEGACY_LONG_EXP_MULTIPLIER);
    finalize_cost(complexity, iterations, LEGACY_FLOOR_GAS)
}

/// Gas cost of a ModExp call under the proposed (EIP-7883) pricing rules
///
/// **Public** - one of the two core cost functions
///
/// Same contract as [`legacy_cost`]: pure, total, deterministic.
pub fn proposed_cost(
    base_length: u64,
    exponent_length: u64,
    modulus_length: u64,
    exponent: &BigUint,
) -> u64 {
    let max_length = base_length.max(modulus_length);
    let complexity = proposed_multiplication_complexity(max_length);
    let iterations = iteration_count(exponent_length, exponent, PROPOSED_LONG_EXP_MULTIPLIER);
    finalize_cost(complexity, iterations, PROPOSED_FLOOR_GAS)
}

/// Legacy three-tier multiplication complexity
///
/// **Private** - internal to the cost model
///
/// Quadratic in the 8-byte word count, with tier boundaries keyed on the
/// raw byte length. The middle and upper tiers go negative for word counts
/// near their lower boundary (e.g. `max_length = 128` gives -1472); the
/// result is carried signed so the gas floor absorbs it downstream.
fn legacy_multiplication_complexity(max_length: u64) -> i128 {
    let words = word_count(max_length);
    if max_length <= 64 {
        words * words
    } else if max_length <= 1024 {
        words * words / 4 + 96 * words - 3072
    } else {
        words * words / 16 + 480 * words - 199680
    }
}

/// Proposed two-tier multiplication complexity
///
/// **Private** - internal to the cost model
///
/// Constant 16 for operands up to 32 bytes, otherwise twice the squared
/// word count.
fn proposed_multiplication_complexity(max_length: u64) -> i128 {
    if max_length <= 32 {
        16
    } else {
        let words = word_count(max_length);
        2 * words * words
    }
}

/// Number of 8-byte pricing words covering `max_length` operand bytes
///
/// **Private** - internal to the cost model
fn word_count(max_length: u64) -> i128 {
    max_length.div_ceil(BYTES_PER_WORD) as i128
}

/// Iteration count shared by both variants
///
/// **Private** - internal to the cost model
///
/// Short exponents (<= 32 declared bytes) contribute the index of their
/// highest set bit. Longer exponents add a per-byte term and only the low
/// 256 bits of the value contribute to the bit-length part; the value is
/// masked before taking the bit length even when it is wider. The count is
/// floored at 1 so a zero exponent still pays for one iteration - a quirk
/// of both formulas that must not be corrected here. Declared exponent
/// lengths large enough to push the count past u64 saturate instead of
/// wrapping.
fn iteration_count(exponent_length: u64, exponent: &BigUint, long_exp_multiplier: u64) -> u64 {
    let count: i128 = if exponent_length <= SHORT_EXPONENT_BYTES {
        if exponent.is_zero() {
            0
        } else {
            exponent.bits() as i128 - 1
        }
    } else {
        let mask = (BigUint::one() << EXPONENT_HEAD_BITS) - BigUint::one();
        let head_bits = (exponent & &mask).bits() as i128;
        long_exp_multiplier as i128 * (exponent_length - SHORT_EXPONENT_BYTES) as i128
            + (head_bits - 1)
    };
    u64::try_from(count.max(1)).unwrap_or(u64::MAX)
}

/// Combine complexity and iteration count into the final charge
///
/// **Private** - internal to the cost model
///
/// Truncating integer division by 3, then the variant's gas floor. The
/// complexity-iteration product saturates in i128 and the result saturates
/// into u64, so declared lengths far beyond anything a block could carry
/// still price to a defined (maximal) charge instead of wrapping.
fn finalize_cost(complexity: i128, iterations: u64, floor: u64) -> u64 {
    let gas = complexity.saturating_mul(iterations as i128) / 3;
    u64::try_from(gas.max(floor as i128)).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exp(hex: &str) -> BigUint {
        BigUint::parse_bytes(hex.as_bytes(), 16).unwrap()
    }

    #[test]
    fn test_worked_vectors_legacy() {
        let e = exp("10001");
        assert_eq!(legacy_cost(64, 3, 64, &e), 341);
        assert_eq!(legacy_cost(128, 3, 128, &e), 200);
        assert_eq!(legacy_cost(256, 3, 256, &e), 1365);
        assert_eq!(legacy_cost(512, 3, 512, &e), 21845);
        assert_eq!(legacy_cost(1024, 3, 1024, &e), 70997);
    }

    #[test]
    fn test_worked_vectors_proposed() {
        let e = exp("10001");
        assert_eq!(proposed_cost(64, 3, 64, &e), 682);
        assert_eq!(proposed_cost(128, 3, 128, &e), 2730);
        assert_eq!(proposed_cost(256, 3, 256, &e), 10922);
        assert_eq!(proposed_cost(512, 3, 512, &e), 43690);
        assert_eq!(proposed_cost(1024, 3, 1024, &e), 174762);
    }

    #[test]
    fn test_floor_applies_to_small_inputs() {
        let e = exp("10001");
        assert_eq!(legacy_cost(32, 32, 32, &e), 200);
        assert_eq!(proposed_cost(32, 32, 32, &e), 500);

        let three = exp("03");
        assert_eq!(legacy_cost(32, 1, 32, &three), 200);
        assert_eq!(proposed_cost(32, 1, 32, &three), 500);
    }

    #[test]
    fn test_zero_everything() {
        let zero = BigUint::zero();
        assert_eq!(legacy_cost(0, 0, 0, &zero), 200);
        assert_eq!(proposed_cost(0, 0, 0, &zero), 500);
    }

    #[test]
    fn test_zero_exponent_iterates_once() {
        // Iteration count is floored at 1, so a zero exponent with a large
        // modulus is still charged for one full multiplication round.
        let zero = BigUint::zero();
        assert_eq!(legacy_cost(1024, 0, 1024, &zero), 13312 / 3);
        assert_eq!(proposed_cost(1024, 0, 1024, &zero), 32768 / 3);
    }

    #[test]
    fn test_long_exponent_masks_to_256_bits() {
        // A 40-byte exponent whose high bits are set above bit 255:
        // only the low 256 bits feed the bit-length term.
        let wide = BigUint::one() << 300;
        let head_only = BigUint::zero();

        // Both have zero low-256 bits, so both get head_bits = 0.
        let a = legacy_cost(64, 40, 64, &wide);
        let b = legacy_cost(64, 40, 64, &head_only);
        assert_eq!(a, b);

        // Setting a low bit changes the count.
        let wide_plus_low = (BigUint::one() << 300) + exp("10001");
        assert!(legacy_cost(64, 40, 64, &wide_plus_low) > a);
    }

    #[test]
    fn test_long_exponent_multipliers_differ() {
        // exponent_length 33 with zero low bits: legacy iterations are
        // 8*1 - 1 = 7, proposed are 16*1 - 1 = 15.
        let zero = BigUint::zero();
        assert_eq!(legacy_cost(256, 33, 256, &zero), 256 * 7 / 3);
        assert_eq!(proposed_cost(256, 33, 256, &zero), 2048 * 15 / 3);
    }

    #[test]
    fn test_negative_mid_tier_complexity_hits_floor() {
        // words = 16 puts the legacy mid-tier at 64 + 1536 - 3072 = -1472;
        // the gas floor must absorb it rather than wrap or panic.
        assert_eq!(legacy_multiplication_complexity(128), -1472);
        let e = exp("10001");
        assert_eq!(legacy_cost(128, 3, 128, &e), 200);
    }

    #[test]
    fn test_extreme_lengths_saturate_instead_of_wrapping() {
        // Declared lengths near u64::MAX are absurd but pass the input
        // boundary, so both formulas must stay total and cap at u64::MAX
        // rather than panic or wrap.
        let e = exp("10001");
        assert_eq!(legacy_cost(1 << 62, 1 << 40, 1 << 62, &e), u64::MAX);
        assert_eq!(proposed_cost(1 << 62, 1 << 40, 1 << 62, &e), u64::MAX);

        let zero = BigUint::zero();
        assert_eq!(legacy_cost(u64::MAX, u64::MAX, u64::MAX, &zero), u64::MAX);
        assert_eq!(proposed_cost(u64::MAX, u64::MAX, u64::MAX, &zero), u64::MAX);
    }

    #[test]
    fn test_determinism() {
        let e = exp("deadbeefcafe");
        let first = proposed_cost(96, 6, 96, &e);
        for _ in 0..10 {
            assert_eq!(proposed_cost(96, 6, 96, &e), first);
        }
    }

    #[test]
    fn test_proposed_monotonic_in_operand_lengths() {
        let e = exp("10001");
        let mut prev = 0;
        for len in [0u64, 8, 32, 33, 64, 65, 128, 512, 1024, 1025, 4096] {
            let p = proposed_cost(len, 3, len, &e);
            assert!(p >= prev, "proposed decreased at length {len}");
            prev = p;
        }
    }

    #[test]
    fn test_legacy_monotonic_within_tiers() {
        // The legacy tiers dip at their boundaries (341 at 64 bytes vs the
        // 200 floor at 128 bytes), so monotonicity only holds tier-local.
        let e = exp("10001");
        for tier in [&[0u64, 8, 32, 48, 64][..], &[256, 512, 1024], &[2048, 4096, 8192]] {
            let mut prev = 0;
            for &len in tier {
                let l = legacy_cost(len, 3, len, &e);
                assert!(l >= prev, "legacy decreased at length {len}");
                prev = l;
            }
        }
    }
}
