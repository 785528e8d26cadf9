//! Nearest-rank percentile computation.
//!
//! The percentile rule is a hard contract shared with the reference
//! analysis: `index = p * n / 100` in integer arithmetic, zero-based, on
//! the ascending-sorted sequence. An interpolated implementation would
//! silently diverge from the pinned worked values, so nothing here
//! touches floating point for index selection.

/// Nearest-rank percentile of an ascending-sorted slice
///
/// **Public** - shared by delta and ratio statistics
///
/// Returns `None` for an empty slice. The index is clamped to the last
/// element so rank 100 stays in range.
pub fn nearest_rank<T: Copy>(sorted: &[T], rank: u8) -> Option<T> {
    if sorted.is_empty() {
        return None;
    }
    let index = (rank as usize * sorted.len()) / 100;
    Some(sorted[index.min(sorted.len() - 1)])
}

/// A single percentile entry in the report
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Percentile<T> {
    /// Percentile rank (e.g. 90 for p90)
    pub rank: u8,

    /// Value at that rank
    pub value: T,
}

/// Compute a set of percentile entries over an ascending-sorted slice
///
/// **Public** - used by the impact aggregator
pub fn percentile_table<T: Copy>(sorted: &[T], ranks: &[u8]) -> Vec<Percentile<T>> {
    ranks
        .iter()
        .filter_map(|&rank| nearest_rank(sorted, rank).map(|value| Percentile { rank, value }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_rank_pinned_example() {
        // The contract's worked example: p50 of n=10 is index 5, value 60.
        let deltas = [10i64, 10, 20, 30, 40, 50, 60, 70, 80, 90];
        assert_eq!(nearest_rank(&deltas, 50), Some(60));
        assert_eq!(nearest_rank(&deltas, 10), Some(10));
        assert_eq!(nearest_rank(&deltas, 90), Some(90));
        assert_eq!(nearest_rank(&deltas, 99), Some(90));
    }

    #[test]
    fn test_nearest_rank_empty() {
        let empty: [i64; 0] = [];
        assert_eq!(nearest_rank(&empty, 50), None);
    }

    #[test]
    fn test_nearest_rank_single() {
        assert_eq!(nearest_rank(&[7i64], 10), Some(7));
        assert_eq!(nearest_rank(&[7i64], 99), Some(7));
    }

    #[test]
    fn test_index_is_integer_arithmetic() {
        // 33 * 3 / 100 = 0 under integer division; float rounding must
        // not bump it to 1.
        let values = [1i64, 2, 3];
        assert_eq!(nearest_rank(&values, 33), Some(1));
        assert_eq!(nearest_rank(&values, 34), Some(2));
    }

    #[test]
    fn test_percentile_table() {
        let deltas = [10i64, 10, 20, 30, 40, 50, 60, 70, 80, 90];
        let table = percentile_table(&deltas, &[25, 50, 75]);
        assert_eq!(table.len(), 3);
        assert_eq!(table[0], Percentile { rank: 25, value: 20 });
        assert_eq!(table[1], Percentile { rank: 50, value: 60 });
        assert_eq!(table[2], Percentile { rank: 75, value: 70 });
    }
}
