//! Overflow-safe size arithmetic shared by relations, conversions and
//! generators.
//!
//! Collections sized by a cardinality are indexed with 32-bit signed
//! integers at the boundary of this library; anything larger is reported as
//! [`RelgraphError::CapacityExceeded`] instead of being truncated.

use crate::error::{RelgraphError, Result};

/// Smallest capacity requested when pre-sizing a dynamic collection.
pub(crate) const MIN_CAPACITY_HINT: usize = 16;

/// Largest node count, edge count or cardinality a structure may hold.
pub(crate) const MAX_CARDINALITY: u64 = i32::MAX as u64;

/// Returns the capacity to request for a collection that will hold roughly
/// `reported` entries.
#[must_use]
pub(crate) fn size_hint(reported: usize) -> usize {
    reported.max(MIN_CAPACITY_HINT)
}

/// Validates that `count` fits the cardinality limit and converts it to a
/// `usize`.
pub(crate) fn checked_cardinality(what: &'static str, count: u64) -> Result<usize> {
    if count > MAX_CARDINALITY {
        return Err(RelgraphError::CapacityExceeded {
            what,
            requested: count,
            limit: MAX_CARDINALITY,
        });
    }
    usize::try_from(count).map_err(|_| RelgraphError::CapacityExceeded {
        what,
        requested: count,
        limit: usize::MAX as u64,
    })
}

/// Like [`checked_cardinality`] for sizes already held as `usize`.
pub(crate) fn checked_len(what: &'static str, len: usize) -> Result<usize> {
    checked_cardinality(what, len as u64)
}

/// Number of ordered pairs of distinct elements drawn from `n` elements,
/// i.e. `n * (n - 1)`, or `None` on `u64` overflow.
#[must_use]
pub(crate) fn ordered_pair_count(n: u64) -> Option<u64> {
    n.checked_mul(n.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case(0, 16)]
    #[case(3, 16)]
    #[case(16, 16)]
    #[case(1_000, 1_000)]
    fn size_hint_never_drops_below_minimum(#[case] reported: usize, #[case] expected: usize) {
        assert_eq!(size_hint(reported), expected);
    }

    #[test]
    fn checked_cardinality_accepts_the_boundary() {
        let limit = checked_cardinality("cardinality", MAX_CARDINALITY)
            .expect("i32::MAX must be accepted");
        assert_eq!(limit as u64, MAX_CARDINALITY);
    }

    #[test]
    fn checked_cardinality_rejects_values_past_the_boundary() {
        let err = checked_cardinality("edge count", MAX_CARDINALITY + 1)
            .expect_err("i32::MAX + 1 must be rejected");
        assert_eq!(
            err,
            RelgraphError::CapacityExceeded {
                what: "edge count",
                requested: MAX_CARDINALITY + 1,
                limit: MAX_CARDINALITY,
            }
        );
    }

    #[rstest]
    #[case(0, Some(0))]
    #[case(1, Some(0))]
    #[case(4, Some(12))]
    #[case(u64::MAX, None)]
    fn ordered_pair_count_handles_edges(#[case] n: u64, #[case] expected: Option<u64>) {
        assert_eq!(ordered_pair_count(n), expected);
    }
}
