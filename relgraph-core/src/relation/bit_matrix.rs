//! Square boolean adjacency matrix packed into 64-bit words.

use crate::{
    capacity::MAX_CARDINALITY,
    error::{RelgraphError, Result},
    relation::{Dimensions, Relation},
};

const WORD_BITS: u64 = u64::BITS as u64;

/// A square `n × n` boolean matrix.
///
/// The total cell count `n * n` must fit the cardinality limit so every
/// cell remains addressable with a 32-bit signed index.
///
/// # Examples
/// ```
/// use relgraph_core::BitMatrix;
///
/// let mut matrix = BitMatrix::new(4)?;
/// matrix.set(1, 3, true)?;
///
/// assert!(matrix.get(1, 3));
/// assert!(!matrix.get(3, 1));
/// assert_eq!(matrix.cardinality(), 1);
/// # Ok::<(), relgraph_core::RelgraphError>(())
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct BitMatrix {
    dimension: u64,
    words: Vec<u64>,
}

impl BitMatrix {
    /// Creates an all-`false` `dimension × dimension` matrix.
    ///
    /// # Errors
    /// Returns [`RelgraphError::CapacityExceeded`] when `dimension²` exceeds
    /// the cardinality limit or the backing storage cannot be allocated.
    pub fn new(dimension: u64) -> Result<Self> {
        let cells = dimension
            .checked_mul(dimension)
            .filter(|cells| *cells <= MAX_CARDINALITY)
            .ok_or(RelgraphError::CapacityExceeded {
                what: "bit matrix cell count",
                requested: dimension.saturating_mul(dimension),
                limit: MAX_CARDINALITY,
            })?;
        let word_count = usize::try_from(cells.div_ceil(WORD_BITS)).map_err(|_| {
            RelgraphError::CapacityExceeded {
                what: "bit matrix cell count",
                requested: cells,
                limit: MAX_CARDINALITY,
            }
        })?;

        let mut words = Vec::new();
        words
            .try_reserve_exact(word_count)
            .map_err(|_| RelgraphError::CapacityExceeded {
                what: "bit matrix allocation",
                requested: cells,
                limit: MAX_CARDINALITY,
            })?;
        words.resize(word_count, 0);
        Ok(Self { dimension, words })
    }

    /// Returns the side length of the matrix.
    #[must_use]
    #[rustfmt::skip]
    pub fn dimension(&self) -> u64 { self.dimension }

    fn locate(&self, row: u64, column: u64) -> Option<(usize, u64)> {
        if row >= self.dimension || column >= self.dimension {
            return None;
        }
        let bit = row * self.dimension + column;
        let word = usize::try_from(bit / WORD_BITS).ok()?;
        Some((word, 1_u64 << (bit % WORD_BITS)))
    }

    /// Returns the value at `(row, column)`; positions outside the matrix
    /// read as `false`.
    #[must_use]
    pub fn get(&self, row: u64, column: u64) -> bool {
        self.locate(row, column)
            .and_then(|(word, mask)| self.words.get(word).map(|bits| bits & mask != 0))
            .unwrap_or(false)
    }

    /// Sets the value at `(row, column)`.
    ///
    /// # Errors
    /// Returns [`RelgraphError::InvalidArgument`] when the position lies
    /// outside the matrix.
    pub fn set(&mut self, row: u64, column: u64, value: bool) -> Result<()> {
        let (word, mask) = self.locate(row, column).ok_or_else(|| {
            RelgraphError::invalid_argument(format!(
                "cell ({row}, {column}) lies outside a {0}x{0} bit matrix",
                self.dimension
            ))
        })?;
        if let Some(bits) = self.words.get_mut(word) {
            if value {
                *bits |= mask;
            } else {
                *bits &= !mask;
            }
        }
        Ok(())
    }

    /// Returns the number of `true` cells.
    #[must_use]
    pub fn cardinality(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Iterates over the positions of `true` cells in row-major order.
    pub fn iter_set(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        let dimension = self.dimension;
        self.words
            .iter()
            .enumerate()
            .flat_map(move |(index, &word)| SetBits {
                word,
                base: index as u64 * WORD_BITS,
            })
            .map(move |bit| (bit / dimension, bit % dimension))
    }
}

struct SetBits {
    word: u64,
    base: u64,
}

impl Iterator for SetBits {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.word == 0 {
            return None;
        }
        let offset = u64::from(self.word.trailing_zeros());
        self.word &= self.word - 1;
        Some(self.base + offset)
    }
}

impl Relation for BitMatrix {
    type Key = u64;
    type Value = bool;

    fn visit_cells<F>(&self, mut visit: F)
    where
        F: FnMut(&u64, &u64, &bool),
    {
        for (row, column) in self.iter_set() {
            visit(&row, &column, &true);
        }
    }

    fn cell_count(&self) -> usize {
        self.cardinality()
    }

    fn dimensions(&self) -> Option<Dimensions> {
        Some(Dimensions::new(self.dimension, self.dimension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_dimensions_past_the_cell_limit() {
        let err = BitMatrix::new(46_341).expect_err("46341² exceeds i32::MAX");
        assert!(matches!(
            err,
            RelgraphError::CapacityExceeded {
                what: "bit matrix cell count",
                ..
            }
        ));
    }

    #[test]
    fn zero_dimension_is_empty() {
        let matrix = BitMatrix::new(0).expect("empty matrix is valid");
        assert_eq!(matrix.cardinality(), 0);
        assert!(!matrix.get(0, 0));
    }

    #[test]
    fn set_and_clear_round_trip_across_word_boundaries() {
        let mut matrix = BitMatrix::new(9).expect("small matrix");
        for (row, column) in [(0, 0), (7, 1), (8, 8)] {
            matrix.set(row, column, true).expect("in bounds");
        }
        matrix.set(7, 1, false).expect("in bounds");

        let set: Vec<_> = matrix.iter_set().collect();
        assert_eq!(set, [(0, 0), (8, 8)]);
        assert_eq!(matrix.cardinality(), 2);
    }

    #[test]
    fn set_rejects_out_of_range_cells() {
        let mut matrix = BitMatrix::new(2).expect("small matrix");
        let err = matrix.set(2, 0, true).expect_err("row 2 is out of range");
        assert!(matches!(err, RelgraphError::InvalidArgument { .. }));
    }
}
