//! Hash-backed sparse matrix keyed by `u64` row and column indices.

use crate::{
    capacity::MAX_CARDINALITY,
    error::{RelgraphError, Result},
    relation::{Dimensions, OrderedCells, Relation},
};

/// A `rows × columns` matrix that stores only its present cells.
///
/// Cells iterate in first-insertion order; overwriting a cell keeps its
/// position and replaces its value.
///
/// # Examples
/// ```
/// use relgraph_core::SparseMatrix;
///
/// let mut matrix = SparseMatrix::square(3);
/// matrix.set(0, 2, 0.5)?;
/// matrix.set(0, 2, 0.75)?;
///
/// assert_eq!(matrix.get(0, 2), Some(&0.75));
/// assert_eq!(matrix.get(2, 0), None);
/// assert_eq!(matrix.cardinality(), 1);
/// # Ok::<(), relgraph_core::RelgraphError>(())
/// ```
#[derive(Clone, Debug)]
pub struct SparseMatrix<E> {
    dimensions: Dimensions,
    cells: OrderedCells<u64, E>,
}

impl<E> SparseMatrix<E> {
    /// Creates an empty `rows × columns` matrix.
    #[must_use]
    pub fn new(rows: u64, columns: u64) -> Self {
        Self::with_capacity(Dimensions::new(rows, columns), 0)
    }

    /// Creates an empty `n × n` matrix.
    #[must_use]
    pub fn square(n: u64) -> Self {
        Self::new(n, n)
    }

    pub(crate) fn with_capacity(dimensions: Dimensions, capacity: usize) -> Self {
        Self {
            dimensions,
            cells: OrderedCells::with_capacity(capacity),
        }
    }

    /// Stores `value` at `(row, column)` and returns the value it replaced.
    ///
    /// # Errors
    /// Returns [`RelgraphError::InvalidArgument`] when the position lies
    /// outside the matrix and [`RelgraphError::CapacityExceeded`] when a new
    /// cell would push the cardinality past the supported limit.
    pub fn set(&mut self, row: u64, column: u64, value: E) -> Result<Option<E>> {
        self.ensure_in_bounds(row, column)?;
        if !self.cells.contains(&row, &column) && self.cells.len() as u64 >= MAX_CARDINALITY {
            return Err(RelgraphError::CapacityExceeded {
                what: "cardinality",
                requested: self.cells.len() as u64 + 1,
                limit: MAX_CARDINALITY,
            });
        }
        Ok(self.cells.insert(row, column, value))
    }

    /// Folds `value` into the cell at `(row, column)` using `merge`.
    pub(crate) fn merge<F>(&mut self, row: u64, column: u64, value: E, merge: F)
    where
        F: FnOnce(&mut E, E),
    {
        if row < self.dimensions.rows && column < self.dimensions.columns {
            self.cells.merge_with(row, column, value, merge);
        }
    }

    fn ensure_in_bounds(&self, row: u64, column: u64) -> Result<()> {
        if row < self.dimensions.rows && column < self.dimensions.columns {
            return Ok(());
        }
        Err(RelgraphError::invalid_argument(format!(
            "cell ({row}, {column}) lies outside a {}x{} matrix",
            self.dimensions.rows, self.dimensions.columns
        )))
    }

    /// Returns the value at `(row, column)`, if present.
    #[must_use]
    pub fn get(&self, row: u64, column: u64) -> Option<&E> {
        self.cells.get(&row, &column)
    }

    /// Returns `true` when a value is present at `(row, column)`.
    #[must_use]
    pub fn contains(&self, row: u64, column: u64) -> bool {
        self.cells.contains(&row, &column)
    }

    /// Returns the number of present cells.
    #[must_use]
    pub fn cardinality(&self) -> usize {
        self.cells.len()
    }

    /// Returns the number of rows.
    #[must_use]
    #[rustfmt::skip]
    pub fn rows(&self) -> u64 { self.dimensions.rows }

    /// Returns the number of columns.
    #[must_use]
    #[rustfmt::skip]
    pub fn columns(&self) -> u64 { self.dimensions.columns }

    /// Returns `true` when the matrix is square.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.dimensions.is_balanced()
    }

    /// Iterates over present cells as `(row, column, value)` triples.
    pub fn iter(&self) -> impl Iterator<Item = (u64, u64, &E)> {
        self.cells
            .iter()
            .map(|cell| (cell.row, cell.column, &cell.value))
    }
}

impl<E> Relation for SparseMatrix<E> {
    type Key = u64;
    type Value = E;

    fn visit_cells<F>(&self, mut visit: F)
    where
        F: FnMut(&u64, &u64, &E),
    {
        for cell in self.cells.iter() {
            visit(&cell.row, &cell.column, &cell.value);
        }
    }

    fn cell_count(&self) -> usize {
        self.cells.len()
    }

    fn dimensions(&self) -> Option<Dimensions> {
        Some(self.dimensions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case(3, 0)]
    #[case(0, 3)]
    #[case(7, 7)]
    fn set_rejects_out_of_range_cells(#[case] row: u64, #[case] column: u64) {
        let mut matrix = SparseMatrix::new(3, 3);
        let err = matrix
            .set(row, column, 1)
            .expect_err("out-of-range cell must be rejected");
        assert!(matches!(err, RelgraphError::InvalidArgument { .. }));
        assert_eq!(matrix.cardinality(), 0);
    }

    #[test]
    fn set_returns_replaced_value_and_keeps_order() {
        let mut matrix = SparseMatrix::new(2, 3);
        assert_eq!(matrix.set(1, 2, 'x').expect("in bounds"), None);
        assert_eq!(matrix.set(0, 0, 'y').expect("in bounds"), None);
        assert_eq!(matrix.set(1, 2, 'z').expect("in bounds"), Some('x'));

        let cells: Vec<_> = matrix.iter().map(|(r, c, v)| (r, c, *v)).collect();
        assert_eq!(cells, [(1, 2, 'z'), (0, 0, 'y')]);
        assert!(!matrix.is_balanced());
        assert_eq!(matrix.dimensions(), Some(Dimensions::new(2, 3)));
    }

    #[test]
    fn merge_folds_into_existing_cells() {
        let mut matrix = SparseMatrix::square(2);
        matrix.merge(0, 1, 2, |acc, value| *acc += value);
        matrix.merge(0, 1, 5, |acc, value| *acc += value);
        assert_eq!(matrix.get(0, 1), Some(&7));
    }
}
