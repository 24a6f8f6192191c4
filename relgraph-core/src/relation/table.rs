//! Two-dimensional tables keyed by arbitrary row and column identities.
//!
//! [`ArrayTable`] is dense and requires its key universe up front,
//! [`HashTable`] discovers keys as cells arrive, and [`ImmutableTable`] is
//! assembled once through [`ImmutableTableBuilder`] and is read-only
//! afterwards.

use std::{
    collections::{HashMap, HashSet},
    hash::Hash,
};

use crate::{
    capacity::{MAX_CARDINALITY, size_hint},
    error::{RelgraphError, Result},
    relation::{OrderedCells, Relation},
};

/// Read access shared by every table implementation.
pub trait Table: Relation {
    /// Row keys in table order.
    fn row_keys(&self) -> &[Self::Key];

    /// Column keys in table order.
    fn column_keys(&self) -> &[Self::Key];

    /// Returns the value at `(row, column)`, if present.
    fn get(&self, row: &Self::Key, column: &Self::Key) -> Option<&Self::Value>;

    /// Returns the number of present cells.
    fn cardinality(&self) -> usize {
        self.cell_count()
    }
}

fn index_keys<N: Clone + Eq + Hash>(axis: &str, keys: &[N]) -> Result<HashMap<N, usize>> {
    let mut index = HashMap::with_capacity(size_hint(keys.len()));
    for (position, key) in keys.iter().enumerate() {
        if index.insert(key.clone(), position).is_some() {
            return Err(RelgraphError::invalid_argument(format!(
                "{axis} key at position {position} duplicates an earlier key"
            )));
        }
    }
    Ok(index)
}

/// Dense, array-backed table over a fixed key universe.
///
/// # Examples
/// ```
/// use relgraph_core::{ArrayTable, Table};
///
/// let mut table = ArrayTable::square(vec!["a", "b"])?;
/// table.put(&"a", &"b", 7)?;
///
/// assert_eq!(table.get(&"a", &"b"), Some(&7));
/// assert!(table.put(&"a", &"z", 1).is_err());
/// # Ok::<(), relgraph_core::RelgraphError>(())
/// ```
#[derive(Clone, Debug)]
pub struct ArrayTable<N, E> {
    row_keys: Vec<N>,
    column_keys: Vec<N>,
    row_index: HashMap<N, usize>,
    column_index: HashMap<N, usize>,
    cells: Vec<Option<E>>,
    present: usize,
}

impl<N: Clone + Eq + Hash, E> ArrayTable<N, E> {
    /// Creates an empty table over the given row and column universes.
    ///
    /// # Errors
    /// Returns [`RelgraphError::InvalidArgument`] when an axis repeats a key
    /// and [`RelgraphError::CapacityExceeded`] when `rows × columns` exceeds
    /// the cardinality limit or the cells cannot be allocated.
    pub fn new(row_keys: Vec<N>, column_keys: Vec<N>) -> Result<Self> {
        let rows = row_keys.len() as u64;
        let columns = column_keys.len() as u64;
        let size = rows
            .checked_mul(columns)
            .filter(|size| *size <= MAX_CARDINALITY)
            .ok_or(RelgraphError::CapacityExceeded {
                what: "dense table size",
                requested: rows.saturating_mul(columns),
                limit: MAX_CARDINALITY,
            })?;
        let row_index = index_keys("row", &row_keys)?;
        let column_index = index_keys("column", &column_keys)?;
        let size = usize::try_from(size).map_err(|_| RelgraphError::CapacityExceeded {
            what: "dense table size",
            requested: size,
            limit: MAX_CARDINALITY,
        })?;

        let mut cells = Vec::new();
        cells
            .try_reserve_exact(size)
            .map_err(|_| RelgraphError::CapacityExceeded {
                what: "dense table allocation",
                requested: size as u64,
                limit: MAX_CARDINALITY,
            })?;
        cells.resize_with(size, || None);
        Ok(Self {
            row_keys,
            column_keys,
            row_index,
            column_index,
            cells,
            present: 0,
        })
    }

    /// Creates an empty table whose rows and columns share `keys`.
    ///
    /// # Errors
    /// See [`ArrayTable::new`].
    pub fn square(keys: Vec<N>) -> Result<Self> {
        Self::new(keys.clone(), keys)
    }

    fn slot(&self, row: usize, column: usize) -> Option<usize> {
        if row >= self.row_keys.len() || column >= self.column_keys.len() {
            return None;
        }
        Some(row * self.column_keys.len() + column)
    }

    fn resolve(&self, row: &N, column: &N) -> Option<usize> {
        let row = *self.row_index.get(row)?;
        let column = *self.column_index.get(column)?;
        self.slot(row, column)
    }

    /// Stores `value` at `(row, column)` and returns the value it replaced.
    ///
    /// # Errors
    /// Returns [`RelgraphError::InvalidArgument`] when either key lies
    /// outside the table's universe.
    pub fn put(&mut self, row: &N, column: &N, value: E) -> Result<Option<E>> {
        let slot = self.resolve(row, column).ok_or_else(|| {
            RelgraphError::invalid_argument("cell key lies outside the dense table universe")
        })?;
        Ok(self.put_slot(slot, value))
    }

    /// Stores `value` at the given row and column positions, ignoring
    /// positions outside the table.
    pub(crate) fn put_at(&mut self, row: usize, column: usize, value: E) -> Option<E> {
        let slot = self.slot(row, column)?;
        self.put_slot(slot, value)
    }

    fn put_slot(&mut self, slot: usize, value: E) -> Option<E> {
        let cell = self.cells.get_mut(slot)?;
        let previous = cell.replace(value);
        if previous.is_none() {
            self.present += 1;
        }
        previous
    }

    /// Clears the cell at `(row, column)`, returning its value.
    pub fn erase(&mut self, row: &N, column: &N) -> Option<E> {
        let slot = self.resolve(row, column)?;
        let previous = self.cells.get_mut(slot)?.take();
        if previous.is_some() {
            self.present -= 1;
        }
        previous
    }
}

impl<N: Clone + Eq + Hash, E> Relation for ArrayTable<N, E> {
    type Key = N;
    type Value = E;

    fn visit_cells<F>(&self, mut visit: F)
    where
        F: FnMut(&N, &N, &E),
    {
        let width = self.column_keys.len();
        if width == 0 {
            return;
        }
        for (slot, cell) in self.cells.iter().enumerate() {
            let Some(value) = cell else {
                continue;
            };
            let (row, column) = (slot / width, slot % width);
            if let (Some(row), Some(column)) = (self.row_keys.get(row), self.column_keys.get(column))
            {
                visit(row, column, value);
            }
        }
    }

    fn cell_count(&self) -> usize {
        self.present
    }
}

impl<N: Clone + Eq + Hash, E> Table for ArrayTable<N, E> {
    fn row_keys(&self) -> &[N] {
        &self.row_keys
    }

    fn column_keys(&self) -> &[N] {
        &self.column_keys
    }

    fn get(&self, row: &N, column: &N) -> Option<&E> {
        let slot = self.resolve(row, column)?;
        self.cells.get(slot)?.as_ref()
    }
}

/// Sparse, hash-backed table whose keys are discovered incrementally.
///
/// Row and column keys are reported in first-seen order.
///
/// # Examples
/// ```
/// use relgraph_core::{HashTable, Table};
///
/// let mut table = HashTable::new();
/// table.put("r1", "c1", 1.0);
/// table.put("r2", "c1", 2.0);
///
/// assert_eq!(table.row_keys(), ["r1", "r2"]);
/// assert_eq!(table.column_keys(), ["c1"]);
/// assert_eq!(table.get(&"r2", &"c1"), Some(&2.0));
/// ```
#[derive(Clone, Debug)]
pub struct HashTable<N, E> {
    row_keys: Vec<N>,
    column_keys: Vec<N>,
    seen_rows: HashSet<N>,
    seen_columns: HashSet<N>,
    cells: OrderedCells<N, E>,
}

impl<N, E> Default for HashTable<N, E> {
    fn default() -> Self {
        Self {
            row_keys: Vec::new(),
            column_keys: Vec::new(),
            seen_rows: HashSet::new(),
            seen_columns: HashSet::new(),
            cells: OrderedCells::default(),
        }
    }
}

impl<N: Clone + Eq + Hash, E> HashTable<N, E> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty table pre-sized for roughly `capacity` cells.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: OrderedCells::with_capacity(capacity),
            ..Self::default()
        }
    }

    fn record_keys(&mut self, row: &N, column: &N) {
        if self.seen_rows.insert(row.clone()) {
            self.row_keys.push(row.clone());
        }
        if self.seen_columns.insert(column.clone()) {
            self.column_keys.push(column.clone());
        }
    }

    /// Stores `value` at `(row, column)` and returns the value it replaced.
    pub fn put(&mut self, row: N, column: N, value: E) -> Option<E> {
        self.record_keys(&row, &column);
        self.cells.insert(row, column, value)
    }

    pub(crate) fn merge<F>(&mut self, row: N, column: N, value: E, merge: F)
    where
        F: FnOnce(&mut E, E),
    {
        self.record_keys(&row, &column);
        self.cells.merge_with(row, column, value, merge);
    }

    /// Returns `true` when a value is present at `(row, column)`.
    #[must_use]
    pub fn contains(&self, row: &N, column: &N) -> bool {
        self.cells.contains(row, column)
    }
}

impl<N: Clone + Eq + Hash, E> Relation for HashTable<N, E> {
    type Key = N;
    type Value = E;

    fn visit_cells<F>(&self, mut visit: F)
    where
        F: FnMut(&N, &N, &E),
    {
        for cell in self.cells.iter() {
            visit(&cell.row, &cell.column, &cell.value);
        }
    }

    fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

impl<N: Clone + Eq + Hash, E> Table for HashTable<N, E> {
    fn row_keys(&self) -> &[N] {
        &self.row_keys
    }

    fn column_keys(&self) -> &[N] {
        &self.column_keys
    }

    fn get(&self, row: &N, column: &N) -> Option<&E> {
        self.cells.get(row, column)
    }
}

/// Read-only table produced by [`ImmutableTableBuilder::build`].
///
/// # Examples
/// ```
/// use relgraph_core::{ImmutableTable, Table};
///
/// let table = ImmutableTable::builder()
///     .put('x', 'y', 1)
///     .put('y', 'x', 2)
///     .build();
///
/// assert_eq!(table.cardinality(), 2);
/// assert_eq!(table.get(&'y', &'x'), Some(&2));
/// ```
#[derive(Clone, Debug)]
pub struct ImmutableTable<N, E> {
    inner: HashTable<N, E>,
}

impl<N: Clone + Eq + Hash, E> ImmutableTable<N, E> {
    /// Starts assembling a new table.
    #[must_use]
    pub fn builder() -> ImmutableTableBuilder<N, E> {
        ImmutableTableBuilder::default()
    }
}

impl<N: Clone + Eq + Hash, E> Relation for ImmutableTable<N, E> {
    type Key = N;
    type Value = E;

    fn visit_cells<F>(&self, visit: F)
    where
        F: FnMut(&N, &N, &E),
    {
        self.inner.visit_cells(visit);
    }

    fn cell_count(&self) -> usize {
        self.inner.cell_count()
    }
}

impl<N: Clone + Eq + Hash, E> Table for ImmutableTable<N, E> {
    fn row_keys(&self) -> &[N] {
        self.inner.row_keys()
    }

    fn column_keys(&self) -> &[N] {
        self.inner.column_keys()
    }

    fn get(&self, row: &N, column: &N) -> Option<&E> {
        self.inner.get(row, column)
    }
}

/// Accumulates cells for an [`ImmutableTable`].
///
/// A repeated `(row, column)` keeps the last value put.
#[derive(Clone, Debug)]
pub struct ImmutableTableBuilder<N, E> {
    table: HashTable<N, E>,
}

impl<N, E> Default for ImmutableTableBuilder<N, E> {
    fn default() -> Self {
        Self {
            table: HashTable::default(),
        }
    }
}

impl<N: Clone + Eq + Hash, E> ImmutableTableBuilder<N, E> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
        }
    }

    /// Adds a cell to the table under construction.
    #[must_use]
    pub fn put(mut self, row: N, column: N, value: E) -> Self {
        self.table.put(row, column, value);
        self
    }

    pub(crate) fn merge<F>(&mut self, row: N, column: N, value: E, merge: F)
    where
        F: FnOnce(&mut E, E),
    {
        self.table.merge(row, column, value, merge);
    }

    /// Freezes the accumulated cells into an [`ImmutableTable`].
    #[must_use]
    pub fn build(self) -> ImmutableTable<N, E> {
        ImmutableTable { inner: self.table }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[test]
    fn array_table_rejects_duplicate_universe_keys() {
        let err = ArrayTable::<&str, u8>::new(vec!["a", "a"], vec!["b"])
            .expect_err("duplicate row keys must be rejected");
        assert!(matches!(err, RelgraphError::InvalidArgument { .. }));
    }

    #[test]
    fn array_table_rejects_oversized_universes() {
        let keys: Vec<u32> = (0..50_000).collect();
        let err = ArrayTable::<u32, u8>::new(keys.clone(), keys)
            .expect_err("50000² cells exceed the cardinality limit");
        assert!(matches!(
            err,
            RelgraphError::CapacityExceeded {
                what: "dense table size",
                ..
            }
        ));
    }

    #[rstest]
    #[case(0, 3)]
    #[case(1, 1)]
    #[case(4, 7)]
    fn array_table_allocates_every_cell_empty(#[case] rows: u32, #[case] columns: u32) {
        let table = ArrayTable::<u32, u8>::new((0..rows).collect(), (0..columns).collect())
            .expect("small universes fit");
        assert_eq!(table.cells.len(), (rows * columns) as usize);
        assert!(table.cells.iter().all(Option::is_none));
        assert_eq!(table.cardinality(), 0);
    }

    #[test]
    fn array_table_tracks_present_cells() {
        let mut table = ArrayTable::new(vec![1, 2], vec![10, 20, 30]).expect("valid universe");
        table.put(&2, &30, 'a').expect("known keys");
        table.put(&1, &10, 'b').expect("known keys");
        assert_eq!(table.put(&2, &30, 'c').expect("known keys"), Some('a'));
        assert_eq!(table.cardinality(), 2);

        let mut cells = Vec::new();
        table.visit_cells(|row, column, value| cells.push((*row, *column, *value)));
        assert_eq!(cells, [(1, 10, 'b'), (2, 30, 'c')]);

        assert_eq!(table.erase(&1, &10), Some('b'));
        assert_eq!(table.erase(&1, &10), None);
        assert_eq!(table.cardinality(), 1);
    }

    #[test]
    fn hash_table_discovers_keys_in_first_seen_order() {
        let mut table = HashTable::new();
        table.put("b", "y", 1);
        table.put("a", "x", 2);
        table.put("b", "x", 3);

        assert_eq!(table.row_keys(), ["b", "a"]);
        assert_eq!(table.column_keys(), ["y", "x"]);
        assert!(table.contains(&"b", &"x"));
        assert_eq!(Table::cardinality(&table), 3);
    }

    #[test]
    fn immutable_builder_keeps_last_value() {
        let table = ImmutableTable::builder()
            .put(1, 2, "first")
            .put(1, 2, "second")
            .build();

        assert_eq!(table.get(&1, &2), Some(&"second"));
        assert_eq!(table.cardinality(), 1);
        assert_eq!(table.row_keys(), [1]);
    }
}
