//! Flat map keyed by an ordered pair of identities.

use std::hash::Hash;

use crate::relation::{OrderedCells, Relation};

/// An insertion-ordered map from `(first, second)` keys to values.
///
/// This is the natural flattening of a graph's edge set (source, target) or
/// of a table's cell set (row, column). Re-inserting an existing pair
/// replaces its value but keeps its original position.
///
/// # Examples
/// ```
/// use relgraph_core::BinaryKeyMap;
///
/// let mut map = BinaryKeyMap::new();
/// map.insert("a", "b", 1);
/// map.insert("b", "a", 2);
/// assert_eq!(map.insert("a", "b", 3), Some(1));
///
/// let entries: Vec<_> = map.iter().map(|(first, second, value)| (*first, *second, *value)).collect();
/// assert_eq!(entries, [("a", "b", 3), ("b", "a", 2)]);
/// ```
#[derive(Clone, Debug)]
pub struct BinaryKeyMap<N, E> {
    cells: OrderedCells<N, E>,
}

impl<N, E> Default for BinaryKeyMap<N, E> {
    fn default() -> Self {
        Self {
            cells: OrderedCells::default(),
        }
    }
}

impl<N: Clone + Eq + Hash, E> BinaryKeyMap<N, E> {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty map pre-sized for roughly `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: OrderedCells::with_capacity(capacity),
        }
    }

    /// Stores `value` under `(first, second)`, returning the replaced value.
    pub fn insert(&mut self, first: N, second: N, value: E) -> Option<E> {
        self.cells.insert(first, second, value)
    }

    pub(crate) fn merge<F>(&mut self, first: N, second: N, value: E, merge: F)
    where
        F: FnOnce(&mut E, E),
    {
        self.cells.merge_with(first, second, value, merge);
    }

    /// Returns the value stored under `(first, second)`.
    #[must_use]
    pub fn get(&self, first: &N, second: &N) -> Option<&E> {
        self.cells.get(first, second)
    }

    /// Returns `true` when `(first, second)` is present.
    #[must_use]
    pub fn contains_key(&self, first: &N, second: &N) -> bool {
        self.cells.contains(first, second)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` when the map holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.len() == 0
    }

    /// Iterates over entries as `(first, second, value)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&N, &N, &E)> {
        self.cells
            .iter()
            .map(|cell| (&cell.row, &cell.column, &cell.value))
    }
}

impl<N: Clone + Eq + Hash, E> FromIterator<((N, N), E)> for BinaryKeyMap<N, E> {
    fn from_iter<I: IntoIterator<Item = ((N, N), E)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut map = Self::with_capacity(iter.size_hint().0);
        for ((first, second), value) in iter {
            map.insert(first, second, value);
        }
        map
    }
}

impl<N: Clone + Eq + Hash, E> Relation for BinaryKeyMap<N, E> {
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
