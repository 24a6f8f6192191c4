//! Insertion-ordered cell storage shared by the hash-backed relations.
//!
//! Cells live in a dense vector so iteration is deterministic; a nested
//! row-then-column index gives O(1) lookups without cloning keys on reads.
//! Overwriting a cell keeps its original position.

use std::{collections::HashMap, hash::Hash};

use crate::capacity::size_hint;

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Cell<K, V> {
    pub(crate) row: K,
    pub(crate) column: K,
    pub(crate) value: V,
}

#[derive(Clone, Debug)]
pub(crate) struct OrderedCells<K, V> {
    cells: Vec<Cell<K, V>>,
    index: HashMap<K, HashMap<K, usize>>,
}

impl<K, V> Default for OrderedCells<K, V> {
    fn default() -> Self {
        Self {
            cells: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K: Clone + Eq + Hash, V> OrderedCells<K, V> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let capacity = size_hint(capacity);
        Self {
            cells: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Stores `value` at `(row, column)`, returning the value it replaced.
    pub(crate) fn insert(&mut self, row: K, column: K, value: V) -> Option<V> {
        let columns = self.index.entry(row.clone()).or_default();
        if let Some(&slot) = columns.get(&column) {
            return self
                .cells
                .get_mut(slot)
                .map(|cell| std::mem::replace(&mut cell.value, value));
        }
        columns.insert(column.clone(), self.cells.len());
        self.cells.push(Cell { row, column, value });
        None
    }

    /// Folds `value` into the cell at `(row, column)` with `merge`, or stores
    /// it directly when the cell is empty.
    pub(crate) fn merge_with<F>(&mut self, row: K, column: K, value: V, merge: F)
    where
        F: FnOnce(&mut V, V),
    {
        let slot = self
            .index
            .get(&row)
            .and_then(|columns| columns.get(&column))
            .copied();
        match slot.and_then(|slot| self.cells.get_mut(slot)) {
            Some(cell) => merge(&mut cell.value, value),
            None => {
                self.insert(row, column, value);
            }
        }
    }

    pub(crate) fn get(&self, row: &K, column: &K) -> Option<&V> {
        let slot = self.index.get(row)?.get(column)?;
        self.cells.get(*slot).map(|cell| &cell.value)
    }

    pub(crate) fn contains(&self, row: &K, column: &K) -> bool {
        self.index
            .get(row)
            .is_some_and(|columns| columns.contains_key(column))
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Cell<K, V>> {
        self.cells.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.cells.len()
    }
}
