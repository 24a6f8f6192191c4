//! The five interchangeable sparse-relation representations.
//!
//! Every representation implements [`Relation`], the capability the
//! conversion engine relies on: visiting each present cell as a
//! `(row, column, value)` triple and reporting its size. Graph edges are
//! cells keyed by their endpoint values, table and map cells are keyed by
//! their identities, and matrix cells are keyed by `u64` indices.

mod binary_key_map;
mod bit_matrix;
mod cells;
mod graph;
mod sparse_matrix;
mod table;

pub use self::{
    binary_key_map::BinaryKeyMap,
    bit_matrix::BitMatrix,
    graph::{Edge, EdgeId, Graph, Node, NodeId},
    sparse_matrix::SparseMatrix,
    table::{ArrayTable, HashTable, ImmutableTable, ImmutableTableBuilder, Table},
};

pub(crate) use self::cells::OrderedCells;

/// Row and column counts of a matrix-like relation.
///
/// # Examples
/// ```
/// use relgraph_core::Dimensions;
///
/// assert!(Dimensions::new(3, 3).is_balanced());
/// assert!(!Dimensions::new(3, 4).is_balanced());
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Dimensions {
    /// Number of rows.
    pub rows: u64,
    /// Number of columns.
    pub columns: u64,
}

impl Dimensions {
    /// Creates a new `rows × columns` shape.
    #[must_use]
    pub const fn new(rows: u64, columns: u64) -> Self {
        Self { rows, columns }
    }

    /// Returns `true` when the row count equals the column count.
    #[must_use]
    pub const fn is_balanced(&self) -> bool {
        self.rows == self.columns
    }
}

/// A keyed relation whose present cells can be enumerated.
///
/// # Examples
/// ```
/// use relgraph_core::{BinaryKeyMap, Relation};
///
/// let mut map = BinaryKeyMap::new();
/// map.insert("a", "b", 1);
/// map.insert("b", "c", 2);
///
/// let mut total = 0;
/// map.visit_cells(|_, _, value| total += *value);
/// assert_eq!(total, 3);
/// assert_eq!(map.cell_count(), 2);
/// ```
pub trait Relation {
    /// Identity type for rows and columns (or sources and targets).
    type Key;
    /// Value stored in each present cell.
    type Value;

    /// Calls `visit` once per present cell, in the relation's natural order.
    fn visit_cells<F>(&self, visit: F)
    where
        F: FnMut(&Self::Key, &Self::Key, &Self::Value);

    /// Returns the reported number of present cells.
    fn cell_count(&self) -> usize;

    /// Returns the shape of matrix-like relations; other relations have none.
    fn dimensions(&self) -> Option<Dimensions> {
        None
    }
}
