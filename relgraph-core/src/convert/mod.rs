//! Conversions between graphs, matrices, tables and binary-key maps.
//!
//! Every conversion follows the same pattern: visit each present cell of
//! the source, drop it when the value predicate rejects it or when either
//! identity fails to resolve, then write it into a freshly constructed
//! target. Nothing is shared between the source and the target.
//!
//! When two source cells land on the same target position the later one
//! wins ([`LastWriteWins`]). The `*_merged` variants accept any
//! [`MergeStrategy`] instead. Graph targets never merge: every accepted
//! cell becomes its own edge.
//!
//! Only identities that occur in at least one accepted cell become graph
//! nodes, unless the node set is given explicitly through
//! [`to_graph_with_nodes`].

mod flatten;
mod graph;
mod matrix;
mod table;

pub use self::{
    flatten::{to_binary_key_map, to_binary_key_map_merged, to_binary_key_map_with},
    graph::{to_graph, to_graph_mapped, to_graph_with_keys, to_graph_with_nodes},
    matrix::{
        to_bit_matrix, to_bit_matrix_square, to_sparse_matrix, to_sparse_matrix_merged,
        to_sparse_matrix_square,
    },
    table::{to_dense_table, to_immutable_table, to_sparse_table},
};

use crate::{
    capacity::checked_len,
    error::{RelgraphError, Result},
    relation::Relation,
};

/// Policy for combining two values that land on the same target cell.
pub trait MergeStrategy<E> {
    /// Folds `incoming` into `existing`.
    fn merge(&self, existing: &mut E, incoming: E);
}

/// Keeps the value observed last.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LastWriteWins;

impl<E> MergeStrategy<E> for LastWriteWins {
    fn merge(&self, existing: &mut E, incoming: E) {
        *existing = incoming;
    }
}

impl<E, F> MergeStrategy<E> for F
where
    F: Fn(&mut E, E),
{
    fn merge(&self, existing: &mut E, incoming: E) {
        self(existing, incoming);
    }
}

/// Predicate accepting every value.
///
/// # Examples
/// ```
/// use relgraph_core::convert::accept_all;
///
/// assert!(accept_all(&0.0_f64));
/// ```
#[must_use]
pub fn accept_all<E: ?Sized>(_value: &E) -> bool {
    true
}

/// Rejects matrix-like sources whose row and column counts differ.
fn ensure_balanced<R: Relation + ?Sized>(source: &R) -> Result<()> {
    match source.dimensions() {
        Some(dimensions) if !dimensions.is_balanced() => Err(RelgraphError::ShapeMismatch {
            rows: dimensions.rows,
            columns: dimensions.columns,
        }),
        _ => Ok(()),
    }
}

/// Validates the source cardinality and returns it as a capacity hint.
fn source_cardinality<R: Relation + ?Sized>(source: &R) -> Result<usize> {
    checked_len("cardinality", source.cell_count())
}

/// Side length for a square target built from `u64`-keyed cells: the
/// source's own dimension when it has one, otherwise one past the largest
/// index present.
fn square_dimension<R>(source: &R) -> Result<u64>
where
    R: Relation<Key = u64> + ?Sized,
{
    ensure_balanced(source)?;
    if let Some(dimensions) = source.dimensions() {
        return Ok(dimensions.rows);
    }
    let mut largest: Option<u64> = None;
    source.visit_cells(|row, column, _| {
        let candidate = (*row).max(*column);
        largest = Some(largest.map_or(candidate, |current| current.max(candidate)));
    });
    largest.map_or(Ok(0), |largest| {
        largest.checked_add(1).ok_or(RelgraphError::CapacityExceeded {
            what: "matrix dimension",
            requested: u64::MAX,
            limit: u64::MAX,
        })
    })
}
