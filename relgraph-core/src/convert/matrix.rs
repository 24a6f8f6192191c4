//! Conversions that produce a [`BitMatrix`] or a [`SparseMatrix`].

use tracing::{debug, instrument};

use crate::{
    error::Result,
    mapping::{IdentityMapping, IndexMapping},
    relation::{BitMatrix, Dimensions, Relation, SparseMatrix},
};

use super::{LastWriteWins, MergeStrategy, ensure_balanced, source_cardinality, square_dimension};

/// Builds a boolean adjacency matrix over the index space of `mapping`.
///
/// A cell is `true` iff the source has an entry whose value passes
/// `predicate` and whose identities both resolve. Pass
/// [`super::accept_all`] to keep every present entry.
///
/// # Errors
/// Returns [`crate::RelgraphError::ShapeMismatch`] for unbalanced matrix
/// sources and [`crate::RelgraphError::CapacityExceeded`] when the mapping's
/// dimension is too large for a bit matrix.
///
/// # Examples
/// ```
/// use relgraph_core::{Graph, convert};
///
/// let mut graph = Graph::new();
/// let a = graph.add_node("a");
/// let b = graph.add_node("b");
/// graph.add_edge(a, b, ())?;
///
/// let matrix = convert::to_bit_matrix(&graph, &["a", "b"][..], convert::accept_all)?;
/// assert!(matrix.get(0, 1));
/// assert!(!matrix.get(1, 0));
/// # Ok::<(), relgraph_core::RelgraphError>(())
/// ```
#[instrument(
    name = "convert.to_bit_matrix",
    err,
    skip_all,
    fields(cells = source.cell_count(), dimension = mapping.dimension()),
)]
pub fn to_bit_matrix<R, M, P>(source: &R, mapping: &M, predicate: P) -> Result<BitMatrix>
where
    R: Relation + ?Sized,
    M: IndexMapping<R::Key> + ?Sized,
    P: Fn(&R::Value) -> bool,
{
    ensure_balanced(source)?;
    source_cardinality(source)?;
    let mut matrix = BitMatrix::new(mapping.dimension())?;
    let mut skipped = 0_usize;
    let mut outcome = Ok(());

    source.visit_cells(|row, column, value| {
        if outcome.is_err() {
            return;
        }
        if !predicate(value) {
            skipped += 1;
            return;
        }
        match (mapping.resolve(row), mapping.resolve(column)) {
            (Some(row), Some(column)) => outcome = matrix.set(row, column, true),
            _ => skipped += 1,
        }
    });

    outcome?;
    debug!(set = matrix.cardinality(), skipped, "bit matrix assembled");
    Ok(matrix)
}

/// Builds a boolean adjacency matrix from an index-keyed source without
/// re-indexing.
///
/// The side length is the source's dimension, or one past its largest
/// index when it has none.
///
/// # Errors
/// See [`to_bit_matrix`].
///
/// # Examples
/// ```
/// use relgraph_core::{SparseMatrix, convert};
///
/// let mut matrix = SparseMatrix::square(3);
/// matrix.set(0, 1, 5)?;
/// matrix.set(1, 2, -5)?;
///
/// let bits = convert::to_bit_matrix_square(&matrix, |value: &i32| *value > 0)?;
/// assert!(bits.get(0, 1));
/// assert!(!bits.get(1, 2));
/// # Ok::<(), relgraph_core::RelgraphError>(())
/// ```
pub fn to_bit_matrix_square<R, P>(source: &R, predicate: P) -> Result<BitMatrix>
where
    R: Relation<Key = u64> + ?Sized,
    P: Fn(&R::Value) -> bool,
{
    let dimension = square_dimension(source)?;
    to_bit_matrix(source, &IdentityMapping::new(dimension), predicate)
}

/// Builds a square sparse matrix over the index space of `mapping`, keeping
/// the last value observed for each cell.
///
/// # Errors
/// Returns [`crate::RelgraphError::ShapeMismatch`] for unbalanced matrix
/// sources and [`crate::RelgraphError::CapacityExceeded`] when the source is
/// too large.
///
/// # Examples
/// ```
/// use relgraph_core::{BinaryKeyMap, convert};
///
/// let mut map = BinaryKeyMap::new();
/// map.insert("x", "y", 2.5);
///
/// let matrix = convert::to_sparse_matrix(&map, &vec!["y", "x"])?;
/// assert_eq!(matrix.get(1, 0), Some(&2.5));
/// # Ok::<(), relgraph_core::RelgraphError>(())
/// ```
pub fn to_sparse_matrix<R, M>(source: &R, mapping: &M) -> Result<SparseMatrix<R::Value>>
where
    R: Relation + ?Sized,
    R::Value: Clone,
    M: IndexMapping<R::Key> + ?Sized,
{
    to_sparse_matrix_merged(source, mapping, &LastWriteWins)
}

/// Like [`to_sparse_matrix`], combining values that land on the same cell
/// with `merge`.
///
/// # Errors
/// See [`to_sparse_matrix`].
///
/// # Examples
/// ```
/// use relgraph_core::{Graph, convert};
///
/// let mut graph = Graph::new();
/// let a = graph.add_node('a');
/// let b = graph.add_node('b');
/// graph.add_edge(a, b, 1)?;
/// graph.add_edge(a, b, 2)?;
///
/// let sum = |total: &mut i32, value: i32| *total += value;
/// let matrix = convert::to_sparse_matrix_merged(&graph, &['a', 'b'][..], &sum)?;
/// assert_eq!(matrix.get(0, 1), Some(&3));
/// # Ok::<(), relgraph_core::RelgraphError>(())
/// ```
#[instrument(
    name = "convert.to_sparse_matrix",
    err,
    skip_all,
    fields(cells = source.cell_count(), dimension = mapping.dimension()),
)]
pub fn to_sparse_matrix_merged<R, M, S>(
    source: &R,
    mapping: &M,
    merge: &S,
) -> Result<SparseMatrix<R::Value>>
where
    R: Relation + ?Sized,
    R::Value: Clone,
    M: IndexMapping<R::Key> + ?Sized,
    S: MergeStrategy<R::Value> + ?Sized,
{
    ensure_balanced(source)?;
    let cells = source_cardinality(source)?;
    let dimension = mapping.dimension();
    let mut matrix = SparseMatrix::with_capacity(Dimensions::new(dimension, dimension), cells);
    let mut skipped = 0_usize;

    source.visit_cells(|row, column, value| {
        match (mapping.resolve(row), mapping.resolve(column)) {
            (Some(row), Some(column)) => {
                matrix.merge(row, column, value.clone(), |existing, incoming| {
                    merge.merge(existing, incoming);
                });
            }
            _ => skipped += 1,
        }
    });

    debug!(cardinality = matrix.cardinality(), skipped, "sparse matrix assembled");
    Ok(matrix)
}

/// Builds a square sparse matrix from an index-keyed source without
/// re-indexing.
///
/// # Errors
/// See [`to_sparse_matrix`].
///
/// # Examples
/// ```
/// use relgraph_core::{BitMatrix, convert};
///
/// let mut bits = BitMatrix::new(2)?;
/// bits.set(1, 0, true)?;
///
/// let matrix = convert::to_sparse_matrix_square(&bits)?;
/// assert_eq!(matrix.get(1, 0), Some(&true));
/// assert_eq!(matrix.cardinality(), 1);
/// # Ok::<(), relgraph_core::RelgraphError>(())
/// ```
pub fn to_sparse_matrix_square<R>(source: &R) -> Result<SparseMatrix<R::Value>>
where
    R: Relation<Key = u64> + ?Sized,
    R::Value: Clone,
{
    let dimension = square_dimension(source)?;
    to_sparse_matrix(source, &IdentityMapping::new(dimension))
}
