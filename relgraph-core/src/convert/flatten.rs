//! Conversions that flatten any relation into a [`BinaryKeyMap`].

use std::hash::Hash;

use tracing::{debug, instrument};

use crate::{
    error::Result,
    relation::{BinaryKeyMap, Relation},
};

use super::{LastWriteWins, MergeStrategy, source_cardinality};

/// Flattens `source` into a map keyed by `(row, column)`.
///
/// A pair seen more than once keeps the last value.
///
/// # Errors
/// Returns [`crate::RelgraphError::CapacityExceeded`] when the source is too
/// large.
///
/// # Examples
/// ```
/// use relgraph_core::{Graph, convert};
///
/// let mut graph = Graph::new();
/// let a = graph.add_node("a");
/// let b = graph.add_node("b");
/// graph.add_edge(a, b, 1)?;
/// graph.add_edge(b, a, 2)?;
/// graph.add_edge(a, b, 3)?;
///
/// let map = convert::to_binary_key_map(&graph)?;
/// assert_eq!(map.len(), 2);
/// assert_eq!(map.get(&"a", &"b"), Some(&3));
/// # Ok::<(), relgraph_core::RelgraphError>(())
/// ```
pub fn to_binary_key_map<R>(source: &R) -> Result<BinaryKeyMap<R::Key, R::Value>>
where
    R: Relation + ?Sized,
    R::Key: Clone + Eq + Hash,
    R::Value: Clone,
{
    to_binary_key_map_merged(source, &LastWriteWins)
}

/// Like [`to_binary_key_map`], combining values for a repeated pair with
/// `merge`.
///
/// # Errors
/// See [`to_binary_key_map`].
#[instrument(name = "convert.to_binary_key_map", err, skip_all, fields(cells = source.cell_count()))]
pub fn to_binary_key_map_merged<R, S>(source: &R, merge: &S) -> Result<BinaryKeyMap<R::Key, R::Value>>
where
    R: Relation + ?Sized,
    R::Key: Clone + Eq + Hash,
    R::Value: Clone,
    S: MergeStrategy<R::Value> + ?Sized,
{
    let mut map = BinaryKeyMap::with_capacity(source_cardinality(source)?);
    source.visit_cells(|first, second, value| {
        map.merge(first.clone(), second.clone(), value.clone(), |existing, incoming| {
            merge.merge(existing, incoming);
        });
    });
    Ok(map)
}

/// Flattens `source` after translating identities with `key_fn` and values
/// with `value_fn`.
///
/// A cell is skipped when either identity or its value translates to
/// `None`. Distinct source pairs that translate to the same pair keep the
/// last value.
///
/// # Errors
/// See [`to_binary_key_map`].
///
/// # Examples
/// ```
/// use relgraph_core::{SparseMatrix, convert};
///
/// let mut matrix = SparseMatrix::square(3);
/// matrix.set(0, 1, 10)?;
/// matrix.set(1, 2, 20)?;
/// matrix.set(2, 0, 0)?;
///
/// let names = ["zero", "one", "two"];
/// let map = convert::to_binary_key_map_with(
///     &matrix,
///     |index: &u64| names.get(*index as usize).copied(),
///     |value: &i32| (*value != 0).then(|| f64::from(*value) / 10.0),
/// )?;
/// assert_eq!(map.len(), 2);
/// assert_eq!(map.get(&"one", &"two"), Some(&2.0));
/// # Ok::<(), relgraph_core::RelgraphError>(())
/// ```
#[instrument(name = "convert.to_binary_key_map_with", err, skip_all, fields(cells = source.cell_count()))]
pub fn to_binary_key_map_with<R, N, E, K, V>(
    source: &R,
    key_fn: K,
    value_fn: V,
) -> Result<BinaryKeyMap<N, E>>
where
    R: Relation + ?Sized,
    N: Clone + Eq + Hash,
    K: Fn(&R::Key) -> Option<N>,
    V: Fn(&R::Value) -> Option<E>,
{
    let mut map = BinaryKeyMap::with_capacity(source_cardinality(source)?);
    let mut skipped = 0_usize;
    source.visit_cells(|first, second, value| {
        match (key_fn(first), key_fn(second), value_fn(value)) {
            (Some(first), Some(second), Some(value)) => {
                map.insert(first, second, value);
            }
            _ => skipped += 1,
        }
    });
    debug!(entries = map.len(), skipped, "binary key map assembled");
    Ok(map)
}
