//! Conversions that produce a [`Table`](crate::Table).

use std::hash::Hash;

use tracing::{debug, instrument};

use crate::{
    capacity::checked_cardinality,
    error::{RelgraphError, Result},
    mapping::{IndexMapping, KeyLookup},
    relation::{ArrayTable, HashTable, ImmutableTable, ImmutableTableBuilder, Relation},
};

use super::{LastWriteWins, MergeStrategy, source_cardinality};

/// Collects the identities for `0..dimension`, failing on the first gap.
fn key_universe<N, M>(mapping: &M) -> Result<Vec<N>>
where
    N: Clone,
    M: IndexMapping<N> + KeyLookup<N> + ?Sized,
{
    let dimension = mapping.dimension();
    checked_cardinality("dense table size", dimension.saturating_mul(dimension))?;
    let mut keys = Vec::with_capacity(checked_cardinality("table dimension", dimension)?);
    for index in 0..dimension {
        let key = mapping.key_of(index).ok_or_else(|| {
            RelgraphError::invalid_argument(format!(
                "mapping assigns no key to index {index} of {dimension}"
            ))
        })?;
        keys.push(key.clone());
    }
    Ok(keys)
}

/// Builds a dense, array-backed table whose universe is the key set of
/// `mapping`, ordered by index.
///
/// Cells whose row or column does not resolve are skipped. A repeated cell
/// keeps the last value.
///
/// # Errors
/// Returns [`RelgraphError::InvalidArgument`] when some index below the
/// mapping's dimension has no key, and [`RelgraphError::CapacityExceeded`]
/// when `dimension²` exceeds the cardinality limit.
///
/// # Examples
/// ```
/// use relgraph_core::{BinaryKeyMap, MapMapping, Table, convert};
///
/// let mut map = BinaryKeyMap::new();
/// map.insert("a", "b", 1);
/// map.insert("b", "z", 2);
///
/// let mapping = MapMapping::from_keys(["a", "b"])?;
/// let table = convert::to_dense_table(&map, &mapping)?;
/// assert_eq!(table.row_keys(), ["a", "b"]);
/// assert_eq!(table.get(&"a", &"b"), Some(&1));
/// assert_eq!(table.cardinality(), 1);
/// # Ok::<(), relgraph_core::RelgraphError>(())
/// ```
#[instrument(
    name = "convert.to_dense_table",
    err,
    skip_all,
    fields(cells = source.cell_count(), dimension = mapping.dimension()),
)]
pub fn to_dense_table<R, M>(source: &R, mapping: &M) -> Result<ArrayTable<R::Key, R::Value>>
where
    R: Relation + ?Sized,
    R::Key: Clone + Eq + Hash,
    R::Value: Clone,
    M: IndexMapping<R::Key> + KeyLookup<R::Key> + ?Sized,
{
    source_cardinality(source)?;
    let mut table = ArrayTable::square(key_universe(mapping)?)?;
    let mut skipped = 0_usize;

    source.visit_cells(|row, column, value| {
        let positions = mapping
            .resolve(row)
            .zip(mapping.resolve(column))
            .and_then(|(row, column)| {
                Some((usize::try_from(row).ok()?, usize::try_from(column).ok()?))
            });
        match positions {
            Some((row, column)) => {
                table.put_at(row, column, value.clone());
            }
            None => skipped += 1,
        }
    });

    debug!(skipped, "dense table assembled");
    Ok(table)
}

/// Builds a sparse, hash-backed table holding every source cell with its
/// identities kept as-is.
///
/// # Errors
/// Returns [`RelgraphError::CapacityExceeded`] when the source is too large.
///
/// # Examples
/// ```
/// use relgraph_core::{Graph, Table, convert};
///
/// let mut graph = Graph::new();
/// let a = graph.add_node("a");
/// let b = graph.add_node("b");
/// graph.add_edge(a, b, 1.5)?;
///
/// let table = convert::to_sparse_table(&graph)?;
/// assert_eq!(table.get(&"a", &"b"), Some(&1.5));
/// # Ok::<(), relgraph_core::RelgraphError>(())
/// ```
#[instrument(name = "convert.to_sparse_table", err, skip_all, fields(cells = source.cell_count()))]
pub fn to_sparse_table<R>(source: &R) -> Result<HashTable<R::Key, R::Value>>
where
    R: Relation + ?Sized,
    R::Key: Clone + Eq + Hash,
    R::Value: Clone,
{
    let mut table = HashTable::with_capacity(source_cardinality(source)?);
    source.visit_cells(|row, column, value| {
        table.merge(row.clone(), column.clone(), value.clone(), |existing, incoming| {
            LastWriteWins.merge(existing, incoming);
        });
    });
    Ok(table)
}

/// Builds a read-only table holding every source cell with its identities
/// kept as-is.
///
/// # Errors
/// Returns [`RelgraphError::CapacityExceeded`] when the source is too large.
///
/// # Examples
/// ```
/// use relgraph_core::{BinaryKeyMap, Table, convert};
///
/// let map: BinaryKeyMap<_, _> = [((1, 2), 'x'), ((2, 1), 'y')].into_iter().collect();
/// let table = convert::to_immutable_table(&map)?;
/// assert_eq!(table.row_keys(), [1, 2]);
/// assert_eq!(table.get(&2, &1), Some(&'y'));
/// # Ok::<(), relgraph_core::RelgraphError>(())
/// ```
#[instrument(name = "convert.to_immutable_table", err, skip_all, fields(cells = source.cell_count()))]
pub fn to_immutable_table<R>(source: &R) -> Result<ImmutableTable<R::Key, R::Value>>
where
    R: Relation + ?Sized,
    R::Key: Clone + Eq + Hash,
    R::Value: Clone,
{
    let mut builder = ImmutableTableBuilder::with_capacity(source_cardinality(source)?);
    source.visit_cells(|row, column, value| {
        builder.merge(row.clone(), column.clone(), value.clone(), |existing, incoming| {
            LastWriteWins.merge(existing, incoming);
        });
    });
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::relation::{BinaryKeyMap, Table};

    #[test]
    fn dense_table_rejects_mappings_with_gaps() {
        let map: BinaryKeyMap<&str, u8> = BinaryKeyMap::new();
        let mapping = std::collections::HashMap::from([("a", 0_u64), ("b", 2)]);
        let lookup = crate::MapMapping::new(mapping).expect("distinct indices");

        let err = to_dense_table(&map, &lookup).expect_err("index 1 has no key");
        assert!(matches!(err, RelgraphError::InvalidArgument { .. }));
    }

    #[test]
    fn dense_table_keeps_the_last_duplicate() {
        let mut graph = crate::Graph::new();
        let a = graph.add_node('a');
        let b = graph.add_node('b');
        graph.add_edge(a, b, 1).expect("members");
        graph.add_edge(a, b, 2).expect("members");

        let table = to_dense_table(&graph, &vec!['a', 'b']).expect("valid universe");
        assert_eq!(table.get(&'a', &'b'), Some(&2));
        assert_eq!(table.cardinality(), 1);
    }
}
