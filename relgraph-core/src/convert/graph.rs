//! Conversions that produce a [`Graph`].

use std::{collections::HashMap, hash::Hash};

use tracing::{debug, instrument};

use crate::{
    capacity::{MAX_CARDINALITY, size_hint},
    error::{RelgraphError, Result},
    mapping::KeyLookup,
    relation::{Graph, NodeId, Relation},
};

use super::{ensure_balanced, source_cardinality};

/// Builds a graph while memoising one node per identity.
struct GraphAssembler<N, E> {
    graph: Graph<N, E>,
    nodes: HashMap<N, NodeId>,
    skipped: usize,
}

impl<N: Clone + Eq + Hash, E> GraphAssembler<N, E> {
    fn new(cells: usize) -> Self {
        Self {
            graph: Graph::with_capacity(cells, cells),
            nodes: HashMap::with_capacity(size_hint(cells)),
            skipped: 0,
        }
    }

    fn with_nodes(values: &[N], cells: usize) -> Result<Self> {
        let mut assembler = Self::new(cells.max(values.len()));
        for (position, value) in values.iter().enumerate() {
            if assembler.nodes.contains_key(value) {
                return Err(RelgraphError::invalid_argument(format!(
                    "node value at position {position} duplicates an earlier value"
                )));
            }
            assembler.node_for(value.clone())?;
        }
        Ok(assembler)
    }

    fn node_for(&mut self, value: N) -> Result<NodeId> {
        if let Some(&id) = self.nodes.get(&value) {
            return Ok(id);
        }
        if self.graph.node_count() as u64 >= MAX_CARDINALITY {
            return Err(RelgraphError::CapacityExceeded {
                what: "node count",
                requested: self.graph.node_count() as u64 + 1,
                limit: MAX_CARDINALITY,
            });
        }
        let id = self.graph.add_node(value.clone());
        self.nodes.insert(value, id);
        Ok(id)
    }

    fn connect(&mut self, source: N, target: N, value: E) -> Result<()> {
        let source = self.node_for(source)?;
        let target = self.node_for(target)?;
        self.graph.add_edge(source, target, value)?;
        Ok(())
    }

    fn connect_known(&mut self, source: &N, target: &N, value: E) -> Result<()> {
        match (self.nodes.get(source), self.nodes.get(target)) {
            (Some(&source), Some(&target)) => {
                self.graph.add_edge(source, target, value)?;
            }
            _ => self.skipped += 1,
        }
        Ok(())
    }

    fn finish(self) -> Graph<N, E> {
        debug!(
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            skipped = self.skipped,
            "graph assembled"
        );
        self.graph
    }
}

/// Builds a graph whose nodes are the source's identities.
///
/// Each accepted cell becomes an edge from its row (first key) to its column
/// (second key). Only identities that appear in an accepted cell become
/// nodes.
///
/// # Errors
/// Returns [`RelgraphError::ShapeMismatch`] for unbalanced matrices and
/// [`RelgraphError::CapacityExceeded`] when the source is too large.
///
/// # Examples
/// ```
/// use relgraph_core::{BinaryKeyMap, convert};
///
/// let mut map = BinaryKeyMap::new();
/// map.insert("a", "b", 1);
/// map.insert("b", "c", -1);
///
/// let graph = convert::to_graph(&map, |value: &i32| *value > 0)?;
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 1);
/// # Ok::<(), relgraph_core::RelgraphError>(())
/// ```
pub fn to_graph<R, P>(source: &R, predicate: P) -> Result<Graph<R::Key, R::Value>>
where
    R: Relation + ?Sized,
    R::Key: Clone + Eq + Hash,
    R::Value: Clone,
    P: Fn(&R::Value) -> bool,
{
    to_graph_mapped(source, |key: &R::Key| Some(key.clone()), predicate)
}

/// Builds a graph after translating each identity with `key_fn`.
///
/// Cells whose row or column translates to `None` are skipped.
///
/// # Errors
/// See [`to_graph`].
#[instrument(
    name = "convert.to_graph",
    err,
    skip_all,
    fields(cells = source.cell_count()),
)]
pub fn to_graph_mapped<R, N, K, P>(source: &R, key_fn: K, predicate: P) -> Result<Graph<N, R::Value>>
where
    R: Relation + ?Sized,
    R::Value: Clone,
    N: Clone + Eq + Hash,
    K: Fn(&R::Key) -> Option<N>,
    P: Fn(&R::Value) -> bool,
{
    ensure_balanced(source)?;
    let cells = source_cardinality(source)?;
    let mut assembler = GraphAssembler::new(cells);
    let mut outcome = Ok(());

    source.visit_cells(|row, column, value| {
        if outcome.is_err() {
            return;
        }
        if !predicate(value) {
            assembler.skipped += 1;
            return;
        }
        let (Some(from), Some(to)) = (key_fn(row), key_fn(column)) else {
            assembler.skipped += 1;
            return;
        };
        outcome = assembler.connect(from, to, value.clone());
    });

    outcome?;
    Ok(assembler.finish())
}

/// Builds a graph from an index-keyed source, naming each node with the
/// identity `lookup` assigns to its index.
///
/// # Errors
/// See [`to_graph`].
///
/// # Examples
/// ```
/// use relgraph_core::{SparseMatrix, convert};
///
/// let mut matrix = SparseMatrix::square(3);
/// matrix.set(0, 1, 'x')?;
/// matrix.set(2, 1, 'y')?;
///
/// let names = ["zero", "one"];
/// let graph = convert::to_graph_with_keys(&matrix, &names[..], convert::accept_all)?;
/// assert_eq!(graph.edge_count(), 1);
/// assert_eq!(graph.nodes().map(|node| *node.value()).collect::<Vec<_>>(), ["zero", "one"]);
/// # Ok::<(), relgraph_core::RelgraphError>(())
/// ```
pub fn to_graph_with_keys<R, L, N, P>(
    source: &R,
    lookup: &L,
    predicate: P,
) -> Result<Graph<N, R::Value>>
where
    R: Relation<Key = u64> + ?Sized,
    R::Value: Clone,
    L: KeyLookup<N> + ?Sized,
    N: Clone + Eq + Hash,
    P: Fn(&R::Value) -> bool,
{
    to_graph_mapped(source, |index: &u64| lookup.key_of(*index).cloned(), predicate)
}

/// Builds a graph over an explicit node set.
///
/// Every value in `node_values` becomes a node, in order, even when no
/// accepted cell touches it. Cells that reference an identity outside
/// `node_values` are skipped.
///
/// # Errors
/// Returns [`RelgraphError::InvalidArgument`] when `node_values` repeats a
/// value, plus the errors of [`to_graph`].
///
/// # Examples
/// ```
/// use relgraph_core::{BinaryKeyMap, convert};
///
/// let mut map = BinaryKeyMap::new();
/// map.insert(1, 2, "edge");
///
/// let graph = convert::to_graph_with_nodes(&map, &[1, 2, 3], convert::accept_all)?;
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.edge_count(), 1);
/// # Ok::<(), relgraph_core::RelgraphError>(())
/// ```
#[instrument(
    name = "convert.to_graph_with_nodes",
    err,
    skip_all,
    fields(cells = source.cell_count(), nodes = node_values.len()),
)]
pub fn to_graph_with_nodes<R, P>(
    source: &R,
    node_values: &[R::Key],
    predicate: P,
) -> Result<Graph<R::Key, R::Value>>
where
    R: Relation + ?Sized,
    R::Key: Clone + Eq + Hash,
    R::Value: Clone,
    P: Fn(&R::Value) -> bool,
{
    ensure_balanced(source)?;
    let cells = source_cardinality(source)?;
    let mut assembler = GraphAssembler::with_nodes(node_values, cells)?;
    let mut outcome = Ok(());

    source.visit_cells(|row, column, value| {
        if outcome.is_err() {
            return;
        }
        if !predicate(value) {
            assembler.skipped += 1;
            return;
        }
        outcome = assembler.connect_known(row, column, value.clone());
    });

    outcome?;
    Ok(assembler.finish())
}
