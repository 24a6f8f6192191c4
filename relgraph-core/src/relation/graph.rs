//! Arena-backed directed multigraph.
//!
//! Nodes and edges are owned by the [`Graph`] and addressed by index. Edges
//! store the [`NodeId`]s of their endpoints rather than references, so an
//! existing-edge lookup is a plain `(NodeId, NodeId)` key.

use std::fmt;

use crate::{
    capacity::{MAX_CARDINALITY, checked_cardinality, size_hint},
    error::{RelgraphError, Result},
    relation::Relation,
};

/// Index of a node within its owning [`Graph`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the position of the node in insertion order.
    #[must_use]
    #[rustfmt::skip]
    pub const fn index(self) -> usize { self.0 }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Index of an edge within its owning [`Graph`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct EdgeId(usize);

impl EdgeId {
    /// Returns the position of the edge in insertion order.
    #[must_use]
    #[rustfmt::skip]
    pub const fn index(self) -> usize { self.0 }
}

/// A node carrying an identity value and its current degree.
#[derive(Clone, Debug, PartialEq)]
pub struct Node<V> {
    value: V,
    degree: usize,
}

impl<V> Node<V> {
    /// Returns the node's identity value.
    #[must_use]
    #[rustfmt::skip]
    pub fn value(&self) -> &V { &self.value }

    /// Returns the number of edges that have this node as source or target.
    #[must_use]
    #[rustfmt::skip]
    pub fn degree(&self) -> usize { self.degree }
}

/// A directed edge between two nodes of the same graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge<E> {
    source: NodeId,
    target: NodeId,
    value: E,
}

impl<E> Edge<E> {
    /// Returns the source endpoint.
    #[must_use]
    #[rustfmt::skip]
    pub fn source(&self) -> NodeId { self.source }

    /// Returns the target endpoint.
    #[must_use]
    #[rustfmt::skip]
    pub fn target(&self) -> NodeId { self.target }

    /// Returns the edge value.
    #[must_use]
    #[rustfmt::skip]
    pub fn value(&self) -> &E { &self.value }

    /// Returns `true` when the edge starts and ends at the same node.
    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// A directed multigraph with node values `V` and edge values `E`.
///
/// Parallel edges and self-loops are permitted; generator policies decide
/// whether to create them. Nodes are never removed.
///
/// # Examples
/// ```
/// use relgraph_core::Graph;
///
/// let mut graph = Graph::new();
/// let a = graph.add_node("a");
/// let b = graph.add_node("b");
/// graph.add_edge(a, b, 1.5)?;
/// graph.add_edge(a, b, 2.5)?;
///
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 2);
/// assert_eq!(graph.node(a).map(|node| node.degree()), Some(2));
/// # Ok::<(), relgraph_core::RelgraphError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Graph<V, E> {
    nodes: Vec<Node<V>>,
    edges: Vec<Edge<E>>,
}

impl<V, E> Default for Graph<V, E> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }
}

impl<V, E> Graph<V, E> {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty graph pre-sized for the given node and edge counts.
    #[must_use]
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(size_hint(nodes)),
            edges: Vec::with_capacity(size_hint(edges)),
        }
    }

    /// Creates a graph with one degree-zero node per value, in order.
    ///
    /// # Examples
    /// ```
    /// use relgraph_core::Graph;
    ///
    /// let graph: Graph<char, ()> = Graph::from_node_values(['a', 'b', 'c']);
    /// assert_eq!(graph.node_count(), 3);
    /// assert_eq!(graph.edge_count(), 0);
    /// ```
    #[must_use]
    pub fn from_node_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
    {
        let values = values.into_iter();
        let mut graph = Self::with_capacity(values.size_hint().0, 0);
        for value in values {
            graph.add_node(value);
        }
        graph
    }

    /// Like [`Graph::from_node_values`], but refuses node lists longer than
    /// the cardinality limit before allocating for them.
    ///
    /// # Errors
    /// Returns [`RelgraphError::CapacityExceeded`] when `values` yields more
    /// than `i32::MAX` nodes.
    ///
    /// # Examples
    /// ```
    /// use relgraph_core::{Graph, RelgraphError};
    ///
    /// let graph: Graph<u64, ()> = Graph::try_from_node_values(0..4)?;
    /// assert_eq!(graph.node_count(), 4);
    ///
    /// let oversized = Graph::<u64, ()>::try_from_node_values(0..u64::from(u32::MAX));
    /// assert!(matches!(oversized, Err(RelgraphError::CapacityExceeded { .. })));
    /// # Ok::<(), RelgraphError>(())
    /// ```
    pub fn try_from_node_values<I>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
    {
        let values = values.into_iter();
        let hinted = values.size_hint().0;
        checked_cardinality("node count", hinted as u64)?;
        let mut graph = Self::with_capacity(hinted, 0);
        for value in values {
            if graph.nodes.len() as u64 >= MAX_CARDINALITY {
                return Err(RelgraphError::CapacityExceeded {
                    what: "node count",
                    requested: graph.nodes.len() as u64 + 1,
                    limit: MAX_CARDINALITY,
                });
            }
            graph.add_node(value);
        }
        Ok(graph)
    }

    /// Adds a node and returns its identifier.
    pub fn add_node(&mut self, value: V) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node { value, degree: 0 });
        id
    }

    /// Adds a directed edge from `source` to `target`.
    ///
    /// The degree of `source` is incremented, as is the degree of `target`
    /// when it differs from `source`.
    ///
    /// # Errors
    /// Returns [`RelgraphError::InvalidArgument`] when either endpoint does
    /// not belong to this graph, and [`RelgraphError::CapacityExceeded`] when
    /// the edge count would pass the cardinality limit.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId, value: E) -> Result<EdgeId> {
        self.ensure_member(source)?;
        self.ensure_member(target)?;
        if self.edges.len() as u64 >= MAX_CARDINALITY {
            return Err(RelgraphError::CapacityExceeded {
                what: "edge count",
                requested: self.edges.len() as u64 + 1,
                limit: MAX_CARDINALITY,
            });
        }

        self.bump_degree(source);
        if source != target {
            self.bump_degree(target);
        }
        let id = EdgeId(self.edges.len());
        self.edges.push(Edge {
            source,
            target,
            value,
        });
        Ok(id)
    }

    fn ensure_member(&self, node: NodeId) -> Result<()> {
        if node.0 < self.nodes.len() {
            return Ok(());
        }
        Err(RelgraphError::invalid_argument(format!(
            "node {node} does not belong to a graph with {} nodes",
            self.nodes.len()
        )))
    }

    fn bump_degree(&mut self, node: NodeId) {
        if let Some(slot) = self.nodes.get_mut(node.0) {
            slot.degree += 1;
        }
    }

    /// Removes every edge past the first `len`, newest first, undoing the
    /// degree changes they made.
    pub(crate) fn truncate_edges(&mut self, len: usize) {
        while self.edges.len() > len {
            let Some(edge) = self.edges.pop() else {
                break;
            };
            self.drop_degree(edge.source);
            if edge.source != edge.target {
                self.drop_degree(edge.target);
            }
        }
    }

    fn drop_degree(&mut self, node: NodeId) {
        if let Some(slot) = self.nodes.get_mut(node.0) {
            slot.degree = slot.degree.saturating_sub(1);
        }
    }

    /// Returns the node with the given identifier.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node<V>> {
        self.nodes.get(id.0)
    }

    /// Returns the edge with the given identifier.
    #[must_use]
    pub fn edge(&self, id: EdgeId) -> Option<&Edge<E>> {
        self.edges.get(id.0)
    }

    /// Returns the value of the node with the given identifier.
    #[must_use]
    pub fn node_value(&self, id: NodeId) -> Option<&V> {
        self.node(id).map(Node::value)
    }

    /// Iterates over nodes in insertion order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = &Node<V>> {
        self.nodes.iter()
    }

    /// Iterates over node identifiers in insertion order.
    pub fn node_ids(&self) -> impl ExactSizeIterator<Item = NodeId> + use<V, E> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Iterates over edges in insertion order.
    pub fn edges(&self) -> impl ExactSizeIterator<Item = &Edge<E>> {
        self.edges.iter()
    }

    /// Returns the number of nodes.
    #[must_use]
    #[rustfmt::skip]
    pub fn node_count(&self) -> usize { self.nodes.len() }

    /// Returns the number of edges.
    #[must_use]
    #[rustfmt::skip]
    pub fn edge_count(&self) -> usize { self.edges.len() }

    /// Returns `true` when the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<V, E> Relation for Graph<V, E> {
    type Key = V;
    type Value = E;

    fn visit_cells<F>(&self, mut visit: F)
    where
        F: FnMut(&V, &V, &E),
    {
        for edge in &self.edges {
            if let (Some(source), Some(target)) =
                (self.nodes.get(edge.source.0), self.nodes.get(edge.target.0))
            {
                visit(&source.value, &target.value, &edge.value);
            }
        }
    }

    fn cell_count(&self) -> usize {
        self.edges.len()
    }
}
