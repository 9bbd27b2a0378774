//! Core directed graph implementation.
//!
//! This module provides [`DirectedGraph`], the primary graph data structure used
//! throughout the analysis infrastructure. The implementation uses adjacency lists
//! for efficient traversal while maintaining full edge data access.
//!
//! The graph supports both owned and borrowed node data through [`Cow`], enabling
//! zero-copy graph construction when nodes are borrowed from external storage.

use std::borrow::Cow;

use crate::{
    utils::graph::{
        edge::EdgeId,
        node::NodeId,
        traits::{GraphBase, Predecessors, Successors},
    },
    Error, Result,
};

/// Internal storage for edge data and endpoints.
#[derive(Debug, Clone)]
struct EdgeData<E> {
    /// Source node of the edge
    source: NodeId,
    /// Target node of the edge
    target: NodeId,
    /// User-provided edge data
    data: E,
}

/// A directed graph with typed node and edge data.
///
/// `DirectedGraph` provides a flexible, efficient graph implementation suitable for
/// program analysis tasks. It supports:
///
/// - Generic node data (`N`) - Store any data associated with each node
/// - Generic edge data (`E`) - Store any data associated with each edge
/// - Efficient adjacency queries via adjacency lists
/// - Both forward (successors) and backward (predecessors) traversal
/// - Borrowed or owned node storage via [`Cow`]
///
/// The control flow view of a function is a `DirectedGraph` whose nodes are basic
/// blocks and whose edges carry branch classification, but nothing in this type is
/// specific to that use.
///
/// # Memory Layout
///
/// Nodes are stored in a [`Cow`] slice, edges in a contiguous vector indexed by
/// `EdgeId`, and the adjacency lists (outgoing/incoming) store `EdgeId` references.
/// This gives O(1) node/edge access and efficient iteration.
///
/// # Lifetime Parameter
///
/// The `'a` lifetime parameter represents the lifetime of borrowed node data:
/// - Use `DirectedGraph<'static, N, E>` for owned graphs (nodes are `Cow::Owned`)
/// - Use `DirectedGraph<'a, N, E>` when borrowing nodes from external storage
///
/// # Thread Safety
///
/// `DirectedGraph<N, E>` is [`Send`] and [`Sync`] when both `N` and `E` are,
/// enabling safe concurrent read access after construction. The graph does not
/// support concurrent modification; build the graph single-threaded, then use
/// it immutably from multiple threads.
///
/// # Examples
///
/// ```rust
/// use depscope::graph::{DirectedGraph, NodeId};
///
/// let mut graph: DirectedGraph<&str, i32> = DirectedGraph::new();
///
/// let a = graph.add_node("A");
/// let b = graph.add_node("B");
/// let c = graph.add_node("C");
///
/// graph.add_edge(a, b, 10)?;
/// graph.add_edge(b, c, 20)?;
/// graph.add_edge(a, c, 30)?;
///
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.edge_count(), 3);
///
/// let successors: Vec<NodeId> = graph.successors(a).collect();
/// assert_eq!(successors.len(), 2);
/// # Ok::<(), depscope::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct DirectedGraph<'a, N: Clone, E> {
    /// Node data storage (borrowed or owned)
    nodes: Cow<'a, [N]>,
    /// Edge data storage
    edges: Vec<EdgeData<E>>,
    /// Outgoing edges per node (adjacency list for successors)
    outgoing: Vec<Vec<EdgeId>>,
    /// Incoming edges per node (adjacency list for predecessors)
    incoming: Vec<Vec<EdgeId>>,
}

impl<N: Clone, E> Default for DirectedGraph<'static, N, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Clone, E> DirectedGraph<'static, N, E> {
    /// Creates a new empty directed graph with owned storage.
    ///
    /// The graph starts with no nodes or edges. Use [`add_node`](Self::add_node)
    /// and [`add_edge`](Self::add_edge) to build up the graph structure.
    #[must_use]
    pub fn new() -> Self {
        DirectedGraph {
            nodes: Cow::Owned(Vec::new()),
            edges: Vec::new(),
            outgoing: Vec::new(),
            incoming: Vec::new(),
        }
    }

    /// Creates a new directed graph with pre-allocated capacity.
    ///
    /// Pre-allocating capacity avoids reallocations during construction when the
    /// approximate size of the graph is known in advance.
    ///
    /// # Arguments
    ///
    /// * `node_capacity` - Expected number of nodes
    /// * `edge_capacity` - Expected number of edges
    #[must_use]
    pub fn with_capacity(node_capacity: usize, edge_capacity: usize) -> Self {
        DirectedGraph {
            nodes: Cow::Owned(Vec::with_capacity(node_capacity)),
            edges: Vec::with_capacity(edge_capacity),
            outgoing: Vec::with_capacity(node_capacity),
            incoming: Vec::with_capacity(node_capacity),
        }
    }

    /// Adds a new node with the given data to the graph.
    ///
    /// The node is assigned the next sequential `NodeId`, starting from 0.
    /// The returned `NodeId` can be used to reference this node when adding
    /// edges or querying the graph.
    ///
    /// # Arguments
    ///
    /// * `data` - The data to associate with this node
    ///
    /// # Examples
    ///
    /// ```rust
    /// use depscope::graph::{DirectedGraph, NodeId};
    ///
    /// let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
    ///
    /// let first = graph.add_node("first");
    /// let second = graph.add_node("second");
    ///
    /// assert_eq!(first, NodeId::new(0));
    /// assert_eq!(second, NodeId::new(1));
    /// assert_eq!(graph.node_count(), 2);
    /// ```
    pub fn add_node(&mut self, data: N) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.to_mut().push(data);
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        id
    }

    /// Returns a mutable reference to the data associated with the given node.
    ///
    /// # Arguments
    ///
    /// * `node` - The node to look up
    ///
    /// # Returns
    ///
    /// `Some(&mut N)` if the node exists, `None` otherwise.
    pub fn node_mut(&mut self, node: NodeId) -> Option<&mut N> {
        self.nodes.to_mut().get_mut(node.index())
    }
}

/// Methods available on graphs with either owned or borrowed node storage.
impl<'a, N: Clone, E> DirectedGraph<'a, N, E> {
    /// Creates a new directed graph borrowing nodes from an external slice.
    ///
    /// This enables zero-copy graph construction when nodes already exist in
    /// external storage, such as the basic blocks of a function that outlives
    /// the graph.
    ///
    /// The returned graph has borrowed node storage and empty adjacency lists;
    /// the caller adds edges separately. Edges are always owned. To get an owned
    /// graph, use [`into_owned`](Self::into_owned).
    ///
    /// # Arguments
    ///
    /// * `nodes` - A slice of nodes to borrow
    ///
    /// # Examples
    ///
    /// ```rust
    /// use depscope::graph::{DirectedGraph, NodeId};
    ///
    /// let nodes = vec!["A", "B", "C"];
    /// let mut graph: DirectedGraph<&str, ()> = DirectedGraph::from_nodes_borrowed(&nodes);
    ///
    /// graph.add_edge(NodeId::new(0), NodeId::new(1), ())?;
    /// assert_eq!(graph.node_count(), 3);
    /// # Ok::<(), depscope::Error>(())
    /// ```
    #[must_use]
    pub fn from_nodes_borrowed(nodes: &'a [N]) -> Self {
        let node_count = nodes.len();
        DirectedGraph {
            nodes: Cow::Borrowed(nodes),
            edges: Vec::new(),
            outgoing: vec![Vec::new(); node_count],
            incoming: vec![Vec::new(); node_count],
        }
    }

    /// Converts this graph into an owned graph with `'static` lifetime.
    ///
    /// If the nodes are already owned, this is efficient. If borrowed,
    /// this clones the node data.
    #[must_use]
    pub fn into_owned(self) -> DirectedGraph<'static, N, E> {
        DirectedGraph {
            nodes: Cow::Owned(self.nodes.into_owned()),
            edges: self.edges,
            outgoing: self.outgoing,
            incoming: self.incoming,
        }
    }

    /// Returns `true` if the graph owns its node data.
    ///
    /// Returns `false` if nodes are borrowed from external storage.
    #[must_use]
    pub fn is_owned(&self) -> bool {
        matches!(self.nodes, Cow::Owned(_))
    }

    /// Returns a reference to the data associated with the given node.
    ///
    /// # Arguments
    ///
    /// * `node` - The node to look up
    ///
    /// # Returns
    ///
    /// `Some(&N)` if the node exists, `None` otherwise.
    #[must_use]
    pub fn node(&self, node: NodeId) -> Option<&N> {
        self.nodes.get(node.index())
    }

    /// Returns the number of nodes in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns an iterator over all node identifiers in the graph.
    ///
    /// Nodes are yielded in the order they were added (ascending `NodeId`).
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId::new)
    }

    /// Returns an iterator over all nodes with their identifiers.
    ///
    /// This is useful when you need both the node data and its identifier.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &N)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, data)| (NodeId::new(i), data))
    }

    /// Adds a directed edge from `source` to `target` with the given data.
    ///
    /// The edge is assigned the next sequential `EdgeId`, starting from 0.
    /// Multiple edges between the same pair of nodes are allowed (multigraph),
    /// as are self-loops.
    ///
    /// # Arguments
    ///
    /// * `source` - The source node of the edge
    /// * `target` - The target node of the edge
    /// * `data` - The data to associate with this edge
    ///
    /// # Returns
    ///
    /// The `EdgeId` assigned to the new edge.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphError`] if either `source` or `target` node does not
    /// exist in the graph.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use depscope::graph::{DirectedGraph, EdgeId};
    ///
    /// let mut graph: DirectedGraph<&str, &str> = DirectedGraph::new();
    /// let a = graph.add_node("A");
    /// let b = graph.add_node("B");
    ///
    /// let edge = graph.add_edge(a, b, "A->B")?;
    /// assert_eq!(edge, EdgeId::new(0));
    /// assert_eq!(graph.edge_count(), 1);
    /// # Ok::<(), depscope::Error>(())
    /// ```
    pub fn add_edge(&mut self, source: NodeId, target: NodeId, data: E) -> Result<EdgeId> {
        if source.index() >= self.nodes.len() {
            return Err(Error::GraphError(format!(
                "source node {} does not exist in graph with {} nodes",
                source,
                self.nodes.len()
            )));
        }
        if target.index() >= self.nodes.len() {
            return Err(Error::GraphError(format!(
                "target node {} does not exist in graph with {} nodes",
                target,
                self.nodes.len()
            )));
        }

        let id = EdgeId::new(self.edges.len());
        self.edges.push(EdgeData {
            source,
            target,
            data,
        });

        self.outgoing[source.index()].push(id);
        self.incoming[target.index()].push(id);

        Ok(id)
    }

    /// Returns a reference to the data associated with the given edge.
    ///
    /// # Arguments
    ///
    /// * `edge` - The edge to look up
    ///
    /// # Returns
    ///
    /// `Some(&E)` if the edge exists, `None` otherwise.
    #[must_use]
    pub fn edge(&self, edge: EdgeId) -> Option<&E> {
        self.edges.get(edge.index()).map(|e| &e.data)
    }

    /// Returns a mutable reference to the data associated with the given edge.
    pub fn edge_mut(&mut self, edge: EdgeId) -> Option<&mut E> {
        self.edges.get_mut(edge.index()).map(|e| &mut e.data)
    }

    /// Returns the source and target nodes of the given edge.
    ///
    /// # Arguments
    ///
    /// * `edge` - The edge to look up
    ///
    /// # Returns
    ///
    /// `Some((source, target))` if the edge exists, `None` otherwise.
    #[must_use]
    pub fn edge_endpoints(&self, edge: EdgeId) -> Option<(NodeId, NodeId)> {
        self.edges.get(edge.index()).map(|e| (e.source, e.target))
    }

    /// Returns the number of edges in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns an iterator over all edge identifiers in the graph.
    ///
    /// Edges are yielded in the order they were added (ascending `EdgeId`).
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.edges.len()).map(EdgeId::new)
    }

    /// Returns an iterator over all edges with their identifiers.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &E)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, e)| (EdgeId::new(i), &e.data))
    }

    /// Returns an iterator over the successors of the given node.
    ///
    /// Successors are nodes that are targets of edges originating from this node.
    /// A node reached by multiple parallel edges appears once per edge.
    ///
    /// # Arguments
    ///
    /// * `node` - The node whose successors to iterate
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a valid node in the graph.
    pub fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.outgoing[node.index()]
            .iter()
            .map(|&edge_id| self.edges[edge_id.index()].target)
    }

    /// Returns an iterator over the predecessors of the given node.
    ///
    /// Predecessors are nodes that are sources of edges targeting this node.
    ///
    /// # Arguments
    ///
    /// * `node` - The node whose predecessors to iterate
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a valid node in the graph.
    pub fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.incoming[node.index()]
            .iter()
            .map(|&edge_id| self.edges[edge_id.index()].source)
    }

    /// Returns an iterator over outgoing edges from the given node.
    ///
    /// This provides access to both the edge ID and edge data for more detailed
    /// edge inspection than [`successors`](Self::successors).
    ///
    /// # Arguments
    ///
    /// * `node` - The node whose outgoing edges to iterate
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a valid node in the graph.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use depscope::graph::DirectedGraph;
    ///
    /// let mut graph: DirectedGraph<&str, i32> = DirectedGraph::new();
    /// let a = graph.add_node("A");
    /// let b = graph.add_node("B");
    ///
    /// graph.add_edge(a, b, 42)?;
    ///
    /// for (edge_id, weight) in graph.outgoing_edges(a) {
    ///     println!("Edge {} has weight {}", edge_id, weight);
    /// }
    /// # Ok::<(), depscope::Error>(())
    /// ```
    pub fn outgoing_edges(&self, node: NodeId) -> impl Iterator<Item = (EdgeId, &E)> + '_ {
        self.outgoing[node.index()]
            .iter()
            .map(|&edge_id| (edge_id, &self.edges[edge_id.index()].data))
    }

    /// Returns an iterator over incoming edges to the given node.
    ///
    /// This provides access to both the edge ID and edge data for more detailed
    /// edge inspection than [`predecessors`](Self::predecessors).
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a valid node in the graph.
    pub fn incoming_edges(&self, node: NodeId) -> impl Iterator<Item = (EdgeId, &E)> + '_ {
        self.incoming[node.index()]
            .iter()
            .map(|&edge_id| (edge_id, &self.edges[edge_id.index()].data))
    }

    /// Returns the out-degree (number of outgoing edges) of a node.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a valid node in the graph.
    #[must_use]
    pub fn out_degree(&self, node: NodeId) -> usize {
        self.outgoing[node.index()].len()
    }

    /// Returns the in-degree (number of incoming edges) of a node.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a valid node in the graph.
    #[must_use]
    pub fn in_degree(&self, node: NodeId) -> usize {
        self.incoming[node.index()].len()
    }

    /// Returns `true` if the graph contains no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns an iterator over entry nodes (nodes with no incoming edges).
    ///
    /// Entry nodes have in-degree of zero and are potential starting points
    /// for graph traversal.
    pub fn entry_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.node_ids().filter(|&node| self.in_degree(node) == 0)
    }

    /// Returns an iterator over exit nodes (nodes with no outgoing edges).
    ///
    /// Exit nodes have out-degree of zero and represent terminal points
    /// in the graph.
    pub fn exit_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.node_ids().filter(|&node| self.out_degree(node) == 0)
    }

    /// Checks if the given node ID is valid for this graph.
    ///
    /// # Arguments
    ///
    /// * `node` - The node ID to check
    #[must_use]
    pub fn contains_node(&self, node: NodeId) -> bool {
        node.index() < self.nodes.len()
    }

    /// Checks if the given edge ID is valid for this graph.
    ///
    /// # Arguments
    ///
    /// * `edge` - The edge ID to check
    #[must_use]
    pub fn contains_edge(&self, edge: EdgeId) -> bool {
        edge.index() < self.edges.len()
    }
}

impl<N: Clone, E> GraphBase for DirectedGraph<'_, N, E> {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId::new)
    }
}

impl<N: Clone, E> Successors for DirectedGraph<'_, N, E> {
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        self.outgoing[node.index()]
            .iter()
            .map(|&edge_id| self.edges[edge_id.index()].target)
    }
}

impl<N: Clone, E> Predecessors for DirectedGraph<'_, N, E> {
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        self.incoming[node.index()]
            .iter()
            .map(|&edge_id| self.edges[edge_id.index()].source)
    }
}
