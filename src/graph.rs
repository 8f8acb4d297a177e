//! Graph model consumed by the layout engine.
//!
//! Node identities are canonicalized into [`NodeId`] at the boundary, so an integer id
//! and its decimal string always refer to the same node.

use glam::{DVec2, DVec3};
use indexmap::IndexMap;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use petgraph::EdgeType;
use std::borrow::Borrow;
use std::fmt;

/// Canonical node identity.
///
/// Integers are stored as their decimal representation, so `NodeId::from(5)` equals
/// `NodeId::from("5")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&NodeId> for NodeId {
    fn from(id: &NodeId) -> Self {
        id.clone()
    }
}

macro_rules! node_id_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for NodeId {
                fn from(id: $t) -> Self {
                    Self(id.to_string())
                }
            }
        )*
    };
}

node_id_from_int!(u32, u64, usize, i32, i64);

/// Mapping from node identity to its coordinate, ordered like the graph's nodes.
pub type CoordinateMap<P> = IndexMap<NodeId, P>;

/// Planar coordinate map.
pub type PlanarMap = CoordinateMap<DVec2>;

/// Spatial coordinate map.
pub type SpatialMap = CoordinateMap<DVec3>;

/// Undirected graph with insertion-ordered node identities.
///
/// Parallel edges collapse into one. Self loops are kept.
#[derive(Debug, Clone, Default)]
pub struct LayoutGraph {
    graph: UnGraph<NodeId, ()>,
    index: IndexMap<NodeId, NodeIndex>,
}

impl LayoutGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: UnGraph::with_capacity(nodes, edges),
            index: IndexMap::with_capacity(nodes),
        }
    }

    /// Builds a graph from an edge list. Nodes are created in first-seen order.
    pub fn from_edges<I, A, B>(edges: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<NodeId>,
        B: Into<NodeId>,
    {
        let mut graph = Self::new();
        for (a, b) in edges {
            graph.add_edge(a, b);
        }
        graph
    }

    /// Adds a node if it is not present yet and returns its index.
    pub fn add_node(&mut self, id: impl Into<NodeId>) -> NodeIndex {
        let id = id.into();
        if let Some(index) = self.index.get(&id) {
            return *index;
        }
        let index = self.graph.add_node(id.clone());
        self.index.insert(id, index);
        index
    }

    /// Connects two nodes, adding missing endpoints first.
    pub fn add_edge(&mut self, a: impl Into<NodeId>, b: impl Into<NodeId>) {
        let a = self.add_node(a);
        let b = self.add_node(b);
        self.graph.update_edge(a, b, ());
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Node identities in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> + '_ {
        self.index.keys()
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.index.keys().cloned().collect()
    }

    /// Neighbor positions of the node at `position`. A self loop yields the node itself.
    pub fn neighbors(&self, position: usize) -> impl Iterator<Item = usize> + '_ {
        self.graph
            .neighbors(NodeIndex::new(position))
            .map(|index| index.index())
    }

    /// Edges as pairs of node positions.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.graph
            .edge_references()
            .map(|edge| (edge.source().index(), edge.target().index()))
    }
}

/// Converts any petgraph graph, using node indices as identities.
///
/// Edge direction is dropped.
impl<N, E, Ty: EdgeType> From<&petgraph::Graph<N, E, Ty>> for LayoutGraph {
    fn from(source: &petgraph::Graph<N, E, Ty>) -> Self {
        let mut graph = Self::with_capacity(source.node_count(), source.edge_count());
        for index in source.node_indices() {
            graph.add_node(index.index());
        }
        for edge in source.edge_references() {
            graph.add_edge(edge.source().index(), edge.target().index());
        }
        graph
    }
}
