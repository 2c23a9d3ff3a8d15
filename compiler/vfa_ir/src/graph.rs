//! Generic directed graph with intrinsic node ids.
//!
//! All three program graphs (assignment graph, ICFG, class hierarchy) are
//! instances of [`Graph<N, E>`]. Nodes and edges live in arenas and link to
//! each other through handles:
//!
//! - every node carries a [`NodeBase`] with its intrinsic [`NodeId`] and its
//!   incoming/outgoing edge handles (insertion order);
//! - every edge carries an [`EdgeBase`] with its endpoint node handles and its
//!   kind code.
//!
//! The id map (`BTreeMap<NodeId, Handle<N>>`) is the authoritative node
//! collection. A node removed from it keeps its arena slot, but is no longer
//! part of the graph.

use std::collections::BTreeMap;
use std::fmt;

use crate::arena::{Arena, Handle};

/// Intrinsic node id, assigned when the node is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fields shared by every node kind.
#[derive(Debug)]
pub struct NodeBase<E> {
    pub id: NodeId,
    pub in_edges: Vec<Handle<E>>,
    pub out_edges: Vec<Handle<E>>,
}

impl<E> NodeBase<E> {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            in_edges: Vec::new(),
            out_edges: Vec::new(),
        }
    }
}

impl<E> Clone for NodeBase<E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            in_edges: self.in_edges.clone(),
            out_edges: self.out_edges.clone(),
        }
    }
}

/// Fields shared by every edge kind.
#[derive(Debug)]
pub struct EdgeBase<N> {
    pub src: Handle<N>,
    pub dst: Handle<N>,
    pub code: u64,
}

impl<N> EdgeBase<N> {
    pub fn new(src: Handle<N>, dst: Handle<N>, code: u64) -> Self {
        Self { src, dst, code }
    }
}

impl<N> Clone for EdgeBase<N> {
    fn clone(&self) -> Self {
        Self {
            src: self.src,
            dst: self.dst,
            code: self.code,
        }
    }
}

/// A node stored in a [`Graph`].
pub trait GraphNode {
    type Edge;

    fn base(&self) -> &NodeBase<Self::Edge>;

    fn base_mut(&mut self) -> &mut NodeBase<Self::Edge>;

    #[inline]
    fn id(&self) -> NodeId {
        self.base().id
    }
}

/// An edge stored in a [`Graph`].
pub trait GraphEdge {
    type Node;

    fn base(&self) -> &EdgeBase<Self::Node>;
}

/// Error building a graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A node with this id is already part of the graph.
    DuplicateNodeId(NodeId),
    /// An edge endpoint is not part of the graph's node collection.
    UnknownEndpoint { slot: u32 },
    /// Only nodes without incident edges can be removed.
    NodeHasEdges(NodeId),
    /// No node with this id is part of the graph.
    NoSuchNode(NodeId),
    /// The edge is not linked into the graph.
    NoSuchEdge { slot: u32 },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::DuplicateNodeId(id) => write!(f, "node id {id} is already in use"),
            GraphError::UnknownEndpoint { slot } => {
                write!(f, "edge endpoint (slot {slot}) is not a node of this graph")
            }
            GraphError::NodeHasEdges(id) => {
                write!(f, "node {id} still has incident edges and cannot be removed")
            }
            GraphError::NoSuchNode(id) => write!(f, "no node with id {id}"),
            GraphError::NoSuchEdge { slot } => write!(f, "edge (slot {slot}) is not linked"),
        }
    }
}

impl std::error::Error for GraphError {}

/// Directed multigraph over arena-resident nodes and edges.
#[derive(Debug)]
pub struct Graph<N, E> {
    nodes: Arena<N>,
    edges: Arena<E>,
    id_map: BTreeMap<NodeId, Handle<N>>,
    unlinked_edges: usize,
}

impl<N, E> Default for Graph<N, E> {
    fn default() -> Self {
        Self {
            nodes: Arena::new(),
            edges: Arena::new(),
            id_map: BTreeMap::new(),
            unlinked_edges: 0,
        }
    }
}

impl<N, E> Graph<N, E>
where
    N: GraphNode<Edge = E>,
    E: GraphEdge<Node = N>,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node under its intrinsic id.
    pub fn add_node(&mut self, node: N) -> Result<Handle<N>, GraphError> {
        let id = node.id();
        if self.id_map.contains_key(&id) {
            return Err(GraphError::DuplicateNodeId(id));
        }
        let handle = self.nodes.alloc(node);
        self.id_map.insert(id, handle);
        Ok(handle)
    }

    /// Add an edge and link it into its endpoints' edge lists.
    ///
    /// Both endpoints must be part of the node collection.
    pub fn add_edge(&mut self, edge: E) -> Result<Handle<E>, GraphError> {
        let (src, dst) = (edge.base().src, edge.base().dst);
        for end in [src, dst] {
            if !self.contains_node(end) {
                return Err(GraphError::UnknownEndpoint { slot: end.raw() });
            }
        }
        let handle = self.edges.alloc(edge);
        if let Some(node) = self.nodes.get_mut(src) {
            node.base_mut().out_edges.push(handle);
        }
        if let Some(node) = self.nodes.get_mut(dst) {
            node.base_mut().in_edges.push(handle);
        }
        Ok(handle)
    }

    /// Remove an edge-less node from the node collection.
    ///
    /// The arena slot is kept so existing handles still resolve through
    /// [`node`](Self::node), but the node is no longer part of the graph.
    pub fn remove_node(&mut self, id: NodeId) -> Result<Handle<N>, GraphError> {
        let handle = *self.id_map.get(&id).ok_or(GraphError::NoSuchNode(id))?;
        let has_edges = self
            .nodes
            .get(handle)
            .is_some_and(|n| !n.base().in_edges.is_empty() || !n.base().out_edges.is_empty());
        if has_edges {
            return Err(GraphError::NodeHasEdges(id));
        }
        self.id_map.remove(&id);
        Ok(handle)
    }

    /// Unlink an edge from its endpoints' edge lists.
    ///
    /// As with nodes, the arena slot is kept: handles to the edge held
    /// elsewhere in the IR still resolve through [`edge`](Self::edge).
    pub fn remove_edge(&mut self, handle: Handle<E>) -> Result<(), GraphError> {
        let not_linked = GraphError::NoSuchEdge { slot: handle.raw() };
        let (src, dst) = match self.edges.get(handle) {
            Some(edge) => (edge.base().src, edge.base().dst),
            None => return Err(not_linked),
        };
        let out_edges = &mut self
            .nodes
            .get_mut(src)
            .ok_or_else(|| not_linked.clone())?
            .base_mut()
            .out_edges;
        let pos = out_edges
            .iter()
            .position(|&e| e == handle)
            .ok_or_else(|| not_linked.clone())?;
        out_edges.remove(pos);
        if let Some(node) = self.nodes.get_mut(dst) {
            node.base_mut().in_edges.retain(|&e| e != handle);
        }
        self.unlinked_edges += 1;
        Ok(())
    }

    /// Whether `handle` is a live member of the node collection.
    pub fn contains_node(&self, handle: Handle<N>) -> bool {
        self.nodes
            .get(handle)
            .is_some_and(|n| self.id_map.get(&n.id()) == Some(&handle))
    }

    #[inline]
    pub fn node(&self, handle: Handle<N>) -> Option<&N> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn edge(&self, handle: Handle<E>) -> Option<&E> {
        self.edges.get(handle)
    }

    pub fn handle_of(&self, id: NodeId) -> Option<Handle<N>> {
        self.id_map.get(&id).copied()
    }

    /// Iterate over the node collection in id order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, Handle<N>, &N)> {
        self.id_map
            .iter()
            .filter_map(|(&id, &h)| self.nodes.get(h).map(|n| (id, h, n)))
    }

    /// Number of nodes in the node collection.
    pub fn node_num(&self) -> usize {
        self.id_map.len()
    }

    /// Number of edges linked into the graph.
    pub fn edge_num(&self) -> usize {
        self.edges.len() - self.unlinked_edges
    }

    /// Size of the edge arena, unlinked edges included.
    pub fn edge_slots(&self) -> usize {
        self.edges.len()
    }
}

#[cfg(test)]
mod tests;
