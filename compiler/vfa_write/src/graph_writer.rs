//! Generic per-graph writer state.
//!
//! A [`GraphWriter`] borrows one graph and fixes the numbering used in the
//! document for it:
//! - nodes keep their intrinsic [`NodeId`];
//! - edges are numbered by an [`IdPool`], pre-filled by walking every node's
//!   outgoing edges in node-id order.
//!
//! Edges reached later through some other reference (for example an edge
//! unlinked from the graph but still named by a statement list) extend the
//! pool on first use.

use rustc_hash::FxHashMap;
use tracing::{debug, trace};
use vfa_ir::{Graph, GraphEdge, GraphNode, Handle, NodeId};

use crate::error::{GraphKind, Violation, WriteError};
use crate::pool::IdPool;

pub struct GraphWriter<'ir, N, E> {
    graph: &'ir Graph<N, E>,
    kind: GraphKind,
    node_ids: FxHashMap<Handle<N>, NodeId>,
    edges: IdPool<Handle<E>>,
}

impl<'ir, N, E> GraphWriter<'ir, N, E>
where
    N: GraphNode<Edge = E>,
    E: GraphEdge<Node = N>,
{
    pub fn new(graph: &'ir Graph<N, E>, kind: GraphKind) -> Self {
        let mut node_ids = FxHashMap::default();
        node_ids.reserve(graph.node_num());
        let mut edges = IdPool::new("edge");
        for (id, handle, node) in graph.iter() {
            node_ids.insert(handle, id);
            for &edge in &node.base().out_edges {
                edges.record(edge);
            }
        }
        debug!(
            graph = %kind,
            nodes = node_ids.len(),
            edges = edges.len(),
            "graph writer ready"
        );
        GraphWriter {
            graph,
            kind,
            node_ids,
            edges,
        }
    }

    #[inline]
    pub fn graph(&self) -> &'ir Graph<N, E> {
        self.graph
    }

    /// Intrinsic id of a node in the graph's node collection.
    #[track_caller]
    pub fn node_id(&self, node: Handle<N>) -> Result<NodeId, WriteError> {
        self.node_ids.get(&node).copied().ok_or_else(|| {
            WriteError::invariant(Violation::UnknownNode {
                graph: self.kind,
                slot: node.raw(),
            })
        })
    }

    /// Check that a raw id names a node in the node collection.
    #[track_caller]
    pub fn check_id(&self, id: NodeId) -> Result<NodeId, WriteError> {
        match self.graph.handle_of(id) {
            Some(_) => Ok(id),
            None => Err(WriteError::invariant(Violation::UnknownNodeId {
                graph: self.kind,
                id,
            })),
        }
    }

    /// Pool id of an edge, assigning one if the edge has not been seen.
    #[track_caller]
    pub fn edge_id(&mut self, edge: Handle<E>) -> Result<usize, WriteError> {
        if let Some(id) = self.edges.lookup(edge) {
            return Ok(id);
        }
        if self.graph.edge(edge).is_none() {
            return Err(WriteError::invariant(Violation::DanglingHandle {
                kind: "edge",
                index: edge.raw(),
                len: self.graph.edge_slots(),
            }));
        }
        let id = self.edges.id(edge);
        trace!(graph = %self.kind, slot = edge.raw(), id, "edge pooled lazily");
        Ok(id)
    }

    /// Edge with pool id `id`.
    #[track_caller]
    pub fn edge_at(&self, id: usize) -> Result<Option<Handle<E>>, WriteError> {
        self.edges.ptr_for(id)
    }

    /// Number of edges pooled so far.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

#[cfg(test)]
mod tests;
