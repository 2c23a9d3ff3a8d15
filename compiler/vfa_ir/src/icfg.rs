//! Interprocedural control-flow graph.
//!
//! One node per instruction (or per function boundary and call/return site),
//! intra-procedural edges for control flow inside a function, call and return
//! edges linking call sites to callee entry and exit nodes. Loops are
//! kept beside the graph, each node mapping to the loops containing it.

use std::collections::{BTreeMap, BTreeSet};

use crate::arena::Arena;
use crate::graph::{EdgeBase, Graph, GraphEdge, GraphError, GraphNode, NodeBase, NodeId};
use crate::{IcfgEdgeRef, IcfgNodeRef, LoopRef, StmtRef, ValueRef, VarRef};

#[derive(Clone, Debug)]
pub struct IcfgNode {
    pub base: NodeBase<IcfgEdge>,
    pub fun: Option<ValueRef>,
    pub bb: Option<ValueRef>,
    /// Assignment-graph statements attached to this node, in program order.
    pub stmts: Vec<StmtRef>,
    pub kind: IcfgNodeKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IcfgNodeKind {
    Global,
    Intra {
        inst: Option<ValueRef>,
        is_ret: bool,
    },
    FunEntry {
        fp_nodes: Vec<VarRef>,
    },
    FunExit {
        formal_ret: Option<VarRef>,
    },
    Call {
        call_inst: Option<ValueRef>,
        ret: Option<IcfgNodeRef>,
        ap_nodes: Vec<VarRef>,
    },
    Ret {
        call_inst: Option<ValueRef>,
        call: Option<IcfgNodeRef>,
        actual_ret: Option<VarRef>,
    },
}

impl IcfgNodeKind {
    pub fn code(&self) -> u32 {
        match self {
            IcfgNodeKind::Intra { .. } => 0,
            IcfgNodeKind::FunEntry { .. } => 1,
            IcfgNodeKind::FunExit { .. } => 2,
            IcfgNodeKind::Call { .. } => 3,
            IcfgNodeKind::Ret { .. } => 4,
            IcfgNodeKind::Global => 5,
        }
    }

    /// Entry, exit, call and return nodes sit on a function boundary.
    pub fn is_inter(&self) -> bool {
        !matches!(self, IcfgNodeKind::Global | IcfgNodeKind::Intra { .. })
    }
}

impl IcfgNode {
    pub fn new(id: u32, kind: IcfgNodeKind) -> Self {
        IcfgNode {
            base: NodeBase::new(NodeId::new(id)),
            fun: None,
            bb: None,
            stmts: Vec::new(),
            kind,
        }
    }

    #[must_use]
    pub fn in_block(mut self, fun: ValueRef, bb: Option<ValueRef>) -> Self {
        self.fun = Some(fun);
        self.bb = bb;
        self
    }
}

impl GraphNode for IcfgNode {
    type Edge = IcfgEdge;

    fn base(&self) -> &NodeBase<IcfgEdge> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase<IcfgEdge> {
        &mut self.base
    }
}

#[derive(Clone, Debug)]
pub struct IcfgEdge {
    pub base: EdgeBase<IcfgNode>,
    pub kind: IcfgEdgeKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IcfgEdgeKind {
    Intra {
        /// Branch condition guarding the edge, if conditional.
        condition: Option<ValueRef>,
        branch_cond_val: i64,
    },
    Call {
        call_site: Option<ValueRef>,
        call_pes: Vec<StmtRef>,
    },
    Ret {
        call_site: Option<ValueRef>,
        ret_pe: Option<StmtRef>,
    },
}

impl IcfgEdgeKind {
    pub fn code(&self) -> u64 {
        match self {
            IcfgEdgeKind::Intra { .. } => 0,
            IcfgEdgeKind::Call { .. } => 1,
            IcfgEdgeKind::Ret { .. } => 2,
        }
    }

    /// Call instruction of a call or return edge.
    pub fn call_site(&self) -> Option<ValueRef> {
        match self {
            IcfgEdgeKind::Intra { .. } => None,
            IcfgEdgeKind::Call { call_site, .. } | IcfgEdgeKind::Ret { call_site, .. } => {
                *call_site
            }
        }
    }
}

impl IcfgEdge {
    pub fn new(src: IcfgNodeRef, dst: IcfgNodeRef, kind: IcfgEdgeKind) -> Self {
        IcfgEdge {
            base: EdgeBase::new(src, dst, kind.code()),
            kind,
        }
    }

    /// An unconditional intra-procedural edge.
    pub fn intra(src: IcfgNodeRef, dst: IcfgNodeRef) -> Self {
        Self::new(
            src,
            dst,
            IcfgEdgeKind::Intra {
                condition: None,
                branch_cond_val: 0,
            },
        )
    }
}

impl GraphEdge for IcfgEdge {
    type Node = IcfgNode;

    fn base(&self) -> &EdgeBase<IcfgNode> {
        &self.base
    }
}

/// A natural loop over ICFG nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Loop {
    pub entry_edges: BTreeSet<IcfgEdgeRef>,
    pub back_edges: BTreeSet<IcfgEdgeRef>,
    pub in_edges: BTreeSet<IcfgEdgeRef>,
    pub out_edges: BTreeSet<IcfgEdgeRef>,
    pub nodes: BTreeSet<IcfgNodeRef>,
    /// Iteration bound used when unrolling; 0 if unknown.
    pub bound: u32,
}

#[derive(Debug, Default)]
pub struct Icfg {
    pub graph: Graph<IcfgNode, IcfgEdge>,
    pub loops: Arena<Loop>,
    /// Loops containing each node, innermost last.
    pub node_loops: BTreeMap<IcfgNodeRef, Vec<LoopRef>>,
    pub global_node: Option<IcfgNodeRef>,
}

impl Icfg {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node; the first `Global` node becomes the global node.
    pub fn add_node(&mut self, node: IcfgNode) -> Result<IcfgNodeRef, GraphError> {
        let is_global = matches!(node.kind, IcfgNodeKind::Global);
        let handle = self.graph.add_node(node)?;
        if is_global && self.global_node.is_none() {
            self.global_node = Some(handle);
        }
        Ok(handle)
    }

    pub fn add_edge(&mut self, edge: IcfgEdge) -> Result<IcfgEdgeRef, GraphError> {
        self.graph.add_edge(edge)
    }

    /// Store a loop and record it for every node it contains.
    pub fn add_loop(&mut self, lp: Loop) -> LoopRef {
        let nodes: Vec<IcfgNodeRef> = lp.nodes.iter().copied().collect();
        let handle = self.loops.alloc(lp);
        for node in nodes {
            self.node_loops.entry(node).or_default().push(handle);
        }
        handle
    }

    pub fn loops_of(&self, node: IcfgNodeRef) -> &[LoopRef] {
        self.node_loops.get(&node).map_or(&[], Vec::as_slice)
    }
}

#[cfg(test)]
mod tests;
