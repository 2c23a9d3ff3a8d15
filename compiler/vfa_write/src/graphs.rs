//! Per-graph writers.
//!
//! Each wraps the generic [`GraphWriter`] for one program graph and adds the
//! auxiliary pool that graph needs.

use tracing::debug;
use vfa_ir::{
    ChEdge, ChEdgeRef, ChNode, ChNodeRef, ClassHierarchy, Icfg, IcfgEdge, IcfgEdgeRef, IcfgNode,
    IcfgNodeRef, LoopRef, MemObjRef, NodeId, Pag, Stmt, StmtRef, Var, VarRef,
};

use crate::error::{GraphKind, Violation, WriteError};
use crate::graph_writer::GraphWriter;
use crate::pool::IdPool;

/// Writer state for the assignment graph.
pub struct PagWriter<'ir> {
    pag: &'ir Pag,
    graph: GraphWriter<'ir, Var, Stmt>,
    mem_objs: IdPool<MemObjRef>,
}

impl<'ir> PagWriter<'ir> {
    /// Memory objects are numbered in the order object variables appear.
    pub fn new(pag: &'ir Pag) -> Self {
        let graph = GraphWriter::new(&pag.graph, GraphKind::Pag);
        let mut mem_objs = IdPool::new("memObj");
        for (_, _, var) in pag.graph.iter() {
            if let Some(mem) = var.kind.mem_obj() {
                mem_objs.record(mem);
            }
        }
        PagWriter {
            pag,
            graph,
            mem_objs,
        }
    }

    #[inline]
    pub fn writer(&self) -> &GraphWriter<'ir, Var, Stmt> {
        &self.graph
    }

    #[track_caller]
    pub fn node_id(&self, var: VarRef) -> Result<NodeId, WriteError> {
        self.graph.node_id(var)
    }

    #[track_caller]
    pub fn edge_id(&mut self, stmt: StmtRef) -> Result<usize, WriteError> {
        self.graph.edge_id(stmt)
    }

    #[track_caller]
    pub fn mem_obj_id(&mut self, mem: MemObjRef) -> Result<usize, WriteError> {
        if !self.pag.mem_objs.contains(mem) {
            return Err(WriteError::invariant(Violation::DanglingHandle {
                kind: "memory object",
                index: mem.raw(),
                len: self.pag.mem_objs.len(),
            }));
        }
        Ok(self.mem_objs.id(mem))
    }

    pub fn mem_objs(&self) -> &IdPool<MemObjRef> {
        &self.mem_objs
    }
}

/// Writer state for the ICFG.
pub struct IcfgWriter<'ir> {
    icfg: &'ir Icfg,
    graph: GraphWriter<'ir, IcfgNode, IcfgEdge>,
    loops: IdPool<LoopRef>,
}

impl<'ir> IcfgWriter<'ir> {
    /// Loops are numbered in the order their member nodes appear.
    pub fn new(icfg: &'ir Icfg) -> Self {
        let graph = GraphWriter::new(&icfg.graph, GraphKind::Icfg);
        let mut loops = IdPool::new("loop");
        for (_, handle, _) in icfg.graph.iter() {
            for &lp in icfg.loops_of(handle) {
                loops.record(lp);
            }
        }
        IcfgWriter { icfg, graph, loops }
    }

    #[inline]
    pub fn writer(&self) -> &GraphWriter<'ir, IcfgNode, IcfgEdge> {
        &self.graph
    }

    #[track_caller]
    pub fn node_id(&self, node: IcfgNodeRef) -> Result<NodeId, WriteError> {
        self.graph.node_id(node)
    }

    #[track_caller]
    pub fn edge_id(&mut self, edge: IcfgEdgeRef) -> Result<usize, WriteError> {
        self.graph.edge_id(edge)
    }

    #[track_caller]
    pub fn loop_id(&mut self, lp: LoopRef) -> Result<usize, WriteError> {
        if !self.icfg.loops.contains(lp) {
            return Err(WriteError::invariant(Violation::DanglingHandle {
                kind: "loop",
                index: lp.raw(),
                len: self.icfg.loops.len(),
            }));
        }
        Ok(self.loops.id(lp))
    }

    pub fn loops(&self) -> &IdPool<LoopRef> {
        &self.loops
    }
}

/// Writer state for the class hierarchy.
///
/// Only an IR-backed hierarchy has a graph to write; for any other backing
/// the inner writer is absent and every lookup fails with
/// [`Violation::MissingGraph`].
pub struct ChgWriter<'ir> {
    graph: Option<GraphWriter<'ir, ChNode, ChEdge>>,
}

impl<'ir> ChgWriter<'ir> {
    pub fn new(chg: &'ir ClassHierarchy) -> Self {
        let graph = match chg {
            ClassHierarchy::Ir(graph) => Some(GraphWriter::new(graph, GraphKind::Chg)),
            ClassHierarchy::DebugInfo(_) => {
                debug!("class hierarchy from debug info, no graph to write");
                None
            }
        };
        ChgWriter { graph }
    }

    #[inline]
    pub fn writer(&self) -> Option<&GraphWriter<'ir, ChNode, ChEdge>> {
        self.graph.as_ref()
    }

    #[track_caller]
    pub fn node_id(&self, node: ChNodeRef) -> Result<NodeId, WriteError> {
        match &self.graph {
            Some(graph) => graph.node_id(node),
            None => Err(WriteError::invariant(Violation::MissingGraph)),
        }
    }

    #[track_caller]
    pub fn check_node_id(&self, id: NodeId) -> Result<NodeId, WriteError> {
        match &self.graph {
            Some(graph) => graph.check_id(id),
            None => Err(WriteError::invariant(Violation::MissingGraph)),
        }
    }

    #[track_caller]
    pub fn edge_id(&mut self, edge: ChEdgeRef) -> Result<usize, WriteError> {
        match &mut self.graph {
            Some(graph) => graph.edge_id(edge),
            None => Err(WriteError::invariant(Violation::MissingGraph)),
        }
    }
}
