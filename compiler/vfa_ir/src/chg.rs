//! Class hierarchy.
//!
//! The hierarchy is built either from the IR itself ([`ChGraph`]) or from
//! debug information ([`DebugInfoHierarchy`]); which one a run produces is
//! decided by the front end, so [`ClassHierarchy`] carries either.

use bitflags::bitflags;

use crate::bitset::SparseBitSet;
use crate::graph::{EdgeBase, Graph, GraphEdge, GraphNode, NodeBase, NodeId};
use crate::{ChNodeRef, ValueRef};

bitflags! {
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct ClassAttrs: u32 {
        const PURE_ABSTRACT = 1 << 0;
        const MULTI_INHERITANCE = 1 << 1;
        const TEMPLATE = 1 << 2;
    }
}

#[derive(Clone, Debug)]
pub struct ChNode {
    pub base: NodeBase<ChEdge>,
    pub class_name: String,
    pub attrs: ClassAttrs,
    /// Instantiations of a class template.
    pub template_instances: Vec<ChNodeRef>,
    /// One function vector per virtual table of the class.
    pub virtual_fn_vectors: Vec<Vec<ValueRef>>,
    /// Ids of all transitive subclasses.
    pub descendants: SparseBitSet,
}

impl ChNode {
    pub fn new(id: u32, class_name: impl Into<String>) -> Self {
        ChNode {
            base: NodeBase::new(NodeId::new(id)),
            class_name: class_name.into(),
            attrs: ClassAttrs::empty(),
            template_instances: Vec::new(),
            virtual_fn_vectors: Vec::new(),
            descendants: SparseBitSet::new(),
        }
    }
}

impl GraphNode for ChNode {
    type Edge = ChEdge;

    fn base(&self) -> &NodeBase<ChEdge> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase<ChEdge> {
        &mut self.base
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChEdgeKind {
    Inheritance,
    Instance,
}

impl ChEdgeKind {
    pub fn code(self) -> u64 {
        match self {
            ChEdgeKind::Inheritance => 0,
            ChEdgeKind::Instance => 1,
        }
    }

    pub fn kind_name(self) -> &'static str {
        match self {
            ChEdgeKind::Inheritance => "INHERITANCE",
            ChEdgeKind::Instance => "INSTANCE",
        }
    }
}

/// Edge from a subclass (or template instance) to its base (or template).
#[derive(Clone, Debug)]
pub struct ChEdge {
    pub base: EdgeBase<ChNode>,
    pub kind: ChEdgeKind,
}

impl ChEdge {
    pub fn new(src: ChNodeRef, dst: ChNodeRef, kind: ChEdgeKind) -> Self {
        ChEdge {
            base: EdgeBase::new(src, dst, kind.code()),
            kind,
        }
    }
}

impl GraphEdge for ChEdge {
    type Node = ChNode;

    fn base(&self) -> &EdgeBase<ChNode> {
        &self.base
    }
}

pub type ChGraph = Graph<ChNode, ChEdge>;

/// Hierarchy recovered from debug information; only class names survive.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DebugInfoHierarchy {
    pub classes: Vec<String>,
}

#[derive(Debug)]
pub enum ClassHierarchy {
    Ir(ChGraph),
    DebugInfo(DebugInfoHierarchy),
}

impl ClassHierarchy {
    pub fn graph(&self) -> Option<&ChGraph> {
        match self {
            ClassHierarchy::Ir(graph) => Some(graph),
            ClassHierarchy::DebugInfo(_) => None,
        }
    }
}

impl Default for ClassHierarchy {
    fn default() -> Self {
        ClassHierarchy::Ir(ChGraph::default())
    }
}
