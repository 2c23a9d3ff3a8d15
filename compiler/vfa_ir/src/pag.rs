//! Program assignment graph.
//!
//! Nodes are program variables ([`Var`]), edges are the statements that move
//! values between them ([`Stmt`]). Object variables point into the memory
//! object arena owned by [`Pag`].

use bitflags::bitflags;

use crate::arena::Arena;
use crate::graph::{EdgeBase, Graph, GraphEdge, GraphError, GraphNode, NodeBase, NodeId};
use crate::{IcfgNodeRef, MemObjRef, StmtRef, SymId, TypeRef, ValueRef, VarRef};

/// A program variable.
#[derive(Clone, Debug)]
pub struct Var {
    pub base: NodeBase<Stmt>,
    /// The program value this variable stands for, if any.
    pub value: Option<ValueRef>,
    pub is_pointer: bool,
    pub kind: VarKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VarKind {
    Val,
    Obj {
        mem: MemObjRef,
    },
    GepVal {
        ap: AccessPath,
        gep_type: Option<TypeRef>,
    },
    GepObj {
        mem: MemObjRef,
        ap_offset: i64,
        /// The object variable this field belongs to.
        base: VarRef,
    },
    FiObj {
        mem: MemObjRef,
    },
    Ret {
        fun: ValueRef,
    },
    VarArg {
        fun: ValueRef,
    },
    DummyVal,
    DummyObj {
        mem: MemObjRef,
    },
}

impl VarKind {
    pub fn code(&self) -> u32 {
        match self {
            VarKind::Val => 0,
            VarKind::Obj { .. } => 1,
            VarKind::Ret { .. } => 2,
            VarKind::VarArg { .. } => 3,
            VarKind::GepVal { .. } => 4,
            VarKind::GepObj { .. } => 5,
            VarKind::FiObj { .. } => 6,
            VarKind::DummyVal => 7,
            VarKind::DummyObj { .. } => 8,
        }
    }

    /// The memory object behind an object variable.
    pub fn mem_obj(&self) -> Option<MemObjRef> {
        match self {
            VarKind::Obj { mem }
            | VarKind::GepObj { mem, .. }
            | VarKind::FiObj { mem }
            | VarKind::DummyObj { mem } => Some(*mem),
            VarKind::Val
            | VarKind::GepVal { .. }
            | VarKind::Ret { .. }
            | VarKind::VarArg { .. }
            | VarKind::DummyVal => None,
        }
    }
}

impl Var {
    pub fn new(id: u32, kind: VarKind) -> Self {
        Var {
            base: NodeBase::new(NodeId::new(id)),
            value: None,
            is_pointer: false,
            kind,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: ValueRef) -> Self {
        self.value = Some(value);
        self
    }

    #[must_use]
    pub fn pointer(mut self) -> Self {
        self.is_pointer = true;
        self
    }
}

impl GraphNode for Var {
    type Edge = Stmt;

    fn base(&self) -> &NodeBase<Stmt> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase<Stmt> {
        &mut self.base
    }
}

/// Field access path of a GEP.
///
/// `fld_idx` is the constant field index; variable offsets are kept as
/// (offset variable, indexed type) pairs in source order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccessPath {
    pub fld_idx: i64,
    pub offset_var_and_gep_type_pairs: Vec<(VarRef, Option<TypeRef>)>,
}

impl AccessPath {
    pub fn constant(fld_idx: i64) -> Self {
        AccessPath {
            fld_idx,
            offset_var_and_gep_type_pairs: Vec::new(),
        }
    }
}

/// A statement moving a value from `base.src` to `base.dst`.
#[derive(Clone, Debug)]
pub struct Stmt {
    pub base: EdgeBase<Var>,
    /// Instruction this statement was built from.
    pub value: Option<ValueRef>,
    pub basic_block: Option<ValueRef>,
    pub icfg_node: Option<IcfgNodeRef>,
    pub kind: StmtKind,
}

/// Actual-to-formal parameter passing at a call site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallPe {
    pub call_site: IcfgNodeRef,
    pub fun_entry: IcfgNodeRef,
}

/// Formal-to-actual return passing at a call site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetPe {
    pub call_site: IcfgNodeRef,
    pub fun_exit: IcfgNodeRef,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StmtKind {
    Addr,
    Copy,
    Store,
    Load,
    Gep {
        ap: AccessPath,
        variant_field: bool,
    },
    Call(CallPe),
    Ret(RetPe),
    ThreadFork(CallPe),
    ThreadJoin(RetPe),
    Phi {
        operands: Vec<VarRef>,
        /// Incoming block of each operand, parallel to `operands`.
        op_icfg_nodes: Vec<Option<IcfgNodeRef>>,
    },
    Select {
        operands: Vec<VarRef>,
        condition: VarRef,
    },
    Cmp {
        operands: Vec<VarRef>,
        predicate: u32,
    },
    BinaryOp {
        operands: Vec<VarRef>,
        opcode: u32,
    },
    UnaryOp {
        opcode: u32,
    },
    Branch {
        /// Successor nodes with the condition value selecting each.
        successors: Vec<(IcfgNodeRef, i64)>,
        condition: VarRef,
        br_inst: VarRef,
    },
}

impl StmtKind {
    pub fn code(&self) -> u64 {
        match self {
            StmtKind::Addr => 0,
            StmtKind::Copy => 1,
            StmtKind::Store => 2,
            StmtKind::Load => 3,
            StmtKind::Call(_) => 4,
            StmtKind::Ret(_) => 5,
            StmtKind::Gep { .. } => 6,
            StmtKind::Phi { .. } => 7,
            StmtKind::Select { .. } => 8,
            StmtKind::Cmp { .. } => 9,
            StmtKind::BinaryOp { .. } => 10,
            StmtKind::UnaryOp { .. } => 11,
            StmtKind::Branch { .. } => 12,
            StmtKind::ThreadFork(_) => 13,
            StmtKind::ThreadJoin(_) => 14,
        }
    }

    /// Call site of an inter-procedural statement.
    pub fn call_site(&self) -> Option<IcfgNodeRef> {
        match self {
            StmtKind::Call(pe) | StmtKind::ThreadFork(pe) => Some(pe.call_site),
            StmtKind::Ret(pe) | StmtKind::ThreadJoin(pe) => Some(pe.call_site),
            _ => None,
        }
    }
}

impl Stmt {
    pub fn new(src: VarRef, dst: VarRef, kind: StmtKind) -> Self {
        Stmt {
            base: EdgeBase::new(src, dst, kind.code()),
            value: None,
            basic_block: None,
            icfg_node: None,
            kind,
        }
    }

    #[must_use]
    pub fn at(mut self, icfg_node: IcfgNodeRef) -> Self {
        self.icfg_node = Some(icfg_node);
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: ValueRef, basic_block: Option<ValueRef>) -> Self {
        self.value = Some(value);
        self.basic_block = basic_block;
        self
    }
}

impl GraphEdge for Stmt {
    type Node = Var;

    fn base(&self) -> &EdgeBase<Var> {
        &self.base
    }
}

bitflags! {
    /// Allocation-site properties of a memory object.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct ObjFlags: u32 {
        const FUNCTION = 1 << 0;
        const GLOBAL = 1 << 1;
        const STATIC = 1 << 2;
        const STACK = 1 << 3;
        const HEAP = 1 << 4;
        const VAR_STRUCT = 1 << 5;
        const VAR_ARRAY = 1 << 6;
        const CONST_STRUCT = 1 << 7;
        const CONST_ARRAY = 1 << 8;
        const CONST_GLOBAL = 1 << 9;
        const CONST_DATA = 1 << 10;
    }
}

/// An abstract memory object (one per allocation site).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemObj {
    /// Key of the object in the symbol table's object map.
    pub sym_id: SymId,
    pub ty: Option<TypeRef>,
    pub flags: ObjFlags,
    /// Largest field offset tracked before collapsing to field-insensitive.
    pub max_offset_limit: u32,
    pub elem_num: u32,
    pub byte_size: u32,
    /// Value of the allocation site.
    pub ref_val: Option<ValueRef>,
}

/// The assignment graph plus the memory objects its object variables use.
#[derive(Debug, Default)]
pub struct Pag {
    pub graph: Graph<Var, Stmt>,
    pub mem_objs: Arena<MemObj>,
}

impl Pag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_var(&mut self, var: Var) -> Result<VarRef, GraphError> {
        self.graph.add_node(var)
    }

    pub fn add_stmt(&mut self, stmt: Stmt) -> Result<StmtRef, GraphError> {
        self.graph.add_edge(stmt)
    }

    pub fn add_mem_obj(&mut self, obj: MemObj) -> MemObjRef {
        self.mem_objs.alloc(obj)
    }
}
