//! VFA IR - whole-program representation for value-flow analysis
//!
//! This crate holds the in-memory program model that analyses build and the
//! writer serializes:
//! - Typed arenas and handles
//! - A generic directed graph whose nodes carry an intrinsic id
//! - The program assignment graph (variables and statements)
//! - The interprocedural control-flow graph with its loops
//! - The class hierarchy
//! - The symbol table linking values to variables and memory objects
//! - Type and value descriptors shared by all graphs
//!
//! # Design
//!
//! - **Handles, not pointers**: every cross-reference is a 4-byte
//!   [`Handle`] into an arena owned by the [`Ir`] snapshot.
//! - **Kinds as enums**: each node/edge category is one struct with shared
//!   base fields and a `kind` enum for the per-kind fields.
//! - **Ordered iteration**: every collection that is walked uses `BTreeMap`
//!   or `Vec`, so traversal order never depends on hashing.

/// Compile-time assertion that a type has a specific size.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod arena;
mod bitset;
pub mod chg;
mod graph;
pub mod icfg;
mod module;
pub mod pag;
mod symbols;
mod types;
mod value;

pub use arena::{Arena, Handle};
pub use bitset::SparseBitSet;
pub use chg::{ChEdge, ChEdgeKind, ChGraph, ChNode, ClassAttrs, ClassHierarchy, DebugInfoHierarchy};
pub use graph::{EdgeBase, Graph, GraphEdge, GraphError, GraphNode, NodeBase, NodeId};
pub use icfg::{Icfg, IcfgEdge, IcfgEdgeKind, IcfgNode, IcfgNodeKind, Loop};
pub use module::ModuleInfo;
pub use pag::{AccessPath, CallPe, MemObj, ObjFlags, Pag, RetPe, Stmt, StmtKind, Var, VarKind};
pub use symbols::{SymId, SymbolTable};
pub use types::{TypeDesc, TypeKind};
pub use value::{
    BasicBlockData, CallData, FunctionData, InstData, ValueDesc, ValueKind, VirtualCallData,
};

pub type TypeRef = Handle<TypeDesc>;
pub type ValueRef = Handle<ValueDesc>;
pub type VarRef = Handle<Var>;
pub type StmtRef = Handle<Stmt>;
pub type IcfgNodeRef = Handle<IcfgNode>;
pub type IcfgEdgeRef = Handle<IcfgEdge>;
pub type ChNodeRef = Handle<ChNode>;
pub type ChEdgeRef = Handle<ChEdge>;
pub type LoopRef = Handle<Loop>;
pub type MemObjRef = Handle<MemObj>;

static_assert_size!(VarRef, 4);
static_assert_size!(Option<NodeId>, 8);

/// A finished whole-program snapshot.
#[derive(Debug, Default)]
pub struct Ir {
    pub types: Arena<TypeDesc>,
    pub values: Arena<ValueDesc>,
    pub pag: Pag,
    pub icfg: Icfg,
    pub chg: ClassHierarchy,
    pub module: ModuleInfo,
    pub symbols: SymbolTable,
}

impl Ir {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_type(&mut self, ty: TypeDesc) -> TypeRef {
        self.types.alloc(ty)
    }

    pub fn add_value(&mut self, value: ValueDesc) -> ValueRef {
        self.values.alloc(value)
    }

    /// Add a memory object and register it under its symbol id.
    pub fn add_mem_obj(&mut self, obj: MemObj) -> MemObjRef {
        let sym = obj.sym_id;
        let mem = self.pag.add_mem_obj(obj);
        self.symbols.obj_map.insert(sym, mem);
        mem
    }
}
