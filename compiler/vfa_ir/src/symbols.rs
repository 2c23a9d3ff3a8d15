//! Symbol table.
//!
//! Links program values to the assignment-graph variables standing for them,
//! and object symbols to their memory objects. A memory object's `sym_id` is
//! its key in [`SymbolTable::obj_map`].

use std::collections::BTreeMap;

use crate::{MemObjRef, ValueRef, VarRef};

/// Symbol id of a memory object.
pub type SymId = u32;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SymbolTable {
    /// Value to the variable holding it.
    pub val_syms: BTreeMap<ValueRef, VarRef>,
    /// Allocating value to the object variable of its memory.
    pub obj_syms: BTreeMap<ValueRef, VarRef>,
    /// Function to its unique return variable.
    pub ret_syms: BTreeMap<ValueRef, VarRef>,
    /// Function to its unique variadic-argument variable.
    pub vararg_syms: BTreeMap<ValueRef, VarRef>,
    pub obj_map: BTreeMap<SymId, MemObjRef>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }
}
