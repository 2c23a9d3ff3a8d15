//! Content encoders.
//!
//! Each `*_content` method writes the full field set of one entity. Fields
//! are emitted base first, then the fields of the kind family, then the
//! fields of the concrete kind. References inside content go through
//! [`Encode`], so they come out as ids.
//!
//! Every entity's content is written exactly once per document, from
//! [`IrWriter::to_document`].

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use vfa_ir::{
    CallData, ChEdge, ChNode, EdgeBase, Handle, IcfgEdge, IcfgEdgeKind, IcfgNode, IcfgNodeKind,
    InstData, Loop, MemObj, ModuleInfo, NodeBase, NodeId, Stmt, StmtKind, SymbolTable, TypeDesc,
    TypeKind, ValueDesc, ValueKind, ValueRef, Var, VarKind, VarRef,
};

use crate::encode::Encode;
use crate::error::{Violation, WriteError};
use crate::writer::IrWriter;

type Object = Map<String, Value>;

/// Low bits of `edgeFlag` hold the kind code, the call-site label sits above.
const EDGE_KIND_BITS: u32 = 8;

impl IrWriter<'_> {
    fn node_base<E>(
        &mut self,
        obj: &mut Object,
        base: &NodeBase<E>,
        kind: u32,
    ) -> Result<(), WriteError>
    where
        Handle<E>: Encode,
    {
        obj.insert("id".to_owned(), Value::from(base.id.raw()));
        self.field(obj, "nodeKind", &kind)?;
        self.field(obj, "inEdges", &base.in_edges)?;
        self.field(obj, "outEdges", &base.out_edges)
    }

    /// `label` is the call-site id written by the edge plus one, 0 without a
    /// call site.
    fn edge_base<N>(
        &mut self,
        obj: &mut Object,
        base: &EdgeBase<N>,
        label: u64,
    ) -> Result<(), WriteError>
    where
        Handle<N>: Encode,
    {
        self.field(obj, "edgeFlag", &(base.code | (label << EDGE_KIND_BITS)))?;
        self.field(obj, "src", &base.src)?;
        self.field(obj, "dst", &base.dst)
    }

    pub fn var_content(&mut self, var: &Var) -> Result<Value, WriteError> {
        let mut obj = Object::new();
        self.node_base(&mut obj, &var.base, var.kind.code())?;
        self.field(&mut obj, "value", &var.value)?;
        self.field(&mut obj, "isPtr", &var.is_pointer)?;

        // Object family.
        if let Some(mem) = var.kind.mem_obj() {
            self.field(&mut obj, "memObj", &mem)?;
        }

        match &var.kind {
            VarKind::Val
            | VarKind::Obj { .. }
            | VarKind::FiObj { .. }
            | VarKind::DummyVal
            | VarKind::DummyObj { .. } => {}
            VarKind::GepVal { ap, gep_type } => {
                self.field(&mut obj, "ap", ap)?;
                self.field(&mut obj, "gepValType", gep_type)?;
            }
            VarKind::GepObj {
                ap_offset, base, ..
            } => {
                self.field(&mut obj, "apOffset", ap_offset)?;
                self.field(&mut obj, "base", base)?;
            }
            VarKind::Ret { fun } | VarKind::VarArg { fun } => {
                self.field(&mut obj, "callGraphNode", fun)?;
            }
        }
        Ok(Value::Object(obj))
    }

    pub fn stmt_content(&mut self, stmt: &Stmt) -> Result<Value, WriteError> {
        let label = match stmt.kind.call_site() {
            Some(cs) => u64::from(self.icfg.node_id(cs)?.raw()) + 1,
            None => 0,
        };
        let mut obj = Object::new();
        self.edge_base(&mut obj, &stmt.base, label)?;
        self.field(&mut obj, "value", &stmt.value)?;
        self.field(&mut obj, "basicBlock", &stmt.basic_block)?;
        self.field(&mut obj, "icfgNode", &stmt.icfg_node)?;

        match &stmt.kind {
            StmtKind::Addr | StmtKind::Copy | StmtKind::Store | StmtKind::Load => {}
            StmtKind::Gep { ap, variant_field } => {
                self.field(&mut obj, "ap", ap)?;
                self.field(&mut obj, "variantField", variant_field)?;
            }
            StmtKind::Call(pe) | StmtKind::ThreadFork(pe) => {
                self.field(&mut obj, "call", &pe.call_site)?;
                self.field(&mut obj, "entry", &pe.fun_entry)?;
            }
            StmtKind::Ret(pe) | StmtKind::ThreadJoin(pe) => {
                self.field(&mut obj, "call", &pe.call_site)?;
                self.field(&mut obj, "exit", &pe.fun_exit)?;
            }
            StmtKind::Phi {
                operands,
                op_icfg_nodes,
            } => {
                self.field(&mut obj, "opVars", operands)?;
                self.field(&mut obj, "opICFGNodes", op_icfg_nodes)?;
            }
            StmtKind::Select {
                operands,
                condition,
            } => {
                self.field(&mut obj, "opVars", operands)?;
                self.field(&mut obj, "condition", condition)?;
            }
            StmtKind::Cmp {
                operands,
                predicate,
            } => {
                self.field(&mut obj, "opVars", operands)?;
                self.field(&mut obj, "predicate", predicate)?;
            }
            StmtKind::BinaryOp { operands, opcode } => {
                self.field(&mut obj, "opVars", operands)?;
                self.field(&mut obj, "opcode", opcode)?;
            }
            StmtKind::UnaryOp { opcode } => {
                self.field(&mut obj, "opcode", opcode)?;
            }
            StmtKind::Branch {
                successors,
                condition,
                br_inst,
            } => {
                self.field(&mut obj, "successors", successors)?;
                self.field(&mut obj, "cond", condition)?;
                self.field(&mut obj, "brInst", br_inst)?;
            }
        }
        Ok(Value::Object(obj))
    }

    pub fn mem_obj_content(&mut self, mem: &MemObj) -> Result<Value, WriteError> {
        if !self.ir.symbols.obj_map.contains_key(&mem.sym_id) {
            return Err(WriteError::invariant(Violation::UnknownSymbol { sym: mem.sym_id }));
        }
        let mut obj = Object::new();
        self.field(&mut obj, "symId", &mem.sym_id)?;
        self.field(&mut obj, "type", &mem.ty)?;
        self.field(&mut obj, "flags", &mem.flags)?;
        self.field(&mut obj, "maxOffsetLimit", &mem.max_offset_limit)?;
        self.field(&mut obj, "elemNum", &mem.elem_num)?;
        self.field(&mut obj, "byteSize", &mem.byte_size)?;
        self.field(&mut obj, "refVal", &mem.ref_val)?;
        Ok(Value::Object(obj))
    }

    pub fn icfg_node_content(&mut self, node: &IcfgNode) -> Result<Value, WriteError> {
        let mut obj = Object::new();
        self.node_base(&mut obj, &node.base, node.kind.code())?;
        self.field(&mut obj, "fun", &node.fun)?;
        self.field(&mut obj, "bb", &node.bb)?;
        self.field(&mut obj, "pagEdges", &node.stmts)?;

        match &node.kind {
            IcfgNodeKind::Global => {}
            IcfgNodeKind::Intra { inst, is_ret } => {
                self.field(&mut obj, "inst", inst)?;
                self.field(&mut obj, "isRet", is_ret)?;
            }
            IcfgNodeKind::FunEntry { fp_nodes } => {
                self.field(&mut obj, "FPNodes", fp_nodes)?;
            }
            IcfgNodeKind::FunExit { formal_ret } => {
                self.field(&mut obj, "formalRet", formal_ret)?;
            }
            IcfgNodeKind::Call {
                call_inst,
                ret,
                ap_nodes,
            } => {
                self.field(&mut obj, "cs", call_inst)?;
                self.field(&mut obj, "ret", ret)?;
                self.field(&mut obj, "APNodes", ap_nodes)?;
            }
            IcfgNodeKind::Ret {
                call_inst,
                call,
                actual_ret,
            } => {
                self.field(&mut obj, "cs", call_inst)?;
                self.field(&mut obj, "callBlockNode", call)?;
                self.field(&mut obj, "actualRet", actual_ret)?;
            }
        }
        Ok(Value::Object(obj))
    }

    pub fn icfg_edge_content(&mut self, edge: &IcfgEdge) -> Result<Value, WriteError> {
        let label = match edge.kind.call_site() {
            Some(cs) => self.value_id(cs)? as u64 + 1,
            None => 0,
        };
        let mut obj = Object::new();
        self.edge_base(&mut obj, &edge.base, label)?;
        match &edge.kind {
            IcfgEdgeKind::Intra {
                condition,
                branch_cond_val,
            } => {
                self.field(&mut obj, "conditionVar", condition)?;
                self.field(&mut obj, "branchCondVal", branch_cond_val)?;
            }
            IcfgEdgeKind::Call {
                call_site,
                call_pes,
            } => {
                self.field(&mut obj, "cs", call_site)?;
                self.field(&mut obj, "callPEs", call_pes)?;
            }
            IcfgEdgeKind::Ret { call_site, ret_pe } => {
                self.field(&mut obj, "cs", call_site)?;
                self.field(&mut obj, "retPE", ret_pe)?;
            }
        }
        Ok(Value::Object(obj))
    }

    pub fn loop_content(&mut self, lp: &Loop) -> Result<Value, WriteError> {
        let mut obj = Object::new();
        self.field(&mut obj, "entryICFGEdges", &lp.entry_edges)?;
        self.field(&mut obj, "backICFGEdges", &lp.back_edges)?;
        self.field(&mut obj, "inICFGEdges", &lp.in_edges)?;
        self.field(&mut obj, "outICFGEdges", &lp.out_edges)?;
        self.field(&mut obj, "icfgNodes", &lp.nodes)?;
        self.field(&mut obj, "loopBound", &lp.bound)?;
        Ok(Value::Object(obj))
    }

    pub fn ch_node_content(&mut self, node: &ChNode) -> Result<Value, WriteError> {
        for id in node.descendants.iter() {
            self.chg.check_node_id(NodeId::new(id))?;
        }
        let mut obj = Object::new();
        self.node_base(&mut obj, &node.base, 0)?;
        self.field(&mut obj, "className", &node.class_name)?;
        self.field(&mut obj, "flags", &node.attrs)?;
        self.field(&mut obj, "templateInstances", &node.template_instances)?;
        self.field(&mut obj, "virtualFunctionVectors", &node.virtual_fn_vectors)?;
        self.field(&mut obj, "descendants", &node.descendants)?;
        Ok(Value::Object(obj))
    }

    pub fn ch_edge_content(&mut self, edge: &ChEdge) -> Result<Value, WriteError> {
        let mut obj = Object::new();
        self.edge_base(&mut obj, &edge.base, 0)?;
        self.field(&mut obj, "edgeType", edge.kind.kind_name())?;
        Ok(Value::Object(obj))
    }

    pub fn module_content(&mut self, module: &ModuleInfo) -> Result<Value, WriteError> {
        let mut obj = Object::new();
        self.field(&mut obj, "identifier", &module.identifier)?;
        self.field(&mut obj, "functions", &module.functions)?;
        self.field(&mut obj, "globals", &module.globals)?;
        self.field(&mut obj, "aliases", &module.aliases)?;
        self.field(&mut obj, "constants", &module.constants)?;
        self.field(&mut obj, "others", &module.others)?;
        Ok(Value::Object(obj))
    }

    pub fn symbol_table_content(&mut self, symbols: &SymbolTable) -> Result<Value, WriteError> {
        let mut obj = Object::new();
        let val_syms = self.value_keyed(&symbols.val_syms)?;
        obj.insert("valSymMap".to_owned(), val_syms);
        let obj_syms = self.value_keyed(&symbols.obj_syms)?;
        obj.insert("objSymMap".to_owned(), obj_syms);
        let ret_syms = self.value_keyed(&symbols.ret_syms)?;
        obj.insert("returnSymMap".to_owned(), ret_syms);
        let vararg_syms = self.value_keyed(&symbols.vararg_syms)?;
        obj.insert("varargSymMap".to_owned(), vararg_syms);

        let mut obj_map = Object::new();
        for (&sym, mem) in &symbols.obj_map {
            let mem = mem.encode(self)?;
            obj_map.insert(sym.to_string(), mem);
        }
        obj.insert("objMap".to_owned(), Value::Object(obj_map));
        Ok(Value::Object(obj))
    }

    /// Variables keyed by value id.
    fn value_keyed(&mut self, map: &BTreeMap<ValueRef, VarRef>) -> Result<Value, WriteError> {
        let mut obj = Object::new();
        for (&value, var) in map {
            let id = self.value_id(value)?;
            let var = var.encode(self)?;
            obj.insert(id.to_string(), var);
        }
        Ok(Value::Object(obj))
    }

    pub fn type_content(&mut self, ty: &TypeDesc) -> Result<Value, WriteError> {
        let mut obj = Object::new();
        self.field(&mut obj, "kind", ty.kind.kind_name())?;
        self.field(&mut obj, "byteSize", &ty.byte_size)?;
        self.field(&mut obj, "isSingleValTy", &ty.is_single_value)?;
        self.field(&mut obj, "getPointerToTy", &ty.pointer_to)?;

        match &ty.kind {
            TypeKind::Pointer => {}
            TypeKind::Integer { bits } => {
                self.field(&mut obj, "bits", bits)?;
            }
            TypeKind::Function {
                ret,
                params,
                var_arg,
            } => {
                self.field(&mut obj, "retTy", ret)?;
                self.field(&mut obj, "params", params)?;
                self.field(&mut obj, "isVarArg", var_arg)?;
            }
            TypeKind::Struct { name, fields } => {
                self.field(&mut obj, "name", name)?;
                self.field(&mut obj, "fields", fields)?;
            }
            TypeKind::Array { elem, len } => {
                self.field(&mut obj, "typeOfElement", elem)?;
                self.field(&mut obj, "numOfElement", len)?;
            }
            TypeKind::Other { repr } => {
                self.field(&mut obj, "repr", repr)?;
            }
        }
        Ok(Value::Object(obj))
    }

    pub fn value_content(&mut self, value: &ValueDesc) -> Result<Value, WriteError> {
        let mut obj = Object::new();
        self.field(&mut obj, "kind", value.kind.kind_name())?;
        self.field(&mut obj, "name", &value.name)?;
        self.field(&mut obj, "type", &value.ty)?;
        self.field(&mut obj, "sourceLoc", &value.source_loc)?;
        self.field(&mut obj, "ptrInUncalledFun", &value.ptr_in_uncalled_fun)?;
        self.field(&mut obj, "constDataOrAggData", &value.const_data_or_agg)?;

        match &value.kind {
            ValueKind::Constant
            | ValueKind::ConstantData
            | ValueKind::ConstantNull
            | ValueKind::BlackHole
            | ValueKind::Other => {}
            ValueKind::Function(fun) => {
                self.field(&mut obj, "isDecl", &fun.is_decl)?;
                self.field(&mut obj, "intrinsic", &fun.intrinsic)?;
                self.field(&mut obj, "addrTaken", &fun.addr_taken)?;
                self.field(&mut obj, "isUncalled", &fun.is_uncalled)?;
                self.field(&mut obj, "isNotRet", &fun.is_not_ret)?;
                self.field(&mut obj, "varArg", &fun.var_arg)?;
                self.field(&mut obj, "funcType", &fun.fun_type)?;
                self.field(&mut obj, "allArgs", &fun.args)?;
                self.field(&mut obj, "allBBs", &fun.basic_blocks)?;
                self.field(&mut obj, "exitBlock", &fun.exit_block)?;
                self.field(&mut obj, "realDefFun", &fun.real_def_fun)?;
            }
            ValueKind::BasicBlock(bb) => {
                self.field(&mut obj, "fun", &bb.fun)?;
                self.field(&mut obj, "succBBs", &bb.succs)?;
                self.field(&mut obj, "predBBs", &bb.preds)?;
            }
            ValueKind::Instruction(inst) => {
                self.inst_fields(&mut obj, inst)?;
            }
            ValueKind::Call(inst, call) => {
                self.inst_fields(&mut obj, inst)?;
                self.call_fields(&mut obj, call)?;
            }
            ValueKind::VirtualCall(inst, call, vcall) => {
                self.inst_fields(&mut obj, inst)?;
                self.call_fields(&mut obj, call)?;
                self.field(&mut obj, "vCallVtblPtr", &vcall.vtbl_ptr)?;
                self.field(&mut obj, "virtualFunIdx", &vcall.virtual_fun_idx)?;
                self.field(&mut obj, "funNameOfVcall", &vcall.fun_name_of_vcall)?;
            }
            ValueKind::GlobalValue { real_def_global } => {
                self.field(&mut obj, "realDefGlobal", real_def_global)?;
            }
            ValueKind::Argument { fun, arg_no, uncalled } => {
                self.field(&mut obj, "fun", fun)?;
                self.field(&mut obj, "argNo", arg_no)?;
                self.field(&mut obj, "uncalled", uncalled)?;
            }
            ValueKind::ConstantFp { value } => {
                self.field(&mut obj, "dval", value)?;
            }
            ValueKind::ConstantInt { zext, sext } => {
                self.field(&mut obj, "zval", zext)?;
                self.field(&mut obj, "sval", sext)?;
            }
        }
        Ok(Value::Object(obj))
    }

    fn inst_fields(&mut self, obj: &mut Object, inst: &InstData) -> Result<(), WriteError> {
        self.field(obj, "bb", &inst.bb)?;
        self.field(obj, "fun", &inst.fun)?;
        self.field(obj, "isRet", &inst.is_ret)
    }

    fn call_fields(&mut self, obj: &mut Object, call: &CallData) -> Result<(), WriteError> {
        self.field(obj, "args", &call.args)?;
        self.field(obj, "varArg", &call.var_arg)?;
        self.field(obj, "calledVal", &call.callee)
    }
}
