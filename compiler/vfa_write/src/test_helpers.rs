//! Shared IR fixtures for writer tests.
//!
//! Only compiled in test builds.

use std::fmt::Display;

use serde_json::Value;
use vfa_ir::{
    AccessPath, CallData, CallPe, ChEdge, ChEdgeKind, ChGraph, ChNode, ClassAttrs,
    ClassHierarchy, DebugInfoHierarchy, FunctionData, IcfgEdge, IcfgEdgeKind, IcfgNode,
    IcfgNodeKind, InstData, Ir, Loop, MemObj, ModuleInfo, ObjFlags, Stmt, StmtKind, TypeDesc,
    TypeKind, ValueDesc, ValueKind, Var, VarKind,
};

use crate::{IrWriter, WriterConfig};

/// Unwrap a fixture-building result, naming what failed.
pub(crate) fn ok<T, E: Display>(what: &str, result: Result<T, E>) -> T {
    result.unwrap_or_else(|e| panic!("{what}: {e}"))
}

/// Build the document for `ir` with the default config.
pub(crate) fn document(ir: &Ir) -> Value {
    ok("to_document", IrWriter::new(ir, WriterConfig::default()).to_document())
}

/// Two value variables (10, 11) joined by one copy.
pub(crate) fn copy_pair() -> Ir {
    let mut ir = Ir::new();
    let a = ok("var 10", ir.pag.add_var(Var::new(10, VarKind::Val)));
    let b = ok("var 11", ir.pag.add_var(Var::new(11, VarKind::Val)));
    ok("copy", ir.pag.add_stmt(Stmt::new(a, b, StmtKind::Copy)));
    ir
}

/// A small but complete program: one caller, one callee, a loop in the
/// caller, a global object, a two-class hierarchy and their symbols.
pub(crate) fn program() -> Ir {
    let mut ir = Ir::new();

    let i32_ty = ir.add_type(TypeDesc::integer(32));
    let ptr_ty = ir.add_type(TypeDesc::pointer(Some(i32_ty)));
    let fn_ty = ir.add_type(TypeDesc {
        byte_size: 0,
        is_single_value: false,
        pointer_to: None,
        kind: TypeKind::Function {
            ret: Some(ptr_ty),
            params: vec![ptr_ty],
            var_arg: false,
        },
    });

    let main = ir.add_value(ValueDesc::new("main", ValueKind::Function(FunctionData::default())));
    let callee = ir.add_value(
        ValueDesc::new(
            "id",
            ValueKind::Function(FunctionData {
                fun_type: Some(fn_ty),
                ..FunctionData::default()
            }),
        )
        .with_type(fn_ty),
    );
    let call_inst = ir.add_value(
        ValueDesc::new(
            "call",
            ValueKind::Call(
                InstData {
                    fun: Some(main),
                    ..InstData::default()
                },
                CallData {
                    callee: Some(callee),
                    ..CallData::default()
                },
            ),
        )
        .with_type(ptr_ty),
    );
    let global = ir.add_value(
        ValueDesc::new("g", ValueKind::GlobalValue { real_def_global: None }).with_type(ptr_ty),
    );

    // ICFG: global 0, main entry 1, loop body 2, call 3, ret 4, callee entry 5, callee exit 6.
    let g_node = ok("icfg 0", ir.icfg.add_node(IcfgNode::new(0, IcfgNodeKind::Global)));
    let entry = ok(
        "icfg 1",
        ir.icfg.add_node(
            IcfgNode::new(1, IcfgNodeKind::FunEntry { fp_nodes: Vec::new() }).in_block(main, None),
        ),
    );
    let body = ok(
        "icfg 2",
        ir.icfg.add_node(
            IcfgNode::new(
                2,
                IcfgNodeKind::Intra {
                    inst: None,
                    is_ret: false,
                },
            )
            .in_block(main, None),
        ),
    );
    let call = ok(
        "icfg 3",
        ir.icfg.add_node(IcfgNode::new(
            3,
            IcfgNodeKind::Call {
                call_inst: Some(call_inst),
                ret: None,
                ap_nodes: Vec::new(),
            },
        )),
    );
    let ret = ok(
        "icfg 4",
        ir.icfg.add_node(IcfgNode::new(
            4,
            IcfgNodeKind::Ret {
                call_inst: Some(call_inst),
                call: None,
                actual_ret: None,
            },
        )),
    );
    let callee_entry = ok(
        "icfg 5",
        ir.icfg.add_node(
            IcfgNode::new(5, IcfgNodeKind::FunEntry { fp_nodes: Vec::new() })
                .in_block(callee, None),
        ),
    );
    let callee_exit = ok(
        "icfg 6",
        ir.icfg.add_node(
            IcfgNode::new(6, IcfgNodeKind::FunExit { formal_ret: None }).in_block(callee, None),
        ),
    );

    // PAG: global pointer 1, its object 2, a field of it 3, formal 4, callee return 5.
    let mem = ir.add_mem_obj(MemObj {
        sym_id: 2,
        ty: Some(i32_ty),
        flags: ObjFlags::GLOBAL | ObjFlags::STATIC,
        max_offset_limit: 4,
        elem_num: 1,
        byte_size: 4,
        ref_val: Some(global),
    });
    let p = ok(
        "var 1",
        ir.pag.add_var(Var::new(1, VarKind::Val).with_value(global).pointer()),
    );
    let o = ok("var 2", ir.pag.add_var(Var::new(2, VarKind::Obj { mem })));
    ok(
        "var 3",
        ir.pag.add_var(Var::new(
            3,
            VarKind::GepObj {
                mem,
                ap_offset: 0,
                base: o,
            },
        )),
    );
    let formal = ok("var 4", ir.pag.add_var(Var::new(4, VarKind::Val).pointer()));
    let ret_var = ok("var 5", ir.pag.add_var(Var::new(5, VarKind::Ret { fun: callee })));

    ok("addr", ir.pag.add_stmt(Stmt::new(o, p, StmtKind::Addr).at(g_node)));
    let call_pe = ok(
        "call pe",
        ir.pag.add_stmt(
            Stmt::new(
                p,
                formal,
                StmtKind::Call(CallPe {
                    call_site: call,
                    fun_entry: callee_entry,
                }),
            )
            .at(call)
            .with_value(call_inst, None),
        ),
    );
    ok(
        "gep",
        ir.pag.add_stmt(Stmt::new(
            formal,
            ret_var,
            StmtKind::Gep {
                ap: AccessPath::constant(0),
                variant_field: false,
            },
        )),
    );

    ok("0->1", ir.icfg.add_edge(IcfgEdge::intra(g_node, entry)));
    ok("1->2", ir.icfg.add_edge(IcfgEdge::intra(entry, body)));
    let back = ok("2->2", ir.icfg.add_edge(IcfgEdge::intra(body, body)));
    ok("2->3", ir.icfg.add_edge(IcfgEdge::intra(body, call)));
    ok(
        "3->5",
        ir.icfg.add_edge(IcfgEdge::new(
            call,
            callee_entry,
            IcfgEdgeKind::Call {
                call_site: Some(call_inst),
                call_pes: vec![call_pe],
            },
        )),
    );
    ok(
        "6->4",
        ir.icfg.add_edge(IcfgEdge::new(
            callee_exit,
            ret,
            IcfgEdgeKind::Ret {
                call_site: Some(call_inst),
                ret_pe: None,
            },
        )),
    );
    ir.icfg.add_loop(Loop {
        back_edges: [back].into_iter().collect(),
        nodes: [body].into_iter().collect(),
        bound: 8,
        ..Loop::default()
    });

    let mut chg = ChGraph::new();
    let mut base_class = ChNode::new(0, "Base");
    base_class.attrs = ClassAttrs::PURE_ABSTRACT;
    base_class.virtual_fn_vectors = vec![vec![callee]];
    base_class.descendants = [1].into_iter().collect();
    let base_class = ok("class 0", chg.add_node(base_class));
    let derived = ok("class 1", chg.add_node(ChNode::new(1, "Derived")));
    ok(
        "inherit",
        chg.add_edge(ChEdge::new(derived, base_class, ChEdgeKind::Inheritance)),
    );
    ir.chg = ClassHierarchy::Ir(chg);

    ir.symbols.val_syms.insert(global, p);
    ir.symbols.obj_syms.insert(global, o);
    ir.symbols.ret_syms.insert(callee, ret_var);

    ir.module = ModuleInfo {
        functions: vec![main, callee],
        globals: vec![global],
        ..ModuleInfo::new("program.ll")
    };
    ir
}

/// `program()` with its class hierarchy recovered from debug info.
pub(crate) fn program_with_debug_info_chg() -> Ir {
    let mut ir = program();
    ir.chg = ClassHierarchy::DebugInfo(DebugInfoHierarchy {
        classes: vec!["Base".to_owned(), "Derived".to_owned()],
    });
    ir
}

/// Member `key` of a JSON object, panicking with the path if absent.
pub(crate) fn at<'v>(value: &'v Value, path: &[&str]) -> &'v Value {
    path.iter().fold(value, |v, key| {
        v.get(*key)
            .unwrap_or_else(|| panic!("missing `{key}` on path {path:?}"))
    })
}
