use pretty_assertions::assert_eq;
use vfa_ir::{Handle, Ir, NodeId, Stmt, StmtKind};

use super::*;
use crate::test_helpers::{copy_pair, ok, program};

#[test]
fn nodes_keep_intrinsic_ids() {
    let ir = copy_pair();
    let writer = GraphWriter::new(&ir.pag.graph, GraphKind::Pag);
    assert_eq!(writer.node_id(Handle::new(0)).ok(), Some(NodeId::new(10)));
    assert_eq!(writer.node_id(Handle::new(1)).ok(), Some(NodeId::new(11)));
}

#[test]
fn foreign_node_handle_is_unknown() {
    let ir = copy_pair();
    let writer = GraphWriter::new(&ir.pag.graph, GraphKind::Pag);
    let err = writer
        .node_id(Handle::new(2))
        .err()
        .unwrap_or_else(|| panic!("handle 2 is not a node"));
    assert_eq!(
        err.violation(),
        Some(&Violation::UnknownNode {
            graph: GraphKind::Pag,
            slot: 2,
        })
    );
}

#[test]
fn edges_are_pooled_by_node_then_out_edge_order() {
    // Statement slots: 0 = addr 2->1, 1 = call 1->4, 2 = gep 4->5.
    let ir = program();
    let writer = GraphWriter::new(&ir.pag.graph, GraphKind::Pag);
    let order: Vec<_> = (1..=writer.edge_count())
        .map(|id| ok("edge_at", writer.edge_at(id)).map(Handle::raw))
        .collect();
    assert_eq!(order, vec![Some(1), Some(0), Some(2)]);
}

#[test]
fn unlinked_edge_is_pooled_on_first_reference() {
    let mut ir = copy_pair();
    let a = Handle::new(0);
    let b = Handle::new(1);
    let load = ok("load", ir.pag.add_stmt(Stmt::new(a, b, StmtKind::Load)));
    ok("unlink", ir.pag.graph.remove_edge(load));

    let mut writer = GraphWriter::new(&ir.pag.graph, GraphKind::Pag);
    assert_eq!(writer.edge_count(), 1);
    assert_eq!(writer.edge_id(load).ok(), Some(2));
    assert_eq!(writer.edge_id(load).ok(), Some(2));
    assert_eq!(writer.edge_count(), 2);
}

#[test]
fn edge_outside_the_arena_is_dangling() {
    let ir = copy_pair();
    let mut writer = GraphWriter::new(&ir.pag.graph, GraphKind::Pag);
    let err = writer
        .edge_id(Handle::new(9))
        .err()
        .unwrap_or_else(|| panic!("slot 9 was never allocated"));
    assert_eq!(
        err.violation(),
        Some(&Violation::DanglingHandle {
            kind: "edge",
            index: 9,
            len: 1,
        })
    );
    assert_eq!(writer.edge_count(), 1);
}

#[test]
fn empty_graph_has_no_entries() {
    let ir = Ir::new();
    let writer = GraphWriter::new(&ir.icfg.graph, GraphKind::Icfg);
    assert_eq!(writer.edge_count(), 0);
    assert_eq!(writer.edge_at(0).ok(), Some(None));
}
