use pretty_assertions::assert_eq;

use super::*;
use crate::arena::Handle;

fn intra(id: u32) -> IcfgNode {
    IcfgNode::new(
        id,
        IcfgNodeKind::Intra {
            inst: None,
            is_ret: false,
        },
    )
}

#[test]
fn first_global_node_is_remembered() {
    let mut icfg = Icfg::new();
    let g = icfg
        .add_node(IcfgNode::new(0, IcfgNodeKind::Global))
        .unwrap_or_else(|e| panic!("{e}"));
    icfg.add_node(IcfgNode::new(1, IcfgNodeKind::Global))
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(icfg.global_node, Some(g));
}

#[test]
fn add_loop_indexes_member_nodes() {
    let mut icfg = Icfg::new();
    let a = icfg.add_node(intra(1)).unwrap_or_else(|e| panic!("{e}"));
    let b = icfg.add_node(intra(2)).unwrap_or_else(|e| panic!("{e}"));
    let back = icfg
        .add_edge(IcfgEdge::intra(b, a))
        .unwrap_or_else(|e| panic!("{e}"));

    let outer = icfg.add_loop(Loop {
        nodes: [a, b].into_iter().collect(),
        back_edges: [back].into_iter().collect(),
        ..Loop::default()
    });
    let inner = icfg.add_loop(Loop {
        nodes: [b].into_iter().collect(),
        bound: 4,
        ..Loop::default()
    });

    assert_eq!(icfg.loops_of(a), &[outer]);
    assert_eq!(icfg.loops_of(b), &[outer, inner]);
    assert!(icfg.loops_of(Handle::new(9)).is_empty());
}

#[test]
fn edge_codes_follow_kind() {
    let mut icfg = Icfg::new();
    let a = icfg.add_node(intra(1)).unwrap_or_else(|e| panic!("{e}"));
    let b = icfg.add_node(intra(2)).unwrap_or_else(|e| panic!("{e}"));
    let edge = IcfgEdge::new(
        a,
        b,
        IcfgEdgeKind::Call {
            call_site: Some(Handle::new(6)),
            call_pes: Vec::new(),
        },
    );
    assert_eq!(edge.base.code, 1);
    assert_eq!(IcfgEdge::intra(a, b).base.code, 0);
}

#[test]
fn inter_family_excludes_global_and_intra() {
    assert!(!IcfgNodeKind::Global.is_inter());
    assert!(!intra(0).kind.is_inter());
    assert!(IcfgNodeKind::FunExit { formal_ret: None }.is_inter());
}
