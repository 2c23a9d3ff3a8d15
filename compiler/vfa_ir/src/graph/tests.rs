use pretty_assertions::assert_eq;

use super::*;

#[derive(Debug)]
struct TestNode {
    base: NodeBase<TestEdge>,
}

#[derive(Debug)]
struct TestEdge {
    base: EdgeBase<TestNode>,
}

impl GraphNode for TestNode {
    type Edge = TestEdge;

    fn base(&self) -> &NodeBase<TestEdge> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase<TestEdge> {
        &mut self.base
    }
}

impl GraphEdge for TestEdge {
    type Node = TestNode;

    fn base(&self) -> &EdgeBase<TestNode> {
        &self.base
    }
}

fn node(id: u32) -> TestNode {
    TestNode {
        base: NodeBase::new(NodeId::new(id)),
    }
}

fn edge(src: Handle<TestNode>, dst: Handle<TestNode>) -> TestEdge {
    TestEdge {
        base: EdgeBase::new(src, dst, 1),
    }
}

fn add(graph: &mut Graph<TestNode, TestEdge>, id: u32) -> Handle<TestNode> {
    graph
        .add_node(node(id))
        .unwrap_or_else(|e| panic!("add_node({id}) failed: {e}"))
}

#[test]
fn iteration_follows_node_id_order() {
    let mut graph = Graph::new();
    add(&mut graph, 11);
    add(&mut graph, 2);
    add(&mut graph, 10);
    let ids: Vec<u32> = graph.iter().map(|(id, _, _)| id.raw()).collect();
    assert_eq!(ids, vec![2, 10, 11]);
    assert_eq!(graph.node_num(), 3);
}

#[test]
fn duplicate_node_id_is_rejected() {
    let mut graph = Graph::new();
    add(&mut graph, 4);
    assert_eq!(
        graph.add_node(node(4)).err(),
        Some(GraphError::DuplicateNodeId(NodeId::new(4)))
    );
}

#[test]
fn add_edge_links_both_endpoints() {
    let mut graph = Graph::new();
    let a = add(&mut graph, 0);
    let b = add(&mut graph, 1);
    let e1 = graph.add_edge(edge(a, b)).unwrap_or_else(|e| panic!("{e}"));
    let e2 = graph.add_edge(edge(a, a)).unwrap_or_else(|e| panic!("{e}"));

    let a_node = graph.node(a).unwrap_or_else(|| panic!("node a"));
    assert_eq!(a_node.base.out_edges, vec![e1, e2]);
    assert_eq!(a_node.base.in_edges, vec![e2]);
    let b_node = graph.node(b).unwrap_or_else(|| panic!("node b"));
    assert_eq!(b_node.base.in_edges, vec![e1]);
    assert_eq!(graph.edge_num(), 2);
}

#[test]
fn edge_to_foreign_node_is_rejected() {
    let mut graph = Graph::new();
    let a = add(&mut graph, 0);
    let stray = Handle::new(5);
    assert_eq!(
        graph.add_edge(edge(a, stray)).err(),
        Some(GraphError::UnknownEndpoint { slot: 5 })
    );
    assert_eq!(graph.edge_num(), 0);
}

#[test]
fn removed_node_leaves_collection_but_keeps_slot() {
    let mut graph = Graph::new();
    let a = add(&mut graph, 7);
    let removed = graph
        .remove_node(NodeId::new(7))
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(removed, a);
    assert!(!graph.contains_node(a));
    assert!(graph.node(a).is_some());
    assert_eq!(graph.node_num(), 0);
}

#[test]
fn node_with_edges_cannot_be_removed() {
    let mut graph = Graph::new();
    let a = add(&mut graph, 0);
    let b = add(&mut graph, 1);
    graph.add_edge(edge(a, b)).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(
        graph.remove_node(NodeId::new(1)).err(),
        Some(GraphError::NodeHasEdges(NodeId::new(1)))
    );
}

#[test]
fn removed_edge_is_unlinked_but_resolves() {
    let mut graph = Graph::new();
    let a = add(&mut graph, 0);
    let b = add(&mut graph, 1);
    let e = graph.add_edge(edge(a, b)).unwrap_or_else(|e| panic!("{e}"));
    graph.remove_edge(e).unwrap_or_else(|e| panic!("{e}"));

    assert!(graph.edge(e).is_some());
    assert_eq!(graph.edge_num(), 0);
    assert_eq!(graph.edge_slots(), 1);
    let a_node = graph.node(a).unwrap_or_else(|| panic!("node a"));
    assert!(a_node.base.out_edges.is_empty());
    assert_eq!(
        graph.remove_edge(e).err(),
        Some(GraphError::NoSuchEdge { slot: e.raw() })
    );
    // Both endpoints are edge-less again.
    assert!(graph.remove_node(NodeId::new(1)).is_ok());
}
