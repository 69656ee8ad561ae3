use crate::net::{NodeKind, TopologyGraph};
use crate::topo::fat_tree::{FatTree, MAX_K};
use crate::topo::{MAX_NODES, ShapeGenerator};
use std::collections::HashSet;

fn build(k: usize) -> TopologyGraph {
    FatTree::new(k).generate().expect("valid k")
}

#[test]
fn fat_tree_layer_counts_match_k() {
    for k in [2, 4, 6, 8] {
        let graph = build(k);
        let half = k / 2;
        assert_eq!(graph.count(NodeKind::CoreSwitch), half * half, "k={k}");
        assert_eq!(graph.count(NodeKind::AggregationSwitch), k * half, "k={k}");
        assert_eq!(graph.count(NodeKind::EdgeSwitch), k * half, "k={k}");
        assert_eq!(graph.count(NodeKind::Host), k * half * 2, "k={k}");
        assert_eq!(graph.links().len(), FatTree::new(k).link_count(), "k={k}");
    }
}

#[test]
fn fat_tree_honors_hosts_per_edge() {
    let graph = FatTree::new(4).with_hosts_per_edge(3).generate().unwrap();
    assert_eq!(graph.count(NodeKind::Host), 4 * 2 * 3);
    for edge in graph.nodes_of_kind(NodeKind::EdgeSwitch) {
        assert_eq!(graph.degree(&edge.id), Some(2 + 3), "{}", edge.id);
    }
}

#[test]
fn fat_tree_degree_invariants_hold() {
    for k in [2, 4, 6, 8] {
        let graph = build(k);
        for node in graph.nodes() {
            let degree = graph.degree(&node.id).unwrap();
            let expected = match node.kind {
                NodeKind::CoreSwitch | NodeKind::AggregationSwitch => k,
                NodeKind::EdgeSwitch => k / 2 + 2,
                NodeKind::Host => 1,
                other => panic!("unexpected kind {other}"),
            };
            assert_eq!(degree, expected, "k={k} node={}", node.id);
        }
    }
}

#[test]
fn fat_tree_rejects_invalid_k_without_building() {
    for k in [0, 1, 3, 5, 7, MAX_K + 2] {
        let err = FatTree::new(k).generate().unwrap_err();
        assert!(err.is_invalid_parameter(), "k={k}: {err}");
    }
    let err = FatTree::new(4).with_hosts_per_edge(0).generate().unwrap_err();
    assert!(err.is_invalid_parameter(), "{err}");
}

#[test]
fn fat_tree_identifiers_are_deterministic() {
    let ids = |g: &TopologyGraph| {
        g.nodes()
            .iter()
            .map(|n| (n.id.clone(), n.dpid))
            .collect::<HashSet<_>>()
    };
    for k in [2, 4, 6, 8] {
        let a = build(k);
        let b = build(k);
        assert_eq!(ids(&a), ids(&b), "k={k}");
        assert_eq!(a.nodes(), b.nodes());
        assert_eq!(a.links(), b.links());
    }
}

#[test]
fn fat_tree_dpids_are_unique() {
    for k in [2, 4, 6, 8] {
        let graph = build(k);
        assert!(graph.validate().is_ok());
        let dpids: HashSet<_> = graph.switches().filter_map(|n| n.dpid).collect();
        assert_eq!(dpids.len(), graph.switches().count(), "k={k}");
    }
}

#[test]
fn core_groups_connect_to_matching_aggregation_index() {
    let graph = build(4);
    // c1, c2 属于第 0 组；c3, c4 属于第 1 组
    for (core, agg_index) in [("c1", 1), ("c2", 1), ("c3", 2), ("c4", 2)] {
        let mut peers: Vec<String> = graph
            .neighbors(core)
            .iter()
            .map(|n| n.id.clone())
            .collect();
        peers.sort();
        let expected: Vec<String> = (1..=4).map(|pod| format!("a{pod}_{agg_index}")).collect();
        assert_eq!(peers, expected, "{core}");
    }
}

#[test]
fn aggregation_and_edge_switches_mesh_within_pod_only() {
    let graph = build(6);
    for agg in graph.nodes_of_kind(NodeKind::AggregationSwitch) {
        let edges: Vec<_> = graph
            .neighbors(&agg.id)
            .into_iter()
            .filter(|n| n.kind == NodeKind::EdgeSwitch)
            .collect();
        assert_eq!(edges.len(), 3, "{}", agg.id);
        assert!(edges.iter().all(|e| e.pod == agg.pod), "{}", agg.id);
    }
}

#[test]
fn hosts_hang_off_their_named_edge_switch() {
    let graph = build(4);
    let peers = graph.neighbors("he2_1_2");
    assert_eq!(peers.len(), 1);
    assert_eq!(peers[0].id, "e2_1");
    assert_eq!(graph.nodes()[0].id, "c1");
}

#[test]
fn oversized_hosts_per_edge_is_rejected_before_allocation() {
    for hosts_per_edge in [4_000_000_000, usize::MAX] {
        let err = FatTree::new(4)
            .with_hosts_per_edge(hosts_per_edge)
            .generate()
            .unwrap_err();
        assert!(err.is_invalid_parameter(), "{err}");
    }

    let big = FatTree::new(MAX_K).with_hosts_per_edge(64);
    assert!(big.validate().is_err());
    let (nodes, _) = FatTree::new(MAX_K).with_hosts_per_edge(30).capacity();
    assert!(nodes <= MAX_NODES);
    assert!(FatTree::new(MAX_K).with_hosts_per_edge(30).validate().is_ok());
}
