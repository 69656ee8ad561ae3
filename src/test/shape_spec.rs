use crate::TopoError;
use crate::topo::{ShapeGenerator, ShapeSpec};

#[test]
fn shape_spec_parses_fat_tree_with_default_hosts() {
    let spec = ShapeSpec::from_json(r#"{ "kind": "fat_tree", "k": 4 }"#).expect("parse spec");
    assert_eq!(
        spec,
        ShapeSpec::FatTree {
            k: 4,
            hosts_per_edge: 2
        }
    );
    let graph = spec.generate().unwrap();
    assert_eq!(graph.shape(), "fat_tree");
    assert_eq!(graph.nodes().len(), 4 + 8 + 8 + 16);
}

#[test]
fn shape_spec_parses_ring_and_star() {
    let ring = ShapeSpec::from_json(r#"{ "kind": "ring", "num_nodes": 3 }"#).unwrap();
    assert_eq!(ring, ShapeSpec::Ring { num_nodes: 3 });
    assert_eq!(ring.generate().unwrap().shape(), "ring");

    let star = ShapeSpec::from_json(r#"{ "kind": "star", "num_hosts": 2 }"#).unwrap();
    assert_eq!(star.generator().shape(), "star");
}

#[test]
fn shape_spec_rejects_unknown_kind() {
    let err = ShapeSpec::from_json(r#"{ "kind": "torus", "n": 3 }"#).unwrap_err();
    assert!(matches!(err, TopoError::Json(_)), "{err}");
}

#[test]
fn shape_spec_surfaces_invalid_parameters() {
    let spec = ShapeSpec::from_json(r#"{ "kind": "fat_tree", "k": 5 }"#).unwrap();
    assert!(spec.generate().unwrap_err().is_invalid_parameter());
}
