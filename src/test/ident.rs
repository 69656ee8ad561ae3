use crate::net::{Dpid, NodeKind};
use crate::topo::Slot;
use std::collections::HashSet;

#[test]
fn slot_names_follow_layer_prefixes() {
    assert_eq!(Slot::Core { index: 1 }.name(), "c1");
    assert_eq!(Slot::Aggregation { pod: 2, index: 1 }.name(), "a2_1");
    assert_eq!(Slot::Edge { pod: 2, index: 1 }.name(), "e2_1");
    assert_eq!(Slot::EdgeHost { pod: 1, edge: 2, seq: 1 }.name(), "he1_2_1");
    assert_eq!(Slot::RingSwitch { index: 3 }.name(), "s3");
    assert_eq!(Slot::StarSwitch.name(), "s0");
    assert_eq!(Slot::Host { index: 5 }.name(), "h5");
}

#[test]
fn dpid_encodes_layer_pod_and_index() {
    assert_eq!(Slot::Core { index: 1 }.dpid(), Some(Dpid(0x0100_0000_0000_0001)));
    assert_eq!(
        Slot::Aggregation { pod: 3, index: 2 }.dpid(),
        Some(Dpid(0x0200_0003_0000_0002))
    );
    assert_eq!(
        Slot::Edge { pod: 3, index: 2 }.dpid(),
        Some(Dpid(0x0300_0003_0000_0002))
    );
    assert_eq!(Slot::Host { index: 1 }.dpid(), None);
    assert_eq!(Slot::EdgeHost { pod: 1, edge: 1, seq: 1 }.dpid(), None);
}

#[test]
fn dpid_formats_as_sixteen_hex_digits() {
    let dpid = Slot::RingSwitch { index: 10 }.dpid().unwrap();
    assert_eq!(dpid.to_string(), "040000000000000a");
    assert_eq!(dpid.to_hex(), "040000000000000a");
}

#[test]
fn identifiers_are_injective_across_layers() {
    let mut slots = vec![Slot::StarSwitch];
    for pod in 1..=8 {
        for index in 1..=16 {
            slots.push(Slot::Core { index: pod * 16 + index });
            slots.push(Slot::Aggregation { pod, index });
            slots.push(Slot::Edge { pod, index });
            for seq in 1..=3 {
                slots.push(Slot::EdgeHost { pod, edge: index, seq });
            }
        }
    }
    for index in 1..=64 {
        slots.push(Slot::RingSwitch { index });
        slots.push(Slot::Host { index });
    }

    let names: HashSet<String> = slots.iter().map(|s| s.name()).collect();
    assert_eq!(names.len(), slots.len());

    let switches: Vec<&Slot> = slots.iter().filter(|s| s.kind().is_switch()).collect();
    let dpids: HashSet<Dpid> = switches.iter().filter_map(|s| s.dpid()).collect();
    assert_eq!(dpids.len(), switches.len());
    assert!(dpids.iter().all(|d| !d.is_zero()));
}

#[test]
fn slot_to_node_carries_coordinates() {
    let agg = Slot::Aggregation { pod: 2, index: 1 }.to_node();
    assert_eq!(agg.kind, NodeKind::AggregationSwitch);
    assert_eq!(agg.pod, Some(2));
    assert_eq!(agg.index, Some(1));

    let core = Slot::Core { index: 4 }.to_node();
    assert_eq!(core.pod, None);
    assert_eq!(core.index, Some(4));

    let host = Slot::EdgeHost { pod: 3, edge: 2, seq: 1 }.to_node();
    assert_eq!(host.kind, NodeKind::Host);
    assert_eq!(host.dpid, None);
    assert_eq!(host.pod, Some(3));

    let ring = Slot::RingSwitch { index: 2 }.to_node();
    assert_eq!((ring.pod, ring.index), (None, None));
}
