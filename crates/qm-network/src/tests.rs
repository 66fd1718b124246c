//! Unit tests for qm-network.

use qm_core::{LinkId, ModeSet, NodeId, TransportMode};

use crate::{LinkSpec, NetworkBuildError, NetworkBuilder};

/// Two nodes joined by a 1 km / 10 m/s / 3600 veh/h single-lane link.
fn one_link_builder() -> NetworkBuilder {
    let mut b = NetworkBuilder::new();
    let n0 = b.add_node();
    let n1 = b.add_node();
    b.add_link(LinkSpec::new(n0, n1, 1_000.0, 10.0, 3_600.0, 1.0));
    b
}

#[cfg(test)]
mod builder {
    use super::*;

    #[test]
    fn ids_are_sequential() {
        let mut b = NetworkBuilder::new();
        assert_eq!(b.add_node(), NodeId(0));
        assert_eq!(b.add_node(), NodeId(1));
        let spec = LinkSpec::new(NodeId(0), NodeId(1), 100.0, 10.0, 3_600.0, 1.0);
        assert_eq!(b.add_link(spec.clone()), LinkId(0));
        assert_eq!(b.add_link(spec), LinkId(1));
    }

    #[test]
    fn adjacency_lists() {
        let mut b = NetworkBuilder::new();
        let n0 = b.add_node();
        let n1 = b.add_node();
        let n2 = b.add_node();
        let l01 = b.add_link(LinkSpec::new(n0, n1, 100.0, 10.0, 3_600.0, 1.0));
        let l12 = b.add_link(LinkSpec::new(n1, n2, 100.0, 10.0, 3_600.0, 1.0));
        let l21 = b.add_link(LinkSpec::new(n2, n1, 100.0, 10.0, 3_600.0, 1.0));
        let net = b.build().unwrap();

        assert_eq!(net.in_links(n1), &[l01, l21]);
        assert_eq!(net.out_links(n1), &[l12]);
        assert!(net.in_links(n0).is_empty());
        assert_eq!(net.node_count(), 3);
        assert_eq!(net.link_count(), 3);
    }

    #[test]
    fn rejects_unknown_node() {
        let mut b = NetworkBuilder::new();
        let n0 = b.add_node();
        b.add_link(LinkSpec::new(n0, NodeId(7), 100.0, 10.0, 3_600.0, 1.0));
        let err = b.build().unwrap_err();
        assert!(matches!(
            err,
            NetworkBuildError::UnknownNode { link_index: 0, node: NodeId(7) }
        ));
    }

    #[test]
    fn rejects_bad_attributes() {
        for (speed, cap, lanes, len) in [
            (0.0, 3_600.0, 1.0, 100.0),
            (10.0, 0.0, 1.0, 100.0),
            (10.0, 3_600.0, 0.0, 100.0),
            (10.0, 3_600.0, 1.0, -1.0),
        ] {
            let mut b = NetworkBuilder::new();
            let n0 = b.add_node();
            let n1 = b.add_node();
            b.add_link(LinkSpec::new(n0, n1, len, speed, cap, lanes));
            assert!(b.build().is_err(), "speed={speed} cap={cap} lanes={lanes} len={len}");
        }
    }
}

#[cfg(test)]
mod attributes {
    use super::*;

    #[test]
    fn flow_capacity_normalised_per_second() {
        let net = one_link_builder().build().unwrap();
        // 3600 veh/h over a 3600 s period = 1 pcu/s.
        assert!((net.link(LinkId(0)).flow_pcu_per_sec - 1.0).abs() < 1e-12);
    }

    #[test]
    fn capacity_period_override() {
        let mut b = NetworkBuilder::new().capacity_period_secs(1.0);
        let n0 = b.add_node();
        let n1 = b.add_node();
        b.add_link(LinkSpec::new(n0, n1, 100.0, 10.0, 2.0, 1.0));
        let net = b.build().unwrap();
        assert!((net.link(LinkId(0)).flow_pcu_per_sec - 2.0).abs() < 1e-12);
    }

    #[test]
    fn storage_from_geometry() {
        let mut b = NetworkBuilder::new();
        let n0 = b.add_node();
        let n1 = b.add_node();
        // 100 m / 7.5 m per car = 13.33 pcu
        b.add_link(LinkSpec::new(n0, n1, 100.0, 10.0, 3_600.0, 1.0));
        // two lanes double it
        b.add_link(LinkSpec::new(n0, n1, 100.0, 10.0, 3_600.0, 2.0));
        let net = b.build().unwrap();
        assert!((net.link(LinkId(0)).storage_pcu - 100.0 / 7.5).abs() < 1e-9);
        assert!((net.link(LinkId(1)).storage_pcu - 200.0 / 7.5).abs() < 1e-9);
    }

    #[test]
    fn storage_floored_at_one() {
        let mut b = NetworkBuilder::new();
        let n0 = b.add_node();
        let n1 = b.add_node();
        // 1 m link would hold 0.13 cars geometrically; floor guarantees 1.0.
        b.add_link(LinkSpec::new(n0, n1, 1.0, 10.0, 3_600.0, 1.0));
        // zero-length connector
        b.add_link(LinkSpec::new(n0, n1, 0.0, 10.0, 3_600.0, 1.0));
        let net = b.build().unwrap();
        assert_eq!(net.link(LinkId(0)).storage_pcu, 1.0);
        assert_eq!(net.link(LinkId(1)).storage_pcu, 1.0);
    }

    #[test]
    fn mode_set_carried() {
        let mut b = NetworkBuilder::new();
        let n0 = b.add_node();
        let n1 = b.add_node();
        b.add_link(
            LinkSpec::new(n0, n1, 100.0, 10.0, 3_600.0, 1.0)
                .modes(ModeSet::of(&[TransportMode::Car, TransportMode::Bike])),
        );
        let net = b.build().unwrap();
        assert!(net.link(LinkId(0)).allows(TransportMode::Bike));
        assert!(!net.link(LinkId(0)).allows(TransportMode::Walk));
    }
}
