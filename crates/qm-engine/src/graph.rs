//! The runtime network graph: flat id-indexed registries of links and nodes.
//!
//! Links and nodes reference each other only by id, resolved through the
//! registries — the naturally cyclic road graph has no ownership cycles.
//! The topology is fixed at construction; all structural validation happened
//! in [`qm_network::NetworkBuilder`], so building a graph from a validated
//! [`Network`] cannot fail.

use qm_core::{LinkId, NodeId, NodeRng, Tick, VehicleId};
use qm_events::{Event, EventKind, EventsManager};
use qm_network::Network;

use crate::{
    EngineConfig, MobileVehicle, NetworkLink, NetworkNode, NodeTransferPlan, VehicleLocation,
};

/// A vehicle that completed its trip and left the network this tick.
#[derive(Debug)]
pub struct ExitedVehicle {
    pub vehicle: MobileVehicle,
    /// The link at whose downstream end the trip ended.
    pub link: LinkId,
    pub time: Tick,
}

/// Owns the runtime link and node registries and applies node plans.
pub struct NetworkGraph {
    links: Vec<NetworkLink>,
    nodes: Vec<NetworkNode>,
}

impl NetworkGraph {
    /// Build runtime state over a validated static [`Network`].
    pub fn new(network: &Network, config: &EngineConfig) -> Self {
        let links = network
            .links()
            .iter()
            .enumerate()
            .map(|(i, attrs)| NetworkLink::new(LinkId(i as u32), attrs.clone(), config))
            .collect();
        let nodes = (0..network.node_count())
            .map(|i| {
                let id = NodeId(i as u32);
                NetworkNode::new(
                    id,
                    network.in_links(id).to_vec(),
                    NodeRng::new(config.seed, id),
                )
            })
            .collect();
        Self { links, nodes }
    }

    // ── Registry access ───────────────────────────────────────────────────

    #[inline]
    pub fn link(&self, id: LinkId) -> &NetworkLink {
        &self.links[id.index()]
    }

    #[inline]
    pub fn link_mut(&mut self, id: LinkId) -> &mut NetworkLink {
        &mut self.links[id.index()]
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &NetworkNode {
        &self.nodes[id.index()]
    }

    /// All links in stable id order.
    pub fn links(&self) -> &[NetworkLink] {
        &self.links
    }

    pub fn links_mut(&mut self) -> &mut [NetworkLink] {
        &mut self.links
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Split borrow for the plan phase: nodes mutable, links read-only.
    pub fn split_nodes_links(&mut self) -> (&mut [NetworkNode], &[NetworkLink]) {
        (&mut self.nodes, &self.links)
    }

    /// Reset per-run state (gate accumulators) before a fresh run.
    pub fn init(&mut self) {
        for link in &mut self.links {
            link.init();
        }
    }

    // ── Tick phases ───────────────────────────────────────────────────────

    /// Phase A over every link, in registry order.
    pub fn move_links(&mut self, now: Tick) {
        for link in &mut self.links {
            link.move_link(now);
        }
    }

    /// Plan transfers for the node at registry index `index`.
    pub fn plan_node(&mut self, index: usize) -> NodeTransferPlan {
        let (nodes, links) = (&mut self.nodes, &self.links);
        nodes[index].plan_transfers(links)
    }

    /// Apply one node's plan, re-checking storage at the moment of transfer.
    ///
    /// Plans were drawn against the post-phase-A state; by the time a plan is
    /// applied, earlier nodes may have filled a downstream link.  A failed
    /// re-check spills the vehicle back — it and everything behind it in the
    /// same gate stay put until next tick.
    pub fn apply_plan(
        &mut self,
        plan: NodeTransferPlan,
        now: Tick,
        events: &mut EventsManager,
        exited: &mut Vec<ExitedVehicle>,
    ) {
        let mut blocked: Vec<LinkId> = Vec::new();
        for transfer in plan.moves {
            if blocked.contains(&transfer.from_link) {
                continue;
            }
            match transfer.to_link {
                None => {
                    let Some(vehicle) =
                        self.links[transfer.from_link.index()].pop_first_from_gate()
                    else {
                        continue;
                    };
                    debug_assert_eq!(vehicle.id(), transfer.vehicle);
                    events.process(Event {
                        time: now,
                        kind: EventKind::LinkLeave {
                            link: transfer.from_link,
                            vehicle: vehicle.id(),
                        },
                    });
                    events.process(Event {
                        time: now,
                        kind: EventKind::NetworkExit {
                            link: transfer.from_link,
                            vehicle: vehicle.id(),
                        },
                    });
                    exited.push(ExitedVehicle {
                        vehicle,
                        link: transfer.from_link,
                        time: now,
                    });
                }
                Some(next) => {
                    if !self.links[next.index()].has_space() {
                        blocked.push(transfer.from_link);
                        continue;
                    }
                    let Some(mut vehicle) =
                        self.links[transfer.from_link.index()].pop_first_from_gate()
                    else {
                        continue;
                    };
                    debug_assert_eq!(vehicle.id(), transfer.vehicle);
                    events.process(Event {
                        time: now,
                        kind: EventKind::LinkLeave {
                            link: transfer.from_link,
                            vehicle: vehicle.id(),
                        },
                    });
                    vehicle.driver_mut().notify_move_over_node(next);
                    self.links[next.index()].add_from_intersection(vehicle, now, events);
                }
            }
        }
    }

    // ── Diagnostics ───────────────────────────────────────────────────────

    /// Vehicles currently owned by any link collection.
    pub fn vehicle_count(&self) -> usize {
        self.links.iter().map(NetworkLink::vehicle_count).sum()
    }

    /// Locate a vehicle anywhere on the network by scanning the registries.
    ///
    /// The per-link slot maps are the O(1) path
    /// ([`NetworkLink::get_vehicle`]); this scan exists as the fallback
    /// consistency check when the owning link is unknown.
    pub fn find_vehicle(&self, id: VehicleId) -> Option<(LinkId, VehicleLocation)> {
        self.links
            .iter()
            .find_map(|l| l.location(id).map(|loc| (l.id(), loc)))
    }

    /// Run every link's consistency check.  O(total vehicles).
    pub fn check_consistency(&self) {
        for link in &self.links {
            link.check_consistency();
        }
    }
}
