//! Per-tick node transfer planning.
//!
//! A node moves vehicles from its incoming links' gates onto their chosen
//! downstream links once per tick (phase B).  Planning and application are
//! split so the same policy serves both executors: `plan_transfers` reads the
//! post-phase-A state (plus a node-local shadow of its own planned
//! admissions) and produces a [`NodeTransferPlan`]; the graph applies plans
//! in stable registry order with a final `has_space` re-check
//! ([`NetworkGraph::apply_plan`]).
//!
//! [`NetworkGraph::apply_plan`]: crate::NetworkGraph::apply_plan

use qm_core::{LinkId, NodeId, NodeRng, VehicleId};
use rustc_hash::FxHashMap;

use crate::{EPSILON, NetworkLink};

// ── Plan types ────────────────────────────────────────────────────────────────

/// One intended vehicle movement out of a gate.
#[derive(Copy, Clone, Debug)]
pub struct PlannedTransfer {
    pub from_link: LinkId,
    pub vehicle: VehicleId,
    /// `None` = the trip ends here; the vehicle leaves the network.
    pub to_link: Option<LinkId>,
}

/// All transfers one node intends this tick, in application order.
#[derive(Debug, Default)]
pub struct NodeTransferPlan {
    pub node: NodeId,
    pub moves: Vec<PlannedTransfer>,
}

impl NodeTransferPlan {
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

// ── NetworkNode ───────────────────────────────────────────────────────────────

/// Runtime state of one node: its incoming links and its private RNG.
///
/// The RNG draws a fresh permutation of the active incoming links every tick
/// so no in-link is systematically favored when downstream capacity is
/// scarce.  It is seeded from the run seed and the node id only — the
/// permutation sequence is identical across executors and thread counts.
pub struct NetworkNode {
    id: NodeId,
    in_links: Vec<LinkId>,
    rng: NodeRng,
}

impl NetworkNode {
    pub fn new(id: NodeId, in_links: Vec<LinkId>, rng: NodeRng) -> Self {
        Self { id, in_links, rng }
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn in_links(&self) -> &[LinkId] {
        &self.in_links
    }

    /// Decide this tick's transfers out of the incoming gates.
    ///
    /// For each incoming link, in this tick's random order, gate vehicles are
    /// considered strictly FIFO: a trip-ending vehicle always exits; a
    /// forwarding vehicle needs space on its chosen link (counting what this
    /// plan already claims).  The first vehicle that cannot move blocks the
    /// rest of its gate for the tick — spillback — while other incoming
    /// links continue independently.
    pub fn plan_transfers(&mut self, links: &[NetworkLink]) -> NodeTransferPlan {
        let mut order: Vec<LinkId> = self
            .in_links
            .iter()
            .copied()
            .filter(|l| !links[l.index()].is_gate_empty())
            .collect();
        if order.is_empty() {
            return NodeTransferPlan { node: self.id, moves: Vec::new() };
        }
        self.rng.shuffle(&mut order);

        let mut moves = Vec::new();
        // Storage already claimed by this plan, per downstream link.
        let mut claimed: FxHashMap<LinkId, f64> = FxHashMap::default();

        for in_id in order {
            let in_link = &links[in_id.index()];
            for vehicle in in_link.gate_vehicles() {
                match vehicle.driver().choose_next_link(in_id) {
                    None => {
                        moves.push(PlannedTransfer {
                            from_link: in_id,
                            vehicle: vehicle.id(),
                            to_link: None,
                        });
                    }
                    Some(next) => {
                        let target = &links[next.index()];
                        let already = claimed.get(&next).copied().unwrap_or(0.0);
                        if target.storage_pcu() - (target.occupied_pcu() + already) > EPSILON {
                            moves.push(PlannedTransfer {
                                from_link: in_id,
                                vehicle: vehicle.id(),
                                to_link: Some(next),
                            });
                            *claimed.entry(next).or_insert(0.0) += vehicle.size_pcu();
                        } else {
                            // Spillback: this gate is done for the tick.
                            break;
                        }
                    }
                }
            }
        }

        NodeTransferPlan { node: self.id, moves }
    }
}
