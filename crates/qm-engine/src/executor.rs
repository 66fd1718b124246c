//! Step executors — scheduling strategies for the two-phase tick.
//!
//! Both strategies run the same policy: phase A (every link's `move_link`),
//! a full barrier, phase B planning (every node's `plan_transfers` against
//! the post-phase-A state), and a sequential application of the plans in
//! node-registry order with storage re-checks.  The parallel executor only
//! changes *where* the pure parts run, so a given seed produces one event
//! stream no matter the strategy or thread count.

use qm_core::Tick;
use qm_events::EventsManager;

use crate::{ExitedVehicle, NetworkGraph, NodeTransferPlan};

/// A strategy that advances the whole network by one tick.
pub trait StepExecutor {
    /// Run phase A and phase B for `now`; returns the vehicles that
    /// completed their trips this tick.
    fn advance(
        &mut self,
        graph: &mut NetworkGraph,
        now: Tick,
        events: &mut EventsManager,
    ) -> Vec<ExitedVehicle>;
}

// ── SequentialExecutor ────────────────────────────────────────────────────────

/// Single-threaded executor: registry order throughout.
#[derive(Default)]
pub struct SequentialExecutor;

impl SequentialExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl StepExecutor for SequentialExecutor {
    fn advance(
        &mut self,
        graph: &mut NetworkGraph,
        now: Tick,
        events: &mut EventsManager,
    ) -> Vec<ExitedVehicle> {
        // Phase A.
        graph.move_links(now);

        // Phase B: plan every node against the settled phase-A state, then
        // apply in registry order.
        let plans: Vec<NodeTransferPlan> =
            (0..graph.node_count()).map(|i| graph.plan_node(i)).collect();

        let mut exited = Vec::new();
        for plan in plans {
            graph.apply_plan(plan, now, events, &mut exited);
        }
        exited
    }
}

// ── ParallelExecutor ──────────────────────────────────────────────────────────

/// Rayon-partitioned executor (feature `parallel`).
///
/// Phase A runs `move_link` across the link registry on the Rayon pool —
/// each worker owns a disjoint slice, and links touch only their own state.
/// The end of the parallel iterator is the mandatory barrier: phase B's
/// storage reads must observe every link's settled state, and a partial view
/// would silently violate the storage invariant.  Phase B planning is
/// likewise parallel over the node registry (nodes mutate only their own
/// RNG; links are read-only there), followed by the same sequential apply as
/// the sequential executor.
#[cfg(feature = "parallel")]
#[derive(Default)]
pub struct ParallelExecutor;

#[cfg(feature = "parallel")]
impl ParallelExecutor {
    /// Uses the global Rayon pool.  Configure thread count via
    /// `rayon::ThreadPoolBuilder` before the first tick if the default is
    /// not wanted.
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "parallel")]
impl StepExecutor for ParallelExecutor {
    fn advance(
        &mut self,
        graph: &mut NetworkGraph,
        now: Tick,
        events: &mut EventsManager,
    ) -> Vec<ExitedVehicle> {
        use rayon::prelude::*;

        // Phase A: disjoint &mut per link.  Returns only when every link is
        // done — the phase barrier.
        graph.links_mut().par_iter_mut().for_each(|link| link.move_link(now));

        // Phase B planning: nodes &mut, links shared read-only.  `collect`
        // preserves registry order, so the apply loop below is identical to
        // the sequential executor's.
        let (nodes, links) = graph.split_nodes_links();
        let plans: Vec<NodeTransferPlan> = nodes
            .par_iter_mut()
            .map(|node| node.plan_transfers(links))
            .collect();

        let mut exited = Vec::new();
        for plan in plans {
            graph.apply_plan(plan, now, events, &mut exited);
        }
        exited
    }
}
