//! Vehicles and the driver capability.
//!
//! A [`MobileVehicle`] is a lightweight handle: a physical descriptor
//! (identity, size in passenger-car equivalents, optional speed cap) paired
//! with the agent currently driving it.  It carries no behavior of its own —
//! all state transitions are performed by the owning [`NetworkLink`] and
//! [`NetworkNode`].
//!
//! [`NetworkLink`]: crate::NetworkLink
//! [`NetworkNode`]: crate::NetworkNode

use qm_core::{LinkId, VehicleId};

// ── DriverAgent ───────────────────────────────────────────────────────────────

/// The single capability the engine needs from an agent: where next?
///
/// `choose_next_link` is a pure peek — it is consulted once per
/// gate-processing attempt at a node, and a vehicle held back by spillback is
/// re-asked on later ticks, so the answer must be repeatable and must not
/// advance any internal route cursor.  Commitment happens in
/// [`notify_move_over_node`](Self::notify_move_over_node), called exactly
/// once when the vehicle actually enters the chosen link.
///
/// # Thread safety
///
/// The parallel executor consults `choose_next_link` from worker threads
/// while planning transfers, so implementations must be `Send + Sync`;
/// per-vehicle mutable state belongs behind `notify_move_over_node`, which
/// only ever runs in the sequential apply phase.
pub trait DriverAgent: Send + Sync {
    /// The id of the link to enter after `current`, or `None` when the trip
    /// ends at the downstream node of `current`.
    fn choose_next_link(&self, current: LinkId) -> Option<LinkId>;

    /// The vehicle has crossed the node and entered `entered`.
    fn notify_move_over_node(&mut self, _entered: LinkId) {}
}

// ── VehicleDescriptor ─────────────────────────────────────────────────────────

/// Physical properties of a vehicle, fixed for its lifetime.
#[derive(Clone, Debug)]
pub struct VehicleDescriptor {
    pub id: VehicleId,
    /// Size in passenger-car equivalents.  A reference car is 1.0.
    pub size_pcu: f64,
    /// Hard speed cap in m/s (e.g. a truck limiter).  `None` = no cap; the
    /// vehicle drives at each link's free-flow speed.
    pub max_speed_ms: Option<f64>,
}

impl VehicleDescriptor {
    /// A reference car: 1.0 pcu, no speed cap.
    pub fn new(id: VehicleId) -> Self {
        Self {
            id,
            size_pcu: 1.0,
            max_speed_ms: None,
        }
    }

    #[must_use]
    pub fn size_pcu(mut self, pcu: f64) -> Self {
        self.size_pcu = pcu;
        self
    }

    #[must_use]
    pub fn max_speed_ms(mut self, ms: f64) -> Self {
        self.max_speed_ms = Some(ms);
        self
    }
}

// ── MobileVehicle ─────────────────────────────────────────────────────────────

/// A vehicle in the simulation: descriptor + current driver.
///
/// Owned by exactly one link collection at any time (or by the exited list
/// after leaving the network); moved by value between owners, never cloned.
pub struct MobileVehicle {
    descriptor: VehicleDescriptor,
    driver: Box<dyn DriverAgent>,
}

impl MobileVehicle {
    pub fn new(descriptor: VehicleDescriptor, driver: Box<dyn DriverAgent>) -> Self {
        Self { descriptor, driver }
    }

    #[inline]
    pub fn id(&self) -> VehicleId {
        self.descriptor.id
    }

    #[inline]
    pub fn size_pcu(&self) -> f64 {
        self.descriptor.size_pcu
    }

    pub fn descriptor(&self) -> &VehicleDescriptor {
        &self.descriptor
    }

    pub fn driver(&self) -> &dyn DriverAgent {
        self.driver.as_ref()
    }

    pub fn driver_mut(&mut self) -> &mut dyn DriverAgent {
        self.driver.as_mut()
    }

    /// Swap the driving agent (e.g. a relay leg picked up by another agent).
    pub fn set_driver(&mut self, driver: Box<dyn DriverAgent>) {
        self.driver = driver;
    }

    /// The speed this vehicle actually reaches on a link with free-flow
    /// speed `freespeed_ms`.
    #[inline]
    pub fn effective_speed_ms(&self, freespeed_ms: f64) -> f64 {
        match self.descriptor.max_speed_ms {
            Some(cap) => freespeed_ms.min(cap),
            None => freespeed_ms,
        }
    }
}

impl std::fmt::Debug for MobileVehicle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MobileVehicle")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

// ── FixedRouteDriver ──────────────────────────────────────────────────────────

/// Driver that follows a precomputed link sequence and ends its trip after
/// the last one.
///
/// The route lists the links *after* the starting link; an empty route means
/// the trip ends at the downstream node of the link the vehicle starts on.
pub struct FixedRouteDriver {
    route: Vec<LinkId>,
    cursor: usize,
}

impl FixedRouteDriver {
    pub fn new(route: Vec<LinkId>) -> Self {
        Self { route, cursor: 0 }
    }

    /// Links not yet driven.
    pub fn remaining(&self) -> &[LinkId] {
        &self.route[self.cursor.min(self.route.len())..]
    }
}

impl DriverAgent for FixedRouteDriver {
    fn choose_next_link(&self, _current: LinkId) -> Option<LinkId> {
        self.route.get(self.cursor).copied()
    }

    fn notify_move_over_node(&mut self, entered: LinkId) {
        debug_assert_eq!(self.route.get(self.cursor), Some(&entered));
        self.cursor += 1;
    }
}
