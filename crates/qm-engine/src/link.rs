//! The per-link state machine.
//!
//! # Ownership model
//!
//! A link owns every vehicle currently on it through a single slot map
//! (`FxHashMap<VehicleId, Slot>`); the travelling queue, the gate, and the
//! waiting list hold ids only.  Each slot carries one tagged
//! [`VehicleLocation`], kept in lockstep with whichever queue holds the id —
//! so "exactly one collection owns a vehicle" is a mechanical invariant
//! ([`check_consistency`](NetworkLink::check_consistency) verifies it), and
//! `get_vehicle` is a single hash lookup.
//!
//! # Storage accounting
//!
//! `occupied_pcu` sums the sizes of Travelling and InGate vehicles and is
//! updated at every owning transition.  Parked vehicles and vehicles waiting
//! to enter consume no storage.

use std::collections::VecDeque;

use qm_core::{LinkId, Tick, VehicleId};
use qm_events::{Event, EventKind, EventsManager};
use qm_network::LinkAttributes;
use rustc_hash::FxHashMap;

use crate::{CapacityGate, EngineConfig, EPSILON, MobileVehicle};

// ── Insertion modes ───────────────────────────────────────────────────────────

/// Where an externally inserted vehicle logically is on the link.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum InsertPosition {
    /// At the upstream end: the vehicle drives the link like a normal entry.
    AtOrigin,
    /// At the downstream end: the vehicle skips physical travel and becomes
    /// gate-eligible on the next tick.  Used for zero-length connectors and
    /// agents inserted mid-link.
    AtDestination,
}

/// How urgently an externally inserted vehicle needs to occupy the link.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum InsertPriority {
    /// Straight to the parked set, outside all capacity accounting.
    Parking,
    /// Onto the link as soon as storage allows.
    AsSoonAsSpace,
}

// ── Location tag ──────────────────────────────────────────────────────────────

/// Which collection currently owns a vehicle on this link.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum VehicleLocation {
    /// In the parked set; no dynamic capacity consumed.
    Parked,
    /// In the waiting list, to be admitted when storage frees up.
    WaitingToEnter { priority: InsertPriority, position: InsertPosition },
    /// In the travelling queue until `exit_time`.
    Travelling { exit_time: Tick },
    /// In the capacity gate, awaiting node transfer.
    InGate,
}

struct Slot {
    vehicle: MobileVehicle,
    location: VehicleLocation,
}

#[derive(Copy, Clone, Debug)]
struct TravellingEntry {
    vehicle: VehicleId,
    exit_time: Tick,
}

// ── NetworkLink ───────────────────────────────────────────────────────────────

/// Runtime state of one directed link.
pub struct NetworkLink {
    id: LinkId,
    attrs: LinkAttributes,
    tick_secs: f64,
    gate: CapacityGate,
    slots: FxHashMap<VehicleId, Slot>,
    /// Ordered by `exit_time`, ties by insertion order.  Head leaves first.
    travelling: VecDeque<TravellingEntry>,
    /// FIFO of vehicles waiting for storage, ids only.
    waiting: VecDeque<VehicleId>,
    /// Σ size of Travelling ∪ InGate vehicles, in pcu.
    occupied_pcu: f64,
}

impl NetworkLink {
    pub fn new(id: LinkId, attrs: LinkAttributes, config: &EngineConfig) -> Self {
        let flow_per_tick = attrs.flow_pcu_per_sec * config.tick_secs;
        let carryover = config
            .max_flow_carryover_pcu
            .unwrap_or_else(|| flow_per_tick.max(1.0));
        Self {
            id,
            attrs,
            tick_secs: config.tick_secs,
            gate: CapacityGate::new(flow_per_tick, carryover),
            slots: FxHashMap::default(),
            travelling: VecDeque::new(),
            waiting: VecDeque::new(),
            occupied_pcu: 0.0,
        }
    }

    #[inline]
    pub fn id(&self) -> LinkId {
        self.id
    }

    /// Reset per-run state (the gate's flow accumulator).
    pub fn init(&mut self) {
        self.gate.init();
    }

    pub fn attributes(&self) -> &LinkAttributes {
        &self.attrs
    }

    pub fn storage_pcu(&self) -> f64 {
        self.attrs.storage_pcu
    }

    pub fn occupied_pcu(&self) -> f64 {
        self.occupied_pcu
    }

    /// `true` while the link can take another vehicle onto its travelling
    /// queue.  Boolean, not size-aware: the last admitted vehicle may
    /// overfill — matching the physical queue, where a car committed to a
    /// link does not shrink to fit.
    #[inline]
    pub fn has_space(&self) -> bool {
        self.attrs.storage_pcu - self.occupied_pcu > EPSILON
    }

    /// Ticks a vehicle needs to traverse the link at its effective speed,
    /// rounded up to the next tick boundary.
    fn travel_ticks(&self, vehicle: &MobileVehicle) -> u64 {
        let speed = vehicle.effective_speed_ms(self.attrs.freespeed_ms);
        (self.attrs.length_m / speed / self.tick_secs).ceil() as u64
    }

    // ── Entry points ──────────────────────────────────────────────────────

    /// A vehicle arrives from the upstream node.
    ///
    /// The caller must have checked [`has_space`](Self::has_space); the
    /// debug assert documents that contract.
    pub fn add_from_intersection(
        &mut self,
        vehicle: MobileVehicle,
        now: Tick,
        events: &mut EventsManager,
    ) {
        debug_assert!(self.has_space(), "caller must check has_space first");
        events.process(Event {
            time: now,
            kind: EventKind::LinkEnter { link: self.id, vehicle: vehicle.id() },
        });
        let exit_time = now + self.travel_ticks(&vehicle);
        self.enter_travelling_silent(vehicle, exit_time);
    }

    /// A vehicle begins its leg on this link (activity end, not an upstream
    /// arrival).  Guaranteed at least one full tick of residency before gate
    /// eligibility, so even a zero-length link costs one discrete step.
    ///
    /// If the link is currently full the vehicle joins the waiting list and
    /// is admitted when storage frees up.
    pub fn add_departing_vehicle(
        &mut self,
        vehicle: MobileVehicle,
        now: Tick,
        events: &mut EventsManager,
    ) {
        events.process(Event {
            time: now,
            kind: EventKind::LinkEnter { link: self.id, vehicle: vehicle.id() },
        });
        if self.has_space() {
            let exit_time = now + self.travel_ticks(&vehicle).max(1);
            self.enter_travelling_silent(vehicle, exit_time);
        } else {
            self.enqueue_waiting(vehicle, InsertPriority::AsSoonAsSpace, InsertPosition::AtOrigin);
        }
    }

    /// Generalized external insertion, bypassing the physical-travel
    /// computation where requested.  No event is emitted — teleport-style
    /// collaborators own their own notifications.
    pub fn insert_vehicle(
        &mut self,
        vehicle: MobileVehicle,
        position: InsertPosition,
        priority: InsertPriority,
        now: Tick,
    ) {
        match priority {
            InsertPriority::Parking => {
                self.slots.insert(
                    vehicle.id(),
                    Slot { vehicle, location: VehicleLocation::Parked },
                );
            }
            InsertPriority::AsSoonAsSpace => {
                if self.has_space() {
                    let exit_time = self.insert_exit_time(&vehicle, position, now);
                    self.enter_travelling_silent(vehicle, exit_time);
                } else {
                    self.enqueue_waiting(vehicle, priority, position);
                }
            }
        }
    }

    fn insert_exit_time(
        &self,
        vehicle: &MobileVehicle,
        position: InsertPosition,
        now: Tick,
    ) -> Tick {
        match position {
            // Gate-eligible on the very next tick.
            InsertPosition::AtDestination => now + 1,
            InsertPosition::AtOrigin => now + self.travel_ticks(vehicle).max(1),
        }
    }

    fn enter_travelling_silent(&mut self, vehicle: MobileVehicle, exit_time: Tick) {
        let id = vehicle.id();
        self.occupied_pcu += vehicle.size_pcu();
        self.slots.insert(
            id,
            Slot { vehicle, location: VehicleLocation::Travelling { exit_time } },
        );
        self.enqueue_travelling(id, exit_time);
    }

    fn enqueue_waiting(
        &mut self,
        vehicle: MobileVehicle,
        priority: InsertPriority,
        position: InsertPosition,
    ) {
        let id = vehicle.id();
        self.slots.insert(
            id,
            Slot {
                vehicle,
                location: VehicleLocation::WaitingToEnter { priority, position },
            },
        );
        self.waiting.push_back(id);
    }

    /// Ordered insert by exit time, stable for ties: a vehicle never passes
    /// another with an equal or earlier exit.
    fn enqueue_travelling(&mut self, vehicle: VehicleId, exit_time: Tick) {
        let mut idx = self.travelling.len();
        while idx > 0 && self.travelling[idx - 1].exit_time > exit_time {
            idx -= 1;
        }
        self.travelling.insert(idx, TravellingEntry { vehicle, exit_time });
    }

    // ── Per-tick work ─────────────────────────────────────────────────────

    /// One tick of link-local work (phase A):
    ///
    /// 1. accrue flow capacity;
    /// 2. promote travelling vehicles whose exit time has come into the
    ///    gate, stopping at the first that the gate cannot yet admit —
    ///    vehicles behind it stay blocked even if they would individually
    ///    fit (physical queueing, no overtaking);
    /// 3. admit waiting vehicles onto the link while storage allows,
    ///    preserving the waiting list's FIFO order.
    pub fn move_link(&mut self, now: Tick) {
        self.gate.tick();

        while let Some(&head) = self.travelling.front() {
            if head.exit_time > now {
                break;
            }
            let size = match self.slots.get(&head.vehicle) {
                Some(slot) => slot.vehicle.size_pcu(),
                None => {
                    // Stale entry left by an external removal; drop it.
                    self.travelling.pop_front();
                    continue;
                }
            };
            if !self.gate.admit(head.vehicle, size) {
                break;
            }
            self.travelling.pop_front();
            if let Some(slot) = self.slots.get_mut(&head.vehicle) {
                slot.location = VehicleLocation::InGate;
            }
        }

        while self.has_space() {
            let Some(&id) = self.waiting.front() else { break };
            self.waiting.pop_front();
            let Some(slot) = self.slots.get(&id) else { continue };
            let VehicleLocation::WaitingToEnter { position, .. } = slot.location else {
                continue;
            };
            let exit_time = self.insert_exit_time(&slot.vehicle, position, now);
            let size = slot.vehicle.size_pcu();
            if let Some(slot) = self.slots.get_mut(&id) {
                slot.location = VehicleLocation::Travelling { exit_time };
            }
            self.occupied_pcu += size;
            self.enqueue_travelling(id, exit_time);
        }
    }

    // ── Gate access ───────────────────────────────────────────────────────

    #[inline]
    pub fn is_gate_empty(&self) -> bool {
        self.gate.is_empty()
    }

    /// Head of the gate without removing it.
    #[inline]
    pub fn peek_gate(&self) -> Option<VehicleId> {
        self.gate.peek()
    }

    /// Gate contents in release order, as vehicle references.
    pub fn gate_vehicles(&self) -> impl Iterator<Item = &MobileVehicle> + '_ {
        self.gate.iter().filter_map(|id| self.slots.get(&id).map(|s| &s.vehicle))
    }

    /// Remove and return the gate head, releasing its storage.
    pub fn pop_first_from_gate(&mut self) -> Option<MobileVehicle> {
        let id = self.gate.pop_first()?;
        let slot = self.slots.remove(&id)?;
        self.release_storage(slot.vehicle.size_pcu());
        Some(slot.vehicle)
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    /// O(1) lookup through the slot map.
    #[inline]
    pub fn get_vehicle(&self, id: VehicleId) -> Option<&MobileVehicle> {
        self.slots.get(&id).map(|s| &s.vehicle)
    }

    /// Where `id` currently is on this link, if present.
    pub fn location(&self, id: VehicleId) -> Option<VehicleLocation> {
        self.slots.get(&id).map(|s| s.location)
    }

    /// Every vehicle on the link, in no particular order.
    pub fn all_vehicles(&self) -> impl Iterator<Item = &MobileVehicle> + '_ {
        self.slots.values().map(|s| &s.vehicle)
    }

    pub fn vehicle_count(&self) -> usize {
        self.slots.len()
    }

    /// Vehicles currently in the travelling queue.
    pub fn travelling_count(&self) -> usize {
        self.travelling.len()
    }

    pub fn waiting_count(&self) -> usize {
        self.waiting.len()
    }

    // ── External transitions ──────────────────────────────────────────────

    /// Remove `id` from whichever collection holds it.  Idempotent: removing
    /// an absent vehicle is a no-op returning `None` — termination, teleport
    /// and forced removal may race to clean up the same vehicle.
    pub fn remove_vehicle(&mut self, id: VehicleId) -> Option<MobileVehicle> {
        let slot = self.slots.remove(&id)?;
        match slot.location {
            VehicleLocation::Travelling { .. } => {
                self.travelling.retain(|e| e.vehicle != id);
                self.release_storage(slot.vehicle.size_pcu());
            }
            VehicleLocation::InGate => {
                self.gate.remove(id);
                self.release_storage(slot.vehicle.size_pcu());
            }
            VehicleLocation::WaitingToEnter { .. } => {
                self.waiting.retain(|&v| v != id);
            }
            VehicleLocation::Parked => {}
        }
        Some(slot.vehicle)
    }

    /// Move a travelling or in-gate vehicle to the parked set (activity
    /// performed mid-link).  Silent no-op if the vehicle is not in either
    /// state on this link.  Returns whether anything changed.
    pub fn park_vehicle(&mut self, id: VehicleId) -> bool {
        let Some(slot) = self.slots.get_mut(&id) else { return false };
        match slot.location {
            VehicleLocation::Travelling { .. } => {
                self.travelling.retain(|e| e.vehicle != id);
            }
            VehicleLocation::InGate => {
                self.gate.remove(id);
            }
            VehicleLocation::Parked | VehicleLocation::WaitingToEnter { .. } => {
                return false;
            }
        }
        let size = slot.vehicle.size_pcu();
        slot.location = VehicleLocation::Parked;
        self.release_storage(size);
        true
    }

    /// Resume a parked vehicle: it joins the waiting list and re-enters at
    /// the downstream end once storage allows, gate-eligible the next tick.
    /// Silent no-op if the vehicle is not parked here.
    pub fn continue_vehicle(&mut self, id: VehicleId) -> bool {
        let Some(slot) = self.slots.get_mut(&id) else { return false };
        if slot.location != VehicleLocation::Parked {
            return false;
        }
        slot.location = VehicleLocation::WaitingToEnter {
            priority: InsertPriority::AsSoonAsSpace,
            position: InsertPosition::AtDestination,
        };
        self.waiting.push_back(id);
        true
    }

    #[inline]
    fn release_storage(&mut self, size_pcu: f64) {
        self.occupied_pcu = (self.occupied_pcu - size_pcu).max(0.0);
    }

    // ── Diagnostics ───────────────────────────────────────────────────────

    /// Recompute occupancy and cross-check every queue against the slot map.
    ///
    /// Panics on divergence.  O(n); intended for tests and debug builds.
    pub fn check_consistency(&self) {
        let mut recomputed = 0.0;
        let mut travelling = 0usize;
        let mut in_gate = 0usize;
        let mut waiting = 0usize;
        for (id, slot) in &self.slots {
            assert_eq!(*id, slot.vehicle.id(), "slot key does not match vehicle id");
            match slot.location {
                VehicleLocation::Travelling { .. } => {
                    recomputed += slot.vehicle.size_pcu();
                    travelling += 1;
                    assert!(
                        self.travelling.iter().any(|e| e.vehicle == *id),
                        "{id} tagged Travelling but missing from queue"
                    );
                }
                VehicleLocation::InGate => {
                    recomputed += slot.vehicle.size_pcu();
                    in_gate += 1;
                    assert!(
                        self.gate.iter().any(|v| v == *id),
                        "{id} tagged InGate but missing from gate"
                    );
                }
                VehicleLocation::WaitingToEnter { .. } => {
                    waiting += 1;
                    assert!(
                        self.waiting.contains(id),
                        "{id} tagged WaitingToEnter but missing from waiting list"
                    );
                }
                VehicleLocation::Parked => {}
            }
        }
        assert_eq!(travelling, self.travelling.len(), "travelling queue out of sync");
        assert_eq!(in_gate, self.gate.len(), "gate out of sync");
        assert_eq!(waiting, self.waiting.len(), "waiting list out of sync");
        assert!(
            (recomputed - self.occupied_pcu).abs() < 1e-6,
            "occupancy drift: recomputed {recomputed}, tracked {}",
            self.occupied_pcu
        );
    }
}
