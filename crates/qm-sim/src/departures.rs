//! `DepartureQueue` — sparse per-tick departure scheduling.
//!
//! Most ticks see no departures at all; iterating the whole population every
//! tick to ask "does anyone start now?" would cost O(N) regardless of
//! activity.  The queue inverts the problem: the population driver registers
//! each vehicle under its departure tick, and the simulation drains exactly
//! the vehicles due each tick — O(active) work.

use std::collections::BTreeMap;

use qm_core::{LinkId, Tick};
use qm_engine::MobileVehicle;

/// A vehicle waiting to start its leg on `link`.
#[derive(Debug)]
pub struct Departure {
    pub vehicle: MobileVehicle,
    pub link: LinkId,
}

/// Tick-ordered departure schedule.
#[derive(Default)]
pub struct DepartureQueue {
    inner: BTreeMap<Tick, Vec<Departure>>,
    /// Cached total entry count for O(1) `len()`.
    total: usize,
}

impl DepartureQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `vehicle` to depart on `link` at `tick`.
    ///
    /// Same-tick departures keep their insertion order.
    pub fn push(&mut self, tick: Tick, vehicle: MobileVehicle, link: LinkId) {
        self.inner.entry(tick).or_default().push(Departure { vehicle, link });
        self.total += 1;
    }

    /// Remove and return all departures scheduled for exactly `tick`.
    ///
    /// Returns `None` when nothing is due (the common case — avoids
    /// allocation).
    pub fn drain_tick(&mut self, tick: Tick) -> Option<Vec<Departure>> {
        let departures = self.inner.remove(&tick)?;
        self.total -= departures.len();
        Some(departures)
    }

    /// The earliest tick with at least one scheduled departure.
    pub fn next_tick(&self) -> Option<Tick> {
        self.inner.keys().next().copied()
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
