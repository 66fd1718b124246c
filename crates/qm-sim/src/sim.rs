//! The `Simulation` struct and its tick loop.

use qm_core::{LinkId, SimClock, Tick};
use qm_engine::{MobileVehicle, NetworkGraph, StepExecutor};
use qm_events::{Event, EventKind, EventsManager};

use crate::{DepartureQueue, SimConfig, SimError, SimObserver, SimResult};

/// The simulation driver: owns the runtime graph, the executor strategy, the
/// event bus, and the departure schedule.
///
/// Create via [`SimulationBuilder`][crate::SimulationBuilder].
pub struct Simulation<X: StepExecutor> {
    /// Run configuration.
    pub config: SimConfig,

    /// Simulation clock — tracks the current tick.
    pub clock: SimClock,

    /// The runtime network.
    pub graph: NetworkGraph,

    /// Phase scheduling strategy.
    pub executor: X,

    /// Event fan-out; all engine notifications pass through here.
    pub events: EventsManager,

    /// Scheduled future departures.
    pub departures: DepartureQueue,

    exited_count: usize,
}

impl<X: StepExecutor> Simulation<X> {
    pub(crate) fn from_parts(
        config: SimConfig,
        graph: NetworkGraph,
        executor: X,
        events: EventsManager,
    ) -> Self {
        let clock = SimClock::new(config.tick_duration_secs);
        Self {
            config,
            clock,
            graph,
            executor,
            events,
            departures: DepartureQueue::new(),
            exited_count: 0,
        }
    }

    // ── Scheduling ────────────────────────────────────────────────────────

    /// Schedule `vehicle` to begin a leg on `link` at `tick`.
    ///
    /// # Errors
    ///
    /// [`SimError::UnknownLink`] if `link` is not in the network.
    pub fn schedule_departure(
        &mut self,
        tick: Tick,
        vehicle: MobileVehicle,
        link: LinkId,
    ) -> SimResult<()> {
        if link.index() >= self.graph.link_count() {
            return Err(SimError::UnknownLink(link));
        }
        self.departures.push(tick, vehicle, link);
        Ok(())
    }

    // ── Run loop ──────────────────────────────────────────────────────────

    /// Run until `config.end_tick`, or until both the departure queue and
    /// the network are drained.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) {
        log::debug!(
            "run start: {} links, {} nodes, {} scheduled departures, seed {}",
            self.graph.link_count(),
            self.graph.node_count(),
            self.departures.len(),
            self.config.seed
        );
        self.graph.init();

        loop {
            let now = self.clock.current_tick;
            if now >= self.config.end_tick {
                break;
            }
            if self.departures.is_empty() && self.graph.vehicle_count() == 0 {
                break;
            }
            self.process_tick(now, observer);
            self.clock.advance();
        }
        log::debug!(
            "run end at {}: {} vehicles exited",
            self.clock.current_tick,
            self.exited_count
        );
        observer.on_sim_end(self.clock.current_tick);
    }

    /// Run exactly `n` ticks from the current position, ignoring `end_tick`
    /// and the drained condition.  Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            let now = self.clock.current_tick;
            self.process_tick(now, observer);
            self.clock.advance();
        }
    }

    fn process_tick<O: SimObserver>(&mut self, now: Tick, observer: &mut O) {
        observer.on_tick_start(now);

        // ── Phase 0: departures due this tick ─────────────────────────────
        if let Some(departures) = self.departures.drain_tick(now) {
            log::trace!("{now}: {} departures", departures.len());
            for dep in departures {
                self.events.process(Event {
                    time: now,
                    kind: EventKind::Departure {
                        link: dep.link,
                        vehicle: dep.vehicle.id(),
                    },
                });
                self.graph
                    .link_mut(dep.link)
                    .add_departing_vehicle(dep.vehicle, now, &mut self.events);
            }
        }

        // ── Phases A + B ──────────────────────────────────────────────────
        let arrived = self.executor.advance(&mut self.graph, now, &mut self.events);

        // ── Hand completed trips back to the driver side ──────────────────
        self.exited_count += arrived.len();
        for arrival in arrived {
            observer.on_arrival(arrival);
        }

        observer.on_tick_end(now, self.graph.vehicle_count());
    }

    // ── Introspection ─────────────────────────────────────────────────────

    /// Vehicles that have completed their trips so far.
    pub fn exited_count(&self) -> usize {
        self.exited_count
    }

    /// Vehicles currently owned by any link on the network.
    pub fn vehicles_on_network(&self) -> usize {
        self.graph.vehicle_count()
    }
}
