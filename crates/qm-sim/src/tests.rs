//! Unit tests for qm-sim.

use std::sync::{Arc, Mutex};

use qm_core::{LinkId, Tick, VehicleId};
use qm_engine::{FixedRouteDriver, MobileVehicle, VehicleDescriptor};
use qm_events::{Event, EventHandler, EventKind, EventsManager};
use qm_network::{LinkSpec, NetworkBuilder};

use crate::{NoopObserver, SimConfig, SimObserver, SimulationBuilder};

const L0: LinkId = LinkId(0);
const L1: LinkId = LinkId(1);

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Two 1 km / 10 m/s links in a row.
fn corridor() -> qm_network::Network {
    let mut b = NetworkBuilder::new();
    let n0 = b.add_node();
    let n1 = b.add_node();
    let n2 = b.add_node();
    b.add_link(LinkSpec::new(n0, n1, 1_000.0, 10.0, 3_600.0, 1.0));
    b.add_link(LinkSpec::new(n1, n2, 1_000.0, 10.0, 3_600.0, 1.0));
    b.build().unwrap()
}

fn routed(id: u64, route: Vec<LinkId>) -> MobileVehicle {
    MobileVehicle::new(
        VehicleDescriptor::new(VehicleId(id)),
        Box::new(FixedRouteDriver::new(route)),
    )
}

#[derive(Clone, Default)]
struct SharedLog(Arc<Mutex<Vec<Event>>>);

impl SharedLog {
    fn snapshot(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }

    /// enter→leave spans per (vehicle, link).
    fn link_travel_time(&self, vehicle: VehicleId, link: LinkId) -> Option<u64> {
        let log = self.0.lock().unwrap();
        let enter = log.iter().find(|e| {
            matches!(e.kind, EventKind::LinkEnter { link: l, vehicle: v }
                if l == link && v == vehicle)
        })?;
        let leave = log.iter().find(|e| {
            matches!(e.kind, EventKind::LinkLeave { link: l, vehicle: v }
                if l == link && v == vehicle)
        })?;
        Some(leave.time - enter.time)
    }
}

impl EventHandler for SharedLog {
    fn handle_event(&mut self, event: &Event) {
        self.0.lock().unwrap().push(*event);
    }
}

// ── DepartureQueue ────────────────────────────────────────────────────────────

#[cfg(test)]
mod departure_queue {
    use super::*;
    use crate::DepartureQueue;

    #[test]
    fn drain_only_due_tick() {
        let mut q = DepartureQueue::new();
        q.push(Tick(5), routed(1, vec![]), L0);
        q.push(Tick(5), routed(2, vec![]), L0);
        q.push(Tick(9), routed(3, vec![]), L1);
        assert_eq!(q.len(), 3);
        assert_eq!(q.next_tick(), Some(Tick(5)));

        assert!(q.drain_tick(Tick(4)).is_none());
        let due = q.drain_tick(Tick(5)).unwrap();
        assert_eq!(due.len(), 2);
        assert_eq!(due[0].vehicle.id(), VehicleId(1), "insertion order kept");
        assert_eq!(q.len(), 1);
        assert_eq!(q.next_tick(), Some(Tick(9)));
    }

    #[test]
    fn empty_queue() {
        let mut q = DepartureQueue::new();
        assert!(q.is_empty());
        assert_eq!(q.next_tick(), None);
        assert!(q.drain_tick(Tick(0)).is_none());
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use super::*;

    #[test]
    fn rejects_non_positive_tick_duration() {
        let config = SimConfig { tick_duration_secs: 0.0, ..SimConfig::default() };
        assert!(SimulationBuilder::new(config, corridor()).build().is_err());
    }

    #[test]
    fn rejects_non_positive_carryover() {
        let config = SimConfig {
            max_flow_carryover_pcu: Some(0.0),
            ..SimConfig::default()
        };
        assert!(SimulationBuilder::new(config, corridor()).build().is_err());
    }

    #[test]
    fn schedule_departure_validates_link() {
        let mut sim = SimulationBuilder::new(SimConfig::default(), corridor())
            .build()
            .unwrap();
        assert!(sim.schedule_departure(Tick(0), routed(1, vec![]), L0).is_ok());
        assert!(sim.schedule_departure(Tick(0), routed(2, vec![]), LinkId(9)).is_err());
    }
}

// ── End-to-end runs ───────────────────────────────────────────────────────────

#[cfg(test)]
mod run {
    use super::*;

    #[test]
    fn free_flow_travel_times_through_corridor() {
        let shared = SharedLog::default();
        let mut events = EventsManager::new();
        events.add_handler(Box::new(shared.clone()));

        let mut sim = SimulationBuilder::new(SimConfig::default(), corridor())
            .events(events)
            .build()
            .unwrap();
        sim.schedule_departure(Tick(0), routed(1, vec![L1]), L0).unwrap();
        sim.schedule_departure(Tick(5), routed(2, vec![L1]), L0).unwrap();
        sim.run(&mut NoopObserver);

        assert_eq!(sim.exited_count(), 2);
        assert_eq!(sim.vehicles_on_network(), 0);

        // 1 km at 10 m/s: 100 s per link, for both vehicles.
        for v in [VehicleId(1), VehicleId(2)] {
            assert_eq!(shared.link_travel_time(v, L0), Some(100));
            assert_eq!(shared.link_travel_time(v, L1), Some(100));
        }

        // The stream starts with the departure boundary, not the link enter.
        let log = shared.snapshot();
        assert!(matches!(log[0].kind, EventKind::Departure { link: L0, vehicle: VehicleId(1) }));
        assert_eq!(log[0].time, Tick(0));
    }

    #[test]
    fn run_stops_when_drained() {
        let mut sim = SimulationBuilder::new(SimConfig::default(), corridor())
            .build()
            .unwrap();
        sim.schedule_departure(Tick(0), routed(1, vec![L1]), L0).unwrap();
        sim.run(&mut NoopObserver);

        // Departure at 0, 100 s per link: exit at t=200, loop breaks at 201 —
        // long before the configured end of day.
        assert_eq!(sim.clock.current_tick, Tick(201));
        assert!(sim.clock.current_tick < sim.config.end_tick);
    }

    #[test]
    fn observer_hooks_fire() {
        #[derive(Default)]
        struct Counting {
            starts: usize,
            ends: usize,
            arrivals: Vec<(VehicleId, Tick)>,
            sim_end: Option<Tick>,
        }
        impl SimObserver for Counting {
            fn on_tick_start(&mut self, _tick: Tick) {
                self.starts += 1;
            }
            fn on_arrival(&mut self, arrival: qm_engine::ExitedVehicle) {
                self.arrivals.push((arrival.vehicle.id(), arrival.time));
            }
            fn on_tick_end(&mut self, _tick: Tick, _on_network: usize) {
                self.ends += 1;
            }
            fn on_sim_end(&mut self, final_tick: Tick) {
                self.sim_end = Some(final_tick);
            }
        }

        let mut sim = SimulationBuilder::new(SimConfig::default(), corridor())
            .build()
            .unwrap();
        sim.schedule_departure(Tick(0), routed(1, vec![L1]), L0).unwrap();

        let mut obs = Counting::default();
        sim.run(&mut obs);

        assert_eq!(obs.starts, obs.ends);
        assert_eq!(obs.starts, 201, "ticks 0..=200 processed");
        assert_eq!(obs.arrivals, vec![(VehicleId(1), Tick(200))]);
        assert_eq!(obs.sim_end, Some(Tick(201)));
    }

    #[test]
    fn conservation_over_staggered_departures() {
        #[derive(Default)]
        struct Arrivals(usize);
        impl SimObserver for Arrivals {
            fn on_arrival(&mut self, _arrival: qm_engine::ExitedVehicle) {
                self.0 += 1;
            }
        }

        let mut sim = SimulationBuilder::new(SimConfig::default(), corridor())
            .build()
            .unwrap();
        let n = 12u64;
        for i in 0..n {
            // Alternate between through trips and single-link trips.
            let route = if i % 2 == 0 { vec![L1] } else { vec![] };
            sim.schedule_departure(Tick(i * 3), routed(i, route), L0).unwrap();
        }

        let mut obs = Arrivals::default();
        sim.run(&mut obs);
        assert_eq!(obs.0, n as usize);
        assert_eq!(sim.exited_count(), n as usize);
        assert_eq!(sim.vehicles_on_network(), 0);
        sim.graph.check_consistency();
    }

    #[test]
    fn end_tick_caps_the_run() {
        let config = SimConfig { end_tick: Tick(50), ..SimConfig::default() };
        let mut sim = SimulationBuilder::new(config, corridor()).build().unwrap();
        sim.schedule_departure(Tick(0), routed(1, vec![L1]), L0).unwrap();
        sim.run(&mut NoopObserver);

        assert_eq!(sim.clock.current_tick, Tick(50));
        // Still mid-trip: the vehicle remains owned by the network.
        assert_eq!(sim.vehicles_on_network(), 1);
        assert_eq!(sim.exited_count(), 0);
    }
}
