//! corridor — smallest end-to-end example for the queuemob traffic engine.
//!
//! Two waves of vehicles (cars and slower, wider trucks) drive a four-link
//! arterial with a short bottleneck segment in the middle.  The run writes
//! the full event stream to `output/corridor/events.csv` and prints a
//! per-vehicle travel-time table; the bottleneck's spillback is visible as
//! the gap between free-flow and actual times.

use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use qm_core::{LinkId, Tick, VehicleId};
use qm_engine::{ExitedVehicle, FixedRouteDriver, MobileVehicle, VehicleDescriptor};
use qm_events::{CsvEventWriter, EventsManager};
use qm_network::{LinkSpec, Network, NetworkBuilder};
use qm_sim::{SimConfig, SimObserver, SimulationBuilder};

// ── Constants ─────────────────────────────────────────────────────────────────

const CAR_COUNT: u64 = 16;
const TRUCK_COUNT: u64 = 3;
const SEED: u64 = 42;
const DEPARTURE_SPACING_SECS: u64 = 4;
const TRUCK_PCU: f64 = 2.5;
const TRUCK_MAX_SPEED_MS: f64 = 12.0;

// ── Network ───────────────────────────────────────────────────────────────────

/// Four-link arterial: fast approach, feeder, short bottleneck, fast exit.
///
/// Returns `(network, [l0, l1, l2, l3])`.
fn build_network() -> (Network, [LinkId; 4]) {
    let mut b = NetworkBuilder::new();
    let nodes: Vec<_> = (0..5).map(|_| b.add_node()).collect();

    // 1 km dual-lane approach, 20 m/s.
    let l0 = b.add_link(LinkSpec::new(nodes[0], nodes[1], 1_000.0, 20.0, 3_600.0, 2.0));
    // 500 m feeder, 10 m/s.
    let l1 = b.add_link(LinkSpec::new(nodes[1], nodes[2], 500.0, 10.0, 3_600.0, 1.0));
    // 75 m bottleneck: 10 pcu of storage, 900 veh/h.
    let l2 = b.add_link(LinkSpec::new(nodes[2], nodes[3], 75.0, 5.0, 900.0, 1.0));
    // 1 km exit, 20 m/s.
    let l3 = b.add_link(LinkSpec::new(nodes[3], nodes[4], 1_000.0, 20.0, 3_600.0, 1.0));

    (b.build().expect("static fixture is valid"), [l0, l1, l2, l3])
}

// ── Arrival bookkeeping ───────────────────────────────────────────────────────

#[derive(Default)]
struct ArrivalLog {
    arrivals: Vec<(VehicleId, Tick)>,
}

impl SimObserver for ArrivalLog {
    fn on_arrival(&mut self, arrival: ExitedVehicle) {
        self.arrivals.push((arrival.vehicle.id(), arrival.time));
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();

    println!("=== corridor — queuemob traffic engine ===");
    println!(
        "Vehicles: {} cars + {} trucks  |  Seed: {SEED}",
        CAR_COUNT, TRUCK_COUNT
    );
    println!();

    // 1. Build the network.
    let (network, [l0, l1, l2, l3]) = build_network();
    println!("Network: {} nodes, {} links", network.node_count(), network.link_count());

    // 2. Event sinks: everything streams to CSV.
    std::fs::create_dir_all("output/corridor")?;
    let csv = CsvEventWriter::new(Path::new("output/corridor"))?;
    let mut events = EventsManager::new();
    events.add_handler(Box::new(csv));

    // 3. Assemble the simulation.
    let config = SimConfig { seed: SEED, ..SimConfig::default() };
    let mut sim = SimulationBuilder::new(config, network).events(events).build()?;

    // 4. Schedule departures: cars first, trucks woven in behind them.
    let route = vec![l1, l2, l3];
    let mut departed_at: HashMap<VehicleId, Tick> = HashMap::new();
    for i in 0..CAR_COUNT {
        let id = VehicleId(i);
        let tick = Tick(i * DEPARTURE_SPACING_SECS);
        let car = MobileVehicle::new(
            VehicleDescriptor::new(id),
            Box::new(FixedRouteDriver::new(route.clone())),
        );
        sim.schedule_departure(tick, car, l0)?;
        departed_at.insert(id, tick);
    }
    for i in 0..TRUCK_COUNT {
        let id = VehicleId(1_000 + i);
        let tick = Tick((CAR_COUNT / 2 + i * 2) * DEPARTURE_SPACING_SECS);
        let truck = MobileVehicle::new(
            VehicleDescriptor::new(id)
                .size_pcu(TRUCK_PCU)
                .max_speed_ms(TRUCK_MAX_SPEED_MS),
            Box::new(FixedRouteDriver::new(route.clone())),
        );
        sim.schedule_departure(tick, truck, l0)?;
        departed_at.insert(id, tick);
    }
    println!("Scheduled {} departures", departed_at.len());
    println!();

    // 5. Run to completion.
    let t0 = Instant::now();
    let mut log = ArrivalLog::default();
    sim.run(&mut log);
    let elapsed = t0.elapsed();

    println!(
        "Simulation complete in {:.3} ms (simulated {}s)",
        elapsed.as_secs_f64() * 1e3,
        sim.clock.current_tick.0
    );
    println!("Events written to output/corridor/events.csv");
    println!();

    // 6. Travel-time table.  Free flow: 50 + 50 + 15 + 50 = 165 s for cars.
    println!("{:<12} {:<10} {:<10} {:<10}", "Vehicle", "Depart", "Arrive", "Duration");
    println!("{}", "-".repeat(44));
    for (id, arrive) in &log.arrivals {
        let depart = departed_at[id];
        println!(
            "{:<12} {:<10} {:<10} {:<10}",
            id.0,
            depart.0,
            arrive.0,
            *arrive - depart
        );
    }
    println!();
    println!(
        "All {} vehicles arrived; {} left on the network",
        log.arrivals.len(),
        sim.vehicles_on_network()
    );

    Ok(())
}
