//! Simulation observer trait for progress reporting and arrival handling.

use qm_core::Tick;
use qm_engine::ExitedVehicle;

/// Callbacks invoked by [`Simulation::run`][crate::Simulation::run] at key
/// points in the tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Fine-grained movement data flows
/// through the event stream instead ([`qm_events::EventsManager`]); the
/// observer is for driver-level hooks, most importantly taking back the
/// vehicles of completed trips.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, tick: Tick, on_network: usize) {
///         if tick.0 % self.interval == 0 {
///             println!("{tick}: {on_network} vehicles on the network");
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before departures.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once for every vehicle that completed its trip this tick.
    ///
    /// The vehicle is handed over by value — the driver side owns it again
    /// and may re-schedule it for a later leg.
    fn on_arrival(&mut self, _arrival: ExitedVehicle) {}

    /// Called at the end of each tick with the number of vehicles still on
    /// the network.
    fn on_tick_end(&mut self, _tick: Tick, _on_network: usize) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.  Arrived vehicles are dropped.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
