//! Top-level simulation configuration.

use qm_core::Tick;
use qm_engine::EngineConfig;

/// Configuration for one simulation run.
///
/// Typically constructed by the application and passed to
/// [`SimulationBuilder`](crate::SimulationBuilder).
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Simulated seconds per tick.  Default: 1.0.
    pub tick_duration_secs: f64,

    /// Exclusive upper bound on simulated ticks.  The run may end earlier
    /// when no departures remain and the network is empty.
    pub end_tick: Tick,

    /// Optional cap on per-link flow carry-over, in pcu.  `None` applies the
    /// engine default of `max(flow per tick, 1.0)`.
    pub max_flow_carryover_pcu: Option<f64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            tick_duration_secs: 1.0,
            // One simulated day at one-second ticks.
            end_tick: Tick(86_400),
            max_flow_carryover_pcu: None,
        }
    }
}

impl SimConfig {
    /// The engine-level slice of this configuration.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            seed: self.seed,
            tick_secs: self.tick_duration_secs,
            max_flow_carryover_pcu: self.max_flow_carryover_pcu,
        }
    }
}
