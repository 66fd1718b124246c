//! Engine configuration.

/// Knobs the engine needs before graph construction.
///
/// Cheap to copy; typically embedded in the driver's own config struct.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Master RNG seed.  The same seed always produces the same event
    /// stream, for either executor and any thread count.
    pub seed: u64,

    /// Simulated seconds per tick.  Default: 1.0 — the engine is a
    /// per-second model; coarser ticks scale the per-tick flow quantum.
    pub tick_secs: f64,

    /// Upper bound on the flow accumulator of every capacity gate, in pcu.
    ///
    /// Bounds how much unused flow capacity a link can bank during idle
    /// periods.  `None` applies the default rule
    /// `max(flow per tick, 1.0)` per link.
    pub max_flow_carryover_pcu: Option<f64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            tick_secs: 1.0,
            max_flow_carryover_pcu: None,
        }
    }
}

impl EngineConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self { seed, ..Self::default() }
    }
}
