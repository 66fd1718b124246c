//! Fluent builder for constructing a [`Simulation`].

use qm_engine::{NetworkGraph, SequentialExecutor, StepExecutor};
use qm_events::EventsManager;
use qm_network::Network;

use crate::{SimConfig, SimError, SimResult, Simulation};

/// Fluent builder for [`Simulation<X>`].
///
/// # Required inputs
///
/// - [`SimConfig`] — seed, tick duration, end tick
/// - [`Network`] — the validated static topology
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                              |
/// |-----------------|--------------------------------------|
/// | `.executor(x)`  | [`SequentialExecutor`]               |
/// | `.events(m)`    | an empty [`EventsManager`]           |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimulationBuilder::new(config, network)
///     .events(events_with_csv_sink)
///     .build()?;
/// sim.run(&mut NoopObserver);
/// ```
pub struct SimulationBuilder<X: StepExecutor> {
    config: SimConfig,
    network: Network,
    executor: X,
    events: Option<EventsManager>,
}

impl SimulationBuilder<SequentialExecutor> {
    /// Create a builder with the sequential executor.
    pub fn new(config: SimConfig, network: Network) -> Self {
        Self {
            config,
            network,
            executor: SequentialExecutor::new(),
            events: None,
        }
    }
}

impl<X: StepExecutor> SimulationBuilder<X> {
    /// Swap the step-scheduling strategy (e.g. the Rayon-partitioned
    /// executor from `qm-engine` with the `parallel` feature).
    pub fn executor<Y: StepExecutor>(self, executor: Y) -> SimulationBuilder<Y> {
        SimulationBuilder {
            config: self.config,
            network: self.network,
            executor,
            events: self.events,
        }
    }

    /// Supply a pre-populated event fan-out (handlers already registered).
    pub fn events(mut self, events: EventsManager) -> Self {
        self.events = Some(events);
        self
    }

    /// Validate the configuration and assemble the simulation.
    pub fn build(self) -> SimResult<Simulation<X>> {
        if self.config.tick_duration_secs <= 0.0 {
            return Err(SimError::Config(format!(
                "non-positive tick duration {}",
                self.config.tick_duration_secs
            )));
        }
        if let Some(cap) = self.config.max_flow_carryover_pcu {
            if cap <= 0.0 {
                return Err(SimError::Config(format!(
                    "non-positive flow carry-over cap {cap}"
                )));
            }
        }

        let graph = NetworkGraph::new(&self.network, &self.config.engine_config());
        let events = self.events.unwrap_or_default();
        Ok(Simulation::from_parts(self.config, graph, self.executor, events))
    }
}
