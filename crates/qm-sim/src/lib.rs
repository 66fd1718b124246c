//! `qm-sim` — the tick-loop driver around the queuemob engine.
//!
//! # Per-tick sequence
//!
//! ```text
//! for each tick t until end_tick (or until all work is drained):
//!   ① Departures — drain vehicles scheduled for t; emit Departure events
//!                  and hand them to their start links.
//!   ② Advance    — StepExecutor::advance(t): phase A over links, barrier,
//!                  phase B over nodes.
//!   ③ Arrivals   — vehicles that completed their trips go to the observer.
//! ```
//!
//! A tick always runs to completion once started; there is no mid-tick
//! cancellation.  The run ends at `end_tick` or as soon as both the
//! departure queue and the network are empty.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use qm_engine::SequentialExecutor;
//! use qm_sim::{NoopObserver, SimConfig, SimulationBuilder};
//!
//! let mut sim = SimulationBuilder::new(SimConfig::default(), network).build()?;
//! sim.schedule_departure(Tick(0), vehicle, start_link)?;
//! sim.run(&mut NoopObserver);
//! ```

pub mod builder;
pub mod config;
pub mod departures;
pub mod error;
pub mod observer;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimulationBuilder;
pub use config::SimConfig;
pub use departures::{Departure, DepartureQueue};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::Simulation;
