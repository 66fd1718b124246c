//! `qm-engine` — the queue-based traffic flow engine.
//!
//! A fixed-tick, deterministic mobility core: vehicles advance over a
//! directed network of links and nodes under flow-capacity and
//! storage-capacity constraints.  Each tick has two phases:
//!
//! 1. **Phase A — link advancement** ([`NetworkLink::move_link`]): every link
//!    refreshes its capacity gate, promotes travelling vehicles whose exit
//!    time has come into the gate, and admits waiting vehicles onto the link.
//! 2. **Phase B — node transfers** ([`NetworkNode`]): every node moves
//!    vehicles from its incoming links' gates onto their chosen downstream
//!    links, or out of the network at trip end.
//!
//! A [`StepExecutor`] schedules the two phases — sequentially or partitioned
//! across a Rayon pool (feature `parallel`) — with a full barrier between
//! them.  Both executors produce the same event stream for the same seed.
//!
//! # Crate layout
//!
//! | Module       | Contents                                               |
//! |--------------|--------------------------------------------------------|
//! | [`vehicle`]  | `MobileVehicle`, `DriverAgent`, `FixedRouteDriver`     |
//! | [`gate`]     | `CapacityGate` — rate-limited FIFO release buffer      |
//! | [`link`]     | `NetworkLink` — the per-link state machine             |
//! | [`node`]     | `NetworkNode` — per-tick transfer planning             |
//! | [`graph`]    | `NetworkGraph` — id-indexed registries + plan apply    |
//! | [`executor`] | `StepExecutor`, sequential and parallel strategies     |
//! | [`config`]   | `EngineConfig`                                         |

pub mod config;
pub mod executor;
pub mod gate;
pub mod graph;
pub mod link;
pub mod node;
pub mod vehicle;


/// Tolerance for storage and flow comparisons, in pcu.
///
/// Occupancy is maintained incrementally with f64 adds/subtracts; comparisons
/// against capacity must absorb the resulting rounding noise.
pub const EPSILON: f64 = 1e-9;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::EngineConfig;
pub use executor::{SequentialExecutor, StepExecutor};
#[cfg(feature = "parallel")]
pub use executor::ParallelExecutor;
pub use gate::CapacityGate;
pub use graph::{ExitedVehicle, NetworkGraph};
pub use link::{InsertPosition, InsertPriority, NetworkLink, VehicleLocation};
pub use node::{NetworkNode, NodeTransferPlan, PlannedTransfer};
pub use vehicle::{DriverAgent, FixedRouteDriver, MobileVehicle, VehicleDescriptor};
