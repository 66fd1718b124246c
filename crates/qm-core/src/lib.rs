//! `qm-core` — foundational types for the `queuemob` traffic engine.
//!
//! This crate is a dependency of every other `qm-*` crate.  It intentionally
//! has no `qm-*` dependencies and minimal external ones (only `rand`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                       |
//! |-------------|------------------------------------------------|
//! | [`ids`]     | `LinkId`, `NodeId`, `VehicleId`                |
//! | [`time`]    | `Tick`, `SimClock`                             |
//! | [`rng`]     | `NodeRng` (per-node), `SimRng` (global)        |
//! | [`mode`]    | `TransportMode` enum, `ModeSet` bitmask        |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod ids;
pub mod mode;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use ids::{LinkId, NodeId, VehicleId};
pub use mode::{ModeSet, TransportMode};
pub use rng::{NodeRng, SimRng};
pub use time::{SimClock, Tick};
