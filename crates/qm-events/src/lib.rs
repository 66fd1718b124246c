//! `qm-events` — the engine's observability boundary.
//!
//! The queue engine reports vehicle movement as a deterministic, replayable
//! stream of [`Event`]s.  Consumers register [`EventHandler`]s with an
//! [`EventsManager`]; the engine calls `process` at each boundary moment.
//!
//! # Boundary semantics
//!
//! Link *enter* fires when a vehicle is added to a link (from an upstream
//! intersection or as a departing insertion).  Link *leave* fires when a node
//! pops the vehicle out of the link's gate — either forwarding it downstream
//! or removing it from the network at trip end.  The internal promotion from
//! the travelling queue into the gate is **not** an event boundary.
//!
//! # Crate layout
//!
//! | Module       | Contents                                        |
//! |--------------|-------------------------------------------------|
//! | [`event`]    | `Event`, `EventKind`                            |
//! | [`manager`]  | `EventHandler` trait, `EventsManager` fan-out   |
//! | [`recorder`] | `EventLog` in-memory recorder                   |
//! | [`csv`]      | `CsvEventWriter` file sink                      |

pub mod csv;
pub mod error;
pub mod event;
pub mod manager;
pub mod recorder;

#[cfg(test)]
mod tests;

pub use csv::CsvEventWriter;
pub use error::{EventsError, EventsResult};
pub use event::{Event, EventKind};
pub use manager::{EventHandler, EventsManager};
pub use recorder::EventLog;
