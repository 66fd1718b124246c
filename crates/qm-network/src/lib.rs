//! `qm-network` — static network data for the queuemob traffic engine.
//!
//! The engine consumes per-link attributes (length, free-flow speed, flow
//! capacity, lane count, allowed modes) read-only after construction.  This
//! crate owns that data and the validating builder that produces it.
//!
//! # Data layout
//!
//! [`Network`] holds two flat registries indexed by [`LinkId`]/[`NodeId`]:
//! link attributes, and per-node in/out adjacency lists.  Links and nodes
//! reference each other only by id — there is no mutual ownership, so the
//! naturally cyclic road graph has no ownership cycles.
//!
//! # Validation
//!
//! Structural errors are fatal at construction time ([`NetworkBuilder::build`])
//! because the topology is immutable once simulation starts: references to
//! unregistered nodes, non-positive free-flow speed, flow capacity, or lane
//! count, and negative length all fail the build.  Ids are dense indices
//! assigned by the builder, so duplicate ids cannot be expressed.

pub mod error;
pub mod network;

#[cfg(test)]
mod tests;

pub use error::{NetworkBuildError, NetworkResult};
pub use network::{LinkAttributes, LinkSpec, Network, NetworkBuilder};
