use qm_core::NodeId;
use thiserror::Error;

/// Structural errors raised by [`NetworkBuilder::build`](crate::NetworkBuilder::build).
///
/// All of these are fatal: the topology is fixed before the simulation starts,
/// so a bad link can never be repaired at runtime.
#[derive(Debug, Error)]
pub enum NetworkBuildError {
    #[error("link {link_index} references unregistered node {node}")]
    UnknownNode { link_index: usize, node: NodeId },

    #[error("link {link_index} has non-positive free-flow speed {value} m/s")]
    NonPositiveFreespeed { link_index: usize, value: f64 },

    #[error("link {link_index} has non-positive flow capacity {value}")]
    NonPositiveFlowCapacity { link_index: usize, value: f64 },

    #[error("link {link_index} has non-positive lane count {value}")]
    NonPositiveLanes { link_index: usize, value: f64 },

    #[error("link {link_index} has negative length {value} m")]
    NegativeLength { link_index: usize, value: f64 },

    #[error("non-positive capacity period {0} s")]
    NonPositiveCapacityPeriod(f64),

    #[error("non-positive cell size {0} m")]
    NonPositiveCellSize(f64),
}

pub type NetworkResult<T> = Result<T, NetworkBuildError>;
