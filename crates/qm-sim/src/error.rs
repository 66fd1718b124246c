use qm_core::LinkId;
use qm_network::NetworkBuildError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("network build error: {0}")]
    Network(#[from] NetworkBuildError),

    #[error("departure references unknown link {0}")]
    UnknownLink(LinkId),
}

pub type SimResult<T> = Result<T, SimError>;
