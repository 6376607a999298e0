use network_core::NetworkError;
use thiserror::Error;

/// Bitcoin parameter, unit and URI errors.
#[derive(Debug, Error, PartialEq)]
pub enum BtcError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid network: {0}")]
    InvalidNetwork(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Core(#[from] NetworkError),
}
