use thiserror::Error;

/// Errors raised by the shared registry, unit converter and URI grammar.
#[derive(Debug, Error, PartialEq)]
pub enum NetworkError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unknown network: {0}")]
    UnknownNetwork(String),

    #[error("no livenet protocol found")]
    NoLivenetProtocol,

    #[error("network already registered: {currency}/{name}")]
    DuplicateNetwork { currency: String, name: String },

    #[error("unknown unit: {0}")]
    UnknownUnit(String),

    #[error("invalid exchange rate: {0}")]
    InvalidRate(f64),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid URI: {0}")]
    InvalidUri(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("unknown required argument: {0}")]
    UnknownRequiredParam(String),
}
