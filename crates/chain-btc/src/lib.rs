//! Bitcoin parameters for the shared network layer.
//!
//! Provides the mainnet/testnet/regtest parameter table and a scoped lookup
//! over it, the BTC/mBTC/uBTC/bits/satoshi denomination table, and
//! `bitcoin:` payment URIs, with address validation delegated to the
//! `bitcoin` crate.

pub mod address;
pub mod error;
pub mod network;
pub mod unit;
pub mod uri;

pub use error::BtcError;
pub use network::{BtcNetwork, BtcNetworks, NetworkConfig};
pub use unit::BtcUnit;
pub use uri::BtcUri;
