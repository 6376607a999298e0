use bitcoin::address::{Address, NetworkUnchecked};
use bitcoin::Network;

use crate::error::BtcError;
use crate::network::BtcNetwork;

fn parse_unchecked(address: &str) -> Result<Address<NetworkUnchecked>, BtcError> {
    address
        .trim()
        .parse::<Address<NetworkUnchecked>>()
        .map_err(|e| BtcError::InvalidAddress(format!("failed to parse address: {e}")))
}

/// Validate a Bitcoin address string for the given network.
///
/// Supports P2PKH, P2SH, P2WPKH, P2WSH, and P2TR address formats.
/// Returns `true` if the address is valid for the specified network,
/// `false` if it is valid but for a different network.
pub fn validate_address(address: &str, network: BtcNetwork) -> Result<bool, BtcError> {
    let parsed = parse_unchecked(address)?;
    Ok(parsed.is_valid_for_network(network.to_bitcoin_network()))
}

/// Determine which network an address belongs to.
///
/// Base58 testnet and regtest addresses are indistinguishable and report
/// [`BtcNetwork::Testnet`]; only `bcrt1` segwit addresses report regtest.
pub fn detect_network(address: &str) -> Result<BtcNetwork, BtcError> {
    let parsed = parse_unchecked(address)?;

    if parsed.is_valid_for_network(Network::Bitcoin) {
        Ok(BtcNetwork::Mainnet)
    } else if parsed.is_valid_for_network(Network::Testnet) {
        Ok(BtcNetwork::Testnet)
    } else if parsed.is_valid_for_network(Network::Regtest) {
        Ok(BtcNetwork::Regtest)
    } else {
        Err(BtcError::InvalidNetwork(format!(
            "{} does not belong to a bitcoin network",
            address.trim()
        )))
    }
}
