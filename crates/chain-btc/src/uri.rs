use std::collections::BTreeMap;

use network_core::params::NetworkParams;
use network_core::unit::Denomination;
use network_core::uri::{self, ParsedUri, Uri, UriContext, UriObject};
use tracing::debug;

use crate::address::detect_network;
use crate::error::BtcError;
use crate::network::{BtcNetwork, BtcNetworks};
use crate::unit::{BtcUnit, UNITS};

impl UriContext for BtcNetworks {
    type Error = BtcError;

    fn protocol(&self) -> Result<&'static str, BtcError> {
        BtcNetworks::protocol(self)
    }

    fn protocols(&self) -> Vec<&'static str> {
        BtcNetworks::protocols(self)
    }

    /// Testnet-format addresses resolve through the logical "testnet" name,
    /// so they follow the regtest selector.
    fn address_network(&self, address: &str) -> Result<NetworkParams, BtcError> {
        let name = match detect_network(address)? {
            BtcNetwork::Mainnet => "livenet",
            BtcNetwork::Testnet => "testnet",
            BtcNetwork::Regtest => "regtest",
        };
        self.get(name, None).copied()
    }

    fn units(&self) -> &'static [Denomination] {
        UNITS
    }
}

/// A `bitcoin:` payment URI (BIP-21).
#[derive(Debug, Clone, PartialEq)]
pub struct BtcUri(Uri);

impl BtcUri {
    /// Parse a URI string. `known_params` lists the `req-*` parameters the
    /// caller understands; any other `req-*` parameter is an error.
    pub fn new(networks: &BtcNetworks, data: &str, known_params: &[&str]) -> Result<Self, BtcError> {
        Ok(Self(Uri::from_str_in(networks, data, known_params)?))
    }

    pub fn from_string(networks: &BtcNetworks, data: &str) -> Result<Self, BtcError> {
        Self::new(networks, data, &[])
    }

    pub fn from_object(networks: &BtcNetworks, obj: &UriObject) -> Result<Self, BtcError> {
        Ok(Self(Uri::from_object_in(networks, obj, &[])?))
    }

    /// Build from a JSON string (a URI) or object (the [`UriObject`] shape).
    pub fn from_value(
        networks: &BtcNetworks,
        value: &serde_json::Value,
        known_params: &[&str],
    ) -> Result<Self, BtcError> {
        Ok(Self(Uri::from_value_in(networks, value, known_params)?))
    }

    /// Whether `data` is an acceptable `bitcoin:` URI.
    pub fn is_valid(networks: &BtcNetworks, data: &str, known_params: &[&str]) -> bool {
        match Self::new(networks, data, known_params) {
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "rejected bitcoin URI");
                false
            }
        }
    }

    /// Like [`BtcUri::is_valid`], for a string or object value.
    pub fn is_valid_value(
        networks: &BtcNetworks,
        value: &serde_json::Value,
        known_params: &[&str],
    ) -> bool {
        Self::from_value(networks, value, known_params).is_ok()
    }

    /// Split a URI under any scheme registered for bitcoin networks.
    pub fn parse(networks: &BtcNetworks, data: &str) -> Result<ParsedUri, BtcError> {
        Ok(uri::parse_with_protocols(&networks.protocols(), data)?)
    }

    pub fn protocol(&self) -> &'static str {
        self.0.protocol()
    }

    pub fn address(&self) -> &str {
        &self.0.address
    }

    pub fn network(&self) -> &NetworkParams {
        &self.0.network
    }

    pub fn amount(&self) -> Option<BtcUnit> {
        self.0.amount.map(BtcUnit::from_satoshis)
    }

    /// Requested amount in satoshis.
    pub fn amount_sat(&self) -> Option<i64> {
        self.0.amount
    }

    pub fn message(&self) -> Option<&str> {
        self.0.message.as_deref()
    }

    pub fn label(&self) -> Option<&str> {
        self.0.label.as_deref()
    }

    /// Payment-request URL (`r` parameter).
    pub fn r(&self) -> Option<&str> {
        self.0.r.as_deref()
    }

    pub fn extras(&self) -> &BTreeMap<String, String> {
        &self.0.extras
    }

    pub fn to_object(&self) -> UriObject {
        self.0.to_object()
    }

    pub fn inner(&self) -> &Uri {
        &self.0
    }
}

impl std::fmt::Display for BtcUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
