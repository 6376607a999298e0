use bitcoin::Network;
use network_core::bip44;
use network_core::params::{
    AddressPrefixes, ExtendedKeyVersions, IndexKey, Lookup, NetworkParams, VersionBytes,
    INDEX_ALL, INDEX_MINIMAL,
};
use network_core::{NetworkError, NetworkRegistry};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::BtcError;

/// Currency code every Bitcoin record is registered under.
pub const CURRENCY: &str = "BTC";

/// SLIP-132 extended-key versions shared by testnet and regtest.
const TEST_VERSIONS: ExtendedKeyVersions = ExtendedKeyVersions {
    xpubkey: VersionBytes {
        bytes: 0x043587cf,
        text: "tpub",
    },
    xprivkey: VersionBytes {
        bytes: 0x04358394,
        text: "tprv",
    },
};

const TEST_PREFIXES: AddressPrefixes = AddressPrefixes {
    pubkeyhash: 0x6f,
    privatekey: 0xef,
    scripthash: 0xc4,
};

/// Bitcoin mainnet.
pub const MAINNET: NetworkParams = NetworkParams {
    currency: CURRENCY,
    description: "Bitcoin",
    name: "btc",
    alias: "livenet",
    coin_index: bip44::hardened(bip44::BTC),
    protocol: "bitcoin",
    prefix: AddressPrefixes {
        pubkeyhash: 0x00,
        privatekey: 0x80,
        scripthash: 0x05,
    },
    version: ExtendedKeyVersions {
        xpubkey: VersionBytes {
            bytes: 0x0488b21e,
            text: "xpub",
        },
        xprivkey: VersionBytes {
            bytes: 0x0488ade4,
            text: "xprv",
        },
    },
    network_magic: 0xf9beb4d9,
    port: 8333,
    dns_seeds: &[
        "seed.bitcoin.sipa.be",
        "dnsseed.bluematt.me",
        "dnsseed.bitcoin.dashjr.org",
        "seed.bitcoinstats.com",
        "seed.bitnodes.io",
        "bitseed.xf2.org",
    ],
    index_by: INDEX_ALL,
};

/// Bitcoin testnet3.
pub const TESTNET: NetworkParams = NetworkParams {
    currency: CURRENCY,
    description: "Testnet",
    name: "testnet",
    alias: "testnet",
    coin_index: bip44::hardened(bip44::TESTNET),
    protocol: "testnet",
    prefix: TEST_PREFIXES,
    version: TEST_VERSIONS,
    network_magic: 0x0b110907,
    port: 18333,
    dns_seeds: &[
        "testnet-seed.bitcoin.petertodd.org",
        "testnet-seed.bluematt.me",
        "testnet-seed.alexykot.me",
        "testnet-seed.bitcoin.schildbach.de",
    ],
    index_by: INDEX_ALL,
};

/// Local regression-test network. Shares testnet's prefixes, so it is only
/// indexed by the fields that tell the two apart.
pub const REGTEST: NetworkParams = NetworkParams {
    currency: CURRENCY,
    description: "Regtest",
    name: "regtest",
    alias: "testnet",
    coin_index: bip44::hardened(bip44::TESTNET),
    protocol: "regtest",
    prefix: TEST_PREFIXES,
    version: TEST_VERSIONS,
    network_magic: 0xfabfb5da,
    port: 18444,
    dns_seeds: &[],
    index_by: INDEX_MINIMAL,
};

/// All Bitcoin records, in registration order.
pub const NETWORKS: &[NetworkParams] = &[MAINNET, TESTNET, REGTEST];

/// Supported Bitcoin networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BtcNetwork {
    Mainnet,
    Testnet,
    Regtest,
}

impl BtcNetwork {
    /// Convert to the `bitcoin` crate's `Network` type.
    pub fn to_bitcoin_network(self) -> Network {
        match self {
            BtcNetwork::Mainnet => Network::Bitcoin,
            BtcNetwork::Testnet => Network::Testnet,
            BtcNetwork::Regtest => Network::Regtest,
        }
    }

    /// The static parameter record for this network.
    pub fn params(self) -> &'static NetworkParams {
        match self {
            BtcNetwork::Mainnet => &MAINNET,
            BtcNetwork::Testnet => &TESTNET,
            BtcNetwork::Regtest => &REGTEST,
        }
    }
}

impl std::fmt::Display for BtcNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BtcNetwork::Mainnet => write!(f, "mainnet"),
            BtcNetwork::Testnet => write!(f, "testnet"),
            BtcNetwork::Regtest => write!(f, "regtest"),
        }
    }
}

/// Construction-time settings for [`BtcNetworks`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Resolve the logical name "testnet" to the regtest record.
    pub regtest_enabled: bool,
}

impl NetworkConfig {
    pub fn from_json(json: &str) -> Result<Self, BtcError> {
        serde_json::from_str(json).map_err(|e| BtcError::InvalidConfig(e.to_string()))
    }
}

/// Bitcoin-scoped view of a network registry.
///
/// The registry may hold records of other currencies; every lookup here is
/// restricted to [`CURRENCY`]. The regtest selector belongs to this value, so
/// toggling it needs exclusive access.
#[derive(Debug, Clone)]
pub struct BtcNetworks {
    registry: NetworkRegistry,
    regtest_enabled: bool,
}

impl BtcNetworks {
    /// A private registry holding just the Bitcoin records.
    pub fn new(config: NetworkConfig) -> Self {
        Self {
            registry: NETWORKS.iter().copied().collect(),
            regtest_enabled: config.regtest_enabled,
        }
    }

    /// Register the Bitcoin records into an existing, possibly shared, registry.
    pub fn with_registry(mut registry: NetworkRegistry, config: NetworkConfig) -> Result<Self, BtcError> {
        registry.add(NETWORKS)?;
        Ok(Self {
            registry,
            regtest_enabled: config.regtest_enabled,
        })
    }

    /// Resolve a logical name ("livenet", "mainnet", "testnet", "regtest") or
    /// any indexed field value to a Bitcoin record.
    ///
    /// With `keys`, raw lookups compare only those fields.
    pub fn get<'a>(
        &self,
        arg: impl Into<Lookup<'a>>,
        keys: Option<&[IndexKey]>,
    ) -> Result<&NetworkParams, BtcError> {
        let arg = match arg.into() {
            Lookup::Text(s) => Lookup::Text(s.trim()),
            other => other,
        };

        let named = match arg {
            Lookup::Text("livenet" | "mainnet") => self.registry.get("btc", keys, CURRENCY),
            Lookup::Text("testnet") => {
                let name = if self.regtest_enabled { "regtest" } else { "testnet" };
                self.registry.get(name, keys, CURRENCY)
            }
            Lookup::Text("regtest") => self.registry.get("regtest", keys, CURRENCY),
            _ => None,
        };

        named
            .or_else(|| self.registry.get(arg, keys, CURRENCY))
            .ok_or_else(|| {
                debug!(%arg, "no bitcoin network matches");
                NetworkError::UnknownNetwork(arg.to_string()).into()
            })
    }

    /// Distinct URI schemes of the registered Bitcoin records, in
    /// registration order.
    pub fn protocols(&self) -> Vec<&'static str> {
        let mut protocols: Vec<&'static str> = Vec::new();
        for network in self.registry.filtered(CURRENCY) {
            if !network.protocol.is_empty() && !protocols.contains(&network.protocol) {
                protocols.push(network.protocol);
            }
        }
        protocols
    }

    /// URI scheme of the livenet record.
    pub fn protocol(&self) -> Result<&'static str, BtcError> {
        self.registry
            .filtered(CURRENCY)
            .find(|n| n.alias == "livenet")
            .map(|n| n.protocol)
            .ok_or_else(|| NetworkError::NoLivenetProtocol.into())
    }

    pub fn enable_regtest(&mut self) {
        info!("regtest enabled for testnet lookups");
        self.regtest_enabled = true;
    }

    pub fn disable_regtest(&mut self) {
        info!("regtest disabled for testnet lookups");
        self.regtest_enabled = false;
    }

    pub fn is_regtest_enabled(&self) -> bool {
        self.regtest_enabled
    }

    pub fn add(&mut self, records: &[NetworkParams]) -> Result<(), BtcError> {
        Ok(self.registry.add(records)?)
    }

    /// Remove a Bitcoin record by name.
    pub fn remove(&mut self, name: &str) -> Option<NetworkParams> {
        self.registry.remove(CURRENCY, name)
    }

    pub fn registry(&self) -> &NetworkRegistry {
        &self.registry
    }

    pub fn into_registry(self) -> NetworkRegistry {
        self.registry
    }

    pub fn default_network() -> &'static NetworkParams {
        &MAINNET
    }

    pub fn livenet() -> &'static NetworkParams {
        &MAINNET
    }

    pub fn mainnet() -> &'static NetworkParams {
        &MAINNET
    }

    pub fn testnet() -> &'static NetworkParams {
        &TESTNET
    }

    pub fn regtest() -> &'static NetworkParams {
        &REGTEST
    }
}

impl Default for BtcNetworks {
    fn default() -> Self {
        Self::new(NetworkConfig::default())
    }
}
