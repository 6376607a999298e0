//! Cross-crate tests: Bitcoin records living in a registry shared with
//! another currency, and the public unit/URI API end to end.

use chain_btc::network::{CURRENCY, MAINNET, REGTEST, TESTNET};
use chain_btc::unit::{BITS, BTC, MBTC, SATOSHIS, UBTC};
use chain_btc::{BtcNetworks, BtcUnit, BtcUri, NetworkConfig};
use network_core::params::{AddressPrefixes, ExtendedKeyVersions, VersionBytes, INDEX_ALL};
use network_core::{NetworkParams, NetworkRegistry};

/// A second currency reusing Bitcoin's names and aliases.
const FORK_TESTNET: NetworkParams = NetworkParams {
    currency: "FRK",
    description: "Fork testnet",
    name: "testnet",
    alias: "testnet",
    coin_index: 0x8000_0001,
    protocol: "forktest",
    prefix: AddressPrefixes {
        pubkeyhash: 0x6f,
        privatekey: 0xef,
        scripthash: 0xc4,
    },
    version: ExtendedKeyVersions {
        xpubkey: VersionBytes {
            bytes: 0x043587cf,
            text: "tpub",
        },
        xprivkey: VersionBytes {
            bytes: 0x04358394,
            text: "tprv",
        },
    },
    network_magic: 0xf4e5f3f4,
    port: 18333,
    dns_seeds: &[],
    index_by: INDEX_ALL,
};

const FORK_MAINNET: NetworkParams = NetworkParams {
    name: "btc",
    alias: "livenet",
    protocol: "fork",
    network_magic: 0xe3e1f3e8,
    ..FORK_TESTNET
};

fn shared_networks() -> BtcNetworks {
    let mut registry = NetworkRegistry::new();
    registry.add(&[FORK_TESTNET, FORK_MAINNET]).unwrap();
    BtcNetworks::with_registry(registry, NetworkConfig::default()).unwrap()
}

// ─── Networks ──────────────────────────────────────────────────────

#[test]
fn lookups_ignore_other_currencies() {
    let networks = shared_networks();
    assert_eq!(networks.registry().len(), 5);
    assert_eq!(networks.get("testnet", None).unwrap(), &TESTNET);
    assert_eq!(networks.get("livenet", None).unwrap(), &MAINNET);
    assert_eq!(networks.get(0x6fu8, None).unwrap().currency, CURRENCY);
    assert!(networks.get(0xf4e5f3f4u32, None).is_err());
}

#[test]
fn protocols_are_scoped_to_bitcoin() {
    let networks = shared_networks();
    assert_eq!(networks.protocols(), vec!["bitcoin", "testnet", "regtest"]);
    assert_eq!(networks.protocol().unwrap(), "bitcoin");
}

#[test]
fn registering_bitcoin_twice_fails() {
    let registry = shared_networks().into_registry();
    assert!(BtcNetworks::with_registry(registry, NetworkConfig::default()).is_err());
}

#[test]
fn regtest_toggle_round_trip() {
    let mut networks = shared_networks();
    let before = *networks.get("testnet", None).unwrap();
    networks.enable_regtest();
    assert_eq!(networks.get("testnet", None).unwrap(), &REGTEST);
    networks.disable_regtest();
    assert_eq!(networks.get("testnet", None).unwrap(), &before);
}

#[test]
fn magic_bytes_on_the_wire() {
    let expected = [("f9beb4d9", &MAINNET), ("0b110907", &TESTNET), ("fabfb5da", &REGTEST)];
    for (hex_magic, params) in expected {
        assert_eq!(params.magic_bytes().to_vec(), hex::decode(hex_magic).unwrap());
    }
}

// ─── Units ─────────────────────────────────────────────────────────

#[test]
fn unit_conversions_through_public_api() {
    let unit = BtcUnit::from_btc(1.3).unwrap();
    assert_eq!(unit.to_satoshis(), 130_000_000);
    assert_eq!(unit.to(MBTC).unwrap(), 1_300.0);
    assert_eq!(unit.to(UBTC).unwrap(), 1_300_000.0);
    assert_eq!(unit.to(BITS).unwrap(), 1_300_000.0);
    assert_eq!(unit.to(SATOSHIS).unwrap(), 130_000_000.0);
    assert_eq!(unit.to(BTC).unwrap(), 1.3);
}

#[test]
fn fiat_amount_in_btc() {
    let unit = BtcUnit::from_fiat(1.3, 350.0).unwrap();
    assert_eq!(unit.btc(), 0.00371429);
}

#[test]
fn unit_object_round_trip() {
    let unit = BtcUnit::from_object(&serde_json::json!({ "amount": 5, "code": "satoshi" })).unwrap();
    assert_eq!(unit.to_satoshis(), 5);

    let json = serde_json::to_value(unit).unwrap();
    assert_eq!(BtcUnit::from_object(&json).unwrap(), unit);

    assert!(BtcUnit::from_object(&serde_json::json!("not-an-object")).is_err());
}

// ─── URIs ──────────────────────────────────────────────────────────

#[test]
fn bitcoin_uri_validity() {
    let networks = shared_networks();
    assert!(BtcUri::is_valid(&networks, "bitcoin:12A1MyfXbW6RhdRAZEqofac5jCQQjwEPBu", &[]));
    assert!(!BtcUri::is_valid(&networks, "notaprotocol:xxx", &[]));
    assert!(!BtcUri::is_valid(&networks, "fork:12A1MyfXbW6RhdRAZEqofac5jCQQjwEPBu", &[]));
}

#[test]
fn parse_only_tries_bitcoin_schemes() {
    let networks = shared_networks();
    assert!(BtcUri::parse(&networks, "regtest:mkYY5NRvikVBY1EPtaq9fAFgquesdjqECw").is_ok());
    assert!(BtcUri::parse(&networks, "forktest:mkYY5NRvikVBY1EPtaq9fAFgquesdjqECw").is_err());
}

#[test]
fn segwit_uri_with_amount_and_label() {
    let networks = shared_networks();
    let uri = BtcUri::from_string(
        &networks,
        "BITCOIN:bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4?amount=0.0005&label=Coffee+shop",
    )
    .unwrap();
    assert_eq!(uri.amount_sat(), Some(50_000));
    assert_eq!(uri.label(), Some("Coffee shop"));
    assert_eq!(uri.network(), &MAINNET);
    assert_eq!(
        uri.to_string(),
        "bitcoin:bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4?amount=0.0005&label=Coffee%20shop"
    );
}
