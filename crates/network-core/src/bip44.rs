//! BIP-44 coin types, as registered in [SLIP 44].
//!
//! [SLIP 44]: https://github.com/satoshilabs/slips/blob/master/slip-0044.md

/// Bit set on a hardened derivation index.
pub const HARDENED: u32 = 0x8000_0000;

/// Coin type for Bitcoin mainnet.
pub const BTC: u32 = 0;

/// Coin type shared by every test network.
pub const TESTNET: u32 = 1;

/// Return the hardened form of a coin type, as used in `m/44'/coin'/...` paths.
pub const fn hardened(coin_type: u32) -> u32 {
    coin_type ^ HARDENED
}
