use serde::Serialize;

/// Single-byte version prefixes for Base58Check payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AddressPrefixes {
    pub pubkeyhash: u8,
    pub privatekey: u8,
    pub scripthash: u8,
}

/// An extended-key version: the 4-byte serialization prefix and the text it
/// renders as once Base58 encoded (see SLIP-132).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VersionBytes {
    pub bytes: u32,
    pub text: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExtendedKeyVersions {
    pub xpubkey: VersionBytes,
    pub xprivkey: VersionBytes,
}

/// A field of [`NetworkParams`] the registry can match a lookup against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum IndexKey {
    Name,
    Alias,
    Protocol,
    PubkeyHash,
    PrivateKey,
    ScriptHash,
    XpubKey,
    XprivKey,
    NetworkMagic,
    Port,
}

/// Every matchable field.
pub const INDEX_ALL: &[IndexKey] = &[
    IndexKey::Name,
    IndexKey::Alias,
    IndexKey::Protocol,
    IndexKey::PubkeyHash,
    IndexKey::PrivateKey,
    IndexKey::ScriptHash,
    IndexKey::XpubKey,
    IndexKey::XprivKey,
    IndexKey::NetworkMagic,
    IndexKey::Port,
];

/// Fields that are unique even for networks sharing address prefixes with
/// another record.
pub const INDEX_MINIMAL: &[IndexKey] = &[
    IndexKey::Name,
    IndexKey::Alias,
    IndexKey::Protocol,
    IndexKey::NetworkMagic,
    IndexKey::Port,
];

/// A value to look a network up by: a name-like string or a numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    Text(&'a str),
    Number(u64),
}

impl<'a> From<&'a str> for Lookup<'a> {
    fn from(s: &'a str) -> Self {
        Lookup::Text(s)
    }
}

impl<'a> From<&'a String> for Lookup<'a> {
    fn from(s: &'a String) -> Self {
        Lookup::Text(s.as_str())
    }
}

impl From<u8> for Lookup<'_> {
    fn from(n: u8) -> Self {
        Lookup::Number(n.into())
    }
}

impl From<u16> for Lookup<'_> {
    fn from(n: u16) -> Self {
        Lookup::Number(n.into())
    }
}

impl From<u32> for Lookup<'_> {
    fn from(n: u32) -> Self {
        Lookup::Number(n.into())
    }
}

impl From<u64> for Lookup<'_> {
    fn from(n: u64) -> Self {
        Lookup::Number(n)
    }
}

impl std::fmt::Display for Lookup<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lookup::Text(s) => write!(f, "{s}"),
            Lookup::Number(n) => write!(f, "{n:#x}"),
        }
    }
}

/// Parameters of one network variant of one currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkParams {
    pub currency: &'static str,
    pub description: &'static str,
    pub name: &'static str,
    pub alias: &'static str,
    /// Hardened BIP-44 coin type.
    pub coin_index: u32,
    /// URI scheme, without the trailing colon.
    pub protocol: &'static str,
    pub prefix: AddressPrefixes,
    pub version: ExtendedKeyVersions,
    /// P2P message start, big-endian.
    pub network_magic: u32,
    pub port: u16,
    pub dns_seeds: &'static [&'static str],
    #[serde(skip)]
    pub index_by: &'static [IndexKey],
}

impl NetworkParams {
    /// Network magic in wire order.
    pub fn magic_bytes(&self) -> [u8; 4] {
        self.network_magic.to_be_bytes()
    }

    pub fn magic_hex(&self) -> String {
        hex::encode(self.magic_bytes())
    }

    pub fn is_indexed_by(&self, key: IndexKey) -> bool {
        self.index_by.contains(&key)
    }

    /// Whether `key` of this record equals `value`. Text lookups never match
    /// numeric fields and vice versa, except for extended-key versions which
    /// carry both forms.
    pub fn matches(&self, key: IndexKey, value: Lookup<'_>) -> bool {
        match (key, value) {
            (IndexKey::Name, Lookup::Text(s)) => self.name == s,
            (IndexKey::Alias, Lookup::Text(s)) => self.alias == s,
            (IndexKey::Protocol, Lookup::Text(s)) => self.protocol == s,
            (IndexKey::PubkeyHash, Lookup::Number(n)) => u64::from(self.prefix.pubkeyhash) == n,
            (IndexKey::PrivateKey, Lookup::Number(n)) => u64::from(self.prefix.privatekey) == n,
            (IndexKey::ScriptHash, Lookup::Number(n)) => u64::from(self.prefix.scripthash) == n,
            (IndexKey::XpubKey, Lookup::Number(n)) => u64::from(self.version.xpubkey.bytes) == n,
            (IndexKey::XpubKey, Lookup::Text(s)) => self.version.xpubkey.text == s,
            (IndexKey::XprivKey, Lookup::Number(n)) => u64::from(self.version.xprivkey.bytes) == n,
            (IndexKey::XprivKey, Lookup::Text(s)) => self.version.xprivkey.text == s,
            (IndexKey::NetworkMagic, Lookup::Number(n)) => u64::from(self.network_magic) == n,
            (IndexKey::Port, Lookup::Number(n)) => u64::from(self.port) == n,
            _ => false,
        }
    }
}
