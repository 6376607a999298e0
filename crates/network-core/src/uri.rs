//! Payment URIs in the BIP-21 form `<scheme>:<address>?amount=..&label=..`.
//!
//! The grammar is currency-agnostic; a [`UriContext`] supplies the accepted
//! scheme(s), address validation and the denomination table amounts are
//! expressed in.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::NetworkError;
use crate::params::NetworkParams;
use crate::unit::{denomination_of_kind, Denomination, Unit, UnitKind};

/// Prefix marking a parameter the reader must understand.
pub const REQUIRED_PREFIX: &str = "req-";

/// What a currency supplies to the URI grammar.
pub trait UriContext {
    type Error: From<NetworkError>;

    /// Scheme accepted when constructing a [`Uri`].
    fn protocol(&self) -> Result<&'static str, Self::Error>;

    /// Every scheme registered for the currency, tried in order by [`parse_with_protocols`].
    fn protocols(&self) -> Vec<&'static str>;

    /// Validate a payment address and return the network it belongs to.
    fn address_network(&self, address: &str) -> Result<NetworkParams, Self::Error>;

    fn units(&self) -> &'static [Denomination];
}

/// A URI split into scheme, address and raw decoded query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedUri {
    pub protocol: String,
    pub address: String,
    pub params: BTreeMap<String, String>,
}

/// Object form of a [`Uri`]. `amount` is in atomic units.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UriObject {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<String>,
    #[serde(flatten)]
    pub extras: BTreeMap<String, String>,
}

/// A validated payment request.
#[derive(Debug, Clone, PartialEq)]
pub struct Uri {
    protocol: &'static str,
    units: &'static [Denomination],
    pub address: String,
    pub network: NetworkParams,
    /// Requested amount in atomic units.
    pub amount: Option<i64>,
    pub message: Option<String>,
    pub label: Option<String>,
    pub r: Option<String>,
    pub extras: BTreeMap<String, String>,
    pub known_params: Vec<String>,
}

impl Uri {
    /// Parse a URI string using the context's livenet scheme.
    pub fn from_str_in<C: UriContext>(
        ctx: &C,
        data: &str,
        known_params: &[&str],
    ) -> Result<Self, C::Error> {
        let protocol = ctx.protocol()?;
        let mut parsed = parse_scheme(protocol, data)?;
        let amount = match parsed.params.remove("amount") {
            Some(raw) => Some(parse_amount(ctx.units(), &raw)?),
            None => None,
        };
        parsed.params.remove("address");
        Self::build(ctx, protocol, parsed.address, amount, parsed.params, known_params)
    }

    pub fn from_object_in<C: UriContext>(
        ctx: &C,
        obj: &UriObject,
        known_params: &[&str],
    ) -> Result<Self, C::Error> {
        let protocol = ctx.protocol()?;
        let mut params = obj.extras.clone();
        for (key, value) in [("message", &obj.message), ("label", &obj.label), ("r", &obj.r)] {
            if let Some(value) = value {
                params.insert(key.to_string(), value.clone());
            }
        }
        Self::build(ctx, protocol, obj.address.clone(), obj.amount, params, known_params)
    }

    /// Accepts either a URI string or an object with the [`UriObject`] shape.
    pub fn from_value_in<C: UriContext>(
        ctx: &C,
        value: &serde_json::Value,
        known_params: &[&str],
    ) -> Result<Self, C::Error> {
        match value {
            serde_json::Value::String(s) => Self::from_str_in(ctx, s, known_params),
            serde_json::Value::Object(_) => {
                let obj: UriObject = serde_json::from_value(value.clone()).map_err(|e| {
                    NetworkError::InvalidArgument(format!("malformed URI object: {e}"))
                })?;
                Self::from_object_in(ctx, &obj, known_params)
            }
            _ => Err(NetworkError::InvalidArgument("Expected a string or object".into()).into()),
        }
    }

    fn build<C: UriContext>(
        ctx: &C,
        protocol: &'static str,
        address: String,
        amount: Option<i64>,
        params: BTreeMap<String, String>,
        known_params: &[&str],
    ) -> Result<Self, C::Error> {
        if let Some(atomic) = amount {
            if atomic < 0 {
                return Err(NetworkError::InvalidAmount(atomic.to_string()).into());
            }
            denomination_of_kind(ctx.units(), UnitKind::Standard)?;
        }
        let network = ctx.address_network(&address)?;

        let mut uri = Uri {
            protocol,
            units: ctx.units(),
            address,
            network,
            amount,
            message: None,
            label: None,
            r: None,
            extras: BTreeMap::new(),
            known_params: known_params.iter().map(|p| p.to_string()).collect(),
        };

        for (key, value) in params {
            if key.starts_with(REQUIRED_PREFIX) && !known_params.contains(&key.as_str()) {
                return Err(NetworkError::UnknownRequiredParam(key).into());
            }
            match key.as_str() {
                "message" => uri.message = Some(value),
                "label" => uri.label = Some(value),
                "r" => uri.r = Some(value),
                _ => {
                    uri.extras.insert(key, value);
                }
            }
        }
        Ok(uri)
    }

    pub fn protocol(&self) -> &'static str {
        self.protocol
    }

    pub fn to_object(&self) -> UriObject {
        UriObject {
            address: self.address.clone(),
            amount: self.amount,
            message: self.message.clone(),
            label: self.label.clone(),
            r: self.r.clone(),
            extras: self.extras.clone(),
        }
    }
}

impl std::fmt::Display for Uri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.protocol, self.address)?;

        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(atomic) = self.amount {
            // A table without a standard unit renders atomic units.
            let amount = match denomination_of_kind(self.units, UnitKind::Standard) {
                Ok(standard) => Unit::from_atomic(self.units, atomic)
                    .to_denomination(standard)
                    .to_string(),
                Err(_) => atomic.to_string(),
            };
            query.push(("amount", amount));
        }
        for (key, value) in [("message", &self.message), ("label", &self.label), ("r", &self.r)] {
            if let Some(value) = value {
                query.push((key, value.clone()));
            }
        }
        for (key, value) in &self.extras {
            query.push((key.as_str(), value.clone()));
        }

        for (i, (key, value)) in query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{}={}", encode_component(key), encode_component(value))?;
        }
        Ok(())
    }
}

/// Split `uri` if its scheme is `protocol` (case-insensitive).
pub fn parse_scheme(protocol: &str, uri: &str) -> Result<ParsedUri, NetworkError> {
    let (scheme, rest) = uri
        .split_once(':')
        .ok_or_else(|| NetworkError::InvalidUri("missing scheme".into()))?;
    if !scheme.eq_ignore_ascii_case(protocol) {
        return Err(NetworkError::InvalidUri(format!(
            "expected scheme {protocol}, found {scheme}"
        )));
    }

    // Up to two slashes may precede the address.
    let rest = rest.strip_prefix('/').unwrap_or(rest);
    let rest = rest.strip_prefix('/').unwrap_or(rest);
    let (address, query) = rest.split_once('?').unwrap_or((rest, ""));
    let address = decode_component(address)?;
    if address.is_empty() {
        return Err(NetworkError::InvalidUri("missing address".into()));
    }

    Ok(ParsedUri {
        protocol: protocol.to_string(),
        address,
        params: decode_query(query)?,
    })
}

/// Try each protocol in order; the first one that matches wins.
pub fn parse_with_protocols(protocols: &[&str], uri: &str) -> Result<ParsedUri, NetworkError> {
    for &protocol in protocols {
        match parse_scheme(protocol, uri) {
            Ok(parsed) => return Ok(parsed),
            Err(e) => trace!(protocol, error = %e, "scheme did not match"),
        }
    }
    Err(NetworkError::InvalidUri(format!(
        "scheme is not one of {}",
        protocols.join(", ")
    )))
}

fn parse_amount(units: &'static [Denomination], raw: &str) -> Result<i64, NetworkError> {
    let amount: f64 = raw
        .trim()
        .parse()
        .map_err(|_| NetworkError::InvalidAmount(raw.to_string()))?;
    if amount < 0.0 {
        return Err(NetworkError::InvalidAmount(raw.to_string()));
    }
    let standard = denomination_of_kind(units, UnitKind::Standard)?;
    Ok(Unit::new(units, amount, standard.code)?.atomic())
}

fn decode_query(query: &str) -> Result<BTreeMap<String, String>, NetworkError> {
    let mut params = BTreeMap::new();
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        params.insert(decode_component(key)?, decode_component(value)?);
    }
    Ok(params)
}

/// Form-style decoding: `+` is a space, `%XX` is a byte.
fn decode_component(input: &str) -> Result<String, NetworkError> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' => {
                let escaped = bytes
                    .get(i + 1..i + 3)
                    .and_then(|hex_pair| hex::decode(hex_pair).ok())
                    .ok_or_else(|| NetworkError::InvalidUri(format!("bad escape in {input}")))?;
                out.extend_from_slice(&escaped);
                i += 2;
            }
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8(out).map_err(|_| NetworkError::InvalidUri(format!("non UTF-8 text in {input}")))
}

fn encode_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for &b in input.as_bytes() {
        if b.is_ascii_alphanumeric() || b"-_.!~*'()".contains(&b) {
            out.push(char::from(b));
        } else {
            out.push('%');
            out.push_str(&hex::encode_upper([b]));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{AddressPrefixes, ExtendedKeyVersions, VersionBytes, INDEX_ALL};
    use crate::unit::{DecimalRange, Precision};

    const NET: NetworkParams = NetworkParams {
        currency: "TST",
        description: "Test coin",
        name: "tst",
        alias: "livenet",
        coin_index: 0x8000_0000,
        protocol: "testcoin",
        prefix: AddressPrefixes {
            pubkeyhash: 0,
            privatekey: 0x80,
            scripthash: 5,
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
        network_magic: 1,
        port: 1,
        dns_seeds: &[],
        index_by: INDEX_ALL,
    };

    const FULL: Precision = Precision {
        full: DecimalRange {
            max_decimals: 2,
            min_decimals: 2,
        },
        short: DecimalRange {
            max_decimals: 2,
            min_decimals: 0,
        },
    };

    static UNITS: &[Denomination] = &[
        Denomination {
            name: "Test coin",
            short_name: "TST",
            code: "TST",
            accessor: "TST",
            kind: UnitKind::Standard,
            value: 100,
            precision: FULL,
        },
        Denomination {
            name: "cent",
            short_name: "cents",
            code: "cent",
            accessor: "cents",
            kind: UnitKind::Atomic,
            value: 1,
            precision: FULL,
        },
    ];

    static ATOMIC_ONLY: &[Denomination] = &[Denomination {
        name: "cent",
        short_name: "cents",
        code: "cent",
        accessor: "cents",
        kind: UnitKind::Atomic,
        value: 1,
        precision: FULL,
    }];

    /// Accepts addresses that start with "T".
    struct TestContext;

    impl UriContext for TestContext {
        type Error = NetworkError;

        fn protocol(&self) -> Result<&'static str, NetworkError> {
            Ok("testcoin")
        }

        fn protocols(&self) -> Vec<&'static str> {
            vec!["testcoin", "testcoin-dev"]
        }

        fn address_network(&self, address: &str) -> Result<NetworkParams, NetworkError> {
            if address.starts_with('T') {
                Ok(NET)
            } else {
                Err(NetworkError::InvalidAddress(address.to_string()))
            }
        }

        fn units(&self) -> &'static [Denomination] {
            UNITS
        }
    }

    /// [`TestContext`] with a table that has only an atomic unit.
    struct AtomicOnlyContext;

    impl UriContext for AtomicOnlyContext {
        type Error = NetworkError;

        fn protocol(&self) -> Result<&'static str, NetworkError> {
            TestContext.protocol()
        }

        fn protocols(&self) -> Vec<&'static str> {
            TestContext.protocols()
        }

        fn address_network(&self, address: &str) -> Result<NetworkParams, NetworkError> {
            TestContext.address_network(address)
        }

        fn units(&self) -> &'static [Denomination] {
            ATOMIC_ONLY
        }
    }

    #[test]
    fn parses_members_and_extras() {
        let uri = Uri::from_str_in(
            &TestContext,
            "testcoin:Tabc?amount=1.25&message=Hello+World&label=shop&other=x%20y",
            &[],
        )
        .unwrap();
        assert_eq!(uri.address, "Tabc");
        assert_eq!(uri.amount, Some(125));
        assert_eq!(uri.message.as_deref(), Some("Hello World"));
        assert_eq!(uri.label.as_deref(), Some("shop"));
        assert_eq!(uri.extras.get("other").map(String::as_str), Some("x y"));
        assert_eq!(uri.network, NET);
    }

    #[test]
    fn scheme_is_case_insensitive_and_slashes_optional() {
        let uri = Uri::from_str_in(&TestContext, "TESTCOIN://Tabc", &[]).unwrap();
        assert_eq!(uri.address, "Tabc");
    }

    #[test]
    fn wrong_scheme_is_rejected() {
        let err = Uri::from_str_in(&TestContext, "other:Tabc", &[]).unwrap_err();
        assert!(matches!(err, NetworkError::InvalidUri(_)));
    }

    #[test]
    fn invalid_address_is_rejected() {
        let err = Uri::from_str_in(&TestContext, "testcoin:Xabc", &[]).unwrap_err();
        assert!(matches!(err, NetworkError::InvalidAddress(_)));
    }

    #[test]
    fn bad_amount_is_rejected() {
        for uri in ["testcoin:Tabc?amount=abc", "testcoin:Tabc?amount=-1"] {
            let err = Uri::from_str_in(&TestContext, uri, &[]).unwrap_err();
            assert!(matches!(err, NetworkError::InvalidAmount(_)), "{uri}");
        }
    }

    #[test]
    fn unknown_required_param_is_rejected() {
        let err = Uri::from_str_in(&TestContext, "testcoin:Tabc?req-expires=5", &[]).unwrap_err();
        assert_eq!(err, NetworkError::UnknownRequiredParam("req-expires".into()));

        let uri = Uri::from_str_in(&TestContext, "testcoin:Tabc?req-expires=5", &["req-expires"]).unwrap();
        assert_eq!(uri.extras.get("req-expires").map(String::as_str), Some("5"));
        assert_eq!(uri.known_params, vec!["req-expires".to_string()]);
    }

    #[test]
    fn parse_tries_every_protocol() {
        let parsed = parse_with_protocols(&TestContext.protocols(), "testcoin-dev:Tabc?label=a").unwrap();
        assert_eq!(parsed.protocol, "testcoin-dev");
        assert_eq!(parsed.address, "Tabc");
        assert_eq!(parsed.params.get("label").map(String::as_str), Some("a"));

        assert!(parse_with_protocols(&TestContext.protocols(), "nope:Tabc").is_err());
    }

    #[test]
    fn negative_object_amount_is_rejected() {
        let obj = UriObject {
            address: "Tabc".into(),
            amount: Some(-5),
            ..UriObject::default()
        };
        let err = Uri::from_object_in(&TestContext, &obj, &[]).unwrap_err();
        assert_eq!(err, NetworkError::InvalidAmount("-5".into()));
    }

    #[test]
    fn amount_needs_a_standard_unit() {
        let obj = UriObject {
            address: "Tabc".into(),
            amount: Some(5),
            ..UriObject::default()
        };
        let err = Uri::from_object_in(&AtomicOnlyContext, &obj, &[]).unwrap_err();
        assert!(matches!(err, NetworkError::UnknownUnit(_)));

        let mut uri = Uri::from_str_in(&AtomicOnlyContext, "testcoin:Tabc", &[]).unwrap();
        uri.amount = Some(5);
        assert_eq!(uri.to_string(), "testcoin:Tabc?amount=5");
    }

    #[test]
    fn empty_address_is_rejected() {
        for uri in ["testcoin:", "testcoin://", "testcoin:?amount=1"] {
            let err = parse_scheme("testcoin", uri).unwrap_err();
            assert_eq!(err, NetworkError::InvalidUri("missing address".into()), "{uri}");
        }
        assert!(parse_with_protocols(&TestContext.protocols(), "testcoin-dev:").is_err());
    }

    #[test]
    fn bad_escape_is_rejected() {
        assert!(parse_scheme("testcoin", "testcoin:Tabc?message=%zz").is_err());
        assert!(parse_scheme("testcoin", "testcoin:Tabc?message=%4").is_err());
    }

    #[test]
    fn display_encodes_query() {
        let uri = Uri::from_str_in(
            &TestContext,
            "testcoin:Tabc?amount=1.5&message=a%26b&label=c+d&z=1",
            &[],
        )
        .unwrap();
        assert_eq!(uri.to_string(), "testcoin:Tabc?amount=1.5&message=a%26b&label=c%20d&z=1");
    }

    #[test]
    fn display_without_query() {
        let uri = Uri::from_str_in(&TestContext, "testcoin:Tabc", &[]).unwrap();
        assert_eq!(uri.to_string(), "testcoin:Tabc");
    }

    #[test]
    fn object_round_trip() {
        let uri = Uri::from_str_in(&TestContext, "testcoin:Tabc?amount=2&r=https%3A%2F%2Fpay", &[]).unwrap();
        let obj = uri.to_object();
        assert_eq!(obj.amount, Some(200));
        assert_eq!(obj.r.as_deref(), Some("https://pay"));
        assert_eq!(Uri::from_object_in(&TestContext, &obj, &[]).unwrap(), uri);
    }

    #[test]
    fn from_value_dispatches_on_shape() {
        let from_str = Uri::from_value_in(&TestContext, &serde_json::json!("testcoin:Tabc"), &[]).unwrap();
        let from_obj =
            Uri::from_value_in(&TestContext, &serde_json::json!({ "address": "Tabc" }), &[]).unwrap();
        assert_eq!(from_str, from_obj);

        let err = Uri::from_value_in(&TestContext, &serde_json::json!(42), &[]).unwrap_err();
        assert_eq!(err, NetworkError::InvalidArgument("Expected a string or object".into()));
    }
}
