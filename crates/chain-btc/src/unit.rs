//! Bitcoin denominations bound to the generic [`Unit`] converter.
//!
//! ```ignore
//! let sats = BtcUnit::from_btc(1.3)?.to_satoshis();      // 130_000_000
//! let mbtc = BtcUnit::from_bits(1.3)?.to(MBTC)?;         // 0.0013
//! let bits = BtcUnit::from_fiat(1.3, 350.0)?.bits();     // 3714.29
//! ```

use network_core::unit::{
    DecimalRange, Denomination, Precision, PrecisionKind, Unit, UnitKind, UnitObject,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::BtcError;

/// Accessor names, usable wherever a unit code is expected.
pub const BTC: &str = "BTC";
pub const MBTC: &str = "mBTC";
pub const UBTC: &str = "uBTC";
pub const BITS: &str = "bits";
pub const SATOSHIS: &str = "satoshis";

const fn decimals(max_decimals: u8, min_decimals: u8) -> DecimalRange {
    DecimalRange {
        max_decimals,
        min_decimals,
    }
}

pub const BITCOIN: Denomination = Denomination {
    name: "Bitcoin",
    short_name: "BTC",
    code: "BTC",
    accessor: BTC,
    kind: UnitKind::Standard,
    value: 100_000_000,
    precision: Precision {
        full: decimals(8, 8),
        short: decimals(6, 2),
    },
};

pub const MILLIBITCOIN: Denomination = Denomination {
    name: "mBTC (1,000 mBTC = 1BTC)",
    short_name: "mBTC",
    code: "mBTC",
    accessor: MBTC,
    kind: UnitKind::Millis,
    value: 100_000,
    precision: Precision {
        full: decimals(5, 5),
        short: decimals(3, 2),
    },
};

pub const MICROBITCOIN: Denomination = Denomination {
    name: "uBTC (1,000,000 uBTC = 1BTC)",
    short_name: "uBTC",
    code: "uBTC",
    accessor: UBTC,
    kind: UnitKind::Micros,
    value: 100,
    precision: Precision {
        full: decimals(4, 4),
        short: decimals(2, 1),
    },
};

pub const BIT: Denomination = Denomination {
    name: "bits (1,000,000 bits = 1BTC)",
    short_name: "bits",
    code: "bit",
    accessor: BITS,
    kind: UnitKind::Bits,
    value: 100,
    precision: Precision {
        full: decimals(2, 2),
        short: decimals(0, 0),
    },
};

pub const SATOSHI: Denomination = Denomination {
    name: "satoshi (100,000,000 satoshi = 1BTC)",
    short_name: "sats",
    code: "satoshi",
    accessor: SATOSHIS,
    kind: UnitKind::Atomic,
    value: 1,
    precision: Precision {
        full: decimals(0, 0),
        short: decimals(0, 0),
    },
};

/// Total bitcoin supply cap, in satoshis.
pub const MAX_SATOSHIS: i64 = 2_100_000_000_000_000;

/// Bitcoin denominations, largest first.
pub const UNITS: &[Denomination] = &[BITCOIN, MILLIBITCOIN, MICROBITCOIN, BIT, SATOSHI];

/// An amount of bitcoin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BtcUnit(Unit);

impl BtcUnit {
    /// Build from an amount in the unit named by `code` (a code such as
    /// `"satoshi"` or an accessor such as `"satoshis"`).
    pub fn new(amount: f64, code: &str) -> Result<Self, BtcError> {
        Ok(Self(Unit::new(UNITS, amount, code)?))
    }

    pub fn from_btc(amount: f64) -> Result<Self, BtcError> {
        Self::new(amount, BTC)
    }

    /// Alias of [`BtcUnit::from_btc`].
    pub fn from_standard_unit(amount: f64) -> Result<Self, BtcError> {
        Self::from_btc(amount)
    }

    pub fn from_millis(amount: f64) -> Result<Self, BtcError> {
        Self::new(amount, MBTC)
    }

    pub fn from_micro(amount: f64) -> Result<Self, BtcError> {
        Self::new(amount, UBTC)
    }

    pub fn from_bits(amount: f64) -> Result<Self, BtcError> {
        Self::new(amount, BITS)
    }

    /// Conversions through [`BtcUnit::to`] and back are exact for
    /// `|amount| <= MAX_SATOSHIS`; beyond that the `f64` in between can be
    /// off by a satoshi.
    pub fn from_satoshis(amount: i64) -> Self {
        Self(Unit::from_atomic(UNITS, amount))
    }

    /// Alias of [`BtcUnit::from_satoshis`].
    pub fn from_atomic_unit(amount: i64) -> Self {
        Self::from_satoshis(amount)
    }

    /// Build from a fiat amount and an exchange rate in fiat per BTC.
    pub fn from_fiat(amount: f64, rate: f64) -> Result<Self, BtcError> {
        Ok(Self(Unit::from_fiat(UNITS, amount, rate)?))
    }

    /// Build from a JSON object with `amount` and `code` keys.
    pub fn from_object(value: &serde_json::Value) -> Result<Self, BtcError> {
        Ok(Self(Unit::from_object(UNITS, value)?))
    }

    pub fn from_json(json: &str) -> Result<Self, BtcError> {
        let value: serde_json::Value = serde_json::from_str(json).map_err(|e| {
            network_core::NetworkError::InvalidArgument(format!("invalid unit JSON: {e}"))
        })?;
        Self::from_object(&value)
    }

    /// The amount in the unit named by `code`.
    pub fn to(&self, code: &str) -> Result<f64, BtcError> {
        Ok(self.0.to(code)?)
    }

    /// Same as [`BtcUnit::to`], looked up by accessor name ("BTC", "bits", "satoshis").
    pub fn accessor(&self, name: &str) -> Result<f64, BtcError> {
        self.to(name)
    }

    pub fn to_btc(&self) -> f64 {
        self.0.to_denomination(&BITCOIN)
    }

    pub fn to_millis(&self) -> f64 {
        self.0.to_denomination(&MILLIBITCOIN)
    }

    pub fn to_micro(&self) -> f64 {
        self.0.to_denomination(&MICROBITCOIN)
    }

    pub fn to_bits(&self) -> f64 {
        self.0.to_denomination(&BIT)
    }

    pub fn to_satoshis(&self) -> i64 {
        self.0.atomic()
    }

    pub fn btc(&self) -> f64 {
        self.to_btc()
    }

    pub fn m_btc(&self) -> f64 {
        self.to_millis()
    }

    pub fn u_btc(&self) -> f64 {
        self.to_micro()
    }

    pub fn bits(&self) -> f64 {
        self.to_bits()
    }

    pub fn satoshis(&self) -> i64 {
        self.to_satoshis()
    }

    /// Fiat value at `rate` (fiat per BTC), rounded to 2 decimals.
    pub fn to_fiat(&self, rate: f64) -> Result<f64, BtcError> {
        Ok(self.0.to_fiat(rate)?)
    }

    pub fn to_object(&self) -> UnitObject {
        UnitObject {
            amount: self.to_btc(),
            code: BTC.to_string(),
        }
    }

    pub fn format(&self, code: &str, kind: PrecisionKind) -> Result<String, BtcError> {
        Ok(self.0.format(code, kind)?)
    }

    pub fn inner(&self) -> &Unit {
        &self.0
    }
}

impl From<BtcUnit> for Unit {
    fn from(unit: BtcUnit) -> Self {
        unit.0
    }
}

impl std::fmt::Display for BtcUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for BtcUnit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_object().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BtcUnit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let obj = UnitObject::deserialize(deserializer)?;
        BtcUnit::new(obj.amount, &obj.code).map_err(serde::de::Error::custom)
    }
}
