use serde::{Deserialize, Serialize};

use crate::error::NetworkError;

/// Role of a denomination within its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Standard,
    Millis,
    Micros,
    Bits,
    Atomic,
}

/// Decimal places shown for a denomination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DecimalRange {
    pub max_decimals: u8,
    pub min_decimals: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Precision {
    pub full: DecimalRange,
    pub short: DecimalRange,
}

/// Which precision range [`Unit::format`] renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecisionKind {
    Full,
    Short,
}

/// One row of a denomination table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Denomination {
    pub name: &'static str,
    pub short_name: &'static str,
    pub code: &'static str,
    pub accessor: &'static str,
    pub kind: UnitKind,
    /// Atomic units per one of this denomination.
    pub value: u64,
    pub precision: Precision,
}

impl Denomination {
    fn range(&self, kind: PrecisionKind) -> DecimalRange {
        match kind {
            PrecisionKind::Full => self.precision.full,
            PrecisionKind::Short => self.precision.short,
        }
    }
}

/// Find a denomination by its code or its accessor name.
pub fn find_denomination(
    table: &'static [Denomination],
    code: &str,
) -> Result<&'static Denomination, NetworkError> {
    table
        .iter()
        .find(|d| d.code == code || d.accessor == code)
        .ok_or_else(|| NetworkError::UnknownUnit(code.to_string()))
}

/// The first denomination of a given kind, e.g. the standard or atomic unit.
pub fn denomination_of_kind(
    table: &'static [Denomination],
    kind: UnitKind,
) -> Result<&'static Denomination, NetworkError> {
    table
        .iter()
        .find(|d| d.kind == kind)
        .ok_or_else(|| NetworkError::UnknownUnit(format!("{kind:?}").to_lowercase()))
}

/// Round to `decimals` places the way a fixed-point rendering would.
fn round_to(value: f64, decimals: u8) -> f64 {
    format!("{value:.prec$}", prec = usize::from(decimals))
        .parse()
        .unwrap_or(value)
}

/// Serialized form of a [`Unit`]: an amount and the code it is expressed in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitObject {
    pub amount: f64,
    pub code: String,
}

/// An amount of a currency, held in atomic units and bound to the
/// denomination table it converts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unit {
    atomic: i64,
    table: &'static [Denomination],
}

impl Unit {
    /// Build from an amount expressed in the denomination named `code`.
    pub fn new(table: &'static [Denomination], amount: f64, code: &str) -> Result<Self, NetworkError> {
        let denomination = find_denomination(table, code)?;
        Self::from_scaled(table, amount, denomination.value)
    }

    /// Build from an atomic amount directly.
    pub fn from_atomic(table: &'static [Denomination], atomic: i64) -> Self {
        Self { atomic, table }
    }

    /// Build from a fiat amount and a rate in fiat per standard unit.
    pub fn from_fiat(table: &'static [Denomination], amount: f64, rate: f64) -> Result<Self, NetworkError> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(NetworkError::InvalidRate(rate));
        }
        let standard = denomination_of_kind(table, UnitKind::Standard)?;
        Self::from_scaled(table, amount / rate, standard.value)
    }

    /// Build from a JSON object `{amount, code}`.
    pub fn from_object(
        table: &'static [Denomination],
        value: &serde_json::Value,
    ) -> Result<Self, NetworkError> {
        if !value.is_object() {
            return Err(NetworkError::InvalidArgument(
                "Argument is expected to be an object".into(),
            ));
        }
        let obj: UnitObject = serde_json::from_value(value.clone())
            .map_err(|e| NetworkError::InvalidArgument(format!("malformed unit object: {e}")))?;
        Self::new(table, obj.amount, &obj.code)
    }

    fn from_scaled(table: &'static [Denomination], amount: f64, scale: u64) -> Result<Self, NetworkError> {
        if !amount.is_finite() {
            return Err(NetworkError::InvalidAmount(amount.to_string()));
        }
        let atomic = (amount * scale as f64).round();
        if atomic.abs() >= i64::MAX as f64 {
            return Err(NetworkError::InvalidAmount(amount.to_string()));
        }
        Ok(Self {
            atomic: atomic as i64,
            table,
        })
    }

    pub fn atomic(&self) -> i64 {
        self.atomic
    }

    pub fn table(&self) -> &'static [Denomination] {
        self.table
    }

    /// The amount expressed in `code`, rounded to that denomination's full
    /// precision.
    pub fn to(&self, code: &str) -> Result<f64, NetworkError> {
        let denomination = find_denomination(self.table, code)?;
        Ok(self.to_denomination(denomination))
    }

    pub fn to_denomination(&self, denomination: &Denomination) -> f64 {
        let value = self.atomic as f64 / denomination.value as f64;
        round_to(value, denomination.precision.full.max_decimals)
    }

    /// Fiat value at `rate` (fiat per standard unit), rounded to cents.
    pub fn to_fiat(&self, rate: f64) -> Result<f64, NetworkError> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(NetworkError::InvalidRate(rate));
        }
        Ok(round_to(self.standard_amount()? * rate, 2))
    }

    /// `{amount, code}` in the standard denomination.
    pub fn to_object(&self) -> Result<UnitObject, NetworkError> {
        let standard = denomination_of_kind(self.table, UnitKind::Standard)?;
        Ok(UnitObject {
            amount: self.to_denomination(standard),
            code: standard.accessor.to_string(),
        })
    }

    /// Render in `code` with between min and max decimals of the chosen
    /// precision; zeros beyond the minimum are trimmed.
    pub fn format(&self, code: &str, kind: PrecisionKind) -> Result<String, NetworkError> {
        let denomination = find_denomination(self.table, code)?;
        let range = denomination.range(kind);
        let value = self.atomic as f64 / denomination.value as f64;
        let mut out = format!("{value:.prec$}", prec = usize::from(range.max_decimals));

        if let Some(dot) = out.find('.') {
            let keep = dot + 1 + usize::from(range.min_decimals);
            while out.len() > keep && out.ends_with('0') {
                out.pop();
            }
            if out.ends_with('.') {
                out.pop();
            }
        }
        Ok(out)
    }

    fn standard_amount(&self) -> Result<f64, NetworkError> {
        let standard = denomination_of_kind(self.table, UnitKind::Standard)?;
        Ok(self.to_denomination(standard))
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let atomic = self
            .table
            .iter()
            .find(|d| d.kind == UnitKind::Atomic)
            .map_or("atomic", |d| d.accessor);
        write!(f, "{} {}", self.atomic, atomic)
    }
}
