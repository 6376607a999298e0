use tracing::debug;

use crate::error::NetworkError;
use crate::params::{IndexKey, Lookup, NetworkParams};

/// Network records of any number of currencies, kept in registration order.
///
/// Lookups are always scoped to one currency, so records of different
/// currencies may share names and aliases.
#[derive(Debug, Clone, Default)]
pub struct NetworkRegistry {
    networks: Vec<NetworkParams>,
}

impl NetworkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register records. Fails without registering anything if a record with
    /// the same currency and name is already present or repeated in `records`.
    pub fn add(&mut self, records: &[NetworkParams]) -> Result<(), NetworkError> {
        for (i, record) in records.iter().enumerate() {
            let repeated = records[..i]
                .iter()
                .any(|r| r.currency == record.currency && r.name == record.name);
            if repeated || self.find_by_name(record.currency, record.name).is_some() {
                return Err(NetworkError::DuplicateNetwork {
                    currency: record.currency.to_string(),
                    name: record.name.to_string(),
                });
            }
        }

        for record in records {
            debug!(
                currency = record.currency,
                name = record.name,
                magic = %record.magic_hex(),
                "registered network"
            );
            self.networks.push(*record);
        }
        Ok(())
    }

    /// Remove a record; returns it if it was registered.
    pub fn remove(&mut self, currency: &str, name: &str) -> Option<NetworkParams> {
        let pos = self
            .networks
            .iter()
            .position(|n| n.currency == currency && n.name == name)?;
        debug!(currency, name, "removed network");
        Some(self.networks.remove(pos))
    }

    /// First record of `currency` whose indexed fields match `value`.
    ///
    /// With `keys`, only those fields are compared, regardless of the
    /// record's own index set.
    pub fn get<'a>(
        &self,
        value: impl Into<Lookup<'a>>,
        keys: Option<&[IndexKey]>,
        currency: &str,
    ) -> Option<&NetworkParams> {
        let value = value.into();
        self.networks
            .iter()
            .filter(|n| n.currency == currency)
            .find(|n| {
                let fields = keys.unwrap_or(n.index_by);
                fields.iter().any(|&key| n.matches(key, value))
            })
    }

    /// All records of a currency, in registration order.
    pub fn filtered<'s>(&'s self, currency: &'s str) -> impl Iterator<Item = &'s NetworkParams> + 's {
        self.networks.iter().filter(move |n| n.currency == currency)
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }

    fn find_by_name(&self, currency: &str, name: &str) -> Option<&NetworkParams> {
        self.networks
            .iter()
            .find(|n| n.currency == currency && n.name == name)
    }
}

/// Collects records without the duplicate check of [`NetworkRegistry::add`];
/// a repeated (currency, name) pair is shadowed by the earlier record.
impl FromIterator<NetworkParams> for NetworkRegistry {
    fn from_iter<I: IntoIterator<Item = NetworkParams>>(iter: I) -> Self {
        Self {
            networks: iter.into_iter().collect(),
        }
    }
}
