//! Currency-agnostic network parameters, unit conversion and payment URIs.
//!
//! A currency crate supplies its own tables (network records, denominations)
//! and binds them to the generic [`registry::NetworkRegistry`], [`unit::Unit`]
//! and [`uri::Uri`] types defined here.

pub mod bip44;
pub mod error;
pub mod params;
pub mod registry;
pub mod unit;
pub mod uri;

pub use error::NetworkError;
pub use params::{IndexKey, Lookup, NetworkParams};
pub use registry::NetworkRegistry;
pub use unit::{Denomination, Unit};
pub use uri::{Uri, UriContext};
