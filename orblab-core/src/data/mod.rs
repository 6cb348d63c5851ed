//! Data providers and universe configuration.

pub mod provider;
pub mod synthetic;
pub mod universe;
pub mod yahoo;

pub use provider::{BarProvider, DataError, Interval};
pub use synthetic::SyntheticProvider;
pub use universe::{Universe, UniverseError};
pub use yahoo::YahooProvider;
