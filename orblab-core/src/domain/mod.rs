//! Domain types for OrbLab.

pub mod bar;
pub mod bias;
pub mod prediction;
pub mod stats;

pub use bar::Bar;
pub use bias::SessionBias;
pub use prediction::{Outcome, OutcomeKind, Prediction, TradeAction};
pub use stats::SymbolStats;
