//! SymbolStats — rolling per-symbol trade statistics.

use serde::{Deserialize, Serialize};

/// Cumulative trade statistics for one symbol across all sessions.
///
/// Read once per run by the symbol filter, recomputed in full after
/// each run's simulations. A `NoTrade` outcome counts as a trade with
/// zero pnl, i.e. a loss, in the aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolStats {
    pub symbol: String,
    pub trades: u32,
    pub wins: u32,
    pub losses: u32,
}

impl SymbolStats {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            trades: 0,
            wins: 0,
            losses: 0,
        }
    }

    /// Fraction of trades that were winners; 0.0 with no history.
    pub fn win_rate(&self) -> f64 {
        if self.trades == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.trades)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win_rate_zero_without_history() {
        assert_eq!(SymbolStats::new("RELIANCE.NS").win_rate(), 0.0);
    }

    #[test]
    fn win_rate_is_wins_over_trades() {
        let stats = SymbolStats {
            symbol: "TCS.NS".into(),
            trades: 10,
            wins: 4,
            losses: 6,
        };
        assert!((stats.win_rate() - 0.4).abs() < 1e-12);
    }
}
