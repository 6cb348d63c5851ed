//! Symbol filter — suppress historically poor performers.
//!
//! A symbol passes with fewer than 10 recorded trades (insufficient
//! history gets the benefit of the doubt) or with a win rate at or
//! above 0.4.

use super::{PipelineStage, SkipReason, SymbolSkip};
use crate::domain::SymbolStats;
use std::collections::HashMap;

/// Trades required before the win-rate cutoff applies.
pub const MIN_TRADES_FOR_FILTER: u32 = 10;
/// Win-rate cutoff, boundary inclusive.
pub const MIN_WIN_RATE: f64 = 0.4;

/// Split candidates into passers and skip records.
pub fn filter_candidates(
    candidates: &[String],
    stats: &HashMap<String, SymbolStats>,
) -> (Vec<String>, Vec<SymbolSkip>) {
    let mut passed = Vec::with_capacity(candidates.len());
    let mut skips = Vec::new();

    for symbol in candidates {
        match stats.get(symbol) {
            Some(s) if s.trades >= MIN_TRADES_FOR_FILTER && s.win_rate() < MIN_WIN_RATE => {
                skips.push(SymbolSkip {
                    symbol: symbol.clone(),
                    stage: PipelineStage::Filtering,
                    reason: SkipReason::LowWinRate {
                        trades: s.trades,
                        win_rate: s.win_rate(),
                    },
                });
            }
            _ => passed.push(symbol.clone()),
        }
    }

    (passed, skips)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats_map(entries: &[(&str, u32, u32)]) -> HashMap<String, SymbolStats> {
        entries
            .iter()
            .map(|&(sym, trades, wins)| {
                (
                    sym.to_string(),
                    SymbolStats {
                        symbol: sym.to_string(),
                        trades,
                        wins,
                        losses: trades - wins,
                    },
                )
            })
            .collect()
    }

    fn candidates(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn insufficient_history_always_passes() {
        // 9 trades, 0 wins: exempt regardless of win rate
        let stats = stats_map(&[("A", 9, 0)]);
        let (passed, skips) = filter_candidates(&candidates(&["A"]), &stats);
        assert_eq!(passed, vec!["A"]);
        assert!(skips.is_empty());
    }

    #[test]
    fn low_win_rate_excluded_at_ten_trades() {
        // 10 trades, 3 wins → 0.3 < 0.4
        let stats = stats_map(&[("A", 10, 3)]);
        let (passed, skips) = filter_candidates(&candidates(&["A"]), &stats);
        assert!(passed.is_empty());
        assert_eq!(skips.len(), 1);
        assert_eq!(
            skips[0].reason,
            SkipReason::LowWinRate {
                trades: 10,
                win_rate: 0.3
            }
        );
    }

    #[test]
    fn boundary_win_rate_passes() {
        // 10 trades, 4 wins → exactly 0.4, inclusive
        let stats = stats_map(&[("A", 10, 4)]);
        let (passed, skips) = filter_candidates(&candidates(&["A"]), &stats);
        assert_eq!(passed, vec!["A"]);
        assert!(skips.is_empty());
    }

    #[test]
    fn unknown_symbols_pass() {
        let stats = stats_map(&[]);
        let (passed, skips) = filter_candidates(&candidates(&["NEW"]), &stats);
        assert_eq!(passed, vec!["NEW"]);
        assert!(skips.is_empty());
    }

    #[test]
    fn order_preserved() {
        let stats = stats_map(&[("B", 20, 2)]);
        let (passed, _) = filter_candidates(&candidates(&["C", "B", "A"]), &stats);
        assert_eq!(passed, vec!["C", "A"]);
    }
}
