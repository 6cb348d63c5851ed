//! Momentum ranker — top intraday gainers and losers.
//!
//! Scores each universe symbol by session percentage move at a coarse
//! interval. Symbols with no data, fetch failures, or non-positive
//! average volume are recorded as skips, never fatal to the ranking.

use super::{PipelineStage, SkipReason, SymbolSkip};
use crate::data::{BarProvider, Interval};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Ranked movers for one session: gainers best-first, losers worst-first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoverSet {
    pub gainers: Vec<String>,
    pub losers: Vec<String>,
}

/// Ranking result plus the symbols that dropped out, with reasons.
#[derive(Debug, Clone, Default)]
pub struct MoverScan {
    pub movers: MoverSet,
    pub skips: Vec<SymbolSkip>,
}

/// Rank the universe by intraday percentage move.
///
/// `pct_change = (last_close - first_open) / first_open * 100` over the
/// session at the given interval. Top `n` by descending pct_change are
/// gainers; the bottom `n`, reported ascending (worst first), are
/// losers. With fewer than `2n` scored symbols the lists may overlap.
pub fn rank_movers(
    provider: &dyn BarProvider,
    symbols: &[String],
    date: NaiveDate,
    interval: Interval,
    n: usize,
) -> MoverScan {
    let mut scored: Vec<(String, f64)> = Vec::with_capacity(symbols.len());
    let mut skips = Vec::new();
    let mut skip = |symbol: &str, reason: SkipReason| {
        skips.push(SymbolSkip {
            symbol: symbol.to_string(),
            stage: PipelineStage::Ranking,
            reason,
        });
    };

    for symbol in symbols {
        let bars = match provider.intraday_bars(symbol, date, interval) {
            Ok(bars) => bars,
            Err(e) => {
                skip(symbol, SkipReason::FetchFailed(e.to_string()));
                continue;
            }
        };

        let (first, last) = match (bars.first(), bars.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => {
                skip(symbol, SkipReason::NoData);
                continue;
            }
        };

        let avg_volume =
            bars.iter().map(|b| b.volume as f64).sum::<f64>() / bars.len() as f64;
        if avg_volume <= 0.0 {
            skip(symbol, SkipReason::Illiquid);
            continue;
        }

        let pct_change = (last.close - first.open) / first.open * 100.0;
        scored.push((symbol.clone(), pct_change));
    }

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let gainers: Vec<String> = scored.iter().take(n).map(|(s, _)| s.clone()).collect();
    let losers: Vec<String> = scored
        .iter()
        .rev()
        .take(n)
        .map(|(s, _)| s.clone())
        .collect();

    MoverScan {
        movers: MoverSet { gainers, losers },
        skips,
    }
}
