//! Signal pipeline — bias classification, momentum ranking, symbol
//! filtering, and breakout detection.
//!
//! Per-symbol failures never abort a pass: every symbol either yields
//! data or a `SymbolSkip` with an explicit reason, collected into the
//! run report so skips are observable and countable.

pub mod bias;
pub mod detector;
pub mod filter;
pub mod movers;
pub mod opening_range;
pub mod vwap;

pub use bias::classify_bias;
pub use detector::{detect_signal, suggested_qty, Detection, SizingConfig};
pub use filter::{filter_candidates, MIN_TRADES_FOR_FILTER, MIN_WIN_RATE};
pub use movers::{rank_movers, MoverScan, MoverSet};
pub use opening_range::{opening_range, OpeningRange};
pub use vwap::running_vwap;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a symbol produced no prediction at some pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Upstream provider error; the message is kept for the report.
    FetchFailed(String),
    /// Provider returned no bars for the session.
    NoData,
    /// Non-positive average volume in the ranking pass.
    Illiquid,
    /// No bars inside the opening-range window — no tradable reference.
    NoOpeningRange,
    /// No bar in the entry window satisfied the breakout condition.
    NoBreakout,
    /// Enough history and a win rate below the cutoff.
    LowWinRate { trades: u32, win_rate: f64 },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::FetchFailed(msg) => write!(f, "fetch failed: {msg}"),
            SkipReason::NoData => f.write_str("no intraday data"),
            SkipReason::Illiquid => f.write_str("non-positive average volume"),
            SkipReason::NoOpeningRange => f.write_str("no bars in opening range"),
            SkipReason::NoBreakout => f.write_str("no breakout in entry window"),
            SkipReason::LowWinRate { trades, win_rate } => {
                write!(f, "win rate {win_rate:.2} over {trades} trades below cutoff")
            }
        }
    }
}

/// One skipped symbol with the stage that dropped it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolSkip {
    pub symbol: String,
    pub stage: PipelineStage,
    pub reason: SkipReason,
}

/// Pipeline stage that produced a skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Ranking,
    Filtering,
    Detection,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStage::Ranking => f.write_str("ranking"),
            PipelineStage::Filtering => f.write_str("filtering"),
            PipelineStage::Detection => f.write_str("detection"),
        }
    }
}
