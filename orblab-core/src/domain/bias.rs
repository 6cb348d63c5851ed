//! SessionBias — session-level directional classification.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Directional label for one trading session, derived from the index's
/// opening-range behavior relative to the prior close.
///
/// Consumed by the momentum ranker (gainers vs losers) and the signal
/// detector (BUY vs SELL condition branch). Sideways sessions produce
/// no candidates at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionBias {
    Bullish,
    Bearish,
    Sideways,
}

impl fmt::Display for SessionBias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionBias::Bullish => "Bullish",
            SessionBias::Bearish => "Bearish",
            SessionBias::Sideways => "Sideways",
        };
        f.write_str(s)
    }
}

impl FromStr for SessionBias {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Bullish" => Ok(SessionBias::Bullish),
            "Bearish" => Ok(SessionBias::Bearish),
            "Sideways" => Ok(SessionBias::Sideways),
            other => Err(format!("unknown session bias: {other}")),
        }
    }
}
