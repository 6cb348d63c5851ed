//! Bar provider trait and structured error types.
//!
//! The BarProvider trait abstracts over intraday data sources (Yahoo
//! Finance, synthetic data) so we can swap implementations and mock
//! for tests.

use crate::domain::Bar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Intraday bar sampling interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1m")]
    M1,
    #[serde(rename = "5m")]
    M5,
    #[serde(rename = "15m")]
    M15,
}

impl Interval {
    pub fn minutes(self) -> u32 {
        match self {
            Interval::M1 => 1,
            Interval::M5 => 5,
            Interval::M15 => 15,
        }
    }

    /// Wire name used by the Yahoo chart API.
    pub fn as_yahoo(self) -> &'static str {
        match self {
            Interval::M1 => "1m",
            Interval::M5 => "5m",
            Interval::M15 => "15m",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_yahoo())
    }
}

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("data error: {0}")]
    Other(String),
}

/// Trait for intraday bar providers.
///
/// Implementations return bars already confined to session hours, in
/// session-local time, ordered by strictly increasing timestamp. An
/// empty vector means "no data for that symbol/date" and is never an
/// error; errors are reserved for upstream failures.
pub trait BarProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch intraday OHLCV bars for one symbol on one session date.
    fn intraday_bars(
        &self,
        symbol: &str,
        date: NaiveDate,
        interval: Interval,
    ) -> Result<Vec<Bar>, DataError>;

    /// Closing price of the most recent session before `date`, if any.
    fn prev_close(&self, symbol: &str, date: NaiveDate) -> Result<Option<f64>, DataError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_wire_names() {
        assert_eq!(Interval::M1.as_yahoo(), "1m");
        assert_eq!(Interval::M5.as_yahoo(), "5m");
        assert_eq!(Interval::M15.as_yahoo(), "15m");
        assert_eq!(Interval::M15.minutes(), 15);
    }

    #[test]
    fn interval_serde_uses_wire_names() {
        let json = serde_json::to_string(&Interval::M5).unwrap();
        assert_eq!(json, "\"5m\"");
        let parsed: Interval = serde_json::from_str("\"15m\"").unwrap();
        assert_eq!(parsed, Interval::M15);
    }
}
