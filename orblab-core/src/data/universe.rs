//! Universe configuration — the index and its tradable symbol list.
//!
//! Stored as a TOML file with the index ticker (used for bias
//! classification) and the fixed equity universe the ranker scans.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UniverseError {
    #[error("read universe file: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse universe TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// The index plus the fixed universe of symbols scanned each session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Universe {
    /// Index ticker whose opening range sets the session bias.
    pub index: String,
    pub symbols: Vec<String>,
}

impl Universe {
    /// Load a universe from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, UniverseError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_toml(&content)?)
    }

    /// Parse a universe from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize the universe to TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Default NIFTY 50 heavyweights universe (Yahoo tickers).
    pub fn default_nifty() -> Self {
        Self {
            index: "^NSEI".into(),
            symbols: vec![
                "RELIANCE.NS",
                "TCS.NS",
                "HDFCBANK.NS",
                "INFY.NS",
                "ICICIBANK.NS",
                "HINDUNILVR.NS",
                "ITC.NS",
                "SBIN.NS",
                "BHARTIARTL.NS",
                "KOTAKBANK.NS",
                "LT.NS",
                "AXISBANK.NS",
                "ASIANPAINT.NS",
                "MARUTI.NS",
                "SUNPHARMA.NS",
                "TITAN.NS",
                "ULTRACEMCO.NS",
                "BAJFINANCE.NS",
                "WIPRO.NS",
                "NTPC.NS",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}
