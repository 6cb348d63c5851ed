//! Serializable run configuration.
//!
//! Loaded from a TOML file; every section and field has a default, so
//! an empty file yields a complete working config:
//!
//! ```toml
//! [run]
//! capital = 100000.0
//! risk_fraction = 0.01
//! top_n = 5
//!
//! [session]
//! open = "09:15:00"
//!
//! [data]
//! bias_interval = "5m"
//! mover_interval = "15m"
//! signal_interval = "5m"
//! timezone = "Asia/Kolkata"
//!
//! [store]
//! db_path = "orblab.sqlite"
//!
//! [universe]
//! path = "universe.toml"
//! ```

use orblab_core::data::{Interval, Universe, UniverseError};
use orblab_core::session::SessionClock;
use orblab_core::signal::SizingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("load universe: {0}")]
    Universe(#[from] UniverseError),
}

/// Complete configuration for one daily run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RunConfig {
    pub run: RunSettings,
    pub session: SessionClock,
    pub data: DataConfig,
    pub store: StoreConfig,
    pub universe: UniverseConfig,
}

/// Capital, per-trade risk, and ranking depth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    pub capital: f64,
    pub risk_fraction: f64,
    /// Gainers/losers kept per side of the mover ranking.
    pub top_n: usize,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            capital: 100_000.0,
            risk_fraction: 0.01,
            top_n: 5,
        }
    }
}

impl RunSettings {
    pub fn sizing(&self) -> SizingConfig {
        SizingConfig {
            capital: self.capital,
            risk_fraction: self.risk_fraction,
        }
    }
}

/// Bar intervals per pipeline stage and the exchange timezone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Interval for the index bars feeding the bias classifier.
    pub bias_interval: Interval,
    /// Coarse interval for the full-universe mover scan.
    pub mover_interval: Interval,
    /// Interval for per-candidate detection and simulation.
    pub signal_interval: Interval,
    /// IANA timezone name of the exchange, e.g. `Asia/Kolkata`.
    pub timezone: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            bias_interval: Interval::M5,
            mover_interval: Interval::M15,
            signal_interval: Interval::M5,
            timezone: "Asia/Kolkata".into(),
        }
    }
}

/// Where results are persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub db_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("orblab.sqlite"),
        }
    }
}

/// Universe source: a TOML file, an inline list, or the built-in NSE
/// default when neither is given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UniverseConfig {
    pub path: Option<PathBuf>,
    pub index: Option<String>,
    pub symbols: Option<Vec<String>>,
}

impl UniverseConfig {
    /// Resolve to a concrete universe. A file path wins over inline
    /// fields; inline fields fall back to the NSE default per field.
    pub fn resolve(&self) -> Result<Universe, UniverseError> {
        if let Some(path) = &self.path {
            return Universe::from_file(path);
        }
        let default = Universe::default_nifty();
        Ok(Universe {
            index: self.index.clone().unwrap_or(default.index),
            symbols: self.symbols.clone().unwrap_or(default.symbols),
        })
    }
}

impl RunConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_toml(&content)?)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg = RunConfig::from_toml("").unwrap();
        assert_eq!(cfg.run.capital, 100_000.0);
        assert_eq!(cfg.run.risk_fraction, 0.01);
        assert_eq!(cfg.run.top_n, 5);
        assert_eq!(cfg.data.mover_interval, Interval::M15);
        assert_eq!(cfg.data.timezone, "Asia/Kolkata");
        assert_eq!(cfg.store.db_path, PathBuf::from("orblab.sqlite"));
        assert_eq!(cfg.session, SessionClock::default());
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let cfg = RunConfig::from_toml(
            r#"
            [run]
            top_n = 3

            [session]
            entry_end = "14:00:00"

            [data]
            signal_interval = "1m"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.run.top_n, 3);
        assert_eq!(cfg.run.capital, 100_000.0);
        assert_eq!(cfg.session.entry_end, NaiveTime::from_hms_opt(14, 0, 0).unwrap());
        assert_eq!(cfg.session.open, NaiveTime::from_hms_opt(9, 15, 0).unwrap());
        assert_eq!(cfg.data.signal_interval, Interval::M1);
        assert_eq!(cfg.data.bias_interval, Interval::M5);
    }

    #[test]
    fn inline_universe_resolves() {
        let cfg = RunConfig::from_toml(
            r#"
            [universe]
            index = "^GSPC"
            symbols = ["AAPL", "MSFT"]
            "#,
        )
        .unwrap();
        let u = cfg.universe.resolve().unwrap();
        assert_eq!(u.index, "^GSPC");
        assert_eq!(u.symbols, vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn missing_universe_falls_back_to_default() {
        let cfg = RunConfig::default();
        let u = cfg.universe.resolve().unwrap();
        assert_eq!(u.index, "^NSEI");
        assert!(!u.is_empty());
    }

    #[test]
    fn universe_file_wins_over_inline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("universe.toml");
        std::fs::write(&path, "index = \"^NSEBANK\"\nsymbols = [\"SBIN.NS\"]\n").unwrap();

        let cfg = RunConfig {
            universe: UniverseConfig {
                path: Some(path),
                index: Some("^NSEI".into()),
                symbols: None,
            },
            ..RunConfig::default()
        };
        let u = cfg.universe.resolve().unwrap();
        assert_eq!(u.index, "^NSEBANK");
        assert_eq!(u.symbols, vec!["SBIN.NS"]);
    }

    #[test]
    fn sizing_mirrors_run_settings() {
        let settings = RunSettings {
            capital: 50_000.0,
            risk_fraction: 0.02,
            top_n: 5,
        };
        let sizing = settings.sizing();
        assert_eq!(sizing.capital, 50_000.0);
        assert_eq!(sizing.risk_fraction, 0.02);
    }
}
