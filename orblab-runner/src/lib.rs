//! OrbLab Runner — daily run orchestration on top of `orblab-core`.
//!
//! This crate provides:
//! - TOML run configuration with per-section defaults
//! - The single-date pipeline driver (`run_for_date`)
//! - CSV/JSON export of stored predictions and outcomes

pub mod config;
pub mod export;
pub mod runner;

pub use config::{ConfigError, DataConfig, RunConfig, RunSettings, StoreConfig, UniverseConfig};
pub use export::{save_artifacts, write_csv, write_json, ArtifactPaths};
pub use runner::{run_for_date, RunError, RunReport};
