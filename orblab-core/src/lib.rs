//! OrbLab Core — intraday opening-range breakout signals and outcome
//! simulation.
//!
//! This crate contains the pipeline's building blocks:
//! - Domain types (bars, predictions, outcomes, per-symbol stats)
//! - Session clock for exchange hours, opening range, and entry window
//! - Data providers (Yahoo chart API, deterministic synthetic) behind a trait
//! - Signal pipeline: bias classifier, momentum ranker, symbol filter,
//!   breakout detector with VWAP confirmation and position sizing
//! - First-touch-wins outcome simulator
//! - Signal stores (SQLite, in-memory) behind a trait

pub mod data;
pub mod domain;
pub mod session;
pub mod signal;
pub mod sim;
pub mod store;
