//! Persistence — durable storage of predictions, outcomes, and
//! per-symbol rolling statistics.
//!
//! The SignalStore trait abstracts over backends (SQLite, in-memory)
//! so the orchestrator and tests can swap them. Inserts are
//! append-only: re-running a date stores new rows, deduplication is a
//! caller concern.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::domain::{Outcome, Prediction, SymbolStats};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Structured error types for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("corrupt stored row: {0}")]
    Corrupt(String),

    #[error("store error: {0}")]
    Other(String),
}

/// One stored prediction with its outcome, as read back for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: i64,
    pub prediction: Prediction,
    pub outcome: Option<Outcome>,
}

/// Durable store for the pipeline's results.
///
/// `update_symbol_stats` is a full recompute over every stored
/// prediction/outcome pair, not an incremental update: a NoTrade
/// outcome (pnl 0) counts as a losing trade in the aggregate.
pub trait SignalStore: Send + Sync {
    /// Insert a prediction, returning its new row id. Always appends.
    fn insert_prediction(&self, pred: &Prediction) -> Result<i64, StoreError>;

    /// Insert the outcome for a previously inserted prediction.
    fn insert_outcome(&self, outcome: &Outcome) -> Result<(), StoreError>;

    /// Read the rolling per-symbol statistics.
    fn symbol_stats(&self) -> Result<HashMap<String, SymbolStats>, StoreError>;

    /// Recompute and persist per-symbol trades/wins/losses from all
    /// stored predictions and outcomes.
    fn update_symbol_stats(&self) -> Result<(), StoreError>;

    /// All predictions for a session date with their outcomes, ordered
    /// by symbol then signal time.
    fn predictions_for_date(&self, date: NaiveDate) -> Result<Vec<PredictionRecord>, StoreError>;
}
