//! In-memory store, used by tests and dry runs.

use super::{PredictionRecord, SignalStore, StoreError};
use crate::domain::{Outcome, Prediction, SymbolStats};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Inner {
    next_id: i64,
    predictions: Vec<(i64, Prediction)>,
    outcomes: Vec<Outcome>,
    stats: HashMap<String, SymbolStats>,
}

/// Non-durable [`SignalStore`] with the same append-only and
/// full-recompute semantics as the SQLite backend.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn inner(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Other("store mutex poisoned".into()))
    }
}

impl SignalStore for MemoryStore {
    fn insert_prediction(&self, pred: &Prediction) -> Result<i64, StoreError> {
        let mut inner = self.inner()?;
        inner.next_id += 1;
        let id = inner.next_id;
        inner.predictions.push((id, pred.clone()));
        Ok(id)
    }

    fn insert_outcome(&self, outcome: &Outcome) -> Result<(), StoreError> {
        self.inner()?.outcomes.push(outcome.clone());
        Ok(())
    }

    fn symbol_stats(&self) -> Result<HashMap<String, SymbolStats>, StoreError> {
        Ok(self.inner()?.stats.clone())
    }

    fn update_symbol_stats(&self) -> Result<(), StoreError> {
        let mut inner = self.inner()?;

        let mut stats: HashMap<String, SymbolStats> = HashMap::new();
        for outcome in &inner.outcomes {
            let symbol = match inner
                .predictions
                .iter()
                .find(|(id, _)| *id == outcome.prediction_id)
            {
                Some((_, pred)) => pred.symbol.clone(),
                None => continue,
            };
            let entry = stats.entry(symbol.clone()).or_insert_with(|| SymbolStats {
                symbol,
                trades: 0,
                wins: 0,
                losses: 0,
            });
            entry.trades += 1;
            if outcome.pnl > 0.0 {
                entry.wins += 1;
            } else {
                entry.losses += 1;
            }
        }

        inner.stats = stats;
        Ok(())
    }

    fn predictions_for_date(&self, date: NaiveDate) -> Result<Vec<PredictionRecord>, StoreError> {
        let inner = self.inner()?;

        let mut records: Vec<PredictionRecord> = inner
            .predictions
            .iter()
            .filter(|(_, p)| p.trade_date == date)
            .map(|(id, p)| PredictionRecord {
                id: *id,
                prediction: p.clone(),
                outcome: inner
                    .outcomes
                    .iter()
                    .find(|o| o.prediction_id == *id)
                    .cloned(),
            })
            .collect();

        records.sort_by(|a, b| {
            (a.prediction.symbol.as_str(), a.prediction.signal_time)
                .cmp(&(b.prediction.symbol.as_str(), b.prediction.signal_time))
        });
        Ok(records)
    }
}
