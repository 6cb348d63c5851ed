//! Daily run orchestration.
//!
//! One `run_for_date` call executes the whole pipeline for a session:
//! index bias, mover ranking, history filter, per-candidate breakout
//! detection, outcome simulation, and stats recompute. Per-symbol
//! failures become `SymbolSkip` entries in the report; only index-data
//! and store failures abort the run.

use crate::config::RunConfig;
use chrono::NaiveDate;
use orblab_core::data::{BarProvider, DataError, Universe};
use orblab_core::domain::SessionBias;
use orblab_core::signal::{
    classify_bias, detect_signal, filter_candidates, rank_movers, Detection, PipelineStage,
    SkipReason, SymbolSkip,
};
use orblab_core::sim::simulate_outcome;
use orblab_core::store::{PredictionRecord, SignalStore, StoreError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("index data for {symbol}: {source}")]
    IndexData {
        symbol: String,
        #[source]
        source: DataError,
    },
    #[error("store: {0}")]
    Store(#[from] StoreError),
}

/// Everything one daily run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub date: NaiveDate,
    pub bias: SessionBias,
    pub prediction_count: usize,
    pub predictions: Vec<PredictionRecord>,
    pub skips: Vec<SymbolSkip>,
}

/// Execute the pipeline for one session date.
///
/// Sequential by design: the store recompute at the end must see every
/// outcome of this run, and provider rate limits make per-symbol
/// parallelism counterproductive.
pub fn run_for_date(
    date: NaiveDate,
    provider: &dyn BarProvider,
    store: &dyn SignalStore,
    config: &RunConfig,
    universe: &Universe,
) -> Result<RunReport, RunError> {
    let clock = &config.session;

    // Session bias from the index's opening range. Index failures are
    // fatal: without a bias there is no run.
    let index_bars = provider
        .intraday_bars(&universe.index, date, config.data.bias_interval)
        .map_err(|source| RunError::IndexData {
            symbol: universe.index.clone(),
            source,
        })?;
    let prev_close = provider
        .prev_close(&universe.index, date)
        .map_err(|source| RunError::IndexData {
            symbol: universe.index.clone(),
            source,
        })?;
    let bias = classify_bias(&index_bars, prev_close, clock);

    let mut report = RunReport {
        date,
        bias,
        prediction_count: 0,
        predictions: Vec::new(),
        skips: Vec::new(),
    };

    if bias == SessionBias::Sideways {
        return Ok(report);
    }

    let scan = rank_movers(
        provider,
        &universe.symbols,
        date,
        config.data.mover_interval,
        config.run.top_n,
    );
    report.skips.extend(scan.skips);

    let candidates = match bias {
        SessionBias::Bullish => scan.movers.gainers,
        SessionBias::Bearish => scan.movers.losers,
        SessionBias::Sideways => unreachable!("sideways short-circuits above"),
    };

    let stats = store.symbol_stats()?;
    let (passed, filter_skips) = filter_candidates(&candidates, &stats);
    report.skips.extend(filter_skips);

    let sizing = config.run.sizing();
    for symbol in &passed {
        let bars = match provider.intraday_bars(symbol, date, config.data.signal_interval) {
            Ok(bars) => bars,
            Err(e) => {
                report.skips.push(SymbolSkip {
                    symbol: symbol.clone(),
                    stage: PipelineStage::Detection,
                    reason: SkipReason::FetchFailed(e.to_string()),
                });
                continue;
            }
        };

        let prediction = match detect_signal(symbol, date, &bars, bias, clock, &sizing) {
            Detection::Signal(p) => p,
            Detection::Skip(reason) => {
                report.skips.push(SymbolSkip {
                    symbol: symbol.clone(),
                    stage: PipelineStage::Detection,
                    reason,
                });
                continue;
            }
        };

        let id = store.insert_prediction(&prediction)?;
        // Same bars the detector saw, no second fetch.
        let outcome = simulate_outcome(&prediction, id, &bars);
        store.insert_outcome(&outcome)?;

        report.predictions.push(PredictionRecord {
            id,
            prediction,
            outcome: Some(outcome),
        });
    }

    store.update_symbol_stats()?;
    report.prediction_count = report.predictions.len();
    Ok(report)
}
