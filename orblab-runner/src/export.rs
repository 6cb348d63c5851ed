//! CSV/JSON export of stored predictions and outcomes.

use anyhow::{Context, Result};
use orblab_core::store::PredictionRecord;
use serde::Serialize;
use std::path::{Path, PathBuf};

const TIME_FMT: &str = "%H:%M";

/// Paths of the files one export produced.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub csv: PathBuf,
    pub json: PathBuf,
}

/// One flattened CSV row: prediction columns plus outcome columns,
/// blank when the outcome is missing.
#[derive(Debug, Serialize)]
struct Row<'a> {
    id: i64,
    trade_date: String,
    symbol: &'a str,
    action: String,
    entry_price: f64,
    target_price: f64,
    stop_loss: f64,
    signal_time: String,
    bias: String,
    reason: &'a str,
    risk_per_share: f64,
    suggested_qty: i64,
    outcome: Option<String>,
    entry_price_actual: Option<f64>,
    entry_time_actual: Option<String>,
    exit_price: Option<f64>,
    exit_time: Option<String>,
    pnl: Option<f64>,
    r_multiple: Option<f64>,
}

impl<'a> From<&'a PredictionRecord> for Row<'a> {
    fn from(record: &'a PredictionRecord) -> Self {
        let p = &record.prediction;
        let o = record.outcome.as_ref();
        Self {
            id: record.id,
            trade_date: p.trade_date.to_string(),
            symbol: &p.symbol,
            action: p.action.to_string(),
            entry_price: p.entry_price,
            target_price: p.target_price,
            stop_loss: p.stop_loss,
            signal_time: p.signal_time.format(TIME_FMT).to_string(),
            bias: p.bias.to_string(),
            reason: &p.reason,
            risk_per_share: p.risk_per_share,
            suggested_qty: p.suggested_qty,
            outcome: o.map(|o| o.kind.to_string()),
            entry_price_actual: o.and_then(|o| o.entry_price_actual),
            entry_time_actual: o
                .and_then(|o| o.entry_time_actual)
                .map(|t| t.format(TIME_FMT).to_string()),
            exit_price: o.and_then(|o| o.exit_price),
            exit_time: o
                .and_then(|o| o.exit_time)
                .map(|t| t.format(TIME_FMT).to_string()),
            pnl: o.map(|o| o.pnl),
            r_multiple: o.map(|o| o.r_multiple),
        }
    }
}

/// Write records as CSV, one row per prediction.
pub fn write_csv(path: &Path, records: &[PredictionRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("create {}", path.display()))?;
    for record in records {
        writer.serialize(Row::from(record))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write records as pretty-printed JSON.
pub fn write_json(path: &Path, records: &[PredictionRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Save both artifacts for a session date under `output_dir`, named
/// `predictions_<date>.{csv,json}`.
pub fn save_artifacts(
    output_dir: impl AsRef<Path>,
    date: chrono::NaiveDate,
    records: &[PredictionRecord],
) -> Result<ArtifactPaths> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;

    let csv = dir.join(format!("predictions_{date}.csv"));
    let json = dir.join(format!("predictions_{date}.json"));
    write_csv(&csv, records)?;
    write_json(&json, records)?;
    Ok(ArtifactPaths { csv, json })
}
