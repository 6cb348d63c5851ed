//! SQLite-backed signal store.
//!
//! Three tables: predictions, outcomes (1:1 by prediction_id), and
//! symbol_stats (recomputed in full after each run). Times are stored
//! as `HH:MM` strings, dates as ISO `YYYY-MM-DD`.

use super::{PredictionRecord, SignalStore, StoreError};
use crate::domain::{Outcome, OutcomeKind, Prediction, SessionBias, SymbolStats, TradeAction};
use chrono::{NaiveDate, NaiveTime};
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const TIME_FMT: &str = "%H:%M";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and ensure the schema.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Private in-memory database, used by tests and dry runs.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS predictions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                trade_date TEXT NOT NULL,
                symbol TEXT NOT NULL,
                action TEXT NOT NULL,
                entry_price REAL NOT NULL,
                target_price REAL NOT NULL,
                stop_loss REAL NOT NULL,
                signal_time TEXT NOT NULL,
                bias TEXT NOT NULL,
                reason TEXT,
                risk_per_share REAL,
                suggested_qty INTEGER,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            );
            CREATE TABLE IF NOT EXISTS outcomes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                prediction_id INTEGER NOT NULL,
                entry_price_actual REAL,
                entry_time_actual TEXT,
                exit_price REAL,
                exit_time TEXT,
                outcome TEXT,
                pnl REAL,
                r_multiple REAL,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY(prediction_id) REFERENCES predictions(id)
            );
            CREATE TABLE IF NOT EXISTS symbol_stats (
                symbol TEXT PRIMARY KEY,
                trades INTEGER NOT NULL,
                wins INTEGER NOT NULL,
                losses INTEGER NOT NULL
            );",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Other("store mutex poisoned".into()))
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, StoreError> {
    s.parse()
        .map_err(|e| StoreError::Corrupt(format!("bad trade_date '{s}': {e}")))
}

fn parse_time(s: &str) -> Result<NaiveTime, StoreError> {
    NaiveTime::parse_from_str(s, TIME_FMT)
        .map_err(|e| StoreError::Corrupt(format!("bad time '{s}': {e}")))
}

fn parse_opt_time(s: Option<String>) -> Result<Option<NaiveTime>, StoreError> {
    s.map(|s| parse_time(&s)).transpose()
}

impl SignalStore for SqliteStore {
    fn insert_prediction(&self, pred: &Prediction) -> Result<i64, StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO predictions
             (trade_date, symbol, action, entry_price, target_price, stop_loss,
              signal_time, bias, reason, risk_per_share, suggested_qty)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                pred.trade_date.to_string(),
                pred.symbol,
                pred.action.to_string(),
                pred.entry_price,
                pred.target_price,
                pred.stop_loss,
                pred.signal_time.format(TIME_FMT).to_string(),
                pred.bias.to_string(),
                pred.reason,
                pred.risk_per_share,
                pred.suggested_qty,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn insert_outcome(&self, outcome: &Outcome) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO outcomes
             (prediction_id, entry_price_actual, entry_time_actual, exit_price,
              exit_time, outcome, pnl, r_multiple)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                outcome.prediction_id,
                outcome.entry_price_actual,
                outcome
                    .entry_time_actual
                    .map(|t| t.format(TIME_FMT).to_string()),
                outcome.exit_price,
                outcome.exit_time.map(|t| t.format(TIME_FMT).to_string()),
                outcome.kind.to_string(),
                outcome.pnl,
                outcome.r_multiple,
            ],
        )?;
        Ok(())
    }

    fn symbol_stats(&self) -> Result<HashMap<String, SymbolStats>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT symbol, trades, wins, losses FROM symbol_stats")?;
        let rows = stmt.query_map([], |row| {
            Ok(SymbolStats {
                symbol: row.get(0)?,
                trades: row.get(1)?,
                wins: row.get(2)?,
                losses: row.get(3)?,
            })
        })?;

        let mut stats = HashMap::new();
        for row in rows {
            let s = row?;
            stats.insert(s.symbol.clone(), s);
        }
        Ok(stats)
    }

    fn update_symbol_stats(&self) -> Result<(), StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT p.symbol,
                    COUNT(o.id) AS trades,
                    SUM(CASE WHEN o.pnl > 0 THEN 1 ELSE 0 END) AS wins,
                    SUM(CASE WHEN o.pnl <= 0 THEN 1 ELSE 0 END) AS losses
             FROM predictions p
             JOIN outcomes o ON p.id = o.prediction_id
             GROUP BY p.symbol",
        )?;
        let rows: Vec<(String, u32, u32, u32)> = stmt
            .query_map([], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
            })?
            .collect::<Result<_, _>>()?;
        drop(stmt);

        for (symbol, trades, wins, losses) in rows {
            conn.execute(
                "INSERT INTO symbol_stats (symbol, trades, wins, losses)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(symbol) DO UPDATE SET
                     trades = excluded.trades,
                     wins = excluded.wins,
                     losses = excluded.losses",
                params![symbol, trades, wins, losses],
            )?;
        }
        Ok(())
    }

    fn predictions_for_date(&self, date: NaiveDate) -> Result<Vec<PredictionRecord>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT p.id, p.trade_date, p.symbol, p.action, p.entry_price,
                    p.target_price, p.stop_loss, p.signal_time, p.bias, p.reason,
                    p.risk_per_share, p.suggested_qty,
                    o.prediction_id, o.entry_price_actual, o.entry_time_actual,
                    o.exit_price, o.exit_time, o.outcome, o.pnl, o.r_multiple
             FROM predictions p
             LEFT JOIN outcomes o ON p.id = o.prediction_id
             WHERE p.trade_date = ?1
             ORDER BY p.symbol, p.signal_time",
        )?;

        struct RawRow {
            id: i64,
            trade_date: String,
            symbol: String,
            action: String,
            entry_price: f64,
            target_price: f64,
            stop_loss: f64,
            signal_time: String,
            bias: String,
            reason: String,
            risk_per_share: f64,
            suggested_qty: i64,
            outcome_pid: Option<i64>,
            entry_price_actual: Option<f64>,
            entry_time_actual: Option<String>,
            exit_price: Option<f64>,
            exit_time: Option<String>,
            outcome_kind: Option<String>,
            pnl: Option<f64>,
            r_multiple: Option<f64>,
        }

        let raw_rows: Vec<RawRow> = stmt
            .query_map(params![date.to_string()], |row| {
                Ok(RawRow {
                    id: row.get(0)?,
                    trade_date: row.get(1)?,
                    symbol: row.get(2)?,
                    action: row.get(3)?,
                    entry_price: row.get(4)?,
                    target_price: row.get(5)?,
                    stop_loss: row.get(6)?,
                    signal_time: row.get(7)?,
                    bias: row.get(8)?,
                    reason: row.get(9)?,
                    risk_per_share: row.get(10)?,
                    suggested_qty: row.get(11)?,
                    outcome_pid: row.get(12)?,
                    entry_price_actual: row.get(13)?,
                    entry_time_actual: row.get(14)?,
                    exit_price: row.get(15)?,
                    exit_time: row.get(16)?,
                    outcome_kind: row.get(17)?,
                    pnl: row.get(18)?,
                    r_multiple: row.get(19)?,
                })
            })?
            .collect::<Result<_, _>>()?;

        let mut records = Vec::with_capacity(raw_rows.len());
        for raw in raw_rows {
            let action: TradeAction = raw.action.parse().map_err(StoreError::Corrupt)?;
            let bias: SessionBias = raw.bias.parse().map_err(StoreError::Corrupt)?;

            let outcome = match (raw.outcome_pid, raw.outcome_kind) {
                (Some(pid), Some(kind_str)) => {
                    let kind: OutcomeKind = kind_str.parse().map_err(StoreError::Corrupt)?;
                    Some(Outcome {
                        prediction_id: pid,
                        entry_price_actual: raw.entry_price_actual,
                        entry_time_actual: parse_opt_time(raw.entry_time_actual)?,
                        exit_price: raw.exit_price,
                        exit_time: parse_opt_time(raw.exit_time)?,
                        kind,
                        pnl: raw.pnl.unwrap_or(0.0),
                        r_multiple: raw.r_multiple.unwrap_or(0.0),
                    })
                }
                _ => None,
            };

            records.push(PredictionRecord {
                id: raw.id,
                prediction: Prediction {
                    trade_date: parse_date(&raw.trade_date)?,
                    symbol: raw.symbol,
                    action,
                    entry_price: raw.entry_price,
                    target_price: raw.target_price,
                    stop_loss: raw.stop_loss,
                    signal_time: parse_time(&raw.signal_time)?,
                    bias,
                    reason: raw.reason,
                    risk_per_share: raw.risk_per_share,
                    suggested_qty: raw.suggested_qty,
                },
                outcome,
            });
        }
        Ok(records)
    }
}
