//! Prediction and Outcome — the records the pipeline produces.
//!
//! A `Prediction` is created at most once per symbol per session by the
//! signal detector and is immutable afterwards. Each stored prediction
//! is referenced by exactly one `Outcome`, produced immediately after
//! by the outcome simulator.

use super::SessionBias;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Trade direction of a candidate entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeAction {
    Buy,
    Sell,
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeAction::Buy => f.write_str("BUY"),
            TradeAction::Sell => f.write_str("SELL"),
        }
    }
}

impl FromStr for TradeAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUY" => Ok(TradeAction::Buy),
            "SELL" => Ok(TradeAction::Sell),
            other => Err(format!("unknown trade action: {other}")),
        }
    }
}

/// A candidate intraday entry emitted by the signal detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub trade_date: NaiveDate,
    pub symbol: String,
    pub action: TradeAction,
    pub entry_price: f64,
    pub target_price: f64,
    pub stop_loss: f64,
    /// Session-local clock time of the bar that triggered the signal.
    pub signal_time: NaiveTime,
    pub bias: SessionBias,
    pub reason: String,
    pub risk_per_share: f64,
    pub suggested_qty: i64,
}

/// How a simulated position ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeKind {
    TargetHit,
    SlHit,
    EodExit,
    /// No bar existed at or after the signal time — the position could
    /// never have been filled.
    NoTrade,
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutcomeKind::TargetHit => "TARGET_HIT",
            OutcomeKind::SlHit => "SL_HIT",
            OutcomeKind::EodExit => "EOD_EXIT",
            OutcomeKind::NoTrade => "NO_TRADE",
        };
        f.write_str(s)
    }
}

impl FromStr for OutcomeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TARGET_HIT" => Ok(OutcomeKind::TargetHit),
            "SL_HIT" => Ok(OutcomeKind::SlHit),
            "EOD_EXIT" => Ok(OutcomeKind::EodExit),
            "NO_TRADE" => Ok(OutcomeKind::NoTrade),
            other => Err(format!("unknown outcome kind: {other}")),
        }
    }
}

/// Simulated result of one prediction, walked forward over the
/// session's remaining bars.
///
/// The actual fill fields are `None` only for `NoTrade`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub prediction_id: i64,
    pub entry_price_actual: Option<f64>,
    pub entry_time_actual: Option<NaiveTime>,
    pub exit_price: Option<f64>,
    pub exit_time: Option<NaiveTime>,
    pub kind: OutcomeKind,
    /// Total P&L: per-share move times suggested quantity.
    pub pnl: f64,
    /// Per-share P&L divided by planned risk per share.
    pub r_multiple: f64,
}

impl Outcome {
    /// An outcome for a prediction that could never have been filled.
    pub fn no_trade(prediction_id: i64) -> Self {
        Self {
            prediction_id,
            entry_price_actual: None,
            entry_time_actual: None,
            exit_price: None,
            exit_time: None,
            kind: OutcomeKind::NoTrade,
            pnl: 0.0,
            r_multiple: 0.0,
        }
    }

    pub fn is_winner(&self) -> bool {
        self.pnl > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_roundtrip() {
        assert_eq!("BUY".parse::<TradeAction>().unwrap(), TradeAction::Buy);
        assert_eq!(TradeAction::Sell.to_string(), "SELL");
        assert!("HOLD".parse::<TradeAction>().is_err());
    }

    #[test]
    fn outcome_kind_roundtrip() {
        for kind in [
            OutcomeKind::TargetHit,
            OutcomeKind::SlHit,
            OutcomeKind::EodExit,
            OutcomeKind::NoTrade,
        ] {
            let parsed: OutcomeKind = kind.to_string().parse().unwrap();
            assert_eq!(kind, parsed);
        }
    }

    #[test]
    fn no_trade_has_zeroed_fields() {
        let out = Outcome::no_trade(7);
        assert_eq!(out.kind, OutcomeKind::NoTrade);
        assert_eq!(out.pnl, 0.0);
        assert_eq!(out.r_multiple, 0.0);
        assert!(out.entry_price_actual.is_none());
        assert!(out.exit_time.is_none());
        assert!(!out.is_winner());
    }
}
