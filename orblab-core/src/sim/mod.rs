//! Outcome simulator — walks a prediction forward through the session.
//!
//! The fill is the open of the first bar at or after the signal time
//! (next-bar execution, no lookahead). From that bar on, the first
//! touch of stop or target exits the position; the stop is checked
//! before the target on every bar, so when both thresholds are crossed
//! within a single bar the worse outcome wins. If neither is touched,
//! the position exits at the last bar's close.

use crate::domain::{Bar, Outcome, OutcomeKind, Prediction, TradeAction};

/// Floor for the planned risk when computing the R-multiple, so a
/// degenerate zero-width stop band cannot divide by zero.
const RISK_EPSILON: f64 = 0.001;

/// Simulate one prediction against the session's bar sequence.
///
/// Always produces exactly one outcome; `NoTrade` covers both an empty
/// series and a signal time past the last bar.
pub fn simulate_outcome(pred: &Prediction, prediction_id: i64, bars: &[Bar]) -> Outcome {
    let signal_at = pred.trade_date.and_time(pred.signal_time);

    let fill_idx = match bars.iter().position(|b| b.timestamp >= signal_at) {
        Some(idx) => idx,
        None => return Outcome::no_trade(prediction_id),
    };

    let fill_bar = &bars[fill_idx];
    let entry_price_actual = fill_bar.open;
    let entry_time_actual = fill_bar.timestamp.time();

    // Default: held to end of day.
    let last = &bars[bars.len() - 1];
    let mut kind = OutcomeKind::EodExit;
    let mut exit_price = last.close;
    let mut exit_time = last.timestamp.time();

    for bar in &bars[fill_idx..] {
        let touched = match pred.action {
            TradeAction::Buy => {
                if bar.low <= pred.stop_loss {
                    Some((OutcomeKind::SlHit, pred.stop_loss))
                } else if bar.high >= pred.target_price {
                    Some((OutcomeKind::TargetHit, pred.target_price))
                } else {
                    None
                }
            }
            TradeAction::Sell => {
                if bar.high >= pred.stop_loss {
                    Some((OutcomeKind::SlHit, pred.stop_loss))
                } else if bar.low <= pred.target_price {
                    Some((OutcomeKind::TargetHit, pred.target_price))
                } else {
                    None
                }
            }
        };

        if let Some((k, price)) = touched {
            kind = k;
            exit_price = price;
            exit_time = bar.timestamp.time();
            break;
        }
    }

    let pnl_per_share = match pred.action {
        TradeAction::Buy => exit_price - entry_price_actual,
        TradeAction::Sell => entry_price_actual - exit_price,
    };
    let pnl = pnl_per_share * pred.suggested_qty as f64;

    let planned_risk = (pred.entry_price - pred.stop_loss).abs();
    let risk = if planned_risk > 0.0 {
        planned_risk
    } else {
        RISK_EPSILON
    };

    Outcome {
        prediction_id,
        entry_price_actual: Some(entry_price_actual),
        entry_time_actual: Some(entry_time_actual),
        exit_price: Some(exit_price),
        exit_time: Some(exit_time),
        kind,
        pnl,
        r_multiple: pnl_per_share / risk,
    }
}
