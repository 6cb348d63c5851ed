//! Breakout signal detector.
//!
//! For one symbol's session: compute the running VWAP and the
//! opening-range band, then scan bars inside the entry window for the
//! first breakout close. At most one prediction per symbol per session;
//! the scan stops on the first match and never re-enters.

use super::opening_range::opening_range;
use super::vwap::running_vwap;
use super::SkipReason;
use crate::domain::{Bar, Prediction, SessionBias, TradeAction};
use crate::session::SessionClock;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Position sizing inputs: account capital and the fraction risked per
/// trade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizingConfig {
    pub capital: f64,
    pub risk_fraction: f64,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            capital: 100_000.0,
            risk_fraction: 0.01,
        }
    }
}

/// Result of scanning one symbol: a prediction or an explicit skip.
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    Signal(Prediction),
    Skip(SkipReason),
}

/// Shares to buy/sell so that a stop-out loses at most
/// `capital × risk_fraction`. Zero when the stop band is degenerate.
pub fn suggested_qty(entry: f64, stop: f64, sizing: &SizingConfig) -> i64 {
    let risk_per_share = (entry - stop).abs();
    if risk_per_share <= 0.0 {
        return 0;
    }
    let max_risk_value = sizing.capital * sizing.risk_fraction;
    let qty = (max_risk_value / risk_per_share).floor() as i64;
    qty.max(0)
}

/// Scan one symbol's session for a breakout entry.
///
/// BUY (Bullish only): close above both the opening-range high and the
/// running VWAP. SELL (Bearish only): close below both the
/// opening-range low and the running VWAP. Only bars inside the entry
/// window are considered; the first matching bar wins.
pub fn detect_signal(
    symbol: &str,
    date: NaiveDate,
    bars: &[Bar],
    bias: SessionBias,
    clock: &SessionClock,
    sizing: &SizingConfig,
) -> Detection {
    if bars.is_empty() {
        return Detection::Skip(SkipReason::NoData);
    }

    let or = match opening_range(bars, clock) {
        Some(or) => or,
        None => return Detection::Skip(SkipReason::NoOpeningRange),
    };
    let vwap = running_vwap(bars);

    for (bar, &vwap) in bars.iter().zip(vwap.iter()) {
        if !clock.in_entry_window(bar.timestamp.time()) {
            continue;
        }
        let close = bar.close;

        let hit = match bias {
            SessionBias::Bullish if close > or.high && close > vwap => Some((
                TradeAction::Buy,
                or.low,
                "Bullish breakout above ORH & VWAP",
            )),
            SessionBias::Bearish if close < or.low && close < vwap => Some((
                TradeAction::Sell,
                or.high,
                "Bearish breakdown below ORL & VWAP",
            )),
            _ => None,
        };

        if let Some((action, stop_loss, reason)) = hit {
            let entry_price = close;
            let risk_per_share = (entry_price - stop_loss).abs();
            let target_price = match action {
                TradeAction::Buy => entry_price + 2.0 * risk_per_share,
                TradeAction::Sell => entry_price - 2.0 * risk_per_share,
            };

            return Detection::Signal(Prediction {
                trade_date: date,
                symbol: symbol.to_string(),
                action,
                entry_price,
                target_price,
                stop_loss,
                signal_time: bar.timestamp.time(),
                bias,
                reason: reason.to_string(),
                risk_per_share,
                suggested_qty: suggested_qty(entry_price, stop_loss, sizing),
            });
        }
    }

    Detection::Skip(SkipReason::NoBreakout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDateTime, NaiveTime};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()
    }

    fn ts(h: u32, m: u32) -> NaiveDateTime {
        date().and_hms_opt(h, m, 0).unwrap()
    }

    fn bar(h: u32, m: u32, high: f64, low: f64, close: f64, volume: u64) -> Bar {
        Bar {
            timestamp: ts(h, m),
            open: close,
            high,
            low,
            close,
            volume,
        }
    }

    /// Opening range 48..50, then a clean breakout at 10:00.
    fn bullish_session() -> Vec<Bar> {
        vec![
            bar(9, 15, 50.0, 48.0, 49.0, 10_000),
            bar(9, 30, 49.8, 48.4, 49.2, 8_000),
            bar(9, 45, 49.9, 49.0, 49.5, 6_000),
            bar(10, 0, 50.8, 49.6, 50.5, 12_000),
            bar(10, 5, 51.5, 50.2, 51.0, 9_000),
        ]
    }

    #[test]
    fn buy_breakout_detected_once() {
        let bars = bullish_session();
        let det = detect_signal(
            "RELIANCE.NS",
            date(),
            &bars,
            SessionBias::Bullish,
            &SessionClock::default(),
            &SizingConfig::default(),
        );

        let pred = match det {
            Detection::Signal(p) => p,
            Detection::Skip(r) => panic!("expected signal, got skip: {r}"),
        };
        assert_eq!(pred.action, TradeAction::Buy);
        assert_eq!(pred.entry_price, 50.5);
        assert_eq!(pred.stop_loss, 48.0);
        assert!((pred.target_price - 55.5).abs() < 1e-9);
        assert!((pred.risk_per_share - 2.5).abs() < 1e-9);
        assert_eq!(pred.signal_time, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        assert_eq!(pred.suggested_qty, 400);
        assert_eq!(pred.reason, "Bullish breakout above ORH & VWAP");
    }

    #[test]
    fn entry_strictly_beyond_band_and_vwap() {
        if let Detection::Signal(p) = detect_signal(
            "X",
            date(),
            &bullish_session(),
            SessionBias::Bullish,
            &SessionClock::default(),
            &SizingConfig::default(),
        ) {
            let or = opening_range(&bullish_session(), &SessionClock::default()).unwrap();
            assert!(p.entry_price > or.high);
            // VWAP at the signal bar must be below the entry close
            let bars = bullish_session();
            let vwap = running_vwap(&bars);
            let idx = bars
                .iter()
                .position(|b| b.timestamp.time() == p.signal_time)
                .unwrap();
            assert!(p.entry_price > vwap[idx]);
        } else {
            panic!("expected signal");
        }
    }

    #[test]
    fn close_above_orh_but_below_vwap_is_no_signal() {
        // A heavy pre-entry-window surge pins the VWAP near 104.5, so the
        // later close clears the opening-range high (100) but not VWAP.
        let bars = vec![
            bar(9, 15, 100.0, 99.0, 99.5, 1_000_000),
            bar(9, 35, 106.0, 104.0, 105.0, 10_000_000),
            bar(10, 0, 100.5, 99.8, 100.2, 1_000),
        ];
        let det = detect_signal(
            "X",
            date(),
            &bars,
            SessionBias::Bullish,
            &SessionClock::default(),
            &SizingConfig::default(),
        );
        assert_eq!(det, Detection::Skip(SkipReason::NoBreakout));
    }

    #[test]
    fn sell_breakdown_mirrors_buy() {
        let bars = vec![
            bar(9, 15, 50.0, 48.0, 49.0, 10_000),
            bar(10, 0, 48.2, 47.0, 47.5, 12_000),
        ];
        let det = detect_signal(
            "X",
            date(),
            &bars,
            SessionBias::Bearish,
            &SessionClock::default(),
            &SizingConfig::default(),
        );
        let pred = match det {
            Detection::Signal(p) => p,
            Detection::Skip(r) => panic!("expected signal, got skip: {r}"),
        };
        assert_eq!(pred.action, TradeAction::Sell);
        assert_eq!(pred.entry_price, 47.5);
        assert_eq!(pred.stop_loss, 50.0);
        assert!((pred.target_price - 42.5).abs() < 1e-9);
        assert_eq!(pred.reason, "Bearish breakdown below ORL & VWAP");
    }

    #[test]
    fn bars_outside_entry_window_cannot_trigger() {
        // Breakout bar sits after entry_end.
        let bars = vec![
            bar(9, 15, 50.0, 48.0, 49.0, 10_000),
            bar(15, 0, 52.0, 50.5, 51.5, 12_000),
        ];
        let det = detect_signal(
            "X",
            date(),
            &bars,
            SessionBias::Bullish,
            &SessionClock::default(),
            &SizingConfig::default(),
        );
        assert_eq!(det, Detection::Skip(SkipReason::NoBreakout));
    }

    #[test]
    fn sideways_bias_yields_no_signal() {
        let det = detect_signal(
            "X",
            date(),
            &bullish_session(),
            SessionBias::Sideways,
            &SessionClock::default(),
            &SizingConfig::default(),
        );
        assert_eq!(det, Detection::Skip(SkipReason::NoBreakout));
    }

    #[test]
    fn missing_opening_range_skips_symbol() {
        let bars = vec![bar(10, 0, 50.8, 49.6, 50.5, 12_000)];
        let det = detect_signal(
            "X",
            date(),
            &bars,
            SessionBias::Bullish,
            &SessionClock::default(),
            &SizingConfig::default(),
        );
        assert_eq!(det, Detection::Skip(SkipReason::NoOpeningRange));
    }

    #[test]
    fn empty_bars_skip() {
        let det = detect_signal(
            "X",
            date(),
            &[],
            SessionBias::Bullish,
            &SessionClock::default(),
            &SizingConfig::default(),
        );
        assert_eq!(det, Detection::Skip(SkipReason::NoData));
    }

    #[test]
    fn qty_sizing() {
        let sizing = SizingConfig {
            capital: 100_000.0,
            risk_fraction: 0.01,
        };
        assert_eq!(suggested_qty(50.5, 48.0, &sizing), 400);
        // degenerate band sizes to zero
        assert_eq!(suggested_qty(50.0, 50.0, &sizing), 0);
        // fractional result floors
        assert_eq!(suggested_qty(100.0, 97.0, &sizing), 333);
    }
}
