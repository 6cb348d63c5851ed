//! Running volume-weighted average price.
//!
//! Cumulative Σ(typical_price × volume) / Σ(volume) up to and
//! including each bar. This is a running statistic: the value at index
//! i only sees bars 0..=i, never the future.

use crate::domain::Bar;

/// Compute the running VWAP series, one value per input bar.
///
/// A prefix with zero cumulative volume has no defined VWAP and yields
/// NaN for those positions.
pub fn running_vwap(bars: &[Bar]) -> Vec<f64> {
    let mut out = Vec::with_capacity(bars.len());
    let mut cum_pv = 0.0;
    let mut cum_vol = 0.0;

    for bar in bars {
        let vol = bar.volume as f64;
        cum_pv += bar.typical_price() * vol;
        cum_vol += vol;
        out.push(if cum_vol > 0.0 { cum_pv / cum_vol } else { f64::NAN });
    }

    out
}
