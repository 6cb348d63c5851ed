//! Session bias classifier.
//!
//! Compares the index's last opening-range close against the previous
//! session close. A 0.1% band around the previous close absorbs noise
//! from a flat open.

use crate::domain::{Bar, SessionBias};
use crate::session::SessionClock;

/// Band half-width around the previous close: ±0.1%.
const FLAT_BAND: f64 = 0.001;

/// Classify one session's directional bias from the index bars.
///
/// Returns `Sideways` whenever the inputs cannot support a call: empty
/// bar series, unavailable previous close, or an empty opening-range
/// window.
pub fn classify_bias(
    index_bars: &[Bar],
    prev_close: Option<f64>,
    clock: &SessionClock,
) -> SessionBias {
    let prev_close = match prev_close {
        Some(p) => p,
        None => return SessionBias::Sideways,
    };
    if index_bars.is_empty() {
        return SessionBias::Sideways;
    }

    let or_close = index_bars
        .iter()
        .filter(|b| clock.in_opening_range(b.timestamp.time()))
        .last()
        .map(|b| b.close);

    match or_close {
        Some(c) if c > prev_close * (1.0 + FLAT_BAND) => SessionBias::Bullish,
        Some(c) if c < prev_close * (1.0 - FLAT_BAND) => SessionBias::Bearish,
        Some(_) => SessionBias::Sideways,
        None => SessionBias::Sideways,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn ts(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 14)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn bar(h: u32, m: u32, close: f64) -> Bar {
        Bar {
            timestamp: ts(h, m),
            open: close,
            high: close + 0.5,
            low: close - 0.5,
            close,
            volume: 1_000,
        }
    }

    #[test]
    fn bullish_above_band() {
        let bars = vec![bar(9, 15, 100.05), bar(9, 30, 100.2), bar(9, 35, 99.0)];
        let bias = classify_bias(&bars, Some(100.0), &SessionClock::default());
        assert_eq!(bias, SessionBias::Bullish);
    }

    #[test]
    fn bearish_below_band() {
        let bars = vec![bar(9, 15, 100.0), bar(9, 30, 99.8)];
        let bias = classify_bias(&bars, Some(100.0), &SessionClock::default());
        assert_eq!(bias, SessionBias::Bearish);
    }

    #[test]
    fn sideways_inside_band() {
        let clock = SessionClock::default();
        // exactly at the band edges: not strictly beyond, so Sideways
        for close in [100.1, 99.9, 100.0, 100.05] {
            let bars = vec![bar(9, 30, close)];
            assert_eq!(classify_bias(&bars, Some(100.0), &clock), SessionBias::Sideways);
        }
    }

    #[test]
    fn sideways_without_prev_close() {
        let bars = vec![bar(9, 30, 150.0)];
        let bias = classify_bias(&bars, None, &SessionClock::default());
        assert_eq!(bias, SessionBias::Sideways);
    }

    #[test]
    fn sideways_with_empty_bars() {
        let bias = classify_bias(&[], Some(100.0), &SessionClock::default());
        assert_eq!(bias, SessionBias::Sideways);
    }

    #[test]
    fn sideways_without_opening_range_bars() {
        // Only post-opening-range bars, even though they are far above prev close.
        let bars = vec![bar(10, 0, 120.0), bar(10, 5, 121.0)];
        let bias = classify_bias(&bars, Some(100.0), &SessionClock::default());
        assert_eq!(bias, SessionBias::Sideways);
    }

    #[test]
    fn last_opening_range_bar_decides() {
        // First OR bar would be bearish, last one is bullish.
        let bars = vec![bar(9, 15, 99.0), bar(9, 25, 100.5)];
        let bias = classify_bias(&bars, Some(100.0), &SessionClock::default());
        assert_eq!(bias, SessionBias::Bullish);
    }
}
