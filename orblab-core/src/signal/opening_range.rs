//! Opening-range band — price extremes of the first session minutes.

use crate::domain::Bar;
use crate::session::SessionClock;

/// High/low extremes over the opening-range window, the breakout
/// reference band for the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpeningRange {
    pub high: f64,
    pub low: f64,
}

/// Compute the opening-range band, or `None` if the window has no bars.
pub fn opening_range(bars: &[Bar], clock: &SessionClock) -> Option<OpeningRange> {
    let mut high = f64::NEG_INFINITY;
    let mut low = f64::INFINITY;
    let mut seen = false;

    for bar in bars {
        if !clock.in_opening_range(bar.timestamp.time()) {
            continue;
        }
        seen = true;
        if bar.high > high {
            high = bar.high;
        }
        if bar.low < low {
            low = bar.low;
        }
    }

    seen.then_some(OpeningRange { high, low })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(h: u32, m: u32, high: f64, low: f64) -> Bar {
        Bar {
            timestamp: NaiveDate::from_ymd_opt(2024, 3, 14)
                .unwrap()
                .and_hms_opt(h, m, 0)
                .unwrap(),
            open: (high + low) / 2.0,
            high,
            low,
            close: (high + low) / 2.0,
            volume: 1_000,
        }
    }

    #[test]
    fn band_over_opening_window_only() {
        let bars = vec![
            bar(9, 15, 50.0, 48.5),
            bar(9, 20, 49.8, 48.0),
            bar(9, 30, 49.5, 48.2),
            // outside the window, must not widen the band
            bar(9, 35, 60.0, 40.0),
        ];
        let or = opening_range(&bars, &SessionClock::default()).unwrap();
        assert_eq!(or.high, 50.0);
        assert_eq!(or.low, 48.0);
    }

    #[test]
    fn none_without_window_bars() {
        let bars = vec![bar(10, 0, 50.0, 48.0)];
        assert!(opening_range(&bars, &SessionClock::default()).is_none());
        assert!(opening_range(&[], &SessionClock::default()).is_none());
    }
}
