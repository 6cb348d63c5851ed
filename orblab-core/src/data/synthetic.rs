//! Synthetic intraday data provider.
//!
//! Generates a deterministic random-walk session for any symbol/date,
//! seeded from (symbol, date, seed). Used by demos and tests when no
//! network access is wanted; no attempt is made at realistic market
//! microstructure.

use super::provider::{BarProvider, DataError, Interval};
use crate::domain::Bar;
use crate::session::SessionClock;
use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct SyntheticProvider {
    clock: SessionClock,
    seed: u64,
}

impl SyntheticProvider {
    pub fn new(clock: SessionClock, seed: u64) -> Self {
        Self { clock, seed }
    }

    /// FNV-1a over the symbol, folded with the date and provider seed.
    fn rng_for(&self, symbol: &str, date: NaiveDate) -> StdRng {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        for b in symbol.bytes() {
            h ^= u64::from(b);
            h = h.wrapping_mul(0x0000_0100_0000_01b3);
        }
        h ^= date.num_days_from_ce() as u64;
        h = h.wrapping_mul(0x0000_0100_0000_01b3);
        StdRng::seed_from_u64(h ^ self.seed)
    }

    /// Stable per-symbol base price in the 50–3050 range.
    fn base_price(symbol: &str) -> f64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        for b in symbol.bytes() {
            h ^= u64::from(b);
            h = h.wrapping_mul(0x0000_0100_0000_01b3);
        }
        50.0 + (h % 3000) as f64
    }
}

impl BarProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn intraday_bars(
        &self,
        symbol: &str,
        date: NaiveDate,
        interval: Interval,
    ) -> Result<Vec<Bar>, DataError> {
        let mut rng = self.rng_for(symbol, date);
        let step = chrono::Duration::minutes(i64::from(interval.minutes()));

        let mut bars = Vec::new();
        let mut price = Self::base_price(symbol);
        let mut ts = date.and_time(self.clock.open);
        let session_end = date.and_time(self.clock.close);

        while ts <= session_end {
            let open = price;
            let drift: f64 = rng.gen_range(-0.003..0.003);
            let close = open * (1.0 + drift);
            let span = open.max(close) * rng.gen_range(0.0..0.002);
            let high = open.max(close) + span;
            let low = (open.min(close) - span).max(0.01);
            let volume = rng.gen_range(10_000..500_000);

            bars.push(Bar {
                timestamp: ts,
                open,
                high,
                low,
                close,
                volume,
            });

            price = close;
            ts += step;
        }

        Ok(bars)
    }

    fn prev_close(&self, symbol: &str, date: NaiveDate) -> Result<Option<f64>, DataError> {
        // Previous session close: last synthetic 15m close of the prior day.
        let prev_day = date - chrono::Duration::days(1);
        let bars = self.intraday_bars(symbol, prev_day, Interval::M15)?;
        Ok(bars.last().map(|b| b.close))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> SyntheticProvider {
        SyntheticProvider::new(SessionClock::default(), 42)
    }

    #[test]
    fn deterministic_per_symbol_date() {
        let p = provider();
        let date = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
        let a = p.intraday_bars("RELIANCE.NS", date, Interval::M5).unwrap();
        let b = p.intraday_bars("RELIANCE.NS", date, Interval::M5).unwrap();
        assert_eq!(a, b);

        let c = p.intraday_bars("TCS.NS", date, Interval::M5).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn bars_cover_session_at_interval() {
        let p = provider();
        let date = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
        let bars = p.intraday_bars("INFY.NS", date, Interval::M5).unwrap();

        // 09:15..=15:30 at 5m spacing = 76 bars.
        assert_eq!(bars.len(), 76);
        assert!(bars.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        assert!(bars.iter().all(|b| b.is_sane()));
    }

    #[test]
    fn prev_close_present_and_stable() {
        let p = provider();
        let date = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
        let a = p.prev_close("INFY.NS", date).unwrap();
        let b = p.prev_close("INFY.NS", date).unwrap();
        assert!(a.is_some());
        assert_eq!(a, b);
    }
}
