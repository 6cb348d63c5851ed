//! Yahoo Finance intraday data provider.
//!
//! Fetches intraday OHLCV bars from Yahoo's v8 chart API, converts the
//! epoch timestamps into the exchange timezone, and clips to regular
//! session hours. Handles rate limiting and retries with exponential
//! backoff.
//!
//! Yahoo Finance has no official API and is subject to unannounced
//! format changes; intraday history is only served for recent dates.

use super::provider::{BarProvider, DataError, Interval};
use crate::domain::Bar;
use crate::session::SessionClock;
use chrono::{NaiveDate, TimeZone};
use chrono_tz::Tz;
use serde::Deserialize;
use std::time::Duration;

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

/// Yahoo Finance intraday provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    tz: Tz,
    clock: SessionClock,
    max_retries: u32,
    base_delay: Duration,
}

impl YahooProvider {
    pub fn new(tz: Tz, clock: SessionClock) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            tz,
            clock,
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        }
    }

    /// Epoch timestamp of local midnight on `date` in the exchange timezone.
    fn midnight_ts(&self, date: NaiveDate) -> Result<i64, DataError> {
        let local = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| DataError::Other(format!("invalid date: {date}")))?;
        self.tz
            .from_local_datetime(&local)
            .earliest()
            .map(|dt| dt.timestamp())
            .ok_or_else(|| DataError::Other(format!("unmappable local midnight: {date}")))
    }

    fn chart_url(
        &self,
        symbol: &str,
        date: NaiveDate,
        interval: &str,
    ) -> Result<String, DataError> {
        let start_ts = self.midnight_ts(date)?;
        let end_ts = self.midnight_ts(date + chrono::Duration::days(1))?;
        Ok(format!(
            "https://query2.finance.yahoo.com/v8/finance/chart/{symbol}\
             ?period1={start_ts}&period2={end_ts}&interval={interval}\
             &includePrePost=false"
        ))
    }

    fn daily_url(&self, symbol: &str, date: NaiveDate) -> Result<String, DataError> {
        // 5 calendar days of lookback covers weekends.
        let start_ts = self.midnight_ts(date - chrono::Duration::days(5))?;
        let end_ts = self.midnight_ts(date)?;
        Ok(format!(
            "https://query2.finance.yahoo.com/v8/finance/chart/{symbol}\
             ?period1={start_ts}&period2={end_ts}&interval=1d"
        ))
    }

    /// Extract the single ChartData payload, mapping provider errors.
    fn unwrap_chart(symbol: &str, resp: ChartResponse) -> Result<ChartData, DataError> {
        let result = resp.chart.result.ok_or_else(|| {
            if let Some(err) = resp.chart.error {
                if err.code == "Not Found" {
                    DataError::SymbolNotFound {
                        symbol: symbol.to_string(),
                    }
                } else {
                    DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
                }
            } else {
                DataError::ResponseFormatChanged("empty result with no error".into())
            }
        })?;

        result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))
    }

    /// Parse intraday chart data into session-local bars, clipped to
    /// session hours on the requested date.
    fn parse_intraday(
        &self,
        date: NaiveDate,
        data: ChartData,
    ) -> Result<Vec<Bar>, DataError> {
        let timestamps = match data.timestamp {
            Some(ts) => ts,
            None => return Ok(Vec::new()), // no trading data for that date
        };

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let utc = chrono::DateTime::from_timestamp(ts, 0).ok_or_else(|| {
                DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
            })?;
            let local = utc.with_timezone(&self.tz).naive_local();

            if local.date() != date || !self.clock.in_session(local.time()) {
                continue;
            }

            let open = quote.open.get(i).copied().flatten();
            let high = quote.high.get(i).copied().flatten();
            let low = quote.low.get(i).copied().flatten();
            let close = quote.close.get(i).copied().flatten();
            let volume = quote.volume.get(i).copied().flatten();

            // Null rows appear for minutes with no prints; skip them.
            let (open, high, low, close) = match (open, high, low, close) {
                (Some(o), Some(h), Some(l), Some(c)) => (o, h, l, c),
                _ => continue,
            };

            bars.push(Bar {
                timestamp: local,
                open,
                high,
                low,
                close,
                volume: volume.unwrap_or(0),
            });
        }

        Ok(bars)
    }

    /// Execute one GET with retry/backoff, returning the parsed chart payload.
    fn fetch_chart(&self, symbol: &str, url: &str) -> Result<ChartData, DataError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                std::thread::sleep(delay);
            }

            match self.client.get(url).send() {
                Ok(resp) => {
                    let status = resp.status();

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        let retry_after = resp
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.parse::<u64>().ok())
                            .unwrap_or(60);
                        last_error = Some(DataError::RateLimited {
                            retry_after_secs: retry_after,
                        });
                        continue;
                    }

                    if !status.is_success() {
                        last_error = Some(DataError::Other(format!("HTTP {status} for {symbol}")));
                        continue;
                    }

                    let chart: ChartResponse = resp.json().map_err(|e| {
                        DataError::ResponseFormatChanged(format!(
                            "failed to parse response for {symbol}: {e}"
                        ))
                    })?;

                    return Self::unwrap_chart(symbol, chart);
                }
                Err(e) => {
                    if e.is_connect() || e.is_timeout() {
                        last_error = Some(DataError::NetworkUnreachable(e.to_string()));
                        continue;
                    }
                    return Err(DataError::NetworkUnreachable(e.to_string()));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| DataError::Other("max retries exceeded".into())))
    }
}

impl BarProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn intraday_bars(
        &self,
        symbol: &str,
        date: NaiveDate,
        interval: Interval,
    ) -> Result<Vec<Bar>, DataError> {
        let url = self.chart_url(symbol, date, interval.as_yahoo())?;
        let data = self.fetch_chart(symbol, &url)?;
        self.parse_intraday(date, data)
    }

    fn prev_close(&self, symbol: &str, date: NaiveDate) -> Result<Option<f64>, DataError> {
        let url = self.daily_url(symbol, date)?;
        let data = self.fetch_chart(symbol, &url)?;

        let quote = match data.indicators.quote.into_iter().next() {
            Some(q) => q,
            None => return Ok(None),
        };

        Ok(quote.close.into_iter().flatten().last())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> YahooProvider {
        YahooProvider::new(chrono_tz::Asia::Kolkata, SessionClock::default())
    }

    fn chart_data(json: &str) -> ChartData {
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        YahooProvider::unwrap_chart("TEST.NS", resp).unwrap()
    }

    #[test]
    fn chart_url_spans_one_session_day() {
        let p = provider();
        let date = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
        let url = p.chart_url("RELIANCE.NS", date, "5m").unwrap();
        assert!(url.contains("interval=5m"));
        assert!(url.contains("RELIANCE.NS"));
        let start = p.midnight_ts(date).unwrap();
        let end = p.midnight_ts(date + chrono::Duration::days(1)).unwrap();
        assert_eq!(end - start, 86_400);
    }

    #[test]
    fn parse_clips_to_session_hours() {
        let p = provider();
        let date = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
        // 03:44 UTC = 09:14 IST (pre-open), 03:45 UTC = 09:15 IST (open)
        let pre_open = p.midnight_ts(date).unwrap() + (3 * 60 + 44) * 60;
        let at_open = pre_open + 60;
        let json = format!(
            r#"{{"chart":{{"result":[{{"timestamp":[{pre_open},{at_open}],
                "indicators":{{"quote":[{{"open":[100.0,101.0],"high":[102.0,103.0],
                "low":[99.0,100.0],"close":[101.0,102.0],"volume":[1000,2000]}}]}}}}],
                "error":null}}}}"#
        );
        let bars = p.parse_intraday(date, chart_data(&json)).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(
            bars[0].timestamp.time(),
            chrono::NaiveTime::from_hms_opt(9, 15, 0).unwrap()
        );
        assert_eq!(bars[0].close, 102.0);
    }

    #[test]
    fn parse_skips_null_rows() {
        let p = provider();
        let date = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
        let at_open = p.midnight_ts(date).unwrap() + (3 * 60 + 45) * 60;
        let next = at_open + 300;
        let json = format!(
            r#"{{"chart":{{"result":[{{"timestamp":[{at_open},{next}],
                "indicators":{{"quote":[{{"open":[null,101.0],"high":[null,103.0],
                "low":[null,100.0],"close":[null,102.0],"volume":[null,2000]}}]}}}}],
                "error":null}}}}"#
        );
        let bars = p.parse_intraday(date, chart_data(&json)).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].open, 101.0);
    }

    #[test]
    fn missing_timestamps_mean_no_data() {
        let p = provider();
        let date = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
        let json = r#"{"chart":{"result":[{"timestamp":null,
            "indicators":{"quote":[{"open":[],"high":[],"low":[],"close":[],"volume":[]}]}}],
            "error":null}}"#;
        let bars = p.parse_intraday(date, chart_data(json)).unwrap();
        assert!(bars.is_empty());
    }

    #[test]
    fn not_found_maps_to_symbol_not_found() {
        let json = r#"{"chart":{"result":null,
            "error":{"code":"Not Found","description":"No data found"}}}"#;
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        let err = YahooProvider::unwrap_chart("BAD.NS", resp).unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound { .. }));
    }
}
