//! Yahoo Finance price adapter.
//!
//! Fetches daily closes from Yahoo's v8 chart API. Exchange symbols are
//! mapped to Yahoo tickers by appending a suffix (".NS" for NSE listings).

use crate::adapters::http::{build_client, fetch_error};
use crate::domain::error::SmartMoneyError;
use crate::domain::ohlcv::PriceBar;
use crate::domain::settings::{PriceSettings, SourceSettings};
use crate::ports::data_port::PricePort;
use chrono::NaiveDate;
use reqwest::Url;
use reqwest::blocking::Client;
use serde::Deserialize;

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
    close: Vec<Option<f64>>,
}

pub struct YahooAdapter {
    client: Client,
    base_url: String,
    symbol_suffix: String,
}

impl YahooAdapter {
    pub fn new(source: &SourceSettings, price: &PriceSettings) -> Result<Self, SmartMoneyError> {
        Ok(Self {
            client: build_client(source.timeout, &source.user_agent)?,
            base_url: price.base_url.trim_end_matches('/').to_string(),
            symbol_suffix: price.symbol_suffix.clone(),
        })
    }

    fn ticker(&self, symbol: &str) -> String {
        format!("{}{}", symbol, self.symbol_suffix)
    }

    /// The ticker is a single encoded path segment, so symbols like `M&M`
    /// or `BAJAJ-AUTO` reach the API intact.
    fn chart_url(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Option<Url> {
        let start_ts = start.and_hms_opt(0, 0, 0)?.and_utc().timestamp();
        let end_ts = end.and_hms_opt(23, 59, 59)?.and_utc().timestamp();

        let mut url = Url::parse(&self.base_url).ok()?;
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", ticker]);
        url.query_pairs_mut()
            .append_pair("period1", &start_ts.to_string())
            .append_pair("period2", &end_ts.to_string())
            .append_pair("interval", "1d");
        Some(url)
    }
}

fn format_error(ticker: &str, reason: impl Into<String>) -> SmartMoneyError {
    SmartMoneyError::Parse {
        target: ticker.to_string(),
        reason: reason.into(),
    }
}

/// Daily closes from a chart response body, skipping days with no close.
pub fn parse_chart(ticker: &str, body: &str) -> Result<Vec<PriceBar>, SmartMoneyError> {
    let resp: ChartResponse = serde_json::from_str(body)
        .map_err(|e| format_error(ticker, format!("invalid chart response: {}", e)))?;

    let result = match resp.chart.result {
        Some(result) => result,
        None => {
            return Err(match resp.chart.error {
                Some(err) if err.code == "Not Found" => SmartMoneyError::NoData {
                    symbol: ticker.to_string(),
                },
                Some(err) => format_error(ticker, format!("{}: {}", err.code, err.description)),
                None => format_error(ticker, "empty result with no error"),
            });
        }
    };

    let data = result
        .into_iter()
        .next()
        .ok_or_else(|| format_error(ticker, "result array is empty"))?;
    let timestamps = data
        .timestamp
        .ok_or_else(|| format_error(ticker, "no timestamps"))?;
    let quote = data
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| format_error(ticker, "no quote data"))?;

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let date = chrono::DateTime::from_timestamp(ts, 0)
            .map(|dt| dt.naive_utc().date())
            .ok_or_else(|| format_error(ticker, format!("invalid timestamp: {ts}")))?;

        // holidays come through with a null close
        if let Some(close) = quote.close.get(i).copied().flatten() {
            bars.push(PriceBar { date, close });
        }
    }

    Ok(bars)
}

impl PricePort for YahooAdapter {
    fn fetch_daily_bars(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, SmartMoneyError> {
        let ticker = self.ticker(symbol);
        let url = self
            .chart_url(&ticker, start_date, end_date)
            .ok_or_else(|| format_error(&ticker, "cannot build chart URL"))?;

        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| fetch_error(&ticker, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SmartMoneyError::Fetch {
                target: ticker,
                reason: format!("HTTP {}", status),
            });
        }

        let body = resp.text().map_err(|e| fetch_error(&ticker, e))?;
        parse_chart(&ticker, &body)
    }
}
