//! NSE market data adapter.
//!
//! Index constituents, quarterly shareholding patterns and the daily FII/DII
//! flow feed, all from the exchange's public JSON API. Response bodies are
//! interpreted by the pure `parse_*` functions below so they can be tested
//! without a network.

use crate::adapters::http::{build_client, fetch_error, json_body, value_text};
use crate::domain::error::SmartMoneyError;
use crate::domain::ownership::RawQuarter;
use crate::domain::settings::SourceSettings;
use crate::ports::data_port::MarketDataPort;
use reqwest::blocking::Client;
use serde_json::Value;
use tracing::debug;

const INDEX_ENDPOINT: &str = "/api/equity-stockIndices";
const SHAREHOLDING_ENDPOINT: &str = "/api/corporate-share-holdings";
const FLOW_ENDPOINT: &str = "/api/fiidiiTradeReact";

pub struct NseAdapter {
    client: Client,
    base_url: String,
}

impl NseAdapter {
    pub fn new(settings: &SourceSettings) -> Result<Self, SmartMoneyError> {
        Ok(Self {
            client: build_client(settings.timeout, &settings.user_agent)?,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}

/// Symbols from an index response's `data[*].symbol`.
///
/// The feed lists the index itself as its first row; that entry is dropped.
pub fn parse_universe(index: &str, body: &Value) -> Result<Vec<String>, SmartMoneyError> {
    let rows = body
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| SmartMoneyError::Parse {
            target: format!("index {}", index),
            reason: "response has no data array".to_string(),
        })?;

    Ok(rows
        .iter()
        .filter_map(|row| row.get("symbol").and_then(Value::as_str))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case(index))
        .collect())
}

/// Quarterly rows from a shareholding response, most recent first.
///
/// `None` when the body carries no `data` array at all.
pub fn parse_shareholding(body: &Value) -> Option<Vec<RawQuarter>> {
    let rows = body.get("data")?.as_array()?;
    Some(
        rows.iter()
            .map(|row| RawQuarter {
                foreign: value_text(row.get("foreignInstitutions")),
                domestic: value_text(row.get("domesticInstitutions")),
            })
            .collect(),
    )
}

impl MarketDataPort for NseAdapter {
    fn fetch_universe(&self, index: &str) -> Result<Vec<String>, SmartMoneyError> {
        let target = format!("index {}", index);
        let resp = self
            .client
            .get(self.url(INDEX_ENDPOINT))
            .query(&[("index", index)])
            .send()
            .map_err(|e| fetch_error(&target, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SmartMoneyError::Fetch {
                target,
                reason: format!("HTTP {}", status),
            });
        }

        let body = json_body(&target, resp)?;
        parse_universe(index, &body)
    }

    fn fetch_shareholding(
        &self,
        symbol: &str,
    ) -> Result<Option<Vec<RawQuarter>>, SmartMoneyError> {
        let resp = self
            .client
            .get(self.url(SHAREHOLDING_ENDPOINT))
            .query(&[("symbol", symbol)])
            .send()
            .map_err(|e| fetch_error(symbol, e))?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            debug!(symbol, %status, "shareholding unavailable");
            return Ok(None);
        }

        let body = json_body(symbol, resp)?;
        Ok(parse_shareholding(&body))
    }

    fn fetch_market_flow(&self) -> Result<Value, SmartMoneyError> {
        let target = "fii/dii flow";
        let resp = self
            .client
            .get(self.url(FLOW_ENDPOINT))
            .query(&[("date", ""), ("category", "all")])
            .send()
            .map_err(|e| fetch_error(target, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SmartMoneyError::Fetch {
                target: target.to_string(),
                reason: format!("HTTP {}", status),
            });
        }

        json_body(target, resp)
    }
}
