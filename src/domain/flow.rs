//! Market-wide institutional flow aggregation.
//!
//! The flow feed is a list of daily rows, newest first, each carrying buy
//! and sell values for foreign (FII) and domestic (DII) institutions. The
//! feed is accepted as an object with a `data` array or as a bare array.
//! Anything else aggregates to zero.

use serde_json::Value;

pub const DEFAULT_FLOW_WINDOW: usize = 15;

const FII_BUY: &str = "fiiBuyValue";
const FII_SELL: &str = "fiiSellValue";
const DII_BUY: &str = "diiBuyValue";
const DII_SELL: &str = "diiSellValue";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowRow {
    pub fii_buy: f64,
    pub fii_sell: f64,
    pub dii_buy: f64,
    pub dii_sell: f64,
}

impl FlowRow {
    pub fn net_foreign(&self) -> f64 {
        self.fii_buy - self.fii_sell
    }

    pub fn net_domestic(&self) -> f64 {
        self.dii_buy - self.dii_sell
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowAggregate {
    pub net_foreign: f64,
    pub net_domestic: f64,
}

impl FlowAggregate {
    pub const ZERO: FlowAggregate = FlowAggregate {
        net_foreign: 0.0,
        net_domestic: 0.0,
    };
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FlowError {
    #[error("unexpected feed shape")]
    UnexpectedShape,

    #[error("feed has no {field} column")]
    MissingColumn { field: &'static str },
}

const FIELDS: [&str; 4] = [FII_BUY, FII_SELL, DII_BUY, DII_SELL];

/// A missing or non-numeric cell reads as zero, so it drops out of the sum.
fn number(row: &Value, field: &str) -> f64 {
    let parsed = match row.get(field) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

fn feed_rows(feed: &Value) -> Result<&Vec<Value>, FlowError> {
    match feed {
        Value::Object(map) => match map.get("data") {
            Some(Value::Array(rows)) => Ok(rows),
            _ => Err(FlowError::UnexpectedShape),
        },
        Value::Array(rows) => Ok(rows),
        _ => Err(FlowError::UnexpectedShape),
    }
}

/// Parse the first `window` rows of the feed.
///
/// Every flow column must appear in at least one row of the feed. Rows past
/// the window are never inspected beyond that.
pub fn parse_flow_rows(feed: &Value, window: usize) -> Result<Vec<FlowRow>, FlowError> {
    let rows = feed_rows(feed)?;
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    for field in FIELDS {
        if !rows.iter().any(|row| row.get(field).is_some()) {
            return Err(FlowError::MissingColumn { field });
        }
    }

    Ok(rows
        .iter()
        .take(window)
        .map(|row| FlowRow {
            fii_buy: number(row, FII_BUY),
            fii_sell: number(row, FII_SELL),
            dii_buy: number(row, DII_BUY),
            dii_sell: number(row, DII_SELL),
        })
        .collect())
}

/// Sum net flows over the first `window` rows. No re-sorting is applied.
pub fn aggregate_rows(rows: &[FlowRow], window: usize) -> FlowAggregate {
    rows.iter()
        .take(window)
        .fold(FlowAggregate::ZERO, |acc, row| FlowAggregate {
            net_foreign: acc.net_foreign + row.net_foreign(),
            net_domestic: acc.net_domestic + row.net_domestic(),
        })
}

/// Shape-tolerant aggregation straight from the raw feed.
pub fn aggregate_feed(feed: &Value, window: usize) -> Result<FlowAggregate, FlowError> {
    parse_flow_rows(feed, window).map(|rows| aggregate_rows(&rows, window))
}
