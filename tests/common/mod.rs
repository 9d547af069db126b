#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde_json::{json, Value};
use smartmoney::domain::error::SmartMoneyError;
pub use smartmoney::domain::ohlcv::PriceBar;
use smartmoney::domain::ownership::RawQuarter;
use smartmoney::domain::report::ReportTable;
use smartmoney::domain::settings::Settings;
use smartmoney::ports::data_port::{MarketDataPort, PricePort};
use smartmoney::ports::report_port::ReportPort;
use smartmoney::ports::state_port::RunStatePort;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashMap};
use std::time::Duration as StdDuration;

pub struct MockMarketData {
    pub universe: Result<Vec<String>, String>,
    pub holdings: HashMap<String, Vec<RawQuarter>>,
    pub errors: HashMap<String, String>,
    pub flow: Option<Value>,
    pub shareholding_calls: RefCell<Vec<String>>,
    pub flow_calls: Cell<usize>,
}

impl MockMarketData {
    pub fn new(universe: &[&str]) -> Self {
        Self {
            universe: Ok(universe.iter().map(|s| s.to_string()).collect()),
            holdings: HashMap::new(),
            errors: HashMap::new(),
            flow: None,
            shareholding_calls: RefCell::new(Vec::new()),
            flow_calls: Cell::new(0),
        }
    }

    pub fn failing_universe(reason: &str) -> Self {
        let mut mock = Self::new(&[]);
        mock.universe = Err(reason.to_string());
        mock
    }

    /// Quarters given oldest-first for readability; stored newest-first as
    /// the exchange sends them.
    pub fn with_quarters(mut self, symbol: &str, foreign: &[f64], domestic: &[f64]) -> Self {
        let rows = foreign
            .iter()
            .zip(domestic)
            .rev()
            .map(|(f, d)| RawQuarter::new(f.to_string(), d.to_string()))
            .collect();
        self.holdings.insert(symbol.to_string(), rows);
        self
    }

    pub fn with_raw(mut self, symbol: &str, rows: Vec<RawQuarter>) -> Self {
        self.holdings.insert(symbol.to_string(), rows);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }

    pub fn with_flow(mut self, flow: Value) -> Self {
        self.flow = Some(flow);
        self
    }
}

impl MarketDataPort for MockMarketData {
    fn fetch_universe(&self, index: &str) -> Result<Vec<String>, SmartMoneyError> {
        self.universe.clone().map_err(|reason| SmartMoneyError::Fetch {
            target: format!("index {}", index),
            reason,
        })
    }

    fn fetch_shareholding(
        &self,
        symbol: &str,
    ) -> Result<Option<Vec<RawQuarter>>, SmartMoneyError> {
        self.shareholding_calls.borrow_mut().push(symbol.to_string());
        if let Some(reason) = self.errors.get(symbol) {
            return Err(SmartMoneyError::Fetch {
                target: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        Ok(self.holdings.get(symbol).cloned())
    }

    fn fetch_market_flow(&self) -> Result<Value, SmartMoneyError> {
        self.flow_calls.set(self.flow_calls.get() + 1);
        self.flow.clone().ok_or_else(|| SmartMoneyError::Fetch {
            target: "flow".to_string(),
            reason: "unavailable".to_string(),
        })
    }
}

/// Price source keyed by symbol; unknown symbols fail like a network error.
pub struct MockPrices {
    pub bars: HashMap<String, Vec<PriceBar>>,
}

impl MockPrices {
    pub fn new() -> Self {
        Self {
            bars: HashMap::new(),
        }
    }

    pub fn rising(mut self, symbol: &str, count: usize) -> Self {
        self.bars
            .insert(symbol.to_string(), generate_bars(count, 100.0, 1.0));
        self
    }

    pub fn falling(mut self, symbol: &str, count: usize) -> Self {
        self.bars
            .insert(symbol.to_string(), generate_bars(count, 500.0, -1.0));
        self
    }
}

impl PricePort for MockPrices {
    fn fetch_daily_bars(
        &self,
        symbol: &str,
        _start_date: NaiveDate,
        _end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, SmartMoneyError> {
        self.bars
            .get(symbol)
            .cloned()
            .ok_or_else(|| SmartMoneyError::Fetch {
                target: symbol.to_string(),
                reason: "timed out".to_string(),
            })
    }
}

#[derive(Default)]
pub struct MemoryStateStore {
    pub snapshot: RefCell<Option<BTreeSet<String>>>,
}

impl MemoryStateStore {
    pub fn with_previous(symbols: &[&str]) -> Self {
        Self {
            snapshot: RefCell::new(Some(symbol_set(symbols))),
        }
    }
}

impl RunStatePort for MemoryStateStore {
    fn read_snapshot(&self) -> Result<Option<BTreeSet<String>>, SmartMoneyError> {
        Ok(self.snapshot.borrow().clone())
    }

    fn write_snapshot(&self, symbols: &BTreeSet<String>) -> Result<(), SmartMoneyError> {
        *self.snapshot.borrow_mut() = Some(symbols.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryReportSink {
    pub tables: RefCell<Vec<(ReportTable, NaiveDateTime)>>,
    pub summaries: RefCell<Vec<String>>,
}

impl ReportPort for MemoryReportSink {
    fn write_table(
        &self,
        table: &ReportTable,
        generated_at: NaiveDateTime,
    ) -> Result<String, SmartMoneyError> {
        self.tables.borrow_mut().push((table.clone(), generated_at));
        Ok(format!("mem://smart_money_{}.csv", generated_at.format("%Y%m%d_%H%M")))
    }

    fn write_summary(&self, summary: &str) -> Result<String, SmartMoneyError> {
        self.summaries.borrow_mut().push(summary.to_string());
        Ok("mem://summary.txt".to_string())
    }
}

pub fn symbol_set(symbols: &[&str]) -> BTreeSet<String> {
    symbols.iter().map(|s| s.to_string()).collect()
}

pub fn generate_bars(count: usize, start_price: f64, step: f64) -> Vec<PriceBar> {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    (0..count)
        .map(|i| PriceBar {
            date: start + Duration::days(i as i64),
            close: start_price + step * i as f64,
        })
        .collect()
}

pub fn flow_rows(count: usize, fii_net: f64, dii_net: f64) -> Value {
    let rows: Vec<Value> = (0..count)
        .map(|_| {
            json!({
                "fiiBuyValue": 1000.0 + fii_net,
                "fiiSellValue": 1000.0,
                "diiBuyValue": 500.0 + dii_net,
                "diiSellValue": 500.0,
            })
        })
        .collect();
    json!({ "data": rows })
}

/// Default settings with pacing disabled.
pub fn fast_settings() -> Settings {
    let mut settings =
        smartmoney::cli::settings_from(&smartmoney::adapters::file_config_adapter::FileConfigAdapter::empty())
            .unwrap();
    settings.pipeline.success_delay = StdDuration::ZERO;
    settings.pipeline.failure_delay = StdDuration::ZERO;
    settings
}

pub fn run_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 19)
        .unwrap()
        .and_hms_opt(18, 30, 0)
        .unwrap()
}
