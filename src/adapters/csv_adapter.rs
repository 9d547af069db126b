//! CSV file price adapter.
//!
//! Reads daily bars from `<dir>/<SYMBOL>.csv`. The file needs a header row
//! with at least `date` (YYYY-MM-DD) and `close` columns; other columns are
//! ignored.

use crate::domain::error::SmartMoneyError;
use crate::domain::ohlcv::PriceBar;
use crate::ports::data_port::PricePort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn parse_error(symbol: &str, reason: String) -> SmartMoneyError {
    SmartMoneyError::Parse {
        target: symbol.to_string(),
        reason,
    }
}

impl PricePort for CsvAdapter {
    fn fetch_daily_bars(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, SmartMoneyError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| SmartMoneyError::Fetch {
            target: symbol.to_string(),
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| parse_error(symbol, format!("CSV header error: {}", e)))?
            .clone();

        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| parse_error(symbol, format!("missing {} column", name)))
        };
        let date_col = column("date")?;
        let close_col = column("close")?;

        let mut bars = Vec::new();

        for result in rdr.records() {
            let record =
                result.map_err(|e| parse_error(symbol, format!("CSV parse error: {}", e)))?;

            let date_str = record.get(date_col).unwrap_or_default().trim();
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
                .map_err(|e| parse_error(symbol, format!("invalid date {:?}: {}", date_str, e)))?;

            if date < start_date || date > end_date {
                continue;
            }

            let close_str = record.get(close_col).unwrap_or_default().trim();
            let close: f64 = close_str
                .parse()
                .map_err(|e| parse_error(symbol, format!("invalid close {:?}: {}", close_str, e)))?;

            bars.push(PriceBar { date, close });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}
