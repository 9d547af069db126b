//! Data access port traits.

use crate::domain::error::SmartMoneyError;
use crate::domain::ohlcv::PriceBar;
use crate::domain::ownership::RawQuarter;
use chrono::NaiveDate;
use serde_json::Value;

/// Index membership, shareholding disclosures and the market-wide flow feed.
pub trait MarketDataPort {
    /// Constituents of a named index. Failure here is fatal to a run.
    fn fetch_universe(&self, index: &str) -> Result<Vec<String>, SmartMoneyError>;

    /// Quarterly disclosures, most recent first. `Ok(None)` means the source
    /// has nothing for the symbol.
    fn fetch_shareholding(&self, symbol: &str)
    -> Result<Option<Vec<RawQuarter>>, SmartMoneyError>;

    /// The raw daily flow feed; its shape is interpreted by the aggregator.
    fn fetch_market_flow(&self) -> Result<Value, SmartMoneyError>;
}

/// Daily bars for the moving-average filter.
pub trait PricePort {
    fn fetch_daily_bars(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, SmartMoneyError>;
}
