//! Daily price bar representation.
//!
//! Only the close feeds the moving-average filter, so bars carry nothing else.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub close: f64,
}

/// Sort oldest-first and drop bars without a finite close.
pub fn normalize_bars(mut bars: Vec<PriceBar>) -> Vec<PriceBar> {
    bars.retain(|b| b.close.is_finite());
    bars.sort_by_key(|b| b.date);
    bars
}
