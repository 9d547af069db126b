//! Moving-average technical filter.
//!
//! SMA(n) = (P[i-n+1] + ... + P[i]) / n over daily closes.
//! The signal is true iff the latest close is strictly above the SMA of the
//! trailing `period` closes. With fewer than `period` bars there is no
//! average and the signal is false.

use crate::domain::ohlcv::PriceBar;

pub const DEFAULT_SMA_PERIOD: usize = 200;

/// Result of evaluating the filter for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub enum TechnicalOutcome {
    Computed { close: f64, sma: f64 },
    InsufficientBars { bars: usize, need: usize },
    FetchFailed { reason: String },
}

impl TechnicalOutcome {
    /// The boolean signal; anything but a computed average is `false`.
    pub fn signal(&self) -> bool {
        match self {
            TechnicalOutcome::Computed { close, sma } => close > sma,
            _ => false,
        }
    }
}

/// Mean of the trailing `period` values, `None` if there are fewer.
pub fn trailing_sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let window = &values[values.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

/// Evaluate the filter over bars sorted oldest-first.
pub fn evaluate(bars: &[PriceBar], period: usize) -> TechnicalOutcome {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    match (closes.last(), trailing_sma(&closes, period)) {
        (Some(&close), Some(sma)) => TechnicalOutcome::Computed { close, sma },
        _ => TechnicalOutcome::InsufficientBars {
            bars: closes.len(),
            need: period,
        },
    }
}
