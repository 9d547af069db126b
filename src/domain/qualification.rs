//! Qualification pipeline.
//!
//! Walks the index universe one symbol at a time: ownership history, trend
//! extraction, classification, then the technical filter for survivors.
//! A single symbol can never abort the run; each drop-out is recorded with
//! a typed [`SkipReason`]. The market-wide flow aggregate is fetched once
//! after the loop and attached to every qualifying record.

use crate::domain::error::{SkipKind, SkipReason, SmartMoneyError};
use crate::domain::flow::{self, FlowAggregate};
use crate::domain::ohlcv::normalize_bars;
use crate::domain::ownership::{self, OwnershipTrend, TrendError};
use crate::domain::settings::PipelineSettings;
use crate::domain::technical::{self, TechnicalOutcome};
use crate::domain::trend::TrendDecision;
use crate::ports::data_port::{MarketDataPort, PricePort};
use chrono::{Duration, NaiveDate};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Buy,
    Watch,
}

impl Verdict {
    pub fn from_signal(above_sma: bool) -> Self {
        if above_sma {
            Verdict::Buy
        } else {
            Verdict::Watch
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Buy => write!(f, "BUY"),
            Verdict::Watch => write!(f, "WATCH"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QualifyingRecord {
    pub symbol: String,
    pub trend: OwnershipTrend,
    pub above_sma: bool,
    pub verdict: Verdict,
    pub flow: FlowAggregate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedSymbol {
    pub symbol: String,
    pub reason: SkipReason,
}

/// Per-reason skip counts, every kind present (zero if unused).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipStats {
    counts: BTreeMap<SkipKind, usize>,
}

impl SkipStats {
    pub fn from_skipped(skipped: &[SkippedSymbol]) -> Self {
        let mut counts: BTreeMap<SkipKind, usize> =
            SkipKind::ALL.iter().map(|k| (*k, 0)).collect();
        for s in skipped {
            *counts.entry(s.reason.kind()).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn count(&self, kind: SkipKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SkipKind, usize)> + '_ {
        self.counts.iter().map(|(k, v)| (*k, *v))
    }
}

#[derive(Debug, Clone)]
pub struct QualificationOutcome {
    pub universe_size: usize,
    pub records: Vec<QualifyingRecord>,
    pub skipped: Vec<SkippedSymbol>,
    pub flow: FlowAggregate,
}

impl QualificationOutcome {
    pub fn symbols(&self) -> BTreeSet<String> {
        self.records.iter().map(|r| r.symbol.clone()).collect()
    }

    pub fn skip_stats(&self) -> SkipStats {
        SkipStats::from_skipped(&self.skipped)
    }
}

impl From<TrendError> for SkipReason {
    fn from(err: TrendError) -> Self {
        match err {
            TrendError::NoTrend { have } => SkipReason::InsufficientData { quarters: have },
            TrendError::Parse { .. } => SkipReason::ParseFailed {
                reason: err.to_string(),
            },
        }
    }
}

/// Technical filter for one symbol; every failure degrades to a non-computed
/// outcome.
pub fn technical_outcome(
    prices: &dyn PricePort,
    symbol: &str,
    settings: &PipelineSettings,
    as_of: NaiveDate,
) -> TechnicalOutcome {
    let start = as_of - Duration::days(settings.price_lookback_days as i64);
    match prices.fetch_daily_bars(symbol, start, as_of) {
        Ok(bars) => technical::evaluate(&normalize_bars(bars), settings.sma_period),
        Err(e) => TechnicalOutcome::FetchFailed {
            reason: e.to_string(),
        },
    }
}

fn shareholding_skip(err: &SmartMoneyError) -> SkipReason {
    match err {
        SmartMoneyError::NoData { .. } => SkipReason::NoOwnershipData,
        SmartMoneyError::Parse { .. } => SkipReason::ParseFailed {
            reason: err.to_string(),
        },
        _ => SkipReason::FetchFailed {
            reason: err.to_string(),
        },
    }
}

/// Run one symbol through extraction, classification and the filter.
///
/// The returned record carries a zero flow; the caller attaches the real
/// aggregate once the loop is done.
pub fn evaluate_symbol(
    data: &dyn MarketDataPort,
    prices: &dyn PricePort,
    symbol: &str,
    settings: &PipelineSettings,
    as_of: NaiveDate,
) -> Result<QualifyingRecord, SkipReason> {
    let quarters = data
        .fetch_shareholding(symbol)
        .map_err(|e| shareholding_skip(&e))?
        .ok_or(SkipReason::NoOwnershipData)?;

    let trend = ownership::extract_trend(&quarters)?;

    if !TrendDecision::classify(&trend).qualifies() {
        return Err(SkipReason::TrendNotRising);
    }

    let outcome = technical_outcome(prices, symbol, settings, as_of);
    match &outcome {
        TechnicalOutcome::Computed { close, sma } => {
            debug!(symbol, close, sma, "moving average computed");
        }
        TechnicalOutcome::InsufficientBars { bars, need } => {
            debug!(symbol, bars, need, "not enough bars for moving average");
        }
        TechnicalOutcome::FetchFailed { reason } => {
            warn!(symbol, %reason, "price fetch failed, technical signal set to false");
        }
    }

    let above_sma = outcome.signal();
    Ok(QualifyingRecord {
        symbol: symbol.to_string(),
        trend,
        above_sma,
        verdict: Verdict::from_signal(above_sma),
        flow: FlowAggregate::ZERO,
    })
}

/// Fetch and aggregate the market-wide flow feed, zero on any failure.
pub fn market_flow(data: &dyn MarketDataPort, window: usize) -> FlowAggregate {
    let feed = match data.fetch_market_flow() {
        Ok(feed) => feed,
        Err(e) => {
            warn!(error = %e, "market flow fetch failed, using zero flow");
            return FlowAggregate::ZERO;
        }
    };
    match flow::aggregate_feed(&feed, window) {
        Ok(agg) => agg,
        Err(e) => {
            warn!(error = %e, "market flow feed unreadable, using zero flow");
            FlowAggregate::ZERO
        }
    }
}

/// Waits between symbols.
pub trait Pacer {
    fn pause(&self, delay: std::time::Duration);
}

/// Blocks the current thread for the requested delay.
pub struct SleepPacer;

impl Pacer for SleepPacer {
    fn pause(&self, delay: std::time::Duration) {
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}

pub fn run_qualification(
    data: &dyn MarketDataPort,
    prices: &dyn PricePort,
    index: &str,
    settings: &PipelineSettings,
    as_of: NaiveDate,
) -> Result<QualificationOutcome, SmartMoneyError> {
    run_qualification_paced(data, prices, index, settings, as_of, &SleepPacer)
}

/// [`run_qualification`] with an explicit pacer. Every symbol is followed by
/// one pause: `failure_delay` after a fetch or parse failure, otherwise
/// `success_delay`.
pub fn run_qualification_paced(
    data: &dyn MarketDataPort,
    prices: &dyn PricePort,
    index: &str,
    settings: &PipelineSettings,
    as_of: NaiveDate,
    pacer: &dyn Pacer,
) -> Result<QualificationOutcome, SmartMoneyError> {
    let universe = data.fetch_universe(index)?;
    info!(index, symbols = universe.len(), "universe loaded");

    let mut records = Vec::new();
    let mut skipped = Vec::new();
    let total = universe.len();

    for (i, symbol) in universe.iter().enumerate() {
        info!("processing {}/{}: {}", i + 1, total, symbol);

        match evaluate_symbol(data, prices, symbol, settings, as_of) {
            Ok(record) => {
                info!(symbol = %record.symbol, verdict = %record.verdict, "qualified");
                records.push(record);
                pacer.pause(settings.success_delay);
            }
            Err(reason) => {
                let failure = reason.is_failure();
                if failure {
                    warn!(symbol = %symbol, %reason, "error processing symbol");
                } else {
                    debug!(symbol = %symbol, %reason, "skipped");
                }
                skipped.push(SkippedSymbol {
                    symbol: symbol.clone(),
                    reason,
                });
                pacer.pause(if failure {
                    settings.failure_delay
                } else {
                    settings.success_delay
                });
            }
        }
    }

    let flow = market_flow(data, settings.flow_window);
    for record in &mut records {
        record.flow = flow;
    }

    info!(
        qualified = records.len(),
        skipped = skipped.len(),
        "qualification complete"
    );

    Ok(QualificationOutcome {
        universe_size: total,
        records,
        skipped,
        flow,
    })
}
