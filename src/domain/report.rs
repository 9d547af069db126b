//! Report formatting.
//!
//! Pure transformations of the finished run into the tabular artifact and
//! the human-readable summary. A [`FormatPolicy`] selects between the plain
//! and decorated presentation.

use crate::domain::diff::DiffResult;
use crate::domain::error::SkipKind;
use crate::domain::flow::FlowAggregate;
use crate::domain::qualification::{QualifyingRecord, SkipStats, Verdict};
use chrono::NaiveDate;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerdictLabels {
    #[default]
    Plain,
    Decorated,
}

impl VerdictLabels {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "plain" => Some(VerdictLabels::Plain),
            "decorated" => Some(VerdictLabels::Decorated),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurrencyRounding {
    #[default]
    On,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatPolicy {
    pub verdict_labels: VerdictLabels,
    pub currency_rounding: CurrencyRounding,
}

impl FormatPolicy {
    pub fn verdict_label(&self, verdict: Verdict) -> String {
        match (self.verdict_labels, verdict) {
            (VerdictLabels::Plain, v) => v.to_string(),
            (VerdictLabels::Decorated, Verdict::Buy) => "🟢 BUY".to_string(),
            (VerdictLabels::Decorated, Verdict::Watch) => "🟡 WATCH".to_string(),
        }
    }

    /// Rounded amounts drop the fraction (toward zero).
    pub fn amount(&self, value: f64) -> String {
        match self.currency_rounding {
            CurrencyRounding::On => format!("{}", value.trunc() as i64),
            CurrencyRounding::Off => format!("{:.2}", value),
        }
    }

    pub fn currency(&self, value: f64) -> String {
        format!("₹{} Cr", self.amount(value))
    }
}

pub const TABLE_HEADERS: [&str; 7] = [
    "Symbol",
    "FII(3Q)",
    "DII(3Q)",
    "Above200DMA",
    "FII_15d_Flow",
    "DII_15d_Flow",
    "Verdict",
];

#[derive(Debug, Clone, PartialEq)]
pub struct ReportTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn format_triple(values: &[f64; 3]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("|")
}

/// One row per qualifying record, in run order.
pub fn build_table(records: &[QualifyingRecord], policy: &FormatPolicy) -> ReportTable {
    let rows = records
        .iter()
        .map(|r| {
            vec![
                r.symbol.clone(),
                format_triple(&r.trend.foreign),
                format_triple(&r.trend.domestic),
                r.above_sma.to_string(),
                policy.amount(r.flow.net_foreign),
                policy.amount(r.flow.net_domestic),
                policy.verdict_label(r.verdict),
            ]
        })
        .collect();

    ReportTable {
        headers: TABLE_HEADERS.iter().map(|h| h.to_string()).collect(),
        rows,
    }
}

pub struct SummaryContext<'a> {
    pub as_of: NaiveDate,
    pub qualified: usize,
    pub diff: &'a DiffResult,
    pub flow: FlowAggregate,
    pub flow_window: usize,
    pub skip_stats: &'a SkipStats,
    pub policy: FormatPolicy,
}

fn join_or_none(symbols: &BTreeSet<String>) -> String {
    if symbols.is_empty() {
        "None".to_string()
    } else {
        symbols.iter().cloned().collect::<Vec<_>>().join(", ")
    }
}

fn format_skips(stats: &SkipStats) -> String {
    SkipKind::ALL
        .iter()
        .map(|k| format!("{}={}", k.label(), stats.count(*k)))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn format_summary(ctx: &SummaryContext<'_>) -> String {
    let title = match ctx.policy.verdict_labels {
        VerdictLabels::Plain => "Smart Money Tracker",
        VerdictLabels::Decorated => "📊 Smart Money Tracker",
    };

    let mut out = String::new();
    out.push_str(&format!("{} ({})\n", title, ctx.as_of.format("%d %b %Y")));
    out.push_str(&format!("Total qualified: {}\n", ctx.qualified));
    out.push_str(&format!(
        "New additions: {} → {}\n",
        ctx.diff.added.len(),
        join_or_none(&ctx.diff.added)
    ));
    out.push_str(&format!(
        "Removed: {} → {}\n",
        ctx.diff.removed.len(),
        join_or_none(&ctx.diff.removed)
    ));
    out.push_str(&format!(
        "FII {}d Flow: {}\n",
        ctx.flow_window,
        ctx.policy.currency(ctx.flow.net_foreign)
    ));
    out.push_str(&format!(
        "DII {}d Flow: {}\n",
        ctx.flow_window,
        ctx.policy.currency(ctx.flow.net_domestic)
    ));
    out.push_str(&format!(
        "Skipped: {} ({})\n",
        ctx.skip_stats.total(),
        format_skips(ctx.skip_stats)
    ));
    out
}
