//! Typed run settings built from a [`ConfigPort`].
//!
//! Every key is optional; the defaults reproduce a stock NIFTY 200 run.
//! Call [`crate::domain::config_validation::validate_config`] first so the
//! conversions here never see out-of-range values.

use crate::domain::error::SmartMoneyError;
use crate::domain::flow::DEFAULT_FLOW_WINDOW;
use crate::domain::report::{CurrencyRounding, FormatPolicy, VerdictLabels};
use crate::domain::technical::DEFAULT_SMA_PERIOD;
use crate::ports::config_port::ConfigPort;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.nseindia.com";
pub const DEFAULT_INDEX: &str = "NIFTY 200";
pub const DEFAULT_PRICE_URL: &str = "https://query2.finance.yahoo.com";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
pub const DEFAULT_STATE_PATH: &str = "previous_smart_list.txt";

#[derive(Debug, Clone, PartialEq)]
pub struct SourceSettings {
    pub base_url: String,
    pub index: String,
    pub timeout: Duration,
    pub user_agent: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceProvider {
    Yahoo,
    Csv,
}

impl PriceProvider {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "yahoo" => Some(PriceProvider::Yahoo),
            "csv" => Some(PriceProvider::Csv),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceSettings {
    pub provider: PriceProvider,
    pub base_url: String,
    pub symbol_suffix: String,
    pub csv_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    pub success_delay: Duration,
    pub failure_delay: Duration,
    pub sma_period: usize,
    pub flow_window: usize,
    /// Calendar days of history requested for the moving average.
    pub price_lookback_days: u32,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            success_delay: Duration::from_millis(500),
            failure_delay: Duration::from_millis(1000),
            sma_period: DEFAULT_SMA_PERIOD,
            flow_window: DEFAULT_FLOW_WINDOW,
            // ~290 trading days, enough for a full 200-bar average
            price_lookback_days: 400,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportSettings {
    pub output_dir: PathBuf,
    pub file_prefix: String,
    pub summary_file: String,
    pub policy: FormatPolicy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StateSettings {
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub source: SourceSettings,
    pub price: PriceSettings,
    pub pipeline: PipelineSettings,
    pub report: ReportSettings,
    pub state: StateSettings,
}

fn string_or(config: &dyn ConfigPort, section: &str, key: &str, default: &str) -> String {
    config
        .get_string(section, key)
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| default.to_string())
}

fn non_negative(value: i64) -> u64 {
    value.max(0) as u64
}

impl Settings {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, SmartMoneyError> {
        let defaults = PipelineSettings::default();

        let provider_raw = string_or(config, "price", "provider", "yahoo");
        let provider =
            PriceProvider::parse(&provider_raw).ok_or_else(|| SmartMoneyError::ConfigInvalid {
                section: "price".into(),
                key: "provider".into(),
                reason: format!("unknown provider {:?}", provider_raw),
            })?;

        let labels_raw = string_or(config, "report", "verdict_labels", "plain");
        let verdict_labels =
            VerdictLabels::parse(&labels_raw).ok_or_else(|| SmartMoneyError::ConfigInvalid {
                section: "report".into(),
                key: "verdict_labels".into(),
                reason: format!("expected plain or decorated, got {:?}", labels_raw),
            })?;

        let currency_rounding = if config.get_bool("report", "currency_rounding", true) {
            CurrencyRounding::On
        } else {
            CurrencyRounding::Off
        };

        Ok(Self {
            source: SourceSettings {
                base_url: string_or(config, "source", "base_url", DEFAULT_BASE_URL),
                index: string_or(config, "source", "index", DEFAULT_INDEX),
                timeout: Duration::from_secs(non_negative(config.get_int(
                    "source",
                    "timeout_secs",
                    10,
                ))),
                user_agent: string_or(config, "source", "user_agent", DEFAULT_USER_AGENT),
            },
            price: PriceSettings {
                provider,
                base_url: string_or(config, "price", "base_url", DEFAULT_PRICE_URL),
                symbol_suffix: config
                    .get_string("price", "symbol_suffix")
                    .map(|s| s.trim().to_string())
                    .unwrap_or_else(|| ".NS".to_string()),
                csv_dir: PathBuf::from(string_or(config, "price", "csv_dir", "data")),
            },
            pipeline: PipelineSettings {
                success_delay: Duration::from_millis(non_negative(config.get_int(
                    "pipeline",
                    "success_delay_ms",
                    defaults.success_delay.as_millis() as i64,
                ))),
                failure_delay: Duration::from_millis(non_negative(config.get_int(
                    "pipeline",
                    "failure_delay_ms",
                    defaults.failure_delay.as_millis() as i64,
                ))),
                sma_period: config.get_int("pipeline", "sma_period", defaults.sma_period as i64)
                    as usize,
                flow_window: config.get_int("pipeline", "flow_window", defaults.flow_window as i64)
                    as usize,
                price_lookback_days: config.get_int(
                    "price",
                    "lookback_days",
                    defaults.price_lookback_days as i64,
                ) as u32,
            },
            report: ReportSettings {
                output_dir: PathBuf::from(string_or(config, "report", "output_dir", ".")),
                file_prefix: string_or(config, "report", "file_prefix", "smart_money"),
                summary_file: string_or(config, "report", "summary_file", "summary.txt"),
                policy: FormatPolicy {
                    verdict_labels,
                    currency_rounding,
                },
            },
            state: StateSettings {
                path: PathBuf::from(string_or(config, "state", "path", DEFAULT_STATE_PATH)),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    #[test]
    fn empty_config_uses_defaults() {
        let config = FileConfigAdapter::empty();
        let settings = Settings::from_config(&config).unwrap();
        assert_eq!(settings.source.index, "NIFTY 200");
        assert_eq!(settings.source.timeout, Duration::from_secs(10));
        assert_eq!(settings.price.provider, PriceProvider::Yahoo);
        assert_eq!(settings.price.symbol_suffix, ".NS");
        assert_eq!(settings.pipeline, PipelineSettings::default());
        assert_eq!(settings.report.file_prefix, "smart_money");
        assert_eq!(settings.report.policy, FormatPolicy::default());
        assert_eq!(settings.state.path, PathBuf::from("previous_smart_list.txt"));
    }

    #[test]
    fn overrides_are_applied() {
        let config = FileConfigAdapter::from_string(
            "[source]\nindex = NIFTY 50\n\
             [price]\nprovider = csv\ncsv_dir = /tmp/bars\nlookback_days = 182\n\
             [pipeline]\nsuccess_delay_ms = 0\nsma_period = 50\n\
             [report]\nverdict_labels = decorated\ncurrency_rounding = off\n",
        )
        .unwrap();
        let settings = Settings::from_config(&config).unwrap();
        assert_eq!(settings.source.index, "NIFTY 50");
        assert_eq!(settings.price.provider, PriceProvider::Csv);
        assert_eq!(settings.price.csv_dir, PathBuf::from("/tmp/bars"));
        assert_eq!(settings.pipeline.price_lookback_days, 182);
        assert_eq!(settings.pipeline.success_delay, Duration::ZERO);
        assert_eq!(settings.pipeline.failure_delay, Duration::from_millis(1000));
        assert_eq!(settings.pipeline.sma_period, 50);
        assert_eq!(settings.report.policy.verdict_labels, VerdictLabels::Decorated);
        assert_eq!(settings.report.policy.currency_rounding, CurrencyRounding::Off);
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let config = FileConfigAdapter::from_string("[price]\nprovider = bloomberg\n").unwrap();
        assert!(matches!(
            Settings::from_config(&config),
            Err(SmartMoneyError::ConfigInvalid { key, .. }) if key == "provider"
        ));
    }
}
