//! Configuration validation.
//!
//! Validates all config fields before a run starts. Absent keys are fine;
//! present keys must hold usable values.

use crate::domain::error::SmartMoneyError;
use crate::domain::report::VerdictLabels;
use crate::domain::settings::PriceProvider;
use crate::ports::config_port::ConfigPort;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), SmartMoneyError> {
    validate_index(config)?;
    validate_urls(config)?;
    validate_timeout(config)?;
    validate_delays(config)?;
    validate_positive(config, "pipeline", "sma_period")?;
    validate_positive(config, "pipeline", "flow_window")?;
    validate_positive(config, "price", "lookback_days")?;
    validate_price_provider(config)?;
    validate_verdict_labels(config)?;
    validate_report_names(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> SmartMoneyError {
    SmartMoneyError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_index(config: &dyn ConfigPort) -> Result<(), SmartMoneyError> {
    match config.get_string("source", "index") {
        Some(s) if s.trim().is_empty() => Err(invalid("source", "index", "index must not be empty")),
        _ => Ok(()),
    }
}

fn validate_urls(config: &dyn ConfigPort) -> Result<(), SmartMoneyError> {
    for section in ["source", "price"] {
        if let Some(url) = config.get_string(section, "base_url") {
            let url = url.trim();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(invalid(
                    section,
                    "base_url",
                    "base_url must start with http:// or https://",
                ));
            }
        }
    }
    Ok(())
}

fn validate_timeout(config: &dyn ConfigPort) -> Result<(), SmartMoneyError> {
    if config.get_string("source", "timeout_secs").is_some()
        && config.get_int("source", "timeout_secs", 0) <= 0
    {
        return Err(invalid(
            "source",
            "timeout_secs",
            "timeout_secs must be a positive integer",
        ));
    }
    Ok(())
}

fn validate_delays(config: &dyn ConfigPort) -> Result<(), SmartMoneyError> {
    for key in ["success_delay_ms", "failure_delay_ms"] {
        if config.get_string("pipeline", key).is_some() && config.get_int("pipeline", key, -1) < 0 {
            return Err(invalid(
                "pipeline",
                key,
                format!("{} must be a non-negative integer", key),
            ));
        }
    }
    Ok(())
}

fn validate_positive(config: &dyn ConfigPort, section: &str, key: &str) -> Result<(), SmartMoneyError> {
    if config.get_string(section, key).is_some() && config.get_int(section, key, 0) <= 0 {
        return Err(invalid(
            section,
            key,
            format!("{} must be a positive integer", key),
        ));
    }
    Ok(())
}

fn validate_price_provider(config: &dyn ConfigPort) -> Result<(), SmartMoneyError> {
    let Some(value) = config.get_string("price", "provider") else {
        return Ok(());
    };
    match PriceProvider::parse(&value) {
        Some(_) => Ok(()),
        None => Err(invalid("price", "provider", "provider must be yahoo or csv")),
    }
}

fn validate_verdict_labels(config: &dyn ConfigPort) -> Result<(), SmartMoneyError> {
    match config.get_string("report", "verdict_labels") {
        Some(v) if VerdictLabels::parse(&v).is_none() => Err(invalid(
            "report",
            "verdict_labels",
            "verdict_labels must be plain or decorated",
        )),
        _ => Ok(()),
    }
}

fn validate_report_names(config: &dyn ConfigPort) -> Result<(), SmartMoneyError> {
    for key in ["file_prefix", "summary_file"] {
        if let Some(name) = config.get_string("report", key) {
            if name.contains('/') || name.contains('\\') {
                return Err(invalid(
                    "report",
                    key,
                    format!("{} must be a file name, not a path", key),
                ));
            }
        }
    }
    Ok(())
}
