//! Ownership trend extraction.
//!
//! Shareholding disclosures arrive most-recent quarter first. The extractor
//! takes the three most recent quarters and returns them oldest-first so the
//! classifier can read them in chronological order.

/// Number of quarters a trend decision needs.
pub const TREND_QUARTERS: usize = 3;

/// One quarterly disclosure as received from the ownership source.
///
/// Holding figures are kept as text; sources deliver them either as JSON
/// numbers or as numeric strings and parsing is deferred to extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct RawQuarter {
    pub foreign: String,
    pub domestic: String,
}

impl RawQuarter {
    pub fn new(foreign: impl Into<String>, domestic: impl Into<String>) -> Self {
        Self {
            foreign: foreign.into(),
            domestic: domestic.into(),
        }
    }
}

/// Parsed holding percentages for one quarter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OwnershipQuarter {
    pub foreign_pct: f64,
    pub domestic_pct: f64,
}

/// Three quarters of holdings per institution type, oldest-first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OwnershipTrend {
    pub foreign: [f64; 3],
    pub domestic: [f64; 3],
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrendError {
    #[error("need {TREND_QUARTERS} quarters, have {have}")]
    NoTrend { have: usize },

    #[error("invalid {field} value {value:?} in quarter {quarter}")]
    Parse {
        field: &'static str,
        value: String,
        quarter: usize,
    },
}

fn parse_pct(raw: &str, field: &'static str, quarter: usize) -> Result<f64, TrendError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| TrendError::Parse {
            field,
            value: raw.to_string(),
            quarter,
        })
}

impl OwnershipQuarter {
    pub fn parse(raw: &RawQuarter, quarter: usize) -> Result<Self, TrendError> {
        Ok(Self {
            foreign_pct: parse_pct(&raw.foreign, "foreign", quarter)?,
            domestic_pct: parse_pct(&raw.domestic, "domestic", quarter)?,
        })
    }
}

/// Extract the three most recent quarters, oldest-first.
///
/// `quarters` must be most-recent-first. Fewer than three records yields
/// [`TrendError::NoTrend`] regardless of content; only the selected three
/// are parsed.
pub fn extract_trend(quarters: &[RawQuarter]) -> Result<OwnershipTrend, TrendError> {
    if quarters.len() < TREND_QUARTERS {
        return Err(TrendError::NoTrend {
            have: quarters.len(),
        });
    }

    let mut foreign = [0.0; TREND_QUARTERS];
    let mut domestic = [0.0; TREND_QUARTERS];

    for (i, raw) in quarters[..TREND_QUARTERS].iter().enumerate() {
        let parsed = OwnershipQuarter::parse(raw, i)?;
        // index 0 is newest; store it last
        let slot = TREND_QUARTERS - 1 - i;
        foreign[slot] = parsed.foreign_pct;
        domestic[slot] = parsed.domestic_pct;
    }

    Ok(OwnershipTrend { foreign, domestic })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(f: &str, d: &str) -> RawQuarter {
        RawQuarter::new(f, d)
    }

    #[test]
    fn extracts_oldest_first() {
        let quarters = vec![q("15", "7"), q("12", "6"), q("10", "5")];
        let trend = extract_trend(&quarters).unwrap();
        assert_eq!(trend.foreign, [10.0, 12.0, 15.0]);
        assert_eq!(trend.domestic, [5.0, 6.0, 7.0]);
    }

    #[test]
    fn uses_only_three_most_recent() {
        let quarters = vec![
            q("15", "7"),
            q("12", "6"),
            q("10", "5"),
            q("not a number", "x"),
        ];
        let trend = extract_trend(&quarters).unwrap();
        assert_eq!(trend.foreign, [10.0, 12.0, 15.0]);
    }

    #[test]
    fn fewer_than_three_is_no_trend() {
        assert_eq!(extract_trend(&[]), Err(TrendError::NoTrend { have: 0 }));
        assert_eq!(
            extract_trend(&[q("1", "1"), q("2", "2")]),
            Err(TrendError::NoTrend { have: 2 })
        );
        // content is irrelevant when too short
        assert_eq!(
            extract_trend(&[q("bad", "bad")]),
            Err(TrendError::NoTrend { have: 1 })
        );
    }

    #[test]
    fn parse_failure_reports_field() {
        let quarters = vec![q("15", "7"), q("12", "n/a"), q("10", "5")];
        match extract_trend(&quarters) {
            Err(TrendError::Parse {
                field, quarter, ..
            }) => {
                assert_eq!(field, "domestic");
                assert_eq!(quarter, 1);
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn non_finite_values_are_parse_errors() {
        for bad in ["NaN", "inf", "-infinity"] {
            let quarters = vec![q("15", "7"), q(bad, "6"), q("10", "5")];
            assert!(
                matches!(extract_trend(&quarters), Err(TrendError::Parse { field: "foreign", quarter: 1, .. })),
                "{bad} should not parse"
            );
        }
    }

    #[test]
    fn accepts_padded_decimals() {
        let quarters = vec![q(" 21.35 ", "14.2"), q("20.9", "13.95"), q("20.1", "13.7")];
        let trend = extract_trend(&quarters).unwrap();
        assert_eq!(trend.foreign, [20.1, 20.9, 21.35]);
        assert_eq!(trend.domestic, [13.7, 13.95, 14.2]);
    }
}
