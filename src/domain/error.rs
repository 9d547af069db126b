//! Domain error types.

use std::fmt;

/// Top-level error type for smartmoney.
#[derive(Debug, thiserror::Error)]
pub enum SmartMoneyError {
    #[error("fetch failed for {target}: {reason}")]
    Fetch { target: String, reason: String },

    #[error("parse error for {target}: {reason}")]
    Parse { target: String, reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("run state error: {reason}")]
    StateStore { reason: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&SmartMoneyError> for std::process::ExitCode {
    fn from(err: &SmartMoneyError) -> Self {
        let code: u8 = match err {
            SmartMoneyError::Io(_) => 1,
            SmartMoneyError::ConfigParse { .. } | SmartMoneyError::ConfigInvalid { .. } => 2,
            SmartMoneyError::Fetch { .. } | SmartMoneyError::Parse { .. } => 3,
            SmartMoneyError::StateStore { .. } | SmartMoneyError::Report { .. } => 4,
            SmartMoneyError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

/// Why a symbol dropped out of the qualifying set.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// Ownership source returned nothing for the symbol.
    NoOwnershipData,
    /// Fewer than three quarterly records.
    InsufficientData { quarters: usize },
    /// Network or transport failure while fetching ownership.
    FetchFailed { reason: String },
    /// A holding figure could not be read as a number.
    ParseFailed { reason: String },
    /// Data was complete but the trend was not strictly rising for both
    /// institution types.
    TrendNotRising,
}

impl SkipReason {
    pub fn kind(&self) -> SkipKind {
        match self {
            SkipReason::NoOwnershipData => SkipKind::NoOwnershipData,
            SkipReason::InsufficientData { .. } => SkipKind::InsufficientData,
            SkipReason::FetchFailed { .. } => SkipKind::FetchFailed,
            SkipReason::ParseFailed { .. } => SkipKind::ParseFailed,
            SkipReason::TrendNotRising => SkipKind::TrendNotRising,
        }
    }

    /// Failures get the longer backoff; plain non-qualification does not.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            SkipReason::FetchFailed { .. } | SkipReason::ParseFailed { .. }
        )
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoOwnershipData => write!(f, "no ownership data"),
            SkipReason::InsufficientData { quarters } => {
                write!(f, "only {} quarters of ownership data", quarters)
            }
            SkipReason::FetchFailed { reason } => write!(f, "fetch failed: {}", reason),
            SkipReason::ParseFailed { reason } => write!(f, "parse failed: {}", reason),
            SkipReason::TrendNotRising => write!(f, "ownership trend not rising"),
        }
    }
}

/// Payload-free discriminant of [`SkipReason`], used for counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SkipKind {
    NoOwnershipData,
    InsufficientData,
    FetchFailed,
    ParseFailed,
    TrendNotRising,
}

impl SkipKind {
    pub const ALL: [SkipKind; 5] = [
        SkipKind::NoOwnershipData,
        SkipKind::InsufficientData,
        SkipKind::FetchFailed,
        SkipKind::ParseFailed,
        SkipKind::TrendNotRising,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SkipKind::NoOwnershipData => "no_data",
            SkipKind::InsufficientData => "insufficient_data",
            SkipKind::FetchFailed => "fetch_failed",
            SkipKind::ParseFailed => "parse_failed",
            SkipKind::TrendNotRising => "not_rising",
        }
    }
}
