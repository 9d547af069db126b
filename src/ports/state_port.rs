//! Run-state store port trait.

use crate::domain::error::SmartMoneyError;
use std::collections::BTreeSet;

/// Holds the qualifying set of the most recent run.
pub trait RunStatePort {
    /// `Ok(None)` when no run has been recorded yet.
    fn read_snapshot(&self) -> Result<Option<BTreeSet<String>>, SmartMoneyError>;

    /// Replace the stored snapshot entirely.
    fn write_snapshot(&self, symbols: &BTreeSet<String>) -> Result<(), SmartMoneyError>;
}
