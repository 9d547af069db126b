//! Run-over-run differ.
//!
//! Compares the current qualifying set with the one persisted by the
//! previous run. Only one prior run is ever kept; the caller replaces it
//! once the run's artifacts are safely written.

use crate::domain::error::SmartMoneyError;
use crate::ports::state_port::RunStatePort;
use std::collections::BTreeSet;
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    pub added: BTreeSet<String>,
    pub removed: BTreeSet<String>,
}

impl DiffResult {
    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// `added = current - previous`, `removed = previous - current`.
pub fn compute_diff(previous: &BTreeSet<String>, current: &BTreeSet<String>) -> DiffResult {
    DiffResult {
        added: current.difference(previous).cloned().collect(),
        removed: previous.difference(current).cloned().collect(),
    }
}

/// Diff against the stored snapshot without touching it.
pub fn preview(
    store: &dyn RunStatePort,
    current: &BTreeSet<String>,
) -> Result<DiffResult, SmartMoneyError> {
    let previous = store.read_snapshot()?.unwrap_or_default();
    Ok(compute_diff(&previous, current))
}

/// The previous run's set. A missing or unreadable snapshot counts as no
/// previous run.
pub fn load_previous(store: &dyn RunStatePort) -> BTreeSet<String> {
    match store.read_snapshot() {
        Ok(previous) => previous.unwrap_or_default(),
        Err(e) => {
            warn!(error = %e, "previous run state unreadable, treating as first run");
            BTreeSet::new()
        }
    }
}
