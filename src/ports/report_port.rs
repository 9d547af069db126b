//! Report sink port trait.

use crate::domain::error::SmartMoneyError;
use crate::domain::report::ReportTable;
use chrono::NaiveDateTime;

/// Port for persisting the two run artifacts.
pub trait ReportPort {
    /// Persist the table and return where it went.
    fn write_table(
        &self,
        table: &ReportTable,
        generated_at: NaiveDateTime,
    ) -> Result<String, SmartMoneyError>;

    /// Persist the summary text and return where it went.
    fn write_summary(&self, summary: &str) -> Result<String, SmartMoneyError>;
}
