//! File report adapter implementing ReportPort.
//!
//! The table goes to `<dir>/<prefix>_<YYYYMMDD_HHMM>.csv`, which any
//! spreadsheet opens; the summary goes to a fixed-name text file.

use crate::domain::error::SmartMoneyError;
use crate::domain::report::ReportTable;
use crate::ports::report_port::ReportPort;
use chrono::NaiveDateTime;
use std::fs;
use std::path::{Path, PathBuf};

pub struct FileReportAdapter {
    output_dir: PathBuf,
    file_prefix: String,
    summary_file: String,
}

impl FileReportAdapter {
    pub fn new(output_dir: PathBuf, file_prefix: String, summary_file: String) -> Self {
        Self {
            output_dir,
            file_prefix,
            summary_file,
        }
    }

    pub fn table_file_name(&self, generated_at: NaiveDateTime) -> String {
        format!(
            "{}_{}.csv",
            self.file_prefix,
            generated_at.format("%Y%m%d_%H%M")
        )
    }

    fn ensure_dir(&self) -> Result<(), SmartMoneyError> {
        fs::create_dir_all(&self.output_dir).map_err(|e| SmartMoneyError::Report {
            reason: format!("failed to create {}: {}", self.output_dir.display(), e),
        })
    }
}

fn path_string(path: &Path) -> String {
    path.display().to_string()
}

impl ReportPort for FileReportAdapter {
    fn write_table(
        &self,
        table: &ReportTable,
        generated_at: NaiveDateTime,
    ) -> Result<String, SmartMoneyError> {
        self.ensure_dir()?;
        let path = self.output_dir.join(self.table_file_name(generated_at));
        let report_err = |e: csv::Error| SmartMoneyError::Report {
            reason: format!("failed to write {}: {}", path.display(), e),
        };

        let mut writer = csv::Writer::from_path(&path).map_err(report_err)?;
        writer.write_record(&table.headers).map_err(report_err)?;
        for row in &table.rows {
            writer.write_record(row).map_err(report_err)?;
        }
        writer.flush()?;

        Ok(path_string(&path))
    }

    fn write_summary(&self, summary: &str) -> Result<String, SmartMoneyError> {
        self.ensure_dir()?;
        let path = self.output_dir.join(&self.summary_file);
        fs::write(&path, summary).map_err(|e| SmartMoneyError::Report {
            reason: format!("failed to write {}: {}", path.display(), e),
        })?;
        Ok(path_string(&path))
    }
}
