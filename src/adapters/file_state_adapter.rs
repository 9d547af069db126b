//! Flat-file run-state store: one symbol per line, fully rewritten each run.

use crate::domain::error::SmartMoneyError;
use crate::ports::state_port::RunStatePort;
use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

pub struct FileStateAdapter {
    path: PathBuf,
}

impl FileStateAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Parse newline-separated symbols, ignoring blank lines and padding.
    pub fn parse_symbols(content: &str) -> BTreeSet<String> {
        content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl RunStatePort for FileStateAdapter {
    fn read_snapshot(&self) -> Result<Option<BTreeSet<String>>, SmartMoneyError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(Self::parse_symbols(&content))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SmartMoneyError::StateStore {
                reason: format!("failed to read {}: {}", self.path.display(), e),
            }),
        }
    }

    fn write_snapshot(&self, symbols: &BTreeSet<String>) -> Result<(), SmartMoneyError> {
        let content = symbols.iter().cloned().collect::<Vec<_>>().join("\n");
        fs::write(&self.path, content).map_err(|e| SmartMoneyError::StateStore {
            reason: format!("failed to write {}: {}", self.path.display(), e),
        })
    }
}
