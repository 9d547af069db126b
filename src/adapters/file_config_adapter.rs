//! INI file configuration adapter.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    /// No keys at all; every lookup falls back to its default.
    pub fn empty() -> Self {
        Self { config: Ini::new() }
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[source]
base_url = https://www.nseindia.com
index = NIFTY 200

[pipeline]
sma_period = 200
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("source", "index"),
            Some("NIFTY 200".to_string())
        );
        assert_eq!(adapter.get_int("pipeline", "sma_period", 0), 200);
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[source]\nindex = NIFTY 50\n").unwrap();
        assert_eq!(adapter.get_string("source", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_int_returns_default_for_missing() {
        let adapter = FileConfigAdapter::from_string("[pipeline]\n").unwrap();
        assert_eq!(adapter.get_int("pipeline", "missing", 42), 42);
    }

    #[test]
    fn get_int_returns_default_for_non_numeric() {
        let adapter = FileConfigAdapter::from_string("[pipeline]\nflow_window = abc\n").unwrap();
        assert_eq!(adapter.get_int("pipeline", "flow_window", 15), 15);
    }

    #[test]
    fn get_bool_accepts_on_off() {
        let adapter =
            FileConfigAdapter::from_string("[report]\na = on\nb = off\nc = yes\nd = 0\n").unwrap();
        assert!(adapter.get_bool("report", "a", false));
        assert!(!adapter.get_bool("report", "b", true));
        assert!(adapter.get_bool("report", "c", false));
        assert!(!adapter.get_bool("report", "d", true));
    }

    #[test]
    fn get_bool_returns_default_for_missing_or_garbage() {
        let adapter = FileConfigAdapter::from_string("[report]\nx = maybe\n").unwrap();
        assert!(adapter.get_bool("report", "missing", true));
        assert!(!adapter.get_bool("report", "x", false));
    }

    #[test]
    fn empty_has_no_keys() {
        let adapter = FileConfigAdapter::empty();
        assert_eq!(adapter.get_string("source", "index"), None);
        assert_eq!(adapter.get_int("pipeline", "sma_period", 200), 200);
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[state]\npath = /var/lib/smartmoney/prev.txt\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("state", "path"),
            Some("/var/lib/smartmoney/prev.txt".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/config.ini");
        assert!(result.is_err());
    }
}
