//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod file_config_adapter;
pub mod file_report_adapter;
pub mod file_state_adapter;
pub mod http;
pub mod nse_adapter;
pub mod yahoo_adapter;
