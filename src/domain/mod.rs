//! Core domain types and logic.

pub mod config_validation;
pub mod diff;
pub mod error;
pub mod flow;
pub mod ohlcv;
pub mod ownership;
pub mod qualification;
pub mod report;
pub mod settings;
pub mod technical;
pub mod trend;
