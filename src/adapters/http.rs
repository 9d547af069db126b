//! Shared blocking HTTP plumbing for the network adapters.

use crate::domain::error::SmartMoneyError;
use reqwest::blocking::{Client, Response};
use serde_json::Value;
use std::time::Duration;

pub fn build_client(timeout: Duration, user_agent: &str) -> Result<Client, SmartMoneyError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
        .map_err(|e| SmartMoneyError::Fetch {
            target: "http client".to_string(),
            reason: e.to_string(),
        })
}

pub fn fetch_error(target: &str, err: reqwest::Error) -> SmartMoneyError {
    let reason = if err.is_timeout() {
        format!("timed out: {}", err)
    } else {
        err.to_string()
    };
    SmartMoneyError::Fetch {
        target: target.to_string(),
        reason,
    }
}

/// Decode a response body as JSON, whatever its shape.
pub fn json_body(target: &str, resp: Response) -> Result<Value, SmartMoneyError> {
    resp.json::<Value>().map_err(|e| SmartMoneyError::Parse {
        target: target.to_string(),
        reason: format!("invalid JSON: {}", e),
    })
}

/// Render a JSON scalar as text: numbers and strings keep their value,
/// everything else becomes empty.
pub fn value_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}
