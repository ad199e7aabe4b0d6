use std::fs::{File, OpenOptions};
use std::io::Write;

use chrono::Utc;
use serde_json::{Value, json};
use tracing::warn;

/// How much of each HTTP exchange ends up in the request log.
pub enum RequestLogMode {
    /// Requests, response bodies, errors and inbound notifications.
    Full,
    /// Same, minus response bodies.
    StatusOnly,
}

pub(crate) struct RequestLogger {
    mode: RequestLogMode,
    file: File,
}

impl RequestLogger {
    pub fn new(mode: RequestLogMode, path: &str) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { mode, file })
    }

    pub fn log_request(&mut self, operation: &str, method: &str, url: &str) {
        let entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "req",
            "op": operation,
            "method": method,
            "url": url,
        });
        self.write_line(&entry);
    }

    pub fn log_response(&mut self, operation: &str, body: &str) {
        let entry = match self.mode {
            RequestLogMode::Full => json!({
                "ts": Utc::now().to_rfc3339(),
                "dir": "resp",
                "op": operation,
                "status": 200,
                "body": body,
            }),
            RequestLogMode::StatusOnly => json!({
                "ts": Utc::now().to_rfc3339(),
                "dir": "resp",
                "op": operation,
                "status": 200,
            }),
        };
        self.write_line(&entry);
    }

    pub fn log_error(&mut self, operation: &str, error: &crate::Error) {
        let entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "err",
            "op": operation,
            "error": error.to_string(),
        });
        self.write_line(&entry);
    }

    pub fn log_notification(&mut self, characteristic: &str, value: i64) {
        let entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "notify",
            "characteristic": characteristic,
            "value": value,
        });
        self.write_line(&entry);
    }

    fn write_line(&mut self, entry: &Value) {
        if let Ok(line) = serde_json::to_string(entry)
            && let Err(e) = writeln!(self.file, "{line}")
        {
            warn!("failed to write log entry: {e}");
        }
    }
}
