// Activity sink trait - user-facing log lines and alerts
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Warning,
    Error,
}

/// Never fails and is never consulted for control flow.
pub trait ActivitySink: Send + Sync {
    fn log(&self, text: &str);
    fn alert(&self, text: &str, severity: Severity);
}
