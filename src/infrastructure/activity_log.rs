// Activity log - bounded newest-first feed mirrored into tracing
use crate::application::activity_sink::{ActivitySink, Severity};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

const MAX_ENTRIES: usize = 60;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityEntry {
    pub time: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

#[derive(Debug, Default)]
pub struct ActivityLog {
    entries: Mutex<VecDeque<ActivityEntry>>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Newest first.
    pub fn entries(&self) -> Vec<ActivityEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.log("Log cleared");
    }

    fn push(&self, text: &str, severity: Option<Severity>) {
        let entry = ActivityEntry {
            time: chrono::Local::now().format("%H:%M:%S").to_string(),
            text: text.to_string(),
            severity,
        };
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.push_front(entry);
        entries.truncate(MAX_ENTRIES);
    }
}

impl ActivitySink for ActivityLog {
    fn log(&self, text: &str) {
        tracing::info!(target: "activity", "{}", text);
        self.push(text, None);
    }

    fn alert(&self, text: &str, severity: Severity) {
        match severity {
            Severity::Error | Severity::Warning => {
                tracing::warn!(target: "activity", ?severity, "{}", text)
            }
            Severity::Success => tracing::info!(target: "activity", ?severity, "{}", text),
        }
        self.push(text, Some(severity));
    }
}
