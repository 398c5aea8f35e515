//! Diagnostics sink passed explicitly into every hub operation.
//!
//! Operations never log through a process-wide handle of their own; callers
//! hand in a `Progress` so tests can capture what was reported and hosts can
//! route messages wherever they like.

use std::sync::Mutex;
use tracing::{debug, info, warn};

/// Receiver for operator-facing messages emitted during scans and placements.
pub trait Progress: Send + Sync {
    /// Normal progress message.
    fn message(&self, message: &str);

    /// Something was skipped or degraded but the operation continues.
    fn warning(&self, message: &str);

    /// Fine-grained detail, off by default in most sinks.
    fn verbose(&self, message: &str) {
        let _ = message;
    }
}

/// Forwards progress messages to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl Progress for TracingProgress {
    fn message(&self, message: &str) {
        info!(target: "repohub", "{}", message);
    }

    fn warning(&self, message: &str) {
        warn!(target: "repohub", "{}", message);
    }

    fn verbose(&self, message: &str) {
        debug!(target: "repohub", "{}", message);
    }
}

/// Severity of a captured progress entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressLevel {
    Message,
    Warning,
    Verbose,
}

/// Records every message it receives, in order.
#[derive(Debug, Default)]
pub struct CapturedProgress {
    entries: Mutex<Vec<(ProgressLevel, String)>>,
}

impl CapturedProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured entries, oldest first.
    pub fn entries(&self) -> Vec<(ProgressLevel, String)> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Captured texts at one level.
    pub fn texts(&self, level: ProgressLevel) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, text)| text)
            .collect()
    }

    fn push(&self, level: ProgressLevel, message: &str) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((level, message.to_string()));
    }
}

impl Progress for CapturedProgress {
    fn message(&self, message: &str) {
        self.push(ProgressLevel::Message, message);
    }

    fn warning(&self, message: &str) {
        self.push(ProgressLevel::Warning, message);
    }

    fn verbose(&self, message: &str) {
        self.push(ProgressLevel::Verbose, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captured_progress_keeps_order_and_levels() {
        let progress = CapturedProgress::new();
        progress.message("scanning");
        progress.warning("skipped broken");
        progress.verbose("detail");

        let entries = progress.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], (ProgressLevel::Message, "scanning".to_string()));
        assert_eq!(progress.texts(ProgressLevel::Warning), vec!["skipped broken"]);
    }

    #[test]
    fn test_tracing_progress_is_usable_as_trait_object() {
        let progress: &dyn Progress = &TracingProgress;
        progress.message("hello");
        progress.warning("careful");
        progress.verbose("quiet");
    }
}
