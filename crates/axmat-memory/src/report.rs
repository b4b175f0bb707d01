//! Failure reporting.
//!
//! Arena and matrix operations never abort the process. Every notable event
//! (informational notices, recoverable warnings, and fatal failures that are
//! about to be returned as errors) is handed to a [`Reporter`]. The arena
//! carries one, so hosts choose where events go: the default
//! [`TracingReporter`] forwards them to `tracing`, while
//! [`CollectingReporter`] keeps them in memory for inspection.

use std::fmt;

use parking_lot::Mutex;
use tracing::{error, info, warn};

/// Severity of a reported event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Informational notice.
    Info,
    /// Recoverable condition; the operation continued.
    Warn,
    /// The operation failed and returned an error.
    Fatal,
}

impl Severity {
    /// Upper-case label used in log lines.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sink for events raised by arena and matrix operations.
pub trait Reporter: Send + Sync {
    /// Record an event.
    fn report(&self, severity: Severity, message: &str);
}

/// Reporter that forwards events to `tracing` under the `axmat` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Info => info!(target: "axmat", "{message}"),
            Severity::Warn => warn!(target: "axmat", "{message}"),
            Severity::Fatal => error!(target: "axmat", "{message}"),
        }
    }
}

/// Null object pattern: discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpReporter;

impl Reporter for NoOpReporter {
    fn report(&self, _severity: Severity, _message: &str) {
        // Intentionally empty
    }
}

/// One event captured by a [`CollectingReporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Severity of the event.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
}

/// Reporter that keeps every event in memory.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    events: Mutex<Vec<Report>>,
}

impl CollectingReporter {
    /// Create an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<Report> {
        self.events.lock().clone()
    }

    /// Number of recorded events with the given severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|r| r.severity == severity)
            .count()
    }

    /// Total number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Forget all recorded events.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl Reporter for CollectingReporter {
    fn report(&self, severity: Severity, message: &str) {
        self.events.lock().push(Report {
            severity,
            message: message.to_owned(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_labels() {
        assert_eq!(Severity::Info.to_string(), "INFO");
        assert_eq!(Severity::Warn.to_string(), "WARN");
        assert_eq!(Severity::Fatal.to_string(), "FATAL");
    }

    #[test]
    fn severity_ordering() {
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Fatal);
    }

    #[test]
    fn collecting_reporter_records_in_order() {
        let reporter = CollectingReporter::new();
        assert!(reporter.is_empty());

        reporter.report(Severity::Info, "first");
        reporter.report(Severity::Fatal, "second");
        reporter.report(Severity::Info, "third");

        let events = reporter.events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].message, "first");
        assert_eq!(events[1].severity, Severity::Fatal);
        assert_eq!(reporter.count(Severity::Info), 2);
        assert_eq!(reporter.count(Severity::Warn), 0);
    }

    #[test]
    fn collecting_reporter_clear() {
        let reporter = CollectingReporter::new();
        reporter.report(Severity::Warn, "w");
        assert_eq!(reporter.len(), 1);
        reporter.clear();
        assert!(reporter.is_empty());
    }

    #[test]
    fn reporters_are_object_safe() {
        let reporters: Vec<Box<dyn Reporter>> = vec![
            Box::new(TracingReporter),
            Box::new(NoOpReporter),
            Box::new(CollectingReporter::new()),
        ];
        for r in &reporters {
            r.report(Severity::Info, "hello");
        }
    }
}
