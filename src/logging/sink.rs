//! Log sinks: the tracing-backed default and an in-memory recorder.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Severity of a diagnostic line.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Severity {
    /// The run cannot continue.
    Fatal,
    Error,
    Warn,
    Info,
    Debug,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Fatal => "FATAL",
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
        };
        f.write_str(label)
    }
}

/// Destination for the engine's diagnostics.
///
/// `origin` names the component that emitted the line (a machine name or
/// `"signal"`).
pub trait LogSink: Send + Sync {
    fn emit(&self, severity: Severity, origin: &str, message: &str);
}

/// Shared handle to a sink, as stored by machines and signals.
pub type SharedSink = Arc<dyn LogSink>;

/// The sink used when none is injected.
pub fn default_sink() -> SharedSink {
    Arc::new(TracingSink)
}

/// Forwards every line to `tracing`.
///
/// `tracing` has no fatal level, so fatal lines are emitted at `ERROR` with
/// a `fatal = true` field.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, severity: Severity, origin: &str, message: &str) {
        match severity {
            Severity::Fatal => tracing::error!(fatal = true, origin, "{message}"),
            Severity::Error => tracing::error!(origin, "{message}"),
            Severity::Warn => tracing::warn!(origin, "{message}"),
            Severity::Info => tracing::info!(origin, "{message}"),
            Severity::Debug => tracing::debug!(origin, "{message}"),
        }
    }
}

/// One line captured by a [`MemorySink`].
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct LogRecord {
    pub severity: Severity,
    pub origin: String,
    pub message: String,
}

/// Keeps every line in memory so callers can inspect what was logged.
///
/// # Example
///
/// ```rust
/// use cadence::logging::{LogSink, MemorySink, Severity};
///
/// let sink = MemorySink::new();
/// sink.emit(Severity::Fatal, "machine", "no transition");
///
/// assert_eq!(sink.count(Severity::Fatal), 1);
/// assert!(sink.contains(Severity::Fatal, "no transition"));
/// ```
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<LogRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor returning the sink already shared.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.records
            .lock()
            .iter()
            .filter(|r| r.severity == severity)
            .count()
    }

    /// Whether any line at `severity` contains `needle`.
    pub fn contains(&self, severity: Severity, needle: &str) -> bool {
        self.records
            .lock()
            .iter()
            .any(|r| r.severity == severity && r.message.contains(needle))
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl LogSink for MemorySink {
    fn emit(&self, severity: Severity, origin: &str, message: &str) {
        self.records.lock().push(LogRecord {
            severity,
            origin: origin.to_string(),
            message: message.to_string(),
        });
    }
}
