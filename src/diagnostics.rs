//! Diagnostic sinks
//!
//! The configuration store is built before the logging subscriber exists, so
//! it never talks to `tracing` directly. It reports through a
//! [`DiagnosticSink`]: [`StderrSink`] during bootstrap, [`TracingSink`] once
//! logging has been set up from the resolved configuration.

use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

/// Logging categories, one per logical subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogCategory {
    Rpc,
    Xml,
    Cfg,
    Alert,
    Sig,
    Plugin,
    Avc,
    Email,
    Gui,
    GuiData,
    Program,
    Database,
    Server,
    Dbus,
    Stats,
    Communication,
    Subprocess,
}

impl LogCategory {
    pub const ALL: [LogCategory; 17] = [
        LogCategory::Rpc,
        LogCategory::Xml,
        LogCategory::Cfg,
        LogCategory::Alert,
        LogCategory::Sig,
        LogCategory::Plugin,
        LogCategory::Avc,
        LogCategory::Email,
        LogCategory::Gui,
        LogCategory::GuiData,
        LogCategory::Program,
        LogCategory::Database,
        LogCategory::Server,
        LogCategory::Dbus,
        LogCategory::Stats,
        LogCategory::Communication,
        LogCategory::Subprocess,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LogCategory::Rpc => "rpc",
            LogCategory::Xml => "xml",
            LogCategory::Cfg => "cfg",
            LogCategory::Alert => "alert",
            LogCategory::Sig => "sig",
            LogCategory::Plugin => "plugin",
            LogCategory::Avc => "avc",
            LogCategory::Email => "email",
            LogCategory::Gui => "gui",
            LogCategory::GuiData => "gui_data",
            LogCategory::Program => "program",
            LogCategory::Database => "database",
            LogCategory::Server => "server",
            LogCategory::Dbus => "dbus",
            LogCategory::Stats => "stats",
            LogCategory::Communication => "communication",
            LogCategory::Subprocess => "subprocess",
        }
    }
}

impl fmt::Display for LogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogCategory::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown log category '{}'", s))
    }
}

/// Diagnostic severity, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical,
    Error,
    Warning,
    Info,
    Debug,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Debug => "debug",
        }
    }

    /// Map a numeric level (50 critical ... 10 debug) onto a severity.
    pub fn from_numeric(level: i64) -> Self {
        match level {
            l if l >= 50 => Severity::Critical,
            l if l >= 40 => Severity::Error,
            l if l >= 30 => Severity::Warning,
            l if l >= 20 => Severity::Info,
            _ => Severity::Debug,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    /// Symbolic names are case-insensitive; integers are accepted too.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(numeric) = s.parse::<i64>() {
            return Ok(Severity::from_numeric(numeric));
        }
        match s.to_lowercase().as_str() {
            "critical" => Ok(Severity::Critical),
            "error" => Ok(Severity::Error),
            "warning" | "warn" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            "debug" => Ok(Severity::Debug),
            _ => Err(format!("unknown log level '{}'", s)),
        }
    }
}

/// A single recorded diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: LogCategory,
    pub severity: Severity,
    pub message: String,
}

/// Destination for diagnostics emitted by the configuration store.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, category: LogCategory, severity: Severity, message: &str);

    fn error(&self, category: LogCategory, message: &str) {
        self.emit(category, Severity::Error, message);
    }

    fn warning(&self, category: LogCategory, message: &str) {
        self.emit(category, Severity::Warning, message);
    }

    fn debug(&self, category: LogCategory, message: &str) {
        self.emit(category, Severity::Debug, message);
    }
}

/// Bootstrap sink used before logging is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl DiagnosticSink for StderrSink {
    fn emit(&self, _category: LogCategory, severity: Severity, message: &str) {
        // Debug chatter is noise on a bare terminal
        if severity == Severity::Debug {
            return;
        }
        eprintln!("{}: {}", severity, message);
    }
}

/// Forwards diagnostics to `tracing`, using the category name as the target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

macro_rules! forward {
    ($severity:expr, $target:literal, $message:expr) => {
        match $severity {
            Severity::Critical | Severity::Error => {
                tracing::error!(target: $target, "{}", $message)
            }
            Severity::Warning => tracing::warn!(target: $target, "{}", $message),
            Severity::Info => tracing::info!(target: $target, "{}", $message),
            Severity::Debug => tracing::debug!(target: $target, "{}", $message),
        }
    };
}

impl DiagnosticSink for TracingSink {
    fn emit(&self, category: LogCategory, severity: Severity, message: &str) {
        match category {
            LogCategory::Rpc => forward!(severity, "rpc", message),
            LogCategory::Xml => forward!(severity, "xml", message),
            LogCategory::Cfg => forward!(severity, "cfg", message),
            LogCategory::Alert => forward!(severity, "alert", message),
            LogCategory::Sig => forward!(severity, "sig", message),
            LogCategory::Plugin => forward!(severity, "plugin", message),
            LogCategory::Avc => forward!(severity, "avc", message),
            LogCategory::Email => forward!(severity, "email", message),
            LogCategory::Gui => forward!(severity, "gui", message),
            LogCategory::GuiData => forward!(severity, "gui_data", message),
            LogCategory::Program => forward!(severity, "program", message),
            LogCategory::Database => forward!(severity, "database", message),
            LogCategory::Server => forward!(severity, "server", message),
            LogCategory::Dbus => forward!(severity, "dbus", message),
            LogCategory::Stats => forward!(severity, "stats", message),
            LogCategory::Communication => forward!(severity, "communication", message),
            LogCategory::Subprocess => forward!(severity, "subprocess", message),
        }
    }
}

/// Keeps every diagnostic in memory. Handy for embedding and tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<Diagnostic> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Records at the given severity.
    pub fn at(&self, severity: Severity) -> Vec<Diagnostic> {
        self.records()
            .into_iter()
            .filter(|d| d.severity == severity)
            .collect()
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, category: LogCategory, severity: Severity, message: &str) {
        let record = Diagnostic {
            category,
            severity,
            message: message.to_string(),
        };
        match self.records.lock() {
            Ok(mut records) => records.push(record),
            Err(poisoned) => poisoned.into_inner().push(record),
        }
    }
}
