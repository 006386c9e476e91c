//! setroubleshoot configuration
//!
//! Layered configuration store shared by the setroubleshoot daemon and its
//! clients: a catalog of known sections and options with defaults, merged
//! with the on-disk config file, with read-only enforcement, typed accessors
//! and `section.option=value` runtime overrides.

pub mod config;
pub mod diagnostics;
pub mod logging;
pub mod types;

pub use config::{ConfigStore, ConfigValue, ValueKind};
pub use diagnostics::{DiagnosticSink, LogCategory, Severity};
pub use types::ConfigError;
