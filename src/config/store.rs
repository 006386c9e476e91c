//! Resolved configuration store
//!
//! Built once at startup by overlaying the defaults catalog onto the config
//! file. Lookup precedence for [`ConfigStore::get_option`] (highest first):
//! 1. Caller-supplied overrides (e.g. from the command line)
//! 2. The resolved store (config file, then catalog defaults)
//! 3. The caller's fallback value

use crate::config::catalog;
use crate::config::defaults::{CFG_FILE, CFG_FILE_ENV};
use crate::config::loader::{self, SectionMap};
use crate::config::value::{coerce, ConfigValue, ValueKind};
use crate::diagnostics::{DiagnosticSink, LogCategory, StderrSink};
use crate::types::{ConfigError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Config file location: `$SETROUBLESHOOT_CONFIG` if set, else the compiled-in path.
pub fn config_path() -> PathBuf {
    std::env::var_os(CFG_FILE_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CFG_FILE))
}

pub struct ConfigStore {
    /// Config file read by `init`
    path: PathBuf,

    /// `None` until `init` has run
    sections: Option<SectionMap>,

    /// Where diagnostics go
    sink: Arc<dyn DiagnosticSink>,
}

impl ConfigStore {
    /// Create an uninitialized store reporting to standard error.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_sink(path, Arc::new(StderrSink))
    }

    pub fn with_sink(path: impl Into<PathBuf>, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            path: path.into(),
            sections: None,
            sink,
        }
    }

    /// Create and initialize a store in one step.
    pub fn load(path: impl Into<PathBuf>, sink: Arc<dyn DiagnosticSink>) -> Self {
        let mut store = Self::with_sink(path, sink);
        store.init();
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sink(&self) -> &Arc<dyn DiagnosticSink> {
        &self.sink
    }

    /// Switch diagnostics to another sink, typically once logging is up.
    pub fn set_sink(&mut self, sink: Arc<dyn DiagnosticSink>) {
        self.sink = sink;
    }

    pub fn is_initialized(&self) -> bool {
        self.sections.is_some()
    }

    /// Read the config file and overlay the catalog defaults.
    ///
    /// Calling this again rebuilds the store from scratch, discarding
    /// earlier `set` calls.
    pub fn init(&mut self) {
        let mut sections = match loader::read_file(&self.path) {
            Ok(Some(loaded)) => {
                for key in &loaded.stray_keys {
                    self.sink.warning(
                        LogCategory::Cfg,
                        &format!(
                            "ignoring '{}' in {}: option appears before any section header",
                            key,
                            self.path.display()
                        ),
                    );
                }
                loaded.sections
            }
            Ok(None) => {
                self.sink.debug(
                    LogCategory::Cfg,
                    &format!("no config file at {}, using defaults", self.path.display()),
                );
                SectionMap::new()
            }
            Err(e) => {
                self.sink.error(LogCategory::Cfg, &e.to_string());
                SectionMap::new()
            }
        };

        apply_defaults(&mut sections, self.sink.as_ref());
        self.sections = Some(sections);
    }

    /// `None` only when the store was never initialized.
    pub fn has_section(&self, section: &str) -> Option<bool> {
        self.sections.as_ref().map(|s| s.contains_key(section))
    }

    /// Section names in lexicographic order.
    pub fn sections(&self) -> Vec<&str> {
        self.sections
            .as_ref()
            .map(|s| s.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Option names of a section in lexicographic order.
    pub fn options(&self, section: &str) -> Vec<&str> {
        self.sections
            .as_ref()
            .and_then(|s| s.get(section))
            .map(|options| options.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Stored value without interpolation or coercion.
    pub fn raw_value(&self, section: &str, option: &str) -> Option<&str> {
        self.sections
            .as_ref()?
            .get(section)?
            .get(&loader::normalize_option(option))
            .map(String::as_str)
    }

    /// Read a value, reporting why it could not be produced.
    pub fn try_get(&self, section: &str, option: &str, kind: ValueKind) -> Result<ConfigValue> {
        let sections = self.sections.as_ref().ok_or(ConfigError::NotInitialized)?;
        let options = sections
            .get(section)
            .ok_or_else(|| ConfigError::NoSuchSection(section.to_string()))?;
        let raw = options
            .get(&loader::normalize_option(option))
            .ok_or_else(|| ConfigError::NoSuchOption {
                section: section.to_string(),
                option: option.to_string(),
            })?;

        let value = if kind.interpolates() {
            loader::interpolate(options, raw).map_err(|reason| ConfigError::Interpolation {
                section: section.to_string(),
                option: option.to_string(),
                reason,
            })?
        } else {
            raw.clone()
        };

        coerce(&value, kind).map_err(|failure| failure.into_error(section, option))
    }

    /// Read a value as `kind`. Failures are logged and yield `None`.
    pub fn get(&self, section: &str, option: &str, kind: ValueKind) -> Option<ConfigValue> {
        match self.try_get(section, option, kind) {
            Ok(value) => Some(value),
            Err(ConfigError::NotInitialized) => None,
            Err(e) => {
                self.sink.error(
                    LogCategory::Cfg,
                    &format!("cannot get {} option in {} section: {}", option, section, e),
                );
                None
            }
        }
    }

    /// Read a value using the kind declared in the catalog (string otherwise).
    pub fn get_declared(&self, section: &str, option: &str) -> Option<ConfigValue> {
        let kind = catalog::spec(section, option)
            .map(|spec| spec.kind)
            .unwrap_or_default();
        self.get(section, option, kind)
    }

    pub fn get_string(&self, section: &str, option: &str) -> Option<String> {
        match self.get(section, option, ValueKind::String)? {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn get_raw(&self, section: &str, option: &str) -> Option<String> {
        match self.get(section, option, ValueKind::Raw)? {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn get_int(&self, section: &str, option: &str) -> Option<i64> {
        self.get(section, option, ValueKind::Integer)?.as_i64()
    }

    pub fn get_bool(&self, section: &str, option: &str) -> Option<bool> {
        self.get(section, option, ValueKind::Boolean)?.as_bool()
    }

    pub fn get_float(&self, section: &str, option: &str) -> Option<f64> {
        self.get(section, option, ValueKind::Float)?.as_f64()
    }

    /// Resolve an option with override / store / fallback precedence.
    ///
    /// `overrides` is keyed by option name. An override that fails to coerce
    /// is logged and skipped; a stored value that fails is logged and the
    /// fallback is returned.
    pub fn get_option(
        &self,
        section: &str,
        option: &str,
        default: ConfigValue,
        overrides: Option<&HashMap<String, String>>,
        kind: ValueKind,
    ) -> ConfigValue {
        if let Some(raw) = overrides.and_then(|o| o.get(option)) {
            match coerce(raw, kind) {
                Ok(value) => return value,
                Err(failure) => self.sink.error(
                    LogCategory::Cfg,
                    &failure.into_error(section, option).to_string(),
                ),
            }
        }

        if self.has_section(section) != Some(true) {
            return default;
        }
        self.get(section, option, kind).unwrap_or(default)
    }

    /// Set a value, creating the section if needed.
    pub fn try_set(&mut self, section: &str, option: &str, value: &str) -> Result<()> {
        let sections = self.sections.as_mut().ok_or(ConfigError::NotInitialized)?;

        if section.eq_ignore_ascii_case("default") {
            return Err(ConfigError::InvalidSection(section.to_string()));
        }
        loader::check_syntax(value).map_err(|reason| ConfigError::Interpolation {
            section: section.to_string(),
            option: option.to_string(),
            reason,
        })?;

        sections
            .entry(section.to_string())
            .or_default()
            .insert(loader::normalize_option(option), value.to_string());
        Ok(())
    }

    /// Set a value. Returns `false` (and logs) instead of failing.
    ///
    /// Read-only options are not protected here; they are only enforced
    /// against the config file during `init`.
    pub fn set(&mut self, section: &str, option: &str, value: &str) -> bool {
        match self.try_set(section, option, value) {
            Ok(()) => true,
            Err(ConfigError::NotInitialized) => false,
            Err(e) => {
                self.sink.error(
                    LogCategory::Program,
                    &format!(
                        "Cannot set config: section='{}' option='{}' value='{}': {}",
                        section, option, value, e
                    ),
                );
                false
            }
        }
    }

    /// Snapshot of every section with interpolated values. Values that fail
    /// to interpolate are kept raw.
    pub fn resolved(&self) -> SectionMap {
        let Some(sections) = self.sections.as_ref() else {
            return SectionMap::new();
        };

        sections
            .iter()
            .map(|(section, options)| {
                let values = options
                    .iter()
                    .map(|(option, raw)| {
                        let value =
                            loader::interpolate(options, raw).unwrap_or_else(|_| raw.clone());
                        (option.clone(), value)
                    })
                    .collect();
                (section.clone(), values)
            })
            .collect()
    }
}

/// Overlay catalog defaults onto values loaded from the config file.
///
/// Missing sections and options receive their defaults. Read-only options
/// present in the file are reverted to the default with a warning. Options
/// unknown to the catalog are kept.
fn apply_defaults(sections: &mut SectionMap, sink: &dyn DiagnosticSink) {
    for section in catalog::sections() {
        let options = sections.entry(section.name.to_string()).or_default();

        for spec in section.options {
            match options.get_mut(spec.name) {
                None => {
                    options.insert(spec.name.to_string(), spec.default.to_string());
                }
                Some(value) if spec.read_only => {
                    let violation = ConfigError::ReadOnlyViolation {
                        section: section.name.to_string(),
                        option: spec.name.to_string(),
                    };
                    sink.warning(LogCategory::Cfg, &violation.to_string());
                    *value = spec.default.to_string();
                }
                Some(_) => {}
            }
        }
    }
}
