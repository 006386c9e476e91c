//! Logging setup from the resolved configuration
//!
//! Reads a log section (`setroubleshootd_log` for the daemon, `sealert_log`
//! for the client) and installs a `tracing` subscriber. Categories map to
//! `tracing` targets, so `cfg:debug` becomes the directive `cfg=debug`.

use crate::config::{ConfigStore, ConfigValue, ValueKind};
use crate::diagnostics::{DiagnosticSink, LogCategory, Severity};
use crate::types::{ConfigError, Result};
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{fmt, EnvFilter};

pub const DAEMON_LOG_SECTION: &str = "setroubleshootd_log";
pub const CLIENT_LOG_SECTION: &str = "sealert_log";

/// Level assigned to one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryLevel {
    /// Use the global level
    Inherit,
    Level(Severity),
    /// `~category`
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryDirective {
    pub category: LogCategory,
    pub level: CategoryLevel,
}

impl CategoryDirective {
    fn directive(&self, global: Severity) -> String {
        let level = match self.level {
            CategoryLevel::Inherit => level_name(global),
            CategoryLevel::Level(severity) => level_name(severity),
            CategoryLevel::Off => "off",
        };
        format!("{}={}", self.category, level)
    }
}

fn level_filter(severity: Severity) -> LevelFilter {
    match severity {
        Severity::Critical | Severity::Error => LevelFilter::ERROR,
        Severity::Warning => LevelFilter::WARN,
        Severity::Info => LevelFilter::INFO,
        Severity::Debug => LevelFilter::DEBUG,
    }
}

fn level_name(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical | Severity::Error => "error",
        Severity::Warning => "warn",
        Severity::Info => "info",
        Severity::Debug => "debug",
    }
}

/// Parse a `categories` value such as `cfg:debug, ~avc, rpc`.
///
/// Returns the accepted directives and the entries that were rejected.
pub fn parse_categories(spec: &str) -> (Vec<CategoryDirective>, Vec<String>) {
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();

    for entry in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let parsed = if let Some(name) = entry.strip_prefix('~') {
            name.trim().parse::<LogCategory>().map(|category| CategoryDirective {
                category,
                level: CategoryLevel::Off,
            })
        } else {
            match entry.split_once(':') {
                Some((name, level)) => name
                    .trim()
                    .parse::<LogCategory>()
                    .and_then(|category| {
                        level.parse::<Severity>().map(|severity| CategoryDirective {
                            category,
                            level: CategoryLevel::Level(severity),
                        })
                    }),
                None => entry.parse::<LogCategory>().map(|category| CategoryDirective {
                    category,
                    level: CategoryLevel::Inherit,
                }),
            }
        };

        match parsed {
            Ok(directive) => accepted.push(directive),
            Err(reason) => rejected.push(format!("{}: {}", entry, reason)),
        }
    }

    (accepted, rejected)
}

/// Logging options of one log section.
#[derive(Debug, Clone, PartialEq)]
pub struct LogSettings {
    pub level: Severity,
    pub categories: Vec<CategoryDirective>,
    pub filename: Option<PathBuf>,
    pub append: bool,
    pub console: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: Severity::Warning,
            categories: Vec::new(),
            filename: None,
            append: false,
            console: false,
        }
    }
}

impl LogSettings {
    /// Read settings from `section`, letting `overrides` (keyed by option
    /// name) win over the stored values. Bad entries are reported to the
    /// store's sink and skipped.
    pub fn from_store(
        store: &ConfigStore,
        section: &str,
        overrides: Option<&HashMap<String, String>>,
    ) -> Self {
        let defaults = LogSettings::default();
        let sink: &dyn DiagnosticSink = store.sink().as_ref();
        let text = |option: &str| {
            store
                .get_option(section, option, ConfigValue::from(""), overrides, ValueKind::String)
                .to_string()
        };

        let level = match text("level").parse::<Severity>() {
            Ok(level) => level,
            Err(reason) => {
                sink.warning(LogCategory::Cfg, &format!("[{}] level: {}", section, reason));
                defaults.level
            }
        };

        let (categories, rejected) = parse_categories(&text("categories"));
        for reason in rejected {
            sink.warning(LogCategory::Cfg, &format!("[{}] categories: {}", section, reason));
        }

        let filename = Some(text("filename"))
            .filter(|f| !f.trim().is_empty())
            .map(PathBuf::from);
        let append = text("filemode").trim() == "a";
        let console = store
            .get_option(
                section,
                "console",
                ConfigValue::Boolean(defaults.console),
                overrides,
                ValueKind::Boolean,
            )
            .as_bool()
            .unwrap_or(defaults.console);

        Self {
            level,
            categories,
            filename,
            append,
            console,
        }
    }

    /// Build the subscriber filter. `RUST_LOG` directives are layered first so
    /// the configured ones take precedence.
    pub fn env_filter(&self) -> EnvFilter {
        let mut filter = EnvFilter::from_default_env().add_directive(level_filter(self.level).into());
        for category in &self.categories {
            if let Ok(directive) = category.directive(self.level).parse() {
                filter = filter.add_directive(directive);
            }
        }
        filter
    }
}

/// Install the global `tracing` subscriber.
///
/// Logs go to the configured file, to standard error when `console` is set,
/// and to standard error alone when no file is configured.
pub fn setup_logging(settings: &LogSettings) -> Result<()> {
    let subscriber = fmt()
        .with_env_filter(settings.env_filter())
        .with_target(true);

    let result = match &settings.filename {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .append(settings.append)
                .truncate(!settings.append)
                .open(path)?;
            if settings.console {
                subscriber
                    .with_writer(std::io::stderr.and(Mutex::new(file)))
                    .try_init()
            } else {
                subscriber.with_writer(Mutex::new(file)).try_init()
            }
        }
        None => subscriber.with_writer(std::io::stderr).try_init(),
    };

    result.map_err(|e| ConfigError::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemorySink;
    use std::io::Write;
    use std::sync::Arc;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_categories() {
        let (accepted, rejected) = parse_categories("cfg:debug, ~avc, rpc,, server:40");
        assert!(rejected.is_empty());
        assert_eq!(
            accepted,
            vec![
                CategoryDirective {
                    category: LogCategory::Cfg,
                    level: CategoryLevel::Level(Severity::Debug)
                },
                CategoryDirective {
                    category: LogCategory::Avc,
                    level: CategoryLevel::Off
                },
                CategoryDirective {
                    category: LogCategory::Rpc,
                    level: CategoryLevel::Inherit
                },
                CategoryDirective {
                    category: LogCategory::Server,
                    level: CategoryLevel::Level(Severity::Error)
                },
            ]
        );
    }

    #[test]
    fn test_parse_categories_rejects_unknown() {
        let (accepted, rejected) = parse_categories("ipc:info, cfg:loud, email");
        assert_eq!(accepted.len(), 1);
        assert_eq!(rejected.len(), 2);
        assert!(rejected[0].starts_with("ipc:info"));
    }

    #[test]
    fn test_directives() {
        let off = CategoryDirective {
            category: LogCategory::GuiData,
            level: CategoryLevel::Off,
        };
        assert_eq!(off.directive(Severity::Info), "gui_data=off");

        let inherit = CategoryDirective {
            category: LogCategory::Cfg,
            level: CategoryLevel::Inherit,
        };
        assert_eq!(inherit.directive(Severity::Critical), "cfg=error");
    }

    #[test]
    fn test_default_settings_match_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::load(dir.path().join("none.conf"), Arc::new(MemorySink::new()));
        let defaults = LogSettings::default();
        for section in [DAEMON_LOG_SECTION, CLIENT_LOG_SECTION] {
            let settings = LogSettings::from_store(&store, section, None);
            assert_eq!(settings.level, defaults.level);
            assert_eq!(settings.console, defaults.console);
        }
    }

    #[test]
    fn test_settings_from_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::load(dir.path().join("none.conf"), Arc::new(MemorySink::new()));

        let daemon = LogSettings::from_store(&store, DAEMON_LOG_SECTION, None);
        assert_eq!(daemon.level, Severity::Warning);
        assert!(daemon.categories.is_empty());
        assert_eq!(
            daemon.filename,
            Some(PathBuf::from("/var/log/setroubleshoot/setroubleshootd.log"))
        );
        assert!(!daemon.append);
        assert!(!daemon.console);

        let client = LogSettings::from_store(&store, CLIENT_LOG_SECTION, None);
        assert_eq!(client.filename, None);
        assert!(client.append);
    }

    #[test]
    fn test_settings_overrides_and_bad_values() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[sealert_log]\nlevel = chatty\ncategories = cfg:info, bogus\nconsole = yes"
        )
        .unwrap();
        let sink = Arc::new(MemorySink::new());
        let store = ConfigStore::load(file.path(), sink.clone());

        let settings = LogSettings::from_store(&store, CLIENT_LOG_SECTION, None);
        assert_eq!(settings.level, Severity::Warning);
        assert_eq!(settings.categories.len(), 1);
        assert!(settings.console);
        assert_eq!(sink.at(Severity::Warning).len(), 2);

        let overrides: HashMap<String, String> =
            [("level".to_string(), "DEBUG".to_string())].into_iter().collect();
        let settings = LogSettings::from_store(&store, CLIENT_LOG_SECTION, Some(&overrides));
        assert_eq!(settings.level, Severity::Debug);
    }
}
