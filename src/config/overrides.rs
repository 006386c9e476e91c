//! `section.option=value` overrides

use crate::config::store::ConfigStore;
use crate::diagnostics::{DiagnosticSink, LogCategory};
use crate::types::ConfigError;
use regex::Regex;
use std::sync::OnceLock;

/// One parsed override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting {
    pub section: String,
    pub option: String,
    pub value: String,
}

fn setting_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        // Section and option exclude '.' and '='; the value is the rest of the
        // line after the first '='. Input spanning lines never matches.
        Regex::new(r"^[ \t]*([^.=\n]+?)[ \t]*\.[ \t]*([^.=\n]+?)[ \t]*=[ \t]*(.*)$")
            .expect("Invalid regex")
    })
}

/// Parse `section.option=value`.
pub fn parse_setting(input: &str) -> Result<Setting, ConfigError> {
    let captures = setting_regex()
        .captures(input)
        .ok_or_else(|| ConfigError::MalformedOverride(input.to_string()))?;

    Ok(Setting {
        section: captures[1].to_string(),
        option: captures[2].to_string(),
        value: captures[3].to_string(),
    })
}

/// Parse an override and apply it to the store.
///
/// Malformed input is logged and leaves the store untouched.
pub fn apply_setting(store: &mut ConfigStore, input: &str) -> bool {
    let sink: &dyn DiagnosticSink = store.sink().as_ref();
    let setting = match parse_setting(input) {
        Ok(setting) => setting,
        Err(e) => {
            sink.error(LogCategory::Cfg, &e.to_string());
            return false;
        }
    };

    sink.debug(
        LogCategory::Cfg,
        &format!(
            "setting config: section='{}' option='{}' value='{}'",
            setting.section, setting.option, setting.value
        ),
    );
    store.set(&setting.section, &setting.option, &setting.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{MemorySink, Severity};
    use std::sync::Arc;

    fn setting(section: &str, option: &str, value: &str) -> Setting {
        Setting {
            section: section.to_string(),
            option: option.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_parse_setting() {
        assert_eq!(
            parse_setting("audit.retry_interval = 90").unwrap(),
            setting("audit", "retry_interval", "90")
        );
        assert_eq!(
            parse_setting("  email . subject=SELinux  alert ").unwrap(),
            setting("email", "subject", "SELinux  alert ")
        );
    }

    #[test]
    fn test_value_keeps_equals_signs() {
        assert_eq!(
            parse_setting("help.help_url=http://example.com/?a=b").unwrap(),
            setting("help", "help_url", "http://example.com/?a=b")
        );
        assert_eq!(parse_setting("database.max_alert_age=").unwrap().value, "");
    }

    #[test]
    fn test_malformed_settings() {
        for input in [
            "not_a_valid_setting",
            "audit=90",
            ".retry_interval=90",
            "audit.=90",
            "audit.retry_interval",
            "a.b.c=1",
            "email.subject=a\nb",
            "email\n.subject=a",
            "email.subject=\nb",
        ] {
            assert!(
                matches!(parse_setting(input), Err(ConfigError::MalformedOverride(_))),
                "{:?} should be rejected",
                input
            );
        }
    }

    #[test]
    fn test_apply_setting() {
        let dir = tempfile::tempdir().unwrap();
        let sink = Arc::new(MemorySink::new());
        let mut store = ConfigStore::load(dir.path().join("missing.conf"), sink.clone());

        assert!(apply_setting(&mut store, "audit.retry_interval = 90"));
        assert_eq!(store.get_int("audit", "retry_interval"), Some(90));

        let before = store.resolved();
        assert!(!apply_setting(&mut store, "not_a_valid_setting"));
        assert_eq!(store.resolved(), before);

        let errors = sink.at(Severity::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("section.option=value"));
    }

    #[test]
    fn test_apply_before_init() {
        let sink = Arc::new(MemorySink::new());
        let mut store = ConfigStore::with_sink("/nonexistent", sink);
        assert!(!apply_setting(&mut store, "audit.retry_interval=90"));
        assert_eq!(store.has_section("audit"), None);
    }
}
