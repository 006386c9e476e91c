//! Catalog and store renderers
//!
//! The catalog dump is a ready-to-edit config file template: writable
//! options appear as assignments, read-only ones as comments.

use crate::config::catalog::{self, OptionSpec, SectionSpec};
use crate::config::store::ConfigStore;
use crate::types::Result;
use serde::Serialize;
use std::io::Write;
use textwrap::{Options, WrapAlgorithm};

/// Column width of wrapped descriptions, including the `# ` prefix.
pub const WRAP_WIDTH: usize = 78;

const NO_DESCRIPTION: &str = "No Description Available";

#[derive(Serialize)]
struct SectionDump {
    name: &'static str,
    options: Vec<&'static OptionSpec>,
}

/// Catalog sections sorted by name, keeping only those with visible options.
fn visible_sections(show_read_only: bool) -> Vec<SectionDump> {
    let mut sections: Vec<&SectionSpec> = catalog::sections().iter().collect();
    sections.sort_by_key(|s| s.name);

    sections
        .into_iter()
        .map(|s| SectionDump {
            name: s.name,
            options: s.visible_options(show_read_only).collect(),
        })
        .filter(|s| !s.options.is_empty())
        .collect()
}

/// `# option: description` wrapped to [`WRAP_WIDTH`].
fn describe(option: &OptionSpec) -> String {
    let description = if option.description.is_empty() {
        NO_DESCRIPTION
    } else {
        option.description
    };
    let text: String = format!("{}: {}", option.name, description)
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect();

    textwrap::fill(
        &text,
        Options::new(WRAP_WIDTH)
            .initial_indent("# ")
            .subsequent_indent("# ")
            .wrap_algorithm(WrapAlgorithm::FirstFit),
    )
}

/// Render the defaults catalog as a config file template.
pub fn dump_defaults<W: Write>(out: &mut W, show_read_only: bool) -> Result<()> {
    for section in visible_sections(show_read_only) {
        writeln!(out, "[{}]", section.name)?;
        for option in section.options {
            writeln!(out, "{}", describe(option))?;
            if option.read_only {
                writeln!(out, "# READ ONLY, default = \"{}\"", option.default)?;
            } else {
                writeln!(out, "{} = {}", option.name, option.default)?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Render the defaults catalog as JSON.
pub fn dump_defaults_json<W: Write>(out: &mut W, show_read_only: bool) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, &visible_sections(show_read_only))?;
    writeln!(out)?;
    Ok(())
}

/// Render every `[section] option = value` of a live store.
pub fn dump_configuration<W: Write>(out: &mut W, store: &ConfigStore) -> Result<()> {
    for section in store.sections() {
        for option in store.options(section) {
            let value = store
                .get_string(section, option)
                .or_else(|| store.raw_value(section, option).map(str::to_string))
                .unwrap_or_default();
            // Continuation lines stay indented, as in the config file
            writeln!(out, "[{}] {} = {}", section, option, value.replace('\n', "\n\t"))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Render a live store as a JSON object of sections.
pub fn dump_configuration_json<W: Write>(out: &mut W, store: &ConfigStore) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, &store.resolved())?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemorySink;
    use std::sync::Arc;

    fn render_defaults(show_read_only: bool) -> String {
        let mut out = Vec::new();
        dump_defaults(&mut out, show_read_only).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn headers(text: &str) -> Vec<String> {
        text.lines()
            .filter(|l| l.starts_with('['))
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_sections_sorted() {
        let headers = headers(&render_defaults(true));
        let mut sorted = headers.clone();
        sorted.sort();
        assert_eq!(headers, sorted);
        assert_eq!(headers.len(), catalog::sections().len());
    }

    #[test]
    fn test_read_only_only_sections_hidden() {
        let text = render_defaults(false);
        let headers = headers(&text);
        for hidden in ["[socket]", "[session_dbus]", "[system_dbus]", "[test]"] {
            assert!(!headers.contains(&hidden.to_string()), "{} shown", hidden);
        }
        assert!(headers.contains(&"[general]".to_string()));
        assert!(!text.contains("READ ONLY"));
        assert!(!text.contains("pkg_version"));
    }

    #[test]
    fn test_read_only_rendered_as_comment() {
        let text = render_defaults(true);
        assert!(text.contains("# READ ONLY, default = \"3.0.47\""));
        assert!(!text.contains("pkg_version = 3.0.47"));
        assert!(text.contains("retry_interval = 60"));
    }

    #[test]
    fn test_descriptions_wrapped() {
        let text = render_defaults(false);
        assert!(text.contains("# pid_file: No Description Available\npid_file = /var/run/setroubleshootd.pid\n\n"));
        for line in text.lines().filter(|l| l.starts_with('#')) {
            assert!(line.len() <= WRAP_WIDTH, "line too long: {:?}", line);
        }
        assert!(text.contains("# retry_interval: number of seconds to wait"));
    }

    #[test]
    fn test_descriptions_fill_lines_greedily() {
        for section in catalog::sections() {
            for option in section.options {
                let text = describe(option);
                let lines: Vec<&str> = text.lines().collect();
                for pair in lines.windows(2) {
                    let next_word = pair[1]
                        .strip_prefix("# ")
                        .unwrap_or(pair[1])
                        .split(' ')
                        .next()
                        .unwrap_or_default();
                    assert!(
                        pair[0].len() + 2 + next_word.len() > WRAP_WIDTH,
                        "{:?} would fit on {:?}",
                        next_word,
                        pair[0]
                    );
                }
            }
        }
    }

    #[test]
    fn test_defaults_json() {
        let mut out = Vec::new();
        dump_defaults_json(&mut out, false).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let sections = value.as_array().unwrap();
        let audit = sections.iter().find(|s| s["name"] == "audit").unwrap();
        let retry = audit["options"]
            .as_array()
            .unwrap()
            .iter()
            .find(|o| o["name"] == "retry_interval")
            .unwrap();
        assert_eq!(retry["default"], "60");
        assert_eq!(retry["kind"], "integer");
        assert_eq!(retry["read_only"], false);
        assert!(sections.iter().all(|s| s["name"] != "socket"));
    }

    #[test]
    fn test_dump_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::load(dir.path().join("none.conf"), Arc::new(MemorySink::new()));
        let mut out = Vec::new();
        dump_configuration(&mut out, &store).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("[audit] retry_interval = 60\n"));
        assert!(text.contains(
            "[listen_for_client] address_list = {unix}/var/run/setroubleshoot/setroubleshoot_server\n"
        ));
        let access = text.find("[access]").unwrap();
        let alert = text.find("[alert]").unwrap();
        assert!(access < alert);
    }

    #[test]
    fn test_dump_configuration_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::load(dir.path().join("none.conf"), Arc::new(MemorySink::new()));
        let mut out = Vec::new();
        dump_configuration_json(&mut out, &store).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["email"]["smtp_port"], "25");
    }
}
