//! Underlying ini-style text store
//!
//! Reads `[section]` / `option = value` files through `rust-ini` and provides
//! the `%(name)s` interpolation applied to non-raw reads.

use crate::types::ConfigError;
use ini::{Ini, ParseOption};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;

/// Reference chains deeper than this are rejected.
pub const MAX_INTERPOLATION_DEPTH: usize = 10;

/// Options of one section, keyed by normalized option name.
pub type OptionMap = BTreeMap<String, String>;

/// Section name to options.
pub type SectionMap = BTreeMap<String, OptionMap>;

/// Result of reading a config file.
#[derive(Debug, Default)]
pub struct LoadedFile {
    pub sections: SectionMap,
    /// Keys that appeared before any section header.
    pub stray_keys: Vec<String>,
}

/// Option names are case-insensitive.
pub fn normalize_option(option: &str) -> String {
    option.trim().to_lowercase()
}

/// Read the config file at `path`.
///
/// A missing file is not an error and yields `Ok(None)`.
pub fn read_file(path: &Path) -> Result<Option<LoadedFile>, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(ConfigError::FileParse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        }
    };

    parse_str(&content)
        .map(Some)
        .map_err(|reason| ConfigError::FileParse {
            path: path.to_path_buf(),
            reason,
        })
}

/// Parse ini text. Quotes and backslashes are kept verbatim; indented lines
/// continue the previous value.
pub fn parse_str(content: &str) -> Result<LoadedFile, String> {
    let options = ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        enabled_indented_mutiline_value: true,
        ..ParseOption::default()
    };
    let ini = Ini::load_from_str_opt(content, options).map_err(|e| e.to_string())?;

    let mut loaded = LoadedFile::default();
    for (section, properties) in ini.iter() {
        match section {
            Some(name) => {
                let entry = loaded.sections.entry(name.to_string()).or_default();
                for (key, value) in properties.iter() {
                    entry.insert(normalize_option(key), value.to_string());
                }
            }
            None => {
                loaded
                    .stray_keys
                    .extend(properties.iter().map(|(key, _)| key.to_string()));
            }
        }
    }

    Ok(loaded)
}

/// Expand `%(name)s` references against the options of one section.
/// `%%` yields a literal `%`.
pub fn interpolate(options: &OptionMap, raw: &str) -> Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    expand(options, raw, 1, &mut out)?;
    Ok(out)
}

fn expand(options: &OptionMap, raw: &str, depth: usize, out: &mut String) -> Result<(), String> {
    if depth > MAX_INTERPOLATION_DEPTH {
        return Err(format!(
            "value references nested deeper than {} levels: {:?}",
            MAX_INTERPOLATION_DEPTH, raw
        ));
    }

    let mut rest = raw;
    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        if rest.starts_with("%%") {
            out.push('%');
            rest = &rest[2..];
        } else if rest.starts_with("%(") {
            let (name, remainder) = reference(rest)
                .ok_or_else(|| format!("bad interpolation variable reference {:?}", rest))?;
            let value = options
                .get(&normalize_option(name))
                .ok_or_else(|| format!("bad interpolation variable reference: no option {:?}", name))?;
            if value.contains('%') {
                expand(options, value, depth + 1, out)?;
            } else {
                out.push_str(value);
            }
            rest = remainder;
        } else {
            return Err(format!("'%' must be followed by '%' or '(', found: {:?}", rest));
        }
    }
    out.push_str(rest);

    Ok(())
}

/// Split `%(name)s...` into `name` and the text after the reference.
fn reference(text: &str) -> Option<(&str, &str)> {
    let body = text.strip_prefix("%(")?;
    let close = body.find(')')?;
    if close == 0 {
        return None;
    }
    let remainder = body[close + 1..].strip_prefix('s')?;
    Some((&body[..close], remainder))
}

/// Reject values whose `%` usage could never interpolate.
pub fn check_syntax(value: &str) -> Result<(), String> {
    let mut rest = value;
    let mut offset = 0;
    while let Some(pos) = rest.find('%') {
        let at = &rest[pos..];
        let consumed = if at.starts_with("%%") {
            2
        } else if let Some((_, remainder)) = reference(at) {
            at.len() - remainder.len()
        } else {
            return Err(format!(
                "invalid interpolation syntax in {:?} at position {}",
                value,
                offset + pos
            ));
        };
        offset += pos + consumed;
        rest = &rest[pos + consumed..];
    }
    Ok(())
}
