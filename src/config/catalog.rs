//! Defaults catalog types

use crate::config::defaults::CATALOG;
use crate::config::value::ValueKind;
use serde::Serialize;

/// One option in the defaults catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OptionSpec {
    pub name: &'static str,
    pub default: &'static str,
    pub description: &'static str,
    pub read_only: bool,
    pub kind: ValueKind,
}

impl OptionSpec {
    /// Writable string option.
    pub const fn new(name: &'static str, default: &'static str, description: &'static str) -> Self {
        Self {
            name,
            default,
            description,
            read_only: false,
            kind: ValueKind::String,
        }
    }

    pub const fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub const fn kind(mut self, kind: ValueKind) -> Self {
        self.kind = kind;
        self
    }
}

/// A named group of options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionSpec {
    pub name: &'static str,
    pub options: &'static [OptionSpec],
}

impl SectionSpec {
    pub fn option(&self, name: &str) -> Option<&'static OptionSpec> {
        self.options.iter().find(|o| o.name == name)
    }

    /// Options that appear in a dump.
    pub fn visible_options(&self, show_read_only: bool) -> impl Iterator<Item = &'static OptionSpec> {
        self.options
            .iter()
            .filter(move |o| show_read_only || !o.read_only)
    }
}

/// All catalog sections, in declaration order.
pub fn sections() -> &'static [SectionSpec] {
    CATALOG
}

pub fn section(name: &str) -> Option<&'static SectionSpec> {
    CATALOG.iter().find(|s| s.name == name)
}

/// Options of a catalog section, empty for unknown sections.
pub fn options(section_name: &str) -> &'static [OptionSpec] {
    section(section_name).map(|s| s.options).unwrap_or(&[])
}

pub fn spec(section_name: &str, option: &str) -> Option<&'static OptionSpec> {
    section(section_name).and_then(|s| s.option(option))
}
