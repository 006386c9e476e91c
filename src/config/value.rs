//! Value coercion
//!
//! Every stored value is a string; typed reads convert on the way out.

use crate::types::ConfigError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

const TRUE_WORDS: [&str; 5] = ["true", "t", "yes", "y", "on"];
const FALSE_WORDS: [&str; 5] = ["false", "f", "no", "n", "off"];

/// Semantic type requested by a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    #[default]
    String,
    Integer,
    Boolean,
    Float,
    /// Uninterpolated string
    Raw,
}

impl ValueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Integer => "integer",
            ValueKind::Boolean => "boolean",
            ValueKind::Float => "float",
            ValueKind::Raw => "raw",
        }
    }

    /// Whether reads of this kind go through `%(name)s` interpolation.
    pub fn interpolates(self) -> bool {
        !matches!(self, ValueKind::Raw)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "string" | "str" => Ok(ValueKind::String),
            "integer" | "int" => Ok(ValueKind::Integer),
            "boolean" | "bool" => Ok(ValueKind::Boolean),
            "float" => Ok(ValueKind::Float),
            "raw" => Ok(ValueKind::Raw),
            _ => Err(ConfigError::UnsupportedType(s.to_string())),
        }
    }
}

/// A coerced configuration value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    Float(f64),
}

impl ConfigValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::String(s) => f.write_str(s),
            ConfigValue::Integer(i) => write!(f, "{}", i),
            ConfigValue::Boolean(b) => f.write_str(if *b { "True" } else { "False" }),
            ConfigValue::Float(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::String(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Integer(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Boolean(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Float(value)
    }
}

/// Why a raw value could not be converted. The store attaches section and
/// option names before reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoercionFailure {
    pub kind: ValueKind,
    pub value: String,
}

impl CoercionFailure {
    pub fn into_error(self, section: &str, option: &str) -> ConfigError {
        ConfigError::Coercion {
            section: section.to_string(),
            option: option.to_string(),
            kind: self.kind.to_string(),
            value: self.value,
        }
    }
}

/// Convert a raw string into the requested kind.
pub fn coerce(raw: &str, kind: ValueKind) -> Result<ConfigValue, CoercionFailure> {
    let fail = || CoercionFailure {
        kind,
        value: raw.to_string(),
    };

    match kind {
        ValueKind::String | ValueKind::Raw => Ok(ConfigValue::String(raw.to_string())),
        ValueKind::Integer => raw
            .trim()
            .parse::<i64>()
            .map(ConfigValue::Integer)
            .map_err(|_| fail()),
        ValueKind::Boolean => parse_bool(raw).map(ConfigValue::Boolean).ok_or_else(fail),
        ValueKind::Float => raw
            .trim()
            .parse::<f64>()
            .map(ConfigValue::Float)
            .map_err(|_| fail()),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    let word = raw.trim().to_lowercase();
    if TRUE_WORDS.contains(&word.as_str()) {
        return Some(true);
    }
    if FALSE_WORDS.contains(&word.as_str()) {
        return Some(false);
    }
    // Integers pass through with their truth value
    word.parse::<i64>().ok().map(|n| n != 0)
}
