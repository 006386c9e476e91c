//! Configuration system for setroubleshoot
//!
//! Resolves every option from three layers:
//! 1. Runtime overrides (`section.option=value`, caller-supplied maps)
//! 2. The ini-style config file
//! 3. The built-in defaults catalog

pub mod catalog;
mod defaults;
pub mod dump;
mod loader;
mod overrides;
mod store;
mod value;

pub use catalog::{OptionSpec, SectionSpec};
pub use defaults::{CFG_FILE, CFG_FILE_ENV};
pub use dump::{dump_configuration, dump_configuration_json, dump_defaults, dump_defaults_json};
pub use loader::{interpolate, OptionMap, SectionMap, MAX_INTERPOLATION_DEPTH};
pub use overrides::{apply_setting, parse_setting, Setting};
pub use store::{config_path, ConfigStore};
pub use value::{coerce, CoercionFailure, ConfigValue, ValueKind};
