mod errors;

pub use errors::{ConfigError, Result};
