use anyhow::{anyhow, bail, Result};
use clap::Parser;
use setroubleshoot_config::config::{self, apply_setting, config_path, ConfigStore, ValueKind};
use setroubleshoot_config::diagnostics::TracingSink;
use setroubleshoot_config::logging::{setup_logging, LogSettings, CLIENT_LOG_SECTION};
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// setroubleshoot configuration tool
///
/// Prints the default configuration template or the resolved configuration,
/// optionally after applying `section.option=value` overrides.
#[derive(Parser, Debug)]
#[command(name = "setroubleshoot-config")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Generate the default config file
    #[arg(short, long)]
    defaults: bool,

    /// Include read-only options in the generated config file
    #[arg(long)]
    show_read_only: bool,

    /// Print the resolved configuration
    #[arg(long)]
    dump: bool,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    /// Config file
    ///
    /// Defaults to $SETROUBLESHOOT_CONFIG, then /etc/setroubleshoot/setroubleshoot.conf
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override a setting after loading, e.g. audit.retry_interval=90
    #[arg(short, long, value_name = "SECTION.OPTION=VALUE")]
    set: Vec<String>,

    /// Print the value of one option
    #[arg(short, long, value_name = "SECTION.OPTION")]
    get: Option<String>,

    /// Type used by --get: string, integer, boolean, float or raw
    ///
    /// Defaults to the type declared in the catalog.
    #[arg(short = 't', long = "type", value_name = "TYPE", requires = "get")]
    kind: Option<String>,

    /// Log level (critical, error, warning, info, debug), overrides [sealert_log] level
    #[arg(short, long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Diagnostics go to stderr until logging is configured from the store itself
    let mut store = ConfigStore::new(args.config.clone().unwrap_or_else(config_path));
    store.init();

    let mut log_overrides = HashMap::new();
    if let Some(level) = &args.log_level {
        log_overrides.insert("level".to_string(), level.clone());
    }
    let settings = LogSettings::from_store(&store, CLIENT_LOG_SECTION, Some(&log_overrides));
    match setup_logging(&settings) {
        Ok(()) => store.set_sink(Arc::new(TracingSink)),
        Err(e) => eprintln!("error: {}", e),
    }

    info!("Configuration loaded from {}", store.path().display());

    let mut rejected = 0;
    for setting in &args.set {
        if !apply_setting(&mut store, setting) {
            rejected += 1;
        }
    }
    debug!("Applied {} of {} overrides", args.set.len() - rejected, args.set.len());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if args.defaults {
        if args.json {
            config::dump_defaults_json(&mut out, args.show_read_only)?;
        } else {
            config::dump_defaults(&mut out, args.show_read_only)?;
        }
    }

    if args.dump {
        if args.json {
            config::dump_configuration_json(&mut out, &store)?;
        } else {
            config::dump_configuration(&mut out, &store)?;
        }
    }

    if let Some(key) = &args.get {
        let (section, option) = key
            .split_once('.')
            .ok_or_else(|| anyhow!("could not parse '{}', must be 'section.option'", key))?;
        let value = match &args.kind {
            Some(kind) => store.get(section, option, kind.parse::<ValueKind>()?),
            None => store.get_declared(section, option),
        };
        match value {
            Some(value) => writeln!(out, "{}", value)?,
            None => bail!("cannot get {} option in {} section", option, section),
        }
    }

    out.flush()?;

    if rejected > 0 {
        bail!("{} setting(s) could not be applied", rejected);
    }

    Ok(())
}
