//! One-time host initialization: configuration, logging, panic hook.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use anyhow::{Context, Result};
use catchpoint_core::install_quiet_hook;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::{CatchpointConfig, Settings};

static SETTINGS: OnceLock<Settings> = OnceLock::new();

/// Settings recorded by the first successful [`apply`], if any.
pub fn settings() -> Option<&'static Settings> {
    SETTINGS.get()
}

/// Load configuration from the environment and the config file, then apply it.
pub fn apply() -> Result<&'static Settings> {
    let mut warnings = Vec::new();
    let config = CatchpointConfig::load().unwrap_or_else(|err| {
        warnings.push(format!("{err}; using defaults"));
        CatchpointConfig::default()
    });
    apply_settings(config.resolve(), warnings)
}

/// Apply already-resolved settings. Only the first call takes effect.
///
/// `warnings` collected before logging existed are emitted once it does.
pub fn apply_settings(settings: Settings, mut warnings: Vec<String>) -> Result<&'static Settings> {
    if let Some(existing) = SETTINGS.get() {
        return Ok(existing);
    }

    let env_filter = EnvFilter::try_new(&settings.log_filter)
        .with_context(|| format!("invalid log filter {:?}", settings.log_filter))?;
    init_tracing(env_filter, settings.log_file.as_deref(), &mut warnings);

    for warning in warnings {
        tracing::warn!("{warning}");
    }

    if settings.quiet_panics {
        install_quiet_hook();
    }

    let settings = SETTINGS.get_or_init(|| settings);
    tracing::info!(
        log_file = ?settings.log_file,
        quiet_panics = settings.quiet_panics,
        trace_intercepts = settings.trace_intercepts,
        "catchpoint initialized"
    );
    Ok(settings)
}

fn init_tracing(env_filter: EnvFilter, log_file: Option<&Path>, warnings: &mut Vec<String>) {
    let file = log_file.and_then(|path| open_log_file(path, warnings));

    let installed = match file {
        Some((path, file)) => tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .try_init()
            .map(|()| Some(path)),
        None => tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr))
            .with(env_filter)
            .try_init()
            .map(|()| None),
    };

    match installed {
        Ok(Some(path)) => tracing::info!(path = %path.display(), "Logging initialized"),
        Ok(None) => {}
        // The host already owns the global subscriber; log through it.
        Err(err) => warnings.push(format!("Keeping existing tracing subscriber: {err}")),
    }
}

fn open_log_file(path: &Path, warnings: &mut Vec<String>) -> Option<(PathBuf, File)> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty())
        && let Err(e) = fs::create_dir_all(parent)
    {
        warnings.push(format!(
            "Failed to create log dir {}: {e}",
            parent.display()
        ));
        return None;
    }

    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => Some((path.to_path_buf(), file)),
        Err(e) => {
            warnings.push(format!("Failed to open log file {}: {e}", path.display()));
            None
        }
    }
}
