//! Host configuration for the C surface.
//!
//! Read from `$CATCHPOINT_CONFIG` or `~/.catchpoint/config.toml`. Every section
//! is optional and a missing file means defaults. Environment variables win
//! over the file.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_ENV: &str = "CATCHPOINT_CONFIG";
pub const LOG_ENV: &str = "CATCHPOINT_LOG";
pub const QUIET_PANICS_ENV: &str = "CATCHPOINT_QUIET_PANICS";
pub const TRACE_INTERCEPTS_ENV: &str = "CATCHPOINT_TRACE_INTERCEPTS";

const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Default, Deserialize)]
pub struct CatchpointConfig {
    pub logging: Option<LoggingConfig>,
    pub panic_hook: Option<PanicHookConfig>,
    pub diagnostics: Option<DiagnosticsConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `"debug"` or `"catchpoint_ffi=trace"`.
    pub level: Option<String>,
    /// Log file path. `${VAR}` references are expanded.
    pub file: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PanicHookConfig {
    pub quiet: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DiagnosticsConfig {
    pub trace_intercepts: Option<bool>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config at {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Effective settings after applying environment overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub log_filter: String,
    pub log_file: Option<PathBuf>,
    pub quiet_panics: bool,
    pub trace_intercepts: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_file: None,
            quiet_panics: false,
            trace_intercepts: false,
        }
    }
}

impl CatchpointConfig {
    pub fn load() -> Result<Self, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    #[must_use]
    pub fn resolve(&self) -> Settings {
        self.resolve_with(|key| env::var(key).ok())
    }

    /// Resolve against an arbitrary variable lookup instead of the process environment.
    pub fn resolve_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Settings {
        let logging = self.logging.as_ref();

        let log_filter = lookup(LOG_ENV)
            .filter(|raw| !raw.trim().is_empty())
            .or_else(|| logging.and_then(|l| l.level.clone()))
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        let log_file = logging
            .and_then(|l| l.file.as_deref())
            .map(|raw| expand_env_vars(raw, &lookup))
            .filter(|expanded| !expanded.trim().is_empty())
            .map(PathBuf::from);

        let quiet_panics = flag_override(&lookup, QUIET_PANICS_ENV)
            .or_else(|| self.panic_hook.as_ref().and_then(|h| h.quiet))
            .unwrap_or(false);

        let trace_intercepts = flag_override(&lookup, TRACE_INTERCEPTS_ENV)
            .or_else(|| self.diagnostics.as_ref().and_then(|d| d.trace_intercepts))
            .unwrap_or(false);

        Settings {
            log_filter,
            log_file,
            quiet_panics,
            trace_intercepts,
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(custom) = env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(custom));
    }
    dirs::home_dir().map(|home| home.join(".catchpoint").join("config.toml"))
}

fn flag_override(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<bool> {
    lookup(key).map(|raw| is_truthy(&raw))
}

fn is_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

/// Replace `${VAR}` with the variable's value (empty if unset).
///
/// An unterminated `${` is kept literally.
pub fn expand_env_vars(value: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let var = &after[..end];
                if !var.is_empty() {
                    out.push_str(&lookup(var).unwrap_or_default());
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);

    out
}
