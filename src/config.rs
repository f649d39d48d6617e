//! Tracker configuration
//!
//! Defaults, overlaid by `~/.config/pitch-tracker/config.toml` when present,
//! overlaid by command-line flags in the binaries.

use crate::export::{CommandShare, PayloadKind};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Pitches after which a session ends by itself
pub const DEFAULT_PITCH_LIMIT: usize = 20;

const APP_DIR: &str = "pitch-tracker";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("invalid config {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("pitch_limit must be at least 1")]
    ZeroLimit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Session auto-ends at this many pitches
    pub pitch_limit: usize,
    /// Where saved sessions and logs live
    pub data_dir: PathBuf,
    /// Where CSV and summary files are written
    pub export_dir: PathBuf,
    /// External command used as the share target, e.g. `kdeconnect-cli --share`
    pub share_command: Option<String>,
    /// Payload kinds the share command accepts
    pub share_kinds: Vec<PayloadKind>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            pitch_limit: DEFAULT_PITCH_LIMIT,
            data_dir: default_data_dir(),
            export_dir: default_export_dir(),
            share_command: None,
            share_kinds: vec![PayloadKind::Csv],
        }
    }
}

impl Config {
    /// `<config dir>/pitch-tracker/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Load `path`, or the default location when None
    ///
    /// Only the default location may be missing, which yields the defaults.
    /// A named file that is missing, unreadable or malformed is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::read(path.to_path_buf(), true),
            None => match Self::default_path() {
                Some(path) => Self::read(path, false),
                None => Ok(Config::default()),
            },
        }
    }

    fn read(path: PathBuf, required: bool) -> Result<Self, ConfigError> {
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound && !required => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Config::default());
            }
            Err(source) => return Err(ConfigError::Io { path, source }),
        };

        let config: Config =
            toml::from_str(&raw).map_err(|source| ConfigError::Toml {
                path: path.clone(),
                source,
            })?;
        config.validate()?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pitch_limit == 0 {
            return Err(ConfigError::ZeroLimit);
        }
        Ok(())
    }

    /// Share sink described by `share_command`, if any
    pub fn share_sink(&self) -> Option<CommandShare> {
        self.share_command
            .as_deref()
            .and_then(|cmd| {
                CommandShare::parse(cmd, self.share_kinds.clone(), self.export_dir.clone())
            })
    }

    /// Log file of the interactive tool
    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("pitch-tracker.log")
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(".").join(APP_DIR))
}

fn default_export_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}
