//! Persisted target-path configuration.
//!
//! The only configuration this tool carries is the directory to organize,
//! stored as a small JSON record. The record can live next to the working
//! directory or under the user's config directory:
//!
//! ```json
//! {
//!   "path": "/home/user/Downloads"
//! }
//! ```
//!
//! Interactive capture of the path is not part of this module; callers
//! either pass a directory explicitly or persist one with [`Config::save`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default name of the config record, both in the working directory and
/// under `~/.config/tidybox/`.
pub const CONFIG_FILE: &str = "tidybox.json";

/// Errors that can occur while loading or saving the config record.
#[derive(Debug)]
pub enum ConfigError {
    /// No config record was found at any lookup location.
    NotFound(PathBuf),
    /// The record exists but is not valid JSON for [`Config`].
    Invalid { path: PathBuf, reason: String },
    /// IO failure while reading or writing the record.
    Io { path: PathBuf, reason: String },
    /// The configured target is missing or not a directory.
    InvalidTarget(PathBuf),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(path) => {
                write!(
                    f,
                    "No configuration found ({} missing); pass a directory or run with --save-config",
                    path.display()
                )
            }
            ConfigError::Invalid { path, reason } => {
                write!(f, "Invalid configuration {}: {}", path.display(), reason)
            }
            ConfigError::Io { path, reason } => {
                write!(f, "IO error on {}: {}", path.display(), reason)
            }
            ConfigError::InvalidTarget(path) => {
                write!(f, "Configured path is not a directory: {}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// The persisted configuration record: the directory to organize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory whose contents get organized.
    pub path: PathBuf,
}

impl Config {
    /// Creates a config pointing at the given directory.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the config record.
    ///
    /// Lookup order:
    /// 1. `config_path`, when given (a missing file is an error here);
    /// 2. `./tidybox.json` in the current directory;
    /// 3. `~/.config/tidybox/tidybox.json`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] when no record exists anywhere,
    /// and [`ConfigError::Invalid`] / [`ConfigError::Io`] for records that
    /// exist but cannot be used.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("tidybox")
                .join(CONFIG_FILE);
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Err(ConfigError::NotFound(local_config))
    }

    /// Loads the config record from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::Invalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Writes the config record as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::Invalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        fs::write(path, json).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Checks that the configured target is an existing directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTarget`] otherwise.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path.is_dir() {
            Ok(())
        } else {
            Err(ConfigError::InvalidTarget(self.path.clone()))
        }
    }
}

/// Basenames the organizer must never move: the config record and, when the
/// binary itself sits inside the target directory, the binary.
pub fn exclusion_set() -> HashSet<String> {
    let mut names: HashSet<String> = HashSet::from([CONFIG_FILE.to_string()]);
    if let Ok(exe) = env::current_exe()
        && let Some(name) = exe.file_name()
    {
        names.insert(name.to_string_lossy().into_owned());
    }
    names
}
