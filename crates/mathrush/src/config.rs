//! Service configuration loading.

use std::{env, fs, io::ErrorKind, path::Path, path::PathBuf};

use mathrush_match::MatchConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::MathRushError;

/// Default location on disk where the service looks for its JSON config.
pub const DEFAULT_CONFIG_PATH: &str = "config/mathrush.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
pub const CONFIG_PATH_ENV: &str = "MATHRUSH_CONFIG_PATH";

/// Runtime configuration for the whole service.
///
/// ```json
/// {
///   "matchmaking": {
///     "capacity": 2,
///     "tolerance": [
///       { "up_to": 50, "tolerance": 25 },
///       { "up_to": 150, "tolerance": 30 },
///       { "up_to": 250, "tolerance": 40 },
///       { "up_to": null, "tolerance": 50 }
///     ],
///     "power_ups_enabled": true,
///     "initial_power_ups": 3
///   }
/// }
/// ```
///
/// Missing keys take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MathRushConfig {
    pub matchmaking: MatchConfig,
}

impl MathRushConfig {
    /// Loads the configuration from the path in `MATHRUSH_CONFIG_PATH`, or
    /// [`DEFAULT_CONFIG_PATH`].
    ///
    /// Never fails: a missing, unreadable, malformed or invalid file is
    /// logged and replaced by the built-in defaults.
    pub fn load() -> Self {
        Self::load_from(resolve_config_path())
    }

    /// Like [`load`](Self::load), reading from an explicit path.
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                return Self::default();
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                return Self::default();
            }
        };

        let config = match serde_json::from_str::<Self>(&contents) {
            Ok(config) => config,
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to parse config; falling back to defaults"
                );
                return Self::default();
            }
        };

        if let Err(err) = config.validate() {
            warn!(
                path = %path.display(),
                error = %err,
                "config rejected; falling back to defaults"
            );
            return Self::default();
        }

        info!(
            path = %path.display(),
            capacity = config.matchmaking.capacity,
            bands = config.matchmaking.tolerance.bands().len(),
            "loaded config"
        );
        config
    }

    /// Rejects settings the service can't run with.
    pub fn validate(&self) -> Result<(), MathRushError> {
        self.matchmaking.validate().map_err(MathRushError::from)
    }
}

fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
