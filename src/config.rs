//! Application configuration.

use crate::consts::cli_consts::polling;
use crate::controller::PollSettings;
use crate::environment::Environment;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::Path, path::PathBuf};

/// Persisted overrides. Every field is optional; unset fields fall back to defaults.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_interval_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_tolerance: Option<u32>,
}

/// Overrides supplied on the command line. They take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub environment: Option<Environment>,
    pub server_url: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub failure_tolerance: Option<u32>,
}

/// Location of the config file: `$HOME/.securewipe/config.json`.
pub fn get_config_path() -> Result<PathBuf, std::io::Error> {
    let home = home::home_dir().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        )
    })?;
    Ok(home.join(".securewipe").join("config.json"))
}

impl Config {
    /// Loads configuration from a JSON file at the given path.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if reading from file fails or JSON is invalid.
    pub fn load_from_file(path: &Path) -> Result<Self, std::io::Error> {
        let buf = fs::read(path)?;
        let config: Config = serde_json::from_slice(&buf)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(config)
    }

    /// Loads the config file if it exists, otherwise returns the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, std::io::Error> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Saves the configuration to a JSON file at the given path.
    ///
    /// Directories will be created if they don't exist. This method overwrites existing files.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization failed: {}", e),
            )
        })?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Removes the config file. Missing files are not an error.
    pub fn clear(path: &Path) -> Result<(), std::io::Error> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Resolves the backend environment: flag URL, then `--env`, then config URL, then the default.
    pub fn resolve_environment(&self, overrides: &Overrides) -> Environment {
        if let Some(url) = &overrides.server_url {
            return Environment::Custom {
                backend_url: url.clone(),
            };
        }
        if let Some(environment) = &overrides.environment {
            return environment.clone();
        }
        match &self.server_url {
            Some(url) => Environment::Custom {
                backend_url: url.clone(),
            },
            None => Environment::default(),
        }
    }

    /// Resolves polling settings with the same precedence as the environment.
    pub fn resolve_poll_settings(&self, overrides: &Overrides) -> PollSettings {
        let interval_ms = overrides
            .poll_interval_ms
            .or(self.poll_interval_ms)
            .unwrap_or(polling::POLLING_INTERVAL_MS)
            .max(1);
        let failure_tolerance = overrides
            .failure_tolerance
            .or(self.failure_tolerance)
            .unwrap_or(polling::DEFAULT_FAILURE_TOLERANCE)
            .max(1);
        PollSettings {
            interval: Duration::from_millis(interval_ms),
            failure_tolerance,
        }
    }
}
