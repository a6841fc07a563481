//! Configuration
//!
//! Settings for the prediction client, resolved in layers:
//!
//! 1. Built-in defaults
//! 2. TOML file (`$XDG_CONFIG_HOME/jakarta-predict/config.toml`, or an explicit path)
//! 3. Environment variables
//! 4. Command-line overrides
//!
//! # File Format
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:5000/api"
//! request_timeout_secs = 30   # omit for no timeout
//!
//! [motion]
//! reduce_motion = true        # force reduced motion
//! probe_device = true
//! ```
//!
//! # Environment Variables
//!
//! - `PREDICTOR_API_URL`: service root
//! - `PREDICTOR_TIMEOUT_SECS`: request timeout in seconds (`0` disables it)
//! - `PREDICTOR_REDUCE_MOTION`: force reduced motion (`1`, `true`, `reduced`, ...)

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::DEFAULT_BASE_URL;
use crate::motion::parse_reduce_motion;

/// Directory name under the user config dir
const CONFIG_DIR_NAME: &str = "jakarta-predict";

/// Config file name
const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the file failed
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The file is not valid TOML for this schema
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: toml::de::Error,
    },

    /// A value is out of range
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Where the configuration was loaded from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigSource {
    /// No file found, defaults used
    Defaults,
    /// Loaded from this file
    File(PathBuf),
}

/// `[api]` section
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Service root, e.g. `http://localhost:5000/api`
    pub base_url: String,
    /// Per-request timeout; `None` waits indefinitely
    pub request_timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: None,
        }
    }
}

impl ApiConfig {
    /// Timeout as a `Duration`
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

/// `[motion]` section
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Host override; `Some(true)` forces reduced motion
    pub reduce_motion: Option<bool>,
    /// Whether to probe memory and cores at startup
    pub probe_device: bool,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            reduce_motion: None,
            probe_device: true,
        }
    }
}

/// Complete client configuration
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// Prediction service settings
    pub api: ApiConfig,
    /// Motion adaptation settings
    pub motion: MotionConfig,
}

/// Values supplied on the command line
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Service root
    pub api_url: Option<String>,
    /// Timeout in seconds, `0` disables it
    pub timeout_secs: Option<u64>,
    /// Force reduced motion
    pub reduce_motion: Option<bool>,
}

impl PredictorConfig {
    /// Apply environment variables from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply environment variables from a lookup function
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("PREDICTOR_API_URL").filter(|v| !v.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
        if let Some(raw) = lookup("PREDICTOR_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(0) => self.api.request_timeout_secs = None,
                Ok(secs) => self.api.request_timeout_secs = Some(secs),
                Err(_) => {
                    tracing::warn!(value = %raw, "Ignoring unparseable PREDICTOR_TIMEOUT_SECS");
                }
            }
        }
        if let Some(raw) = lookup("PREDICTOR_REDUCE_MOTION") {
            self.motion.reduce_motion = Some(parse_reduce_motion(&raw));
        }
    }

    /// Apply command-line overrides
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(url) = &overrides.api_url {
            self.api.base_url.clone_from(url);
        }
        if let Some(secs) = overrides.timeout_secs {
            self.api.request_timeout_secs = (secs > 0).then_some(secs);
        }
        if let Some(reduce) = overrides.reduce_motion {
            self.motion.reduce_motion = Some(reduce);
        }
    }

    /// Check values that would only fail later at request time
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api.base_url.as_str();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                field: "api.base_url",
                reason: format!("{url:?} is not an http(s) URL"),
            });
        }
        Ok(())
    }
}

/// Default config file location
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load a config file
pub fn load_config_from_path(path: &Path) -> Result<PredictorConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config: PredictorConfig =
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    // 0 means no timeout, as in the env and CLI layers
    if config.api.request_timeout_secs == Some(0) {
        config.api.request_timeout_secs = None;
    }
    Ok(config)
}

/// Load configuration from `explicit` or the default location
///
/// A missing default file falls back to defaults; a missing explicit file is
/// an error. Environment variables are applied on top, and the result is
/// validated.
pub fn load_config(explicit: Option<&Path>) -> Result<(PredictorConfig, ConfigSource), ConfigError> {
    let (mut config, source) = match explicit {
        Some(path) => (load_config_from_path(path)?, ConfigSource::File(path.to_path_buf())),
        None => match default_config_path().filter(|p| p.exists()) {
            Some(path) => (load_config_from_path(&path)?, ConfigSource::File(path)),
            None => (PredictorConfig::default(), ConfigSource::Defaults),
        },
    };

    config.apply_env();
    config.validate()?;
    tracing::debug!(?source, base_url = %config.api.base_url, "Configuration loaded");
    Ok((config, source))
}
