//! TOML configuration file I/O
//!
//! Handles loading and saving the session configuration, engine options,
//! reconnect policy and alert policy to/from TOML files in the user's
//! configuration directory.

use crate::auth::keyring;
use crate::config::SessionConfig;
use crate::error::{ConfigError, KeyringError, RdhostError};
use crate::session::alert::AlertPolicy;
use crate::session::controller::ControllerSettings;
use crate::session::engine::EngineOptions;
use crate::session::reconnect::ReconnectPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Complete TOML configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Session connection settings
    pub session: SessionConfig,

    /// Optional engine capabilities
    #[serde(default)]
    pub engine: EngineOptions,

    /// Disconnect confirmation wait
    #[serde(default)]
    pub reconnect: ReconnectPolicy,

    /// Disconnect codes that raise alerts
    #[serde(default)]
    pub alerts: AlertPolicy,
}

impl TomlConfig {
    /// Create a configuration with default engine, reconnect and alert sections
    pub fn new(session: SessionConfig) -> Self {
        Self {
            session,
            engine: EngineOptions::default(),
            reconnect: ReconnectPolicy::default(),
            alerts: AlertPolicy::default(),
        }
    }

    /// Load and validate configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, RdhostError> {
        let contents = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => RdhostError::Config(ConfigError::LoadFailed {
                path: path.to_string_lossy().to_string(),
            }),
            _ => RdhostError::Config(ConfigError::IoError {
                message: format!("Failed to read config file: {}", e),
            }),
        })?;

        let config: TomlConfig = toml::from_str(&contents).map_err(|e| {
            RdhostError::Config(ConfigError::ValidationError {
                message: format!("Failed to parse config file: {}", e),
            })
        })?;

        config.validate()?;

        info!(
            server = %config.session.server,
            poll_interval_ms = config.reconnect.poll_interval_ms,
            max_wait_secs = config.reconnect.max_wait_secs,
            "Loaded configuration from {}",
            path.display()
        );

        Ok(config)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), RdhostError> {
        let invalid = |message: String| {
            RdhostError::Config(ConfigError::ValidationError { message })
        };

        self.session
            .validate()
            .map_err(|e| invalid(format!("Invalid session settings: {}", e)))?;

        self.engine
            .validate()
            .map_err(|e| invalid(format!("Invalid engine options: {}", e)))?;

        self.reconnect.validate().map_err(|e| {
            warn!("Reconnect policy validation failed: {}", e);
            invalid(format!("Invalid reconnect policy: {}", e))
        })?;

        Ok(())
    }

    /// Save configuration to a TOML file
    pub fn to_file(&self, path: &Path) -> Result<(), RdhostError> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                RdhostError::Config(ConfigError::IoError {
                    message: format!("Failed to create config directory: {}", e),
                })
            })?;
        }

        std::fs::write(path, contents).map_err(|e| {
            warn!("Failed to write config file: {}", e);
            RdhostError::Config(ConfigError::SaveFailed {
                path: path.to_string_lossy().to_string(),
            })
        })?;

        Ok(())
    }

    /// Controller tunables from the optional sections
    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            engine: self.engine.clone(),
            reconnect: self.reconnect.clone(),
            alerts: self.alerts.clone(),
        }
    }
}

/// Default configuration file name
const CONFIG_FILE_NAME: &str = "config.toml";

/// Get the default configuration directory
///
/// Returns ~/.config/rdhost, or RDHOST_CONFIG_DIR if set
pub fn get_config_dir() -> Result<PathBuf, RdhostError> {
    if let Ok(config_dir) = std::env::var("RDHOST_CONFIG_DIR") {
        return Ok(PathBuf::from(config_dir));
    }

    let home = std::env::var("HOME").map_err(|_| {
        RdhostError::Config(ConfigError::IoError {
            message: "HOME environment variable not set".to_string(),
        })
    })?;

    Ok(PathBuf::from(home).join(".config").join("rdhost"))
}

/// Get the default configuration file path
pub fn get_config_path() -> Result<PathBuf, RdhostError> {
    Ok(get_config_dir()?.join(CONFIG_FILE_NAME))
}

/// Check if the default configuration file exists
pub fn config_exists() -> Result<bool, RdhostError> {
    Ok(get_config_path()?.exists())
}

/// Load configuration from the default TOML file
pub fn load_config() -> Result<TomlConfig, RdhostError> {
    TomlConfig::from_file(&get_config_path()?)
}

/// Save configuration to the default TOML file
pub fn save_config(config: &TomlConfig) -> Result<(), RdhostError> {
    config.to_file(&get_config_path()?)
}

/// Load configuration and attach the stored password, if any
///
/// A missing keyring entry is not an error: the engine will prompt or fail
/// authentication on its own.
pub fn load_config_with_credentials() -> Result<TomlConfig, RdhostError> {
    let mut config = load_config()?;
    attach_password(&mut config.session)?;
    Ok(config)
}

/// Fill the snapshot's password from the keyring
pub fn attach_password(session: &mut SessionConfig) -> Result<(), RdhostError> {
    match keyring::retrieve_password(&session.server, &session.username) {
        Ok(password) => {
            debug!(password_len = password.len(), "Loaded stored session password");
            session.password = password;
            Ok(())
        }
        Err(RdhostError::Keyring(KeyringError::NotFound)) => {
            debug!(
                "No stored password for {}@{}",
                session.username, session.server
            );
            Ok(())
        }
        Err(e) => Err(e),
    }
}
