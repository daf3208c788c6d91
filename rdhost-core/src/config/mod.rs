//! Configuration module
//!
//! Holds the session configuration snapshot and handles loading and saving
//! it from TOML files.

use crate::types::{DesktopSize, SessionPassword};
use serde::{Deserialize, Serialize};

pub mod toml_config;

/// Connection parameters for one remote desktop session
///
/// A snapshot is handed to the engine when the controller is created and
/// replaced wholesale when settings change. Editing a clone has no effect on
/// a live session. The password is never serialized; it is kept in the
/// system keyring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Remote host name or IP address
    pub server: String,

    /// Account used to log on
    pub username: String,

    /// Optional logon domain
    #[serde(default)]
    pub domain: Option<String>,

    #[serde(skip)]
    pub password: SessionPassword,

    /// Remote port (0 = engine default)
    #[serde(default)]
    pub port: u16,

    /// Color depth in bits per pixel
    #[serde(default = "default_color_depth")]
    pub color_depth: u8,

    #[serde(default = "default_desktop_width")]
    pub desktop_width: u32,

    #[serde(default = "default_desktop_height")]
    pub desktop_height: u32,

    #[serde(default)]
    pub fullscreen: bool,

    /// Name shown in the hosting window's session list
    #[serde(default)]
    pub display_name: String,
}

fn default_color_depth() -> u8 {
    32
}
fn default_desktop_width() -> u32 {
    1024
}
fn default_desktop_height() -> u32 {
    768
}

const COLOR_DEPTHS: [u8; 5] = [8, 15, 16, 24, 32];

impl SessionConfig {
    /// Create a new session configuration with default display settings
    pub fn new(server: String, username: String) -> Self {
        Self {
            server,
            username,
            ..Self::default()
        }
    }

    /// Attach a password to the snapshot
    pub fn with_password(mut self, password: SessionPassword) -> Self {
        self.password = password;
        self
    }

    pub fn desktop_size(&self) -> DesktopSize {
        DesktopSize::new(self.desktop_width, self.desktop_height)
    }

    /// Domain if one is set and non-empty
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref().filter(|domain| !domain.is_empty())
    }

    /// Domain for display, `(none)` when unset
    pub fn domain_or_none(&self) -> &str {
        self.domain().unwrap_or("(none)")
    }

    /// Window title: display name, falling back to the server
    pub fn title(&self) -> &str {
        if self.display_name.is_empty() {
            &self.server
        } else {
            &self.display_name
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.server.trim().is_empty() {
            return Err("Server cannot be empty".to_string());
        }

        if self.server.chars().any(char::is_whitespace) {
            return Err("Server contains invalid characters".to_string());
        }

        if self.username.trim().is_empty() {
            return Err("Username cannot be empty".to_string());
        }

        if !COLOR_DEPTHS.contains(&self.color_depth) {
            return Err(format!(
                "Color depth must be one of 8, 15, 16, 24 or 32, got: {}",
                self.color_depth
            ));
        }

        if self.desktop_width == 0 || self.desktop_height == 0 {
            return Err("Desktop size cannot be zero".to_string());
        }

        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            server: String::new(),
            username: String::new(),
            domain: None,
            password: SessionPassword::default(),
            port: 0,
            color_depth: default_color_depth(),
            desktop_width: default_desktop_width(),
            desktop_height: default_desktop_height(),
            fullscreen: false,
            display_name: String::new(),
        }
    }
}

/// Current configuration snapshot of a controller
///
/// Read access is shared; writes replace the whole snapshot at once.
#[derive(Debug, Clone)]
pub struct SnapshotCell {
    current: SessionConfig,
}

impl SnapshotCell {
    pub fn new(config: SessionConfig) -> Self {
        Self { current: config }
    }

    pub fn current(&self) -> &SessionConfig {
        &self.current
    }

    /// Swap in a new snapshot, returning the previous one
    pub fn replace(&mut self, config: SessionConfig) -> SessionConfig {
        std::mem::replace(&mut self.current, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let config = SessionConfig::new("rds.example.com".to_string(), "alice".to_string());
        assert!(config.validate().is_ok());
        assert_eq!(config.desktop_size(), DesktopSize::new(1024, 768));
        assert_eq!(config.color_depth, 32);
        assert_eq!(config.port, 0);
    }

    #[test]
    fn test_validation_errors() {
        let empty = SessionConfig::new(String::new(), "alice".to_string());
        assert_eq!(empty.validate().unwrap_err(), "Server cannot be empty");

        let spaced = SessionConfig::new("bad host".to_string(), "alice".to_string());
        assert_eq!(
            spaced.validate().unwrap_err(),
            "Server contains invalid characters"
        );

        let no_user = SessionConfig::new("h".to_string(), " ".to_string());
        assert_eq!(no_user.validate().unwrap_err(), "Username cannot be empty");

        let mut depth = SessionConfig::new("h".to_string(), "u".to_string());
        depth.color_depth = 12;
        assert!(depth.validate().unwrap_err().contains("12"));

        let mut size = SessionConfig::new("h".to_string(), "u".to_string());
        size.desktop_height = 0;
        assert!(size.validate().is_err());
    }

    #[test]
    fn test_domain_helpers() {
        let mut config = SessionConfig::new("h".to_string(), "u".to_string());
        assert_eq!(config.domain_or_none(), "(none)");

        config.domain = Some(String::new());
        assert_eq!(config.domain(), None);

        config.domain = Some("CORP".to_string());
        assert_eq!(config.domain(), Some("CORP"));
    }

    #[test]
    fn test_title_falls_back_to_server() {
        let mut config = SessionConfig::new("rds01".to_string(), "u".to_string());
        assert_eq!(config.title(), "rds01");
        config.display_name = "Build farm".to_string();
        assert_eq!(config.title(), "Build farm");
    }

    #[test]
    fn test_snapshot_replace() {
        let mut cell = SnapshotCell::new(SessionConfig::new("old".to_string(), "u".to_string()));
        let previous = cell.replace(SessionConfig::new("new".to_string(), "u".to_string()));
        assert_eq!(previous.server, "old");
        assert_eq!(cell.current().server, "new");
    }
}
