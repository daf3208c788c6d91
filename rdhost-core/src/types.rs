//! Type definitions and wrappers for secure data handling
//!
//! This module provides the small value types shared by the configuration
//! snapshot, the engine adapter and the hosting window, plus a secrecy
//! wrapper that keeps the session password out of logs and debug output.

use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wrapper for the remote session password
///
/// The value is only exposed when handed to the engine adapter or the
/// keyring. Logging code may report its length, never its contents.
#[derive(Clone, Debug)]
pub struct SessionPassword(Secret<String>);

impl SessionPassword {
    /// Create a new SessionPassword from a plain string
    pub fn new(password: String) -> Self {
        Self(Secret::new(password))
    }

    /// Expose the password value (use with caution!)
    ///
    /// This should only be called when passing the password to the
    /// session engine or storing it in the keyring.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Number of characters in the password, safe to log
    pub fn len(&self) -> usize {
        self.expose().chars().count()
    }

    /// Whether no password has been supplied
    pub fn is_empty(&self) -> bool {
        self.expose().is_empty()
    }
}

impl Default for SessionPassword {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl From<String> for SessionPassword {
    fn from(password: String) -> Self {
        Self::new(password)
    }
}

/// Remote desktop resolution in pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DesktopSize {
    pub width: u32,
    pub height: u32,
}

impl DesktopSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for DesktopSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// On-screen rectangle of the session viewport
///
/// Coordinates are screen coordinates, so a settings editor can offer
/// "fit to current size" without knowing the window layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScreenRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl ScreenRect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Size of the rectangle as a desktop resolution
    pub fn size(&self) -> DesktopSize {
        DesktopSize::new(self.width, self.height)
    }
}

/// Position of a controller inside the hosting application's session list
///
/// Opaque to the controller: it is set by the owner and copied onto every
/// lifecycle event so one subscriber can serve many session windows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListIndex(pub usize);

impl fmt::Display for ListIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<usize> for ListIndex {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

/// Keyring service name for stored session passwords
pub const KEYRING_SERVICE_SESSION: &str = "rdhost-session";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_debug_is_redacted() {
        let password = SessionPassword::new("hunter2".to_string());
        let debug = format!("{:?}", password);
        assert!(!debug.contains("hunter2"));
        assert_eq!(password.len(), 7);
        assert!(!password.is_empty());
    }

    #[test]
    fn test_default_password_is_empty() {
        assert!(SessionPassword::default().is_empty());
    }

    #[test]
    fn test_rect_size() {
        let rect = ScreenRect::new(-10, 40, 1280, 720);
        assert_eq!(rect.size(), DesktopSize::new(1280, 720));
        assert_eq!(rect.size().to_string(), "1280x720");
    }

    #[test]
    fn test_list_index_display() {
        assert_eq!(ListIndex(3).to_string(), "#3");
        assert_eq!(ListIndex::from(5), ListIndex(5));
    }
}
