//! User-facing alerts and the policy deciding when to raise them
//!
//! Most disconnects are benign and only logged. A narrow set of codes
//! indicates misconfiguration and interrupts the user with a blocking alert.

use crate::config::SessionConfig;
use serde::{Deserialize, Serialize};

/// Severity of a blocking alert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Info,
    Error,
}

/// Blocking message shown by the hosting window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
    pub level: AlertLevel,
}

impl Alert {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            level: AlertLevel::Info,
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            level: AlertLevel::Error,
        }
    }

    /// Connection refused for an authentication-class reason
    pub fn authentication_failure(code: i32, reason: &str, config: &SessionConfig) -> Self {
        Self::error(
            "Authentication Error",
            format!(
                "Connection failed: {}\n\nReason Code: {}\n\n{}",
                reason,
                code,
                session_identity(config)
            ),
        )
    }

    /// Engine internal error, with the usual suspects
    pub fn internal_error(code: i32, config: &SessionConfig) -> Self {
        Self::error(
            "Internal RDP Error",
            format!(
                "Connection failed with internal error.\n\n\
                 This may be caused by:\n\
                 - Incompatible security settings\n\
                 - Display/resolution configuration issues\n\
                 - Server policy restrictions\n\n\
                 Reason Code: {}\n\n{}\n\n\
                 Try checking the log output for more details.",
                code,
                session_identity(config)
            ),
        )
    }

    pub fn fatal_error(code: i32, description: &str, config: &SessionConfig) -> Self {
        Self::error(
            "Fatal Error",
            format!(
                "Fatal RDP Error: {}\n\nError Code: {}\n\n{}",
                description,
                code,
                session_identity(config)
            ),
        )
    }

    /// Notice shown before settings are applied to a live session
    pub fn restart_notice(title: impl Into<String>) -> Self {
        Self::info(title, "This will restart your connection")
    }
}

fn session_identity(config: &SessionConfig) -> String {
    format!(
        "Server: {}\nUsername: {}\nDomain: {}",
        config.server,
        config.username,
        config.domain_or_none()
    )
}

/// Answer style for a confirmation prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    YesNo,
    OkCancel,
}

/// Question the hosting window must answer before the controller proceeds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub title: String,
    pub message: String,
    pub kind: PromptKind,
}

impl Prompt {
    pub fn new(title: impl Into<String>, message: impl Into<String>, kind: PromptKind) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind,
        }
    }

    pub fn close_window(title: impl Into<String>) -> Self {
        Self::new(
            title,
            "Are you sure you want to close this window?",
            PromptKind::YesNo,
        )
    }

    pub fn enter_fullscreen(title: impl Into<String>) -> Self {
        Self::new(
            title,
            "You are about to enter in Fullscreen mode.\n\
             By default, the remote desktop resolution will be the same as what you see on the window.\n\n\
             Would you like to resize it automatically based on your screen resolution? \
             It stays in effect after you leave Fullscreen.\n\n\
             Note: This will reconnect.",
            PromptKind::YesNo,
        )
    }

    pub fn fit_to_window(title: impl Into<String>) -> Self {
        Self::new(
            title,
            "This will resize the server resolution based on this current client window size, \
             though it will not affect your current settings.\n\n\
             Do you want to continue?",
            PromptKind::OkCancel,
        )
    }
}

/// Which disconnect codes interrupt the user
///
/// The authentication list comes from field experience with one engine and
/// is kept as data so deployments can tune it without code changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertPolicy {
    /// Codes reported as authentication failures
    #[serde(default = "default_authentication_codes")]
    pub authentication_codes: Vec<i32>,

    /// Codes reported with the detailed internal error explanation
    #[serde(default = "default_internal_error_codes")]
    pub internal_error_codes: Vec<i32>,
}

fn default_authentication_codes() -> Vec<i32> {
    // computer name invalid, connection timeout, license protocol, internal security
    vec![2308, 264, 1286, 2055]
}

fn default_internal_error_codes() -> Vec<i32> {
    vec![516]
}

impl Default for AlertPolicy {
    fn default() -> Self {
        Self {
            authentication_codes: default_authentication_codes(),
            internal_error_codes: default_internal_error_codes(),
        }
    }
}

impl AlertPolicy {
    /// Alert to raise for a disconnect, if any
    pub fn disconnect_alert(&self, code: i32, reason: &str, config: &SessionConfig) -> Option<Alert> {
        if self.authentication_codes.contains(&code) {
            Some(Alert::authentication_failure(code, reason, config))
        } else if self.internal_error_codes.contains(&code) {
            Some(Alert::internal_error(code, config))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SessionConfig {
        let mut config = SessionConfig::new("rds.example.com".to_string(), "alice".to_string());
        config.domain = Some("CORP".to_string());
        config
    }

    #[test]
    fn test_authentication_codes_alert() {
        let policy = AlertPolicy::default();
        for code in [2308, 264, 1286, 2055] {
            let alert = policy
                .disconnect_alert(code, "reason text", &config())
                .expect("authentication code should alert");
            assert_eq!(alert.title, "Authentication Error");
            assert_eq!(alert.level, AlertLevel::Error);
            assert!(alert.message.contains(&format!("Reason Code: {}", code)));
            assert!(alert.message.contains("Server: rds.example.com"));
            assert!(alert.message.contains("Domain: CORP"));
        }
    }

    #[test]
    fn test_internal_error_alert() {
        let alert = AlertPolicy::default()
            .disconnect_alert(516, "Internal error", &config())
            .unwrap();
        assert_eq!(alert.title, "Internal RDP Error");
        assert!(alert.message.contains("Incompatible security settings"));
    }

    #[test]
    fn test_benign_codes_do_not_alert() {
        let policy = AlertPolicy::default();
        for code in [0, 1, 2, 3, 2822, 3079, 9999] {
            assert!(policy.disconnect_alert(code, "x", &config()).is_none());
        }
    }

    #[test]
    fn test_policy_is_configurable() {
        let policy = AlertPolicy {
            authentication_codes: vec![2822],
            internal_error_codes: vec![],
        };
        assert!(policy.disconnect_alert(2822, "Logon failure", &config()).is_some());
        assert!(policy.disconnect_alert(2308, "x", &config()).is_none());
        assert!(policy.disconnect_alert(516, "x", &config()).is_none());
    }

    #[test]
    fn test_missing_domain_is_reported() {
        let config = SessionConfig::new("h".to_string(), "u".to_string());
        let alert = Alert::fatal_error(2, "Out of memory", &config);
        assert!(alert.message.contains("Fatal RDP Error: Out of memory"));
        assert!(alert.message.contains("Domain: (none)"));
    }
}
