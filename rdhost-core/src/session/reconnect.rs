//! Reconnect policy and request geometry
//!
//! Engines cannot be reconfigured live, so every settings change is a full
//! disconnect, wait-for-confirmation, reconfigure, connect cycle. This module
//! holds the tunables for the wait and the pure geometry decision.

use crate::config::SessionConfig;
use crate::types::DesktopSize;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the disconnect confirmation wait
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconnectPolicy {
    /// Interval between connected-state polls in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Give up waiting after this many seconds; 0 waits forever
    #[serde(default = "default_max_wait")]
    pub max_wait_secs: u64,
}

fn default_poll_interval() -> u64 {
    1000
}
fn default_max_wait() -> u64 {
    30
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
            max_wait_secs: default_max_wait(),
        }
    }
}

impl ReconnectPolicy {
    /// Validate the entire policy
    ///
    /// # Returns
    ///
    /// * `Ok(())` if all fields are valid
    /// * `Err(PolicyValidationError)` with the first validation error encountered
    pub fn validate(&self) -> Result<(), PolicyValidationError> {
        self.validate_poll_interval()?;
        self.validate_max_wait()?;
        Ok(())
    }

    /// Validate poll_interval_ms is within range 1-60000
    fn validate_poll_interval(&self) -> Result<(), PolicyValidationError> {
        if self.poll_interval_ms < 1 || self.poll_interval_ms > 60_000 {
            Err(PolicyValidationError::InvalidPollInterval(self.poll_interval_ms))
        } else {
            Ok(())
        }
    }

    /// Validate max_wait_secs is 0 (unbounded) or at least one poll long
    fn validate_max_wait(&self) -> Result<(), PolicyValidationError> {
        if self.max_wait_secs > 3600 {
            return Err(PolicyValidationError::InvalidMaxWait(self.max_wait_secs));
        }
        if self.max_wait_secs != 0 && self.max_wait_secs * 1000 < self.poll_interval_ms {
            return Err(PolicyValidationError::MaxWaitShorterThanPoll(
                self.max_wait_secs,
                self.poll_interval_ms,
            ));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Wait budget, `None` when unbounded
    pub fn max_wait(&self) -> Option<Duration> {
        match self.max_wait_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

/// Validation errors for ReconnectPolicy
#[derive(Debug, thiserror::Error)]
pub enum PolicyValidationError {
    #[error("poll_interval_ms must be between 1 and 60000, got: {0}")]
    InvalidPollInterval(u64),

    #[error("max_wait_secs must be between 0 and 3600, got: {0}")]
    InvalidMaxWait(u64),

    #[error("max_wait_secs ({0}s) must cover at least one poll interval ({1}ms)")]
    MaxWaitShorterThanPoll(u64, u64),
}

/// Flags for a reconnect cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconnectRequest {
    /// Re-apply the current snapshot before connecting
    pub has_changes: bool,
    /// Size the remote desktop to the current viewport
    pub fit_to_window: bool,
    /// Size the remote desktop to the primary display and go fullscreen
    pub fullscreen: bool,
}

impl ReconnectRequest {
    pub fn new(has_changes: bool, fit_to_window: bool, fullscreen: bool) -> Self {
        Self {
            has_changes,
            fit_to_window,
            fullscreen,
        }
    }

    /// Reconnect with the engine's current configuration
    pub fn plain() -> Self {
        Self::default()
    }

    /// Re-apply the snapshot after a settings change
    pub fn with_changes() -> Self {
        Self::new(true, false, false)
    }

    /// Desktop geometry to apply before connecting
    ///
    /// Returns `None` when the engine's current geometry must be left alone.
    /// Fullscreen wins over fit-to-window.
    pub fn target_geometry(
        &self,
        config: &SessionConfig,
        viewport: DesktopSize,
        primary_display: DesktopSize,
    ) -> Option<Geometry> {
        if self.fullscreen {
            return Some(Geometry {
                size: primary_display,
                fullscreen: true,
            });
        }

        if !self.has_changes {
            return None;
        }

        let size = if self.fit_to_window {
            viewport
        } else {
            config.desktop_size()
        };

        Some(Geometry {
            size,
            fullscreen: config.fullscreen,
        })
    }
}

/// Desktop size and fullscreen flag pushed to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub size: DesktopSize,
    pub fullscreen: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: DesktopSize = DesktopSize::new(1280, 720);
    const DISPLAY: DesktopSize = DesktopSize::new(1920, 1080);

    fn config() -> SessionConfig {
        let mut config = SessionConfig::new("h".to_string(), "u".to_string());
        config.desktop_width = 1024;
        config.desktop_height = 768;
        config
    }

    #[test]
    fn test_default_policy() {
        let policy = ReconnectPolicy::default();
        assert_eq!(policy.poll_interval(), Duration::from_secs(1));
        assert_eq!(policy.max_wait(), Some(Duration::from_secs(30)));
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_zero_wait_is_unbounded() {
        let policy = ReconnectPolicy {
            max_wait_secs: 0,
            ..ReconnectPolicy::default()
        };
        assert_eq!(policy.max_wait(), None);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_policy_validation() {
        let zero_poll = ReconnectPolicy {
            poll_interval_ms: 0,
            max_wait_secs: 30,
        };
        assert!(matches!(
            zero_poll.validate(),
            Err(PolicyValidationError::InvalidPollInterval(0))
        ));

        let short_wait = ReconnectPolicy {
            poll_interval_ms: 5000,
            max_wait_secs: 2,
        };
        assert!(matches!(
            short_wait.validate(),
            Err(PolicyValidationError::MaxWaitShorterThanPoll(2, 5000))
        ));

        let long_wait = ReconnectPolicy {
            poll_interval_ms: 1000,
            max_wait_secs: 7200,
        };
        assert!(long_wait.validate().is_err());
    }

    #[test]
    fn test_plain_request_keeps_geometry() {
        assert_eq!(
            ReconnectRequest::plain().target_geometry(&config(), VIEWPORT, DISPLAY),
            None
        );
        // fit_to_window alone does nothing without changes
        let request = ReconnectRequest::new(false, true, false);
        assert_eq!(request.target_geometry(&config(), VIEWPORT, DISPLAY), None);
    }

    #[test]
    fn test_changes_use_snapshot_size() {
        let geometry = ReconnectRequest::with_changes()
            .target_geometry(&config(), VIEWPORT, DISPLAY)
            .unwrap();
        assert_eq!(geometry.size, DesktopSize::new(1024, 768));
        assert!(!geometry.fullscreen);
    }

    #[test]
    fn test_fit_to_window_uses_viewport() {
        let geometry = ReconnectRequest::new(true, true, false)
            .target_geometry(&config(), VIEWPORT, DISPLAY)
            .unwrap();
        assert_eq!(geometry.size, VIEWPORT);
    }

    #[test]
    fn test_fullscreen_overrides_everything() {
        for (changes, fit) in [(false, false), (true, false), (true, true), (false, true)] {
            let geometry = ReconnectRequest::new(changes, fit, true)
                .target_geometry(&config(), VIEWPORT, DISPLAY)
                .unwrap();
            assert_eq!(geometry.size, DISPLAY);
            assert!(geometry.fullscreen);
        }
    }

    #[test]
    fn test_snapshot_fullscreen_flag_is_honoured() {
        let mut config = config();
        config.fullscreen = true;
        let geometry = ReconnectRequest::with_changes()
            .target_geometry(&config, VIEWPORT, DISPLAY)
            .unwrap();
        assert!(geometry.fullscreen);
    }
}
