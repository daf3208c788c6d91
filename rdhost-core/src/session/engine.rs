//! Session engine adapter contract
//!
//! The remote desktop protocol itself lives in an external engine. The
//! controller only talks to it through [`SessionEngine`]: write-only
//! configuration knobs, connect/disconnect, a connected-state query,
//! geometry, and an event sink for callbacks.

use crate::error::EngineError;
use crate::session::event::EngineEventSink;
use crate::types::{DesktopSize, ScreenRect, SessionPassword};
use serde::{Deserialize, Serialize};

/// Interface to an external remote desktop engine
///
/// All methods are called from the thread that owns the controller.
/// Callbacks must be delivered through the sink passed to
/// [`SessionEngine::register_events`], never by calling back into the
/// controller directly.
pub trait SessionEngine {
    fn set_server(&mut self, server: &str);
    fn set_username(&mut self, username: &str);
    /// Logon domain; empty clears it
    fn set_domain(&mut self, domain: &str);
    fn set_password(&mut self, password: &SessionPassword);
    /// Server port; 0 restores the engine default
    fn set_port(&mut self, port: u16);
    fn set_color_depth(&mut self, bits: u8);
    fn set_desktop_size(&mut self, size: DesktopSize);
    fn desktop_size(&self) -> DesktopSize;
    fn set_fullscreen(&mut self, fullscreen: bool);
    /// Scale the remote desktop to the viewport instead of scrolling
    fn set_smart_sizing(&mut self, enabled: bool);

    /// Apply an optional capability
    ///
    /// Older engine builds may not expose every option; they must return
    /// [`EngineError::Unsupported`] rather than fail the session.
    fn set_option(&mut self, option: EngineOption) -> Result<(), EngineError>;

    /// Issue a connect request; progress is reported through callbacks
    fn connect(&mut self) -> Result<(), EngineError>;

    /// Issue a disconnect request; confirmation arrives as a callback
    fn disconnect(&mut self) -> Result<(), EngineError>;

    fn is_connected(&self) -> bool;

    /// On-screen rectangle of the session viewport
    fn viewport(&self) -> ScreenRect;

    /// Give keyboard focus to the session viewport
    fn focus(&mut self) {}

    /// Send Ctrl+Alt+End to the remote session, opening its task manager
    fn send_task_manager_keys(&mut self) {}

    fn register_events(&mut self, sink: EngineEventSink);
}

/// Optional performance and compatibility knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineOption {
    BackgroundInput(bool),
    Compression(bool),
    BitmapPersistence(bool),
    CachePersistence(bool),
    AcceleratorPassthrough(bool),
    AuthenticationLevel(u8),
    CredSsp(bool),
    AutoReconnect(bool),
    MaxReconnectAttempts(u32),
    NegotiateSecurityLayer(bool),
}

impl EngineOption {
    /// Stable option name, used in logs and reports
    pub fn name(&self) -> &'static str {
        match self {
            EngineOption::BackgroundInput(_) => "background_input",
            EngineOption::Compression(_) => "compression",
            EngineOption::BitmapPersistence(_) => "bitmap_persistence",
            EngineOption::CachePersistence(_) => "cache_persistence",
            EngineOption::AcceleratorPassthrough(_) => "accelerator_passthrough",
            EngineOption::AuthenticationLevel(_) => "authentication_level",
            EngineOption::CredSsp(_) => "credssp",
            EngineOption::AutoReconnect(_) => "auto_reconnect",
            EngineOption::MaxReconnectAttempts(_) => "max_reconnect_attempts",
            EngineOption::NegotiateSecurityLayer(_) => "negotiate_security_layer",
        }
    }
}

/// Engine options as stored in the `[engine]` configuration section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOptions {
    #[serde(default)]
    pub allow_background_input: bool,

    #[serde(default = "default_true")]
    pub compression: bool,

    #[serde(default = "default_true")]
    pub bitmap_persistence: bool,

    #[serde(default = "default_true")]
    pub cache_persistence: bool,

    #[serde(default = "default_true")]
    pub accelerator_passthrough: bool,

    /// 0 = connect without warning, 1 = refuse, 2 = warn and let the user decide
    #[serde(default = "default_authentication_level")]
    pub authentication_level: u8,

    #[serde(default)]
    pub enable_credssp: bool,

    #[serde(default = "default_true")]
    pub enable_auto_reconnect: bool,

    #[serde(default = "default_max_reconnect_attempts")]
    pub max_reconnect_attempts: u32,

    #[serde(default = "default_true")]
    pub negotiate_security_layer: bool,
}

fn default_true() -> bool {
    true
}
fn default_authentication_level() -> u8 {
    2
}
fn default_max_reconnect_attempts() -> u32 {
    3
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            allow_background_input: false,
            compression: true,
            bitmap_persistence: true,
            cache_persistence: true,
            accelerator_passthrough: true,
            authentication_level: default_authentication_level(),
            enable_credssp: false,
            enable_auto_reconnect: true,
            max_reconnect_attempts: default_max_reconnect_attempts(),
            negotiate_security_layer: true,
        }
    }
}

impl EngineOptions {
    /// Options in the order they are applied to the engine
    pub fn to_engine_options(&self) -> Vec<EngineOption> {
        vec![
            EngineOption::AcceleratorPassthrough(self.accelerator_passthrough),
            EngineOption::Compression(self.compression),
            EngineOption::BitmapPersistence(self.bitmap_persistence),
            EngineOption::CachePersistence(self.cache_persistence),
            EngineOption::AuthenticationLevel(self.authentication_level),
            EngineOption::CredSsp(self.enable_credssp),
            EngineOption::AutoReconnect(self.enable_auto_reconnect),
            EngineOption::MaxReconnectAttempts(self.max_reconnect_attempts),
            EngineOption::NegotiateSecurityLayer(self.negotiate_security_layer),
            EngineOption::BackgroundInput(self.allow_background_input),
        ]
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.authentication_level > 2 {
            return Err(format!(
                "authentication_level must be 0, 1 or 2, got: {}",
                self.authentication_level
            ));
        }
        if self.max_reconnect_attempts > 20 {
            return Err(format!(
                "max_reconnect_attempts must be at most 20, got: {}",
                self.max_reconnect_attempts
            ));
        }
        Ok(())
    }
}

/// Outcome of applying optional engine options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionReport {
    /// Options the engine accepted
    pub applied: Vec<&'static str>,
    /// Options the engine refused, with the reason
    pub skipped: Vec<(&'static str, EngineError)>,
}

impl OptionReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    pub fn was_applied(&self, name: &str) -> bool {
        self.applied.iter().any(|applied| *applied == name)
    }
}

/// Apply every option, recording failures instead of propagating them
pub fn apply_options<E: SessionEngine + ?Sized>(
    engine: &mut E,
    options: &EngineOptions,
) -> OptionReport {
    let mut report = OptionReport::default();

    for option in options.to_engine_options() {
        match engine.set_option(option) {
            Ok(()) => {
                tracing::debug!(option = option.name(), value = ?option, "Engine option applied");
                report.applied.push(option.name());
            }
            Err(e) => {
                tracing::warn!(option = option.name(), "Could not configure engine option: {}", e);
                report.skipped.push((option.name(), e));
            }
        }
    }

    report
}
