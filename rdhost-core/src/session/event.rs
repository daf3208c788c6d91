//! Engine callbacks and lifecycle events
//!
//! Engines report progress as [`EngineEvent`]s pushed into an
//! [`EngineEventSink`]; the controller consumes them on its own thread and
//! re-emits [`SessionEvent`]s tagged with its list index.

use crate::config::SessionConfig;
use crate::session::diagnostics::DisconnectCategory;
use crate::types::ListIndex;
use tokio::sync::mpsc;

/// Raw callbacks raised by a session engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    /// Connection attempt started
    Connecting,

    /// Transport established
    Connected,

    /// Remote logon finished
    LoginComplete,

    /// Session closed with an engine reason code
    Disconnected { reason: i32 },

    /// Advisory warning, e.g. certificate problems
    Warning { code: i32 },

    /// Unrecoverable error for the current session
    FatalError { code: i32 },
}

/// Channel an engine uses to deliver callbacks to its controller
pub type EngineEventSink = mpsc::UnboundedSender<EngineEvent>;

/// Lifecycle event payloads
#[derive(Debug, Clone)]
pub enum SessionEventKind {
    Connecting,
    Connected,
    LoginComplete,
    Disconnected {
        reason: i32,
        category: DisconnectCategory,
    },
    /// The user confirmed closing the session window
    ClosingRequested,
    Activated,
    Shown,
    SettingsChanged {
        config: SessionConfig,
    },
}

/// Lifecycle event delivered to subscribers
#[derive(Debug, Clone)]
pub struct SessionEvent {
    /// List index of the emitting controller
    pub list_index: ListIndex,
    pub kind: SessionEventKind,
}

impl SessionEvent {
    pub fn new(list_index: ListIndex, kind: SessionEventKind) -> Self {
        Self { list_index, kind }
    }

    /// Short name of the event kind, used in logs
    pub fn name(&self) -> &'static str {
        match self.kind {
            SessionEventKind::Connecting => "connecting",
            SessionEventKind::Connected => "connected",
            SessionEventKind::LoginComplete => "login-complete",
            SessionEventKind::Disconnected { .. } => "disconnected",
            SessionEventKind::ClosingRequested => "closing",
            SessionEventKind::Activated => "activated",
            SessionEventKind::Shown => "shown",
            SessionEventKind::SettingsChanged { .. } => "settings-changed",
        }
    }
}
