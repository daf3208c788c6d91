//! Session lifecycle states
//!
//! The state is owned by the lifecycle controller and only changes through
//! explicit operations or engine callbacks delivered on the owning thread.

use std::fmt;

/// Remote desktop session states
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Configured but never connected
    #[default]
    Idle,

    /// Connect request issued, waiting for the engine
    Connecting,

    /// Transport established, login still pending
    Connected,

    /// Remote logon finished
    LoggedIn,

    /// Disconnect request issued, waiting for confirmation
    Disconnecting,

    /// Engine reported the session closed
    Disconnected,
}

impl SessionState {
    /// Whether a connection attempt or live session is in progress
    pub fn is_active(self) -> bool {
        matches!(
            self,
            SessionState::Connecting | SessionState::Connected | SessionState::LoggedIn
        )
    }

    /// Whether the engine has reported an established transport
    pub fn is_established(self) -> bool {
        matches!(self, SessionState::Connected | SessionState::LoggedIn)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::Connecting => write!(f, "connecting"),
            SessionState::Connected => write!(f, "connected"),
            SessionState::LoggedIn => write!(f, "logged in"),
            SessionState::Disconnecting => write!(f, "disconnecting"),
            SessionState::Disconnected => write!(f, "disconnected"),
        }
    }
}
