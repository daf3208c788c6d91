//! Remote desktop session module
//!
//! Lifecycle controller, engine adapter contract, hosting window contract,
//! reconnect protocol and status code diagnostics.

pub mod alert;
pub mod controller;
pub mod diagnostics;
pub mod engine;
pub mod event;
pub mod host;
pub mod reconnect;
pub mod state;

// Public re-exports
pub use alert::{Alert, AlertLevel, AlertPolicy, Prompt, PromptKind};
pub use controller::{ControllerSettings, SessionController};
pub use engine::{EngineOption, EngineOptions, OptionReport, SessionEngine};
pub use event::{EngineEvent, EngineEventSink, SessionEvent, SessionEventKind};
pub use host::HostWindow;
pub use reconnect::{ReconnectPolicy, ReconnectRequest};
pub use state::SessionState;
