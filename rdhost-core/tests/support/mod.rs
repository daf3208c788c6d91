//! Scripted engine and host window for controller tests

#![allow(dead_code)]

use rdhost_core::config::SessionConfig;
use rdhost_core::error::EngineError;
use rdhost_core::session::{
    Alert, ControllerSettings, EngineEvent, EngineEventSink, EngineOption, HostWindow, Prompt,
    ReconnectPolicy, SessionController, SessionEngine,
};
use rdhost_core::types::{DesktopSize, ScreenRect, SessionPassword};
use std::cell::Cell;

/// Calls recorded by [`MockEngine`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    SetServer(String),
    SetUsername(String),
    SetDomain(String),
    /// Password length only
    SetPassword(usize),
    SetPort(u16),
    SetColorDepth(u8),
    SetDesktopSize(DesktopSize),
    SetFullscreen(bool),
    SetSmartSizing(bool),
    SetOption(&'static str),
    Connect,
    Disconnect,
    Focus,
    SendTaskManagerKeys,
}

impl EngineCall {
    /// Whether the call rewrites a configuration field
    pub fn is_configuration(&self) -> bool {
        !matches!(
            self,
            EngineCall::Connect
                | EngineCall::Disconnect
                | EngineCall::Focus
                | EngineCall::SendTaskManagerKeys
        )
    }
}

/// Engine double that confirms disconnects after a number of polls
pub struct MockEngine {
    pub calls: Vec<EngineCall>,
    connected: Cell<bool>,
    disconnect_pending: Cell<bool>,
    polls_left: Cell<u32>,
    confirm_after_polls: u32,
    never_confirm: bool,
    refuse_connect: bool,
    unsupported: Vec<&'static str>,
    desktop: DesktopSize,
    viewport: ScreenRect,
    sink: Option<EngineEventSink>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            connected: Cell::new(false),
            disconnect_pending: Cell::new(false),
            polls_left: Cell::new(0),
            confirm_after_polls: 0,
            never_confirm: false,
            refuse_connect: false,
            unsupported: Vec::new(),
            desktop: DesktopSize::new(0, 0),
            viewport: ScreenRect::new(100, 50, 1280, 720),
            sink: None,
        }
    }

    /// Report still-connected for `polls` queries after a disconnect request
    pub fn confirming_after(polls: u32) -> Self {
        Self {
            confirm_after_polls: polls,
            ..Self::new()
        }
    }

    pub fn never_confirming() -> Self {
        Self {
            never_confirm: true,
            ..Self::new()
        }
    }

    pub fn refusing_connect() -> Self {
        Self {
            refuse_connect: true,
            ..Self::new()
        }
    }

    pub fn without_options(unsupported: &[&'static str]) -> Self {
        Self {
            unsupported: unsupported.to_vec(),
            ..Self::new()
        }
    }

    pub fn with_viewport(mut self, viewport: ScreenRect) -> Self {
        self.viewport = viewport;
        self
    }

    /// Deliver a callback as the real engine would
    pub fn emit(&self, event: EngineEvent) {
        if let Some(sink) = &self.sink {
            let _ = sink.send(event);
        }
    }

    /// Finish a pending connect: transport up, then logon complete
    pub fn establish(&mut self) {
        self.connected.set(true);
        self.emit(EngineEvent::Connected);
        self.emit(EngineEvent::LoginComplete);
    }

    /// Lose the transport without delivering a callback
    pub fn drop_connection(&mut self) {
        self.connected.set(false);
    }

    pub fn count(&self, call: &EngineCall) -> usize {
        self.calls.iter().filter(|recorded| *recorded == call).count()
    }

    pub fn configuration_calls(&self) -> Vec<&EngineCall> {
        self.calls
            .iter()
            .filter(|call| call.is_configuration())
            .collect()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    fn confirm_disconnect(&self) {
        self.connected.set(false);
        self.disconnect_pending.set(false);
        self.emit(EngineEvent::Disconnected { reason: 1 });
    }
}

impl SessionEngine for MockEngine {
    fn set_server(&mut self, server: &str) {
        self.calls.push(EngineCall::SetServer(server.to_string()));
    }

    fn set_username(&mut self, username: &str) {
        self.calls.push(EngineCall::SetUsername(username.to_string()));
    }

    fn set_domain(&mut self, domain: &str) {
        self.calls.push(EngineCall::SetDomain(domain.to_string()));
    }

    fn set_password(&mut self, password: &SessionPassword) {
        self.calls.push(EngineCall::SetPassword(password.len()));
    }

    fn set_port(&mut self, port: u16) {
        self.calls.push(EngineCall::SetPort(port));
    }

    fn set_color_depth(&mut self, bits: u8) {
        self.calls.push(EngineCall::SetColorDepth(bits));
    }

    fn set_desktop_size(&mut self, size: DesktopSize) {
        self.desktop = size;
        self.calls.push(EngineCall::SetDesktopSize(size));
    }

    fn desktop_size(&self) -> DesktopSize {
        self.desktop
    }

    fn set_fullscreen(&mut self, fullscreen: bool) {
        self.calls.push(EngineCall::SetFullscreen(fullscreen));
    }

    fn set_smart_sizing(&mut self, enabled: bool) {
        self.calls.push(EngineCall::SetSmartSizing(enabled));
    }

    fn set_option(&mut self, option: EngineOption) -> Result<(), EngineError> {
        if self.unsupported.contains(&option.name()) {
            return Err(EngineError::Unsupported {
                option: option.name(),
            });
        }
        self.calls.push(EngineCall::SetOption(option.name()));
        Ok(())
    }

    fn connect(&mut self) -> Result<(), EngineError> {
        self.calls.push(EngineCall::Connect);
        if self.refuse_connect {
            return Err(EngineError::Rejected {
                reason: "control not initialized".to_string(),
            });
        }
        self.emit(EngineEvent::Connecting);
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), EngineError> {
        self.calls.push(EngineCall::Disconnect);
        self.disconnect_pending.set(true);
        self.polls_left.set(self.confirm_after_polls);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        if self.disconnect_pending.get() && !self.never_confirm {
            let left = self.polls_left.get();
            if left == 0 {
                self.confirm_disconnect();
            } else {
                self.polls_left.set(left - 1);
            }
        }
        self.connected.get()
    }

    fn viewport(&self) -> ScreenRect {
        self.viewport
    }

    fn focus(&mut self) {
        self.calls.push(EngineCall::Focus);
    }

    fn send_task_manager_keys(&mut self) {
        self.calls.push(EngineCall::SendTaskManagerKeys);
    }

    fn register_events(&mut self, sink: EngineEventSink) {
        self.sink = Some(sink);
    }
}

/// Host window double recording everything shown to the user
pub struct MockHost {
    pub statuses: Vec<String>,
    pub alerts: Vec<Alert>,
    pub prompts: Vec<Prompt>,
    /// Answer given to every prompt
    pub answer: bool,
    pub display: DesktopSize,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            statuses: Vec::new(),
            alerts: Vec::new(),
            prompts: Vec::new(),
            answer: true,
            display: DesktopSize::new(1920, 1080),
        }
    }

    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            ..Self::new()
        }
    }

    pub fn last_status(&self) -> Option<&str> {
        self.statuses.last().map(String::as_str)
    }
}

impl HostWindow for MockHost {
    fn set_status(&mut self, text: &str) {
        self.statuses.push(text.to_string());
    }

    fn alert(&mut self, alert: &Alert) {
        self.alerts.push(alert.clone());
    }

    fn confirm(&mut self, prompt: &Prompt) -> bool {
        self.prompts.push(prompt.clone());
        self.answer
    }

    fn primary_display(&self) -> DesktopSize {
        self.display
    }
}

pub type TestController = SessionController<MockEngine, MockHost>;

pub fn sample_config() -> SessionConfig {
    let mut config = SessionConfig::new("rds01.example.com".to_string(), "alice".to_string())
        .with_password(SessionPassword::new("correct horse".to_string()));
    config.domain = Some("CORP".to_string());
    config.desktop_width = 1024;
    config.desktop_height = 768;
    config.color_depth = 24;
    config
}

/// Short polls so reconnect tests finish quickly
pub fn fast_settings() -> ControllerSettings {
    ControllerSettings {
        reconnect: ReconnectPolicy {
            poll_interval_ms: 10,
            max_wait_secs: 1,
        },
        ..ControllerSettings::default()
    }
}

pub fn controller_with(engine: MockEngine, host: MockHost) -> TestController {
    SessionController::new(sample_config(), engine, host, fast_settings())
}

pub fn controller() -> TestController {
    controller_with(MockEngine::new(), MockHost::new())
}

/// Drive a controller to LoggedIn and forget the calls made so far
pub fn logged_in(mut controller: TestController) -> TestController {
    controller.connect().expect("connect should be accepted");
    controller.engine_mut().establish();
    controller.process_pending();
    controller.engine_mut().clear_calls();
    controller
}
