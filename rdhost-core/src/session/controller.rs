//! Session lifecycle controller
//!
//! Owns one engine and one configuration snapshot, drives the
//! connect/disconnect/reconnect state machine and turns engine callbacks
//! into [`SessionEvent`]s for the hosting application.
//!
//! Everything runs on the thread that owns the controller. Engine callbacks
//! queue up in a channel and are handled by [`SessionController::process_pending`]
//! or [`SessionController::next_engine_event`]; the reconnect wait drains the
//! same channel between polls, because the disconnect confirmation it waits
//! for arrives through it.

use crate::config::{SessionConfig, SnapshotCell};
use crate::error::SessionError;
use crate::session::alert::{Alert, AlertPolicy, Prompt};
use crate::session::diagnostics::{
    describe_disconnect, describe_fatal_error, describe_warning, disconnect_category,
};
use crate::session::engine::{apply_options, EngineOptions, OptionReport, SessionEngine};
use crate::session::event::{EngineEvent, SessionEvent, SessionEventKind};
use crate::session::host::HostWindow;
use crate::session::reconnect::{ReconnectPolicy, ReconnectRequest};
use crate::session::state::SessionState;
use crate::types::{ListIndex, ScreenRect};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// Tunables for a controller, usually read from the configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControllerSettings {
    pub engine: EngineOptions,
    pub reconnect: ReconnectPolicy,
    pub alerts: AlertPolicy,
}

/// Lifecycle controller for a single remote desktop session
pub struct SessionController<E: SessionEngine, H: HostWindow> {
    engine: E,
    host: H,
    snapshot: SnapshotCell,
    state: SessionState,
    list_index: ListIndex,
    settings: ControllerSettings,
    option_report: OptionReport,
    /// Last fit-to-window choice, reused by plain reconnects
    fit_to_window: bool,
    smart_sizing: bool,
    engine_events: mpsc::UnboundedReceiver<EngineEvent>,
    subscribers: Vec<mpsc::UnboundedSender<SessionEvent>>,
}

impl<E: SessionEngine, H: HostWindow> SessionController<E, H> {
    /// Create a controller and configure the engine from the snapshot
    ///
    /// Optional engine options that fail to apply are logged and recorded
    /// in [`SessionController::option_report`]; construction still succeeds.
    pub fn new(config: SessionConfig, mut engine: E, host: H, settings: ControllerSettings) -> Self {
        let (sink, engine_events) = mpsc::unbounded_channel();
        engine.register_events(sink);

        info!(
            server = %config.server,
            username = %config.username,
            domain = config.domain_or_none(),
            password_len = config.password.len(),
            port = config.port,
            "Initializing remote desktop session"
        );

        configure_engine(&mut engine, &config);
        let option_report = apply_options(&mut engine, &settings.engine);
        if !option_report.is_complete() {
            warn!(
                skipped = option_report.skipped.len(),
                "Some engine options are not supported, connecting anyway"
            );
        }

        Self {
            engine,
            host,
            snapshot: SnapshotCell::new(config),
            state: SessionState::Idle,
            list_index: ListIndex::default(),
            settings,
            option_report,
            fit_to_window: false,
            smart_sizing: false,
            engine_events,
            subscribers: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &SessionConfig {
        self.snapshot.current()
    }

    pub fn list_index(&self) -> ListIndex {
        self.list_index
    }

    /// Set by the owner once the session has a place in its list
    pub fn set_list_index(&mut self, index: ListIndex) {
        self.list_index = index;
    }

    pub fn option_report(&self) -> &OptionReport {
        &self.option_report
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn is_fit_to_window(&self) -> bool {
        self.fit_to_window
    }

    pub fn is_smart_sizing(&self) -> bool {
        self.smart_sizing
    }

    /// Open a new event stream for this controller
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<SessionEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Attach an existing sender, typically one shared by many controllers
    pub fn add_subscriber(&mut self, sender: mpsc::UnboundedSender<SessionEvent>) {
        self.subscribers.push(sender);
    }

    /// On-screen rectangle of the session viewport, for "fit to current size"
    pub fn viewport_rect(&self) -> ScreenRect {
        self.engine.viewport()
    }

    /// Start connecting
    ///
    /// Ignored while a connection attempt or session is already active.
    /// Success or failure of the attempt is reported through engine callbacks;
    /// an error here only means the engine refused the request outright.
    pub fn connect(&mut self) -> Result<(), SessionError> {
        if self.state.is_active() {
            warn!(state = %self.state, "Connect requested while session is active, ignoring");
            return Ok(());
        }
        self.issue_connect()
    }

    fn issue_connect(&mut self) -> Result<(), SessionError> {
        self.host.set_status("Starting ...");
        self.transition(SessionState::Connecting);

        if let Err(e) = self.engine.connect() {
            error!(server = %self.config().server, "Engine refused connect request: {}", e);
            self.transition(SessionState::Disconnected);
            return Err(e.into());
        }
        Ok(())
    }

    /// Request disconnection
    ///
    /// Only reaches the engine when it reports a live connection.
    pub fn disconnect(&mut self) -> Result<(), SessionError> {
        self.host.set_status("Disconnecting ...");

        if !self.engine.is_connected() {
            if self.state.is_established() {
                debug!(state = %self.state, "Engine reports no connection, nothing to disconnect");
                self.transition(SessionState::Disconnected);
            }
            return Ok(());
        }

        self.transition(SessionState::Disconnecting);
        self.engine.disconnect()?;
        Ok(())
    }

    /// Tear the session down and bring it back up
    ///
    /// Waits for the engine to confirm the disconnect before touching the
    /// configuration, since connecting early makes engines fail with
    /// internal errors. Queued engine callbacks are handled while waiting.
    pub async fn reconnect(&mut self, request: ReconnectRequest) -> Result<(), SessionError> {
        info!(
            has_changes = request.has_changes,
            fit_to_window = request.fit_to_window,
            fullscreen = request.fullscreen,
            "Reconnecting session"
        );

        self.disconnect()?;

        self.host
            .set_status("Waiting for the server to properly disconnect ...");
        self.wait_for_disconnect().await?;

        self.host.set_status("Reconnecting ...");

        if request.has_changes {
            self.fit_to_window = request.fit_to_window;
            reapply_credentials(&mut self.engine, self.snapshot.current());
        }

        let geometry = request.target_geometry(
            self.snapshot.current(),
            self.engine.viewport().size(),
            self.host.primary_display(),
        );
        if let Some(geometry) = geometry {
            debug!(size = %geometry.size, fullscreen = geometry.fullscreen, "Applying desktop geometry");
            self.engine.set_desktop_size(geometry.size);
            self.engine.set_fullscreen(geometry.fullscreen);
        }

        self.issue_connect()
    }

    /// Reconnect from the toolbar, keeping the last fit-to-window choice
    pub async fn reconnect_current(&mut self) -> Result<(), SessionError> {
        let request = ReconnectRequest::new(false, self.fit_to_window, false);
        self.reconnect(request).await
    }

    async fn wait_for_disconnect(&mut self) -> Result<(), SessionError> {
        let poll_interval = self.settings.reconnect.poll_interval();
        let budget = self.settings.reconnect.max_wait();
        let started = Instant::now();

        while self.engine.is_connected() {
            if let Some(budget) = budget {
                if started.elapsed() >= budget {
                    error!(
                        waited_secs = budget.as_secs(),
                        "Engine never confirmed disconnection, giving up reconnect"
                    );
                    return Err(SessionError::DisconnectTimeout {
                        seconds: budget.as_secs(),
                    });
                }
            }

            debug!("Engine still connected, waiting {:?}", poll_interval);
            tokio::time::sleep(poll_interval).await;
            self.process_pending();
        }

        // The confirmation may still be queued when the engine flips its
        // state before delivering the callback.
        self.process_pending();
        Ok(())
    }

    /// Replace the snapshot and restart the session with it
    ///
    /// Settings cannot be applied to a live session, so the user is told the
    /// connection will restart and a full reconnect follows.
    pub async fn apply_settings(&mut self, config: SessionConfig) -> Result<(), SessionError> {
        info!(server = %config.server, "Applying new session settings");
        self.replace_snapshot(config);

        let notice = Alert::restart_notice(self.config().title());
        self.host.alert(&notice);

        let result = self.reconnect(ReconnectRequest::with_changes()).await;
        self.emit_settings_changed();
        result
    }

    /// Record settings edited without applying them to the live session
    pub fn settings_closed(&mut self, config: SessionConfig) {
        self.replace_snapshot(config);
        self.emit_settings_changed();
    }

    fn replace_snapshot(&mut self, config: SessionConfig) {
        let previous = self.snapshot.replace(config);
        if previous.server != self.config().server {
            debug!(from = %previous.server, to = %self.config().server, "Session target changed");
        }
    }

    fn emit_settings_changed(&mut self) {
        let config = self.config().clone();
        self.emit(SessionEventKind::SettingsChanged { config });
    }

    /// Ask to close the session window
    ///
    /// Returns `true` when the user confirmed; the session is disconnected
    /// and `ClosingRequested` emitted. `false` means the close was cancelled.
    pub fn request_close(&mut self) -> Result<bool, SessionError> {
        let prompt = Prompt::close_window(self.config().title());
        if !self.host.confirm(&prompt) {
            debug!("Close cancelled by user");
            return Ok(false);
        }

        self.disconnect()?;
        self.emit(SessionEventKind::ClosingRequested);
        Ok(true)
    }

    /// The session window became visible; stretch the desktop to fit
    pub fn on_shown(&mut self) {
        self.emit(SessionEventKind::Shown);
        if !self.smart_sizing {
            self.toggle_stretch();
        }
    }

    /// The session window gained focus
    pub fn on_activated(&mut self) {
        self.engine.focus();
        self.emit(SessionEventKind::Activated);
    }

    /// Open the task manager of the remote session
    pub fn send_task_manager_keys(&mut self) {
        debug!("Sending Ctrl+Alt+End to the session");
        self.engine.focus();
        self.engine.send_task_manager_keys();
    }

    /// Flip scaling of the remote desktop to the viewport
    pub fn toggle_stretch(&mut self) -> bool {
        self.smart_sizing = !self.smart_sizing;
        self.engine.set_smart_sizing(self.smart_sizing);
        self.smart_sizing
    }

    /// Switch to fullscreen
    ///
    /// If the user agrees the desktop is resized to the primary display,
    /// which needs a reconnect; otherwise the engine just goes fullscreen.
    pub async fn enter_fullscreen(&mut self) -> Result<(), SessionError> {
        let prompt = Prompt::enter_fullscreen(self.config().title());
        if self.host.confirm(&prompt) {
            self.reconnect(ReconnectRequest::new(false, false, true)).await
        } else {
            self.engine.set_fullscreen(true);
            Ok(())
        }
    }

    /// Resize the remote desktop to the current viewport, after confirmation
    pub async fn fit_to_window(&mut self) -> Result<(), SessionError> {
        let prompt = Prompt::fit_to_window(self.config().title());
        if self.host.confirm(&prompt) {
            self.reconnect(ReconnectRequest::new(true, true, false)).await
        } else {
            Ok(())
        }
    }

    /// Handle every engine callback already queued, returning how many
    pub fn process_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.engine_events.try_recv() {
            self.handle_engine_event(event);
            handled += 1;
        }
        handled
    }

    /// Wait for the next engine callback and handle it
    ///
    /// Returns `None` once the engine dropped its sink.
    pub async fn next_engine_event(&mut self) -> Option<EngineEvent> {
        let event = self.engine_events.recv().await?;
        self.handle_engine_event(event);
        Some(event)
    }

    /// Apply one engine callback to the state machine
    pub fn handle_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Connecting => {
                let status = format!("Connecting to {}", self.config().server);
                self.host.set_status(&status);
                self.transition(SessionState::Connecting);
                self.emit(SessionEventKind::Connecting);
            }
            EngineEvent::Connected => {
                let status = format!("Connected to {}", self.config().server);
                self.host.set_status(&status);
                if self.state != SessionState::Connecting {
                    debug!(state = %self.state, "Connected callback outside of a connect attempt");
                }
                self.transition(SessionState::Connected);
                self.emit(SessionEventKind::Connected);
            }
            EngineEvent::LoginComplete => {
                let status = format!("Logged in using {} user account", self.config().username);
                self.host.set_status(&status);
                self.transition(SessionState::LoggedIn);
                self.emit(SessionEventKind::LoginComplete);
            }
            EngineEvent::Disconnected { reason } => self.on_disconnected(reason),
            EngineEvent::Warning { code } => {
                warn!(code, "Session warning: {}", describe_warning(code));
            }
            EngineEvent::FatalError { code } => {
                let description = describe_fatal_error(code);
                error!(code, "Fatal session error: {}", description);
                let alert = Alert::fatal_error(code, &description, self.config());
                self.host.alert(&alert);
            }
        }
    }

    fn on_disconnected(&mut self, reason: i32) {
        let status = format!("Disconnected from {}", self.config().server);
        self.host.set_status(&status);
        self.transition(SessionState::Disconnected);

        let description = describe_disconnect(reason);
        let category = disconnect_category(reason);

        let alert = self
            .settings
            .alerts
            .disconnect_alert(reason, &description, self.config());
        match alert {
            Some(alert) => {
                error!(reason, %category, "Session disconnected: {}", description);
                self.host.alert(&alert);
            }
            None => info!(reason, %category, "Session disconnected: {}", description),
        }

        self.emit(SessionEventKind::Disconnected { reason, category });
    }

    fn transition(&mut self, next: SessionState) {
        if self.state != next {
            debug!(from = %self.state, to = %next, list_index = %self.list_index, "Session state change");
            self.state = next;
        }
    }

    fn emit(&mut self, kind: SessionEventKind) {
        let event = SessionEvent::new(self.list_index, kind);
        debug!(event = event.name(), list_index = %self.list_index, "Emitting session event");
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }
}

/// Push every snapshot field to the engine
fn configure_engine<E: SessionEngine>(engine: &mut E, config: &SessionConfig) {
    engine.set_server(&config.server);
    if let Some(domain) = config.domain() {
        engine.set_domain(domain);
    }
    engine.set_username(&config.username);
    engine.set_password(&config.password);
    engine.set_color_depth(config.color_depth);
    engine.set_desktop_size(config.desktop_size());
    engine.set_fullscreen(config.fullscreen);
    if config.port != 0 {
        engine.set_port(config.port);
    }
}

/// Push the connection target and credentials before a reconnect
///
/// Domain and port are always written so values removed from the snapshot
/// are cleared on the engine.
fn reapply_credentials<E: SessionEngine>(engine: &mut E, config: &SessionConfig) {
    engine.set_server(&config.server);
    engine.set_domain(config.domain().unwrap_or(""));
    engine.set_username(&config.username);
    engine.set_password(&config.password);
    engine.set_color_depth(config.color_depth);
    engine.set_port(config.port);
}
