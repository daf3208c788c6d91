//! Hosting window collaborator
//!
//! The window that embeds a session owns the status line, modal dialogs and
//! knowledge of the physical display. The controller reaches them only
//! through this trait, injected at construction.

use crate::session::alert::{Alert, Prompt};
use crate::types::DesktopSize;

/// Services the hosting window provides to the controller
pub trait HostWindow {
    /// Replace the status line text
    fn set_status(&mut self, text: &str);

    /// Show a blocking alert; returns once the user dismissed it
    fn alert(&mut self, alert: &Alert);

    /// Ask the user a question; `true` for Yes/OK
    fn confirm(&mut self, prompt: &Prompt) -> bool;

    /// Resolution of the primary display
    fn primary_display(&self) -> DesktopSize;
}
