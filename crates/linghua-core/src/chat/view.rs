//! Presentation port for the chat panel.
//!
//! The controller drives the panel exclusively through this trait. Content
//! handed to [`ChatView::render`] is already sanitized; implementations must
//! not escape it again.

use linghua_types::chat::ChatRole;

/// The chat panel as seen by the controller.
///
/// Methods take `&self` so a view can be shared with the pending reply task;
/// implementations use interior mutability where they keep state.
pub trait ChatView: Send + Sync {
    /// Remove every bubble from the message list.
    fn reset(&self);

    /// Append a bubble for `role` and scroll it into view.
    fn render(&self, role: ChatRole, content: &str);

    /// Show a blocking notice (validation failures).
    fn notify(&self, message: &str);

    /// Ask the user a yes/no question.
    fn confirm(&self, prompt: &str) -> bool;

    /// Enable or disable the send control.
    fn set_busy(&self, busy: bool);

    /// Empty the input field after a successful send.
    fn clear_input(&self) {}
}
