//! Prompt line reader for the chat loop.

use rustyline_async::{Readline, ReadlineError, ReadlineEvent, SharedWriter};

/// What the user did at the prompt.
#[derive(Debug, PartialEq)]
pub enum InputEvent {
    /// A submitted line, untrimmed. Empty lines are still reported so the
    /// controller can show its notice.
    Line(String),
    /// Ctrl+D, or the terminal went away.
    Eof,
    /// Ctrl+C.
    Interrupted,
}

pub struct ChatInput {
    rl: Readline,
    // Dropping the writer closes the readline output channel.
    _writer: SharedWriter,
}

impl ChatInput {
    pub fn open(prompt: String) -> Result<Self, ReadlineError> {
        let (rl, writer) = Readline::new(prompt)?;
        Ok(Self { rl, _writer: writer })
    }

    /// Wait for the next line. Non-blank lines are added to the recall
    /// history (arrow up).
    pub async fn next_event(&mut self) -> InputEvent {
        let event = match self.rl.readline().await {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!(error = %e, "Prompt read failed, ending session");
                return InputEvent::Eof;
            }
        };

        match event {
            ReadlineEvent::Line(line) => {
                if !line.trim().is_empty() {
                    self.rl.add_history_entry(line.clone());
                }
                InputEvent::Line(line)
            }
            ReadlineEvent::Eof => InputEvent::Eof,
            ReadlineEvent::Interrupted => InputEvent::Interrupted,
        }
    }

    pub fn clear_screen(&mut self) {
        if let Err(e) = self.rl.clear() {
            tracing::debug!(error = %e, "Failed to clear the screen");
        }
    }

    /// Restore the terminal, flushing anything still buffered.
    pub fn close(mut self) {
        if let Err(e) = self.rl.flush() {
            tracing::debug!(error = %e, "Failed to flush prompt output");
        }
    }
}
