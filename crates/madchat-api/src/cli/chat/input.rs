//! Line input for the chat loop.
//!
//! `rustyline_async` keeps the terminal in raw mode while a read is pending,
//! so Ctrl+C arrives here as [`InputEvent::Interrupted`] rather than as a
//! process signal. The loop relies on that to cancel an in-flight reply.

use rustyline_async::{Readline, ReadlineError, ReadlineEvent, SharedWriter};
use tracing::warn;

/// Lines remembered for up-arrow recall.
const HISTORY_LIMIT: usize = 200;

/// What the user did at the prompt.
#[derive(Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// A non-blank line, trimmed.
    Message(String),
    /// Enter on an empty or whitespace-only line.
    Blank,
    /// Ctrl+D, or the terminal went away.
    Eof,
    /// Ctrl+C.
    Interrupted,
}

impl InputEvent {
    fn from_line(line: &str) -> Self {
        match line.trim() {
            "" => InputEvent::Blank,
            text => InputEvent::Message(text.to_string()),
        }
    }
}

pub struct ChatInput {
    rl: Readline,
    _writer: SharedWriter,
}

impl ChatInput {
    pub fn new(prompt: String) -> Result<Self, ReadlineError> {
        let (mut rl, writer) = Readline::new(prompt)?;
        rl.set_max_history(HISTORY_LIMIT);
        Ok(Self {
            rl,
            _writer: writer,
        })
    }

    /// Show the active conversation in the prompt.
    pub fn update_prompt(&mut self, prompt: &str) {
        let _ = self.rl.update_prompt(prompt);
    }

    pub async fn read_line(&mut self) -> InputEvent {
        match self.rl.readline().await {
            Ok(ReadlineEvent::Line(line)) => {
                let event = InputEvent::from_line(&line);
                if let InputEvent::Message(text) = &event {
                    let _ = self.rl.add_history_entry(text.clone());
                }
                event
            }
            Ok(ReadlineEvent::Eof) => InputEvent::Eof,
            Ok(ReadlineEvent::Interrupted) => InputEvent::Interrupted,
            Err(e) => {
                warn!(error = %e, "Terminal input failed, ending chat");
                InputEvent::Eof
            }
        }
    }

    /// Wipe the screen; the conversation itself is untouched.
    pub fn clear(&mut self) {
        let _ = self.rl.clear();
    }
}
