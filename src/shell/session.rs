//! Session - the explicit context the event loop owns.
//!
//! Holds the parser, the accumulator (buffer + focus) and the last outcome,
//! and runs the two-phase state machine:
//!
//! ```text
//! AwaitingInput ──Enter──▶ Dispatching ──classified, buffer reset──▶ AwaitingInput
//! ```
//!
//! Callers feed raw chunks with [`Session::feed`] and then draw
//! [`Session::render_state`]. Nothing here touches the terminal.

use tracing::debug;

use super::command::CommandOutcome;
use crate::input::{Accumulator, FocusState, InputAction, InputParser, KeyEvent};

/// Phase of the dispatch state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionPhase {
    #[default]
    AwaitingInput,
    Dispatching,
}

/// Whether the loop should keep going after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Snapshot needed to redraw the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderState {
    pub buffer: String,
    pub outcome: Option<CommandOutcome>,
}

impl RenderState {
    /// Outcome message to show, if any. `clear` leaves nothing to show.
    pub fn message(&self) -> Option<String> {
        self.outcome.as_ref().and_then(|o| o.message()).map(|m| m.into_owned())
    }
}

/// One interactive session.
#[derive(Default)]
pub struct Session {
    parser: InputParser,
    input: Accumulator,
    outcome: Option<CommandOutcome>,
    phase: SessionPhase,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one raw chunk.
    ///
    /// Key events are handled strictly in order; a submit in the middle of
    /// the chunk is dispatched before the characters after it are appended.
    /// A chunk with malformed UTF-8 is dropped whole.
    pub fn feed(&mut self, raw: &[u8]) -> Flow {
        let keys = match self.parser.parse(raw) {
            Ok(keys) => keys,
            Err(err) => {
                debug!(%err, len = raw.len(), "dropping undecodable input chunk");
                return Flow::Continue;
            }
        };

        self.handle_keys(&keys)
    }

    /// Whether the parser holds the start of an unfinished sequence.
    pub fn has_pending_input(&self) -> bool {
        self.parser.has_pending()
    }

    /// Give up on an unfinished sequence and handle its bytes as keys.
    pub fn flush_pending(&mut self) -> Flow {
        let keys = self.parser.flush_pending();
        debug!(count = keys.len(), "flushed unfinished input sequence");
        self.handle_keys(&keys)
    }

    fn handle_keys(&mut self, keys: &[KeyEvent]) -> Flow {
        for key in keys {
            if self.handle_key(key) == Flow::Quit {
                return Flow::Quit;
            }
        }
        Flow::Continue
    }

    /// Process one key event.
    pub fn handle_key(&mut self, key: &KeyEvent) -> Flow {
        match self.input.handle_key(key) {
            InputAction::Submit(line) => {
                self.submit(&line);
                Flow::Continue
            }
            InputAction::Quit => Flow::Quit,
            InputAction::Edited | InputAction::Ignored => Flow::Continue,
        }
    }

    /// Classify a submitted line, replace the outcome and reset the buffer.
    pub fn submit(&mut self, line: &str) -> &CommandOutcome {
        self.phase = SessionPhase::Dispatching;
        let outcome = CommandOutcome::classify(line);
        debug!(line, ?outcome, "dispatched command");

        self.input.reset();
        self.phase = SessionPhase::AwaitingInput;
        self.outcome.insert(outcome)
    }

    /// Stop accepting input. Quit chords keep working.
    pub fn halt(&mut self) {
        self.input.focus_mut().blur();
        self.parser.reset();
    }

    pub fn is_halted(&self) -> bool {
        !self.input.focus_state().is_focused()
    }

    pub fn focus_state(&self) -> FocusState {
        self.input.focus_state()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn buffer(&self) -> &str {
        self.input.buffer().as_str()
    }

    pub fn outcome(&self) -> Option<&CommandOutcome> {
        self.outcome.as_ref()
    }

    pub fn render_state(&self) -> RenderState {
        RenderState {
            buffer: self.buffer().to_string(),
            outcome: self.outcome.clone(),
        }
    }
}
