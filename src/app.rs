//! Application loop.
//!
//! ```text
//! draw initial view (failure is fatal)
//! loop:
//!     chunk = source.next_chunk()      // the only suspension point
//!     flow  = session.feed(chunk)      // mutate
//!     draw(session.render_state())     // then render, inside the boundary
//! ```
//!
//! While the parser waits for the rest of an escape sequence the read uses
//! [`ESCAPE_TIMEOUT`]; if nothing comes, the pending bytes are flushed as keys.
//!
//! The render step is guarded: an I/O error or a panic while drawing shows
//! the fallback view, blurs the session and leaves only the quit chords
//! working. There is no recovery from that state.

use std::io::Write;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use tracing::{error, info};

use crate::error::{Result, ShellError};
use crate::input::{InputSource, Received};
use crate::logging::panic_message;
use crate::render::InlineRenderer;
use crate::shell::{Flow, Session};

/// How long an unfinished escape sequence waits for its remaining bytes.
pub const ESCAPE_TIMEOUT: Duration = Duration::from_millis(10);

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// Ctrl+C or Ctrl+D.
    Quit,
    /// Input stream closed.
    EndOfInput,
}

/// The shell: session, renderer, input and output bound together.
pub struct App<S, W> {
    session: Session,
    renderer: InlineRenderer,
    source: S,
    out: W,
}

impl<S: InputSource, W: Write> App<S, W> {
    pub fn new(renderer: InlineRenderer, source: S, out: W) -> Self {
        Self {
            session: Session::new(),
            renderer,
            source,
            out,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Run until quit or end of input.
    pub fn run(&mut self) -> Result<ExitReason> {
        let initial = self.session.render_state();
        self.renderer
            .draw(&mut self.out, &initial)
            .map_err(ShellError::Render)?;
        info!("session started");

        let reason = loop {
            let timeout = self.session.has_pending_input().then_some(ESCAPE_TIMEOUT);
            let flow = match self.source.next_chunk(timeout).map_err(ShellError::Terminal)? {
                Received::Chunk(chunk) => self.session.feed(&chunk),
                Received::Idle => self.session.flush_pending(),
                Received::Closed => break ExitReason::EndOfInput,
            };

            if flow == Flow::Quit {
                break ExitReason::Quit;
            }

            // After a failure the fallback view stays up untouched
            if self.session.is_halted() {
                continue;
            }

            self.render_guarded()?;
        };

        self.renderer.finish(&mut self.out).map_err(ShellError::Render)?;
        info!(?reason, "session ended");
        Ok(reason)
    }

    /// Draw the current state; on any failure fall back to the error view.
    fn render_guarded(&mut self) -> Result<()> {
        let state = self.session.render_state();
        let renderer = &mut self.renderer;
        let out = &mut self.out;

        let failure = match panic::catch_unwind(AssertUnwindSafe(|| renderer.draw(out, &state))) {
            Ok(Ok(())) => return Ok(()),
            Ok(Err(err)) => err.to_string(),
            Err(payload) => panic_message(payload.as_ref()),
        };

        error!(%failure, "render failed, showing error view");
        self.session.halt();
        self.renderer
            .draw_fatal(&mut self.out)
            .map_err(ShellError::Render)
    }
}
