//! Terminal setup and teardown.
//!
//! Verifies the shell is attached to a terminal, enables raw mode so single
//! keystrokes are readable, and hides the hardware cursor (the view draws
//! its own). Everything is restored on [`TerminalSetup::restore`] or drop.

use std::io::{self, Write};

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::style::{Attribute, ResetColor, SetAttribute};
use crossterm::terminal;
use crossterm::tty::IsTty;
use tracing::{debug, warn};

use crate::error::{Result, ShellError};

/// Terminal setup/teardown handle.
pub struct TerminalSetup {
    is_raw: bool,
    cursor_hidden: bool,
}

impl TerminalSetup {
    /// Fail fast unless both stdin and stdout are terminals.
    pub fn require_tty() -> Result<()> {
        if io::stdin().is_tty() && io::stdout().is_tty() {
            Ok(())
        } else {
            Err(ShellError::NotATty)
        }
    }

    /// Enter raw mode and hide the cursor.
    pub fn enter() -> Result<Self> {
        Self::require_tty()?;

        let mut setup = Self {
            is_raw: false,
            cursor_hidden: false,
        };

        terminal::enable_raw_mode().map_err(ShellError::Terminal)?;
        setup.is_raw = true;

        execute!(io::stdout(), Hide).map_err(ShellError::Terminal)?;
        setup.cursor_hidden = true;

        debug!("terminal in raw mode");
        Ok(setup)
    }

    /// Show the cursor, reset colors and leave raw mode.
    pub fn restore(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout();
        if self.cursor_hidden {
            execute!(stdout, ResetColor, SetAttribute(Attribute::Reset), Show)?;
            self.cursor_hidden = false;
        }
        if self.is_raw {
            terminal::disable_raw_mode()?;
            self.is_raw = false;
        }
        stdout.flush()
    }

    pub fn is_raw(&self) -> bool {
        self.is_raw
    }
}

impl Drop for TerminalSetup {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            warn!(%err, "failed to restore terminal");
        }
    }
}
