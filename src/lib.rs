//! # cf-shell
//!
//! A small interactive terminal shell for a closed set of Cloudflare-style
//! commands (`cf status`, `cf list`, `help`, `clear`).
//!
//! ## Architecture
//!
//! One session, one thread, events processed strictly in arrival order:
//!
//! ```text
//! stdin chunk → InputParser → KeyEvent → Accumulator ─Enter─▶ CommandOutcome::classify
//!                                             │                        │
//!                                             └──────── Session ◀──────┘
//!                                                          │
//!                                                  RenderState → InlineRenderer
//! ```
//!
//! ## Modules
//!
//! - [`input`] - raw byte parsing, line accumulation, input sources
//! - [`shell`] - command classification and the session state machine
//! - [`render`] - inline view renderer and theme
//! - [`app`] - event loop and render error boundary
//! - [`terminal`] - raw mode setup and restore
//! - [`config`] - TOML configuration
//! - [`logging`] - tracing subscriber setup
//! - [`error`] - error types

pub mod app;
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod render;
pub mod shell;
pub mod terminal;

// Re-export commonly used items
pub use app::{App, ExitReason};
pub use config::{ConfigSource, DisplayConfig, LoggingConfig, ShellConfig};
pub use error::{Result, ShellError};
pub use input::{
    Accumulator, DecodeError, FocusState, InputAction, InputBuffer, InputParser, InputSource,
    KeyCode, KeyEvent, Modifier, Received, ScriptedSource, StdinSource,
};
pub use render::{InlineRenderer, Theme, ThemeColor};
pub use shell::{Category, CommandOutcome, Flow, RenderState, Session, SessionPhase, KNOWN_COMMANDS};
pub use terminal::TerminalSetup;
