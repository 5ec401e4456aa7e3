//! Shell core - command classification and the session state machine.
//!
//! - **Command** - closed vocabulary, outcome messages and categories
//! - **Session** - buffer, focus, last outcome, dispatch phases

mod command;
mod session;

pub use command::*;
pub use session::*;
