//! Input system - raw bytes → key events → line buffer.
//!
//! ```text
//! InputSource chunk → InputParser → KeyEvent → Accumulator → InputAction
//! ```

pub mod accumulator;
pub mod parser;
pub mod source;

pub use accumulator::{Accumulator, FocusState, InputAction, InputBuffer};
pub use parser::{DecodeError, InputParser, KeyCode, KeyEvent, Modifier};
pub use source::{InputSource, Received, ScriptedSource, StdinSource};
