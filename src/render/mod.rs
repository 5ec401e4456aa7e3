//! Renderer - draws the shell view to the terminal.
//!
//! - [`view`] - inline view renderer and fallback error view
//! - [`theme`] - configurable colors per outcome category
//! - [`output`] - batched output buffer

pub mod output;
pub mod theme;
pub mod view;

pub use output::OutputBuffer;
pub use theme::{Theme, ThemeColor};
pub use view::InlineRenderer;
