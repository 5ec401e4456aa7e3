//! Inline renderer for the shell view.
//!
//! Writes to the normal terminal buffer (no alternate screen). Each draw:
//!
//! 1. Begins a synchronized update
//! 2. Moves back to the first row drawn last time and erases downwards
//! 3. Writes every line of the new view
//! 4. Ends the synchronized update and flushes once
//!
//! Rows are counted with display widths so lines that wrap at the terminal
//! edge are erased correctly on the next draw.

use std::io::{self, Write};

use crossterm::cursor::{MoveToColumn, MoveUp};
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{self, BeginSynchronizedUpdate, Clear, ClearType, EndSynchronizedUpdate};
use unicode_width::UnicodeWidthStr;

use super::output::OutputBuffer;
use super::theme::Theme;
use crate::config::DisplayConfig;
use crate::shell::RenderState;

/// Width assumed when the terminal cannot report one.
const FALLBACK_WIDTH: u16 = 80;

// =============================================================================
// Lines and spans
// =============================================================================

/// A run of text with one style.
#[derive(Debug, Clone, PartialEq)]
struct Span {
    text: String,
    fg: Option<Color>,
    attr: Option<Attribute>,
}

impl Span {
    fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), fg: None, attr: None }
    }

    fn colored(text: impl Into<String>, fg: Color) -> Self {
        Self { text: text.into(), fg: Some(fg), attr: None }
    }

    fn with_attr(mut self, attr: Attribute) -> Self {
        self.attr = Some(attr);
        self
    }
}

type Line = Vec<Span>;

// =============================================================================
// InlineRenderer
// =============================================================================

/// Draws [`RenderState`] snapshots inline, replacing the previous frame.
pub struct InlineRenderer {
    display: DisplayConfig,
    theme: Theme,
    output: OutputBuffer,
    /// Fixed width instead of querying the terminal.
    width: Option<u16>,
    previous_rows: u16,
}

impl InlineRenderer {
    pub fn new(display: DisplayConfig, theme: Theme) -> Self {
        Self {
            display,
            theme,
            output: OutputBuffer::new(),
            width: None,
            previous_rows: 0,
        }
    }

    /// Use a fixed terminal width.
    pub fn with_width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    /// Rows occupied by the last frame.
    pub fn previous_rows(&self) -> u16 {
        self.previous_rows
    }

    /// Draw the shell view for `state`.
    pub fn draw<W: Write>(&mut self, out: &mut W, state: &RenderState) -> io::Result<()> {
        let lines = self.view_lines(state);
        self.draw_lines(out, &lines)
    }

    /// Draw the fallback shown after a render failure.
    pub fn draw_fatal<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let lines = vec![
            vec![],
            vec![Span::colored("Application error!", Color::Red).with_attr(Attribute::Bold)],
            vec![Span::colored("Please restart the application", Color::Yellow)],
            vec![Span::colored("Press Ctrl+C to exit", self.theme.hint.resolve())],
        ];
        self.draw_lines(out, &lines)
    }

    /// Leave the cursor on a fresh line below the view.
    pub fn finish<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        self.output.clear();
        queue!(self.output, ResetColor, SetAttribute(Attribute::Reset), Print("\r\n"))?;
        self.previous_rows = 0;
        self.output.flush_to(out)
    }

    fn view_lines(&self, state: &RenderState) -> Vec<Line> {
        let d = &self.display;
        let t = &self.theme;
        let hint = t.hint.resolve();

        let mut lines: Vec<Line> = vec![
            vec![],
            vec![Span::colored(&d.title, t.title.resolve()).with_attr(Attribute::Bold)],
            vec![Span::colored(&d.hint, hint).with_attr(Attribute::Italic)],
            vec![],
        ];

        let mut input = vec![
            Span::colored(format!("{} ", d.prompt), hint),
            Span::plain(&state.buffer),
            Span::plain(" ").with_attr(Attribute::Reverse),
        ];
        if state.buffer.is_empty() {
            input.push(Span::colored(&d.placeholder, hint).with_attr(Attribute::Dim));
        }
        lines.push(input);
        lines.push(vec![]);

        if let Some(outcome) = &state.outcome {
            if let (Some(message), Some(category)) = (outcome.message(), outcome.category()) {
                lines.push(vec![Span::colored(message, t.category(category))]);
                lines.push(vec![]);
            }
        }

        lines.push(vec![Span::colored(&d.footer, hint)]);
        lines
    }

    fn draw_lines<W: Write>(&mut self, out: &mut W, lines: &[Line]) -> io::Result<()> {
        let width = self.terminal_width();
        let pad = " ".repeat(usize::from(self.display.padding));

        self.output.clear();
        queue!(self.output, BeginSynchronizedUpdate)?;
        self.erase_previous()?;

        let mut rows: u16 = 0;
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                queue!(self.output, Print("\r\n"))?;
            }
            let mut line_width = 0;
            if !line.is_empty() {
                queue!(self.output, Print(&pad))?;
                line_width += pad.len();
            }
            for span in line {
                if let Some(fg) = span.fg {
                    queue!(self.output, SetForegroundColor(fg))?;
                }
                if let Some(attr) = span.attr {
                    queue!(self.output, SetAttribute(attr))?;
                }
                queue!(self.output, Print(&span.text))?;
                if span.fg.is_some() || span.attr.is_some() {
                    queue!(self.output, ResetColor, SetAttribute(Attribute::Reset))?;
                }
                line_width += span.text.width();
            }
            rows = rows.saturating_add(rows_for(line_width, width));
        }

        queue!(self.output, EndSynchronizedUpdate)?;
        // A frame that never reached the terminal leaves the old rows in place
        self.output.flush_to(out)?;
        self.previous_rows = rows;
        Ok(())
    }

    fn erase_previous(&mut self) -> io::Result<()> {
        if self.previous_rows == 0 {
            return Ok(());
        }
        queue!(self.output, MoveToColumn(0))?;
        if self.previous_rows > 1 {
            queue!(self.output, MoveUp(self.previous_rows - 1))?;
        }
        queue!(self.output, Clear(ClearType::FromCursorDown))
    }

    fn terminal_width(&self) -> u16 {
        self.width
            .or_else(|| terminal::size().ok().map(|(w, _)| w))
            .filter(|w| *w > 0)
            .unwrap_or(FALLBACK_WIDTH)
    }
}

/// Terminal rows a line of `line_width` columns occupies.
fn rows_for(line_width: usize, width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows = line_width.div_ceil(width).max(1);
    u16::try_from(rows).unwrap_or(u16::MAX)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::CommandOutcome;

    fn renderer() -> InlineRenderer {
        InlineRenderer::new(DisplayConfig::default(), Theme::default()).with_width(80)
    }

    fn state(buffer: &str, outcome: Option<CommandOutcome>) -> RenderState {
        RenderState { buffer: buffer.to_string(), outcome }
    }

    fn draw_to_string(r: &mut InlineRenderer, s: &RenderState) -> String {
        let mut out = Vec::new();
        r.draw(&mut out, s).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_initial_view_shows_title_hint_placeholder() {
        let mut r = renderer();
        let text = draw_to_string(&mut r, &state("", None));
        let d = DisplayConfig::default();
        assert!(text.contains(&d.title));
        assert!(text.contains(&d.hint));
        assert!(text.contains(&d.placeholder));
        assert!(text.contains(&d.footer));
    }

    #[test]
    fn test_buffer_replaces_placeholder() {
        let mut r = renderer();
        let text = draw_to_string(&mut r, &state("cf li", None));
        assert!(text.contains("cf li"));
        assert!(!text.contains(&DisplayConfig::default().placeholder));
    }

    #[test]
    fn test_outcome_message_is_colored_by_category() {
        let mut r = renderer();
        let text = draw_to_string(&mut r, &state("", Some(CommandOutcome::ListResult)));
        let mut yellow = Vec::new();
        queue!(yellow, SetForegroundColor(Color::Yellow)).unwrap();
        let yellow = String::from_utf8(yellow).unwrap();
        let at = text.find("example.com").unwrap();
        assert!(text[..at].ends_with(&format!("{yellow}📋 Deployed sites: 1. ")));
    }

    #[test]
    fn test_cleared_outcome_shows_no_message_rows() {
        let mut r = renderer();
        draw_to_string(&mut r, &state("", None));
        let empty_rows = r.previous_rows();
        draw_to_string(&mut r, &state("", Some(CommandOutcome::Cleared)));
        assert_eq!(r.previous_rows(), empty_rows);
        draw_to_string(&mut r, &state("", Some(CommandOutcome::HelpText)));
        assert_eq!(r.previous_rows(), empty_rows + 2);
    }

    #[test]
    fn test_first_draw_does_not_erase() {
        let mut r = renderer();
        let text = draw_to_string(&mut r, &state("", None));
        assert!(!text.contains("\x1b[J"));
    }

    #[test]
    fn test_redraw_erases_previous_rows() {
        let mut r = renderer();
        draw_to_string(&mut r, &state("", None));
        let rows = r.previous_rows();
        let text = draw_to_string(&mut r, &state("h", None));
        assert!(text.contains(&format!("\x1b[{}A", rows - 1)));
        assert!(text.contains("\x1b[J"));
    }

    #[test]
    fn test_wrapped_lines_count_extra_rows() {
        let mut narrow = InlineRenderer::new(DisplayConfig::default(), Theme::default()).with_width(10);
        let mut wide = renderer();
        let s = state("a long command line", None);
        draw_to_string(&mut narrow, &s);
        draw_to_string(&mut wide, &s);
        assert!(narrow.previous_rows() > wide.previous_rows());
    }

    #[test]
    fn test_fatal_view() {
        let mut r = renderer();
        let mut out = Vec::new();
        r.draw_fatal(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Application error!"));
        assert!(text.contains("Please restart the application"));
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_draw_keeps_previous_rows() {
        let mut r = renderer();
        draw_to_string(&mut r, &state("", None));
        let rows = r.previous_rows();

        assert!(r.draw(&mut Broken, &state("", Some(CommandOutcome::HelpText))).is_err());
        assert_eq!(r.previous_rows(), rows);

        // The fallback erases exactly what is on screen
        let mut out = Vec::new();
        r.draw_fatal(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(&format!("\x1b[{}A", rows - 1)));
    }

    #[test]
    fn test_rows_for() {
        assert_eq!(rows_for(0, 80), 1);
        assert_eq!(rows_for(80, 80), 1);
        assert_eq!(rows_for(81, 80), 2);
        assert_eq!(rows_for(5, 0), 5);
    }
}
