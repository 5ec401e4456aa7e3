//! Raw terminal byte parser.
//!
//! Turns the bytes read from a raw-mode terminal into key events:
//! - Printable ASCII and multi-byte UTF-8 characters
//! - Control keys (bytes 0-31, DEL)
//! - CSI sequences (arrows, Home, End, Insert, Delete, PageUp/Down, F5-F12)
//! - SS3 sequences (F1-F4, application-mode arrows)
//! - Alt+key (ESC + char)
//!
//! A chunk containing malformed UTF-8 is rejected as a whole with a
//! [`DecodeError`]; none of its events are delivered.

use std::fmt;

// =============================================================================
// Types
// =============================================================================

/// A key event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifier,
}

impl KeyEvent {
    pub fn new(code: KeyCode, modifiers: Modifier) -> Self {
        Self { code, modifiers }
    }

    /// Plain key with no modifiers.
    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, Modifier::NONE)
    }

    /// Ctrl + character chord.
    pub fn ctrl(ch: char) -> Self {
        Self::new(KeyCode::Char(ch), Modifier::CTRL)
    }

    pub fn is_ctrl(&self, ch: char) -> bool {
        self.code == KeyCode::Char(ch) && self.modifiers.contains(Modifier::CTRL)
    }
}

/// Key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    F(u8),
    Null,
}

bitflags::bitflags! {
    /// Keyboard modifiers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Modifier: u8 {
        const NONE  = 0;
        const SHIFT = 1 << 0;
        const ALT   = 1 << 1;
        const CTRL  = 1 << 2;
        const SUPER = 1 << 3;
    }
}

/// Malformed UTF-8 in a raw input chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    /// Offset of the offending byte within the bytes being parsed
    /// (pending bytes from the previous chunk come first).
    pub offset: usize,
    pub byte: u8,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid UTF-8 byte 0x{:02x} at offset {}", self.byte, self.offset)
    }
}

impl std::error::Error for DecodeError {}

// =============================================================================
// Parser
// =============================================================================

/// Input parser state machine.
///
/// Bytes that may be the start of a longer sequence (a split UTF-8 character
/// or an unterminated CSI sequence) stay pending until the next chunk, or
/// until the caller gives up waiting and calls [`InputParser::flush_pending`].
pub struct InputParser {
    buf: Vec<u8>,
    consumed: usize,
    /// The last byte handled was a CR; an LF right after it is swallowed
    /// even when it arrives in the next chunk.
    after_cr: bool,
}

impl InputParser {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(64),
            consumed: 0,
            after_cr: false,
        }
    }

    /// Parse a raw chunk into key events.
    ///
    /// On malformed UTF-8 every event of this chunk is discarded and the
    /// pending bytes are dropped, so the next chunk starts clean.
    pub fn parse(&mut self, data: &[u8]) -> Result<Vec<KeyEvent>, DecodeError> {
        self.buf.extend_from_slice(data);
        self.consumed = 0;
        let mut events = Vec::new();

        while !self.buf.is_empty() {
            match self.try_parse_one() {
                ParseResult::Event(ev) => events.push(ev),
                ParseResult::Skip => {}
                ParseResult::Incomplete => break,
                ParseResult::Invalid(byte) => {
                    let offset = self.consumed;
                    self.buf.clear();
                    return Err(DecodeError { offset, byte });
                }
            }
        }

        Ok(events)
    }

    /// Check if bytes are waiting for the rest of a sequence.
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Flush pending bytes as keys (the rest of the sequence never came).
    ///
    /// `ESC x ...` becomes Alt+x followed by the remaining printable bytes as
    /// plain characters; a dangling partial UTF-8 character is dropped.
    pub fn flush_pending(&mut self) -> Vec<KeyEvent> {
        let pending = std::mem::take(&mut self.buf);
        let mut events = Vec::new();

        let rest = match pending.as_slice() {
            [0x1B] => {
                events.push(KeyEvent::plain(KeyCode::Escape));
                &[][..]
            }
            [0x1B, second, rest @ ..] => {
                events.push(KeyEvent::new(KeyCode::Char(*second as char), Modifier::ALT));
                rest
            }
            rest => rest,
        };
        events.extend(
            rest.iter()
                .filter(|b| (0x20..=0x7E).contains(*b))
                .map(|&b| KeyEvent::plain(KeyCode::Char(b as char))),
        );
        events
    }

    /// Drop any bytes waiting for the rest of a sequence.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.after_cr = false;
    }

    fn try_parse_one(&mut self) -> ParseResult {
        let first = self.buf[0];
        let after_cr = std::mem::take(&mut self.after_cr);

        match first {
            0x1B => self.parse_escape(),
            0x00 => { self.consume(1); ParseResult::Event(KeyEvent::new(KeyCode::Null, Modifier::CTRL)) }
            0x08 | 0x7F => { self.consume(1); ParseResult::Event(KeyEvent::plain(KeyCode::Backspace)) }
            0x09 => { self.consume(1); ParseResult::Event(KeyEvent::plain(KeyCode::Tab)) }
            0x0D => {
                // CR LF is a single terminator
                match self.buf.get(1) {
                    Some(&0x0A) => self.consume(2),
                    Some(_) => self.consume(1),
                    None => {
                        self.consume(1);
                        self.after_cr = true;
                    }
                }
                ParseResult::Event(KeyEvent::plain(KeyCode::Enter))
            }
            0x0A if after_cr => { self.consume(1); ParseResult::Skip }
            0x0A => { self.consume(1); ParseResult::Event(KeyEvent::plain(KeyCode::Enter)) }
            0x01..=0x1A => {
                let ch = (first + b'a' - 1) as char;
                self.consume(1);
                ParseResult::Event(KeyEvent::ctrl(ch))
            }
            0x1C..=0x1F => {
                self.consume(1);
                ParseResult::Skip
            }
            0x20..=0x7E => {
                self.consume(1);
                ParseResult::Event(KeyEvent::plain(KeyCode::Char(first as char)))
            }
            0x80..=0xFF => self.parse_utf8(),
        }
    }

    fn parse_escape(&mut self) -> ParseResult {
        // A lone ESC at the end of a read is the Escape key; terminals send
        // whole sequences in one write.
        if self.buf.len() < 2 {
            self.consume(1);
            return ParseResult::Event(KeyEvent::plain(KeyCode::Escape));
        }

        match self.buf[1] {
            b'[' => self.parse_csi(),
            b'O' => self.parse_ss3(),
            0x20..=0x7E => {
                let ch = self.buf[1] as char;
                self.consume(2);
                ParseResult::Event(KeyEvent::new(KeyCode::Char(ch), Modifier::ALT))
            }
            0x1B => {
                self.consume(2);
                ParseResult::Event(KeyEvent::new(KeyCode::Escape, Modifier::ALT))
            }
            _ => {
                self.consume(1);
                ParseResult::Event(KeyEvent::plain(KeyCode::Escape))
            }
        }
    }

    fn parse_csi(&mut self) -> ParseResult {
        if self.buf.len() < 3 {
            return ParseResult::Incomplete;
        }

        // Find the final byte (0x40-0x7E)
        let Some(end) = self.buf[2..]
            .iter()
            .position(|b| (0x40..=0x7E).contains(b))
            .map(|pos| pos + 2)
        else {
            return ParseResult::Incomplete;
        };

        let final_byte = self.buf[end];
        let params: Vec<u32> = String::from_utf8_lossy(&self.buf[2..end])
            .split(';')
            .map(|s| s.parse::<u32>().unwrap_or(0))
            .collect();
        self.consume(end + 1);

        let modifiers = match params.get(1) {
            Some(&p) if p > 0 => decode_modifier(p),
            _ => Modifier::NONE,
        };

        let code = match final_byte {
            b'A' => KeyCode::Up,
            b'B' => KeyCode::Down,
            b'C' => KeyCode::Right,
            b'D' => KeyCode::Left,
            b'H' => KeyCode::Home,
            b'F' => KeyCode::End,
            b'Z' => return ParseResult::Event(KeyEvent::new(KeyCode::Tab, Modifier::SHIFT)),
            b'~' => match params.first().copied().unwrap_or(0) {
                1 | 7 => KeyCode::Home,
                2 => KeyCode::Insert,
                3 => KeyCode::Delete,
                4 | 8 => KeyCode::End,
                5 => KeyCode::PageUp,
                6 => KeyCode::PageDown,
                15 => KeyCode::F(5),
                17 => KeyCode::F(6),
                18 => KeyCode::F(7),
                19 => KeyCode::F(8),
                20 => KeyCode::F(9),
                21 => KeyCode::F(10),
                23 => KeyCode::F(11),
                24 => KeyCode::F(12),
                _ => return ParseResult::Skip,
            },
            // Focus reports, mouse reports, bracketed paste markers and
            // anything else we do not act on.
            _ => return ParseResult::Skip,
        };

        ParseResult::Event(KeyEvent::new(code, modifiers))
    }

    fn parse_ss3(&mut self) -> ParseResult {
        if self.buf.len() < 3 {
            return ParseResult::Incomplete;
        }

        let code = match self.buf[2] {
            b'A' => KeyCode::Up,
            b'B' => KeyCode::Down,
            b'C' => KeyCode::Right,
            b'D' => KeyCode::Left,
            b'H' => KeyCode::Home,
            b'F' => KeyCode::End,
            b'P' => KeyCode::F(1),
            b'Q' => KeyCode::F(2),
            b'R' => KeyCode::F(3),
            b'S' => KeyCode::F(4),
            _ => {
                self.consume(3);
                return ParseResult::Skip;
            }
        };

        self.consume(3);
        ParseResult::Event(KeyEvent::plain(code))
    }

    fn parse_utf8(&mut self) -> ParseResult {
        let first = self.buf[0];
        let expected_len = match first {
            0xC2..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF4 => 4,
            _ => return ParseResult::Invalid(first),
        };

        // Validate continuation bytes that have already arrived
        let available = self.buf.len().min(expected_len);
        if let Some(&bad) = self.buf[1..available].iter().find(|b| *b & 0xC0 != 0x80) {
            return ParseResult::Invalid(bad);
        }

        if self.buf.len() < expected_len {
            return ParseResult::Incomplete;
        }

        // Catches overlongs and surrogates the lead-byte table lets through
        match std::str::from_utf8(&self.buf[..expected_len]) {
            Ok(s) => {
                let ch = s.chars().next();
                self.consume(expected_len);
                match ch {
                    Some(ch) if !ch.is_control() => ParseResult::Event(KeyEvent::plain(KeyCode::Char(ch))),
                    _ => ParseResult::Skip,
                }
            }
            Err(_) => ParseResult::Invalid(first),
        }
    }

    fn consume(&mut self, n: usize) {
        self.buf.drain(..n);
        self.consumed += n;
    }
}

impl Default for InputParser {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Helpers
// =============================================================================

enum ParseResult {
    Event(KeyEvent),
    Skip,
    Incomplete,
    Invalid(u8),
}

/// Decode CSI modifier parameter (1-based).
fn decode_modifier(param: u32) -> Modifier {
    let val = param.saturating_sub(1);
    let mut m = Modifier::NONE;
    if val & 1 != 0 { m |= Modifier::SHIFT; }
    if val & 2 != 0 { m |= Modifier::ALT; }
    if val & 4 != 0 { m |= Modifier::CTRL; }
    if val & 8 != 0 { m |= Modifier::SUPER; }
    m
}

// =============================================================================
// Tests
// =============================================================================
