//! Raw input sources.
//!
//! The event loop pulls one chunk at a time and blocks until it arrives;
//! that wait is the only suspension point in the shell. While the parser
//! holds the start of an unfinished escape sequence the loop waits with a
//! short timeout instead, so a lone `ESC [` cannot swallow the next key.

use std::collections::VecDeque;
use std::io::{self, Read};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

/// What a wait for input produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Received {
    /// Raw bytes, never empty.
    Chunk(Vec<u8>),
    /// The timeout passed with nothing to read.
    Idle,
    /// End of input.
    Closed,
}

/// Something that yields raw terminal bytes.
pub trait InputSource {
    /// Block until the next chunk is available, or until `timeout` passes.
    /// `None` waits indefinitely.
    fn next_chunk(&mut self, timeout: Option<Duration>) -> io::Result<Received>;
}

// =============================================================================
// stdin
// =============================================================================

enum StdinMessage {
    Data(Vec<u8>),
    Closed,
    Failed(io::Error),
}

/// Reads raw bytes from the process stdin on a dedicated thread.
///
/// The thread may stay blocked in `read` after the shell is done with it;
/// it goes away with the process.
pub struct StdinSource {
    rx: Receiver<StdinMessage>,
}

impl StdinSource {
    /// Spawn the reader thread.
    pub fn spawn() -> io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("cf-shell-stdin".to_string())
            .spawn(move || read_loop(&tx))?;
        Ok(Self { rx })
    }
}

fn read_loop(tx: &Sender<StdinMessage>) {
    let stdin = io::stdin();
    let mut buf = [0u8; 256];

    loop {
        let msg = match stdin.lock().read(&mut buf) {
            Ok(0) => StdinMessage::Closed,
            Ok(n) => StdinMessage::Data(buf[..n].to_vec()),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => StdinMessage::Failed(e),
        };
        let last = !matches!(msg, StdinMessage::Data(_));
        // The receiver is gone once the shell stops
        if tx.send(msg).is_err() || last {
            break;
        }
    }
}

impl InputSource for StdinSource {
    fn next_chunk(&mut self, timeout: Option<Duration>) -> io::Result<Received> {
        let msg = match timeout {
            Some(timeout) => match self.rx.recv_timeout(timeout) {
                Ok(msg) => msg,
                Err(RecvTimeoutError::Timeout) => return Ok(Received::Idle),
                Err(RecvTimeoutError::Disconnected) => return Ok(Received::Closed),
            },
            None => match self.rx.recv() {
                Ok(msg) => msg,
                Err(_) => return Ok(Received::Closed),
            },
        };

        match msg {
            StdinMessage::Data(data) => Ok(Received::Chunk(data)),
            StdinMessage::Closed => Ok(Received::Closed),
            StdinMessage::Failed(err) => Err(err),
        }
    }
}

// =============================================================================
// Scripted
// =============================================================================

/// A fixed sequence of chunks, used to script sessions.
///
/// An empty chunk stands for a pause longer than any timeout: it reports
/// [`Received::Idle`] to a caller that is waiting with a timeout and is
/// skipped otherwise.
#[derive(Debug, Default, Clone)]
pub struct ScriptedSource {
    chunks: VecDeque<Vec<u8>>,
}

impl ScriptedSource {
    pub fn new<I, C>(chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: AsRef<[u8]>,
    {
        Self {
            chunks: chunks.into_iter().map(|c| c.as_ref().to_vec()).collect(),
        }
    }

    /// One chunk per character, the way a person types.
    pub fn keystrokes(text: &str) -> Self {
        Self::new(text.chars().map(|c| c.to_string()))
    }

    pub fn remaining(&self) -> usize {
        self.chunks.len()
    }
}

impl InputSource for ScriptedSource {
    fn next_chunk(&mut self, timeout: Option<Duration>) -> io::Result<Received> {
        while let Some(chunk) = self.chunks.pop_front() {
            if !chunk.is_empty() {
                return Ok(Received::Chunk(chunk));
            }
            if timeout.is_some() {
                return Ok(Received::Idle);
            }
        }
        Ok(Received::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WAIT: Option<Duration> = Some(Duration::from_millis(10));

    #[test]
    fn test_scripted_source_yields_in_order_then_ends() {
        let mut src = ScriptedSource::new(["ab", "\r"]);
        assert_eq!(src.next_chunk(None).unwrap(), Received::Chunk(b"ab".to_vec()));
        assert_eq!(src.next_chunk(None).unwrap(), Received::Chunk(b"\r".to_vec()));
        assert_eq!(src.next_chunk(None).unwrap(), Received::Closed);
    }

    #[test]
    fn test_keystrokes_one_chunk_per_char() {
        let src = ScriptedSource::keystrokes("héllo\r");
        assert_eq!(src.remaining(), 6);
    }

    #[test]
    fn test_pause_is_idle_only_with_timeout() {
        let mut src = ScriptedSource::new(["a", "", "b", "", "c"]);
        assert_eq!(src.next_chunk(WAIT).unwrap(), Received::Chunk(b"a".to_vec()));
        assert_eq!(src.next_chunk(WAIT).unwrap(), Received::Idle);
        assert_eq!(src.next_chunk(WAIT).unwrap(), Received::Chunk(b"b".to_vec()));
        // Nobody is waiting on a deadline, the pause just passes
        assert_eq!(src.next_chunk(None).unwrap(), Received::Chunk(b"c".to_vec()));
        assert_eq!(src.next_chunk(WAIT).unwrap(), Received::Closed);
    }
}
