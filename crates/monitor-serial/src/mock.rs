//! Scripted serial source for tests.
//!
//! [`MockSource`] plays back a fixed sequence of steps, letting loop and
//! framing tests control exactly how bytes arrive (including mid-line splits
//! and injected read errors) without any hardware.

use std::collections::VecDeque;
use std::io;

use crate::source::SerialSource;

// ── Script steps ──────────────────────────────────────────────────────────────

/// One scripted event on the mock wire.
#[derive(Debug, Clone)]
pub enum Step {
    /// Bytes become available and are returned by the next read.
    Chunk(Vec<u8>),
    /// One poll cycle with nothing available.
    Idle,
    /// The next read fails with this error kind, once.
    ReadError(io::ErrorKind),
}

// ── MockSource ────────────────────────────────────────────────────────────────

/// A [`SerialSource`] that replays a script. After the script is exhausted it
/// reports zero available bytes forever (a quiet line).
pub struct MockSource {
    script: VecDeque<Step>,
}

impl MockSource {
    pub fn new(script: impl IntoIterator<Item = Step>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    /// Convenience: a script that delivers each chunk in its own poll cycle.
    pub fn from_chunks<'a>(chunks: impl IntoIterator<Item = &'a [u8]>) -> Self {
        Self::new(chunks.into_iter().map(|c| Step::Chunk(c.to_vec())))
    }

    /// Whether every scripted step has been consumed.
    pub fn exhausted(&self) -> bool {
        self.script.is_empty()
    }
}

impl SerialSource for MockSource {
    fn bytes_to_read(&mut self) -> io::Result<u32> {
        match self.script.front() {
            Some(Step::Chunk(c)) => Ok(c.len() as u32),
            // An error step must be reached, so report it as pending data.
            Some(Step::ReadError(_)) => Ok(1),
            Some(Step::Idle) => {
                self.script.pop_front();
                Ok(0)
            }
            None => Ok(0),
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.script.pop_front() {
            Some(Step::Chunk(mut c)) => {
                let n = c.len().min(buf.len());
                buf[..n].copy_from_slice(&c[..n]);
                if n < c.len() {
                    // Deliver the remainder on the next read.
                    c.drain(..n);
                    self.script.push_front(Step::Chunk(c));
                }
                Ok(n)
            }
            Some(Step::ReadError(kind)) => Err(io::Error::new(kind, "scripted read error")),
            Some(Step::Idle) | None => Ok(0),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
