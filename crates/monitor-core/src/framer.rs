//! Byte-stream line framing.
//!
//! Serial reads arrive at arbitrary boundaries: a chunk may span several
//! lines, split one in the middle, or end exactly on a terminator.
//! [`LineFramer`] accumulates chunks and emits one decoded line per `\n`,
//! keeping any unterminated tail buffered for the next read. Framing is
//! chunk-boundary independent: any split of the same byte stream produces
//! the same line sequence.

// ── Defaults ──────────────────────────────────────────────────────────────────

/// Default cap on buffered bytes awaiting a terminator (see `--max-line-bytes`).
pub const DEFAULT_MAX_LINE_BYTES: usize = 8192;

// ── LineFramer ────────────────────────────────────────────────────────────────

/// Accumulates raw bytes and produces newline-delimited decoded lines.
///
/// Decoding is total: invalid UTF-8 sequences become U+FFFD replacement
/// characters instead of errors. Each emitted line is trimmed of surrounding
/// whitespace, so CRLF streams do not leave a stray `\r` on every line.
#[derive(Debug)]
pub struct LineFramer {
    /// Bytes received but not yet terminated by `\n`.
    buf: Vec<u8>,
    /// Upper bound on `buf` before a forced flush.
    max_line_bytes: usize,
}

impl LineFramer {
    /// Create a framer with the given safety cap on buffered bytes.
    ///
    /// The upstream device places no bound on line length, so a runaway
    /// stream with no terminator would otherwise grow the buffer without
    /// limit. When the cap is exceeded the buffered bytes are emitted as a
    /// line anyway (with a warning) rather than silently discarded.
    pub fn new(max_line_bytes: usize) -> Self {
        Self {
            buf: Vec::new(),
            max_line_bytes,
        }
    }

    /// Feed one raw chunk and return every line completed by it, in order.
    ///
    /// A line is complete when its `\n` terminator has arrived; bytes after
    /// the last terminator stay buffered. No line is dropped, emitted twice,
    /// or emitted before its terminator (except the oversize flush).
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let rest = self.buf.split_off(pos + 1);
            let mut line_bytes = std::mem::replace(&mut self.buf, rest);
            line_bytes.truncate(pos);
            lines.push(decode(&line_bytes));
        }

        // Unterminated tail past the cap: flush it as a line rather than
        // letting the buffer grow without bound.
        if self.buf.len() > self.max_line_bytes {
            tracing::warn!(
                buffered = self.buf.len(),
                cap = self.max_line_bytes,
                "unterminated line exceeded buffer cap; flushing as-is"
            );
            let line_bytes = std::mem::take(&mut self.buf);
            lines.push(decode(&line_bytes));
        }

        lines
    }

    /// Number of bytes currently buffered awaiting a terminator.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINE_BYTES)
    }
}

// ── Decoding ──────────────────────────────────────────────────────────────────

/// Decode line bytes to text, substituting U+FFFD for invalid sequences,
/// and trim surrounding whitespace so CRLF streams stay clean.
fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim().to_string()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── helpers ───────────────────────────────────────────────────────────

    /// Feed `data` to a fresh framer split into chunks of size `n`.
    fn frame_in_chunks(data: &[u8], n: usize) -> Vec<String> {
        let mut framer = LineFramer::default();
        let mut out = Vec::new();
        for chunk in data.chunks(n.max(1)) {
            out.extend(framer.push(chunk));
        }
        out
    }

    // ── basic framing ─────────────────────────────────────────────────────

    #[test]
    fn test_single_complete_line() {
        let mut framer = LineFramer::default();
        assert_eq!(framer.push(b"hello world\n"), vec!["hello world"]);
        assert_eq!(framer.pending(), 0);
    }

    #[test]
    fn test_no_line_until_terminator_arrives() {
        let mut framer = LineFramer::default();
        assert!(framer.push(b"partial").is_empty());
        assert_eq!(framer.pending(), 7);
        assert_eq!(framer.push(b" line\n"), vec!["partial line"]);
    }

    #[test]
    fn test_multiple_lines_in_one_chunk() {
        let mut framer = LineFramer::default();
        let lines = framer.push(b"one\ntwo\nthree\n");
        assert_eq!(lines, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_tail_after_last_terminator_stays_buffered() {
        let mut framer = LineFramer::default();
        assert_eq!(framer.push(b"done\nleft"), vec!["done"]);
        assert_eq!(framer.pending(), 4);
        assert_eq!(framer.push(b"over\n"), vec!["leftover"]);
    }

    #[test]
    fn test_crlf_terminator_leaves_no_carriage_return() {
        let mut framer = LineFramer::default();
        assert_eq!(framer.push(b"boot ok\r\n"), vec!["boot ok"]);
    }

    #[test]
    fn test_empty_line_is_emitted_empty() {
        let mut framer = LineFramer::default();
        assert_eq!(framer.push(b"\n"), vec![""]);
    }

    // ── chunk-boundary independence ───────────────────────────────────────

    #[test]
    fn test_framing_is_chunk_boundary_independent() {
        let data: &[u8] =
            b"I (71964) inventory: Added item: mei id:1765269159_0001 qty:1\r\nItem: widget\nhello\n";
        let whole = frame_in_chunks(data, data.len());
        for n in 1..=13 {
            assert_eq!(frame_in_chunks(data, n), whole, "chunk size {n}");
        }
    }

    // ── decoding ──────────────────────────────────────────────────────────

    #[test]
    fn test_invalid_utf8_becomes_replacement_marker() {
        let mut framer = LineFramer::default();
        let lines = framer.push(b"bad \xff\xfe bytes\n");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains('\u{FFFD}'));
        assert!(lines[0].starts_with("bad "));
        assert!(lines[0].ends_with(" bytes"));
    }

    #[test]
    fn test_multibyte_sequence_split_across_chunks_survives() {
        // "é" is 0xC3 0xA9; split between the two bytes.
        let mut framer = LineFramer::default();
        assert!(framer.push(b"caf\xC3").is_empty());
        assert_eq!(framer.push(b"\xA9\n"), vec!["café"]);
    }

    // ── oversize flush ────────────────────────────────────────────────────

    #[test]
    fn test_oversize_buffer_is_flushed_not_discarded() {
        let mut framer = LineFramer::new(16);
        let lines = framer.push(&[b'x'; 17]);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0], "x".repeat(17));
        assert_eq!(framer.pending(), 0);
    }

    #[test]
    fn test_buffer_at_cap_is_not_flushed_early() {
        let mut framer = LineFramer::new(16);
        assert!(framer.push(&[b'x'; 16]).is_empty());
        assert_eq!(framer.pending(), 16);
    }
}
