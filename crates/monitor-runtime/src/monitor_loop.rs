//! The top-level monitor loop.
//!
//! Polls a [`SerialSource`] for bytes, frames them into lines, echoes every
//! line to the console, classifies it, and hands it to the [`RecordSink`].
//! Per-line failures are contained: a write error or malformed input never
//! terminates the session, only the operator interrupt (or dropping the
//! shutdown sender) does.

use std::time::Duration;

use monitor_core::classify;
use monitor_core::framer::LineFramer;
use tokio::sync::watch;

use crate::session_log::RecordSink;
use monitor_serial::SerialSource;

// ── Configuration ─────────────────────────────────────────────────────────────

/// Immutable loop configuration, fixed at startup.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Delay between polls when the line is quiet.
    pub poll_interval: Duration,
    /// Safety cap forwarded to the line framer.
    pub max_line_bytes: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(10),
            max_line_bytes: monitor_core::framer::DEFAULT_MAX_LINE_BYTES,
        }
    }
}

// ── Loop state ────────────────────────────────────────────────────────────────

/// Lifecycle states of the monitor.
///
/// `Connecting` happens before the loop exists (the caller opens the port);
/// the loop itself moves `Running → Draining → Closed`. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Connecting,
    Running,
    Draining,
    Closed,
}

/// Counters reported when the loop exits.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoopStats {
    /// Decoded lines received (matched or not).
    pub lines_seen: u64,
    /// Records successfully written to the log.
    pub records_written: u64,
    /// Per-line failures that were contained (read or write errors).
    pub line_errors: u64,
}

// ── MonitorLoop ───────────────────────────────────────────────────────────────

/// Owns the serial source, the framer, and the record sink for one session.
pub struct MonitorLoop<S: SerialSource, K: RecordSink> {
    source: S,
    sink: K,
    framer: LineFramer,
    config: MonitorConfig,
    state: LoopState,
    stats: LoopStats,
}

impl<S: SerialSource, K: RecordSink> MonitorLoop<S, K> {
    /// Build a loop over an already-open source and sink.
    pub fn new(source: S, sink: K, config: MonitorConfig) -> Self {
        let framer = LineFramer::new(config.max_line_bytes);
        Self {
            source,
            sink,
            framer,
            config,
            state: LoopState::Connecting,
            stats: LoopStats::default(),
        }
    }

    /// Run until `shutdown` becomes `true` (or its sender is dropped).
    ///
    /// On every exit path the sink is flushed and closed before the final
    /// [`LoopStats`] are returned; the serial handle is released when the
    /// loop value is dropped. Cancellation is observed within one poll
    /// interval.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> LoopStats {
        self.state = LoopState::Running;
        tracing::debug!("monitor loop running");

        let mut buf = [0u8; 1024];

        while !*shutdown.borrow() {
            let available = match self.source.bytes_to_read() {
                Ok(n) => n,
                Err(e) => {
                    eprintln!("Error reading line: {e}");
                    tracing::warn!(error = %e, "poll failed");
                    self.stats.line_errors += 1;
                    0
                }
            };

            if available == 0 {
                // Quiet line: sleep one poll interval, but wake early on
                // shutdown so cancellation stays prompt.
                tokio::select! {
                    _ = tokio::time::sleep(self.config.poll_interval) => {}
                    changed = shutdown.changed() => {
                        if changed.is_err() {
                            // Sender gone; treat as shutdown.
                            break;
                        }
                    }
                }
                continue;
            }

            match self.source.read(&mut buf) {
                Ok(0) => {}
                Ok(n) => {
                    for line in self.framer.push(&buf[..n]) {
                        self.handle_line(line);
                    }
                }
                Err(e) => {
                    eprintln!("Error reading line: {e}");
                    tracing::warn!(error = %e, "read failed");
                    self.stats.line_errors += 1;
                }
            }
        }

        // Stop polling; flush and close the log before reporting back.
        self.state = LoopState::Draining;
        tracing::debug!("monitor loop draining");
        if let Err(e) = self.sink.close() {
            eprintln!("Error closing log file: {e}");
            tracing::warn!(error = %e, "sink close failed");
        }

        self.state = LoopState::Closed;
        tracing::info!(
            lines = self.stats.lines_seen,
            records = self.stats.records_written,
            errors = self.stats.line_errors,
            "monitor loop closed"
        );
        self.stats
    }

    /// Process one decoded line: echo, classify, persist.
    ///
    /// Failures here are per-line: reported to the operator and counted,
    /// never propagated. The record is dropped, not retried.
    fn handle_line(&mut self, line: String) {
        self.stats.lines_seen += 1;
        println!("{line}");

        let event = classify(&line);
        match self.sink.record(&event) {
            Ok(true) => self.stats.records_written += 1,
            Ok(false) => {}
            Err(e) => {
                eprintln!("Error writing line to log: {e}");
                tracing::warn!(error = %e, "record dropped");
                self.stats.line_errors += 1;
            }
        }
    }

    /// Current lifecycle state (for tests and diagnostics).
    pub fn state(&self) -> LoopState {
        self.state
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
