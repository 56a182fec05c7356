//! Durable, append-only session log.
//!
//! One [`SessionLog`] covers one monitor session: opening writes a session
//! boundary banner, every non-ignored event becomes one record, and each
//! record is flushed to the OS before `record` returns, so a crash right
//! after a successful call does not lose that line. Existing file content is
//! never truncated; a file accumulates sessions over time.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use monitor_core::classifier::{ClassifiedEvent, EventKind};
use monitor_core::timefmt;
use monitor_core::{MonitorError, Result};

// ── RecordSink trait ──────────────────────────────────────────────────────────

/// Where classified events go. The seam exists so loop tests can inject
/// write failures and capture records without a real file.
pub trait RecordSink: Send {
    /// Persist one event. Returns `Ok(true)` if a record was written,
    /// `Ok(false)` if the event is ignored by policy.
    fn record(&mut self, event: &ClassifiedEvent) -> Result<bool>;

    /// Flush and release underlying resources. Called once, on loop exit.
    fn close(&mut self) -> Result<()>;
}

// ── SessionLog ────────────────────────────────────────────────────────────────

/// Append-only writer over the inventory log file.
#[derive(Debug)]
pub struct SessionLog {
    file: File,
    path: PathBuf,
}

impl SessionLog {
    /// Open `path` in append mode (creating it if absent, never truncating)
    /// and write the session boundary banner.
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| MonitorError::Write {
                path: path.to_path_buf(),
                source: e,
            })?;

        let mut log = Self {
            file,
            path: path.to_path_buf(),
        };
        log.append(&timefmt::session_banner(Local::now()))?;

        tracing::info!(path = %log.path.display(), "session log opened");
        Ok(log)
    }

    /// Write `text` and flush it to the OS before returning.
    fn append(&mut self, text: &str) -> Result<()> {
        let write = |f: &mut File| -> std::io::Result<()> {
            f.write_all(text.as_bytes())?;
            f.flush()
        };
        write(&mut self.file).map_err(|e| MonitorError::Write {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Path this log writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSink for SessionLog {
    fn record(&mut self, event: &ClassifiedEvent) -> Result<bool> {
        match event.kind {
            EventKind::Ignored => Ok(false),
            EventKind::InventoryAddition => {
                let stamp = timefmt::record_stamp(Local::now());
                self.append(&format!("[{stamp}] {}\n", event.line))?;
                // Operator notice, mirroring the echoed line above it.
                println!("--> Saved to log file");
                Ok(true)
            }
            EventKind::InventoryDump => {
                self.append(&format!("{}\n", event.line))?;
                Ok(true)
            }
        }
    }

    fn close(&mut self) -> Result<()> {
        self.file.flush().map_err(|e| MonitorError::Write {
            path: self.path.clone(),
            source: e,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
