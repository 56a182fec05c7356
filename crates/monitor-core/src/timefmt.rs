use chrono::{DateTime, Local};

// ── Record timestamps ─────────────────────────────────────────────────────────

/// Format used for the bracketed prefix on addition records.
const RECORD_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a timestamp the way addition records carry it: `YYYY-MM-DD HH:MM:SS`.
pub fn record_stamp(at: DateTime<Local>) -> String {
    at.format(RECORD_FORMAT).to_string()
}

/// Render the session-boundary banner line, including its surrounding blank
/// line and trailing newline: `\n--- Session Started: <timestamp> ---\n`.
pub fn session_banner(at: DateTime<Local>) -> String {
    format!("\n--- Session Started: {} ---\n", at.format(RECORD_FORMAT))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
