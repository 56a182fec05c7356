use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::MonitorError;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Serial inventory monitor for ESP32 inventory trackers
#[derive(Parser, Debug, Clone)]
#[command(
    name = "inventory-monitor",
    about = "Watches a serial port for inventory events and logs them to a file",
    version
)]
pub struct Settings {
    /// Serial port to monitor (e.g. /dev/ttyUSB0 or COM4)
    #[arg(long, short = 'p')]
    pub port: Option<String>,

    /// Baud rate
    #[arg(long, default_value = "115200")]
    pub baud: u32,

    /// Output log file path
    #[arg(long, short = 'o', default_value = "inventory_log.txt")]
    pub output: PathBuf,

    /// Idle polling delay in milliseconds when no bytes are available
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u64).range(1..=1000))]
    pub poll_interval_ms: u64,

    /// Safety cap on buffered bytes awaiting a line terminator
    #[arg(long, default_value = "8192", value_parser = clap::value_parser!(u64).range(64..))]
    pub max_line_bytes: u64,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.inventory-monitor/last_used.json`.
///
/// Lets the operator run the tool without retyping the port every time; CLI
/// values always win over persisted ones.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baud: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    /// Uses `~/.inventory-monitor/last_used.json`.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".inventory-monitor").join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to an explicit path, creating parent
    /// directories if needed.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        // Write to a temp file then rename for atomicity.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result for next run.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation – accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        // Build raw ArgMatches so we can query ValueSource.
        let matches = Settings::command().get_matches_from(args.clone());

        // Parse into the typed struct using the same args.
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            let _ = LastUsedParams::clear_at(config_path);
            return Self::apply_debug(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // Merge last-used values for fields that were NOT explicitly set on
        // the command line (CLI always wins).
        if settings.port.is_none() {
            settings.port = last.port;
        }
        if !is_arg_explicitly_set(&matches, "baud") {
            if let Some(v) = last.baud {
                settings.baud = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "output") {
            if let Some(v) = last.output {
                settings.output = v;
            }
        }

        settings = Self::apply_debug(settings);

        // Persist current settings for next run (only once a port is known).
        if settings.port.is_some() {
            let params = LastUsedParams::from(&settings);
            let _ = params.save_to(config_path);
        }

        settings
    }

    /// `--debug` overrides the log level.
    fn apply_debug(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Return the configured port, or a configuration error when none was
    /// given on the command line and none is persisted from a previous run.
    pub fn require_port(&self) -> crate::error::Result<&str> {
        self.port.as_deref().ok_or_else(|| {
            MonitorError::Config(
                "no serial port given; pass --port (it is remembered for next time)".to_string(),
            )
        })
    }

    /// The output path resolved to an absolute path for operator display.
    pub fn display_output(&self) -> PathBuf {
        if self.output.is_absolute() {
            self.output.clone()
        } else {
            std::env::current_dir()
                .map(|d| d.join(&self.output))
                .unwrap_or_else(|_| self.output.clone())
        }
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            port: s.port.clone(),
            baud: Some(s.baud),
            output: Some(s.output.clone()),
        }
    }
}

// ── Helper: check if an arg was explicitly set on the command line ─────────────

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
