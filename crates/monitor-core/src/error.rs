use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the Inventory Monitor.
#[derive(Error, Debug)]
pub enum MonitorError {
    /// The serial port could not be opened. Fatal: the monitor never enters
    /// its running state and the process exits non-zero.
    #[error(
        "Failed to open serial port {port}: {reason}. \
         Check that the port name is correct and that it is not held by \
         another program (like a flasher or an IDE serial monitor)."
    )]
    ConnectionOpen { port: String, reason: String },

    /// A record could not be appended to the session log file.
    /// Non-fatal per occurrence: the line is dropped and the loop continues.
    #[error("Failed to write to log file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the monitor crates.
pub type Result<T> = std::result::Result<T, MonitorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_connection_open() {
        let err = MonitorError::ConnectionOpen {
            port: "/dev/ttyUSB0".to_string(),
            reason: "Device or resource busy".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to open serial port /dev/ttyUSB0"));
        assert!(msg.contains("Device or resource busy"));
        assert!(msg.contains("not held by another program"));
    }

    #[test]
    fn test_error_display_write() {
        let io_err = std::io::Error::other("disk full");
        let err = MonitorError::Write {
            path: PathBuf::from("/data/inventory_log.txt"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to write to log file"));
        assert!(msg.contains("/data/inventory_log.txt"));
        assert!(msg.contains("disk full"));
    }

    #[test]
    fn test_error_display_config() {
        let err = MonitorError::Config("no serial port given".to_string());
        assert_eq!(err.to_string(), "Configuration error: no serial port given");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: MonitorError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }
}
