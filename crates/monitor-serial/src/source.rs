//! The serial connection seam and its hardware-backed implementation.

use std::io::{self, Read};
use std::time::Duration;

use monitor_core::{MonitorError, Result};

// ── SerialSource trait ────────────────────────────────────────────────────────

/// What the monitor loop requires from a serial connection.
///
/// Implementations must tolerate being polled when no data is available:
/// [`SerialSource::read`] returns `Ok(0)` then, never an error. The handle is
/// released when the source is dropped.
pub trait SerialSource: Send {
    /// Number of bytes waiting in the driver's receive buffer.
    fn bytes_to_read(&mut self) -> io::Result<u32>;

    /// Drain available bytes into `buf`, returning how many were read.
    /// May block for at most the configured short timeout.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

// ── SerialPortSource ──────────────────────────────────────────────────────────

/// Read timeout for the underlying port. Short enough that cancellation is
/// observed promptly, long enough to drain a burst in one call.
const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// A [`SerialSource`] backed by a real port via the `serialport` crate.
pub struct SerialPortSource {
    port: Box<dyn serialport::SerialPort>,
}

impl std::fmt::Debug for SerialPortSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialPortSource")
            .field("port", &self.port.name())
            .finish()
    }
}

/// Open `port_name` at `baud`, 8 data bits, 1 stop bit, no parity.
///
/// Open failure is fatal for the monitor: no retry is attempted, since a
/// missing or busy port is a configuration problem rather than a transient
/// fault. The error message carries a remediation hint.
pub fn open_port(port_name: &str, baud: u32) -> Result<SerialPortSource> {
    let port = serialport::new(port_name, baud)
        .timeout(READ_TIMEOUT)
        .data_bits(serialport::DataBits::Eight)
        .stop_bits(serialport::StopBits::One)
        .parity(serialport::Parity::None)
        .open()
        .map_err(|e| MonitorError::ConnectionOpen {
            port: port_name.to_string(),
            reason: e.to_string(),
        })?;

    tracing::info!(port = port_name, baud, "serial port opened");
    Ok(SerialPortSource { port })
}

impl SerialSource for SerialPortSource {
    fn bytes_to_read(&mut self) -> io::Result<u32> {
        self.port
            .bytes_to_read()
            .map_err(|e| io::Error::other(e.to_string()))
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.port.read(buf) {
            Ok(n) => Ok(n),
            // A timeout with nothing buffered is the quiet-line case, not an error.
            Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(e),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_nonexistent_port_is_connection_open_error() {
        let err = open_port("/dev/hopefully-not-a-real-port", 115_200).unwrap_err();
        match &err {
            MonitorError::ConnectionOpen { port, .. } => {
                assert_eq!(port, "/dev/hopefully-not-a-real-port");
            }
            other => panic!("expected ConnectionOpen, got {other:?}"),
        }
        assert!(err.to_string().contains("not held by another program"));
    }
}
