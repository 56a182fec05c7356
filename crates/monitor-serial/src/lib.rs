//! Serial acquisition layer for the Inventory Monitor.
//!
//! Provides the [`SerialSource`] trait the runtime polls for bytes, the
//! `serialport`-backed adapter for real hardware, and a scripted mock for
//! tests. The trait seam keeps the runtime loop testable without a device
//! on the other end.

pub mod mock;
pub mod source;

pub use mock::{MockSource, Step};
pub use source::{open_port, SerialPortSource, SerialSource};

pub use monitor_core as core;
