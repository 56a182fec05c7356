//! Runtime layer for the Inventory Monitor.
//!
//! Owns the durable session log writer and the top-level monitor loop that
//! wires serial source → line framer → classifier → log.

pub mod monitor_loop;
pub mod session_log;

pub use monitor_loop::{LoopState, LoopStats, MonitorConfig, MonitorLoop};
pub use session_log::{RecordSink, SessionLog};

pub use monitor_core as core;
pub use monitor_serial as serial;
