//! Core domain logic for the Inventory Monitor.
//!
//! Holds everything that is independent of the serial transport and the
//! runtime loop: settings (CLI + persisted last-used params), the error
//! taxonomy, the line framer that turns raw byte chunks into decoded lines,
//! the pattern classifier that decides which lines are persisted, and
//! timestamp formatting helpers.

pub mod classifier;
pub mod error;
pub mod framer;
pub mod settings;
pub mod timefmt;

pub use classifier::{classify, ClassifiedEvent, EventKind};
pub use error::{MonitorError, Result};
pub use framer::LineFramer;
