//! Pattern classification for received serial lines.
//!
//! The upstream firmware emits free-form log text with no stable grammar, so
//! classification is deliberately an ordered list of substring rules rather
//! than a parser. Rules are evaluated top to bottom; the first match wins.

// ── Public types ──────────────────────────────────────────────────────────────

/// How a received line should be persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Not an inventory event; echoed to the console but never written.
    Ignored,
    /// A confirmed single-item addition notice, e.g.
    /// `I (71964) inventory: Added item: mei id:1765269159_0001 qty:1 loc: remaining:7`.
    /// Written with a timestamp prefix.
    InventoryAddition,
    /// Part of a full inventory dump (`Inventory List:` header or `Item:`
    /// rows). Written verbatim, without a timestamp.
    InventoryDump,
}

/// A line paired with its classification. Created per line, consumed by the
/// session log writer, then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedEvent {
    /// The full original line, kept verbatim; no field extraction happens here.
    pub line: String,
    pub kind: EventKind,
}

// ── Rule table ────────────────────────────────────────────────────────────────

/// Substring an addition notice always contains.
const ADDITION_MARKER: &str = "inventory: Added item:";

/// Substrings marking lines that belong to a full inventory dump.
const DUMP_MARKERS: &[&str] = &["Inventory List:", "Item:"];

// ── Classification ────────────────────────────────────────────────────────────

/// Classify one decoded line.
///
/// Pure and stateless: the result depends only on the line's content, never
/// on previously seen lines. Priority order holds — a line containing both
/// the addition marker and a dump marker is an [`EventKind::InventoryAddition`].
pub fn classify(line: &str) -> ClassifiedEvent {
    let kind = if line.contains(ADDITION_MARKER) {
        EventKind::InventoryAddition
    } else if DUMP_MARKERS.iter().any(|m| line.contains(m)) {
        EventKind::InventoryDump
    } else {
        EventKind::Ignored
    };

    ClassifiedEvent {
        line: line.to_string(),
        kind,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
