//! Per-line status and hint annotations.
//!
//! Annotations are derived view state anchored to rendered *positions*, not to line
//! text: a status marker on a line and hint text in the slot between two lines.
//! They originate from a validation pass or from a hint-bearing solver response and
//! are rendered by the host.
//!
//! Positional addressing:
//!
//! - a **status** is attached to line index `i`
//! - a **hint** occupies the inter-line slot *before* line `p` (equivalently,
//!   immediately after line `p - 1`); the trailing hint of the whole derivation
//!   therefore lives at slot `line_count`
//!
//! At most one status per line and one hint per slot exist at any time; setting
//! either replaces the previous value wholesale.

use std::collections::BTreeMap;

/// Validation verdict for one rendered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStatus {
    /// The step does not follow from the previous line.
    Incorrect,
    /// The step is equivalent to the previous line but makes no progress.
    NoProgress,
    /// The step follows correctly.
    Correct,
    /// The line could not be evaluated at all.
    Error,
}

impl LineStatus {
    /// Convert the numeric wire verdict (0..3) into an enum.
    pub fn from_code(value: u64) -> Option<Self> {
        match value {
            0 => Some(Self::Incorrect),
            1 => Some(Self::NoProgress),
            2 => Some(Self::Correct),
            3 => Some(Self::Error),
            _ => None,
        }
    }
}

/// Positional annotation bookkeeping for the rendered view.
///
/// The overlay never talks to the rendering backend; it tracks which annotations
/// exist where, and the session tells the host when they changed. It is kept
/// consistent with the rendered line sequence by running
/// [`invalidate`](Self::invalidate) after every reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationOverlay {
    statuses: BTreeMap<usize, LineStatus>,
    hints: BTreeMap<usize, String>,
}

impl AnnotationOverlay {
    /// Create an empty overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every annotation at or after `boundary`.
    ///
    /// Statuses at line indices `>= boundary` are cleared because a changed line's
    /// correctness is no longer known; hints at slots `>= boundary` are removed.
    /// Annotations strictly before the boundary are left untouched. A `None`
    /// boundary is a no-op (the reconciliation pass found no change).
    pub fn invalidate(&mut self, boundary: Option<usize>) {
        let Some(boundary) = boundary else {
            return;
        };

        self.statuses.retain(|&line, _| line < boundary);
        self.hints.retain(|&slot, _| slot < boundary);
    }

    /// Set the status of the line at `line`, replacing any previous one.
    pub fn set_status(&mut self, line: usize, status: LineStatus) {
        self.statuses.insert(line, status);
    }

    /// Remove the status of the line at `line`.
    pub fn clear_status(&mut self, line: usize) {
        self.statuses.remove(&line);
    }

    /// The status of the line at `line`, if one is set.
    pub fn status(&self, line: usize) -> Option<LineStatus> {
        self.statuses.get(&line).copied()
    }

    /// Set the hint in the slot before line `slot`, replacing any existing hint
    /// there. A later call always supersedes an earlier one at the same slot.
    pub fn set_hint(&mut self, slot: usize, text: impl Into<String>) {
        self.hints.insert(slot, text.into());
    }

    /// The hint occupying the slot before line `slot`, if any.
    pub fn hint(&self, slot: usize) -> Option<&str> {
        self.hints.get(&slot).map(String::as_str)
    }

    /// The hint trailing the whole derivation, given the current line count.
    pub fn tail_hint(&self, line_count: usize) -> Option<&str> {
        self.hint(line_count)
    }

    /// Remove every annotation; used when the buffer is wiped.
    pub fn clear_all(&mut self) {
        self.statuses.clear();
        self.hints.clear();
    }

    /// Returns `true` if no annotation exists.
    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty() && self.hints.is_empty()
    }

    /// Number of status annotations currently set.
    pub fn status_count(&self) -> usize {
        self.statuses.len()
    }

    /// Number of hint annotations currently set.
    pub fn hint_count(&self) -> usize {
        self.hints.len()
    }
}
