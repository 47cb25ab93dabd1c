//! Session state and the dirty-flag update scheduler.
//!
//! # Overview
//!
//! [`DerivationSession`] is the only mutable state of an editing session: the raw
//! buffer, the rendered-line bookkeeping, the annotation overlay, the dirty flag
//! and the single-flight request flag. Everything else in the engine is a pure (or
//! nearly pure) function the session invokes.
//!
//! Scheduling is a fixed-interval poll gated by a dirty flag: the host calls
//! [`tick`](DerivationSession::tick) every [`RECONCILE_INTERVAL`]; if any
//! buffer-mutating event happened since the last pass, one full reconciliation runs
//! (line split → diff → overlay invalidation) and the render plan is handed back
//! for the host to apply to its backend. Bursts of rapid edits therefore coalesce
//! into a single pass per tick instead of one per keystroke.
//!
//! Everything is single-threaded and run-to-completion: a reconciliation pass is
//! never interleaved with another pass or with a response handler mutating the
//! buffer. Remote-response handlers that append multiple sequential steps call
//! [`refresh`](DerivationSession::refresh) between appends so each step becomes
//! visible in order rather than waiting for the next poll tick.
//!
//! # Example
//!
//! ```rust
//! use mathpad_core::DerivationSession;
//!
//! let mut session = DerivationSession::empty();
//! session.subscribe(|change| {
//!     println!("v{} -> v{}: {:?}", change.old_version, change.new_version, change.change_type);
//! });
//!
//! session.edit("x ^ 2\n");
//! session.edit("x ^ 2\n2 * x\n");
//!
//! // Both edits coalesce into one reconciliation pass.
//! let plan = session.tick().unwrap();
//! assert_eq!(plan.ops.len(), 2);
//! assert!(session.tick().is_none());
//! ```

use crate::lines::{last_logical_line, logical_lines};
use crate::overlay::AnnotationOverlay;
use crate::reconcile::{ReconcilePlan, RenderedLine, apply_plan, reconcile};
use crate::validation::{self, ValidatedWatermark};
use std::time::Duration;

/// Design polling period: how often the host should call
/// [`DerivationSession::tick`].
pub const RECONCILE_INTERVAL: Duration = Duration::from_millis(100);

/// The four remote request kinds subject to the single-flight guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Ask for a hint about the next step.
    Hint,
    /// Ask for the next step itself.
    Step,
    /// Ask for a validation verdict over the whole derivation.
    Validate,
    /// Ask for the remaining steps to the final answer.
    Answer,
}

/// What kind of session state changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionChangeType {
    /// The raw buffer was mutated (keystroke, programmatic append, clear).
    BufferModified,
    /// A reconciliation pass changed the rendered view.
    Reconciled,
    /// Statuses or hints changed without a buffer mutation.
    AnnotationsChanged,
}

/// State change record handed to subscribers.
#[derive(Debug, Clone)]
pub struct SessionChange {
    /// Change type.
    pub change_type: SessionChangeType,
    /// Version number before the change.
    pub old_version: u64,
    /// Version number after the change.
    pub new_version: u64,
}

/// State change callback function type.
pub type SessionChangeCallback = Box<dyn FnMut(&SessionChange) + Send>;

/// The mutable state of one editing session plus its update scheduler.
///
/// The session adopts a unidirectional flow:
///
/// 1. input events mutate the buffer ([`edit`](Self::edit),
///    [`append_line`](Self::append_line), [`clear`](Self::clear)) and set the
///    dirty flag
/// 2. the host polls [`tick`](Self::tick); a dirty session runs one
///    reconciliation pass and returns the render plan
/// 3. the host applies the plan to its rendering backend and re-reads the
///    overlay for annotations
pub struct DerivationSession {
    buffer: String,
    rendered: Vec<RenderedLine>,
    overlay: AnnotationOverlay,
    dirty: bool,
    pending_request: bool,
    next_handle: u64,
    version: u64,
    callbacks: Vec<SessionChangeCallback>,
}

impl DerivationSession {
    /// Create a session seeded with an initial buffer (e.g. from a share link).
    ///
    /// The seed is not rendered yet; the first [`tick`](Self::tick) picks it up.
    pub fn new(initial: &str) -> Self {
        Self {
            buffer: initial.to_string(),
            rendered: Vec::new(),
            overlay: AnnotationOverlay::new(),
            dirty: true,
            pending_request: false,
            next_handle: 0,
            version: 0,
            callbacks: Vec::new(),
        }
    }

    /// Create a session with an empty buffer.
    pub fn empty() -> Self {
        Self::new("")
    }

    /// The raw buffer text.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// The currently rendered lines, in positional order.
    pub fn rendered_lines(&self) -> &[RenderedLine] {
        &self.rendered
    }

    /// Number of currently rendered lines.
    pub fn line_count(&self) -> usize {
        self.rendered.len()
    }

    /// The annotation overlay.
    pub fn overlay(&self) -> &AnnotationOverlay {
        &self.overlay
    }

    /// Whether an unreconciled buffer mutation is pending.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Current state version number.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Subscribe to state change notifications.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&SessionChange) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Replace the whole buffer (the editing surface pushes its full text on
    /// every input event) and mark the session dirty.
    pub fn edit(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.dirty = true;
        self.notify_change(SessionChangeType::BufferModified);
    }

    /// Append one line to the buffer (programmatic input, e.g. a solver step).
    pub fn append_line(&mut self, line: &str) {
        self.buffer.push('\n');
        self.buffer.push_str(line);
        self.dirty = true;
        self.notify_change(SessionChangeType::BufferModified);
    }

    /// Wipe the buffer and every annotation. The next pass removes all
    /// rendered lines.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.overlay.clear_all();
        self.dirty = true;
        self.notify_change(SessionChangeType::BufferModified);
    }

    /// One scheduler poll: run a reconciliation pass if the session is dirty.
    ///
    /// Returns the render plan of the pass, or `None` when the session was
    /// clean and nothing ran.
    pub fn tick(&mut self) -> Option<ReconcilePlan> {
        if !self.dirty {
            return None;
        }
        Some(self.refresh())
    }

    /// Run a full reconciliation pass now, regardless of the dirty flag.
    ///
    /// Splits the buffer, diffs against the rendered view, applies the plan to
    /// the positional bookkeeping and invalidates stale annotations. The
    /// returned plan is what the host must apply to its rendering backend.
    pub fn refresh(&mut self) -> ReconcilePlan {
        self.dirty = false;

        let lines = logical_lines(&self.buffer);
        let plan = reconcile(&lines, &self.rendered);
        apply_plan(&mut self.rendered, &plan, &mut self.next_handle);
        self.overlay.invalidate(plan.boundary);

        debug_assert_eq!(self.rendered.len(), lines.len());
        debug_assert!(
            self.rendered
                .iter()
                .enumerate()
                .all(|(i, line)| line.index == i && line.source_text == lines[i]),
            "rendered sequence out of sync after reconciliation"
        );

        if !plan.is_noop() {
            self.notify_change(SessionChangeType::Reconciled);
        }
        plan
    }

    /// Apply a validation watermark to the current rendered lines.
    ///
    /// Replaces every line status wholesale with the statuses the watermark
    /// implies; hints are untouched.
    pub fn apply_validation(&mut self, watermark: &ValidatedWatermark) {
        let statuses = validation::apply_validation(self.rendered.len(), watermark);
        for (line, status) in statuses.into_iter().enumerate() {
            match status {
                Some(status) => self.overlay.set_status(line, status),
                None => self.overlay.clear_status(line),
            }
        }
        self.notify_change(SessionChangeType::AnnotationsChanged);
    }

    /// Attach (or replace) the hint trailing the last rendered line.
    pub fn set_tail_hint(&mut self, text: impl Into<String>) {
        self.overlay.set_hint(self.rendered.len(), text);
        self.notify_change(SessionChangeType::AnnotationsChanged);
    }

    /// Whether a hint is currently displayed after the last rendered line.
    pub fn has_tail_hint(&self) -> bool {
        self.overlay.tail_hint(self.rendered.len()).is_some()
    }

    /// Whether a remote request is currently in flight.
    pub fn request_pending(&self) -> bool {
        self.pending_request
    }

    /// Try to acquire the single-flight request slot for `kind`.
    ///
    /// Returns `false` — and the request must be suppressed entirely, not queued —
    /// when another request is in flight, when the buffer holds no logical line,
    /// or when a hint is requested while one is already displayed at the tail.
    pub fn begin_request(&mut self, kind: RequestKind) -> bool {
        if self.pending_request {
            return false;
        }
        if last_logical_line(&self.buffer).is_none() {
            return false;
        }
        if kind == RequestKind::Hint && self.has_tail_hint() {
            return false;
        }

        self.pending_request = true;
        true
    }

    /// Release the single-flight request slot.
    ///
    /// Called unconditionally when a request completes, whether it succeeded,
    /// failed in transport, or carried an application error.
    pub fn finish_request(&mut self) {
        self.pending_request = false;
    }

    fn notify_change(&mut self, change_type: SessionChangeType) {
        let old_version = self.version;
        self.version += 1;

        let change = SessionChange {
            change_type,
            old_version,
            new_version: self.version,
        };
        for callback in &mut self.callbacks {
            callback(&change);
        }
    }
}

impl Default for DerivationSession {
    fn default() -> Self {
        Self::empty()
    }
}
