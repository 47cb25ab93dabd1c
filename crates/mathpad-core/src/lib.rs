#![warn(missing_docs)]
//! Mathpad Core - Headless Derivation View Reconciliation Engine
//!
//! # Overview
//!
//! `mathpad-core` keeps a rendered, annotated view of a multi-line derivation buffer
//! incrementally synchronized with that buffer. It is headless: it never typesets
//! anything itself, assuming the host owns a renderer that can create, update and
//! remove rendered lines. The engine computes *what* must change and tracks the
//! per-line annotation state (correctness markers, trailing hints); the host applies
//! the resulting plan to its rendering backend.
//!
//! Lines are opaque strings to the engine. The diff is deliberately *not* a general
//! diff algorithm: it is a prefix-stable, order-preserving reconciliation restricted
//! to in-place updates, appends, truncations and an earliest-difference boundary.
//!
//! # Core Features
//!
//! - **Logical Line Extraction**: blank lines are never counted or rendered
//! - **Minimal Render Plans**: an update op is only emitted for an index whose text
//!   actually differs; identical sequences produce an empty plan
//! - **Annotation Invalidation**: statuses and hints at or after the earliest
//!   difference are dropped, everything before it is preserved
//! - **Validation Watermarks**: a server-reported "validated up to" watermark maps
//!   onto per-line correctness statuses with a single first-error boundary marker
//! - **Dirty-Flag Scheduling**: bursts of edits coalesce into one reconciliation
//!   per poll tick; a single-flight guard serializes remote requests
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  DerivationSession (scheduler + state)      │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Validation Status Machine                  │  ← Watermark → statuses
//! ├─────────────────────────────────────────────┤
//! │  Annotation Overlay (statuses + hints)      │  ← Positional bookkeeping
//! ├─────────────────────────────────────────────┤
//! │  Reconciler (render plans)                  │  ← Positional diff
//! ├─────────────────────────────────────────────┤
//! │  Line Splitter                              │  ← Logical lines
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use mathpad_core::{DerivationSession, RenderOp};
//!
//! let mut session = DerivationSession::new("x ^ 2\n");
//!
//! // First poll renders the seeded buffer.
//! let plan = session.tick().unwrap();
//! assert_eq!(plan.ops, vec![RenderOp::Append { index: 0, text: "x ^ 2".to_string() }]);
//!
//! // Nothing changed, so the next poll is a no-op.
//! assert!(session.tick().is_none());
//!
//! // An edit marks the session dirty; the following poll reconciles it.
//! session.edit("x ^ 2\n2 * x\n");
//! let plan = session.tick().unwrap();
//! assert_eq!(plan.ops.len(), 1);
//! ```
//!
//! # Module Description
//!
//! - [`lines`] - logical line extraction from the raw buffer
//! - [`reconcile`] - positional diff producing render plans
//! - [`overlay`] - per-line status and hint annotations
//! - [`validation`] - watermark to per-line status mapping
//! - [`session`] - dirty-flag scheduling, single-flight guard, session state
//!
//! Remote solver integration (the `hint` / `step` / `validate` / `answer`
//! protocol) lives in the `mathpad-solver` crate so that consumers of the bare
//! engine do not pull in JSON or HTTP dependencies.

pub mod lines;
pub mod overlay;
pub mod reconcile;
pub mod session;
pub mod validation;

pub use lines::{last_logical_line, logical_lines};
pub use overlay::{AnnotationOverlay, LineStatus};
pub use reconcile::{
    ReconcilePlan, RenderHandle, RenderOp, RenderedLine, apply_plan, reconcile,
    render_from_scratch,
};
pub use session::{
    DerivationSession, RECONCILE_INTERVAL, RequestKind, SessionChange, SessionChangeCallback,
    SessionChangeType,
};
pub use validation::{ValidatedWatermark, apply_validation};
