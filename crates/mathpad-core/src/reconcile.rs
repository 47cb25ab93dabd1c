//! Positional reconciliation between the buffer and the rendered view.
//!
//! The reconciler compares the current logical line sequence against the previously
//! rendered sequence and emits a minimal, ordered [`RenderOp`] plan. It is an
//! explicit data-diff: the previously rendered state is threaded through each call
//! as a value instead of being read back from a live view.
//!
//! The diff is prefix-stable and order-preserving. There is no line reordering or
//! move detection; only three shapes of change exist:
//!
//! - an in-place **update** at an index whose text differs
//! - **appends** past the end of the previously rendered sequence
//! - **removals** of trailing rendered lines the buffer no longer contains
//!
//! Alongside the plan, the reconciler computes the *invalidation boundary*: the
//! first position whose annotations can no longer be trusted. Annotation state
//! strictly before the boundary survives the pass untouched (see
//! [`AnnotationOverlay::invalidate`](crate::overlay::AnnotationOverlay::invalidate)).

/// Opaque identity of one rendered line in the host's rendering backend.
///
/// Handles are allocated when a line is first rendered and stay stable across
/// in-place updates; the host maps them to whatever its renderer uses (a DOM
/// node, a typeset object, a row id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderHandle(pub u64);

/// One currently rendered logical line, tracked positionally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    /// Zero-based position in the rendered sequence.
    pub index: usize,
    /// The logical line text this rendering was produced from.
    pub source_text: String,
    /// Stable identity of the rendering in the host backend.
    pub handle: RenderHandle,
}

/// A single render operation in a reconciliation plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOp {
    /// Re-render the line at `index` with new text; the render handle is kept.
    Update {
        /// Position of the line to re-render.
        index: usize,
        /// The new line text.
        text: String,
    },
    /// Render a new line at `index`, one past the current end of the view.
    Append {
        /// Position of the new line.
        index: usize,
        /// The line text to render.
        text: String,
    },
    /// Remove the rendered line at `index` and everything the host attached to it.
    Remove {
        /// Position of the line to remove.
        index: usize,
    },
}

/// The outcome of one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Ordered render operations; applying them in order transforms the previous
    /// rendered sequence into one matching the new logical lines exactly.
    pub ops: Vec<RenderOp>,
    /// The annotation invalidation boundary: annotations at or after this position
    /// are stale. `None` means nothing changed at all.
    pub boundary: Option<usize>,
}

impl ReconcilePlan {
    /// Returns `true` if this pass found no difference (full no-op).
    pub fn is_noop(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Compare `new_lines` against the previously rendered sequence and compute the
/// minimal render plan.
///
/// Guarantees:
///
/// - An [`RenderOp::Update`] is only emitted for an index whose text actually
///   differs; untouched lines are never re-rendered.
/// - Identical sequences produce an empty plan and a `None` boundary, so a pass
///   over an unchanged buffer is idempotent.
/// - A buffer that became entirely empty produces a removal for every previous
///   index and boundary `0`.
///
/// The boundary is the earliest updated index when any update occurred. When only
/// appends or only removals occurred it is the length of the shorter sequence:
/// for appends that is the first appended position (so a trailing hint tied to
/// the old last line is invalidated without touching any earlier annotation),
/// and for truncations it is the new total line count.
pub fn reconcile(new_lines: &[&str], previous: &[RenderedLine]) -> ReconcilePlan {
    let mut ops = Vec::new();
    let mut earliest_update: Option<usize> = None;

    let common = new_lines.len().min(previous.len());
    for index in 0..common {
        debug_assert_eq!(previous[index].index, index, "rendered sequence has a gap");

        if previous[index].source_text != new_lines[index] {
            earliest_update.get_or_insert(index);
            ops.push(RenderOp::Update {
                index,
                text: new_lines[index].to_string(),
            });
        }
    }

    for (index, text) in new_lines.iter().enumerate().skip(previous.len()) {
        ops.push(RenderOp::Append {
            index,
            text: text.to_string(),
        });
    }

    for index in new_lines.len()..previous.len() {
        ops.push(RenderOp::Remove { index });
    }

    let boundary = match earliest_update {
        Some(index) => Some(index),
        None if new_lines.len() != previous.len() => Some(common),
        None => None,
    };

    ReconcilePlan { ops, boundary }
}

/// Apply a plan to the rendered-line bookkeeping, allocating handles for appends.
///
/// `next_handle` is the session's monotonically increasing handle counter. After
/// application, `previous` mirrors the logical line sequence the plan was computed
/// from, index for index.
pub fn apply_plan(previous: &mut Vec<RenderedLine>, plan: &ReconcilePlan, next_handle: &mut u64) {
    for op in &plan.ops {
        match op {
            RenderOp::Update { index, text } => {
                debug_assert!(*index < previous.len(), "update past end of rendered view");
                previous[*index].source_text = text.clone();
            }
            RenderOp::Append { index, text } => {
                debug_assert_eq!(*index, previous.len(), "append out of order");
                let handle = RenderHandle(*next_handle);
                *next_handle += 1;
                previous.push(RenderedLine {
                    index: *index,
                    source_text: text.clone(),
                    handle,
                });
            }
            RenderOp::Remove { index } => {
                // Removals cover a contiguous tail range in ascending order; the
                // first one truncates, the rest are no-ops.
                if *index < previous.len() {
                    previous.truncate(*index);
                }
            }
        }
    }
}

/// Build the rendered sequence a from-scratch render of `lines` would produce.
///
/// Convenience for hosts (and tests) that need a baseline to reconcile against.
pub fn render_from_scratch(lines: &[&str], next_handle: &mut u64) -> Vec<RenderedLine> {
    let mut rendered = Vec::new();
    let plan = reconcile(lines, &rendered);
    apply_plan(&mut rendered, &plan, next_handle);
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_keeps_the_render_handle() {
        let mut handles = 0;
        let mut rendered = render_from_scratch(&["a", "b"], &mut handles);
        let old_handle = rendered[1].handle;

        let plan = reconcile(&["a", "c"], &rendered);
        apply_plan(&mut rendered, &plan, &mut handles);

        assert_eq!(rendered[1].source_text, "c");
        assert_eq!(rendered[1].handle, old_handle);
    }

    #[test]
    fn appended_lines_get_fresh_handles() {
        let mut handles = 0;
        let mut rendered = render_from_scratch(&["a"], &mut handles);

        let plan = reconcile(&["a", "b"], &rendered);
        apply_plan(&mut rendered, &plan, &mut handles);

        assert_eq!(rendered.len(), 2);
        assert_ne!(rendered[0].handle, rendered[1].handle);
    }
}
