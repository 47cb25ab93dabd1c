use mathpad_core::{
    DerivationSession, LineStatus, RenderOp, RequestKind, SessionChangeType, ValidatedWatermark,
};
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};

#[test]
fn seeded_buffer_renders_on_first_tick() {
    let mut session = DerivationSession::new("x^2\n2x\n");

    let plan = session.tick().expect("seed should leave the session dirty");
    assert_eq!(plan.ops.len(), 2);
    assert_eq!(session.line_count(), 2);

    assert!(session.tick().is_none(), "clean session must not reconcile");
}

#[test]
fn rapid_edits_coalesce_into_one_pass() {
    let mut session = DerivationSession::empty();
    session.tick();

    session.edit("x^2\n");
    session.edit("x^2\n2");
    session.edit("x^2\n2x\n");

    let plan = session.tick().expect("dirty session must reconcile");
    assert_eq!(
        plan.ops,
        vec![
            RenderOp::Append {
                index: 0,
                text: "x^2".to_string()
            },
            RenderOp::Append {
                index: 1,
                text: "2x".to_string()
            },
        ]
    );
    assert!(session.tick().is_none());
}

#[test]
fn update_invalidates_annotations_from_the_changed_line() {
    let mut session = DerivationSession::new("x^2\n2x\n");
    session.tick();

    session.apply_validation(&ValidatedWatermark {
        validated: 1,
        status: vec![LineStatus::Correct],
    });
    session.set_tail_hint("now simplify");
    assert!(session.has_tail_hint());

    // Scenario B: line 1 changes; line 0 keeps its status, the hint after
    // line 1 is removed.
    session.edit("x^2\n3x\n");
    let plan = session.tick().unwrap();
    assert_eq!(plan.boundary, Some(1));

    assert_eq!(session.overlay().status(0), Some(LineStatus::Correct));
    assert_eq!(session.overlay().status(1), None);
    assert!(!session.has_tail_hint());
}

#[test]
fn pure_append_preserves_statuses_and_drops_the_tail_hint() {
    let mut session = DerivationSession::new("x^2\n2x\n");
    session.tick();

    session.apply_validation(&ValidatedWatermark {
        validated: 1,
        status: vec![LineStatus::Correct],
    });
    session.set_tail_hint("derive once more");

    session.append_line("2");
    let plan = session.tick().unwrap();
    assert_eq!(plan.boundary, Some(2));

    // No status attached to a pre-existing line is cleared.
    assert_eq!(session.overlay().status(0), Some(LineStatus::Correct));
    assert_eq!(session.overlay().status(1), Some(LineStatus::Correct));
    // Only trailing hint state is affected.
    assert!(!session.has_tail_hint());
    assert_eq!(session.overlay().hint_count(), 0);
}

#[test]
fn clear_wipes_buffer_rendering_and_annotations() {
    let mut session = DerivationSession::new("x^2\n2x\n");
    session.tick();
    session.set_tail_hint("hint");
    session.apply_validation(&ValidatedWatermark {
        validated: 1,
        status: vec![LineStatus::Correct],
    });

    session.clear();
    assert!(session.overlay().is_empty());

    let plan = session.tick().unwrap();
    assert_eq!(
        plan.ops,
        vec![RenderOp::Remove { index: 0 }, RenderOp::Remove { index: 1 }]
    );
    assert_eq!(session.line_count(), 0);
}

#[test]
fn forced_refresh_runs_between_sequential_appends() {
    // An answer response applies each step with an immediate synchronous pass.
    let mut session = DerivationSession::new("x^2\n");
    session.tick();

    for step in ["2x", "2"] {
        session.append_line(step);
        let plan = session.refresh();
        assert_eq!(plan.ops.len(), 1, "each step renders individually");
    }

    assert_eq!(session.line_count(), 3);
    assert!(session.tick().is_none(), "refresh cleared the dirty flag");
}

#[test]
fn single_flight_guard_rejects_while_pending() {
    let mut session = DerivationSession::new("x^2\n");
    session.tick();

    assert!(session.begin_request(RequestKind::Validate));
    assert!(session.request_pending());

    // A second attempt while in flight is rejected, not queued.
    assert!(!session.begin_request(RequestKind::Validate));
    assert!(!session.begin_request(RequestKind::Hint));

    session.finish_request();
    assert!(!session.request_pending());
    assert!(session.begin_request(RequestKind::Step));
}

#[test]
fn requests_are_suppressed_for_a_blank_buffer() {
    let mut session = DerivationSession::new("  \n\n");
    session.tick();

    assert!(!session.begin_request(RequestKind::Hint));
    assert!(!session.begin_request(RequestKind::Answer));
    assert!(!session.request_pending());
}

#[test]
fn hint_requests_are_suppressed_while_one_is_displayed() {
    let mut session = DerivationSession::new("x^2\n");
    session.tick();
    session.set_tail_hint("already here");

    assert!(!session.begin_request(RequestKind::Hint));
    // Other kinds are unaffected by the displayed hint.
    assert!(session.begin_request(RequestKind::Step));
}

#[test]
fn subscribers_observe_version_increments() {
    let mut session = DerivationSession::empty();

    let seen = Arc::new(Mutex::new(Vec::<SessionChangeType>::new()));
    let seen_clone = Arc::clone(&seen);
    session.subscribe(move |change| {
        assert_eq!(change.old_version + 1, change.new_version);
        seen_clone.lock().unwrap().push(change.change_type);
    });

    session.edit("x^2\n");
    session.tick();
    session.set_tail_hint("hint");

    let seen = seen.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![
            SessionChangeType::BufferModified,
            SessionChangeType::Reconciled,
            SessionChangeType::AnnotationsChanged,
        ]
    );
}
