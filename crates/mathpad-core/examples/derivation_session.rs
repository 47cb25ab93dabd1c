//! Derivation session example
//!
//! Simulates a user typing a derivation and shows the render plans the host
//! would apply on each scheduler tick.

use mathpad_core::{DerivationSession, LineStatus, RenderOp, ValidatedWatermark};

fn main() {
    let mut session = DerivationSession::new("d/dx x^2\n");

    session.subscribe(|change| {
        println!(
            "  change: {:?} (version {} -> {})",
            change.change_type, change.old_version, change.new_version
        );
    });

    println!("1. First tick renders the seeded buffer:");
    print_plan(session.tick());

    println!("\n2. Clean ticks are no-ops:");
    print_plan(session.tick());

    println!("\n3. The user types the next step (several keystrokes, one pass):");
    session.edit("d/dx x^2\n2x");
    session.edit("d/dx x^2\n2 * x\n");
    print_plan(session.tick());

    println!("\n4. A validation verdict arrives:");
    session.apply_validation(&ValidatedWatermark {
        validated: 1,
        status: vec![LineStatus::Correct],
    });
    for line in 0..session.line_count() {
        println!("  line {}: {:?}", line, session.overlay().status(line));
    }

    println!("\n5. Editing line 1 invalidates its status but keeps line 0:");
    session.edit("d/dx x^2\n3 * x\n");
    print_plan(session.tick());
    for line in 0..session.line_count() {
        println!("  line {}: {:?}", line, session.overlay().status(line));
    }
}

fn print_plan(plan: Option<mathpad_core::ReconcilePlan>) {
    match plan {
        None => println!("  (no pass ran)"),
        Some(plan) => {
            if plan.is_noop() {
                println!("  empty plan, boundary {:?}", plan.boundary);
            }
            for op in &plan.ops {
                match op {
                    RenderOp::Update { index, text } => println!("  update {index}: {text}"),
                    RenderOp::Append { index, text } => println!("  append {index}: {text}"),
                    RenderOp::Remove { index } => println!("  remove {index}"),
                }
            }
        }
    }
}
