//! Typed solver replies, hand-parsed from JSON values.
//!
//! Wire contract (one response object per request):
//!
//! - `hint` → `{ "hint": string }`
//! - `step` → `{ "step"?: string, "hint"?: string }`
//! - `validate` → `{ "validated": int, "status"?: [int 0..3] }`
//!   (status codes: 0 = incorrect, 1 = no-progress, 2 = correct, 3 = error)
//! - `answer` → `{ "steps"?: [{ "step"?: string, "hint"?: string }], "hint"?: string }`
//!
//! Any response may instead carry `{ "error": string }`, which short-circuits all
//! further handling of that response. Parsers here return `Ok(None)` for replies
//! that carry nothing applicable; per the error taxonomy those are silently
//! ignored rather than surfaced.

use crate::transport::TransportError;
use mathpad_core::{LineStatus, ValidatedWatermark};
use serde_json::Value;
use thiserror::Error;

/// A failed solver request.
#[derive(Debug, Error)]
pub enum SolverError {
    /// The remote call could not complete (network, timeout, non-2xx).
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The response parsed but carries an `error` field.
    #[error("solver reported an error: {0}")]
    Application(String),
}

/// One derivation step from a `step` or `answer` reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReply {
    /// The next derivation line to append, if the solver produced one.
    pub step: Option<String>,
    /// A hint accompanying the step.
    pub hint: Option<String>,
}

/// A parsed `answer` reply.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnswerReply {
    /// The remaining steps towards the final answer, in application order.
    pub steps: Vec<StepReply>,
    /// A trailing hint for the whole derivation.
    pub hint: Option<String>,
}

/// Extract the `error` field, if the reply carries one.
pub fn error_from_value(value: &Value) -> Option<&str> {
    value.get("error").and_then(Value::as_str)
}

/// Parse a `hint` reply. `Ok(None)` when no hint text is present.
pub fn hint_from_value(value: &Value) -> Option<String> {
    value
        .get("hint")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Parse a `step` reply.
pub fn step_from_value(value: &Value) -> StepReply {
    StepReply {
        step: value
            .get("step")
            .and_then(Value::as_str)
            .map(str::to_string),
        hint: hint_from_value(value),
    }
}

/// Parse a `validate` reply into a watermark.
///
/// Returns `None` when the reply carries no usable `validated` field or when a
/// status entry is outside the 0..3 verdict range (the whole reply is then
/// treated as malformed and ignored). A missing `status` array parses as empty:
/// older solver revisions report only the watermark, and validated lines without
/// a verdict entry count as correct.
pub fn watermark_from_value(value: &Value) -> Option<ValidatedWatermark> {
    let validated = value.get("validated")?.as_i64()?;
    // Line 0 is trivially valid, so the watermark is never meaningfully below 0.
    let validated = usize::try_from(validated).unwrap_or(0);

    let status = match value.get("status") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(entries)) => {
            let mut status = Vec::with_capacity(entries.len());
            for entry in entries {
                status.push(LineStatus::from_code(entry.as_u64()?)?);
            }
            status
        }
        Some(_) => return None,
    };

    Some(ValidatedWatermark { validated, status })
}

/// Parse an `answer` reply.
pub fn answer_from_value(value: &Value) -> AnswerReply {
    let steps = value
        .get("steps")
        .and_then(Value::as_array)
        .map(|entries| entries.iter().map(step_from_value).collect())
        .unwrap_or_default();

    AnswerReply {
        steps,
        hint: hint_from_value(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_field_is_detected() {
        let value = json!({ "error": "ParserError", "traceback": ["..."] });
        assert_eq!(error_from_value(&value), Some("ParserError"));
        assert_eq!(error_from_value(&json!({ "hint": "h" })), None);
    }

    #[test]
    fn hint_reply_parses() {
        assert_eq!(
            hint_from_value(&json!({ "hint": "Factor the numerator." })),
            Some("Factor the numerator.".to_string())
        );
        assert_eq!(hint_from_value(&json!({})), None);
    }

    #[test]
    fn step_reply_fields_are_independent() {
        let reply = step_from_value(&json!({ "step": "2 * x", "hint": "Derivative of x^2." }));
        assert_eq!(reply.step.as_deref(), Some("2 * x"));
        assert_eq!(reply.hint.as_deref(), Some("Derivative of x^2."));

        let reply = step_from_value(&json!({ "hint": "No further reduction is possible." }));
        assert_eq!(reply.step, None);
        assert!(reply.hint.is_some());
    }

    #[test]
    fn watermark_parses_status_codes() {
        let watermark = watermark_from_value(&json!({ "validated": 2, "status": [2, 1] })).unwrap();
        assert_eq!(watermark.validated, 2);
        assert_eq!(
            watermark.status,
            vec![LineStatus::Correct, LineStatus::NoProgress]
        );
    }

    #[test]
    fn watermark_without_status_array_parses_empty() {
        let watermark = watermark_from_value(&json!({ "validated": 1 })).unwrap();
        assert_eq!(watermark.validated, 1);
        assert!(watermark.status.is_empty());
    }

    #[test]
    fn out_of_range_status_code_rejects_the_reply() {
        assert_eq!(
            watermark_from_value(&json!({ "validated": 1, "status": [7] })),
            None
        );
        assert_eq!(watermark_from_value(&json!({ "status": [2] })), None);
    }

    #[test]
    fn negative_watermark_is_clamped() {
        let watermark = watermark_from_value(&json!({ "validated": -1 })).unwrap();
        assert_eq!(watermark.validated, 0);
    }

    #[test]
    fn answer_reply_collects_steps_in_order() {
        let reply = answer_from_value(&json!({
            "steps": [
                { "step": "2 * x", "hint": "Power rule." },
                { "step": "2" },
            ],
            "hint": "Done.",
        }));

        assert_eq!(reply.steps.len(), 2);
        assert_eq!(reply.steps[0].step.as_deref(), Some("2 * x"));
        assert_eq!(reply.steps[1].hint, None);
        assert_eq!(reply.hint.as_deref(), Some("Done."));
    }
}
