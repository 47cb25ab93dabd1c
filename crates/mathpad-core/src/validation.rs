//! Mapping server validation verdicts onto line statuses.
//!
//! Validation is a prefix property: correctness can only be asserted contiguously
//! from the start of the derivation. The server reports a *watermark* — the line
//! index up to which the derivation has been validated — plus one verdict per
//! validated line. The status machine turns that into per-line annotations with a
//! single first-error boundary marker.

use crate::overlay::LineStatus;

/// A server-reported validation snapshot.
///
/// Replaced wholesale on every validate response; consumed read-only by
/// [`apply_validation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedWatermark {
    /// The line index up to which (inclusive) the derivation is validated.
    pub validated: usize,
    /// One verdict per validated line, offset by one: `status[i]` belongs to line
    /// `i + 1`. Line 0 has no entry since there is nothing to validate it against.
    /// Entries may be missing entirely (older servers report only the watermark);
    /// validated lines without an entry count as correct.
    pub status: Vec<LineStatus>,
}

/// Compute the per-line statuses implied by a watermark over `line_count` lines.
///
/// Transition rules, per line in order:
///
/// - line 0, if it exists: always [`LineStatus::Correct`] — the first line is
///   trivially valid since there is nothing to validate it against
/// - lines `1..=watermark.validated`: verdict taken from the status array
/// - the line immediately after the validated range: forced
///   [`LineStatus::Incorrect`] regardless of any array entry, marking where the
///   derivation currently breaks
/// - every line past that boundary: unset — unreached, unknown
///
/// Unless the whole buffer is validated (in which case no boundary marker is
/// placed), exactly one line carries the forced `Incorrect` marker.
pub fn apply_validation(
    line_count: usize,
    watermark: &ValidatedWatermark,
) -> Vec<Option<LineStatus>> {
    let mut statuses = vec![None; line_count];

    if line_count == 0 {
        return statuses;
    }

    statuses[0] = Some(LineStatus::Correct);

    let validated_end = watermark.validated.min(line_count - 1);
    for line in 1..=validated_end {
        let verdict = watermark
            .status
            .get(line - 1)
            .copied()
            .unwrap_or(LineStatus::Correct);
        statuses[line] = Some(verdict);
    }

    let boundary = watermark.validated.saturating_add(1);
    if boundary < line_count {
        statuses[boundary] = Some(LineStatus::Incorrect);
    }

    statuses
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_view_yields_no_statuses() {
        let watermark = ValidatedWatermark {
            validated: 0,
            status: Vec::new(),
        };
        assert!(apply_validation(0, &watermark).is_empty());
    }

    #[test]
    fn fully_validated_buffer_has_no_boundary_marker() {
        let watermark = ValidatedWatermark {
            validated: 2,
            status: vec![LineStatus::Correct, LineStatus::Correct],
        };
        let statuses = apply_validation(3, &watermark);
        assert_eq!(
            statuses,
            vec![
                Some(LineStatus::Correct),
                Some(LineStatus::Correct),
                Some(LineStatus::Correct),
            ]
        );
    }

    #[test]
    fn missing_status_entries_default_to_correct() {
        let watermark = ValidatedWatermark {
            validated: 2,
            status: Vec::new(),
        };
        let statuses = apply_validation(4, &watermark);
        assert_eq!(statuses[1], Some(LineStatus::Correct));
        assert_eq!(statuses[2], Some(LineStatus::Correct));
        assert_eq!(statuses[3], Some(LineStatus::Incorrect));
    }

    #[test]
    fn watermark_past_the_end_is_clamped() {
        let watermark = ValidatedWatermark {
            validated: 10,
            status: Vec::new(),
        };
        let statuses = apply_validation(2, &watermark);
        assert_eq!(statuses, vec![Some(LineStatus::Correct); 2]);
    }
}
