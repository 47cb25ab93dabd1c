//! Logical line extraction.
//!
//! The editing surface owns a single newline-delimited buffer. The engine only ever
//! sees its *logical lines*: the non-empty lines, in order, with surrounding
//! whitespace intact but blank lines dropped. Blank lines are never counted and
//! never rendered, so typing a trailing newline does not disturb the rendered view.

/// Split a raw buffer into its logical lines.
///
/// Lines whose trimmed form is empty are dropped; the relative order of the
/// remaining lines is preserved. An empty buffer yields an empty sequence.
///
/// The returned slices borrow from `buffer` and are *not* trimmed: rendering
/// works on the line text exactly as typed.
///
/// # Example
///
/// ```rust
/// use mathpad_core::logical_lines;
///
/// assert_eq!(logical_lines("x ^ 2\n\n2 * x\n"), vec!["x ^ 2", "2 * x"]);
/// assert_eq!(logical_lines("  \n\n"), Vec::<&str>::new());
/// ```
pub fn logical_lines(buffer: &str) -> Vec<&str> {
    buffer
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .collect()
}

/// Return the last logical line of the buffer, if any.
///
/// Remote solvers operate on the most recent derivation step; request
/// preconditions use this to detect an effectively empty buffer.
pub fn last_logical_line(buffer: &str) -> Option<&str> {
    buffer.rsplit('\n').find(|line| !line.trim().is_empty())
}
