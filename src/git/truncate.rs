//! Line-based truncation of diff text.

/// Bound `text` to `max_lines` lines, appending a marker when lines were dropped.
///
/// A `max_lines` of zero or less disables the limit. A trailing newline does not
/// count as an extra line. The marker reports the bound that was applied, so the
/// result is stable under repeated truncation with the same bound.
pub fn truncate_lines(text: &str, max_lines: i64) -> String {
    if max_lines <= 0 {
        return text.to_string();
    }

    let limit = usize::try_from(max_lines).unwrap_or(usize::MAX);
    if text.split_terminator('\n').count() <= limit {
        return text.to_string();
    }

    let kept: Vec<&str> = text.split_terminator('\n').take(limit).collect();
    format!(
        "{}\n\n[... diff truncated at {} lines ...]",
        kept.join("\n"),
        max_lines
    )
}
