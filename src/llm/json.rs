//! JSON extraction from model output.
//!
//! Models are asked for bare JSON but frequently wrap it in a markdown fence or
//! add a sentence before or after it. [`extract_json`] recovers the object so the
//! caller can hand it to serde.

use serde::de::IgnoredAny;

/// Extract the JSON object embedded in a model response.
///
/// Tries a fenced code block first (with or without a `json` tag), then the
/// first balanced `{...}` span that parses as JSON. Falls back to the trimmed
/// input so the caller's parse error shows what the model actually said.
pub fn extract_json(response: &str) -> String {
    let trimmed = response.trim();

    if let Some(inner) = fenced_block(trimmed)
        && (inner.is_empty() || inner.starts_with('{'))
    {
        return inner.to_string();
    }

    if let Some(object) = first_json_object(trimmed) {
        return object.to_string();
    }

    trimmed.to_string()
}

/// Contents of the first markdown code fence, without its info string.
fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after_ticks = &text[start + 3..];

    // Skip the info string ("json", "JSON", ...) up to the end of the line
    let body_start = match after_ticks.find('\n') {
        Some(nl) if !after_ticks[..nl].contains('{') => nl + 1,
        _ => 0,
    };
    let body = &after_ticks[body_start..];

    let end = body.find("```")?;
    Some(body[..end].trim())
}

/// First `{...}` span with balanced braces that is valid JSON.
///
/// Brace counting ignores braces inside string literals, including escaped
/// quotes, so `{"msg": "use { and } carefully"}` is one object.
fn first_json_object(text: &str) -> Option<&str> {
    for (start, _) in text.match_indices('{') {
        if let Some(end) = balanced_end(&text[start..]) {
            let candidate = &text[start..start + end];
            if serde_json::from_str::<IgnoredAny>(candidate).is_ok() {
                return Some(candidate);
            }
        }
    }

    None
}

/// Byte length of the balanced-brace prefix of `text`, which starts with `{`.
fn balanced_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (idx, ch) in text.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx + 1);
                }
            }
            _ => {}
        }
    }

    None
}
