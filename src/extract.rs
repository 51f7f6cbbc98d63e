//! Best-effort isolation of a JSON array inside free-form model output.
//!
//! Grounded responses interleave prose, markdown fencing, and bracketed
//! citation markers (`[1]`, `[2]`) with the JSON payload. This module slices
//! out the array without ever failing: when nothing array-shaped can be
//! found, the result is the empty-array literal `[]`.

use std::sync::OnceLock;

use regex::Regex;

fn fence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").expect("fence regex is valid")
    })
}

/// Extract a JSON array substring from `text`.
///
/// Ordered attempts, first success wins:
/// 1. If a fenced code block is present, search inside it.
/// 2. Anchor on the first `[` whose next non-whitespace character is `{`.
///    Citation markers like `[1]` never match this anchor.
/// 3. Slice from the anchor to the last `]` in the text.
/// 4. Without an anchor, use the outermost bracket pair only when its
///    interior holds both `{` and `}`; else wrap a single bare object in
///    brackets; else return `[]`.
/// 5. Repair trailing commas before `}` / `]` in the returned slice.
///
/// Idempotent on already-clean array text.
pub fn extract_json_array(text: &str) -> String {
    let search = match fence_regex().captures(text) {
        Some(captures) => captures.get(1).map(|m| m.as_str()).unwrap_or(text),
        None => text,
    };

    if let Some(start) = object_array_anchor(search) {
        if let Some(end) = search.rfind(']') {
            if end > start {
                return strip_trailing_commas(&search[start..=end]);
            }
        }
    }

    let trimmed = search.trim();
    if let (Some(start), Some(end)) = (search.find('['), search.rfind(']')) {
        if end > start {
            let interior = &search[start + 1..end];
            if interior.contains('{') && interior.contains('}') {
                return strip_trailing_commas(&search[start..=end]);
            }
        }
    }
    if trimmed.starts_with('{') {
        return strip_trailing_commas(&format!("[{trimmed}]"));
    }

    "[]".to_string()
}

/// First `[` immediately followed (ignoring whitespace) by `{`.
fn object_array_anchor(text: &str) -> Option<usize> {
    for (i, c) in text.char_indices() {
        if c != '[' {
            continue;
        }
        let next = text[i + 1..].chars().find(|c| !c.is_whitespace());
        if next == Some('{') {
            return Some(i);
        }
    }
    None
}

/// Remove commas that directly precede a closing brace or bracket, skipping
/// string literals so embedded text like `"a,]"` is left alone.
///
/// A comma (plus any following whitespace) is held back until the next
/// significant character decides whether it was trailing.
fn strip_trailing_commas(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut held: Option<String> = None;

    for c in input.chars() {
        if in_string {
            output.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            ',' => {
                if let Some(pending) = held.take() {
                    output.push_str(&pending);
                }
                held = Some(",".to_string());
            }
            ']' | '}' => {
                // Whatever was held was a trailing comma: drop it.
                held = None;
                output.push(c);
            }
            c if c.is_whitespace() => match held {
                Some(ref mut pending) => pending.push(c),
                None => output.push(c),
            },
            _ => {
                if let Some(pending) = held.take() {
                    output.push_str(&pending);
                }
                output.push(c);
                if c == '"' {
                    in_string = true;
                }
            }
        }
    }

    if let Some(pending) = held {
        output.push_str(&pending);
    }
    output
}
