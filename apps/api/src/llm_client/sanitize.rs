//! Output Sanitizer: recovers a structured payload from raw model text.
//!
//! Models often wrap structured output in markdown fences, sometimes with a
//! language tag or a bare `json` label. This strips those wrappers only; it does
//! not check that what remains is valid JSON.

const FENCE: &str = "```";

/// The structured format a caller expects back from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
}

impl OutputFormat {
    fn label(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
        }
    }
}

/// Strips code fences, format labels and surrounding whitespace from `raw`.
///
/// Idempotent: the result never starts with a label or contains a fence, so
/// sanitizing it again changes nothing.
pub fn sanitize(raw: &str, format: OutputFormat) -> String {
    let text = raw.trim();
    let mut body = fenced_body(text).unwrap_or(text).trim();
    // Labels can repeat, as in `json json [1]`.
    loop {
        let stripped = strip_label(body, format.label()).trim();
        if stripped == body {
            break;
        }
        body = stripped;
    }
    body.to_string()
}

/// Returns the contents of the first fenced block, if `text` contains one.
/// The info string after the opening fence (e.g. `json`) is dropped; an
/// unterminated fence runs to the end of the text.
fn fenced_body(text: &str) -> Option<&str> {
    let start = text.find(FENCE)? + FENCE.len();
    let after_open = &text[start..];
    let body = match after_open.find('\n') {
        Some(newline) if is_info_string(&after_open[..newline]) => &after_open[newline + 1..],
        _ => after_open,
    };
    Some(match body.find(FENCE) {
        Some(end) => &body[..end],
        None => body,
    })
}

/// An info string is a single word such as `json` or `JSON`, not payload.
fn is_info_string(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && line.chars().all(is_info_char)
}

fn is_info_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Drops a leading format label such as `json`, `JSON:` or `json\n`.
fn strip_label<'a>(text: &'a str, label: &str) -> &'a str {
    let Some(prefix) = text.get(..label.len()) else {
        return text;
    };
    if !prefix.eq_ignore_ascii_case(label) {
        return text;
    }
    let rest = &text[label.len()..];
    match rest.chars().next() {
        Some(':') => &rest[1..],
        Some(c) if c.is_whitespace() => rest,
        // Part of a longer word, or the label alone.
        _ => text,
    }
}
