//! Tag lists (user interests, property amenities) are stored as one
//! comma-delimited column and exposed as `Vec<String>` everywhere else.

const DELIMITER: char = ',';

/// Trims every tag and drops the ones left empty. Order is preserved.
pub fn normalize_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    tags.iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Renders tags for storage. An empty list is stored as NULL.
pub fn join_tags<S: AsRef<str>>(tags: &[S]) -> Option<String> {
    let tags = normalize_tags(tags);
    if tags.is_empty() {
        None
    } else {
        Some(tags.join(&DELIMITER.to_string()))
    }
}

/// Parses a stored column back into tags. NULL and blank read as no tags.
pub fn split_tags(stored: Option<&str>) -> Vec<String> {
    match stored {
        Some(s) => normalize_tags(&s.split(DELIMITER).collect::<Vec<_>>()),
        None => Vec::new(),
    }
}
