//! Recognized-text normalization.

/// Split recognized text into trimmed, non-empty lines, in original order.
pub fn normalize_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}
