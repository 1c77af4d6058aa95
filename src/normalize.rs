//! Column label normalization.
//!
//! Raw header labels become warehouse identifiers: surrounding whitespace trimmed, spaces and
//! hyphens replaced with `_`, lowercased. Labels that collide after normalization are kept as-is
//! (no deduplication).

/// Normalize a single column label.
pub fn normalize_column(raw: &str) -> String {
    raw.trim().replace([' ', '-'], "_").to_lowercase()
}

/// Normalize every label, preserving order and count.
pub fn normalize_columns<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    raw.iter().map(|c| normalize_column(c.as_ref())).collect()
}
