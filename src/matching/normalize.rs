// Longest first, so "municipality" is not cut down by "mun".
const ADMINISTRATIVE_TOKENS: [&str; 7] = [
    "municipality",
    "nagarpalika",
    "gaunpalika",
    "district",
    "rural",
    "mun",
    "rm",
];

/// Lower-case `text` and drop every character that is not an ASCII letter or digit.
pub fn normalize_strict(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// [`normalize_strict`] with administrative suffixes removed. Removal repeats until nothing
/// changes ("rrmm" -> "rm" -> "").
pub fn normalize_place(text: &str) -> String {
    let mut normalized = normalize_strict(text);
    loop {
        let stripped = ADMINISTRATIVE_TOKENS
            .iter()
            .fold(normalized.clone(), |acc, token| acc.replace(token, ""));
        if stripped == normalized {
            return normalized;
        }
        normalized = stripped;
    }
}

/// Bidirectional containment of two normalized names. Empty names never match.
pub fn names_overlap(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}
