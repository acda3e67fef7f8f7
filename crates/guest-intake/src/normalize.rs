//! Text normalization shared by every pattern catalogue in this crate.
//!
//! All matching operates on the normalized form: lower-case, the fixed
//! Spanish vowel/ñ diacritic set stripped, whitespace collapsed to single
//! spaces.

/// Normalize a raw guest message for pattern matching.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        out.push(match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' => 'u',
            'ñ' => 'n',
            other => other,
        });
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
