// File: src/text/script.rs

use super::label::LanguageLabel;

/// Hebrew Unicode block, U+0590..=U+05FF.
#[must_use]
pub const fn is_hebrew_char(ch: char) -> bool {
    matches!(ch, '\u{0590}'..='\u{05FF}')
}

#[must_use]
pub const fn is_latin_letter(ch: char) -> bool {
    ch.is_ascii_alphabetic()
}

/// Counts `(hebrew, latin)` code points. Digits, punctuation and
/// whitespace land in neither bucket.
#[must_use]
pub fn script_counts(text: &str) -> (usize, usize) {
    let mut heb = 0usize;
    let mut lat = 0usize;
    for ch in text.chars() {
        if is_hebrew_char(ch) {
            heb += 1;
        } else if is_latin_letter(ch) {
            lat += 1;
        }
    }
    (heb, lat)
}

/// Classifies a text sample by script balance.
///
/// Returns `None` when the sample carries no Hebrew and no Latin letters.
/// Hebrew wins only with a strictly larger count, so ties resolve to English.
#[must_use]
pub fn classify(text: &str) -> Option<LanguageLabel> {
    let (heb, lat) = script_counts(text);
    match (heb, lat) {
        (0, 0) => None,
        (h, l) if h > l => Some(LanguageLabel::Hebrew),
        _ => Some(LanguageLabel::English),
    }
}
