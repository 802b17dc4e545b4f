//! Predefined character classes usable as data keys in templates.

use std::collections::HashMap;

/// Field key to field value mapping consumed by data-driven elements.
pub type DataMap = HashMap<String, String>;

/// Vowels.
pub const VOWELS: &str = "aeiou";
/// Consonants.
pub const CONSONANTS: &str = "bcdfghjklmnpqrstvwxyz";
/// Decimal digits.
pub const DIGITS: &str = "0123456789";
/// Lower case latin letters.
pub const LETTERS: &str = "abcdefghijklmnopqrstuvwxyz";

const CLASSES: [(&str, &str); 4] = [("V", VOWELS), ("C", CONSONANTS), ("N", DIGITS), ("L", LETTERS)];

/// Returns the predefined character classes keyed as `prefix + code`.
pub fn predefined_data(prefix: &str) -> DataMap {
    CLASSES
        .iter()
        .map(|(code, pool)| (format!("{prefix}{code}"), pool.to_string()))
        .collect()
}

/// Same as [`predefined_data`] with an empty prefix.
pub fn predefined_data_unprefixed() -> DataMap {
    predefined_data("")
}
