//! Transliteration of Ukrainian file names into a normalized ASCII form.
//!
//! Only the part of a name before its first `.` is rewritten. Every letter of
//! the Ukrainian alphabet (either case) is replaced by its Latin spelling, and
//! anything that is still not an ASCII letter, digit or underscore becomes `_`.
//! Everything after the first `.` is kept verbatim.
//!
//! # Examples
//!
//! ```
//! use clean_folder::transliterate::normalize;
//!
//! assert_eq!(normalize("Привіт.txt"), "Pryvit.txt");
//! assert_eq!(normalize("a b.tar.gz"), "a_b.tar.gz");
//! assert_eq!(normalize("noext"), "noext");
//! ```
use std::collections::HashMap;
use std::sync::LazyLock;

/// Source alphabet, lowercase. Uppercase forms are derived.
const UKRAINIAN_ALPHABET: &str = "абвгдеєжзиіїйклмнопрстуфхцчшщьюя";

/// Latin spelling for each letter of [`UKRAINIAN_ALPHABET`], in the same order.
const LATIN_SPELLING: [&str; 32] = [
    "a", "b", "v", "g", "d", "e", "je", "zh", "z", "y", "i", "ji", "j", "k", "l", "m", "n", "o",
    "p", "r", "s", "t", "u", "f", "h", "ts", "ch", "sh", "sch", "", "ju", "ja",
];

static TRANSLATION: LazyLock<TranslationTable> = LazyLock::new(TranslationTable::new);

/// Character-to-ASCII mapping for the Ukrainian alphabet.
///
/// Lowercase letters map to lowercase spellings and uppercase letters map to
/// the fully uppercased spelling (`Є` becomes `JE`).
#[derive(Debug, Clone)]
pub struct TranslationTable {
    map: HashMap<char, String>,
}

impl TranslationTable {
    /// Builds the table for both cases of every letter in the alphabet.
    pub fn new() -> Self {
        let mut map = HashMap::with_capacity(UKRAINIAN_ALPHABET.chars().count() * 2);
        for (letter, latin) in UKRAINIAN_ALPHABET.chars().zip(LATIN_SPELLING) {
            map.insert(letter, latin.to_string());
            for upper in letter.to_uppercase() {
                map.insert(upper, latin.to_uppercase());
            }
        }
        Self { map }
    }

    /// Returns the Latin spelling of `c`, or `None` when `c` is outside the alphabet.
    pub fn get(&self, c: char) -> Option<&str> {
        self.map.get(&c).map(String::as_str)
    }

    /// Transliterates `text` and replaces every remaining non-word character with `_`.
    pub fn transliterate(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            match self.get(c) {
                Some(latin) => out.push_str(latin),
                None if c.is_ascii_alphanumeric() || c == '_' => out.push(c),
                None => out.push('_'),
            }
        }
        out
    }
}

impl Default for TranslationTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalizes a file name.
///
/// The name is split on its first `.`: the base is transliterated and
/// sanitized, the remaining dot-separated segments are appended unchanged. A
/// name without any `.` yields just the normalized base, with no trailing dot.
pub fn normalize(name: &str) -> String {
    match name.split_once('.') {
        Some((base, extension)) => {
            format!("{}.{}", TRANSLATION.transliterate(base), extension)
        }
        None => TRANSLATION.transliterate(name),
    }
}
