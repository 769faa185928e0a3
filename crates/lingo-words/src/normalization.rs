//! Canonical form of word text before it is stored or looked up.
//!
//! The unique constraint on `(word, language_id)` compares bytes, so the same
//! word typed with a precomposed `é` and with `e` + combining accent would
//! otherwise be stored twice.

use unicode_normalization::UnicodeNormalization;

/// Canonicalise word text:
/// 1. Unicode NFC composition
/// 2. Collapse and trim whitespace
///
/// Case and accents are kept: `"Casa"` and `"casa"`, or `"esta"` and `"está"`,
/// are different entries.
pub fn canonical_word(s: &str) -> String {
    s.nfc()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// NFC-compose a text body so the words indexed from it compare equal to
/// canonical word text. Layout and whitespace are left as written.
pub fn canonical_text(s: &str) -> String {
    s.nfc().collect()
}
