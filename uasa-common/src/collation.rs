//! Locale-aware name ordering for rosters
//!
//! Three comparison levels, each consulted only when the previous one ties:
//! 1. primary: base letters, case-folded, diacritics removed
//! 2. secondary: diacritics (unaccented first)
//! 3. tertiary: case (lowercase first)
//!
//! Raw code-point order breaks the final tie so the ordering is total.

use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Precomputed sort key for a name
///
/// Field order matters: the derived `Ord` compares fields top to bottom.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollationKey {
    primary: Vec<char>,
    secondary: Vec<String>,
    tertiary: Vec<u8>,
    raw: String,
}

impl CollationKey {
    pub fn new(s: &str) -> Self {
        let mut primary = Vec::with_capacity(s.len());
        let mut secondary: Vec<String> = Vec::with_capacity(s.len());
        let mut tertiary = Vec::with_capacity(s.len());

        for c in s.nfd() {
            if is_combining_mark(c) {
                // Attach the mark to the preceding base character
                match secondary.last_mut() {
                    Some(marks) => marks.push(c),
                    None => secondary.push(c.to_string()),
                }
                continue;
            }

            primary.extend(c.to_lowercase());
            secondary.push(String::new());
            tertiary.push(u8::from(c.is_uppercase()));
        }

        Self {
            primary,
            secondary,
            tertiary,
            raw: s.to_string(),
        }
    }
}

/// Compare two names by collation order
pub fn compare(a: &str, b: &str) -> Ordering {
    CollationKey::new(a).cmp(&CollationKey::new(b))
}
