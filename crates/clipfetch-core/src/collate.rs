//! Locale-style label collation.
//!
//! Labels are compared level by level, each level only breaking ties left by
//! the one before:
//!
//! 1. **Primary**: base letters, ignoring case and diacritics. Spacing and
//!    punctuation sort before digits, digits before letters.
//! 2. **Secondary**: diacritics; an unaccented letter sorts before its
//!    accented forms.
//! 3. **Tertiary**: case, lowercase first.
//! 4. Code-point order of the original strings, so distinct labels never
//!    compare equal.
//!
//! ```rust
//! use std::cmp::Ordering;
//! use clipfetch_core::collate::compare;
//!
//! assert_eq!(compare("apple", "Banana"), Ordering::Less);
//! assert_eq!(compare("resume", "résumé"), Ordering::Less);
//! assert_eq!(compare("bruh", "Bruh"), Ordering::Less);
//! ```

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Compare two labels for display ordering.
pub fn compare(a: &str, b: &str) -> Ordering {
    let left = CollationKey::new(a);
    let right = CollationKey::new(b);
    left.primary
        .cmp(&right.primary)
        .then_with(|| left.secondary.cmp(&right.secondary))
        .then_with(|| left.tertiary.cmp(&right.tertiary))
        .then_with(|| a.cmp(b))
}

#[derive(Debug, Default)]
struct CollationKey {
    primary: Vec<(u8, char)>,
    secondary: Vec<String>,
    tertiary: Vec<u8>,
}

impl CollationKey {
    fn new(text: &str) -> Self {
        let mut key = Self::default();
        for ch in text.nfd() {
            if is_combining_mark(ch) {
                // A leading mark has no base letter to attach to.
                if let Some(marks) = key.secondary.last_mut() {
                    marks.push(ch);
                }
                continue;
            }
            let class = weight_class(ch);
            for lower in ch.to_lowercase() {
                key.primary.push((class, lower));
                key.secondary.push(String::new());
                key.tertiary.push(u8::from(ch.is_uppercase()));
            }
        }
        key
    }
}

fn weight_class(ch: char) -> u8 {
    if ch.is_alphabetic() {
        2
    } else if ch.is_numeric() {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(labels: &[&str]) -> Vec<String> {
        let mut out: Vec<String> = labels.iter().map(ToString::to_string).collect();
        out.sort_by(|a, b| compare(a, b));
        out
    }

    #[test]
    fn test_case_insensitive_primary() {
        assert_eq!(sorted(&["zebra", "Apple", "mango"]), ["Apple", "mango", "zebra"]);
    }

    #[test]
    fn test_lowercase_before_uppercase_on_tie() {
        assert_eq!(sorted(&["Bruh", "bruh"]), ["bruh", "Bruh"]);
    }

    #[test]
    fn test_diacritics_are_secondary() {
        assert_eq!(sorted(&["éclair", "ecole", "eclair"]), ["eclair", "éclair", "ecole"]);
        assert_eq!(compare("Émile", "emile"), Ordering::Greater);
    }

    #[test]
    fn test_precomposed_and_decomposed_tie_on_every_level() {
        let precomposed = "caf\u{e9}";
        let decomposed = "cafe\u{301}";
        let left = CollationKey::new(precomposed);
        let right = CollationKey::new(decomposed);
        assert_eq!(left.primary, right.primary);
        assert_eq!(left.secondary, right.secondary);
        assert_eq!(left.tertiary, right.tertiary);
    }

    #[test]
    fn test_digits_sort_lexically_before_letters() {
        assert_eq!(
            sorted(&["Test Sound 2", "Test Sound 10", "Test Sound A", "Test Sound 1"]),
            ["Test Sound 1", "Test Sound 10", "Test Sound 2", "Test Sound A"]
        );
    }

    #[test]
    fn test_punctuation_before_digits() {
        assert_eq!(sorted(&["a1", "a!", "ab"]), ["a!", "a1", "ab"]);
    }

    #[test]
    fn test_prefix_sorts_first() {
        assert_eq!(compare("wilhelm", "wilhelm scream"), Ordering::Less);
    }

    #[test]
    fn test_total_order_on_distinct_strings() {
        assert_ne!(compare("a\u{0}", "a\u{1}"), Ordering::Equal);
        assert_eq!(compare("same", "same"), Ordering::Equal);
    }
}
