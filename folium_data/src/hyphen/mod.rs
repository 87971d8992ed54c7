// Copyright 2025 the Folium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Liang hyphenation pattern sets.
//!
//! Patterns use the TeX notation: lowercase letters with interleaved digits
//! (odd digits permit a break, even digits forbid one) and `.` anchoring a
//! pattern to a word boundary. The English set is a curated subset of the
//! standard American English patterns; the German, French and Spanish sets
//! are compact rule-based sets built around each language's
//! consonant-vowel onset rules, inseparable digraphs and prefix breaks.

mod de;
mod en;
mod es;
mod fr;

/// A pattern set for one language.
#[derive(Debug, Clone, Copy)]
pub struct PatternSet {
    /// Lowercase ISO 639-1 code.
    pub language: &'static str,
    /// Letters beyond ASCII `a`-`z` that belong to the language's alphabet.
    pub extra_alphabet: &'static str,
    /// Patterns in TeX notation.
    pub patterns: &'static [&'static str],
}

pub static PATTERN_SETS: [&PatternSet; 4] = [&en::EN, &de::DE, &fr::FR, &es::ES];

/// Returns the pattern set for a language code (`en`, `en-US`, `de`, ...).
pub fn for_language(language: &str) -> Option<&'static PatternSet> {
    let primary = language.split(['-', '_']).next().unwrap_or(language);
    PATTERN_SETS
        .iter()
        .find(|set| set.language.eq_ignore_ascii_case(primary))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_lookup() {
        assert_eq!(for_language("en").unwrap().language, "en");
        assert_eq!(for_language("en-US").unwrap().language, "en");
        assert_eq!(for_language("de_DE").unwrap().language, "de");
        assert!(for_language("th").is_none());
    }

    #[test]
    fn patterns_are_well_formed() {
        for set in PATTERN_SETS {
            for pattern in set.patterns {
                assert!(!pattern.is_empty());
                for ch in pattern.chars() {
                    let ok = ch == '.'
                        || ch.is_ascii_digit()
                        || ch.is_ascii_lowercase()
                        || set.extra_alphabet.contains(ch);
                    assert!(ok, "bad character {ch:?} in pattern {pattern:?}");
                }
            }
        }
    }
}
