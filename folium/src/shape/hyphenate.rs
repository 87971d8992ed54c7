// Copyright 2025 the Folium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Liang's pattern-based hyphenation.
//!
//! Patterns come from `folium_data` in TeX notation. A pattern contributes
//! its digit values to the inter-letter boundaries it matches; after all
//! patterns are applied, odd boundary values permit a break.

use folium_data::hyphen::PatternSet;
use hashbrown::HashMap;

/// A compiled pattern set for one language.
pub(crate) struct Hyphenator {
    /// Letter sequence (with `.` word anchors) to boundary values. The
    /// value vector has one entry per boundary, `letters + 1` in total.
    patterns: HashMap<Box<str>, Box<[u8]>>,
    max_pattern_chars: usize,
    extra_alphabet: &'static str,
}

impl Hyphenator {
    pub(crate) fn compile(set: &PatternSet) -> Self {
        let mut patterns = HashMap::with_capacity(set.patterns.len());
        let mut max_pattern_chars = 0;
        for pattern in set.patterns {
            let mut letters = String::new();
            let mut values: Vec<u8> = vec![0];
            for ch in pattern.chars() {
                if let Some(digit) = ch.to_digit(10) {
                    *values.last_mut().unwrap() = digit as u8;
                } else {
                    letters.push(ch);
                    values.push(0);
                }
            }
            max_pattern_chars = max_pattern_chars.max(letters.chars().count());
            // Distinct patterns may share a letter sequence (`1bl` and
            // `b2l`); their boundary values merge by maximum.
            match patterns.entry(letters.into_boxed_str()) {
                hashbrown::hash_map::Entry::Occupied(mut slot) => {
                    let merged: &mut Box<[u8]> = slot.get_mut();
                    for (old, new) in merged.iter_mut().zip(values.iter()) {
                        *old = (*old).max(*new);
                    }
                }
                hashbrown::hash_map::Entry::Vacant(slot) => {
                    slot.insert(values.into_boxed_slice());
                }
            }
        }
        Self {
            patterns,
            max_pattern_chars,
            extra_alphabet: set.extra_alphabet,
        }
    }

    fn in_alphabet(&self, ch: char) -> bool {
        ch.is_ascii_lowercase() || self.extra_alphabet.contains(ch)
    }

    /// Returns the character positions inside `word` where a soft hyphen may
    /// be inserted, respecting the minimum left and right fragment sizes.
    /// Words containing characters outside the language's alphabet yield no
    /// break positions.
    pub(crate) fn hyphenate(
        &self,
        word: &str,
        min_left: usize,
        min_right: usize,
    ) -> Vec<usize> {
        let chars: Vec<char> = word
            .chars()
            .map(|ch| ch.to_lowercase().next().unwrap_or(ch))
            .collect();
        let n = chars.len();
        if n < min_left + min_right || n < 2 {
            return Vec::new();
        }
        if chars.iter().any(|&ch| !self.in_alphabet(ch)) {
            return Vec::new();
        }

        // Dotted word: anchors at both ends.
        let mut dotted = Vec::with_capacity(n + 2);
        dotted.push('.');
        dotted.extend_from_slice(&chars);
        dotted.push('.');
        let m = dotted.len();

        let mut boundaries = vec![0u8; m + 1];
        let mut key = String::new();
        for start in 0..m {
            key.clear();
            for (offset, &ch) in dotted[start..m.min(start + self.max_pattern_chars)]
                .iter()
                .enumerate()
            {
                key.push(ch);
                if let Some(values) = self.patterns.get(key.as_str()) {
                    debug_assert_eq!(values.len(), offset + 2);
                    for (k, &value) in values.iter().enumerate() {
                        let slot = &mut boundaries[start + k];
                        *slot = (*slot).max(value);
                    }
                }
            }
        }

        // Boundary between word characters j-1 and j is `boundaries[j + 1]`.
        (1..n)
            .filter(|&j| j >= min_left && j + min_right <= n)
            .filter(|&j| boundaries[j + 1] % 2 == 1)
            .collect()
    }
}
