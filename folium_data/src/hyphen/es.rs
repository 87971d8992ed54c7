// Copyright 2025 the Folium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spanish patterns: consonant-vowel onsets, inseparable obstruent-liquid
//! clusters, and the digraphs `ch`, `ll`, `rr`.

use super::PatternSet;

pub(super) static ES: PatternSet = PatternSet {
    language: "es",
    extra_alphabet: "\u{E1}\u{E9}\u{ED}\u{F3}\u{FA}\u{FC}\u{F1}",
    patterns: &ES_PATTERNS,
};

#[rustfmt::skip]
static ES_PATTERNS: [&str; 138] = [
    "1ba", "1be", "1bi", "1bo", "1bu", "1b\u{E1}", "1b\u{ED}",
    "1ca", "1ce", "1ci", "1co", "1cu", "1c\u{E1}", "1c\u{ED}", "1c\u{F3}",
    "1da", "1de", "1di", "1do", "1du", "1d\u{E1}", "1d\u{ED}", "1d\u{F3}",
    "1fa", "1fe", "1fi", "1fo", "1fu",
    "1ga", "1ge", "1gi", "1go", "1gu",
    "1ja", "1je", "1ji", "1jo", "1ju",
    "1la", "1le", "1li", "1lo", "1lu", "1l\u{E1}", "1l\u{ED}",
    "1ma", "1me", "1mi", "1mo", "1mu", "1m\u{E1}", "1m\u{ED}",
    "1na", "1ne", "1ni", "1no", "1nu", "1n\u{E1}", "1n\u{ED}", "1n\u{F3}",
    "1pa", "1pe", "1pi", "1po", "1pu",
    "1ra", "1re", "1ri", "1ro", "1ru", "1r\u{E1}", "1r\u{ED}", "1r\u{F3}",
    "1sa", "1se", "1si", "1so", "1su", "1s\u{E1}", "1s\u{ED}",
    "1ta", "1te", "1ti", "1to", "1tu", "1t\u{E1}", "1t\u{ED}", "1t\u{F3}",
    "1va", "1ve", "1vi", "1vo", "1vu",
    "1ya", "1ye", "1yi", "1yo", "1yu",
    "1za", "1ze", "1zi", "1zo", "1zu",
    "1\u{F1}a", "1\u{F1}e", "1\u{F1}i", "1\u{F1}o", "1\u{F1}u",
    "1bl", "1br", "1cl", "1cr", "1dr", "1fl", "1fr", "1gl", "1gr", "1pl",
    "1pr", "1tr",
    "1ch", "1ll", "1rr",
    "b2l", "b2r", "c2h", "c2l", "c2r", "d2r", "f2l", "f2r", "g2l", "g2r",
    "l2l", "p2l", "p2r", "r2r", "t2r",
];
