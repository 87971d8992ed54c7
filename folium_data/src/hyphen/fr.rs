// Copyright 2025 the Folium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! French patterns: consonant-vowel onsets, inseparable obstruent-liquid
//! clusters, and the digraphs `ch`, `ph`, `th`, `gn`.

use super::PatternSet;

pub(super) static FR: PatternSet = PatternSet {
    language: "fr",
    extra_alphabet: "\u{E0}\u{E2}\u{E7}\u{E9}\u{E8}\u{EA}\u{EB}\u{EE}\u{EF}\u{F4}\u{F9}\u{FB}\u{FC}\u{153}",
    patterns: &FR_PATTERNS,
};

#[rustfmt::skip]
static FR_PATTERNS: [&str; 138] = [
    "1ba", "1be", "1bi", "1bo", "1bu", "1b\u{E9}", "1b\u{E8}",
    "1ca", "1ce", "1ci", "1co", "1cu", "1c\u{E9}", "1c\u{E8}", "1\u{E7}a",
    "1da", "1de", "1di", "1do", "1du", "1d\u{E9}", "1d\u{E8}",
    "1fa", "1fe", "1fi", "1fo", "1fu", "1f\u{E9}",
    "1ga", "1ge", "1gi", "1go", "1gu", "1g\u{E9}",
    "1ja", "1je", "1ji", "1jo", "1ju",
    "1la", "1le", "1li", "1lo", "1lu", "1l\u{E9}", "1l\u{E8}",
    "1ma", "1me", "1mi", "1mo", "1mu", "1m\u{E9}", "1m\u{E8}",
    "1na", "1ne", "1ni", "1no", "1nu", "1n\u{E9}", "1n\u{E8}",
    "1pa", "1pe", "1pi", "1po", "1pu", "1p\u{E9}", "1p\u{E8}",
    "1qa", "1qe", "1qi", "1qo", "1qu",
    "1ra", "1re", "1ri", "1ro", "1ru", "1r\u{E9}", "1r\u{E8}",
    "1sa", "1se", "1si", "1so", "1su", "1s\u{E9}", "1s\u{E8}",
    "1ta", "1te", "1ti", "1to", "1tu", "1t\u{E9}", "1t\u{E8}",
    "1va", "1ve", "1vi", "1vo", "1vu", "1v\u{E9}",
    "1za", "1ze", "1zi", "1zo", "1zu",
    "1bl", "1br", "1cl", "1cr", "1dr", "1fl", "1fr", "1gl", "1gr", "1pl",
    "1pr", "1tr", "1vr",
    "1ch", "1ph", "1th", "1gn",
    "b2l", "b2r", "c2h", "c2l", "c2r", "d2r", "f2l", "f2r", "g2l", "g2n",
    "g2r", "p2h", "p2l", "p2r", "t2h", "t2r", "v2r",
];
