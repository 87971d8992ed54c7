// Copyright 2025 the Folium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! German patterns: prefix breaks, consonant-vowel onsets, and the
//! inseparable clusters of the 1996 orthography (`sch`, `ck` kept whole).

use super::PatternSet;

pub(super) static DE: PatternSet = PatternSet {
    language: "de",
    extra_alphabet: "\u{E4}\u{F6}\u{FC}\u{DF}",
    patterns: &DE_PATTERNS,
};

#[rustfmt::skip]
static DE_PATTERNS: [&str; 116] = [
    ".ab1", ".an1", ".auf1", ".aus1", ".bei1", ".ein1", ".mit1", ".nach1",
    ".un1", ".ver1", ".vor1", ".zer1", ".zu1",
    "1ba", "1be", "1bi", "1bo", "1bu", "1b\u{E4}", "1b\u{FC}",
    "1da", "1de", "1di", "1do", "1du", "1d\u{E4}", "1d\u{FC}",
    "1fa", "1fe", "1fi", "1fo", "1fu", "1f\u{E4}", "1f\u{F6}",
    "1ga", "1ge", "1gi", "1go", "1gu", "1g\u{E4}", "1g\u{F6}",
    "1ha", "1he", "1hi", "1ho", "1hu", "1h\u{E4}", "1h\u{F6}",
    "1ka", "1ke", "1ki", "1ko", "1ku", "1k\u{E4}", "1k\u{F6}",
    "1la", "1le", "1li", "1lo", "1lu", "1l\u{E4}", "1l\u{F6}",
    "1ma", "1me", "1mi", "1mo", "1mu", "1m\u{E4}", "1m\u{FC}",
    "1na", "1ne", "1ni", "1no", "1nu", "1n\u{E4}", "1n\u{FC}",
    "1pa", "1pe", "1pi", "1po", "1pu",
    "1ra", "1re", "1ri", "1ro", "1ru", "1r\u{E4}", "1r\u{FC}",
    "1sa", "1se", "1si", "1so", "1su",
    "1ta", "1te", "1ti", "1to", "1tu", "1t\u{E4}", "1t\u{FC}",
    "1wa", "1we", "1wi", "1wo",
    "1za", "1ze", "1zi", "1zo", "1zu",
    "1ch", "1ck", "1sch", "s2ch", "c2h", "c2k", "2st",
];
