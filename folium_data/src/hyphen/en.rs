// Copyright 2025 the Folium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! English patterns, a curated subset of the standard American English set.

use super::PatternSet;

pub(super) static EN: PatternSet = PatternSet {
    language: "en",
    extra_alphabet: "",
    patterns: &EN_PATTERNS,
};

#[rustfmt::skip]
static EN_PATTERNS: [&str; 190] = [
    ".an3te", ".anti5s", ".as1p", ".as3c", ".be3sm", ".ca4t", ".ch4", ".co3e",
    ".de3o", ".de3ra", ".de3ri", ".des4c", ".dictio5", ".el3em", ".en3g",
    ".en3s", ".eu3", ".for5mer", ".ge5og", ".han5k", ".he2", ".hero5i",
    ".hon3o", ".im3m", ".in1", ".in3ci", ".in3s", ".ir5r", ".le2", ".mag5a5",
    ".mer3c", ".mis1", ".mon3e", ".of5te", ".or3c", ".or1d", ".os3", ".out3",
    ".pe5tit", ".pre3m", ".ra4c", ".ran4t", ".re5mit", ".res2", ".re5stat",
    ".rit5u", ".sci3e", ".self5", ".sh2", ".sing4", ".st4", ".th2", ".ti2",
    ".un1a", ".un3ce", ".under5", ".un1e", ".un5k", ".un5o", ".un3u", ".up3",
    ".ve5ra",
    "a1b", "a1ce", "a1cl", "4ade", "a1di", "a1do", "ag1n", "a1j", "a1la",
    "a1le", "a1lo", "a1lu", "a1ma", "a1me", "a1mi", "a1mo", "an1a", "an1e",
    "a1pe", "a1po", "a1ri", "a1ro", "a1ru", "a1si", "a1so", "a1ta", "a1te",
    "a1ti", "a1to", "a1tu", "a1va", "a1vi", "a1vo",
    "4ch.", "4ck.", "4ct.", "c1q",
    "e1ba", "e1be", "e1bi", "e1co", "e1cu", "e1da", "e1de", "e1di", "e1du",
    "e1fe", "e1fi", "e1la", "e1le", "e1li", "e1lo", "e1lu", "e1ma", "e1me",
    "e1mi", "e1mo", "e1ne", "e1ni", "e1no", "e1nu", "e1pa", "e1pe", "e1pi",
    "e1po", "e1ra", "e1ri", "e1ro", "e1ru", "e1si", "e1so", "e1ta", "e1te",
    "e1ti", "e1to", "e1va", "e1vi",
    "he2n", "hena4", "hen5at", "hy3ph",
    "2io", "4m1p", "1na", "n2at",
    "o1be", "o1bi", "o1ca", "o1cu", "o1di", "o1ga", "o1ge", "o1gi", "o1la",
    "o1le", "o1li", "o1lo", "o1ma", "o1me", "o1mi", "o1mo", "o2n", "o1pe",
    "o1pi", "o1ra", "o1ri", "o1ro", "o1si", "o1so", "o1ta", "o1te", "o1ti",
    "o1to", "o1va", "o1vi",
    "pu2t", "5pute", "put3er",
    "1tio", "2tl", "u1ra", "u1ri", "u1ro", "u1si", "u1ta", "u1te", "u1ti",
    "u1to",
];
