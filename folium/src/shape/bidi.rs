// Copyright 2025 the Folium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Unicode bidirectional algorithm.
//!
//! Implements UAX#9 to the level the engine needs: explicit embeddings,
//! overrides and isolates (X1-X8), weak-type resolution (W1-W7), best-effort
//! paired brackets (N0), neutral resolution (N1-N2) and implicit levels
//! (I1-I2). Resolution works on level runs with start/end-of-sequence types
//! taken from the adjacent levels.

use folium_data::bidi_class::{bidi_class, bracket_info, canonical_bracket, BidiClass};
use smallvec::SmallVec;

use crate::style::Direction;

use BidiClass::*;

/// Maximum embedding depth per UAX#9.
const MAX_DEPTH: u8 = 125;
/// Maximum bracket pairs resolved per level run.
const MAX_PAIRS: usize = 63;

/// One run of characters sharing an embedding level, in visual order
/// position but logical character order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualRun {
    /// Logical index (in characters) of the first character.
    pub start: usize,
    /// Length in characters.
    pub len: usize,
    /// Resolved embedding level.
    pub level: u8,
}

impl VisualRun {
    pub fn direction(&self) -> Direction {
        if self.level & 1 == 1 {
            Direction::Rtl
        } else {
            Direction::Ltr
        }
    }
}

fn is_removed_by_x9(class: BidiClass) -> bool {
    matches!(class, Bn | Lre | Rle | Lro | Rlo | Pdf)
}

fn is_isolate_initiator(class: BidiClass) -> bool {
    matches!(class, Lri | Rli | Fsi)
}

fn is_neutral(class: BidiClass) -> bool {
    matches!(class, B | S | Ws | On | Pdi) || is_isolate_initiator(class)
}

fn is_strong(class: BidiClass) -> bool {
    matches!(class, L | R | Al)
}

/// Resolver for the bidirectional algorithm. Reusable across paragraphs.
#[derive(Default)]
pub(crate) struct BidiResolver {
    chars: Vec<char>,
    initial: Vec<BidiClass>,
    types: Vec<BidiClass>,
    levels: Vec<u8>,
    base_level: u8,
}

impl BidiResolver {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn base_level(&self) -> u8 {
        self.base_level
    }

    /// Resolved embedding level per character of the paragraph.
    pub(crate) fn levels(&self) -> &[u8] {
        &self.levels
    }

    fn clear(&mut self) {
        self.chars.clear();
        self.initial.clear();
        self.types.clear();
        self.levels.clear();
        self.base_level = 0;
    }

    /// Resolves levels for `text`. `base_level` pins the paragraph
    /// direction; `None` derives it from the first strong character (P2/P3).
    pub(crate) fn resolve(&mut self, text: &str, base_level: Option<u8>) {
        self.clear();
        for ch in text.chars() {
            self.chars.push(ch);
            self.initial.push(bidi_class(ch));
        }
        self.base_level = match base_level {
            Some(level) => level & 1,
            None => default_level(&self.initial),
        };
        let needs_resolution = self
            .initial
            .iter()
            .any(|&t| matches!(t, R | Al | An | Lre | Rle | Lro | Rlo | Lri | Rli | Fsi));
        if !needs_resolution && self.base_level == 0 {
            self.levels.resize(self.initial.len(), 0);
            return;
        }

        self.resolve_explicit();
        self.resolve_runs();
        self.apply_l1();
    }

    /// X1-X8: explicit embeddings, overrides, isolates.
    fn resolve_explicit(&mut self) {
        #[derive(Clone, Copy)]
        struct StackEntry {
            level: u8,
            override_class: Option<BidiClass>,
            isolate: bool,
        }
        let mut stack: SmallVec<[StackEntry; 8]> = SmallVec::new();
        stack.push(StackEntry {
            level: self.base_level,
            override_class: None,
            isolate: false,
        });
        let mut overflow_isolates = 0usize;
        let mut overflow_embeddings = 0usize;
        let mut valid_isolates = 0usize;

        self.types.extend_from_slice(&self.initial);
        self.levels.resize(self.initial.len(), self.base_level);

        for i in 0..self.initial.len() {
            let class = self.initial[i];
            let top = *stack.last().unwrap();
            match class {
                Rle | Lre | Rlo | Lro | Rli | Lri | Fsi => {
                    let rtl = match class {
                        Rle | Rlo | Rli => true,
                        Fsi => {
                            // Direction of the isolate from its first strong
                            // character, scanning to the matching PDI.
                            let mut depth = 0usize;
                            let mut rtl = false;
                            for &t in &self.initial[i + 1..] {
                                match t {
                                    Lri | Rli | Fsi => depth += 1,
                                    Pdi if depth == 0 => break,
                                    Pdi => depth -= 1,
                                    L if depth == 0 => break,
                                    R | Al if depth == 0 => {
                                        rtl = true;
                                        break;
                                    }
                                    _ => {}
                                }
                            }
                            rtl
                        }
                        _ => false,
                    };
                    let is_isolate = is_isolate_initiator(class);
                    if is_isolate {
                        // Isolate initiators resolve at the embedding level
                        // and participate as neutrals.
                        self.levels[i] = top.level;
                        if let Some(forced) = top.override_class {
                            self.types[i] = forced;
                        }
                    } else {
                        self.levels[i] = top.level;
                        self.types[i] = Bn;
                    }
                    let new_level = if rtl {
                        (top.level + 1) | 1
                    } else {
                        (top.level + 2) & !1
                    };
                    if new_level <= MAX_DEPTH && overflow_isolates == 0 && overflow_embeddings == 0
                    {
                        if is_isolate {
                            valid_isolates += 1;
                        }
                        stack.push(StackEntry {
                            level: new_level,
                            override_class: match class {
                                Rlo => Some(R),
                                Lro => Some(L),
                                _ => None,
                            },
                            isolate: is_isolate,
                        });
                    } else if is_isolate {
                        overflow_isolates += 1;
                    } else if overflow_isolates == 0 {
                        overflow_embeddings += 1;
                    }
                }
                Pdf => {
                    self.levels[i] = top.level;
                    self.types[i] = Bn;
                    if overflow_isolates > 0 {
                    } else if overflow_embeddings > 0 {
                        overflow_embeddings -= 1;
                    } else if !top.isolate && stack.len() > 1 {
                        stack.pop();
                    }
                }
                Pdi => {
                    if overflow_isolates > 0 {
                        overflow_isolates -= 1;
                    } else if valid_isolates > 0 {
                        overflow_embeddings = 0;
                        while !stack.last().unwrap().isolate {
                            stack.pop();
                        }
                        stack.pop();
                        valid_isolates -= 1;
                    }
                    let top = *stack.last().unwrap();
                    self.levels[i] = top.level;
                    if let Some(forced) = top.override_class {
                        self.types[i] = forced;
                    }
                }
                B => {
                    // Paragraph separators reset to the base level (X8).
                    self.levels[i] = self.base_level;
                }
                _ => {
                    self.levels[i] = top.level;
                    if let Some(forced) = top.override_class {
                        self.types[i] = forced;
                    }
                }
            }
        }
    }

    /// Splits into level runs and applies W, N and I rules per run.
    fn resolve_runs(&mut self) {
        let len = self.types.len();
        let mut run_start = 0;
        while run_start < len {
            // Skip X9-removed characters when forming runs; they keep the
            // level of the preceding character.
            if is_removed_by_x9(self.types[run_start]) {
                self.levels[run_start] = if run_start == 0 {
                    self.base_level
                } else {
                    self.levels[run_start - 1]
                };
                run_start += 1;
                continue;
            }
            let level = self.levels[run_start];
            let mut run_end = run_start + 1;
            while run_end < len
                && (self.levels[run_end] == level || is_removed_by_x9(self.types[run_end]))
            {
                run_end += 1;
            }
            // Trim trailing removed characters out of the run.
            let mut logical_end = run_end;
            while logical_end > run_start && is_removed_by_x9(self.types[logical_end - 1]) {
                logical_end -= 1;
            }

            // Collect the run's significant indices.
            let indices: Vec<usize> = (run_start..logical_end)
                .filter(|&i| !is_removed_by_x9(self.types[i]))
                .collect();
            if !indices.is_empty() {
                let prev_level = if run_start == 0 {
                    self.base_level
                } else {
                    self.levels[run_start - 1].max(level)
                };
                let next_level = if run_end >= len {
                    self.base_level
                } else {
                    self.levels[run_end].max(level)
                };
                let sos = if prev_level & 1 == 1 { R } else { L };
                let eos = if next_level & 1 == 1 { R } else { L };
                self.resolve_sequence(&indices, level, sos, eos);
            }
            // Propagate levels over trailing removed characters.
            for i in logical_end..run_end {
                self.levels[i] = if i == 0 {
                    self.base_level
                } else {
                    self.levels[i - 1]
                };
            }
            run_start = run_end;
        }
    }

    /// W1-W7, N0-N2 and I1-I2 for one level run.
    fn resolve_sequence(&mut self, indices: &[usize], level: u8, sos: BidiClass, eos: BidiClass) {
        // W1: non-spacing marks take the type of the previous character.
        let mut prev = sos;
        for &i in indices {
            if self.types[i] == Nsm {
                self.types[i] = if is_isolate_initiator(prev) || prev == Pdi {
                    On
                } else {
                    prev
                };
            }
            prev = self.types[i];
        }

        // W2: European numbers after an Arabic letter become Arabic numbers.
        let mut strong = sos;
        for &i in indices {
            let t = self.types[i];
            if t == En && strong == Al {
                self.types[i] = An;
            }
            if is_strong(t) {
                strong = t;
            }
        }

        // W3: Arabic letters become R.
        for &i in indices {
            if self.types[i] == Al {
                self.types[i] = R;
            }
        }

        // W4: a single separator between matching numbers joins them.
        for w in 1..indices.len().saturating_sub(1) {
            let t = self.types[indices[w]];
            let before = self.types[indices[w - 1]];
            let after = self.types[indices[w + 1]];
            if t == Es && before == En && after == En {
                self.types[indices[w]] = En;
            } else if t == Cs && before == after && (before == En || before == An) {
                self.types[indices[w]] = before;
            }
        }

        // W5: European terminators adjacent to European numbers become EN.
        for w in 0..indices.len() {
            if self.types[indices[w]] != Et {
                continue;
            }
            let mut end = w;
            while end + 1 < indices.len() && self.types[indices[end + 1]] == Et {
                end += 1;
            }
            let before = if w == 0 { sos } else { self.types[indices[w - 1]] };
            let after = if end + 1 < indices.len() {
                self.types[indices[end + 1]]
            } else {
                eos
            };
            if before == En || after == En {
                for &i in &indices[w..=end] {
                    self.types[i] = En;
                }
            }
        }

        // W6: remaining separators and terminators become neutral.
        for &i in indices {
            if matches!(self.types[i], Es | Et | Cs) {
                self.types[i] = On;
            }
        }

        // W7: European numbers after an L context become L.
        let mut strong = sos;
        for &i in indices {
            let t = self.types[i];
            if t == En && strong == L {
                self.types[i] = L;
            }
            if t == L || t == R {
                strong = t;
            }
        }

        self.resolve_brackets(indices, level, sos);

        // N1/N2: neutrals take the surrounding direction, or the embedding
        // direction when the sides disagree.
        let embedding = if level & 1 == 1 { R } else { L };
        let mut w = 0;
        while w < indices.len() {
            if !is_neutral(self.types[indices[w]]) {
                w += 1;
                continue;
            }
            let mut end = w;
            while end + 1 < indices.len() && is_neutral(self.types[indices[end + 1]]) {
                end += 1;
            }
            let before = if w == 0 { sos } else { self.types[indices[w - 1]] };
            let after = if end + 1 < indices.len() {
                self.types[indices[end + 1]]
            } else {
                eos
            };
            // Numbers count as R for neutral resolution.
            let left = if matches!(before, En | An) { R } else { before };
            let right = if matches!(after, En | An) { R } else { after };
            let resolved = if left == right && is_strong(left) {
                left
            } else {
                embedding
            };
            for &i in &indices[w..=end] {
                self.types[i] = resolved;
            }
            w = end + 1;
        }

        // I1/I2: implicit levels.
        for &i in indices {
            let t = self.types[i];
            self.levels[i] = if level & 1 == 0 {
                match t {
                    R => level + 1,
                    An | En => level + 2,
                    _ => level,
                }
            } else {
                match t {
                    L | En | An => level + 1,
                    _ => level,
                }
            };
        }
    }

    /// N0, best effort: paired brackets within one level run.
    fn resolve_brackets(&mut self, indices: &[usize], level: u8, sos: BidiClass) {
        let mut stack: SmallVec<[(char, usize); 8]> = SmallVec::new();
        let mut pairs: SmallVec<[(usize, usize); 8]> = SmallVec::new();
        for (w, &i) in indices.iter().enumerate() {
            if self.types[i] != On {
                continue;
            }
            let Some((closing, is_open)) = bracket_info(self.chars[i]) else {
                continue;
            };
            if is_open {
                if stack.len() < MAX_PAIRS {
                    stack.push((canonical_bracket(closing), w));
                }
            } else {
                let ch = canonical_bracket(self.chars[i]);
                if let Some(open_depth) = stack.iter().rposition(|&(expect, _)| expect == ch) {
                    let (_, open_w) = stack[open_depth];
                    stack.truncate(open_depth);
                    pairs.push((open_w, w));
                }
            }
        }
        pairs.sort_unstable();

        let embedding = if level & 1 == 1 { R } else { L };
        let opposite = if embedding == R { L } else { R };
        for &(open_w, close_w) in &pairs {
            let mut found_embedding = false;
            let mut found_opposite = false;
            for &i in &indices[open_w + 1..close_w] {
                let t = match self.types[i] {
                    En | An => R,
                    other => other,
                };
                if t == embedding {
                    found_embedding = true;
                } else if t == opposite {
                    found_opposite = true;
                }
            }
            let resolved = if found_embedding {
                Some(embedding)
            } else if found_opposite {
                // Check the preceding strong context.
                let mut context = sos;
                for &i in indices[..open_w].iter().rev() {
                    let t = match self.types[i] {
                        En | An => R,
                        other => other,
                    };
                    if is_strong(t) {
                        context = t;
                        break;
                    }
                }
                Some(if context == opposite { opposite } else { embedding })
            } else {
                None
            };
            if let Some(class) = resolved {
                self.types[indices[open_w]] = class;
                self.types[indices[close_w]] = class;
            }
        }
    }

    /// L1: separators and surrounding whitespace reset to the base level.
    fn apply_l1(&mut self) {
        let len = self.initial.len();
        for i in 0..len {
            let t = self.initial[i];
            if t == S || t == B {
                self.levels[i] = self.base_level;
                for j in (0..i).rev() {
                    let t = self.initial[j];
                    if is_removed_by_x9(t) {
                        continue;
                    }
                    if t == Ws || is_isolate_initiator(t) || t == Pdi {
                        self.levels[j] = self.base_level;
                    } else {
                        break;
                    }
                }
            }
        }
        for i in (0..len).rev() {
            let t = self.initial[i];
            if is_removed_by_x9(t) {
                continue;
            }
            if t == Ws || is_isolate_initiator(t) || t == Pdi {
                self.levels[i] = self.base_level;
            } else {
                break;
            }
        }
    }
}

/// P2/P3: the base level from the first strong character, skipping isolates.
fn default_level(types: &[BidiClass]) -> u8 {
    let mut isolate_depth = 0usize;
    for &t in types {
        match t {
            Lri | Rli | Fsi => isolate_depth += 1,
            Pdi => isolate_depth = isolate_depth.saturating_sub(1),
            L if isolate_depth == 0 => return 0,
            R | Al if isolate_depth == 0 => return 1,
            _ => {}
        }
    }
    0
}

/// L2 on a slice of levels: returns logical indices in visual order.
pub(crate) fn visual_order(levels: &[u8]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..levels.len()).collect();
    if levels.is_empty() {
        return order;
    }
    let max_level = *levels.iter().max().unwrap();
    let min_odd = levels
        .iter()
        .copied()
        .filter(|l| l & 1 == 1)
        .min()
        .unwrap_or(max_level + 1);
    let mut cut = max_level;
    while cut >= min_odd {
        let mut i = 0;
        while i < order.len() {
            if levels[order[i]] >= cut {
                let mut j = i;
                while j < order.len() && levels[order[j]] >= cut {
                    j += 1;
                }
                order[i..j].reverse();
                i = j;
            } else {
                i += 1;
            }
        }
        if cut == 0 {
            break;
        }
        cut -= 1;
    }
    order
}

/// Resolves `text` against a base direction and returns its visual runs.
///
/// Runs appear in visual order; characters inside a run keep logical order.
pub fn reorder_bidi(text: &str, base_direction: Direction) -> Vec<VisualRun> {
    let base = match base_direction {
        Direction::Ltr => 0,
        Direction::Rtl => 1,
    };
    let mut resolver = BidiResolver::new();
    resolver.resolve(text, Some(base));
    let levels = resolver.levels();
    if levels.is_empty() {
        return Vec::new();
    }

    // Group logical runs of equal level.
    let mut runs: Vec<VisualRun> = Vec::new();
    let mut start = 0;
    for i in 1..levels.len() {
        if levels[i] != levels[start] {
            runs.push(VisualRun {
                start,
                len: i - start,
                level: levels[start],
            });
            start = i;
        }
    }
    runs.push(VisualRun {
        start,
        len: levels.len() - start,
        level: levels[start],
    });

    // Order the runs visually.
    let run_levels: Vec<u8> = runs.iter().map(|r| r.level).collect();
    visual_order(&run_levels).into_iter().map(|i| runs[i]).collect()
}
