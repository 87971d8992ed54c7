// Copyright 2025 the Folium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! First-fit line breaking.

use super::{
    measure_candidate, skip_leading_glue, trim_end, BrokenLine, InlineItem, ItemMeasures,
    LineWidths, FORCED_BREAK, INFINITE_PENALTY,
};

/// Breaks `items` greedily: accumulate until the next box no longer fits,
/// then break at the last legal opportunity seen.
pub(crate) fn break_lines(items: &[InlineItem], widths: LineWidths) -> Vec<BrokenLine> {
    let measures = ItemMeasures::new(items);
    let mut lines: Vec<BrokenLine> = Vec::new();
    let mut start = skip_leading_glue(items, 0);
    let mut natural = 0.0f32;
    let mut last_legal: Option<usize> = None;

    let mut emit = |lines: &mut Vec<BrokenLine>, start: usize, break_at: Option<usize>| {
        let raw_end = break_at.unwrap_or(items.len());
        let end = trim_end(items, start, raw_end);
        let (line_natural, _, _) = measure_candidate(items, &measures, start, break_at);
        let hyphenated = matches!(
            break_at.map(|i| &items[i]),
            Some(InlineItem::Penalty(p)) if p.flagged
        );
        lines.push(BrokenLine {
            start,
            end,
            break_at,
            natural: line_natural,
            hyphenated,
        });
    };

    let mut i = start;
    while i < items.len() {
        let target = widths.for_line(lines.len());
        match &items[i] {
            InlineItem::Glue(glue) => {
                if i > start && items[i - 1].is_box() {
                    last_legal = Some(i);
                }
                natural += glue.width;
            }
            InlineItem::Penalty(penalty) => {
                if penalty.cost <= FORCED_BREAK {
                    emit(&mut lines, start, Some(i));
                    start = skip_leading_glue(items, i + 1);
                    natural = 0.0;
                    last_legal = None;
                    i = start;
                    continue;
                }
                if penalty.cost < INFINITE_PENALTY && natural + penalty.width <= target {
                    last_legal = Some(i);
                }
            }
            InlineItem::Box(b) => {
                if natural + b.width > target && i > start {
                    if let Some(break_at) = last_legal.take() {
                        emit(&mut lines, start, Some(break_at));
                        start = skip_leading_glue(items, break_at + 1);
                        natural = measures.span_width(start, i);
                        // Re-check the current box against the fresh line.
                        continue;
                    }
                    // No legal break: the accumulated content is unbreakable
                    // and overflows. Emit it and start over at this box.
                    emit(&mut lines, start, None);
                    start = i;
                    natural = 0.0;
                    continue;
                }
                natural += b.width;
            }
        }
        i += 1;
    }

    let end = trim_end(items, start, items.len());
    if end > start || lines.is_empty() {
        emit(&mut lines, start, None);
    }
    lines
}
