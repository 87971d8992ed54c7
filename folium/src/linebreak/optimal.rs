// Copyright 2025 the Folium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Total-fit line breaking in the Knuth-Plass style.
//!
//! Nodes of the dynamic program are break opportunities; an edge is a
//! candidate line between two of them. Edge cost is the squared adjustment
//! ratio, plus the scaled cost of the penalty broken at and a demerit for
//! two consecutive hyphenated lines. Edges that would over-shrink (ratio
//! below -1) are forbidden. The best feasible chain of breaks wins; a
//! paragraph with no feasible chain reports `None` and the caller falls
//! back to the greedy breaker.

use super::{
    adjustment_ratio, measure_candidate, skip_leading_glue, trim_end, BrokenLine, InlineItem,
    ItemMeasures, LineWidths, FORCED_BREAK,
};

/// Cost of a loose line with no glue to stretch.
const LOOSE_NO_GLUE_COST: f32 = 10_000.0;
/// Extra demerit for hyphen breaks on consecutive lines.
const DOUBLE_HYPHEN_DEMERIT: f32 = 1.0;
/// Scale that maps penalty item costs into ratio-squared units.
const PENALTY_SCALE: f32 = 100.0;

#[derive(Clone, Copy)]
struct Entry {
    pred: usize,
    total: f32,
    /// The item this chain last broke at; `None` for the paragraph start.
    break_at: Option<usize>,
    /// Start of the next line.
    next_start: usize,
    /// Whether the line ending at `break_at` was hyphenated.
    flagged: bool,
}

fn line_cost(ratio: f32, is_last: bool) -> Option<f32> {
    if ratio < -1.0 {
        return None;
    }
    if is_last {
        // The last line stretches for free.
        return Some(if ratio < 0.0 { ratio * ratio } else { 0.0 });
    }
    if ratio.is_finite() {
        Some(ratio * ratio)
    } else {
        Some(LOOSE_NO_GLUE_COST)
    }
}

/// Breaks `items` optimally, or returns `None` when no feasible break
/// sequence exists.
pub(crate) fn break_lines(items: &[InlineItem], widths: LineWidths) -> Option<Vec<BrokenLine>> {
    let measures = ItemMeasures::new(items);
    let mut table = vec![Entry {
        pred: 0,
        total: 0.0,
        break_at: None,
        next_start: skip_leading_glue(items, 0),
        flagged: false,
    }];
    let mut active = 0;

    for i in 0..items.len() {
        if !super::is_legal_break(items, i) {
            continue;
        }
        let (penalty_cost, forced, flagged) = match &items[i] {
            InlineItem::Penalty(p) => (p.cost, p.cost <= FORCED_BREAK, p.flagged),
            _ => (0.0, false, false),
        };

        let mut best: Option<Entry> = None;
        for (index, entry) in table.iter().enumerate().skip(active) {
            if entry.next_start > i {
                continue;
            }
            let first_line = index == 0 && entry.break_at.is_none();
            let target = if first_line { widths.first } else { widths.rest };
            let (natural, stretch, shrink) =
                measure_candidate(items, &measures, entry.next_start, Some(i));
            let ratio = adjustment_ratio(natural, stretch, shrink, target);
            let Some(mut cost) = line_cost(ratio, false) else {
                continue;
            };
            if !forced {
                cost += penalty_cost / PENALTY_SCALE;
            }
            if flagged && entry.flagged {
                cost += DOUBLE_HYPHEN_DEMERIT;
            }
            let total = entry.total + cost;
            if best.is_none_or(|b| total < b.total) {
                best = Some(Entry {
                    pred: index,
                    total,
                    break_at: Some(i),
                    next_start: skip_leading_glue(items, i + 1),
                    flagged,
                });
            }
        }
        if let Some(entry) = best {
            table.push(entry);
        }
        if forced {
            // No line may span a mandatory break.
            active = table.len().saturating_sub(1);
            if table[active].break_at != Some(i) {
                // The mandatory break was not reachable.
                return None;
            }
        }
    }

    // Close the paragraph: the best chain plus a final line (possibly
    // empty when the stream ends in a forced break).
    let mut best_final: Option<(usize, f32, bool)> = None;
    for (index, entry) in table.iter().enumerate().skip(active) {
        let end = trim_end(items, entry.next_start, items.len());
        let (total, has_line) = if end > entry.next_start {
            let first_line = index == 0 && entry.break_at.is_none();
            let target = if first_line { widths.first } else { widths.rest };
            let (natural, stretch, shrink) =
                measure_candidate(items, &measures, entry.next_start, None);
            let ratio = adjustment_ratio(natural, stretch, shrink, target);
            let Some(cost) = line_cost(ratio, true) else {
                continue;
            };
            (entry.total + cost, true)
        } else {
            (entry.total, false)
        };
        if best_final.is_none_or(|(_, t, _)| total < t) {
            best_final = Some((index, total, has_line));
        }
    }
    let (mut index, _, has_final_line) = best_final?;

    // Retrace the chain.
    let mut breaks: Vec<usize> = Vec::new();
    let final_start = table[index].next_start;
    while let Some(break_at) = table[index].break_at {
        breaks.push(break_at);
        index = table[index].pred;
    }
    breaks.reverse();

    let mut lines = Vec::with_capacity(breaks.len() + 1);
    let mut start = table[0].next_start;
    for &break_at in &breaks {
        lines.push(make_line(items, &measures, start, Some(break_at)));
        start = skip_leading_glue(items, break_at + 1);
    }
    if has_final_line {
        lines.push(make_line(items, &measures, final_start, None));
    }
    if lines.is_empty() {
        lines.push(make_line(items, &measures, 0, None));
    }
    Some(lines)
}

fn make_line(
    items: &[InlineItem],
    measures: &ItemMeasures,
    start: usize,
    break_at: Option<usize>,
) -> BrokenLine {
    let raw_end = break_at.unwrap_or(items.len());
    let end = trim_end(items, start, raw_end);
    let (natural, _, _) = measure_candidate(items, measures, start, break_at);
    let hyphenated = matches!(
        break_at.map(|i| &items[i]),
        Some(InlineItem::Penalty(p)) if p.flagged
    );
    BrokenLine {
        start,
        end,
        break_at,
        natural,
        hyphenated,
    }
}

/// Total demerits of a break sequence, measured with the same cost model
/// the optimizer uses. Over-shrunk or overflowing lines count the loose
/// cost plus their squared overfull ratio.
pub(crate) fn total_demerits(
    items: &[InlineItem],
    lines: &[BrokenLine],
    widths: LineWidths,
) -> f32 {
    let measures = ItemMeasures::new(items);
    let mut total = 0.0;
    let mut prev_flagged = false;
    for (line_index, line) in lines.iter().enumerate() {
        let is_last = line_index + 1 == lines.len();
        let target = widths.for_line(line_index);
        let (natural, stretch, shrink) =
            measure_candidate(items, &measures, line.start, line.break_at);
        let ratio = adjustment_ratio(natural, stretch, shrink, target);
        total += line_cost(ratio, is_last).unwrap_or_else(|| {
            let over = if shrink > 0.0 { ratio * ratio } else { 1.0 };
            LOOSE_NO_GLUE_COST + over
        });
        if let Some(InlineItem::Penalty(p)) = line.break_at.map(|i| &items[i]) {
            if p.cost > FORCED_BREAK {
                total += p.cost / PENALTY_SCALE;
            }
            if p.flagged && prev_flagged {
                total += DOUBLE_HYPHEN_DEMERIT;
            }
        }
        prev_flagged = line.hyphenated;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::super::tests::word;
    use super::super::{greedy, InlineItem, LineWidths, PenaltyItem, HYPHEN_COST};
    use super::*;

    fn space() -> InlineItem {
        InlineItem::space(6.0, 0, None)
    }

    fn words(widths: &[f32]) -> Vec<InlineItem> {
        let mut items = Vec::new();
        for (i, &w) in widths.iter().enumerate() {
            if i > 0 {
                items.push(space());
            }
            items.push(word("w", w));
        }
        items
    }

    #[test]
    fn single_line_when_everything_fits() {
        let items = words(&[20.0, 20.0, 20.0]);
        let lines = break_lines(&items, LineWidths::uniform(200.0)).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].natural, 72.0);
    }

    #[test]
    fn chooses_balanced_breaks_over_greedy() {
        // Greedy crams the first line and leaves a very loose second line;
        // the optimizer balances the two.
        let items = words(&[40.0, 40.0, 40.0, 40.0]);
        let widths = LineWidths::uniform(100.0);
        let optimal = break_lines(&items, widths).unwrap();
        let greedy_lines = greedy::break_lines(&items, widths);
        assert!(
            total_demerits(&items, &optimal, widths)
                <= total_demerits(&items, &greedy_lines, widths) + 1e-4
        );
        assert_eq!(optimal.len(), 2);
        // Two words per line beats three-plus-one.
        assert_eq!(optimal[0].end, 3);
    }

    #[test]
    fn optimal_never_worse_than_greedy() {
        let cases: &[(&[f32], f32)] = &[
            (&[30.0, 50.0, 20.0, 40.0, 35.0, 25.0], 110.0),
            (&[60.0, 10.0, 10.0, 60.0, 30.0, 30.0, 30.0], 100.0),
            (&[45.0, 45.0, 45.0, 45.0, 45.0], 100.0),
            (&[10.0, 10.0, 10.0, 10.0], 500.0),
        ];
        for &(word_widths, target) in cases {
            let items = words(word_widths);
            let widths = LineWidths::uniform(target);
            let Some(optimal) = break_lines(&items, widths) else {
                continue;
            };
            let greedy_lines = greedy::break_lines(&items, widths);
            assert!(
                total_demerits(&items, &optimal, widths)
                    <= total_demerits(&items, &greedy_lines, widths) + 1e-4,
                "case {word_widths:?} @ {target}"
            );
        }
    }

    #[test]
    fn infeasible_paragraph_reports_none() {
        // A box wider than the line cannot be placed without overflowing,
        // which the optimizer never does; the caller falls back to greedy.
        let items = vec![word("wide", 300.0)];
        assert!(break_lines(&items, LineWidths::uniform(100.0)).is_none());

        let items = vec![
            word("wide", 300.0),
            InlineItem::Penalty(PenaltyItem {
                width: 0.0,
                cost: super::super::FORCED_BREAK,
                flagged: false,
                style: None,
            }),
            word("bbb", 20.0),
        ];
        assert!(break_lines(&items, LineWidths::uniform(100.0)).is_none());
    }

    #[test]
    fn double_hyphen_breaks_are_discouraged() {
        // Two hyphenation opportunities; the optimizer should prefer a
        // solution with at most one hyphenated line when costs allow.
        let hyphen = |_i: u32| {
            InlineItem::Penalty(PenaltyItem {
                width: 4.0,
                cost: HYPHEN_COST,
                flagged: true,
                style: None,
            })
        };
        let items = vec![
            word("frag", 40.0),
            hyphen(0),
            word("ment", 40.0),
            space(),
            word("frag", 40.0),
            hyphen(1),
            word("ment", 40.0),
        ];
        let widths = LineWidths::uniform(90.0);
        let lines = break_lines(&items, widths).unwrap();
        let hyphenated = lines.iter().filter(|l| l.hyphenated).count();
        assert!(hyphenated <= 1, "got {hyphenated} hyphenated lines");
    }

    #[test]
    fn forced_breaks_partition_the_paragraph() {
        let items = vec![
            word("a", 20.0),
            InlineItem::Penalty(PenaltyItem {
                width: 0.0,
                cost: super::super::FORCED_BREAK,
                flagged: false,
                style: None,
            }),
            word("b", 20.0),
            space(),
            word("c", 20.0),
        ];
        let lines = break_lines(&items, LineWidths::uniform(100.0)).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].end, 1);
        assert_eq!(lines[1].start, 2);
    }
}
