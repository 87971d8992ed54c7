// Copyright 2025 the Folium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Alignment and justification: turns broken lines into positioned line
//! areas with inline children in visual order.

use super::{BoxContent, BrokenLine, GlueItem, InlineItem, FORCED_BREAK};
use crate::area::{InlineArea, InlineKind, LineArea, TextInline};
use crate::geom::Rect;
use crate::shape::bidi::visual_order;
use crate::shape::font::{FontContext, FontKey};
use crate::style::{Direction, TextAlign};

/// Everything needed to position the lines of one paragraph.
#[derive(Debug, Clone)]
pub(crate) struct ParagraphFrame {
    /// Left edge of the alignment box.
    pub content_x: f32,
    /// Width of the alignment box.
    pub width: f32,
    /// Indent applied to the first line.
    pub first_indent: f32,
    pub align: TextAlign,
    pub align_last: TextAlign,
    pub direction: Direction,
    pub line_height: f32,
    /// Dominant font of the paragraph, for the baseline position.
    pub font: FontKey,
    pub font_size: f32,
}

/// Lays out `broken` lines stacked from `y_start`, one `line_height` apart.
pub(crate) fn build_line_areas(
    fonts: &FontContext,
    items: &[InlineItem],
    broken: &[BrokenLine],
    frame: &ParagraphFrame,
    y_start: f32,
) -> Vec<LineArea> {
    let ascent = fonts.ascent(frame.font, frame.font_size);
    let descent = fonts.descent(frame.font, frame.font_size);
    let half_leading = (frame.line_height - (ascent + descent)) / 2.0;

    let mut lines = Vec::with_capacity(broken.len());
    let mut y = y_start;
    for (index, line) in broken.iter().enumerate() {
        let is_first = index == 0;
        let is_last = index + 1 == broken.len() || ends_forced(items, line);
        let indent = if is_first { frame.first_indent } else { 0.0 };
        let avail = frame.width - indent;
        let box_x = match frame.direction {
            Direction::Ltr => frame.content_x + indent,
            Direction::Rtl => frame.content_x,
        };
        let align = if is_last { frame.align_last } else { frame.align };
        let baseline = y + half_leading + ascent;

        let mut area = position_line(items, line, avail, box_x, align, frame, baseline);
        area.rect.y = y;
        area.rect.height = frame.line_height;
        for inline in &mut area.inlines {
            inline.rect.y = y;
            inline.rect.height = frame.line_height;
        }
        lines.push(area);
        y += frame.line_height;
    }
    lines
}

fn ends_forced(items: &[InlineItem], line: &BrokenLine) -> bool {
    matches!(
        line.break_at.map(|i| &items[i]),
        Some(InlineItem::Penalty(p)) if p.cost <= FORCED_BREAK
    )
}

/// Positions one line's inlines horizontally and resolves its alignment.
#[allow(clippy::too_many_arguments)]
fn position_line(
    items: &[InlineItem],
    line: &BrokenLine,
    avail: f32,
    box_x: f32,
    align: TextAlign,
    frame: &ParagraphFrame,
    baseline: f32,
) -> LineArea {
    let content = &items[line.start..line.end];
    let slack = avail - line.natural;

    // Leaders swallow all residual slack before any other alignment.
    let leader_count = content
        .iter()
        .filter(|item| matches!(item, InlineItem::Glue(g) if g.leader.is_some()))
        .count();
    let leader_extra = if leader_count > 0 && slack > 0.0 {
        slack / leader_count as f32
    } else {
        0.0
    };

    let space_count = content
        .iter()
        .filter(|item| matches!(item, InlineItem::Glue(g) if g.leader.is_none()))
        .count();
    let justify = align == TextAlign::Justify
        && leader_count == 0
        && space_count > 0
        && !crate::util::nearly_zero(slack);
    let space_adjust = if justify {
        slack / space_count as f32
    } else {
        0.0
    };

    let offset = if justify || leader_count > 0 {
        0.0
    } else {
        let free = slack.max(0.0);
        match (align, frame.direction) {
            (TextAlign::Start, Direction::Ltr) | (TextAlign::End, Direction::Rtl) => 0.0,
            (TextAlign::Start, Direction::Rtl) | (TextAlign::End, Direction::Ltr) => free,
            (TextAlign::Center, _) => free / 2.0,
            (TextAlign::Justify, _) => 0.0,
        }
    };

    // Visual reordering per UAX#9 L2, on the line's own items.
    let levels: Vec<u8> = content
        .iter()
        .map(|item| match item {
            InlineItem::Box(b) => b.level,
            InlineItem::Glue(g) => g.level,
            InlineItem::Penalty(_) => base_level(frame.direction),
        })
        .collect();
    let order = visual_order(&levels);

    let mut inlines = Vec::with_capacity(content.len() + 1);
    let mut x = box_x + offset;
    for &logical in &order {
        match &content[logical] {
            InlineItem::Box(b) => {
                let rect = Rect::new(x, 0.0, b.width, 0.0);
                x += b.width;
                inlines.push(make_box_inline(rect, &b.content));
            }
            InlineItem::Glue(g) => {
                let width = if g.leader.is_some() {
                    g.width + leader_extra
                } else {
                    g.width + space_adjust
                };
                let rect = Rect::new(x, 0.0, width, 0.0);
                x += width;
                inlines.push(make_glue_inline(rect, g));
            }
            InlineItem::Penalty(_) => {}
        }
    }

    // A trailing soft hyphen materializes as the hyphenation character.
    if line.hyphenated {
        if let Some(InlineItem::Penalty(p)) = line.break_at.map(|i| &items[i]) {
            if let Some(style) = &p.style {
                let rect = Rect::new(x, 0.0, p.width, 0.0);
                x += p.width;
                inlines.push(InlineArea {
                    rect,
                    kind: InlineKind::Text(TextInline {
                        text: style.hyphen_char.to_string(),
                        font: style.font,
                        size: style.size,
                        color: style.color,
                        underline: style.underline,
                        line_through: style.line_through,
                        letter_spacing: style.letter_spacing,
                    }),
                    link: style.link.clone(),
                });
            }
        }
    }
    let start_x = box_x + offset;
    LineArea {
        rect: Rect::new(start_x, 0.0, x - start_x, 0.0),
        baseline,
        align,
        direction: frame.direction,
        content_x: box_x,
        target_width: avail,
        inlines,
    }
}

fn base_level(direction: Direction) -> u8 {
    match direction {
        Direction::Ltr => 0,
        Direction::Rtl => 1,
    }
}

fn make_box_inline(rect: Rect, content: &BoxContent) -> InlineArea {
    match content {
        BoxContent::Text { text, style } => InlineArea {
            rect,
            kind: InlineKind::Text(TextInline {
                text: text.clone(),
                font: style.font,
                size: style.size,
                color: style.color,
                underline: style.underline,
                line_through: style.line_through,
                letter_spacing: style.letter_spacing,
            }),
            link: style.link.clone(),
        },
        BoxContent::Graphic { source, .. } => InlineArea {
            rect,
            kind: InlineKind::Graphic {
                source: source.clone(),
            },
            link: None,
        },
        BoxContent::PageRef { ref_id, style } => InlineArea {
            rect,
            kind: InlineKind::PageRef {
                ref_id: ref_id.clone(),
                font: style.font,
                size: style.size,
                color: style.color,
            },
            link: style.link.clone(),
        },
    }
}

fn make_glue_inline(rect: Rect, glue: &GlueItem) -> InlineArea {
    let kind = match &glue.leader {
        Some(leader) => InlineKind::Leader {
            pattern: leader.pattern,
            thickness: leader.thickness,
            color: leader.color,
            font: leader.font,
            size: leader.size,
        },
        None => InlineKind::Space {
            natural: glue.width,
        },
    };
    InlineArea {
        rect,
        kind,
        link: glue.link.clone(),
    }
}

/// Re-justifies one already-built line after an inline width changed (the
/// page-number patch). Space inlines return to their natural width, the
/// residual slack is redistributed, and the alignment offset is reapplied.
/// The set of inlines never changes; the line is not re-broken.
pub(crate) fn rejustify_line(line: &mut LineArea, direction: Direction) {
    let mut natural = 0.0;
    let mut space_count = 0usize;
    let mut leader_count = 0usize;
    for inline in &line.inlines {
        match &inline.kind {
            InlineKind::Space { natural: n } => {
                natural += n;
                space_count += 1;
            }
            InlineKind::Leader { .. } => {
                leader_count += 1;
            }
            _ => natural += inline.rect.width,
        }
    }
    let slack = line.target_width - natural;

    let (offset, space_width_extra, leader_extra) = if leader_count > 0 {
        (0.0, 0.0, slack.max(0.0) / leader_count as f32)
    } else if line.align == TextAlign::Justify && space_count > 0 {
        (0.0, slack / space_count as f32, 0.0)
    } else {
        let free = slack.max(0.0);
        let offset = match (line.align, direction) {
            (TextAlign::Start, Direction::Ltr) | (TextAlign::End, Direction::Rtl) => 0.0,
            (TextAlign::Start, Direction::Rtl) | (TextAlign::End, Direction::Ltr) => free,
            (TextAlign::Center, _) => free / 2.0,
            (TextAlign::Justify, _) => 0.0,
        };
        (offset, 0.0, 0.0)
    };

    let mut x = line.content_x + offset;
    let start_x = x;
    for inline in &mut line.inlines {
        inline.rect.x = x;
        match &inline.kind {
            InlineKind::Space { natural } => {
                inline.rect.width = natural + space_width_extra;
            }
            InlineKind::Leader { .. } => {
                // Leaders have no natural width; they absorb the slack.
                inline.rect.width = leader_extra.max(0.0);
            }
            _ => {}
        }
        x += inline.rect.width;
    }
    line.rect.x = start_x;
    line.rect.width = x - start_x;
}
