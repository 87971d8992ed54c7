// Copyright 2025 the Folium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paragraph layout: walks an inline-level run of the FO tree, builds the
//! box/glue/penalty stream and hands it to the line breaker.

use crate::area::{LineArea, LinkTarget};
use crate::block::Gathered;
use crate::context::LayoutContext;
use crate::diag::{Diagnostic, DiagnosticSink, LayoutError, WarnCode};
use crate::fo::{FoKind, FoTree, NodeId};
use crate::linebreak::align::{build_line_areas, ParagraphFrame};
use crate::linebreak::{
    greedy, optimal, BoxContent, BoxItem, GlueItem, InlineItem, InlineStyle, LeaderSpec,
    PenaltyItem, FORCED_BREAK, HYPHEN_COST,
};
use crate::options::LineBreaking;
use crate::resolve::resolve_style;
use crate::shape::bidi::BidiResolver;
use crate::style::{Direction, Style};

/// An intermediate inline atom, between tree walking and itemization.
enum Atom {
    Str {
        text: String,
        style: Style,
        link: Option<LinkTarget>,
    },
    Citation {
        ref_id: String,
        style: Style,
        link: Option<LinkTarget>,
    },
    /// The page number of the page this line ends up on.
    CurrentPage {
        style: Style,
        link: Option<LinkTarget>,
    },
    Leader {
        style: Style,
    },
    ForcedBreak,
}

/// Lays out one paragraph (a run of inline-level nodes) into line areas
/// stacked from `y_start`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn layout_paragraph(
    ctx: &mut LayoutContext,
    tree: &FoTree,
    nodes: &[NodeId],
    block_style: &Style,
    content_x: f32,
    content_width: f32,
    first_indent: f32,
    y_start: f32,
    gathered: &mut Gathered,
) -> Result<Vec<LineArea>, LayoutError> {
    let mut atoms = Vec::new();
    for &node in nodes {
        collect_atoms(ctx, tree, node, block_style, None, content_width, &mut atoms, gathered)?;
    }
    collapse_whitespace(&mut atoms, block_style.white_space_collapse);
    if atoms.is_empty() {
        return Ok(Vec::new());
    }

    // Resolve bidi levels over the paragraph text. Non-text atoms count as
    // a single placeholder character.
    let mut paragraph_text = String::new();
    for atom in &atoms {
        match atom {
            Atom::Str { text, .. } => paragraph_text.push_str(text),
            Atom::ForcedBreak => paragraph_text.push('\n'),
            _ => paragraph_text.push('\u{FFFC}'),
        }
    }
    let base_level = match block_style.direction {
        Direction::Ltr => 0,
        Direction::Rtl => 1,
    };
    let mut bidi = BidiResolver::new();
    bidi.resolve(&paragraph_text, Some(base_level));
    let levels = bidi.levels().to_vec();

    let items = itemize(ctx, &atoms, &levels, base_level)?;
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let widths = crate::linebreak::LineWidths {
        first: (content_width - first_indent).max(0.0),
        rest: content_width,
    };
    let broken = match ctx.options.line_breaking {
        LineBreaking::Greedy => greedy::break_lines(&items, widths),
        LineBreaking::Optimal => optimal::break_lines(&items, widths)
            .unwrap_or_else(|| greedy::break_lines(&items, widths)),
    };

    let frame = ParagraphFrame {
        content_x,
        width: content_width,
        first_indent,
        align: block_style.text_align,
        align_last: block_style.effective_align_last(),
        direction: block_style.direction,
        line_height: block_style.line_height,
        font: ctx.select_font(block_style),
        font_size: block_style.font_size,
    };
    Ok(build_line_areas(&ctx.fonts, &items, &broken, &frame, y_start))
}

/// Recursive tree walk below one inline-level node.
#[allow(clippy::too_many_arguments)]
fn collect_atoms(
    ctx: &mut LayoutContext,
    tree: &FoTree,
    node: NodeId,
    parent_style: &Style,
    link: Option<&LinkTarget>,
    containing_width: f32,
    atoms: &mut Vec<Atom>,
    gathered: &mut Gathered,
) -> Result<(), LayoutError> {
    match tree.kind(node) {
        FoKind::Text(text) => {
            atoms.push(Atom::Str {
                text: text.clone(),
                style: parent_style.clone(),
                link: link.cloned(),
            });
        }
        FoKind::Character => {
            if let Some(ch) = tree.property(node, "character") {
                atoms.push(Atom::Str {
                    text: ch.to_owned(),
                    style: resolve_style(tree, node, parent_style, containing_width, &mut ctx.diag),
                    link: link.cloned(),
                });
            }
        }
        FoKind::Inline => {
            let style = resolve_style(tree, node, parent_style, containing_width, &mut ctx.diag);
            if let Some(id) = &style.id {
                gathered.ids.push((id.clone(), 0.0));
            }
            for &child in tree.children(node) {
                collect_atoms(ctx, tree, child, &style, link, containing_width, atoms, gathered)?;
            }
        }
        FoKind::BasicLink => {
            let style = resolve_style(tree, node, parent_style, containing_width, &mut ctx.diag);
            let target = if let Some(id) = tree.property(node, "internal-destination") {
                Some(LinkTarget::Internal {
                    id: id.to_owned(),
                    resolved: None,
                })
            } else {
                tree.property(node, "external-destination")
                    .map(|uri| LinkTarget::External(uri.to_owned()))
            };
            for &child in tree.children(node) {
                collect_atoms(
                    ctx,
                    tree,
                    child,
                    &style,
                    target.as_ref().or(link),
                    containing_width,
                    atoms,
                    gathered,
                )?;
            }
        }
        FoKind::PageNumber => {
            atoms.push(Atom::CurrentPage {
                style: resolve_style(tree, node, parent_style, containing_width, &mut ctx.diag),
                link: link.cloned(),
            });
        }
        FoKind::PageNumberCitation => {
            if let Some(ref_id) = tree.property(node, "ref-id") {
                atoms.push(Atom::Citation {
                    ref_id: ref_id.to_owned(),
                    style: resolve_style(tree, node, parent_style, containing_width, &mut ctx.diag),
                    link: link.cloned(),
                });
            }
        }
        FoKind::Leader => {
            atoms.push(Atom::Leader {
                style: resolve_style(tree, node, parent_style, containing_width, &mut ctx.diag),
            });
        }
        FoKind::Footnote => {
            // First inline child is the citation; the footnote-body lays
            // out at the region width and rides with the fragment.
            for &child in tree.children(node) {
                match tree.kind(child) {
                    FoKind::FootnoteBody => {
                        let body_style =
                            resolve_style(tree, child, parent_style, containing_width, &mut ctx.diag);
                        let mut body_children = Vec::new();
                        let mut cursor = 0.0f32;
                        for &body_child in tree.children(child) {
                            let child_style = resolve_style(
                                tree,
                                body_child,
                                &body_style,
                                containing_width,
                                &mut ctx.diag,
                            );
                            if matches!(tree.kind(body_child), FoKind::Block) {
                                let mut area = super::layout_block(
                                    ctx,
                                    tree,
                                    body_child,
                                    &child_style,
                                    0.0,
                                    containing_width,
                                    gathered,
                                )?;
                                area.translate_y(cursor);
                                cursor = area.rect.bottom();
                                body_children.push(crate::area::AreaChild::Block(area));
                            }
                        }
                        gathered.footnotes.push(crate::area::BlockArea {
                            rect: crate::geom::Rect::new(0.0, 0.0, containing_width, cursor),
                            background: None,
                            borders: None,
                            children: body_children,
                        });
                    }
                    _ => {
                        collect_atoms(
                            ctx,
                            tree,
                            child,
                            parent_style,
                            link,
                            containing_width,
                            atoms,
                            gathered,
                        )?;
                    }
                }
            }
        }
        FoKind::RetrieveMarker => {
            let Some(class) = tree.property(node, "retrieve-class-name") else {
                return Ok(());
            };
            let position = tree
                .property(node, "retrieve-position")
                .unwrap_or("first-starting-within-page");
            let use_last = match position {
                "first-starting-within-page" => false,
                "last-ending-within-page" => true,
                other => {
                    ctx.diag.warn(Diagnostic {
                        code: WarnCode::UnsupportedFeature,
                        message: format!(
                            "retrieve-position {other:?} is not supported; using first-starting-within-page"
                        ),
                        location: None,
                    });
                    false
                }
            };
            let resolved = ctx.markers.as_ref().and_then(|lookup| {
                let map = if use_last {
                    &lookup.last_ending
                } else {
                    &lookup.first_starting
                };
                map.get(class).cloned()
            });
            if let Some((marker_node, marker_style)) = resolved {
                let children: Vec<NodeId> = tree.children(marker_node).to_vec();
                for child in children {
                    collect_atoms(
                        ctx,
                        tree,
                        child,
                        &marker_style,
                        link,
                        containing_width,
                        atoms,
                        gathered,
                    )?;
                }
            }
        }
        other => {
            ctx.diag.warn(Diagnostic {
                code: WarnCode::UnsupportedFeature,
                message: format!("{other:?} in inline context is not supported; skipping"),
                location: None,
            });
        }
    }
    Ok(())
}

/// Collapses whitespace runs across atom boundaries and trims the
/// paragraph's edges. In preserve mode only newlines are special: they
/// become forced breaks.
fn collapse_whitespace(atoms: &mut Vec<Atom>, collapse: bool) {
    if !collapse {
        // Split out forced breaks; leave other whitespace alone.
        let mut result = Vec::with_capacity(atoms.len());
        for atom in atoms.drain(..) {
            match atom {
                Atom::Str { text, style, link } if text.contains('\n') => {
                    let mut first = true;
                    for piece in text.split('\n') {
                        if !first {
                            result.push(Atom::ForcedBreak);
                        }
                        first = false;
                        if !piece.is_empty() {
                            result.push(Atom::Str {
                                text: piece.to_owned(),
                                style: style.clone(),
                                link: link.clone(),
                            });
                        }
                    }
                }
                other => result.push(other),
            }
        }
        *atoms = result;
        return;
    }

    let mut prev_ends_space = true;
    for atom in atoms.iter_mut() {
        if let Atom::Str { text, .. } = atom {
            let mut collapsed = String::with_capacity(text.len());
            for ch in text.chars() {
                if ch.is_whitespace() {
                    if !prev_ends_space {
                        collapsed.push(' ');
                    }
                    prev_ends_space = true;
                } else {
                    collapsed.push(ch);
                    prev_ends_space = false;
                }
            }
            *text = collapsed;
        } else {
            prev_ends_space = false;
        }
    }
    // Trim trailing paragraph whitespace.
    for atom in atoms.iter_mut().rev() {
        if let Atom::Str { text, .. } = atom {
            while text.ends_with(' ') {
                text.pop();
            }
            if !text.is_empty() {
                break;
            }
        } else {
            break;
        }
    }
    atoms.retain(|atom| !matches!(atom, Atom::Str { text, .. } if text.is_empty()));
}

/// Turns atoms into the box/glue/penalty stream.
fn itemize(
    ctx: &mut LayoutContext,
    atoms: &[Atom],
    levels: &[u8],
    base_level: u8,
) -> Result<Vec<InlineItem>, LayoutError> {
    let mut items = Vec::new();
    let mut offset = 0usize;
    for atom in atoms {
        match atom {
            Atom::Str { text, style, link } => {
                itemize_text(ctx, text, style, link.clone(), levels, offset, &mut items);
                offset += text.chars().count();
            }
            Atom::Citation { ref_id, style, link } => {
                let inline_style = make_inline_style(ctx, style, link.clone());
                // Placeholder width: a provisional two-digit number.
                let width = ctx.measure_with(&inline_style, "00");
                items.push(InlineItem::Box(BoxItem {
                    width,
                    level: level_at(levels, offset, base_level),
                    content: BoxContent::PageRef {
                        ref_id: ref_id.clone(),
                        style: inline_style,
                    },
                }));
                offset += 1;
            }
            Atom::CurrentPage { style, link } => {
                let inline_style = make_inline_style(ctx, style, link.clone());
                let width = ctx.measure_with(&inline_style, "00");
                items.push(InlineItem::Box(BoxItem {
                    width,
                    level: level_at(levels, offset, base_level),
                    content: BoxContent::PageRef {
                        ref_id: String::new(),
                        style: inline_style,
                    },
                }));
                offset += 1;
            }
            Atom::Leader { style } => {
                let font = ctx.select_font(style);
                items.push(InlineItem::Glue(GlueItem {
                    width: 0.0,
                    stretch: 0.0,
                    shrink: 0.0,
                    level: level_at(levels, offset, base_level),
                    leader: Some(LeaderSpec {
                        pattern: style.leader_pattern,
                        thickness: style.rule_thickness,
                        color: style.color,
                        font,
                        size: style.font_size,
                    }),
                    link: None,
                }));
                offset += 1;
            }
            Atom::ForcedBreak => {
                items.push(InlineItem::Penalty(PenaltyItem {
                    width: 0.0,
                    cost: FORCED_BREAK,
                    flagged: false,
                    style: None,
                }));
                offset += 1;
            }
        }
    }
    Ok(items)
}

fn level_at(levels: &[u8], offset: usize, base_level: u8) -> u8 {
    levels.get(offset).copied().unwrap_or(base_level)
}

fn make_inline_style(
    ctx: &mut LayoutContext,
    style: &Style,
    link: Option<LinkTarget>,
) -> InlineStyle {
    InlineStyle {
        font: ctx.select_font(style),
        size: style.font_size,
        color: style.color,
        underline: style.underline,
        line_through: style.line_through,
        letter_spacing: style.letter_spacing,
        hyphen_char: style.hyphenation_character,
        link,
    }
}

/// Splits one styled text chunk into word boxes, space glue and soft
/// hyphen penalties.
fn itemize_text(
    ctx: &mut LayoutContext,
    text: &str,
    style: &Style,
    link: Option<LinkTarget>,
    levels: &[u8],
    chunk_offset: usize,
    items: &mut Vec<InlineItem>,
) {
    let inline_style = make_inline_style(ctx, style, link);
    let space_width = ctx.measure_with(&inline_style, " ") + style.word_spacing;

    let chars: Vec<char> = text.chars().collect();
    let mut index = 0;
    while index < chars.len() {
        let level = level_at(levels, chunk_offset + index, 0);
        if chars[index] == ' ' {
            items.push(InlineItem::space(
                space_width,
                level,
                inline_style.link.clone(),
            ));
            index += 1;
            continue;
        }
        let word_start = index;
        while index < chars.len() && chars[index] != ' ' {
            index += 1;
        }
        let word: String = chars[word_start..index].iter().collect();
        emit_word(ctx, &word, &inline_style, style, level, items);
    }
}

/// Emits one word, split at its hyphenation points when enabled.
fn emit_word(
    ctx: &mut LayoutContext,
    word: &str,
    inline_style: &InlineStyle,
    style: &Style,
    level: u8,
    items: &mut Vec<InlineItem>,
) {
    let breaks = if style.hyphenate && ctx.options.enable_hyphenation {
        ctx.hyphenate_word(word, &style.language)
    } else {
        Vec::new()
    };
    if breaks.is_empty() {
        let width = ctx.measure_with(inline_style, word);
        items.push(InlineItem::Box(BoxItem {
            width,
            level,
            content: BoxContent::Text {
                text: word.to_owned(),
                style: inline_style.clone(),
            },
        }));
        return;
    }

    let hyphen_width = ctx.measure_with(inline_style, &inline_style.hyphen_char.to_string());
    let chars: Vec<char> = word.chars().collect();
    let mut boundaries = breaks;
    boundaries.push(chars.len());
    let mut start = 0;
    for (piece_index, &position) in boundaries.iter().enumerate() {
        if piece_index > 0 {
            items.push(InlineItem::Penalty(PenaltyItem {
                width: hyphen_width,
                cost: HYPHEN_COST,
                flagged: true,
                style: Some(inline_style.clone()),
            }));
        }
        let piece: String = chars[start..position].iter().collect();
        let width = ctx.measure_with(inline_style, &piece);
        items.push(InlineItem::Box(BoxItem {
            width,
            level,
            content: BoxContent::Text {
                text: piece,
                style: inline_style.clone(),
            },
        }));
        start = position;
    }
}
