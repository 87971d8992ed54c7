// Copyright 2025 the Folium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Finalization: patches forward references once page numbers are known
//! and materializes link annotations.
//!
//! Page-number placeholders are replaced by the real number, the affected
//! line is re-measured and re-justified (the width delta is absorbed by
//! the line's glue), but lines are never re-broken.

use hashbrown::HashMap;

use crate::area::{
    AreaChild, AreaTree, BlockArea, InlineKind, LineArea, LinkAnnotation, LinkTarget,
    ResolvedDestination, TextInline,
};
use crate::context::LayoutContext;
use crate::diag::{Diagnostic, DiagnosticSink, WarnCode};
use crate::linebreak::align::rejustify_line;

use super::IdEntry;

/// Runs the finalization pass over the whole tree.
pub(crate) fn finalize(
    ctx: &mut LayoutContext,
    tree: &mut AreaTree,
    id_map: &HashMap<String, IdEntry>,
) {
    for page_index in 0..tree.pages.len() {
        let page_number = tree.pages[page_index].number;
        let mut annotations: Vec<LinkAnnotation> = Vec::new();
        for block in &mut tree.pages[page_index].flow {
            patch_block(ctx, block, page_number, id_map, &mut annotations);
        }
        for absolute in &mut tree.pages[page_index].absolutes {
            patch_block(ctx, &mut absolute.content, page_number, id_map, &mut annotations);
        }
        for annotation in &mut annotations {
            resolve_target(ctx, &mut annotation.target, id_map);
        }
        tree.pages[page_index].links = annotations;
    }
}

fn patch_block(
    ctx: &mut LayoutContext,
    block: &mut BlockArea,
    page_number: u32,
    id_map: &HashMap<String, IdEntry>,
    annotations: &mut Vec<LinkAnnotation>,
) {
    for child in &mut block.children {
        match child {
            AreaChild::Block(inner) => {
                patch_block(ctx, inner, page_number, id_map, annotations);
            }
            AreaChild::Line(line) => {
                patch_line(ctx, line, page_number, id_map);
                collect_links(line, annotations);
            }
            AreaChild::Table(table) => {
                for row in table
                    .header
                    .iter_mut()
                    .chain(&mut table.body)
                    .chain(&mut table.footer)
                {
                    for cell in &mut row.cells {
                        patch_block(ctx, &mut cell.content, page_number, id_map, annotations);
                    }
                }
            }
            AreaChild::Image(_) => {}
        }
    }
}

/// Replaces placeholder inlines on one line and re-justifies it when a
/// width changed.
fn patch_line(
    ctx: &mut LayoutContext,
    line: &mut LineArea,
    page_number: u32,
    id_map: &HashMap<String, IdEntry>,
) {
    let mut dirty = false;
    for inline in &mut line.inlines {
        let (ref_id, font, size, color) = match &inline.kind {
            InlineKind::PageRef {
                ref_id,
                font,
                size,
                color,
            } => (ref_id.clone(), *font, *size, *color),
            _ => continue,
        };
        let number = if ref_id.is_empty() {
            page_number
        } else if let Some(entry) = id_map.get(ref_id.as_str()) {
            entry.page_number
        } else {
            ctx.diag.warn(Diagnostic {
                code: WarnCode::UnresolvedReference,
                message: format!("no area with id {ref_id:?}; page number defaults to 0"),
                location: Some(ref_id),
            });
            0
        };
        let text = number.to_string();
        let width = ctx.measure_plain(font, size, &text);
        if !crate::util::nearly_eq(width, inline.rect.width) {
            dirty = true;
        }
        inline.kind = InlineKind::Text(TextInline {
            text,
            font,
            size,
            color,
            underline: false,
            line_through: false,
            letter_spacing: 0.0,
        });
        inline.rect.width = width;
    }
    if dirty {
        let direction = line.direction;
        rejustify_line(line, direction);
    }
}

/// Merges consecutive inlines sharing a link target into annotations.
fn collect_links(line: &LineArea, annotations: &mut Vec<LinkAnnotation>) {
    let mut current: Option<LinkAnnotation> = None;
    for inline in &line.inlines {
        match (&inline.link, &mut current) {
            (Some(target), Some(annotation)) if annotation.target == *target => {
                annotation.rect = annotation.rect.union(&inline.rect);
            }
            (Some(target), slot) => {
                if let Some(done) = slot.take() {
                    annotations.push(done);
                }
                *slot = Some(LinkAnnotation {
                    rect: inline.rect,
                    target: target.clone(),
                });
            }
            (None, slot) => {
                if let Some(done) = slot.take() {
                    annotations.push(done);
                }
            }
        }
    }
    if let Some(done) = current {
        annotations.push(done);
    }
}

fn resolve_target(
    ctx: &mut LayoutContext,
    target: &mut LinkTarget,
    id_map: &HashMap<String, IdEntry>,
) {
    let LinkTarget::Internal { id, resolved } = target else {
        return;
    };
    match id_map.get(id.as_str()) {
        Some(entry) => {
            *resolved = Some(ResolvedDestination {
                page_index: entry.page_index,
                y: entry.y,
            });
        }
        None => ctx.diag.warn(Diagnostic {
            code: WarnCode::UnresolvedReference,
            message: format!("link destination {id:?} does not exist"),
            location: Some(id.clone()),
        }),
    }
}
