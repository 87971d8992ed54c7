// Copyright 2025 the Folium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! List layout: items with a label column and an indented body sharing a
//! start edge.

use crate::area::{AreaChild, BlockArea};
use crate::context::LayoutContext;
use crate::diag::LayoutError;
use crate::fo::{FoKind, FoTree, NodeId};
use crate::geom::Rect;
use crate::resolve::resolve_style;
use crate::style::parse::parse_length;
use crate::style::Style;

const DEFAULT_DISTANCE: f32 = 24.0;
const DEFAULT_SEPARATION: f32 = 6.0;

fn length_property(tree: &FoTree, node: NodeId, name: &str, em: f32, default: f32) -> f32 {
    tree.property(node, name)
        .and_then(|value| parse_length(value, em, None).ok())
        .unwrap_or(default)
}

/// Lays out a `list-block`: one child block per item, each item a pair of
/// label and body blocks. The returned area is normalized to y = 0.
pub(crate) fn layout_list(
    ctx: &mut LayoutContext,
    tree: &FoTree,
    node: NodeId,
    style: &Style,
    x: f32,
    avail_width: f32,
    gathered: &mut super::Gathered,
) -> Result<BlockArea, LayoutError> {
    let distance = length_property(
        tree,
        node,
        "provisional-distance-between-starts",
        style.font_size,
        DEFAULT_DISTANCE,
    );
    let separation = length_property(
        tree,
        node,
        "provisional-label-separation",
        style.font_size,
        DEFAULT_SEPARATION,
    );
    // label-end() and body-start() in the common orientation.
    let label_width = (distance - separation).max(0.0);
    let body_x = x + distance;
    let body_width = (avail_width - distance).max(0.0);

    let mut items = Vec::new();
    let mut cursor = 0.0f32;
    let mut prev_space_after = 0.0f32;
    for &item in tree.children(node) {
        if !matches!(tree.kind(item), FoKind::ListItem) {
            continue;
        }
        let item_style = resolve_style(tree, item, style, avail_width, &mut ctx.diag);
        cursor += item_style.space_before.max(prev_space_after);
        if let Some(id) = &item_style.id {
            gathered.ids.push((id.clone(), cursor));
        }

        let mut label_area: Option<BlockArea> = None;
        let mut body_area: Option<BlockArea> = None;
        for &part in tree.children(item) {
            let part_style = resolve_style(tree, part, &item_style, avail_width, &mut ctx.diag);
            match tree.kind(part) {
                FoKind::ListItemLabel => {
                    label_area = Some(layout_part(
                        ctx,
                        tree,
                        part,
                        &part_style,
                        x,
                        label_width,
                        gathered,
                    )?);
                }
                FoKind::ListItemBody => {
                    body_area = Some(layout_part(
                        ctx,
                        tree,
                        part,
                        &part_style,
                        body_x,
                        body_width,
                        gathered,
                    )?);
                }
                _ => {}
            }
        }

        let height = label_area
            .as_ref()
            .map(|a| a.rect.height)
            .unwrap_or(0.0)
            .max(body_area.as_ref().map(|a| a.rect.height).unwrap_or(0.0));
        let mut children = Vec::new();
        if let Some(label) = label_area {
            children.push(AreaChild::Block(label));
        }
        if let Some(body) = body_area {
            children.push(AreaChild::Block(body));
        }
        let mut item_area = BlockArea {
            rect: Rect::new(x, 0.0, avail_width, height),
            background: item_style.background_color,
            borders: None,
            children,
        };
        item_area.translate_y(cursor);
        cursor += height;
        prev_space_after = item_style.space_after;
        items.push(AreaChild::Block(item_area));
    }

    Ok(BlockArea {
        rect: Rect::new(x, 0.0, avail_width, cursor),
        background: style.background_color,
        borders: style.borders.is_visible().then_some(style.borders),
        children: items,
    })
}

/// Lays out the blocks of a label or body at the given x and width.
fn layout_part(
    ctx: &mut LayoutContext,
    tree: &FoTree,
    part: NodeId,
    style: &Style,
    x: f32,
    width: f32,
    gathered: &mut super::Gathered,
) -> Result<BlockArea, LayoutError> {
    let mut children = Vec::new();
    let mut cursor = 0.0f32;
    for &child in tree.children(part) {
        let child_style = resolve_style(tree, child, style, width, &mut ctx.diag);
        if matches!(tree.kind(child), FoKind::Block) {
            let mut area = super::layout_block(ctx, tree, child, &child_style, x, width, gathered)?;
            area.translate_y(cursor);
            cursor = area.rect.bottom();
            children.push(AreaChild::Block(area));
        }
    }
    Ok(BlockArea {
        rect: Rect::new(x, 0.0, width, cursor),
        background: None,
        borders: None,
        children,
    })
}
