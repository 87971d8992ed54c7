// Copyright 2025 the Folium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Block-level layout: blocks, tables, lists, graphics, floats and
//! absolutely positioned containers become positioned areas.
//!
//! The flow layouter produces a stream of [`Fragment`]s, each a laid-out
//! top-level area normalized to y = 0 plus the metadata the page breaker
//! needs: break and keep constraints, widow/orphan limits, collected ids,
//! footnotes, markers and out-of-flow areas.

pub(crate) mod graphic;
pub(crate) mod list;
pub(crate) mod para;
pub(crate) mod table;

use crate::area::{AbsoluteArea, AreaChild, BlockArea, ImageArea};
use crate::context::LayoutContext;
use crate::diag::{Diagnostic, DiagnosticSink, LayoutError, WarnCode};
use crate::fo::{FoKind, FoTree, NodeId};
use crate::geom::Rect;
use crate::resolve::resolve_style;
use crate::style::{AbsolutePosition, BreakRule, Dim, Keep, Style};

/// Default width of a float lacking an explicit one: `min(200pt, body/3)`.
fn default_float_width(body_width: f32) -> f32 {
    (body_width / 3.0).min(200.0)
}

/// A marker definition carried to the page breaker for retrieve-marker.
#[derive(Debug, Clone)]
pub(crate) struct MarkerDef {
    pub class: String,
    pub node: NodeId,
    /// Style context the marker contents inherit.
    pub style: Style,
}

/// Everything collected while laying out one top-level flow child.
#[derive(Debug, Clone, Default)]
pub(crate) struct Gathered {
    /// `(id, y offset within the fragment)`.
    pub ids: Vec<(String, f32)>,
    pub footnotes: Vec<BlockArea>,
    pub absolutes: Vec<AbsoluteArea>,
    pub markers: Vec<MarkerDef>,
}

/// The laid-out area of a fragment.
#[derive(Debug, Clone)]
pub(crate) enum FragmentContent {
    Block(BlockArea),
    Table(crate::area::TableArea),
}

impl FragmentContent {
    pub(crate) fn height(&self) -> f32 {
        match self {
            Self::Block(block) => block.rect.height,
            Self::Table(table) => table.rect.height,
        }
    }
}

/// One top-level flow child, laid out at the region width and normalized
/// to y = 0, with the policies the page breaker applies.
#[derive(Debug, Clone)]
pub(crate) struct Fragment {
    pub content: FragmentContent,
    pub break_before: BreakRule,
    pub break_after: BreakRule,
    pub keep_together: Keep,
    pub keep_with_next: Keep,
    pub keep_with_previous: Keep,
    pub widows: u32,
    pub orphans: u32,
    pub space_before: f32,
    pub space_after: f32,
    pub gathered: Gathered,
}

impl Fragment {
    pub(crate) fn height(&self) -> f32 {
        self.content.height()
    }
}

/// Lays out the children of a `flow` (or `static-content`) into fragments.
pub(crate) fn layout_flow(
    ctx: &mut LayoutContext,
    tree: &FoTree,
    flow: NodeId,
    region_width: f32,
    inherited: &Style,
) -> Result<Vec<Fragment>, LayoutError> {
    let mut fragments = Vec::new();
    for &child in tree.children(flow) {
        layout_flow_child(ctx, tree, child, region_width, inherited, &mut fragments)?;
    }
    Ok(fragments)
}

fn layout_flow_child(
    ctx: &mut LayoutContext,
    tree: &FoTree,
    node: NodeId,
    region_width: f32,
    inherited: &Style,
    fragments: &mut Vec<Fragment>,
) -> Result<(), LayoutError> {
    let mut style = resolve_style(tree, node, inherited, region_width, &mut ctx.diag);
    if matches!(tree.kind(node), FoKind::Block) {
        // Only block-containers leave the normal flow.
        style.absolute_position = AbsolutePosition::Auto;
    }
    let mut gathered = Gathered::default();
    let content = match tree.kind(node) {
        FoKind::Block | FoKind::BlockContainer
            if style.absolute_position == AbsolutePosition::Auto =>
        {
            let area = layout_block(ctx, tree, node, &style, 0.0, region_width, &mut gathered)?;
            Some(FragmentContent::Block(area))
        }
        FoKind::BlockContainer => {
            let absolute = layout_absolute(ctx, tree, node, &style, region_width)?;
            gathered.absolutes.push(absolute);
            None
        }
        FoKind::Table => {
            let area = table::layout_table(ctx, tree, node, &style, 0.0, region_width, &mut gathered)?;
            Some(FragmentContent::Table(area))
        }
        FoKind::ListBlock => {
            let area = list::layout_list(ctx, tree, node, &style, 0.0, region_width, &mut gathered)?;
            Some(FragmentContent::Block(area))
        }
        FoKind::ExternalGraphic => {
            let area = layout_graphic_block(ctx, tree, node, &style, 0.0, region_width)?;
            area.map(FragmentContent::Block)
        }
        FoKind::Float => {
            let area = layout_float(ctx, tree, node, &style, region_width, &mut gathered)?;
            Some(FragmentContent::Block(area))
        }
        FoKind::Marker => {
            if let Some(class) = tree.property(node, "marker-class-name") {
                gathered.markers.push(MarkerDef {
                    class: class.to_owned(),
                    node,
                    style: inherited.clone(),
                });
            }
            None
        }
        FoKind::Text(text) if text.trim().is_empty() => None,
        other => {
            ctx.diag.warn(Diagnostic {
                code: WarnCode::UnsupportedFeature,
                message: format!("{other:?} is not allowed at flow level; skipping"),
                location: style.id.clone(),
            });
            None
        }
    };

    let Some(content) = content else {
        if !gathered.ids.is_empty()
            || !gathered.footnotes.is_empty()
            || !gathered.absolutes.is_empty()
            || !gathered.markers.is_empty()
        {
            // Out-of-flow content with no in-flow area rides on an empty
            // fragment so the page breaker still sees it.
            fragments.push(empty_fragment(&style, gathered));
        }
        return Ok(());
    };

    if let Some(id) = &style.id {
        gathered.ids.push((id.clone(), 0.0));
    }
    fragments.push(Fragment {
        content,
        break_before: style.break_before,
        break_after: style.break_after,
        keep_together: style.keep_together,
        keep_with_next: style.keep_with_next,
        keep_with_previous: style.keep_with_previous,
        widows: style.widows.max(ctx.options.widows),
        orphans: style.orphans.max(ctx.options.orphans),
        space_before: style.space_before,
        space_after: style.space_after,
        gathered,
    });
    Ok(())
}

fn empty_fragment(style: &Style, gathered: Gathered) -> Fragment {
    Fragment {
        content: FragmentContent::Block(BlockArea::default()),
        break_before: BreakRule::Auto,
        break_after: BreakRule::Auto,
        keep_together: Keep::Auto,
        keep_with_next: Keep::Auto,
        keep_with_previous: Keep::Auto,
        widows: style.widows,
        orphans: style.orphans,
        space_before: 0.0,
        space_after: 0.0,
        gathered,
    }
}

/// Lays out one block (and its descendants) at `x` within `avail_width`.
/// The returned area's rect is the border box, normalized to y = 0.
pub(crate) fn layout_block(
    ctx: &mut LayoutContext,
    tree: &FoTree,
    node: NodeId,
    style: &Style,
    x: f32,
    avail_width: f32,
    gathered: &mut Gathered,
) -> Result<BlockArea, LayoutError> {
    let border_widths = style.borders.widths();
    let outer_x = x + style.margin.left + style.start_indent;
    let border_box_width = (avail_width
        - style.margin.horizontal()
        - style.start_indent
        - style.end_indent)
        .max(0.0);
    let border_box_width = style
        .width
        .resolve(avail_width)
        .unwrap_or(border_box_width)
        .max(0.0);
    let content_width =
        (border_box_width - border_widths.horizontal() - style.padding.horizontal()).max(0.0);
    let content_x = outer_x + border_widths.left + style.padding.left;
    let content_top = border_widths.top + style.padding.top;

    let mut children: Vec<AreaChild> = Vec::new();
    let mut cursor = content_top;
    let mut prev_space_after: f32 = 0.0;
    let mut first_paragraph = true;

    // Partition children into runs of inline-level content (paragraphs)
    // and block-level children.
    let mut inline_run: Vec<NodeId> = Vec::new();
    let child_ids: Vec<NodeId> = tree.children(node).to_vec();
    for (position, &child) in child_ids.iter().enumerate() {
        let is_last = position + 1 == child_ids.len();
        if is_inline_level(tree, child) {
            inline_run.push(child);
            if !is_last {
                continue;
            }
        }
        if !inline_run.is_empty() {
            let indent = if first_paragraph { style.text_indent } else { 0.0 };
            let ids_before = gathered.ids.len();
            let paragraph_top = cursor;
            let lines = para::layout_paragraph(
                ctx,
                tree,
                &inline_run,
                style,
                content_x,
                content_width,
                indent,
                cursor,
                gathered,
            )?;
            for (_, id_y) in &mut gathered.ids[ids_before..] {
                *id_y += paragraph_top;
            }
            for line in lines {
                cursor = line.rect.bottom().max(cursor);
                children.push(AreaChild::Line(line));
            }
            inline_run.clear();
            first_paragraph = false;
            prev_space_after = 0.0;
        }
        if is_inline_level(tree, child) {
            continue;
        }

        let mut child_style = resolve_style(tree, child, style, content_width, &mut ctx.diag);
        if matches!(tree.kind(child), FoKind::Block) {
            child_style.absolute_position = AbsolutePosition::Auto;
        }
        let area = match tree.kind(child) {
            FoKind::Block | FoKind::BlockContainer
                if child_style.absolute_position == AbsolutePosition::Auto =>
            {
                let space = child_style.space_before.max(prev_space_after);
                cursor += space;
                let ids_before = gathered.ids.len();
                let mut area = layout_block(
                    ctx,
                    tree,
                    child,
                    &child_style,
                    content_x,
                    content_width,
                    gathered,
                )?;
                for (_, id_y) in &mut gathered.ids[ids_before..] {
                    *id_y += cursor;
                }
                if let Some(id) = &child_style.id {
                    gathered.ids.push((id.clone(), cursor));
                }
                area.translate_y(cursor);
                cursor = area.rect.bottom();
                prev_space_after = child_style.space_after;
                Some(AreaChild::Block(area))
            }
            FoKind::BlockContainer => {
                let absolute = layout_absolute(ctx, tree, child, &child_style, content_width)?;
                gathered.absolutes.push(absolute);
                None
            }
            FoKind::Table => {
                let space = child_style.space_before.max(prev_space_after);
                cursor += space;
                let ids_before = gathered.ids.len();
                let mut area = table::layout_table(
                    ctx,
                    tree,
                    child,
                    &child_style,
                    content_x,
                    content_width,
                    gathered,
                )?;
                for (_, id_y) in &mut gathered.ids[ids_before..] {
                    *id_y += cursor;
                }
                area.translate_y(cursor);
                cursor = area.rect.bottom();
                prev_space_after = child_style.space_after;
                Some(AreaChild::Table(area))
            }
            FoKind::ListBlock => {
                let space = child_style.space_before.max(prev_space_after);
                cursor += space;
                let ids_before = gathered.ids.len();
                let mut area = list::layout_list(
                    ctx,
                    tree,
                    child,
                    &child_style,
                    content_x,
                    content_width,
                    gathered,
                )?;
                for (_, id_y) in &mut gathered.ids[ids_before..] {
                    *id_y += cursor;
                }
                area.translate_y(cursor);
                cursor = area.rect.bottom();
                prev_space_after = child_style.space_after;
                Some(AreaChild::Block(area))
            }
            FoKind::ExternalGraphic => {
                let block =
                    layout_graphic_block(ctx, tree, child, &child_style, content_x, content_width)?;
                block.map(|mut area| {
                    let space = child_style.space_before.max(prev_space_after);
                    cursor += space;
                    area.translate_y(cursor);
                    cursor = area.rect.bottom();
                    prev_space_after = child_style.space_after;
                    AreaChild::Block(area)
                })
            }
            FoKind::Float => {
                let mut area =
                    layout_float(ctx, tree, child, &child_style, content_width, gathered)?;
                area.translate_y(cursor);
                cursor = area.rect.bottom();
                Some(AreaChild::Block(area))
            }
            FoKind::Marker => {
                if let Some(class) = tree.property(child, "marker-class-name") {
                    gathered.markers.push(MarkerDef {
                        class: class.to_owned(),
                        node: child,
                        style: style.clone(),
                    });
                }
                None
            }
            other => {
                ctx.diag.warn(Diagnostic {
                    code: WarnCode::UnsupportedFeature,
                    message: format!("{other:?} inside a block is not supported; skipping"),
                    location: child_style.id.clone(),
                });
                None
            }
        };
        if let Some(area) = area {
            children.push(area);
        }
    }

    let content_height = (cursor - content_top).max(0.0);
    let auto_height = content_top + content_height + border_widths.bottom + style.padding.bottom;
    // Percentage heights have no resolvable base here and fall back to auto.
    let height = match style.height {
        Dim::Pt(h) => h.max(0.0),
        _ => auto_height,
    };

    Ok(BlockArea {
        rect: Rect::new(outer_x, 0.0, border_box_width, height),
        background: style.background_color,
        borders: style.borders.is_visible().then_some(style.borders),
        children,
    })
}

pub(crate) fn is_inline_level(tree: &FoTree, node: NodeId) -> bool {
    matches!(
        tree.kind(node),
        FoKind::Text(_)
            | FoKind::Inline
            | FoKind::Character
            | FoKind::Leader
            | FoKind::PageNumber
            | FoKind::PageNumberCitation
            | FoKind::BasicLink
            | FoKind::Footnote
            | FoKind::RetrieveMarker
    )
}

/// Lays out an external-graphic in block context.
fn layout_graphic_block(
    ctx: &mut LayoutContext,
    tree: &FoTree,
    node: NodeId,
    style: &Style,
    x: f32,
    avail_width: f32,
) -> Result<Option<BlockArea>, LayoutError> {
    let Some(size) = graphic::resolve_graphic(ctx, tree, node, style)? else {
        return Ok(None);
    };
    let width = size.width.min(avail_width);
    let height = if width < size.width {
        size.height * width / size.width
    } else {
        size.height
    };
    let image = ImageArea {
        rect: Rect::new(x, 0.0, width, height),
        source: size.source,
    };
    Ok(Some(BlockArea {
        rect: Rect::new(x, 0.0, width, height),
        background: None,
        borders: None,
        children: vec![AreaChild::Image(image)],
    }))
}

/// Lays out a float: its content at the float width, registered as a
/// full-width break in the normal flow (the conservative policy).
fn layout_float(
    ctx: &mut LayoutContext,
    tree: &FoTree,
    node: NodeId,
    style: &Style,
    avail_width: f32,
    gathered: &mut Gathered,
) -> Result<BlockArea, LayoutError> {
    let float_width = style
        .width
        .resolve(avail_width)
        .unwrap_or_else(|| default_float_width(avail_width));
    let side_end = matches!(tree.property(node, "float"), Some("end" | "right"));
    let x = if side_end { avail_width - float_width } else { 0.0 };

    let mut inner_children = Vec::new();
    let mut cursor = 0.0f32;
    for &child in tree.children(node) {
        let child_style = resolve_style(tree, child, style, float_width, &mut ctx.diag);
        if matches!(tree.kind(child), FoKind::Block) {
            let mut area =
                layout_block(ctx, tree, child, &child_style, x, float_width, gathered)?;
            area.translate_y(cursor);
            cursor = area.rect.bottom();
            inner_children.push(AreaChild::Block(area));
        }
    }
    Ok(BlockArea {
        rect: Rect::new(x, 0.0, float_width, cursor),
        background: style.background_color,
        borders: style.borders.is_visible().then_some(style.borders),
        children: inner_children,
    })
}

/// Lays out an absolutely positioned block-container.
fn layout_absolute(
    ctx: &mut LayoutContext,
    tree: &FoTree,
    node: NodeId,
    style: &Style,
    region_width: f32,
) -> Result<AbsoluteArea, LayoutError> {
    let x = style.left.resolve(region_width).unwrap_or(0.0);
    let y = style.top.resolve(region_width).unwrap_or(0.0);
    let width = style
        .width
        .resolve(region_width)
        .unwrap_or(region_width - x);

    let mut gathered = Gathered::default();
    let mut content = BlockArea::default();
    let mut cursor = 0.0f32;
    for &child in tree.children(node) {
        let child_style = resolve_style(tree, child, style, width, &mut ctx.diag);
        if matches!(tree.kind(child), FoKind::Block) {
            let mut area = layout_block(ctx, tree, child, &child_style, x, width, &mut gathered)?;
            area.translate_y(y + cursor);
            cursor += area.rect.height;
            content.children.push(AreaChild::Block(area));
        }
    }
    let height = match style.height {
        Dim::Pt(h) => h.max(0.0),
        _ => cursor,
    };
    content.rect = Rect::new(x, y, width, height);
    content.background = style.background_color;
    content.borders = style.borders.is_visible().then_some(style.borders);
    Ok(AbsoluteArea {
        rect: content.rect,
        z_index: style.z_index,
        fixed: style.absolute_position == AbsolutePosition::Fixed,
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_default_width_rule() {
        assert_eq!(default_float_width(900.0), 200.0);
        assert_eq!(default_float_width(300.0), 100.0);
    }

    #[test]
    fn dim_resolution_in_blocks() {
        assert_eq!(Dim::Percent(50.0).resolve(400.0), Some(200.0));
        assert_eq!(Dim::Auto.resolve(400.0), None);
    }
}
