// Copyright 2025 the Folium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Table layout: column width resolution, row/cell placement, and the two
//! border models.
//!
//! Column widths resolve in three passes: explicit point widths verbatim,
//! percentage widths against the table content width, and the remaining
//! width across auto columns proportionally to their content-max widths.

use crate::area::{AreaChild, BlockArea, CellArea, RowArea, TableArea};
use crate::context::LayoutContext;
use crate::diag::LayoutError;
use crate::fo::{FoKind, FoTree, NodeId};
use crate::geom::Rect;
use crate::resolve::resolve_style;
use crate::style::parse::parse_dim;
use crate::style::{BorderCollapse, BorderSide, Dim, Style};

pub(crate) fn layout_table(
    ctx: &mut LayoutContext,
    tree: &FoTree,
    node: NodeId,
    style: &Style,
    x: f32,
    avail_width: f32,
    gathered: &mut super::Gathered,
) -> Result<TableArea, LayoutError> {
    let table_width = style
        .width
        .resolve(avail_width)
        .unwrap_or(avail_width)
        .max(0.0);
    let border_widths = style.borders.widths();
    let spacing = match style.border_collapse {
        BorderCollapse::Separate => style.border_spacing,
        BorderCollapse::Collapse => 0.0,
    };

    // Row groups in document order.
    let mut header_rows = Vec::new();
    let mut body_rows = Vec::new();
    let mut footer_rows = Vec::new();
    let mut columns_spec: Vec<Dim> = Vec::new();
    for &child in tree.children(node) {
        match tree.kind(child) {
            FoKind::TableColumn => {
                let dim = tree
                    .property(child, "column-width")
                    .and_then(|value| parse_dim(value, style.font_size).ok())
                    .unwrap_or(Dim::Auto);
                columns_spec.push(dim);
            }
            FoKind::TableHeader => collect_rows(tree, child, &mut header_rows),
            FoKind::TableBody => collect_rows(tree, child, &mut body_rows),
            FoKind::TableFooter => collect_rows(tree, child, &mut footer_rows),
            FoKind::TableRow => body_rows.push(child),
            _ => {}
        }
    }

    let column_count = columns_spec.len().max(
        header_rows
            .iter()
            .chain(&body_rows)
            .chain(&footer_rows)
            .map(|&row| row_span_count(tree, row))
            .max()
            .unwrap_or(0),
    );
    columns_spec.resize(column_count, Dim::Auto);

    // The width available to columns after borders and spacing.
    let content_width = (table_width
        - border_widths.horizontal()
        - spacing * (column_count as f32 + 1.0))
        .max(0.0);
    let column_widths = distribute_columns(
        ctx,
        tree,
        style,
        &columns_spec,
        content_width,
        header_rows.iter().chain(&body_rows).chain(&footer_rows),
    );

    // Lay the groups out in document order.
    let mut y = border_widths.top + spacing;
    let mut layout_group = |ctx: &mut LayoutContext,
                            rows: &[NodeId],
                            y: &mut f32,
                            gathered: &mut super::Gathered|
     -> Result<Vec<RowArea>, LayoutError> {
        let mut areas = Vec::with_capacity(rows.len());
        for &row in rows {
            let area = layout_row(
                ctx,
                tree,
                row,
                style,
                x + border_widths.left,
                *y,
                &column_widths,
                spacing,
                gathered,
            )?;
            *y += area.rect.height + spacing;
            areas.push(area);
        }
        Ok(areas)
    };
    let header = layout_group(ctx, &header_rows, &mut y, gathered)?;
    let body = layout_group(ctx, &body_rows, &mut y, gathered)?;
    let footer = layout_group(ctx, &footer_rows, &mut y, gathered)?;

    let total_height = y + border_widths.bottom;
    let mut table = TableArea {
        rect: Rect::new(x, 0.0, table_width, total_height),
        background: style.background_color,
        borders: style.borders.is_visible().then_some(style.borders),
        column_widths,
        header,
        body,
        footer,
    };
    if style.border_collapse == BorderCollapse::Collapse {
        collapse_borders(&mut table);
    }
    Ok(table)
}

fn collect_rows(tree: &FoTree, group: NodeId, rows: &mut Vec<NodeId>) {
    for &child in tree.children(group) {
        if matches!(tree.kind(child), FoKind::TableRow) {
            rows.push(child);
        }
    }
}

fn cell_span(tree: &FoTree, cell: NodeId) -> usize {
    tree.property(cell, "number-columns-spanned")
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(1)
        .max(1)
}

fn row_span_count(tree: &FoTree, row: NodeId) -> usize {
    tree.children(row)
        .iter()
        .filter(|&&c| matches!(tree.kind(c), FoKind::TableCell))
        .map(|&c| cell_span(tree, c))
        .sum()
}

/// The three-pass column width distribution.
fn distribute_columns<'a>(
    ctx: &mut LayoutContext,
    tree: &FoTree,
    table_style: &Style,
    spec: &[Dim],
    content_width: f32,
    rows: impl Iterator<Item = &'a NodeId>,
) -> Vec<f32> {
    let mut widths = vec![0.0f32; spec.len()];
    let mut is_auto = vec![false; spec.len()];
    let mut assigned = 0.0f32;
    for (i, dim) in spec.iter().enumerate() {
        match dim {
            Dim::Pt(w) => {
                widths[i] = w.max(0.0);
                assigned += widths[i];
            }
            Dim::Percent(p) => {
                widths[i] = (content_width * p / 100.0).max(0.0);
                assigned += widths[i];
            }
            Dim::Auto => is_auto[i] = true,
        }
    }

    let auto_count = is_auto.iter().filter(|&&a| a).count();
    let remaining = (content_width - assigned).max(0.0);
    if auto_count > 0 {
        // Content-max width per auto column, from the widest cell content.
        let mut content_max = vec![0.0f32; spec.len()];
        for &row in rows {
            let mut column = 0usize;
            for &cell in tree.children(row) {
                if !matches!(tree.kind(cell), FoKind::TableCell) {
                    continue;
                }
                let span = cell_span(tree, cell);
                if span == 1 && column < spec.len() && is_auto[column] {
                    let natural = natural_cell_width(ctx, tree, cell, table_style);
                    content_max[column] = content_max[column].max(natural);
                }
                column += span;
            }
        }
        let total_max: f32 = content_max
            .iter()
            .zip(&is_auto)
            .filter(|(_, &a)| a)
            .map(|(&m, _)| m)
            .sum();
        for i in 0..spec.len() {
            if !is_auto[i] {
                continue;
            }
            widths[i] = if total_max > 0.0 {
                remaining * content_max[i] / total_max
            } else {
                remaining / auto_count as f32
            };
        }
    } else if assigned > 0.0 && !crate::util::nearly_eq(assigned, content_width) {
        // Over- or under-constrained with no auto columns: scale to fit.
        let scale = content_width / assigned;
        for width in &mut widths {
            *width *= scale;
        }
    }
    widths
}

/// Natural (unbroken) width of a cell's text content plus its padding.
fn natural_cell_width(
    ctx: &mut LayoutContext,
    tree: &FoTree,
    cell: NodeId,
    table_style: &Style,
) -> f32 {
    let style = resolve_style(tree, cell, table_style, 0.0, &mut ctx.diag);
    let mut text = String::new();
    gather_text(tree, cell, &mut text);
    let collapsed: Vec<&str> = text.split_whitespace().collect();
    let joined = collapsed.join(" ");
    let font = ctx.select_font(&style);
    let width = ctx.widths.measure(&ctx.fonts, font, style.font_size, &joined);
    width + style.padding.horizontal() + style.borders.widths().horizontal()
}

fn gather_text(tree: &FoTree, node: NodeId, out: &mut String) {
    if let FoKind::Text(text) = tree.kind(node) {
        out.push(' ');
        out.push_str(text);
    }
    for &child in tree.children(node) {
        gather_text(tree, child, out);
    }
}

/// Lays out one row at `y`; the row height is the tallest cell.
#[allow(clippy::too_many_arguments)]
fn layout_row(
    ctx: &mut LayoutContext,
    tree: &FoTree,
    row: NodeId,
    table_style: &Style,
    x: f32,
    y: f32,
    column_widths: &[f32],
    spacing: f32,
    gathered: &mut super::Gathered,
) -> Result<RowArea, LayoutError> {
    let row_style = resolve_style(tree, row, table_style, 0.0, &mut ctx.diag);
    let mut cells = Vec::new();
    let mut column = 0usize;
    let mut cell_x = x + spacing;
    let mut row_height = 0.0f32;

    for &cell in tree.children(row) {
        if !matches!(tree.kind(cell), FoKind::TableCell) {
            continue;
        }
        let span = cell_span(tree, cell);
        let end = (column + span).min(column_widths.len());
        let mut cell_width: f32 = if column < column_widths.len() {
            column_widths[column..end].iter().sum()
        } else {
            0.0
        };
        cell_width += spacing * span.saturating_sub(1) as f32;

        let cell_style = resolve_style(tree, cell, &row_style, cell_width, &mut ctx.diag);
        let cell_borders = cell_style.borders.widths();
        let inner_width =
            (cell_width - cell_style.padding.horizontal() - cell_borders.horizontal()).max(0.0);
        let inner_x = cell_x + cell_borders.left + cell_style.padding.left;

        let mut children = Vec::new();
        let mut cursor = cell_borders.top + cell_style.padding.top;
        if let Some(id) = &cell_style.id {
            gathered.ids.push((id.clone(), y));
        }
        for &content in tree.children(cell) {
            let content_style = resolve_style(tree, content, &cell_style, inner_width, &mut ctx.diag);
            match tree.kind(content) {
                FoKind::Block => {
                    let mut area = super::layout_block(
                        ctx,
                        tree,
                        content,
                        &content_style,
                        inner_x,
                        inner_width,
                        gathered,
                    )?;
                    area.translate_y(cursor);
                    cursor = area.rect.bottom();
                    children.push(AreaChild::Block(area));
                }
                _ => {}
            }
        }
        let content_height = cursor + cell_style.padding.bottom + cell_borders.bottom;
        row_height = row_height.max(content_height);

        cells.push(CellArea {
            rect: Rect::new(cell_x, y, cell_width, content_height),
            content: BlockArea {
                rect: Rect::new(cell_x, y, cell_width, content_height),
                background: cell_style.background_color,
                borders: cell_style.borders.is_visible().then_some(cell_style.borders),
                children,
            },
        });
        // Shift the cell's children into the row position.
        let delta = y;
        if let Some(last) = cells.last_mut() {
            for child in &mut last.content.children {
                child.translate_y(delta);
            }
        }
        cell_x += cell_width + spacing;
        column += span;
    }

    // Stretch every cell to the row height.
    for cell in &mut cells {
        cell.rect.height = row_height;
        cell.content.rect.height = row_height;
    }

    Ok(RowArea {
        rect: Rect::new(x, y, cell_x - x, row_height),
        cells,
    })
}

fn luminance(side: &BorderSide) -> f32 {
    0.299 * side.color[0] + 0.587 * side.color[1] + 0.114 * side.color[2]
}

/// True when `a` beats `b` under the collapse rules: wider wins, darker
/// breaks ties.
fn wins(a: &BorderSide, b: &BorderSide) -> bool {
    let (wa, wb) = (a.effective_width(), b.effective_width());
    if (wa - wb).abs() > f32::EPSILON {
        wa > wb
    } else {
        luminance(a) <= luminance(b)
    }
}

/// Deduplicates adjacent borders in the collapse model: the losing edge is
/// removed so the renderer draws each rule once.
fn collapse_borders(table: &mut TableArea) {
    let mut all_rows: Vec<&mut RowArea> = table
        .header
        .iter_mut()
        .chain(table.body.iter_mut())
        .chain(table.footer.iter_mut())
        .collect();

    // Horizontal neighbors within each row.
    for row in all_rows.iter_mut() {
        for i in 1..row.cells.len() {
            let (left, right) = row.cells.split_at_mut(i);
            let left_cell = left.last_mut().unwrap();
            let right_cell = right.first_mut().unwrap();
            let (Some(lb), Some(rb)) = (&mut left_cell.content.borders, &mut right_cell.content.borders)
            else {
                continue;
            };
            if wins(&lb.right, &rb.left) {
                rb.left.width = 0.0;
                rb.left.style = crate::style::BorderStyle::None;
            } else {
                lb.right.width = 0.0;
                lb.right.style = crate::style::BorderStyle::None;
            }
        }
    }

    // Vertical neighbors across consecutive rows.
    for i in 1..all_rows.len() {
        let (above, below) = all_rows.split_at_mut(i);
        let above_row = above.last_mut().unwrap();
        let below_row = below.first_mut().unwrap();
        for (top_cell, bottom_cell) in above_row.cells.iter_mut().zip(below_row.cells.iter_mut()) {
            let (Some(tb), Some(bb)) =
                (&mut top_cell.content.borders, &mut bottom_cell.content.borders)
            else {
                continue;
            };
            if wins(&tb.bottom, &bb.top) {
                bb.top.width = 0.0;
                bb.top.style = crate::style::BorderStyle::None;
            } else {
                tb.bottom.width = 0.0;
                tb.bottom.style = crate::style::BorderStyle::None;
            }
        }
    }
}
