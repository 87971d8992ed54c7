// Copyright 2025 the Folium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Splitting block and table areas at a page boundary.
//!
//! All rects here are in fragment space: the fragment's top is y = 0 and
//! `cut` is the available height on the current page. A split produces a
//! top part that stays and a rest part re-normalized to y = 0.

use crate::area::{AreaChild, BlockArea, TableArea};
use crate::style::Keep;

/// The outcome of trying to place a fragment into `avail` height.
#[derive(Debug, Clone)]
pub(crate) enum Placement {
    /// Fits entirely.
    Fits,
    /// Split: place the first part, carry the second to the next page.
    Split(SplitContent, SplitContent),
    /// Does not fit and may not split; try again on a fresh page.
    Move,
}

#[derive(Debug, Clone)]
pub(crate) enum SplitContent {
    Block(BlockArea),
    Table(TableArea),
}

/// Decides placement for a block area. `always` keeps are atomic; integer
/// strengths prefer moving whole but yield once the block has a page to
/// itself and still cannot fit.
pub(crate) fn place_block(
    block: &BlockArea,
    avail: f32,
    widows: u32,
    orphans: u32,
    keep_together: Keep,
    page_is_empty: bool,
) -> Placement {
    if block.rect.height <= avail {
        return Placement::Fits;
    }
    if keep_together.is_always() || (keep_together.is_requested() && !page_is_empty) {
        return Placement::Move;
    }
    match split_block(block, avail, widows, orphans) {
        Some((top, rest)) => Placement::Split(SplitContent::Block(top), SplitContent::Block(rest)),
        None => Placement::Move,
    }
}

/// Splits a block at the boundary, refusing splits that would violate the
/// widow/orphan limits on its line children and recursing into a
/// straddling child block. The rest part is re-normalized so its content
/// starts at y = 0.
pub(crate) fn split_block(
    block: &BlockArea,
    cut: f32,
    widows: u32,
    orphans: u32,
) -> Option<(BlockArea, BlockArea)> {
    let (top, mut rest) = split_block_raw(block, cut, widows, orphans)?;
    let rest_top = rest
        .children
        .iter()
        .map(|c| c.rect().y)
        .fold(f32::INFINITY, f32::min);
    if rest_top.is_finite() {
        for child in &mut rest.children {
            child.translate_y(-rest_top);
        }
    }
    refit(&mut rest);
    Some((top, rest))
}

/// The recursive split. Every rect stays in the original (fragment)
/// coordinate space; the caller re-normalizes the rest part once.
fn split_block_raw(
    block: &BlockArea,
    cut: f32,
    widows: u32,
    orphans: u32,
) -> Option<(BlockArea, BlockArea)> {
    if block.children.is_empty() {
        return None;
    }

    // Index of the first child that does not fit above the cut.
    let boundary = block
        .children
        .iter()
        .position(|child| child.rect().bottom() > cut)?;

    let mut top_children: Vec<AreaChild> = block.children[..boundary].to_vec();
    let mut rest_children: Vec<AreaChild> = Vec::new();

    match &block.children[boundary] {
        AreaChild::Line(_) => {
            // Splitting inside a line run: the page must keep at least
            // `orphans` lines and the continuation must receive at least
            // `widows`. A boundary that cannot honor both moves the whole
            // block instead; the split is never shifted upward.
            let line_count = block
                .children
                .iter()
                .filter(|c| matches!(c, AreaChild::Line(_)))
                .count();
            let lines_before = top_children
                .iter()
                .filter(|c| matches!(c, AreaChild::Line(_)))
                .count();
            let lines_after = line_count - lines_before;
            if lines_before < orphans as usize || lines_after < widows as usize {
                return None;
            }
            rest_children.extend(block.children[boundary..].iter().cloned());
            if top_children.is_empty() || rest_children.is_empty() {
                return None;
            }
        }
        AreaChild::Block(child) => {
            // Recurse into the straddling child; coordinates are shared,
            // so the cut carries over unchanged.
            match split_block_raw(child, cut, widows, orphans) {
                Some((child_top, child_rest)) => {
                    top_children.push(AreaChild::Block(child_top));
                    rest_children.push(AreaChild::Block(child_rest));
                    rest_children.extend(block.children[boundary + 1..].iter().cloned());
                }
                None => {
                    if boundary == 0 {
                        return None;
                    }
                    rest_children.extend(block.children[boundary..].iter().cloned());
                }
            }
        }
        AreaChild::Table(_) | AreaChild::Image(_) => {
            // Atomic at this level: split before it.
            if boundary == 0 {
                return None;
            }
            rest_children.extend(block.children[boundary..].iter().cloned());
        }
    }

    if rest_children.is_empty() {
        return None;
    }

    let top_bottom = top_children
        .iter()
        .map(|c| c.rect().bottom())
        .fold(block.rect.y, f32::max);

    let mut top = BlockArea {
        rect: block.rect,
        background: block.background,
        borders: block.borders,
        children: top_children,
    };
    top.rect.height = top_bottom - block.rect.y;
    if let Some(borders) = &mut top.borders {
        borders.bottom.width = 0.0;
        borders.bottom.style = crate::style::BorderStyle::None;
    }

    let mut rest = BlockArea {
        rect: block.rect,
        background: block.background,
        borders: block.borders,
        children: rest_children,
    };
    if let Some(borders) = &mut rest.borders {
        borders.top.width = 0.0;
        borders.top.style = crate::style::BorderStyle::None;
    }

    Some((top, rest))
}

/// Recomputes rects bottom-up so each block wraps its children tightly.
fn refit(block: &mut BlockArea) {
    for child in &mut block.children {
        if let AreaChild::Block(inner) = child {
            refit(inner);
        }
    }
    let top = block
        .children
        .iter()
        .map(|c| c.rect().y)
        .fold(f32::INFINITY, f32::min);
    let bottom = block
        .children
        .iter()
        .map(|c| c.rect().bottom())
        .fold(0.0f32, f32::max);
    if top.is_finite() {
        block.rect.y = top;
        block.rect.height = (bottom - top).max(0.0);
    } else {
        block.rect.y = 0.0;
        block.rect.height = 0.0;
    }
}

/// Decides placement for a table: tables split between body rows; the
/// header repeats on the continuation and the footer stays with the end.
pub(crate) fn place_table(
    table: &TableArea,
    avail: f32,
    keep_together: Keep,
    page_is_empty: bool,
) -> Placement {
    if table.rect.height <= avail {
        return Placement::Fits;
    }
    if keep_together.is_always() || (keep_together.is_requested() && !page_is_empty) {
        return Placement::Move;
    }
    match split_table(table, avail) {
        Some((top, rest)) => Placement::Split(SplitContent::Table(top), SplitContent::Table(rest)),
        None => Placement::Move,
    }
}

pub(crate) fn split_table(table: &TableArea, cut: f32) -> Option<(TableArea, TableArea)> {
    // Rows that fit above the cut stay; no row is ever split.
    let fitting = table
        .body
        .iter()
        .take_while(|row| row.rect.bottom() <= cut)
        .count();
    if fitting == 0 || fitting == table.body.len() {
        return None;
    }

    let (top_rows, rest_rows) = table.body.split_at(fitting);
    let mut top = TableArea {
        rect: table.rect,
        background: table.background,
        borders: table.borders,
        column_widths: table.column_widths.clone(),
        header: table.header.clone(),
        body: top_rows.to_vec(),
        footer: Vec::new(),
    };
    top.rect.height = top_rows
        .last()
        .map(|row| row.rect.bottom() - table.rect.y)
        .unwrap_or(0.0);

    // The continuation repeats the header, then the remaining rows, then
    // the footer.
    let mut rest = TableArea {
        rect: table.rect,
        background: table.background,
        borders: table.borders,
        column_widths: table.column_widths.clone(),
        header: table.header.clone(),
        body: rest_rows.to_vec(),
        footer: table.footer.clone(),
    };
    let mut y = 0.0f32;
    for row in rest
        .header
        .iter_mut()
        .chain(rest.body.iter_mut())
        .chain(rest.footer.iter_mut())
    {
        let dy = y - row.rect.y;
        row.translate_y(dy);
        y += row.rect.height;
    }
    rest.rect.y = 0.0;
    rest.rect.height = y;

    Some((top, rest))
}

/// Counts the line children of a block, for diagnostics and tests.
#[cfg(test)]
pub(crate) fn count_lines(block: &BlockArea) -> usize {
    block
        .children
        .iter()
        .filter(|c| matches!(c, AreaChild::Line(_)))
        .count()
}
