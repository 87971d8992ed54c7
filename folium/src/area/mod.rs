// Copyright 2025 the Folium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The area tree: the geometric output of layout.
//!
//! Pages hold block areas, block areas hold lines (or nested blocks, images
//! and tables), lines hold inline areas in visual order. Every coordinate is
//! in points with the origin at the top-left corner of the page. Once the
//! page breaker returns, the tree is plain immutable data; consumers (the
//! PDF renderer, the test harness) only read it.

use crate::geom::Rect;
use crate::shape::font::FontKey;
use crate::style::{Borders, Direction, LeaderPattern, Rgb, TextAlign};

/// The finished layout of a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AreaTree {
    pub pages: Vec<PageArea>,
}

/// One page viewport. Geometry is fixed at page creation.
#[derive(Debug, Clone, PartialEq)]
pub struct PageArea {
    pub width: f32,
    pub height: f32,
    /// One-based page number.
    pub number: u32,
    /// Normal-flow areas in document order, including static content and
    /// footnote areas.
    pub flow: Vec<BlockArea>,
    /// Absolutely positioned areas, sorted by `z_index` ascending.
    pub absolutes: Vec<AbsoluteArea>,
    pub links: Vec<LinkAnnotation>,
}

/// A rectangular stacking context with optional decoration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockArea {
    pub rect: Rect,
    pub background: Option<Rgb>,
    pub borders: Option<Borders>,
    pub children: Vec<AreaChild>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AreaChild {
    Block(BlockArea),
    Line(LineArea),
    Image(ImageArea),
    Table(TableArea),
}

/// One typographic line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineArea {
    pub rect: Rect,
    /// Absolute y of the text baseline.
    pub baseline: f32,
    /// Alignment the line was laid out with (after the last-line rule).
    pub align: TextAlign,
    /// Base direction of the paragraph the line belongs to.
    pub direction: Direction,
    /// Left edge and width of the box the line aligns within; kept so a
    /// finalization patch can re-align without re-breaking.
    pub content_x: f32,
    pub target_width: f32,
    /// Inline areas in visual order.
    pub inlines: Vec<InlineArea>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InlineArea {
    pub rect: Rect,
    pub kind: InlineKind,
    pub link: Option<LinkTarget>,
}

/// Style carried by a text inline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextInline {
    pub text: String,
    pub font: FontKey,
    pub size: f32,
    pub color: Rgb,
    pub underline: bool,
    pub line_through: bool,
    pub letter_spacing: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InlineKind {
    Text(TextInline),
    /// An inter-word gap. `natural` is the unadjusted width; the rect
    /// carries the justified width.
    Space { natural: f32 },
    Leader {
        pattern: LeaderPattern,
        thickness: f32,
        color: Rgb,
        font: FontKey,
        size: f32,
    },
    Graphic { source: String },
    /// Placeholder for a page-number-citation; patched during finalization.
    PageRef {
        ref_id: String,
        font: FontKey,
        size: f32,
        color: Rgb,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageArea {
    pub rect: Rect,
    pub source: String,
}

/// A table area: rows grouped by origin so continuation pages can repeat
/// the header.
#[derive(Debug, Clone, PartialEq)]
pub struct TableArea {
    pub rect: Rect,
    pub background: Option<Rgb>,
    pub borders: Option<Borders>,
    pub column_widths: Vec<f32>,
    pub header: Vec<RowArea>,
    pub body: Vec<RowArea>,
    pub footer: Vec<RowArea>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowArea {
    pub rect: Rect,
    pub cells: Vec<CellArea>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellArea {
    pub rect: Rect,
    pub content: BlockArea,
}

/// A block-container taken out of normal flow.
#[derive(Debug, Clone, PartialEq)]
pub struct AbsoluteArea {
    pub rect: Rect,
    pub z_index: i32,
    /// True for `absolute-position="fixed"`.
    pub fixed: bool,
    pub content: BlockArea,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LinkTarget {
    /// An internal destination; resolved during finalization.
    Internal {
        id: String,
        resolved: Option<ResolvedDestination>,
    },
    External(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedDestination {
    /// Zero-based index into [`AreaTree::pages`].
    pub page_index: usize,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinkAnnotation {
    pub rect: Rect,
    pub target: LinkTarget,
}

impl BlockArea {
    /// Shifts this area and everything below it vertically.
    pub(crate) fn translate_y(&mut self, dy: f32) {
        self.rect.translate_y(dy);
        for child in &mut self.children {
            child.translate_y(dy);
        }
    }
}

impl AreaChild {
    pub(crate) fn translate_y(&mut self, dy: f32) {
        match self {
            Self::Block(block) => block.translate_y(dy),
            Self::Line(line) => line.translate_y(dy),
            Self::Image(image) => image.rect.translate_y(dy),
            Self::Table(table) => table.translate_y(dy),
        }
    }

    pub(crate) fn rect(&self) -> Rect {
        match self {
            Self::Block(block) => block.rect,
            Self::Line(line) => line.rect,
            Self::Image(image) => image.rect,
            Self::Table(table) => table.rect,
        }
    }
}

impl LineArea {
    pub(crate) fn translate_y(&mut self, dy: f32) {
        self.rect.translate_y(dy);
        self.baseline += dy;
        for inline in &mut self.inlines {
            inline.rect.translate_y(dy);
        }
    }
}

impl TableArea {
    pub(crate) fn translate_y(&mut self, dy: f32) {
        self.rect.translate_y(dy);
        for row in self
            .header
            .iter_mut()
            .chain(&mut self.body)
            .chain(&mut self.footer)
        {
            row.translate_y(dy);
        }
    }
}

impl RowArea {
    pub(crate) fn translate_y(&mut self, dy: f32) {
        self.rect.translate_y(dy);
        for cell in &mut self.cells {
            cell.rect.translate_y(dy);
            cell.content.translate_y(dy);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_moves_whole_subtree() {
        let mut block = BlockArea {
            rect: Rect::new(0., 10., 100., 50.),
            children: vec![AreaChild::Line(LineArea {
                rect: Rect::new(0., 10., 100., 14.),
                baseline: 21.,
                align: TextAlign::Start,
                direction: Direction::Ltr,
                content_x: 0.,
                target_width: 100.,
                inlines: vec![InlineArea {
                    rect: Rect::new(0., 10., 40., 14.),
                    kind: InlineKind::Space { natural: 3. },
                    link: None,
                }],
            })],
            ..Default::default()
        };
        block.translate_y(5.);
        assert_eq!(block.rect.y, 15.);
        let AreaChild::Line(line) = &block.children[0] else {
            panic!("expected line child");
        };
        assert_eq!(line.rect.y, 15.);
        assert_eq!(line.baseline, 26.);
        assert_eq!(line.inlines[0].rect.y, 15.);
    }
}
