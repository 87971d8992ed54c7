// Copyright 2025 the Folium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared helpers for the integration tests.

use crate::area::{AreaChild, AreaTree, BlockArea, InlineKind, LineArea, PageArea, TableArea};
use crate::context::LayoutContext;
use crate::fo::{FoKind, FoTree, NodeId};
use crate::options::LayoutOptions;

/// A document with one page master whose body region covers the full page.
pub(crate) fn doc(body_width: f32, body_height: f32) -> (FoTree, NodeId) {
    let mut tree = FoTree::new();
    let masters = tree.add_child(tree.root(), FoKind::LayoutMasterSet);
    let master = tree.add_child(masters, FoKind::SimplePageMaster);
    tree.set_property(master, "master-name", "main");
    tree.set_property(master, "page-width", &format!("{body_width}pt"));
    tree.set_property(master, "page-height", &format!("{body_height}pt"));
    tree.add_child(master, FoKind::RegionBody);
    let sequence = tree.add_child(tree.root(), FoKind::PageSequence);
    tree.set_property(sequence, "master-reference", "main");
    let flow = tree.add_child(sequence, FoKind::Flow);
    tree.set_property(flow, "flow-name", "xsl-region-body");
    (tree, flow)
}

pub(crate) fn layout(tree: &FoTree) -> (AreaTree, LayoutContext) {
    layout_with(tree, LayoutOptions::default())
}

pub(crate) fn layout_with(tree: &FoTree, options: LayoutOptions) -> (AreaTree, LayoutContext) {
    let mut ctx = LayoutContext::new(options);
    let area_tree = ctx.layout(tree).expect("layout failed");
    (area_tree, ctx)
}

/// Adds a block with text content and returns its node.
pub(crate) fn text_block(tree: &mut FoTree, flow: NodeId, text: &str) -> NodeId {
    let block = tree.add_child(flow, FoKind::Block);
    tree.add_text(block, text);
    block
}

fn collect_lines<'a>(block: &'a BlockArea, out: &mut Vec<&'a LineArea>) {
    for child in &block.children {
        match child {
            AreaChild::Line(line) => out.push(line),
            AreaChild::Block(inner) => collect_lines(inner, out),
            AreaChild::Table(table) => {
                for row in table.header.iter().chain(&table.body).chain(&table.footer) {
                    for cell in &row.cells {
                        collect_lines(&cell.content, out);
                    }
                }
            }
            AreaChild::Image(_) => {}
        }
    }
}

/// All line areas on a page.
pub(crate) fn page_lines(page: &PageArea) -> Vec<&LineArea> {
    let mut lines = Vec::new();
    for block in &page.flow {
        collect_lines(block, &mut lines);
    }
    lines
}

/// Reconstructs the visible text of a line: text inlines joined, space
/// inlines as single spaces.
pub(crate) fn line_text(line: &LineArea) -> String {
    let mut out = String::new();
    for inline in &line.inlines {
        match &inline.kind {
            InlineKind::Text(text) => out.push_str(&text.text),
            InlineKind::Space { .. } => out.push(' '),
            InlineKind::Leader { .. } => out.push('\u{2026}'),
            InlineKind::Graphic { .. } => out.push('\u{FFFC}'),
            InlineKind::PageRef { .. } => out.push('#'),
        }
    }
    out
}

/// The first table area on a page, if any.
pub(crate) fn first_table(page: &PageArea) -> Option<&TableArea> {
    for block in &page.flow {
        for child in &block.children {
            if let AreaChild::Table(table) = child {
                return Some(table);
            }
        }
    }
    None
}

/// Asserts that no placeholder inline survived finalization.
pub(crate) fn assert_no_page_refs(tree: &AreaTree) {
    for page in &tree.pages {
        for line in page_lines(page) {
            for inline in &line.inlines {
                assert!(
                    !matches!(inline.kind, InlineKind::PageRef { .. }),
                    "unpatched placeholder on page {}",
                    page.number
                );
            }
        }
    }
}
