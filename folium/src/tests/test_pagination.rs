// Copyright 2025 the Folium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page breaking: forced breaks, parity pages, keeps and error cases.

use super::utils::{doc, layout, page_lines, text_block};
use crate::diag::LayoutError;
use crate::fo::{FoKind, FoTree};
use crate::context::LayoutContext;

#[test]
fn break_before_page_starts_a_new_page() {
    let (mut tree, flow) = doc(200.0, 200.0);
    text_block(&mut tree, flow, "first page");
    let second = text_block(&mut tree, flow, "second page");
    tree.set_property(second, "break-before", "page");

    let (area_tree, _) = layout(&tree);
    assert_eq!(area_tree.pages.len(), 2);
    assert_eq!(area_tree.pages[0].number, 1);
    assert_eq!(area_tree.pages[1].number, 2);
    assert_eq!(page_lines(&area_tree.pages[0]).len(), 1);
    assert_eq!(page_lines(&area_tree.pages[1]).len(), 1);
}

#[test]
fn odd_page_break_inserts_a_blank_page() {
    let (mut tree, flow) = doc(200.0, 200.0);
    text_block(&mut tree, flow, "page one");
    let chapter = text_block(&mut tree, flow, "chapter on an odd page");
    tree.set_property(chapter, "break-before", "odd-page");

    let (area_tree, _) = layout(&tree);
    assert_eq!(area_tree.pages.len(), 3);
    // The blank filler page carries no flow content.
    assert!(page_lines(&area_tree.pages[1]).is_empty());
    assert_eq!(area_tree.pages[2].number, 3);
    assert_eq!(page_lines(&area_tree.pages[2]).len(), 1);
}

#[test]
fn break_after_behaves_like_break_before_of_the_next() {
    let (mut tree, flow) = doc(200.0, 200.0);
    let first = text_block(&mut tree, flow, "first");
    tree.set_property(first, "break-after", "page");
    text_block(&mut tree, flow, "second");

    let (area_tree, _) = layout(&tree);
    assert_eq!(area_tree.pages.len(), 2);
}

#[test]
fn keep_with_next_pulls_the_heading_forward() {
    // Filler, then a one-line heading kept with a ten-line paragraph that
    // cannot follow it on the page.
    let (mut tree, flow) = doc(60.0, 120.0);
    let filler = tree.add_child(flow, FoKind::Block);
    tree.set_property(filler, "height", "100pt");
    let heading = text_block(&mut tree, flow, "head");
    tree.set_property(heading, "font-family", "Courier");
    tree.set_property(heading, "font-size", "12pt");
    tree.set_property(heading, "keep-with-next", "always");
    let words = vec!["xxxx"; 10].join(" ");
    let body = text_block(&mut tree, flow, &words);
    tree.set_property(body, "font-family", "Courier");
    tree.set_property(body, "font-size", "12pt");

    let (area_tree, _) = layout(&tree);
    assert_eq!(area_tree.pages.len(), 3);
    // Page one keeps only the filler; the heading moved with its text.
    assert!(page_lines(&area_tree.pages[0]).is_empty());
    let second = page_lines(&area_tree.pages[1]);
    assert_eq!(super::utils::line_text(second[0]), "head");
    // Heading plus seven paragraph lines fill page two; the rest follow.
    assert_eq!(second.len(), 8);
    assert_eq!(page_lines(&area_tree.pages[2]).len(), 3);
}

#[test]
fn keep_together_moves_block_whole() {
    let (mut tree, flow) = doc(60.0, 120.0);
    let filler = tree.add_child(flow, FoKind::Block);
    tree.set_property(filler, "height", "60pt");
    let words = vec!["xxxx"; 5].join(" ");
    let block = text_block(&mut tree, flow, &words);
    tree.set_property(block, "font-family", "Courier");
    tree.set_property(block, "font-size", "12pt");
    tree.set_property(block, "keep-together", "always");

    let (area_tree, _) = layout(&tree);
    // Five lines (72pt) fit a fresh page but not after the filler.
    assert_eq!(area_tree.pages.len(), 2);
    assert!(page_lines(&area_tree.pages[0]).is_empty());
    assert_eq!(page_lines(&area_tree.pages[1]).len(), 5);
}

#[test]
fn missing_master_is_fatal() {
    let mut tree = FoTree::new();
    let masters = tree.add_child(tree.root(), FoKind::LayoutMasterSet);
    let master = tree.add_child(masters, FoKind::SimplePageMaster);
    tree.set_property(master, "master-name", "main");
    tree.add_child(master, FoKind::RegionBody);
    let sequence = tree.add_child(tree.root(), FoKind::PageSequence);
    tree.set_property(sequence, "master-reference", "nonexistent");
    let flow = tree.add_child(sequence, FoKind::Flow);
    text_block(&mut tree, flow, "text");

    let mut ctx = LayoutContext::default();
    let err = ctx.layout(&tree).unwrap_err();
    assert_eq!(err, LayoutError::MissingPageMaster("nonexistent".into()));
}

#[test]
fn zero_region_is_fatal() {
    let mut tree = FoTree::new();
    let masters = tree.add_child(tree.root(), FoKind::LayoutMasterSet);
    let master = tree.add_child(masters, FoKind::SimplePageMaster);
    tree.set_property(master, "master-name", "main");
    tree.set_property(master, "page-width", "100pt");
    tree.set_property(master, "page-height", "100pt");
    tree.set_property(master, "margin", "60pt");
    tree.add_child(master, FoKind::RegionBody);
    let sequence = tree.add_child(tree.root(), FoKind::PageSequence);
    tree.set_property(sequence, "master-reference", "main");
    let flow = tree.add_child(sequence, FoKind::Flow);
    text_block(&mut tree, flow, "text");

    let mut ctx = LayoutContext::default();
    let err = ctx.layout(&tree).unwrap_err();
    assert!(matches!(err, LayoutError::ZeroRegion { .. }));
}

#[test]
fn document_without_sequences_is_fatal() {
    let tree = FoTree::new();
    let mut ctx = LayoutContext::default();
    assert!(matches!(
        ctx.layout(&tree),
        Err(LayoutError::MalformedTree(_))
    ));
}

#[test]
fn sequences_continue_page_numbering() {
    let (mut tree, flow) = doc(200.0, 200.0);
    text_block(&mut tree, flow, "sequence one");
    // A second sequence over the same master.
    let root = tree.root();
    let sequence = tree.add_child(root, FoKind::PageSequence);
    tree.set_property(sequence, "master-reference", "main");
    let flow2 = tree.add_child(sequence, FoKind::Flow);
    tree.set_property(flow2, "flow-name", "xsl-region-body");
    text_block(&mut tree, flow2, "sequence two");

    let (area_tree, _) = layout(&tree);
    assert_eq!(area_tree.pages.len(), 2);
    assert_eq!(area_tree.pages[0].number, 1);
    assert_eq!(area_tree.pages[1].number, 2);
}

#[test]
fn oversized_block_overflows_instead_of_looping() {
    let (mut tree, flow) = doc(60.0, 30.0);
    let words = vec!["xxxx"; 4].join(" ");
    let block = text_block(&mut tree, flow, &words);
    tree.set_property(block, "font-family", "Courier");
    tree.set_property(block, "keep-together", "always");

    let (area_tree, _) = layout(&tree);
    // Four lines cannot fit a 30pt page even alone; the block is placed
    // with overflow rather than spinning.
    assert_eq!(area_tree.pages.len(), 1);
    assert_eq!(page_lines(&area_tree.pages[0]).len(), 4);
}
