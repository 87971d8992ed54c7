// Copyright 2025 the Folium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end scenarios: line breaking, justification, widow control,
//! table pagination, inheritance and forward references.

use super::utils::{
    assert_no_page_refs, doc, first_table, layout, layout_with, line_text, page_lines, text_block,
};
use crate::area::{AreaChild, InlineKind, LinkTarget};
use crate::fo::FoKind;
use crate::options::LayoutOptions;
use crate::shape::font::{BuiltinFace, FontKey};
use crate::style::TextAlign;

const FOX: &str = "The quick brown fox jumps over the lazy dog.";

#[test]
fn greedy_break_in_narrow_column() {
    let (mut tree, flow) = doc(100.0, 400.0);
    let block = text_block(&mut tree, flow, FOX);
    tree.set_property(block, "font-family", "Helvetica");
    tree.set_property(block, "font-size", "12pt");

    let (area_tree, _) = layout(&tree);
    assert_eq!(area_tree.pages.len(), 1);
    let lines = page_lines(&area_tree.pages[0]);
    assert_eq!(lines.len(), 3);
    assert_eq!(line_text(lines[0]), "The quick brown");
    assert_eq!(line_text(lines[1]), "fox jumps over the");
    assert_eq!(line_text(lines[2]), "lazy dog.");
    for line in &lines {
        assert!(
            line.rect.width <= 100.0 + 0.01,
            "line {:?} overflows: {}",
            line_text(line),
            line.rect.width
        );
        assert_eq!(line.align, TextAlign::Start);
    }
}

#[test]
fn justified_paragraph_fills_the_measure() {
    let (mut tree, flow) = doc(150.0, 400.0);
    let block = text_block(&mut tree, flow, FOX);
    tree.set_property(block, "font-family", "Helvetica");
    tree.set_property(block, "font-size", "12pt");
    tree.set_property(block, "text-align", "justify");

    let (area_tree, _) = layout(&tree);
    let lines = page_lines(&area_tree.pages[0]);
    assert_eq!(lines.len(), 2);

    // Every line but the last ends exactly at the measure.
    assert!((lines[0].rect.right() - 150.0).abs() < 0.1);
    assert_eq!(lines[1].align, TextAlign::Start);
    assert!(lines[1].rect.right() < 150.0);

    // Word spacing is the residual slack spread evenly over the spaces,
    // and is non-negative for this text.
    let text_total: f32 = lines[0]
        .inlines
        .iter()
        .filter(|i| matches!(i.kind, InlineKind::Text(_)))
        .map(|i| i.rect.width)
        .sum();
    let spaces: Vec<_> = lines[0]
        .inlines
        .iter()
        .filter(|i| matches!(i.kind, InlineKind::Space { .. }))
        .collect();
    let expected_space = (150.0 - text_total) / spaces.len() as f32;
    for space in &spaces {
        assert!((space.rect.width - expected_space).abs() < 0.01);
        let InlineKind::Space { natural } = space.kind else {
            unreachable!()
        };
        assert!(space.rect.width >= natural);
    }
}

/// A block of ten fixed-width lines in Courier: one word per line.
fn ten_line_block(tree: &mut crate::fo::FoTree, flow: crate::fo::NodeId) -> crate::fo::NodeId {
    let words = vec!["xxxx"; 10].join(" ");
    let block = text_block(tree, flow, &words);
    tree.set_property(block, "font-family", "Courier");
    tree.set_property(block, "font-size", "12pt");
    block
}

#[test]
fn widow_control_splits_after_eight_lines() {
    // Room for eight 14.4pt lines in a 120pt body.
    let (mut tree, flow) = doc(60.0, 120.0);
    ten_line_block(&mut tree, flow);

    let (area_tree, _) = layout(&tree);
    assert_eq!(area_tree.pages.len(), 2);
    assert_eq!(page_lines(&area_tree.pages[0]).len(), 8);
    assert_eq!(page_lines(&area_tree.pages[1]).len(), 2);
    // The continuation starts at the top of the body region.
    let second = page_lines(&area_tree.pages[1])[0];
    assert!(second.rect.y < 1.0);
}

#[test]
fn widows_three_move_the_block_whole() {
    // Room for eight of the ten lines after the filler: widows=2 would
    // split 8/2, but widows=3 cannot be satisfied and the paragraph
    // moves whole to the next page.
    let (mut tree, flow) = doc(60.0, 160.0);
    let filler = tree.add_child(flow, FoKind::Block);
    tree.set_property(filler, "height", "40pt");
    let block = ten_line_block(&mut tree, flow);
    tree.set_property(block, "widows", "3");

    let (area_tree, _) = layout(&tree);
    assert_eq!(area_tree.pages.len(), 2);
    assert!(page_lines(&area_tree.pages[0]).is_empty());
    assert_eq!(page_lines(&area_tree.pages[1]).len(), 10);
}

#[test]
fn orphan_limit_moves_the_whole_block() {
    // A 100pt filler leaves room for one line; orphans=2 forbids a
    // one-line top part, so the paragraph moves whole and splits later.
    let (mut tree, flow) = doc(60.0, 120.0);
    let filler = tree.add_child(flow, FoKind::Block);
    tree.set_property(filler, "height", "100pt");
    ten_line_block(&mut tree, flow);

    let (area_tree, _) = layout(&tree);
    assert_eq!(area_tree.pages.len(), 3);
    assert!(page_lines(&area_tree.pages[0]).is_empty());
    assert_eq!(page_lines(&area_tree.pages[1]).len(), 8);
    assert_eq!(page_lines(&area_tree.pages[2]).len(), 2);
}

#[test]
fn table_pagination_repeats_header() {
    let (mut tree, flow) = doc(220.0, 200.0);
    let table = tree.add_child(flow, FoKind::Table);
    for _ in 0..2 {
        let column = tree.add_child(table, FoKind::TableColumn);
        tree.set_property(column, "column-width", "100pt");
    }
    let header = tree.add_child(table, FoKind::TableHeader);
    let header_row = tree.add_child(header, FoKind::TableRow);
    for title in ["name", "value"] {
        let cell = tree.add_child(header_row, FoKind::TableCell);
        text_block(&mut tree, cell, title);
    }
    let footer = tree.add_child(table, FoKind::TableFooter);
    let footer_row = tree.add_child(footer, FoKind::TableRow);
    let cell = tree.add_child(footer_row, FoKind::TableCell);
    text_block(&mut tree, cell, "total");
    let body = tree.add_child(table, FoKind::TableBody);
    for i in 0..50 {
        let row = tree.add_child(body, FoKind::TableRow);
        let cell = tree.add_child(row, FoKind::TableCell);
        text_block(&mut tree, cell, &format!("row {i}"));
        let cell = tree.add_child(row, FoKind::TableCell);
        text_block(&mut tree, cell, "1");
    }

    let (area_tree, _) = layout(&tree);
    assert!(area_tree.pages.len() > 1);

    let mut body_rows_seen = 0;
    let mut row_height = None;
    for (index, page) in area_tree.pages.iter().enumerate() {
        let table = first_table(page).expect("table fragment on every page");
        // The header repeats on every continuation page.
        assert_eq!(table.header.len(), 1, "page {}", page.number);
        // The footer appears only on the last page.
        let is_last = index + 1 == area_tree.pages.len();
        assert_eq!(table.footer.len(), usize::from(is_last));
        assert!(!table.body.is_empty());
        body_rows_seen += table.body.len();
        for row in &table.body {
            // Rows are never split: all share the single-line height.
            let height = row_height.get_or_insert(row.rect.height);
            assert!((row.rect.height - *height).abs() < 0.01);
        }
        // Column widths sum to the table width.
        let total: f32 = table.column_widths.iter().sum();
        assert!((total - table.rect.width).abs() < 1.0);
    }
    assert_eq!(body_rows_seen, 50);
}

#[test]
fn font_family_inherits_through_the_tree() {
    let (mut tree, flow) = doc(300.0, 300.0);
    tree.set_property(tree.root(), "font-family", "Times-Roman");
    let outer = tree.add_child(flow, FoKind::Block);
    tree.set_property(outer, "font-family", "Helvetica");
    let inner = tree.add_child(outer, FoKind::Block);
    let inline = tree.add_child(inner, FoKind::Inline);
    tree.add_text(inline, "grand descendant");
    // A sibling block that inherits from the root directly.
    text_block(&mut tree, flow, "root font");

    let (area_tree, _) = layout(&tree);
    let lines = page_lines(&area_tree.pages[0]);
    assert_eq!(lines.len(), 2);
    let font_of = |line: &crate::area::LineArea| match &line.inlines[0].kind {
        InlineKind::Text(text) => text.font,
        other => panic!("expected text inline, got {other:?}"),
    };
    assert_eq!(
        font_of(lines[0]),
        FontKey::Builtin(BuiltinFace::Helvetica)
    );
    assert_eq!(
        font_of(lines[1]),
        FontKey::Builtin(BuiltinFace::TimesRoman)
    );
}

#[test]
fn page_number_citation_resolves_and_rejustifies() {
    let (mut tree, flow) = doc(200.0, 150.0);

    // Table-of-contents line: entry text, dot leader, page citation,
    // all wrapped in a link to the chapter.
    let toc = tree.add_child(flow, FoKind::Block);
    let link = tree.add_child(toc, FoKind::BasicLink);
    tree.set_property(link, "internal-destination", "ch1");
    tree.add_text(link, "Chapter 1");
    let leader = tree.add_child(link, FoKind::Leader);
    tree.set_property(leader, "leader-pattern", "dots");
    let citation = tree.add_child(link, FoKind::PageNumberCitation);
    tree.set_property(citation, "ref-id", "ch1");

    let chapter = text_block(&mut tree, flow, "Chapter one begins here.");
    tree.set_property(chapter, "break-before", "page");
    tree.set_property(chapter, "id", "ch1");

    let (area_tree, _) = layout(&tree);
    assert_eq!(area_tree.pages.len(), 2);
    assert_no_page_refs(&area_tree);

    let toc_line = page_lines(&area_tree.pages[0])[0];
    // The citation now reads the real page number.
    let last_text = toc_line
        .inlines
        .iter()
        .rev()
        .find_map(|inline| match &inline.kind {
            InlineKind::Text(text) => Some(text.text.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(last_text, "2");
    // The leader re-absorbed the width delta: the line still ends at the
    // measure.
    assert!((toc_line.rect.right() - 200.0).abs() < 0.1);

    // The link annotation resolved to the chapter's page.
    let annotation = area_tree.pages[0]
        .links
        .first()
        .expect("toc line produces a link annotation");
    match &annotation.target {
        LinkTarget::Internal { id, resolved } => {
            assert_eq!(id, "ch1");
            assert_eq!(resolved.unwrap().page_index, 1);
        }
        other => panic!("unexpected target {other:?}"),
    }
}

#[test]
fn hyphenation_breaks_long_words() {
    let (mut tree, flow) = doc(40.0, 400.0);
    let block = text_block(&mut tree, flow, "hyphenation");
    tree.set_property(block, "font-family", "Helvetica");
    tree.set_property(block, "font-size", "12pt");
    tree.set_property(block, "hyphenate", "true");

    let options = LayoutOptions {
        enable_hyphenation: true,
        ..LayoutOptions::default()
    };
    let (area_tree, _) = layout_with(&tree, options);
    let lines = page_lines(&area_tree.pages[0]);
    assert_eq!(lines.len(), 3);
    assert_eq!(line_text(lines[0]), "hy-");
    assert_eq!(line_text(lines[1]), "phen-");
    assert_eq!(line_text(lines[2]), "ation");
}

#[test]
fn optimal_breaking_is_no_worse_and_fits() {
    let (mut tree, flow) = doc(100.0, 400.0);
    let block = text_block(&mut tree, flow, FOX);
    tree.set_property(block, "font-family", "Helvetica");
    tree.set_property(block, "font-size", "12pt");

    let options = LayoutOptions {
        line_breaking: crate::options::LineBreaking::Optimal,
        ..LayoutOptions::default()
    };
    let (area_tree, _) = layout_with(&tree, options);
    let lines = page_lines(&area_tree.pages[0]);
    assert!(!lines.is_empty());
    for line in &lines {
        assert!(line.rect.width <= 100.0 + 0.01);
    }
    let joined: Vec<String> = lines.iter().map(|l| line_text(l)).collect();
    assert_eq!(joined.join(" "), FOX);
}

#[test]
fn area_child_variants_round_trip() {
    // Smoke check that blocks nest inside flow areas as expected.
    let (mut tree, flow) = doc(200.0, 200.0);
    let outer = tree.add_child(flow, FoKind::Block);
    let inner = tree.add_child(outer, FoKind::Block);
    tree.add_text(inner, "nested");
    let (area_tree, _) = layout(&tree);
    let outer_area = &area_tree.pages[0].flow[0];
    assert!(matches!(outer_area.children[0], AreaChild::Block(_)));
}
