// Copyright 2025 the Folium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Static content, markers, footnotes, absolute positioning and graphics.

use super::utils::{doc, layout, layout_with, line_text, page_lines, text_block};
use crate::area::AreaChild;
use crate::block::graphic::{ImageInfo, ImageProbe};
use crate::context::LayoutContext;
use crate::diag::LayoutError;
use crate::fo::{FoKind, FoTree, NodeId};
use crate::options::LayoutOptions;

/// A master with a 20pt region-before and the body below it.
fn doc_with_header(width: f32, height: f32) -> (FoTree, NodeId, NodeId) {
    let mut tree = FoTree::new();
    let masters = tree.add_child(tree.root(), FoKind::LayoutMasterSet);
    let master = tree.add_child(masters, FoKind::SimplePageMaster);
    tree.set_property(master, "master-name", "main");
    tree.set_property(master, "page-width", &format!("{width}pt"));
    tree.set_property(master, "page-height", &format!("{height}pt"));
    let body = tree.add_child(master, FoKind::RegionBody);
    tree.set_property(body, "margin-top", "30pt");
    let before = tree.add_child(master, FoKind::RegionBefore);
    tree.set_property(before, "extent", "20pt");

    let sequence = tree.add_child(tree.root(), FoKind::PageSequence);
    tree.set_property(sequence, "master-reference", "main");
    (tree, sequence, master)
}

#[test]
fn static_content_shows_the_page_number() {
    let (mut tree, sequence, _) = doc_with_header(200.0, 150.0);
    let header = tree.add_child(sequence, FoKind::StaticContent);
    tree.set_property(header, "flow-name", "xsl-region-before");
    let header_block = tree.add_child(header, FoKind::Block);
    tree.add_text(header_block, "Page ");
    tree.add_child(header_block, FoKind::PageNumber);

    let flow = tree.add_child(sequence, FoKind::Flow);
    tree.set_property(flow, "flow-name", "xsl-region-body");
    text_block(&mut tree, flow, "one");
    let second = text_block(&mut tree, flow, "two");
    tree.set_property(second, "break-before", "page");

    let (area_tree, _) = layout(&tree);
    assert_eq!(area_tree.pages.len(), 2);
    for page in &area_tree.pages {
        let header_line = page_lines(page)
            .into_iter()
            .find(|line| line_text(line).starts_with("Page "))
            .expect("header line");
        assert_eq!(line_text(header_line), format!("Page {}", page.number));
        // Static content sits inside the region-before strip.
        assert!(header_line.rect.y < 20.0);
    }
}

#[test]
fn retrieve_marker_pulls_the_current_chapter() {
    let (mut tree, sequence, _) = doc_with_header(200.0, 150.0);
    let header = tree.add_child(sequence, FoKind::StaticContent);
    tree.set_property(header, "flow-name", "xsl-region-before");
    let header_block = tree.add_child(header, FoKind::Block);
    let retrieve = tree.add_child(header_block, FoKind::RetrieveMarker);
    tree.set_property(retrieve, "retrieve-class-name", "chapter");

    let flow = tree.add_child(sequence, FoKind::Flow);
    tree.set_property(flow, "flow-name", "xsl-region-body");

    let one = tree.add_child(flow, FoKind::Block);
    let marker = tree.add_child(one, FoKind::Marker);
    tree.set_property(marker, "marker-class-name", "chapter");
    tree.add_text(marker, "Alpha");
    tree.add_text(one, "chapter one text");

    let two = tree.add_child(flow, FoKind::Block);
    tree.set_property(two, "break-before", "page");
    let marker = tree.add_child(two, FoKind::Marker);
    tree.set_property(marker, "marker-class-name", "chapter");
    tree.add_text(marker, "Beta");
    tree.add_text(two, "chapter two text");

    // A third page without its own marker falls back to the running one.
    let three = text_block(&mut tree, flow, "plain page");
    tree.set_property(three, "break-before", "page");

    let (area_tree, _) = layout(&tree);
    assert_eq!(area_tree.pages.len(), 3);
    let header_text = |index: usize| {
        page_lines(&area_tree.pages[index])
            .into_iter()
            .map(line_text)
            .find(|text| text == "Alpha" || text == "Beta")
            .expect("marker header")
    };
    assert_eq!(header_text(0), "Alpha");
    assert_eq!(header_text(1), "Beta");
    assert_eq!(header_text(2), "Beta");
}

#[test]
fn footnotes_sit_at_the_bottom_of_the_body() {
    let (mut tree, flow) = doc(200.0, 200.0);
    let block = tree.add_child(flow, FoKind::Block);
    tree.add_text(block, "cited claim");
    let footnote = tree.add_child(block, FoKind::Footnote);
    let citation = tree.add_child(footnote, FoKind::Inline);
    tree.add_text(citation, "*");
    let body = tree.add_child(footnote, FoKind::FootnoteBody);
    let note = tree.add_child(body, FoKind::Block);
    tree.add_text(note, "the footnote text");

    let (area_tree, _) = layout(&tree);
    let page = &area_tree.pages[0];
    // The citation stays inline with the claim.
    let first = page_lines(page)[0];
    assert!(line_text(first).contains('*'));
    // The footnote body block ends at the bottom of the body region.
    let footnote_block = page.flow.last().unwrap();
    assert!((footnote_block.rect.bottom() - 200.0).abs() < 0.5);
}

#[test]
fn absolute_containers_order_by_z_index() {
    let (mut tree, flow) = doc(200.0, 200.0);
    text_block(&mut tree, flow, "flow content");
    for (z, left) in [(5, "10pt"), (1, "30pt")] {
        let container = tree.add_child(flow, FoKind::BlockContainer);
        tree.set_property(container, "absolute-position", "absolute");
        tree.set_property(container, "left", left);
        tree.set_property(container, "top", "40pt");
        tree.set_property(container, "width", "50pt");
        tree.set_property(container, "height", "20pt");
        tree.set_property(container, "z-index", &z.to_string());
        let inner = tree.add_child(container, FoKind::Block);
        tree.add_text(inner, "floating");
    }

    let (area_tree, _) = layout(&tree);
    let page = &area_tree.pages[0];
    assert_eq!(page.absolutes.len(), 2);
    assert_eq!(page.absolutes[0].z_index, 1);
    assert_eq!(page.absolutes[1].z_index, 5);
    assert_eq!(page.absolutes[0].rect.x, 30.0);
    assert_eq!(page.absolutes[1].rect.height, 20.0);
}

struct StubProbe;

impl ImageProbe for StubProbe {
    fn probe(&self, source: &str) -> Result<ImageInfo, String> {
        if source.ends_with(".png") {
            Ok(ImageInfo {
                format: "png".into(),
                width_px: 100,
                height_px: 50,
                dpi_x: Some(100.0),
                dpi_y: Some(100.0),
                file_size: Some(2048),
            })
        } else {
            Err("unknown format".into())
        }
    }
}

#[test]
fn graphics_scale_from_intrinsic_size() {
    let (mut tree, flow) = doc(300.0, 300.0);
    let graphic = tree.add_child(flow, FoKind::ExternalGraphic);
    tree.set_property(graphic, "src", "url('img/logo.png')");
    let scaled = tree.add_child(flow, FoKind::ExternalGraphic);
    tree.set_property(scaled, "src", "img/logo.png");
    tree.set_property(scaled, "content-width", "144pt");

    let mut ctx = LayoutContext::default();
    ctx.set_image_probe(Box::new(StubProbe));
    let area_tree = ctx.layout(&tree).unwrap();
    let page = &area_tree.pages[0];

    // 100px at 100dpi is 72pt; 50px is 36pt.
    let AreaChild::Image(intrinsic) = &page.flow[0].children[0] else {
        panic!("expected image area");
    };
    assert!((intrinsic.rect.width - 72.0).abs() < 0.01);
    assert!((intrinsic.rect.height - 36.0).abs() < 0.01);

    // content-width doubles it; uniform scaling follows.
    let AreaChild::Image(resized) = &page.flow[1].children[0] else {
        panic!("expected image area");
    };
    assert!((resized.rect.width - 144.0).abs() < 0.01);
    assert!((resized.rect.height - 72.0).abs() < 0.01);
}

#[test]
fn absolute_image_paths_violate_policy() {
    let (mut tree, flow) = doc(300.0, 300.0);
    let graphic = tree.add_child(flow, FoKind::ExternalGraphic);
    tree.set_property(graphic, "src", "/etc/secret.png");

    let mut ctx = LayoutContext::default();
    ctx.set_image_probe(Box::new(StubProbe));
    let err = ctx.layout(&tree).unwrap_err();
    assert!(matches!(err, LayoutError::ResourcePolicy(_)));
    assert!(err.to_string().contains("allow_absolute_image_paths"));
}

#[test]
fn image_error_policy_placeholder_substitutes() {
    let (mut tree, flow) = doc(300.0, 300.0);
    let graphic = tree.add_child(flow, FoKind::ExternalGraphic);
    tree.set_property(graphic, "src", "broken.bmp");

    let options = LayoutOptions {
        image_error_policy: crate::options::ImageErrorPolicy::Placeholder,
        ..LayoutOptions::default()
    };
    let mut ctx = LayoutContext::new(options);
    ctx.set_image_probe(Box::new(StubProbe));
    let area_tree = ctx.layout(&tree).unwrap();
    let AreaChild::Image(placeholder) = &area_tree.pages[0].flow[0].children[0] else {
        panic!("expected placeholder image");
    };
    assert_eq!(placeholder.rect.width, 1.0);
    assert!(!ctx.diagnostics().is_empty());
}

#[test]
fn image_error_policy_throw_fails() {
    let (mut tree, flow) = doc(300.0, 300.0);
    let graphic = tree.add_child(flow, FoKind::ExternalGraphic);
    tree.set_property(graphic, "src", "broken.bmp");

    let mut ctx = LayoutContext::default();
    ctx.set_image_probe(Box::new(StubProbe));
    assert!(matches!(ctx.layout(&tree), Err(LayoutError::Image(_, _))));
}

#[test]
fn lists_share_the_start_indent() {
    let (mut tree, flow) = doc(200.0, 200.0);
    let list = tree.add_child(flow, FoKind::ListBlock);
    for label in ["1.", "2."] {
        let item = tree.add_child(list, FoKind::ListItem);
        let item_label = tree.add_child(item, FoKind::ListItemLabel);
        let block = tree.add_child(item_label, FoKind::Block);
        tree.add_text(block, label);
        let item_body = tree.add_child(item, FoKind::ListItemBody);
        let block = tree.add_child(item_body, FoKind::Block);
        tree.add_text(block, "item body text");
    }

    let (area_tree, _) = layout(&tree);
    let list_area = &area_tree.pages[0].flow[0];
    assert_eq!(list_area.children.len(), 2);
    let AreaChild::Block(item) = &list_area.children[0] else {
        panic!("expected item block");
    };
    let AreaChild::Block(label) = &item.children[0] else {
        panic!("expected label block");
    };
    let AreaChild::Block(body) = &item.children[1] else {
        panic!("expected body block");
    };
    // Labels start at the list edge; bodies at the provisional distance.
    assert_eq!(label.rect.x, 0.0);
    assert_eq!(body.rect.x, 24.0);
}

#[test]
fn floats_take_the_default_width() {
    let (mut tree, flow) = doc(300.0, 300.0);
    let float = tree.add_child(flow, FoKind::Float);
    tree.set_property(float, "float", "start");
    let inner = tree.add_child(float, FoKind::Block);
    tree.add_text(inner, "floating note");

    let (area_tree, _) = layout(&tree);
    let float_area = &area_tree.pages[0].flow[0];
    // min(200, 300 / 3) = 100.
    assert!((float_area.rect.width - 100.0).abs() < 0.01);
}
