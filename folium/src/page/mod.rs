// Copyright 2025 the Folium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The page breaker: distributes the fragment stream over pages.
//!
//! Per page-sequence this runs the NeedPage -> OnPage -> Finalize machine:
//! open a page from the master, place fragments while they fit, split the
//! ones that straddle the boundary (honoring keeps, widows and orphans),
//! lay out static content once the page's markers are known, and hand the
//! finished tree to the finalization pass for forward references.

pub(crate) mod finalize;
pub(crate) mod split;

use hashbrown::HashMap;

use crate::area::{AreaTree, BlockArea, PageArea};
use crate::block::{self, Fragment, FragmentContent, MarkerDef};
use crate::context::{LayoutContext, MarkerLookup};
use crate::diag::{Diagnostic, DiagnosticSink, LayoutError, WarnCode};
use crate::fo::{FoKind, FoTree, NodeId};
use crate::geom::Rect;
use crate::resolve::resolve_style;
use crate::style::parse::parse_length;
use crate::style::{BreakRule, Style};

use self::split::{place_block, place_table, Placement, SplitContent};

const DEFAULT_PAGE_WIDTH: f32 = 612.0;
const DEFAULT_PAGE_HEIGHT: f32 = 792.0;

/// A resolved simple-page-master.
#[derive(Debug, Clone)]
pub(crate) struct PageMaster {
    pub width: f32,
    pub height: f32,
    pub body: Rect,
    pub before: Option<Rect>,
    pub after: Option<Rect>,
}

fn margin(tree: &FoTree, node: NodeId, side: &str, em: f32) -> f32 {
    tree.property(node, &format!("margin-{side}"))
        .or_else(|| tree.property(node, "margin"))
        .and_then(|value| parse_length(value, em, None).ok())
        .unwrap_or(0.0)
}

fn build_master(
    tree: &FoTree,
    node: NodeId,
    name: &str,
) -> Result<PageMaster, LayoutError> {
    let em = 12.0;
    let length = |prop: &str, default: f32| {
        tree.property(node, prop)
            .filter(|v| !v.trim().eq_ignore_ascii_case("auto"))
            .and_then(|value| parse_length(value, em, None).ok())
            .unwrap_or(default)
    };
    let width = length("page-width", DEFAULT_PAGE_WIDTH);
    let height = length("page-height", DEFAULT_PAGE_HEIGHT);
    let inner = Rect::new(
        margin(tree, node, "left", em),
        margin(tree, node, "top", em),
        width - margin(tree, node, "left", em) - margin(tree, node, "right", em),
        height - margin(tree, node, "top", em) - margin(tree, node, "bottom", em),
    );

    let mut body = inner;
    let mut before = None;
    let mut after = None;
    for &child in tree.children(node) {
        match tree.kind(child) {
            FoKind::RegionBody => {
                body = Rect::new(
                    inner.x + margin(tree, child, "left", em),
                    inner.y + margin(tree, child, "top", em),
                    inner.width - margin(tree, child, "left", em) - margin(tree, child, "right", em),
                    inner.height - margin(tree, child, "top", em) - margin(tree, child, "bottom", em),
                );
            }
            FoKind::RegionBefore => {
                let extent = tree
                    .property(child, "extent")
                    .and_then(|value| parse_length(value, em, None).ok())
                    .unwrap_or(0.0);
                before = Some(Rect::new(inner.x, inner.y, inner.width, extent));
            }
            FoKind::RegionAfter => {
                let extent = tree
                    .property(child, "extent")
                    .and_then(|value| parse_length(value, em, None).ok())
                    .unwrap_or(0.0);
                after = Some(Rect::new(
                    inner.x,
                    inner.bottom() - extent,
                    inner.width,
                    extent,
                ));
            }
            _ => {}
        }
    }
    if body.width <= 0.0 || body.height <= 0.0 {
        return Err(LayoutError::ZeroRegion {
            master: name.to_owned(),
            name: "region-body".to_owned(),
        });
    }
    Ok(PageMaster {
        width,
        height,
        body,
        before,
        after,
    })
}

/// An id destination recorded during placement.
#[derive(Debug, Clone, Copy)]
pub(crate) struct IdEntry {
    pub page_index: usize,
    pub page_number: u32,
    pub y: f32,
}

struct PageInProgress {
    page: PageArea,
    y: f32,
    has_content: bool,
    footnotes: Vec<BlockArea>,
    footnote_height: f32,
    first_markers: HashMap<String, MarkerDef>,
    last_markers: HashMap<String, MarkerDef>,
    last_placed: Option<PlacedRecord>,
}

/// Bookkeeping to unplace the most recent fragment for keep-with-next.
struct PlacedRecord {
    fragment: Fragment,
    flow_len: usize,
    y: f32,
    footnote_len: usize,
    footnote_height: f32,
    ids: Vec<String>,
    absolutes_len: usize,
    space_after_before: f32,
}

struct Sequencer {
    master: PageMaster,
    seq_style: Style,
    static_before: Option<NodeId>,
    static_after: Option<NodeId>,
    current: Option<PageInProgress>,
    next_number: u32,
    pending_parity: Option<BreakRule>,
}

/// Lays out the whole document: every page-sequence under the root.
pub(crate) fn layout_document(
    ctx: &mut LayoutContext,
    tree: &FoTree,
) -> Result<AreaTree, LayoutError> {
    let root = tree.root();
    // Configured defaults seed the root style; properties override them.
    let mut base_style = Style::default();
    base_style.language = ctx.options.hyphenation_language.clone();
    base_style.widows = ctx.options.widows;
    base_style.orphans = ctx.options.orphans;
    let root_style = resolve_style(tree, root, &base_style, 0.0, &mut ctx.diag);

    let master_set = tree
        .find_child(root, &FoKind::LayoutMasterSet)
        .ok_or_else(|| LayoutError::MalformedTree("missing layout-master-set".to_owned()))?;
    let mut masters: HashMap<String, NodeId> = HashMap::new();
    for &child in tree.children(master_set) {
        if matches!(tree.kind(child), FoKind::SimplePageMaster) {
            if let Some(name) = tree.property(child, "master-name") {
                masters.insert(name.to_owned(), child);
            }
        }
    }

    let mut pages: Vec<PageArea> = Vec::new();
    let mut id_map: HashMap<String, IdEntry> = HashMap::new();
    let mut running_markers: HashMap<String, MarkerDef> = HashMap::new();
    let mut next_number = 1u32;

    let mut any_sequence = false;
    for &seq in tree.children(root) {
        if !matches!(tree.kind(seq), FoKind::PageSequence) {
            continue;
        }
        any_sequence = true;
        let master_name = tree
            .property(seq, "master-reference")
            .ok_or_else(|| {
                LayoutError::MalformedTree("page-sequence without master-reference".to_owned())
            })?
            .to_owned();
        let master_node = *masters
            .get(&master_name)
            .ok_or_else(|| LayoutError::MissingPageMaster(master_name.clone()))?;
        let master = build_master(tree, master_node, &master_name)?;

        let seq_style = resolve_style(tree, seq, &root_style, master.body.width, &mut ctx.diag);
        if let Some(value) = tree.property(seq, "initial-page-number") {
            if let Ok(number) = value.trim().parse::<u32>() {
                next_number = number;
            }
        }

        let mut flow = None;
        let mut static_before = None;
        let mut static_after = None;
        for &child in tree.children(seq) {
            match tree.kind(child) {
                FoKind::Flow => flow = Some(child),
                FoKind::StaticContent => match tree.property(child, "flow-name") {
                    Some("xsl-region-before") => static_before = Some(child),
                    Some("xsl-region-after") => static_after = Some(child),
                    other => ctx.diag.warn(Diagnostic {
                        code: WarnCode::UnsupportedFeature,
                        message: format!("static-content for {other:?} is not supported"),
                        location: None,
                    }),
                },
                _ => {}
            }
        }
        let flow = flow.ok_or_else(|| {
            LayoutError::MalformedTree("page-sequence without flow".to_owned())
        })?;

        let fragments = block::layout_flow(ctx, tree, flow, master.body.width, &seq_style)?;

        let mut sequencer = Sequencer {
            master,
            seq_style,
            static_before,
            static_after,
            current: None,
            next_number,
            pending_parity: None,
        };
        sequencer.place_all(
            ctx,
            tree,
            fragments,
            &mut pages,
            &mut id_map,
            &mut running_markers,
        )?;
        next_number = sequencer.next_number;
    }
    if !any_sequence {
        return Err(LayoutError::MalformedTree(
            "document contains no page-sequence".to_owned(),
        ));
    }

    let mut area_tree = AreaTree { pages };
    finalize::finalize(ctx, &mut area_tree, &id_map);
    Ok(area_tree)
}

impl Sequencer {
    fn open_page(
        &mut self,
        ctx: &mut LayoutContext,
        tree: &FoTree,
        pages: &mut Vec<PageArea>,
        running_markers: &mut HashMap<String, MarkerDef>,
    ) {
        if self.current.is_some() {
            return;
        }
        // Insert a blank page when an odd/even break demands it.
        if let Some(rule) = self.pending_parity.take() {
            let want_odd = match rule {
                BreakRule::OddPage => Some(true),
                BreakRule::EvenPage => Some(false),
                _ => None,
            };
            if let Some(want_odd) = want_odd {
                if (self.next_number % 2 == 1) != want_odd {
                    self.current = Some(self.new_page());
                    self.close_page(ctx, tree, pages, running_markers);
                }
            }
        }
        self.current = Some(self.new_page());
    }

    fn new_page(&mut self) -> PageInProgress {
        let page = PageArea {
            width: self.master.width,
            height: self.master.height,
            number: self.next_number,
            flow: Vec::new(),
            absolutes: Vec::new(),
            links: Vec::new(),
        };
        self.next_number += 1;
        PageInProgress {
            page,
            y: self.master.body.y,
            has_content: false,
            footnotes: Vec::new(),
            footnote_height: 0.0,
            first_markers: HashMap::new(),
            last_markers: HashMap::new(),
            last_placed: None,
        }
    }

    fn close_page(
        &mut self,
        ctx: &mut LayoutContext,
        tree: &FoTree,
        pages: &mut Vec<PageArea>,
        running_markers: &mut HashMap<String, MarkerDef>,
    ) {
        let Some(mut pib) = self.current.take() else {
            return;
        };

        // Footnotes stack at the bottom of the body region.
        if !pib.footnotes.is_empty() {
            let mut y = self.master.body.bottom() - pib.footnote_height;
            for mut footnote in pib.footnotes.drain(..) {
                footnote.translate_y(y);
                footnote.rect.x += self.master.body.x;
                for child in &mut footnote.children {
                    shift_x(child, self.master.body.x);
                }
                y = footnote.rect.bottom();
                pib.page.flow.push(footnote);
            }
        }

        // Static content sees this page's markers, falling back to the
        // running markers of earlier pages.
        let mut lookup = MarkerLookup::default();
        for (class, def) in running_markers.iter() {
            lookup
                .first_starting
                .insert(class.clone(), (def.node, def.style.clone()));
            lookup
                .last_ending
                .insert(class.clone(), (def.node, def.style.clone()));
        }
        for (class, def) in &pib.first_markers {
            lookup
                .first_starting
                .insert(class.clone(), (def.node, def.style.clone()));
        }
        for (class, def) in &pib.last_markers {
            lookup
                .last_ending
                .insert(class.clone(), (def.node, def.style.clone()));
        }
        ctx.markers = Some(lookup);
        if let (Some(static_node), Some(region)) = (self.static_before, self.master.before) {
            self.layout_static(ctx, tree, static_node, region, &mut pib.page);
        }
        if let (Some(static_node), Some(region)) = (self.static_after, self.master.after) {
            self.layout_static(ctx, tree, static_node, region, &mut pib.page);
        }
        ctx.markers = None;

        for (class, def) in pib.last_markers.drain() {
            running_markers.insert(class, def);
        }

        pib.page
            .absolutes
            .sort_by_key(|absolute| absolute.z_index);
        pages.push(pib.page);
    }

    /// Lays out one static-content into its region rect.
    fn layout_static(
        &self,
        ctx: &mut LayoutContext,
        tree: &FoTree,
        static_node: NodeId,
        region: Rect,
        page: &mut PageArea,
    ) {
        if region.height <= 0.0 {
            return;
        }
        let fragments =
            match block::layout_flow(ctx, tree, static_node, region.width, &self.seq_style) {
                Ok(fragments) => fragments,
                Err(_) => return,
            };
        let mut y = region.y;
        for fragment in fragments {
            match fragment.content {
                FragmentContent::Block(mut area) => {
                    area.translate_y(y);
                    area.rect.x += region.x;
                    for child in &mut area.children {
                        shift_x(child, region.x);
                    }
                    y = area.rect.bottom();
                    page.flow.push(area);
                }
                FragmentContent::Table(_) => {
                    // Tables in static content are rare; not supported.
                }
            }
        }
    }

    fn place_all(
        &mut self,
        ctx: &mut LayoutContext,
        tree: &FoTree,
        fragments: Vec<Fragment>,
        pages: &mut Vec<PageArea>,
        id_map: &mut HashMap<String, IdEntry>,
        running_markers: &mut HashMap<String, MarkerDef>,
    ) -> Result<(), LayoutError> {
        let mut queue: std::collections::VecDeque<Fragment> = fragments.into();
        let mut pending_space = 0.0f32;
        let pages_at_start = pages.len();

        while let Some(mut fragment) = queue.pop_front() {
            if fragment.break_before.forces_page() {
                if self.current.as_ref().is_some_and(|p| p.has_content) {
                    self.close_page(ctx, tree, pages, running_markers);
                }
                self.pending_parity = Some(fragment.break_before);
                pending_space = 0.0;
            }

            loop {
                self.open_page(ctx, tree, pages, running_markers);
                let pib = self.current.as_mut().unwrap();
                let body_bottom = self.master.body.bottom();
                let avail = body_bottom - pib.y - pib.footnote_height;
                let has_content = pib.has_content;
                // Block-progression spaces collapse to the larger value and
                // disappear at the top of a page.
                let space = if has_content {
                    pending_space.max(fragment.space_before)
                } else {
                    0.0
                };
                let footnote_extra: f32 = fragment
                    .gathered
                    .footnotes
                    .iter()
                    .map(|f| f.rect.height)
                    .sum();
                let needed = space + fragment.height() + footnote_extra;

                if needed <= avail {
                    self.place(fragment, space, pages.len(), id_map);
                    break;
                }

                // Keep-with-previous / keep-with-next: pull the previous
                // fragment onto the next page together with this one.
                let pull_previous = {
                    let pib = self.current.as_ref().unwrap();
                    match &pib.last_placed {
                        Some(record) => {
                            let wanted = record.fragment.keep_with_next.is_requested()
                                || fragment.keep_with_previous.is_requested();
                            wanted && record.flow_len > 0
                        }
                        None => false,
                    }
                };
                if pull_previous {
                    let record = self.unplace_last(id_map);
                    self.close_page(ctx, tree, pages, running_markers);
                    pending_space = record.space_after_before;
                    queue.push_front(fragment);
                    fragment = record.fragment;
                    continue;
                }

                // Try to split at the boundary.
                let content_avail = (avail - space - footnote_extra).max(0.0);
                let placement = match &fragment.content {
                    FragmentContent::Block(block) => place_block(
                        block,
                        content_avail,
                        fragment.widows,
                        fragment.orphans,
                        fragment.keep_together,
                        !has_content,
                    ),
                    FragmentContent::Table(table) => {
                        place_table(table, content_avail, fragment.keep_together, !has_content)
                    }
                };
                match placement {
                    Placement::Fits => {
                        self.place(fragment, space, pages.len(), id_map);
                        break;
                    }
                    Placement::Split(top, rest) => {
                        let rest_fragment = continuation(&fragment, rest);
                        let mut top_fragment = fragment;
                        top_fragment.content = match top {
                            SplitContent::Block(area) => FragmentContent::Block(area),
                            SplitContent::Table(area) => FragmentContent::Table(area),
                        };
                        self.place(top_fragment, space, pages.len(), id_map);
                        self.close_page(ctx, tree, pages, running_markers);
                        pending_space = 0.0;
                        fragment = rest_fragment;
                        continue;
                    }
                    Placement::Move => {
                        let pib = self.current.as_ref().unwrap();
                        if pib.has_content {
                            self.close_page(ctx, tree, pages, running_markers);
                            pending_space = 0.0;
                            continue;
                        }
                        // An empty page cannot hold it either: place with
                        // overflow rather than looping forever.
                        self.place(fragment, space, pages.len(), id_map);
                        break;
                    }
                }
            }

            let placed_space_after = self
                .current
                .as_ref()
                .and_then(|p| p.last_placed.as_ref())
                .map(|r| r.fragment.space_after)
                .unwrap_or(0.0);
            pending_space = placed_space_after;

            let break_after = self
                .current
                .as_ref()
                .and_then(|p| p.last_placed.as_ref())
                .map(|r| r.fragment.break_after)
                .unwrap_or(BreakRule::Auto);
            if break_after.forces_page() {
                self.close_page(ctx, tree, pages, running_markers);
                self.pending_parity = Some(break_after);
                pending_space = 0.0;
            }
        }

        // A page-sequence always emits at least one page.
        if self.current.is_none() && pages.len() == pages_at_start {
            self.open_page(ctx, tree, pages, running_markers);
        }
        self.close_page(ctx, tree, pages, running_markers);
        Ok(())
    }

    /// Places a fragment on the current page at the cursor.
    fn place(
        &mut self,
        fragment: Fragment,
        space: f32,
        page_index: usize,
        id_map: &mut HashMap<String, IdEntry>,
    ) {
        let pib = self.current.as_mut().unwrap();
        let y = pib.y + space;
        let record_y = pib.y;
        let flow_len = pib.page.flow.len();
        let footnote_len = pib.footnotes.len();
        let footnote_height_before = pib.footnote_height;
        let absolutes_len = pib.page.absolutes.len();
        let page_number = pib.page.number;

        let mut ids = Vec::new();
        for (id, rel_y) in &fragment.gathered.ids {
            ids.push(id.clone());
            id_map.insert(
                id.clone(),
                IdEntry {
                    page_index,
                    page_number,
                    y: y + rel_y,
                },
            );
        }
        for marker in &fragment.gathered.markers {
            pib.first_markers
                .entry(marker.class.clone())
                .or_insert_with(|| marker.clone());
            pib.last_markers.insert(marker.class.clone(), marker.clone());
        }
        for footnote in &fragment.gathered.footnotes {
            pib.footnote_height += footnote.rect.height;
            pib.footnotes.push(footnote.clone());
        }
        pib.page
            .absolutes
            .extend(fragment.gathered.absolutes.iter().cloned());

        let height = fragment.height();
        match &fragment.content {
            FragmentContent::Block(area) if area.children.is_empty() && area.rect.height == 0.0 => {
                // Carrier fragment for out-of-flow content only.
            }
            FragmentContent::Block(area) => {
                let mut placed = area.clone();
                placed.translate_y(y);
                placed.rect.x += self.master.body.x;
                for child in &mut placed.children {
                    shift_x(child, self.master.body.x);
                }
                pib.page.flow.push(placed);
            }
            FragmentContent::Table(table) => {
                let mut placed = table.clone();
                placed.translate_y(y);
                shift_table_x(&mut placed, self.master.body.x);
                let wrapper = BlockArea {
                    rect: placed.rect,
                    background: None,
                    borders: None,
                    children: vec![crate::area::AreaChild::Table(placed)],
                };
                pib.page.flow.push(wrapper);
            }
        }
        pib.y = y + height;
        pib.has_content = true;
        pib.last_placed = Some(PlacedRecord {
            fragment,
            flow_len,
            y: record_y,
            footnote_len,
            footnote_height: footnote_height_before,
            ids,
            absolutes_len,
            space_after_before: space,
        });
    }

    /// Removes the most recently placed fragment from the current page.
    fn unplace_last(&mut self, id_map: &mut HashMap<String, IdEntry>) -> PlacedRecord {
        let pib = self.current.as_mut().unwrap();
        let record = pib.last_placed.take().expect("nothing to unplace");
        pib.page.flow.truncate(record.flow_len);
        pib.page.absolutes.truncate(record.absolutes_len);
        pib.footnotes.truncate(record.footnote_len);
        pib.footnote_height = record.footnote_height;
        pib.y = record.y;
        for id in &record.ids {
            id_map.remove(id);
        }
        for marker in &record.fragment.gathered.markers {
            pib.first_markers.remove(&marker.class);
            pib.last_markers.remove(&marker.class);
        }
        record
    }
}

/// Builds the carried-over fragment for the second part of a split.
fn continuation(original: &Fragment, rest: SplitContent) -> Fragment {
    Fragment {
        content: match rest {
            SplitContent::Block(area) => FragmentContent::Block(area),
            SplitContent::Table(area) => FragmentContent::Table(area),
        },
        break_before: BreakRule::Auto,
        break_after: original.break_after,
        keep_together: crate::style::Keep::Auto,
        keep_with_next: original.keep_with_next,
        keep_with_previous: crate::style::Keep::Auto,
        widows: original.widows,
        orphans: original.orphans,
        space_before: 0.0,
        space_after: original.space_after,
        gathered: crate::block::Gathered::default(),
    }
}

fn shift_x(child: &mut crate::area::AreaChild, dx: f32) {
    use crate::area::AreaChild;
    match child {
        AreaChild::Block(block) => {
            block.rect.x += dx;
            for inner in &mut block.children {
                shift_x(inner, dx);
            }
        }
        AreaChild::Line(line) => {
            line.rect.x += dx;
            line.content_x += dx;
            for inline in &mut line.inlines {
                inline.rect.x += dx;
            }
        }
        AreaChild::Image(image) => image.rect.x += dx,
        AreaChild::Table(table) => shift_table_x(table, dx),
    }
}

fn shift_table_x(table: &mut crate::area::TableArea, dx: f32) {
    table.rect.x += dx;
    for row in table
        .header
        .iter_mut()
        .chain(&mut table.body)
        .chain(&mut table.footer)
    {
        row.rect.x += dx;
        for cell in &mut row.cells {
            cell.rect.x += dx;
            cell.content.rect.x += dx;
            for child in &mut cell.content.children {
                shift_x(child, dx);
            }
        }
    }
}
