// Copyright 2025 the Folium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Folium lays out XSL-FO documents into a paginated area tree.
//!
//! Some key types are:
//! - [`FoTree`] is the immutable source tree of formatting objects; an
//!   external parser builds it and layout only reads it. Properties arrive
//!   as source strings and are resolved here.
//! - [`LayoutContext`] owns the resources of a layout run: fonts, caches,
//!   compiled hyphenation patterns and the diagnostics sink.
//! - [`AreaTree`] is the result: pages holding block areas, block areas
//!   holding lines, lines holding inline areas in visual order, all in
//!   points from the top-left page corner. Consumers (a PDF renderer, a
//!   test harness) read it and never mutate it.
//!
//! Laying out the same tree twice with the same options yields equal area
//! trees; the pipeline is single-threaded and deterministic.
//!
//! ## Usage example
//!
//! ```rust
//! use folium::{FoKind, FoTree, LayoutContext, LayoutOptions};
//!
//! // The external parser normally builds the tree; here by hand.
//! let mut tree = FoTree::new();
//! let masters = tree.add_child(tree.root(), FoKind::LayoutMasterSet);
//! let master = tree.add_child(masters, FoKind::SimplePageMaster);
//! tree.set_property(master, "master-name", "page");
//! tree.set_property(master, "page-width", "210mm");
//! tree.set_property(master, "page-height", "297mm");
//! tree.set_property(master, "margin", "20mm");
//! tree.add_child(master, FoKind::RegionBody);
//!
//! let sequence = tree.add_child(tree.root(), FoKind::PageSequence);
//! tree.set_property(sequence, "master-reference", "page");
//! let flow = tree.add_child(sequence, FoKind::Flow);
//! tree.set_property(flow, "flow-name", "xsl-region-body");
//! let block = tree.add_child(flow, FoKind::Block);
//! tree.set_property(block, "font-family", "Helvetica");
//! tree.set_property(block, "font-size", "12pt");
//! tree.add_text(block, "Hello, page one.");
//!
//! let mut ctx = LayoutContext::new(LayoutOptions::default());
//! let area_tree = ctx.layout(&tree).expect("layout");
//! assert_eq!(area_tree.pages.len(), 1);
//! assert!(ctx.diagnostics().is_empty());
//! ```

// Lint set shared across the workspace; see Cargo.toml [workspace.lints].
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![warn(clippy::print_stdout, clippy::print_stderr)]

pub use folium_data;

mod area;
mod block;
mod context;
mod diag;
mod fo;
mod geom;
mod linebreak;
mod options;
mod page;
mod resolve;
mod shape;
mod util;

pub mod style;

#[cfg(test)]
mod tests;

pub use area::{
    AbsoluteArea, AreaChild, AreaTree, BlockArea, CellArea, ImageArea, InlineArea, InlineKind,
    LineArea, LinkAnnotation, LinkTarget, PageArea, ResolvedDestination, RowArea, TableArea,
    TextInline,
};
pub use block::graphic::{ImageInfo, ImageProbe};
pub use context::LayoutContext;
pub use diag::{Diagnostic, DiagnosticSink, Diagnostics, LayoutError, WarnCode};
pub use fo::{FoKind, FoTree, NodeId};
pub use geom::{Edges, Rect};
pub use options::{ImageErrorPolicy, LayoutOptions, LineBreaking};
pub use shape::bidi::{reorder_bidi, VisualRun};
pub use shape::font::{BuiltinFace, FontKey, FontProvider};
