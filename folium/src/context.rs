// Copyright 2025 the Folium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Context for layout.
//!
//! A [`LayoutContext`] owns every mutable resource of a layout run: the
//! font database, the text-width cache, compiled hyphenators and the
//! diagnostics sink. It is threaded explicitly through all layout calls;
//! there is no process-wide state. One context serves one thread; distinct
//! documents may be laid out concurrently on distinct contexts.

use hashbrown::HashMap;

use crate::area::AreaTree;
use crate::block::graphic::ImageProbe;
use crate::diag::{Diagnostic, DiagnosticSink, Diagnostics, LayoutError, WarnCode};
use crate::fo::{FoTree, NodeId};
use crate::linebreak::InlineStyle;
use crate::options::LayoutOptions;
use crate::page;
use crate::shape::font::{FontContext, FontKey, FontProvider};
use crate::shape::hyphenate::Hyphenator;
use crate::shape::WidthCache;
use crate::style::{FontStyle, FontWeight, Style};

/// Marker content available to static-content while a page closes.
#[derive(Default)]
pub(crate) struct MarkerLookup {
    pub first_starting: HashMap<String, (NodeId, Style)>,
    pub last_ending: HashMap<String, (NodeId, Style)>,
}

/// Resources for laying out documents.
pub struct LayoutContext {
    pub(crate) fonts: FontContext,
    pub(crate) widths: WidthCache,
    pub(crate) options: LayoutOptions,
    pub(crate) diag: Diagnostics,
    pub(crate) image_probe: Option<Box<dyn ImageProbe>>,
    pub(crate) markers: Option<MarkerLookup>,
    /// Compiled per language on first use; `None` marks an unsupported
    /// language that has already warned.
    hyphenators: HashMap<String, Option<Hyphenator>>,
}

impl LayoutContext {
    pub fn new(options: LayoutOptions) -> Self {
        Self {
            fonts: FontContext::new(),
            widths: WidthCache::new(),
            options,
            diag: Diagnostics::new(),
            image_probe: None,
            markers: None,
            hyphenators: HashMap::new(),
        }
    }

    /// Registers a user-supplied TrueType face. `size_bytes` counts toward
    /// the `max_font_memory` quota; a face with malformed metrics (zero
    /// units per em) is rejected as an invalid font.
    pub fn register_font(
        &mut self,
        family: &str,
        bold: bool,
        italic: bool,
        provider: Box<dyn FontProvider>,
        size_bytes: u64,
    ) -> Result<FontKey, LayoutError> {
        let weight = if bold { FontWeight::Bold } else { FontWeight::Normal };
        let style = if italic { FontStyle::Italic } else { FontStyle::Normal };
        self.fonts.register(
            family,
            weight,
            style,
            provider,
            size_bytes,
            self.options.max_font_memory,
        )
    }

    /// Installs the collaborator that probes image metadata.
    pub fn set_image_probe(&mut self, probe: Box<dyn ImageProbe>) {
        self.image_probe = Some(probe);
    }

    /// Lays out a document and returns its area tree.
    ///
    /// Warnings accumulate in [`diagnostics`](Self::diagnostics); fatal
    /// problems return an error and leave no partial tree behind.
    pub fn layout(&mut self, tree: &FoTree) -> Result<AreaTree, LayoutError> {
        self.widths.clear();
        self.diag.drain();
        self.markers = None;
        log::debug!("layout run starting");
        let result = page::layout_document(self, tree);
        if let Ok(area_tree) = &result {
            log::debug!("layout run produced {} pages", area_tree.pages.len());
        }
        result
    }

    /// Warnings collected by the most recent layout run.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diag
    }

    /// Removes and returns the collected warnings.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.diag.drain()
    }

    /// Measures `text` at `size` points, through the width cache.
    pub fn measure(&mut self, text: &str, font: FontKey, size: f32) -> f32 {
        self.widths.measure(&self.fonts, font, size, text)
    }

    /// Hyphenation opportunities for `word` in `language`, as character
    /// positions inside the word.
    pub fn hyphenate(
        &mut self,
        word: &str,
        language: &str,
        min_left: usize,
        min_right: usize,
    ) -> Vec<usize> {
        match self.hyphenator(language) {
            Some(hyphenator) => hyphenator.hyphenate(word, min_left, min_right),
            None => Vec::new(),
        }
    }

    pub(crate) fn measure_plain(&mut self, font: FontKey, size: f32, text: &str) -> f32 {
        self.widths.measure(&self.fonts, font, size, text)
    }

    /// Measurement including the style's letter spacing.
    pub(crate) fn measure_with(&mut self, style: &InlineStyle, text: &str) -> f32 {
        let base = self
            .widths
            .measure(&self.fonts, style.font, style.size, text);
        let chars = text.chars().count();
        if chars > 1 {
            base + style.letter_spacing * (chars - 1) as f32
        } else {
            base
        }
    }

    pub(crate) fn select_font(&mut self, style: &Style) -> FontKey {
        self.fonts.select(
            &style.font_family,
            style.font_weight,
            style.font_style,
            &mut self.diag,
        )
    }

    pub(crate) fn hyphenate_word(&mut self, word: &str, language: &str) -> Vec<usize> {
        let (min_left, min_right) = (self.options.min_left_chars, self.options.min_right_chars);
        match self.hyphenator(language) {
            Some(hyphenator) => hyphenator.hyphenate(word, min_left, min_right),
            None => Vec::new(),
        }
    }

    fn hyphenator(&mut self, language: &str) -> Option<&Hyphenator> {
        if !self.hyphenators.contains_key(language) {
            let compiled = match folium_data::hyphen::for_language(language) {
                Some(set) => Some(Hyphenator::compile(set)),
                None => {
                    self.diag.warn(Diagnostic {
                        code: WarnCode::UnknownLanguage,
                        message: format!("no hyphenation patterns for language {language:?}"),
                        location: None,
                    });
                    None
                }
            };
            self.hyphenators.insert(language.to_owned(), compiled);
        }
        self.hyphenators.get(language).and_then(|h| h.as_ref())
    }
}

impl Default for LayoutContext {
    fn default() -> Self {
        Self::new(LayoutOptions::default())
    }
}
