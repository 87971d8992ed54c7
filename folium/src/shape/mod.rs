// Copyright 2025 the Folium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text shaping: string measurement, bidi reordering and hyphenation.

pub mod bidi;
pub mod font;
pub(crate) mod hyphenate;

use hashbrown::HashMap;

use self::font::{FontContext, FontKey};

/// Cache of measured string widths, keyed by face, size and text.
///
/// The cache lives on the layout context and is reused across blocks of one
/// run; it is not shared between concurrent runs.
#[derive(Default)]
pub(crate) struct WidthCache {
    map: HashMap<(FontKey, u32), HashMap<String, f32>>,
}

impl WidthCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Width of `text` at `size`, in points.
    pub(crate) fn measure(
        &mut self,
        fonts: &FontContext,
        font: FontKey,
        size: f32,
        text: &str,
    ) -> f32 {
        let bucket = self.map.entry((font, size.to_bits())).or_default();
        if let Some(&width) = bucket.get(text) {
            return width;
        }
        let width = fonts.text_advance(font, size, text);
        bucket.insert(text.to_owned(), width);
        width
    }

    pub(crate) fn clear(&mut self) {
        self.map.clear();
    }
}
