// Copyright 2025 the Folium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font keys, family normalization and metric access.
//!
//! Measurement uses the compiled-in base-14 AFM tables unless a family
//! resolves to a user-supplied face registered through [`FontProvider`].

use folium_data::afm::{self, FaceMetrics};
use hashbrown::HashMap;

use crate::diag::{Diagnostic, DiagnosticSink, LayoutError, WarnCode};
use crate::style::{FontStyle, FontWeight};

/// One of the fourteen standard faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinFace {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    TimesRoman,
    TimesBold,
    TimesItalic,
    TimesBoldItalic,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
    Symbol,
    ZapfDingbats,
}

impl BuiltinFace {
    pub fn metrics(self) -> &'static FaceMetrics {
        match self {
            Self::Helvetica => &afm::HELVETICA,
            Self::HelveticaBold => &afm::HELVETICA_BOLD,
            Self::HelveticaOblique => &afm::HELVETICA_OBLIQUE,
            Self::HelveticaBoldOblique => &afm::HELVETICA_BOLD_OBLIQUE,
            Self::TimesRoman => &afm::TIMES_ROMAN,
            Self::TimesBold => &afm::TIMES_BOLD,
            Self::TimesItalic => &afm::TIMES_ITALIC,
            Self::TimesBoldItalic => &afm::TIMES_BOLD_ITALIC,
            Self::Courier => &afm::COURIER,
            Self::CourierBold => &afm::COURIER_BOLD,
            Self::CourierOblique => &afm::COURIER_OBLIQUE,
            Self::CourierBoldOblique => &afm::COURIER_BOLD_OBLIQUE,
            Self::Symbol => &afm::SYMBOL,
            Self::ZapfDingbats => &afm::ZAPF_DINGBATS,
        }
    }

    pub fn postscript_name(self) -> &'static str {
        self.metrics().name
    }
}

/// Handle for a measurable face: a standard face or a registered user face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontKey {
    Builtin(BuiltinFace),
    User(u16),
}

/// Per-glyph metric access for a user-supplied TrueType face.
///
/// Advances are returned in font units; the shaper scales them by
/// `size / units_per_em`.
pub trait FontProvider {
    fn units_per_em(&self) -> u16;
    /// In font units, positive up.
    fn ascent(&self) -> i32;
    /// In font units, negative below the baseline.
    fn descent(&self) -> i32;
    fn has_glyph(&self, ch: char) -> bool;
    fn glyph_index(&self, ch: char) -> Option<u32>;
    /// Advance of the glyph in font units.
    fn advance(&self, glyph_index: u32) -> u32;
    /// Kerning adjustment between two characters, in font units.
    fn kerning(&self, _left: char, _right: char) -> i32 {
        0
    }
}

struct UserFace {
    family: String,
    weight: FontWeight,
    style: FontStyle,
    provider: Box<dyn FontProvider>,
}

/// Normalizes a single family name to one of the three standard families.
fn normalize_family(name: &str) -> Option<&'static str> {
    let name = name.trim().trim_matches(['\'', '"']);
    if name.eq_ignore_ascii_case("serif")
        || name.eq_ignore_ascii_case("Times")
        || name.eq_ignore_ascii_case("Times Roman")
        || name.eq_ignore_ascii_case("Times-Roman")
        || name.eq_ignore_ascii_case("Times New Roman")
    {
        Some("Times")
    } else if name.eq_ignore_ascii_case("sans-serif")
        || name.eq_ignore_ascii_case("Helvetica")
        || name.eq_ignore_ascii_case("Arial")
    {
        Some("Helvetica")
    } else if name.eq_ignore_ascii_case("monospace") || name.eq_ignore_ascii_case("Courier") {
        Some("Courier")
    } else if name.eq_ignore_ascii_case("Symbol") {
        Some("Symbol")
    } else if name.eq_ignore_ascii_case("ZapfDingbats")
        || name.eq_ignore_ascii_case("Zapf Dingbats")
    {
        Some("ZapfDingbats")
    } else {
        None
    }
}

fn compose_builtin(family: &'static str, weight: FontWeight, style: FontStyle) -> BuiltinFace {
    let bold = weight == FontWeight::Bold;
    let italic = style == FontStyle::Italic;
    match (family, bold, italic) {
        ("Helvetica", false, false) => BuiltinFace::Helvetica,
        ("Helvetica", true, false) => BuiltinFace::HelveticaBold,
        ("Helvetica", false, true) => BuiltinFace::HelveticaOblique,
        ("Helvetica", true, true) => BuiltinFace::HelveticaBoldOblique,
        ("Times", false, false) => BuiltinFace::TimesRoman,
        ("Times", true, false) => BuiltinFace::TimesBold,
        ("Times", false, true) => BuiltinFace::TimesItalic,
        ("Times", true, true) => BuiltinFace::TimesBoldItalic,
        ("Courier", false, false) => BuiltinFace::Courier,
        ("Courier", true, false) => BuiltinFace::CourierBold,
        ("Courier", false, true) => BuiltinFace::CourierOblique,
        ("Courier", true, true) => BuiltinFace::CourierBoldOblique,
        ("Symbol", _, _) => BuiltinFace::Symbol,
        _ => BuiltinFace::ZapfDingbats,
    }
}

/// The font database threaded through a layout run: registered user faces
/// plus the compiled-in standard fourteen, with a small selection cache.
pub(crate) struct FontContext {
    user_faces: Vec<UserFace>,
    user_bytes: u64,
    selection_cache: HashMap<(String, FontWeight, FontStyle), FontKey>,
}

impl FontContext {
    pub(crate) fn new() -> Self {
        Self {
            user_faces: Vec::new(),
            user_bytes: 0,
            selection_cache: HashMap::new(),
        }
    }

    /// Registers a user-supplied face. Faces with malformed metrics are
    /// rejected; `size_bytes` counts against `max_font_memory`.
    pub(crate) fn register(
        &mut self,
        family: &str,
        weight: FontWeight,
        style: FontStyle,
        provider: Box<dyn FontProvider>,
        size_bytes: u64,
        max_font_memory: u64,
    ) -> Result<FontKey, LayoutError> {
        if provider.units_per_em() == 0 {
            return Err(LayoutError::Font(
                family.to_owned(),
                "face reports zero units per em".to_owned(),
            ));
        }
        if self.user_bytes + size_bytes > max_font_memory {
            return Err(LayoutError::ResourcePolicy(format!(
                "font {family:?} ({size_bytes} bytes) exceeds the max_font_memory quota of {max_font_memory} bytes"
            )));
        }
        self.user_bytes += size_bytes;
        let key = FontKey::User(self.user_faces.len() as u16);
        self.user_faces.push(UserFace {
            family: family.to_owned(),
            weight,
            style,
            provider,
        });
        self.selection_cache.clear();
        Ok(key)
    }

    /// Resolves a `font-family` list (comma separated) plus weight and style
    /// to a measurable key. Unknown families fall back through the
    /// normalization table and warn.
    pub(crate) fn select(
        &mut self,
        family_list: &str,
        weight: FontWeight,
        style: FontStyle,
        sink: &mut dyn DiagnosticSink,
    ) -> FontKey {
        let cache_key = (family_list.to_owned(), weight, style);
        if let Some(&key) = self.selection_cache.get(&cache_key) {
            return key;
        }
        let key = self.select_uncached(family_list, weight, style, sink);
        self.selection_cache.insert(cache_key, key);
        key
    }

    fn select_uncached(
        &self,
        family_list: &str,
        weight: FontWeight,
        style: FontStyle,
        sink: &mut dyn DiagnosticSink,
    ) -> FontKey {
        for name in family_list.split(',') {
            let name = name.trim().trim_matches(['\'', '"']);
            if name.is_empty() {
                continue;
            }
            for (index, face) in self.user_faces.iter().enumerate() {
                if face.family.eq_ignore_ascii_case(name)
                    && face.weight == weight
                    && face.style == style
                {
                    return FontKey::User(index as u16);
                }
            }
            if let Some(family) = normalize_family(name) {
                return FontKey::Builtin(compose_builtin(family, weight, style));
            }
        }
        sink.warn(Diagnostic {
            code: WarnCode::MissingFont,
            message: format!("no face found for {family_list:?}; substituting Helvetica"),
            location: Some("font-family".to_owned()),
        });
        FontKey::Builtin(compose_builtin("Helvetica", weight, style))
    }

    /// Scaled advance of `text` at `size`, including kerning.
    pub(crate) fn text_advance(&self, key: FontKey, size: f32, text: &str) -> f32 {
        match key {
            FontKey::Builtin(face) => {
                let metrics = face.metrics();
                let scale = size / metrics.units_per_em as f32;
                let mut units: i64 = 0;
                let mut prev: Option<char> = None;
                for ch in text.chars() {
                    units += metrics.advance(ch) as i64;
                    if let Some(prev) = prev {
                        units += metrics.kerning(prev, ch) as i64;
                    }
                    prev = Some(ch);
                }
                units as f32 * scale
            }
            FontKey::User(index) => {
                let provider = &self.user_faces[index as usize].provider;
                let scale = size / provider.units_per_em() as f32;
                let mut units: i64 = 0;
                let mut prev: Option<char> = None;
                for ch in text.chars() {
                    if let Some(glyph) = provider.glyph_index(ch) {
                        units += provider.advance(glyph) as i64;
                    }
                    if let Some(prev) = prev {
                        units += provider.kerning(prev, ch) as i64;
                    }
                    prev = Some(ch);
                }
                units as f32 * scale
            }
        }
    }

    /// Ascent above the baseline at `size`, in points.
    pub(crate) fn ascent(&self, key: FontKey, size: f32) -> f32 {
        match key {
            FontKey::Builtin(face) => {
                let metrics = face.metrics();
                metrics.ascent as f32 * size / metrics.units_per_em as f32
            }
            FontKey::User(index) => {
                let provider = &self.user_faces[index as usize].provider;
                provider.ascent() as f32 * size / provider.units_per_em() as f32
            }
        }
    }

    /// Depth below the baseline at `size`, in points (positive).
    pub(crate) fn descent(&self, key: FontKey, size: f32) -> f32 {
        match key {
            FontKey::Builtin(face) => {
                let metrics = face.metrics();
                -metrics.descent as f32 * size / metrics.units_per_em as f32
            }
            FontKey::User(index) => {
                let provider = &self.user_faces[index as usize].provider;
                -provider.descent() as f32 * size / provider.units_per_em() as f32
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::Diagnostics;

    #[test]
    fn normalization_table() {
        let mut fonts = FontContext::new();
        let mut diags = Diagnostics::new();
        let cases = [
            ("serif", BuiltinFace::TimesRoman),
            ("sans-serif", BuiltinFace::Helvetica),
            ("monospace", BuiltinFace::Courier),
            ("Arial", BuiltinFace::Helvetica),
            ("Times New Roman", BuiltinFace::TimesRoman),
        ];
        for (name, face) in cases {
            assert_eq!(
                fonts.select(name, FontWeight::Normal, FontStyle::Normal, &mut diags),
                FontKey::Builtin(face),
                "family {name}"
            );
        }
        assert!(diags.is_empty());
    }

    #[test]
    fn bold_italic_composition() {
        let mut fonts = FontContext::new();
        let mut diags = Diagnostics::new();
        assert_eq!(
            fonts.select("serif", FontWeight::Bold, FontStyle::Italic, &mut diags),
            FontKey::Builtin(BuiltinFace::TimesBoldItalic)
        );
        assert_eq!(
            fonts.select("Helvetica", FontWeight::Normal, FontStyle::Italic, &mut diags),
            FontKey::Builtin(BuiltinFace::HelveticaOblique)
        );
    }

    #[test]
    fn unknown_family_warns_and_falls_back() {
        let mut fonts = FontContext::new();
        let mut diags = Diagnostics::new();
        let key = fonts.select("Comic Sans MS", FontWeight::Normal, FontStyle::Normal, &mut diags);
        assert_eq!(key, FontKey::Builtin(BuiltinFace::Helvetica));
        assert_eq!(diags.warnings()[0].code, WarnCode::MissingFont);
    }

    #[test]
    fn family_list_first_match_wins() {
        let mut fonts = FontContext::new();
        let mut diags = Diagnostics::new();
        let key = fonts.select(
            "'Nonexistent', Courier, serif",
            FontWeight::Normal,
            FontStyle::Normal,
            &mut diags,
        );
        assert_eq!(key, FontKey::Builtin(BuiltinFace::Courier));
    }

    #[test]
    fn advance_includes_kerning() {
        let fonts = FontContext::new();
        let without = fonts.text_advance(FontKey::Builtin(BuiltinFace::Helvetica), 10.0, "A")
            + fonts.text_advance(FontKey::Builtin(BuiltinFace::Helvetica), 10.0, "V");
        let with = fonts.text_advance(FontKey::Builtin(BuiltinFace::Helvetica), 10.0, "AV");
        assert!((without - with - 0.7).abs() < 1e-4);
    }

    struct NullProvider;

    impl FontProvider for NullProvider {
        fn units_per_em(&self) -> u16 {
            1000
        }
        fn ascent(&self) -> i32 {
            800
        }
        fn descent(&self) -> i32 {
            -200
        }
        fn has_glyph(&self, _ch: char) -> bool {
            true
        }
        fn glyph_index(&self, _ch: char) -> Option<u32> {
            Some(1)
        }
        fn advance(&self, _glyph: u32) -> u32 {
            500
        }
    }

    #[test]
    fn font_memory_quota() {
        let mut fonts = FontContext::new();
        let err = fonts
            .register(
                "Big",
                FontWeight::Normal,
                FontStyle::Normal,
                Box::new(NullProvider),
                2_000_000,
                1_000_000,
            )
            .unwrap_err();
        assert!(matches!(err, LayoutError::ResourcePolicy(_)));
        assert!(err.to_string().contains("max_font_memory"));
    }

    #[test]
    fn malformed_face_is_rejected() {
        struct BrokenProvider;
        impl FontProvider for BrokenProvider {
            fn units_per_em(&self) -> u16 {
                0
            }
            fn ascent(&self) -> i32 {
                0
            }
            fn descent(&self) -> i32 {
                0
            }
            fn has_glyph(&self, _ch: char) -> bool {
                false
            }
            fn glyph_index(&self, _ch: char) -> Option<u32> {
                None
            }
            fn advance(&self, _glyph: u32) -> u32 {
                0
            }
        }
        let mut fonts = FontContext::new();
        let err = fonts
            .register(
                "Broken",
                FontWeight::Normal,
                FontStyle::Normal,
                Box::new(BrokenProvider),
                10,
                1_000_000,
            )
            .unwrap_err();
        assert!(matches!(err, LayoutError::Font(_, _)));
        assert!(err.to_string().contains("Broken"));
    }
}
