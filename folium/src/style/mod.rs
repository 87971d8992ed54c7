// Copyright 2025 the Folium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolved style types.
//!
//! A [`Style`] is the fully resolved property set of one formatting object:
//! every length in points, every color a triple in `0..=1`, every keyword a
//! closed enum. Styles split into an inherited part, copied from the parent
//! via [`Style::derive`], and a non-inherited part that resets to defaults
//! on every node.

pub mod parse;

use crate::geom::Edges;

/// A color as linear RGB components in `0..=1`.
pub type Rgb = [f32; 3];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Start,
    End,
    Center,
    Justify,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

/// Break constraint before or after a block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BreakRule {
    #[default]
    Auto,
    Page,
    OddPage,
    EvenPage,
}

impl BreakRule {
    pub(crate) fn forces_page(self) -> bool {
        self != Self::Auto
    }
}

/// Keep constraint strength.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Keep {
    #[default]
    Auto,
    /// Integer strengths express a preference, not a guarantee.
    Strength(u32),
    Always,
}

impl Keep {
    pub(crate) fn is_always(self) -> bool {
        self == Self::Always
    }

    pub(crate) fn is_requested(self) -> bool {
        self != Self::Auto
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LeaderPattern {
    #[default]
    Space,
    Rule,
    Dots,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AbsolutePosition {
    #[default]
    Auto,
    Absolute,
    Fixed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scaling {
    #[default]
    Uniform,
    NonUniform,
}

/// A dimension that may stay relative until layout knows its base.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Dim {
    #[default]
    Auto,
    Pt(f32),
    Percent(f32),
}

impl Dim {
    /// Resolves against `base`; `Auto` stays `None`.
    pub(crate) fn resolve(self, base: f32) -> Option<f32> {
        match self {
            Self::Auto => None,
            Self::Pt(pt) => Some(pt),
            Self::Percent(pct) => Some(base * pct / 100.0),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BorderStyle {
    #[default]
    None,
    Solid,
    Dashed,
    Dotted,
    Double,
}

/// One border edge.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BorderSide {
    pub width: f32,
    pub color: Rgb,
    pub style: BorderStyle,
}

impl BorderSide {
    /// Effective width: zero unless a visible style is set.
    pub fn effective_width(&self) -> f32 {
        if self.style == BorderStyle::None {
            0.0
        } else {
            self.width
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Borders {
    pub top: BorderSide,
    pub right: BorderSide,
    pub bottom: BorderSide,
    pub left: BorderSide,
}

impl Borders {
    pub fn widths(&self) -> Edges {
        Edges {
            top: self.top.effective_width(),
            right: self.right.effective_width(),
            bottom: self.bottom.effective_width(),
            left: self.left.effective_width(),
        }
    }

    pub(crate) fn is_visible(&self) -> bool {
        self.widths() != Edges::default()
    }
}

/// Table border model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BorderCollapse {
    #[default]
    Separate,
    Collapse,
}

/// Fully resolved properties of one formatting object.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    // Inherited properties.
    pub font_family: String,
    pub font_weight: FontWeight,
    pub font_style: FontStyle,
    pub font_size: f32,
    pub color: Rgb,
    /// Distance between line baselines, in points.
    pub line_height: f32,
    pub text_align: TextAlign,
    /// Alignment of the last line; the `relative` default resolves to
    /// `Start` when `text_align` is `Justify`.
    pub text_align_last: Option<TextAlign>,
    pub direction: Direction,
    pub language: String,
    pub hyphenate: bool,
    pub hyphenation_character: char,
    pub widows: u32,
    pub orphans: u32,
    pub letter_spacing: f32,
    pub word_spacing: f32,
    pub white_space_collapse: bool,
    pub leader_pattern: LeaderPattern,
    pub rule_thickness: f32,
    pub border_collapse: BorderCollapse,
    pub border_spacing: f32,

    // Non-inherited properties.
    pub margin: Edges,
    pub padding: Edges,
    pub borders: Borders,
    pub width: Dim,
    pub height: Dim,
    pub text_indent: f32,
    pub start_indent: f32,
    pub end_indent: f32,
    pub space_before: f32,
    pub space_after: f32,
    pub break_before: BreakRule,
    pub break_after: BreakRule,
    pub keep_together: Keep,
    pub keep_with_next: Keep,
    pub keep_with_previous: Keep,
    pub background_color: Option<Rgb>,
    pub underline: bool,
    pub line_through: bool,
    pub z_index: i32,
    pub absolute_position: AbsolutePosition,
    pub left: Dim,
    pub top: Dim,
    pub right: Dim,
    pub bottom: Dim,
    pub content_width: Dim,
    pub content_height: Dim,
    pub scaling: Scaling,
    pub id: Option<String>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            font_family: "serif".into(),
            font_weight: FontWeight::Normal,
            font_style: FontStyle::Normal,
            font_size: 12.0,
            color: [0.0, 0.0, 0.0],
            line_height: 14.4,
            text_align: TextAlign::Start,
            text_align_last: None,
            direction: Direction::Ltr,
            language: "en".into(),
            hyphenate: false,
            hyphenation_character: '-',
            widows: 2,
            orphans: 2,
            letter_spacing: 0.0,
            word_spacing: 0.0,
            white_space_collapse: true,
            leader_pattern: LeaderPattern::Space,
            rule_thickness: 1.0,
            border_collapse: BorderCollapse::Separate,
            border_spacing: 0.0,
            margin: Edges::default(),
            padding: Edges::default(),
            borders: Borders::default(),
            width: Dim::Auto,
            height: Dim::Auto,
            text_indent: 0.0,
            start_indent: 0.0,
            end_indent: 0.0,
            space_before: 0.0,
            space_after: 0.0,
            break_before: BreakRule::Auto,
            break_after: BreakRule::Auto,
            keep_together: Keep::Auto,
            keep_with_next: Keep::Auto,
            keep_with_previous: Keep::Auto,
            background_color: None,
            underline: false,
            line_through: false,
            z_index: 0,
            absolute_position: AbsolutePosition::Auto,
            left: Dim::Auto,
            top: Dim::Auto,
            right: Dim::Auto,
            bottom: Dim::Auto,
            content_width: Dim::Auto,
            content_height: Dim::Auto,
            scaling: Scaling::Uniform,
            id: None,
        }
    }
}

impl Style {
    /// Returns the base style for a child: inherited properties copied,
    /// non-inherited properties reset.
    pub fn derive(&self) -> Self {
        Self {
            font_family: self.font_family.clone(),
            font_weight: self.font_weight,
            font_style: self.font_style,
            font_size: self.font_size,
            color: self.color,
            line_height: self.line_height,
            text_align: self.text_align,
            text_align_last: self.text_align_last,
            direction: self.direction,
            language: self.language.clone(),
            hyphenate: self.hyphenate,
            hyphenation_character: self.hyphenation_character,
            widows: self.widows,
            orphans: self.orphans,
            letter_spacing: self.letter_spacing,
            word_spacing: self.word_spacing,
            white_space_collapse: self.white_space_collapse,
            leader_pattern: self.leader_pattern,
            rule_thickness: self.rule_thickness,
            border_collapse: self.border_collapse,
            border_spacing: self.border_spacing,
            ..Self::default()
        }
    }

    /// Effective alignment for the final line of a paragraph.
    pub fn effective_align_last(&self) -> TextAlign {
        match self.text_align_last {
            Some(align) => align,
            None if self.text_align == TextAlign::Justify => TextAlign::Start,
            None => self.text_align,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_keeps_inherited_resets_rest() {
        let mut parent = Style::default();
        parent.font_family = "Helvetica".into();
        parent.font_size = 9.0;
        parent.margin = Edges::uniform(10.0);
        parent.keep_together = Keep::Always;

        let child = parent.derive();
        assert_eq!(child.font_family, "Helvetica");
        assert_eq!(child.font_size, 9.0);
        assert_eq!(child.margin, Edges::default());
        assert_eq!(child.keep_together, Keep::Auto);
    }

    #[test]
    fn align_last_relative_rule() {
        let mut style = Style::default();
        style.text_align = TextAlign::Justify;
        assert_eq!(style.effective_align_last(), TextAlign::Start);
        style.text_align_last = Some(TextAlign::Center);
        assert_eq!(style.effective_align_last(), TextAlign::Center);
        style.text_align_last = None;
        style.text_align = TextAlign::End;
        assert_eq!(style.effective_align_last(), TextAlign::End);
    }

    #[test]
    fn border_effective_width() {
        let side = BorderSide {
            width: 2.0,
            color: [0.0; 3],
            style: BorderStyle::None,
        };
        assert_eq!(side.effective_width(), 0.0);
        let solid = BorderSide {
            style: BorderStyle::Solid,
            ..side
        };
        assert_eq!(solid.effective_width(), 2.0);
    }
}
