// Copyright 2025 the Folium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property resolution: cascade, inheritance and unit resolution.
//!
//! [`resolve_style`] turns the specified `(name, value)` strings of one node
//! into a fully typed [`Style`], starting from the parent's resolved style.
//! The parent map is passed as an argument; nodes never point back at their
//! parents. Malformed values warn through the sink and fall back to the
//! defaults; they never abort layout.

use crate::diag::{Diagnostic, DiagnosticSink, WarnCode};
use crate::fo::{FoTree, NodeId};
use crate::style::parse::{
    self, parse_absolute_position, parse_bool, parse_border_style, parse_break, parse_color,
    parse_dim, parse_direction, parse_font_style, parse_font_weight, parse_int, parse_keep,
    parse_leader_pattern, parse_line_height, parse_scaling, parse_text_align, ParseError,
};
use crate::style::{BorderCollapse, BorderSide, BorderStyle, Style};

/// Properties that are recognized but intentionally not implemented; they
/// warn once per occurrence and are otherwise ignored.
const UNSUPPORTED: &[&str] = &[
    "span",
    "vertical-align",
    "baseline-shift",
    "glyph-orientation-vertical",
    "writing-mode",
];

fn warn(sink: &mut dyn DiagnosticSink, code: WarnCode, property: &str, error: &ParseError) {
    sink.warn(Diagnostic {
        code,
        message: error.message.clone(),
        location: Some(property.to_owned()),
    });
}

/// Applies `parsed` to `slot`, warning and keeping the previous value on
/// parse failure.
fn apply<T>(
    slot: &mut T,
    parsed: Result<T, ParseError>,
    code: WarnCode,
    property: &str,
    sink: &mut dyn DiagnosticSink,
) {
    match parsed {
        Ok(value) => *slot = value,
        Err(error) => warn(sink, code, property, &error),
    }
}

/// Parses a `border` shorthand: any order of width, style and color.
fn parse_border_shorthand(value: &str, em: f32) -> Result<BorderSide, ParseError> {
    let mut side = BorderSide {
        width: 1.0,
        color: [0.0; 3],
        style: BorderStyle::None,
    };
    for word in value.split_whitespace() {
        if let Ok(style) = parse_border_style(word) {
            side.style = style;
        } else if let Ok(color) = parse_color(word) {
            side.color = color;
        } else if let Ok(width) = parse::parse_length(word, em, None) {
            side.width = width;
        } else {
            return Err(ParseError {
                message: format!("unrecognized border component {word:?}"),
            });
        }
    }
    Ok(side)
}

/// Resolves the style of `node` against its parent's resolved style.
///
/// `containing_width` is the inline-progression-dimension of the containing
/// block, used as the base for indent, margin and padding percentages.
pub(crate) fn resolve_style(
    tree: &FoTree,
    node: NodeId,
    inherited: &Style,
    containing_width: f32,
    sink: &mut dyn DiagnosticSink,
) -> Style {
    let mut style = inherited.derive();

    // Font size first: em and percentage units elsewhere depend on it, and
    // an unspecified line-height tracks the font-size ratio of the parent.
    if let Some(value) = tree.property(node, "font-size") {
        match parse::parse_length(value, inherited.font_size, Some(inherited.font_size)) {
            Ok(size) => {
                style.font_size = size;
                if tree.property(node, "line-height").is_none() && inherited.font_size > 0.0 {
                    style.line_height =
                        inherited.line_height / inherited.font_size * style.font_size;
                }
            }
            Err(error) => warn(sink, WarnCode::BadUnit, "font-size", &error),
        }
    }
    let em = style.font_size;
    let length = |value: &str| parse::parse_length(value, em, Some(containing_width));

    for (name, value) in tree.properties(node) {
        let value = value.as_str();
        match name.as_str() {
            "font-size" => {}
            "font-family" => style.font_family = value.trim().to_owned(),
            "font-weight" => apply(
                &mut style.font_weight,
                parse_font_weight(value),
                WarnCode::BadValue,
                name,
                sink,
            ),
            "font-style" => apply(
                &mut style.font_style,
                parse_font_style(value),
                WarnCode::BadValue,
                name,
                sink,
            ),
            "color" => apply(
                &mut style.color,
                parse_color(value),
                WarnCode::BadColor,
                name,
                sink,
            ),
            "line-height" => apply(
                &mut style.line_height,
                parse_line_height(value, em),
                WarnCode::BadUnit,
                name,
                sink,
            ),
            "text-align" => apply(
                &mut style.text_align,
                parse_text_align(value),
                WarnCode::BadValue,
                name,
                sink,
            ),
            "text-align-last" => {
                if value.trim() == "relative" {
                    style.text_align_last = None;
                } else {
                    match parse_text_align(value) {
                        Ok(align) => style.text_align_last = Some(align),
                        Err(error) => warn(sink, WarnCode::BadValue, name, &error),
                    }
                }
            }
            "direction" => apply(
                &mut style.direction,
                parse_direction(value),
                WarnCode::BadValue,
                name,
                sink,
            ),
            "language" | "xml:lang" => style.language = value.trim().to_owned(),
            "hyphenate" => apply(
                &mut style.hyphenate,
                parse_bool(value),
                WarnCode::BadValue,
                name,
                sink,
            ),
            "hyphenation-character" => {
                style.hyphenation_character = value.trim().chars().next().unwrap_or('-');
            }
            "widows" => apply(
                &mut style.widows,
                parse_int(value),
                WarnCode::BadValue,
                name,
                sink,
            ),
            "orphans" => apply(
                &mut style.orphans,
                parse_int(value),
                WarnCode::BadValue,
                name,
                sink,
            ),
            "letter-spacing" => {
                if value.trim() != "normal" {
                    apply(
                        &mut style.letter_spacing,
                        length(value),
                        WarnCode::BadUnit,
                        name,
                        sink,
                    );
                }
            }
            "word-spacing" => {
                if value.trim() != "normal" {
                    apply(
                        &mut style.word_spacing,
                        length(value),
                        WarnCode::BadUnit,
                        name,
                        sink,
                    );
                }
            }
            "white-space-collapse" => apply(
                &mut style.white_space_collapse,
                parse_bool(value),
                WarnCode::BadValue,
                name,
                sink,
            ),
            "leader-pattern" => apply(
                &mut style.leader_pattern,
                parse_leader_pattern(value),
                WarnCode::BadValue,
                name,
                sink,
            ),
            "rule-thickness" => apply(
                &mut style.rule_thickness,
                length(value),
                WarnCode::BadUnit,
                name,
                sink,
            ),
            "border-collapse" => {
                style.border_collapse = match value.trim() {
                    "collapse" => BorderCollapse::Collapse,
                    _ => BorderCollapse::Separate,
                };
            }
            "border-spacing" => apply(
                &mut style.border_spacing,
                length(value),
                WarnCode::BadUnit,
                name,
                sink,
            ),
            "margin" => match length(value) {
                Ok(uniform) => style.margin = crate::geom::Edges::uniform(uniform),
                Err(error) => warn(sink, WarnCode::BadUnit, name, &error),
            },
            "margin-top" => apply(&mut style.margin.top, length(value), WarnCode::BadUnit, name, sink),
            "margin-right" => apply(&mut style.margin.right, length(value), WarnCode::BadUnit, name, sink),
            "margin-bottom" => apply(&mut style.margin.bottom, length(value), WarnCode::BadUnit, name, sink),
            "margin-left" => apply(&mut style.margin.left, length(value), WarnCode::BadUnit, name, sink),
            "padding" => match length(value) {
                Ok(uniform) => style.padding = crate::geom::Edges::uniform(uniform),
                Err(error) => warn(sink, WarnCode::BadUnit, name, &error),
            },
            "padding-top" => apply(&mut style.padding.top, length(value), WarnCode::BadUnit, name, sink),
            "padding-right" => apply(&mut style.padding.right, length(value), WarnCode::BadUnit, name, sink),
            "padding-bottom" => apply(&mut style.padding.bottom, length(value), WarnCode::BadUnit, name, sink),
            "padding-left" => apply(&mut style.padding.left, length(value), WarnCode::BadUnit, name, sink),
            "border" => match parse_border_shorthand(value, em) {
                Ok(side) => {
                    style.borders.top = side;
                    style.borders.right = side;
                    style.borders.bottom = side;
                    style.borders.left = side;
                }
                Err(error) => warn(sink, WarnCode::BadValue, name, &error),
            },
            "border-top" => apply(&mut style.borders.top, parse_border_shorthand(value, em), WarnCode::BadValue, name, sink),
            "border-right" => apply(&mut style.borders.right, parse_border_shorthand(value, em), WarnCode::BadValue, name, sink),
            "border-bottom" => apply(&mut style.borders.bottom, parse_border_shorthand(value, em), WarnCode::BadValue, name, sink),
            "border-left" => apply(&mut style.borders.left, parse_border_shorthand(value, em), WarnCode::BadValue, name, sink),
            "border-width" => match length(value) {
                Ok(width) => {
                    style.borders.top.width = width;
                    style.borders.right.width = width;
                    style.borders.bottom.width = width;
                    style.borders.left.width = width;
                }
                Err(error) => warn(sink, WarnCode::BadUnit, name, &error),
            },
            "border-style" => match parse_border_style(value) {
                Ok(border_style) => {
                    style.borders.top.style = border_style;
                    style.borders.right.style = border_style;
                    style.borders.bottom.style = border_style;
                    style.borders.left.style = border_style;
                }
                Err(error) => warn(sink, WarnCode::BadValue, name, &error),
            },
            "border-color" => match parse_color(value) {
                Ok(color) => {
                    style.borders.top.color = color;
                    style.borders.right.color = color;
                    style.borders.bottom.color = color;
                    style.borders.left.color = color;
                }
                Err(error) => warn(sink, WarnCode::BadColor, name, &error),
            },
            "width" => apply(&mut style.width, parse_dim(value, em), WarnCode::BadUnit, name, sink),
            "height" => apply(&mut style.height, parse_dim(value, em), WarnCode::BadUnit, name, sink),
            "text-indent" => apply(&mut style.text_indent, length(value), WarnCode::BadUnit, name, sink),
            "start-indent" => apply(&mut style.start_indent, length(value), WarnCode::BadUnit, name, sink),
            "end-indent" => apply(&mut style.end_indent, length(value), WarnCode::BadUnit, name, sink),
            "space-before" | "space-before.optimum" => {
                apply(&mut style.space_before, length(value), WarnCode::BadUnit, name, sink);
            }
            "space-after" | "space-after.optimum" => {
                apply(&mut style.space_after, length(value), WarnCode::BadUnit, name, sink);
            }
            "break-before" => apply(&mut style.break_before, parse_break(value), WarnCode::BadValue, name, sink),
            "break-after" => apply(&mut style.break_after, parse_break(value), WarnCode::BadValue, name, sink),
            "keep-together" | "keep-together.within-page" | "keep-together.within-column" => {
                apply(&mut style.keep_together, parse_keep(value), WarnCode::BadValue, name, sink);
            }
            "keep-with-next" | "keep-with-next.within-page" => {
                apply(&mut style.keep_with_next, parse_keep(value), WarnCode::BadValue, name, sink);
            }
            "keep-with-previous" | "keep-with-previous.within-page" => {
                apply(&mut style.keep_with_previous, parse_keep(value), WarnCode::BadValue, name, sink);
            }
            "background-color" => {
                if value.trim() == "transparent" {
                    style.background_color = None;
                } else {
                    match parse_color(value) {
                        Ok(color) => style.background_color = Some(color),
                        Err(error) => warn(sink, WarnCode::BadColor, name, &error),
                    }
                }
            }
            "text-decoration" => {
                style.underline = false;
                style.line_through = false;
                for word in value.split_whitespace() {
                    match word {
                        "underline" => style.underline = true,
                        "line-through" => style.line_through = true,
                        "none" => {}
                        other => warn(
                            sink,
                            WarnCode::BadValue,
                            name,
                            &ParseError {
                                message: format!("unrecognized text-decoration {other:?}"),
                            },
                        ),
                    }
                }
            }
            "z-index" => match value.trim().parse::<i32>() {
                Ok(z) => style.z_index = z,
                Err(_) => warn(
                    sink,
                    WarnCode::BadValue,
                    name,
                    &ParseError {
                        message: format!("malformed z-index {value:?}"),
                    },
                ),
            },
            "absolute-position" => apply(
                &mut style.absolute_position,
                parse_absolute_position(value),
                WarnCode::BadValue,
                name,
                sink,
            ),
            "left" => apply(&mut style.left, parse_dim(value, em), WarnCode::BadUnit, name, sink),
            "top" => apply(&mut style.top, parse_dim(value, em), WarnCode::BadUnit, name, sink),
            "right" => apply(&mut style.right, parse_dim(value, em), WarnCode::BadUnit, name, sink),
            "bottom" => apply(&mut style.bottom, parse_dim(value, em), WarnCode::BadUnit, name, sink),
            "content-width" => apply(&mut style.content_width, parse_dim(value, em), WarnCode::BadUnit, name, sink),
            "content-height" => apply(&mut style.content_height, parse_dim(value, em), WarnCode::BadUnit, name, sink),
            "scaling" => apply(&mut style.scaling, parse_scaling(value), WarnCode::BadValue, name, sink),
            "id" => style.id = Some(value.trim().to_owned()),
            other if UNSUPPORTED.contains(&other) => {
                sink.warn(Diagnostic {
                    code: WarnCode::UnsupportedFeature,
                    message: format!("property {other:?} is not supported; ignoring"),
                    location: Some(other.to_owned()),
                });
            }
            // Structural attributes (master-reference, flow-name, src, ...)
            // are read directly by the layouters.
            _ => {}
        }
    }
    style
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::Diagnostics;
    use crate::fo::FoKind;
    use crate::style::{Dim, FontWeight, Keep, TextAlign};

    fn resolve_one(props: &[(&str, &str)], inherited: &Style) -> (Style, Diagnostics) {
        let mut tree = FoTree::new();
        let block = tree.add_child(tree.root(), FoKind::Block);
        for (name, value) in props {
            tree.set_property(block, name, value);
        }
        let mut diags = Diagnostics::new();
        let style = resolve_style(&tree, block, inherited, 400.0, &mut diags);
        (style, diags)
    }

    #[test]
    fn inherits_from_parent() {
        let mut parent = Style::default();
        parent.font_family = "Helvetica".into();
        parent.text_align = TextAlign::Justify;
        let (style, diags) = resolve_one(&[], &parent);
        assert_eq!(style.font_family, "Helvetica");
        assert_eq!(style.text_align, TextAlign::Justify);
        assert!(diags.is_empty());
    }

    #[test]
    fn font_size_percent_and_em_resolve_against_parent() {
        let mut parent = Style::default();
        parent.font_size = 10.0;
        let (style, _) = resolve_one(&[("font-size", "150%")], &parent);
        assert_eq!(style.font_size, 15.0);
        let (style, _) = resolve_one(&[("font-size", "2em")], &parent);
        assert_eq!(style.font_size, 20.0);
    }

    #[test]
    fn unspecified_line_height_tracks_font_size() {
        let parent = Style::default();
        let (style, _) = resolve_one(&[("font-size", "24pt")], &parent);
        assert!((style.line_height - 28.8).abs() < 1e-4);
    }

    #[test]
    fn margin_percent_resolves_against_containing_width() {
        let (style, _) = resolve_one(&[("margin-left", "10%")], &Style::default());
        assert_eq!(style.margin.left, 40.0);
    }

    #[test]
    fn malformed_values_warn_and_keep_defaults() {
        let (style, diags) = resolve_one(
            &[
                ("font-size", "12furlong"),
                ("color", "#notacolor"),
                ("keep-together", "perhaps"),
            ],
            &Style::default(),
        );
        assert_eq!(style.font_size, 12.0);
        assert_eq!(style.color, [0.0, 0.0, 0.0]);
        assert_eq!(style.keep_together, Keep::Auto);
        assert_eq!(diags.warnings().len(), 3);
        assert_eq!(diags.warnings()[0].code, WarnCode::BadUnit);
        assert_eq!(diags.warnings()[1].code, WarnCode::BadColor);
        assert_eq!(diags.warnings()[2].code, WarnCode::BadValue);
    }

    #[test]
    fn border_shorthand() {
        let (style, diags) = resolve_one(&[("border", "2pt solid red")], &Style::default());
        assert!(diags.is_empty());
        assert_eq!(style.borders.top.width, 2.0);
        assert_eq!(style.borders.left.color, [1.0, 0.0, 0.0]);
        assert_eq!(style.borders.widths().horizontal(), 4.0);
    }

    #[test]
    fn width_keeps_percentages_for_layout() {
        let (style, _) = resolve_one(&[("width", "50%")], &Style::default());
        assert_eq!(style.width, Dim::Percent(50.0));
    }

    #[test]
    fn unsupported_property_warns() {
        let (_, diags) = resolve_one(&[("span", "all")], &Style::default());
        assert_eq!(diags.warnings()[0].code, WarnCode::UnsupportedFeature);
    }

    #[test]
    fn bold_and_decoration() {
        let (style, _) = resolve_one(
            &[
                ("font-weight", "bold"),
                ("text-decoration", "underline line-through"),
            ],
            &Style::default(),
        );
        assert_eq!(style.font_weight, FontWeight::Bold);
        assert!(style.underline && style.line_through);
    }
}
