// Copyright 2025 the Folium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parsers for property value strings: lengths, colors, keywords.

use super::{
    AbsolutePosition, BorderStyle, BreakRule, Dim, Direction, FontStyle, FontWeight, Keep,
    LeaderPattern, Rgb, Scaling, TextAlign,
};

/// Points per inch.
const PT_PER_IN: f32 = 72.0;
/// CSS reference pixel: 96 per inch.
const PT_PER_PX: f32 = 0.75;
const PT_PER_PC: f32 = 12.0;
const PT_PER_CM: f32 = PT_PER_IN / 2.54;
const PT_PER_MM: f32 = PT_PER_CM / 10.0;

/// A recoverable value-parse failure; the caller substitutes the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

fn split_number(value: &str) -> Result<(f32, &str), ParseError> {
    let value = value.trim();
    let end = value
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
        .unwrap_or(value.len());
    let number: f32 = value[..end]
        .parse()
        .map_err(|_| ParseError::new(format!("malformed number in {value:?}")))?;
    Ok((number, value[end..].trim()))
}

/// Parses a length into points. `em` is the relevant font size and
/// `percent_base` the value percentages resolve against, when one applies.
pub(crate) fn parse_length(
    value: &str,
    em: f32,
    percent_base: Option<f32>,
) -> Result<f32, ParseError> {
    let (number, unit) = split_number(value)?;
    match unit {
        // Unitless numbers resolve to points.
        "" | "pt" => Ok(number),
        "px" => Ok(number * PT_PER_PX),
        "in" => Ok(number * PT_PER_IN),
        "cm" => Ok(number * PT_PER_CM),
        "mm" => Ok(number * PT_PER_MM),
        "pc" => Ok(number * PT_PER_PC),
        "em" => Ok(number * em),
        "%" => percent_base
            .map(|base| number * base / 100.0)
            .ok_or_else(|| ParseError::new(format!("no percentage base for {value:?}"))),
        _ => Err(ParseError::new(format!(
            "unrecognized unit {unit:?} in {value:?}"
        ))),
    }
}

/// Parses a width/height-like value, keeping percentages unresolved.
pub(crate) fn parse_dim(value: &str, em: f32) -> Result<Dim, ParseError> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("auto") {
        return Ok(Dim::Auto);
    }
    let (number, unit) = split_number(value)?;
    if unit == "%" {
        Ok(Dim::Percent(number))
    } else {
        parse_length(value, em, None).map(Dim::Pt)
    }
}

/// `line-height`: a bare number is a font-size multiplier, `normal` is 1.2.
pub(crate) fn parse_line_height(value: &str, font_size: f32) -> Result<f32, ParseError> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("normal") {
        return Ok(font_size * 1.2);
    }
    let (number, unit) = split_number(value)?;
    if unit.is_empty() {
        Ok(number * font_size)
    } else {
        parse_length(value, font_size, Some(font_size))
    }
}

fn named_color(name: &str) -> Option<Rgb> {
    let rgb = |r: u8, g: u8, b: u8| [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0];
    Some(match name {
        "black" => rgb(0, 0, 0),
        "silver" => rgb(192, 192, 192),
        "gray" | "grey" => rgb(128, 128, 128),
        "white" => rgb(255, 255, 255),
        "maroon" => rgb(128, 0, 0),
        "red" => rgb(255, 0, 0),
        "purple" => rgb(128, 0, 128),
        "fuchsia" | "magenta" => rgb(255, 0, 255),
        "green" => rgb(0, 128, 0),
        "lime" => rgb(0, 255, 0),
        "olive" => rgb(128, 128, 0),
        "yellow" => rgb(255, 255, 0),
        "navy" => rgb(0, 0, 128),
        "blue" => rgb(0, 0, 255),
        "teal" => rgb(0, 128, 128),
        "aqua" | "cyan" => rgb(0, 255, 255),
        "orange" => rgb(255, 165, 0),
        _ => return None,
    })
}

fn hex_nibble(byte: u8) -> Result<u32, ParseError> {
    (byte as char)
        .to_digit(16)
        .ok_or_else(|| ParseError::new("bad hex digit in color"))
}

/// Parses a color: named, `#rgb`, `#rrggbb`, or `rgb(r, g, b)`.
pub(crate) fn parse_color(value: &str) -> Result<Rgb, ParseError> {
    let value = value.trim();
    let lower = value.to_ascii_lowercase();
    if let Some(rgb) = named_color(&lower) {
        return Ok(rgb);
    }
    if let Some(hex) = value.strip_prefix('#') {
        let bytes = hex.as_bytes();
        return match bytes.len() {
            3 => {
                let mut out = [0.0; 3];
                for (slot, &b) in out.iter_mut().zip(bytes) {
                    let nibble = hex_nibble(b)?;
                    *slot = (nibble * 17) as f32 / 255.0;
                }
                Ok(out)
            }
            6 => {
                let mut out = [0.0; 3];
                for (i, slot) in out.iter_mut().enumerate() {
                    let hi = hex_nibble(bytes[i * 2])?;
                    let lo = hex_nibble(bytes[i * 2 + 1])?;
                    *slot = (hi * 16 + lo) as f32 / 255.0;
                }
                Ok(out)
            }
            _ => Err(ParseError::new(format!("bad hex color {value:?}"))),
        };
    }
    if let Some(args) = lower.strip_prefix("rgb(").and_then(|s| s.strip_suffix(')')) {
        let mut out = [0.0; 3];
        let mut parts = args.split(',');
        for slot in &mut out {
            let part = parts
                .next()
                .ok_or_else(|| ParseError::new(format!("bad rgb() color {value:?}")))?
                .trim();
            let component = if let Some(pct) = part.strip_suffix('%') {
                pct.parse::<f32>()
                    .map_err(|_| ParseError::new(format!("bad rgb() component {part:?}")))?
                    * 255.0
                    / 100.0
            } else {
                part.parse::<f32>()
                    .map_err(|_| ParseError::new(format!("bad rgb() component {part:?}")))?
            };
            *slot = (component / 255.0).clamp(0.0, 1.0);
        }
        if parts.next().is_some() {
            return Err(ParseError::new(format!("bad rgb() color {value:?}")));
        }
        return Ok(out);
    }
    Err(ParseError::new(format!("unrecognized color {value:?}")))
}

pub(crate) fn parse_font_weight(value: &str) -> Result<FontWeight, ParseError> {
    match value.trim() {
        "normal" | "400" | "300" | "200" | "100" => Ok(FontWeight::Normal),
        "bold" | "bolder" | "700" | "800" | "900" | "600" | "500" => Ok(FontWeight::Bold),
        other => Err(ParseError::new(format!("unrecognized font-weight {other:?}"))),
    }
}

pub(crate) fn parse_font_style(value: &str) -> Result<FontStyle, ParseError> {
    match value.trim() {
        "normal" | "backslant" => Ok(FontStyle::Normal),
        "italic" | "oblique" => Ok(FontStyle::Italic),
        other => Err(ParseError::new(format!("unrecognized font-style {other:?}"))),
    }
}

pub(crate) fn parse_text_align(value: &str) -> Result<TextAlign, ParseError> {
    match value.trim() {
        "start" | "left" => Ok(TextAlign::Start),
        "end" | "right" => Ok(TextAlign::End),
        "center" => Ok(TextAlign::Center),
        "justify" => Ok(TextAlign::Justify),
        other => Err(ParseError::new(format!("unrecognized text-align {other:?}"))),
    }
}

pub(crate) fn parse_direction(value: &str) -> Result<Direction, ParseError> {
    match value.trim() {
        "ltr" => Ok(Direction::Ltr),
        "rtl" => Ok(Direction::Rtl),
        other => Err(ParseError::new(format!("unrecognized direction {other:?}"))),
    }
}

pub(crate) fn parse_break(value: &str) -> Result<BreakRule, ParseError> {
    match value.trim() {
        "auto" => Ok(BreakRule::Auto),
        // Column breaks degrade to page breaks in a single-column region.
        "page" | "always" | "column" => Ok(BreakRule::Page),
        "odd-page" | "odd" => Ok(BreakRule::OddPage),
        "even-page" | "even" => Ok(BreakRule::EvenPage),
        other => Err(ParseError::new(format!("unrecognized break {other:?}"))),
    }
}

pub(crate) fn parse_keep(value: &str) -> Result<Keep, ParseError> {
    match value.trim() {
        "auto" => Ok(Keep::Auto),
        "always" => Ok(Keep::Always),
        other => other
            .parse::<u32>()
            .map(Keep::Strength)
            .map_err(|_| ParseError::new(format!("unrecognized keep {other:?}"))),
    }
}

pub(crate) fn parse_leader_pattern(value: &str) -> Result<LeaderPattern, ParseError> {
    match value.trim() {
        "space" => Ok(LeaderPattern::Space),
        "rule" => Ok(LeaderPattern::Rule),
        "dots" => Ok(LeaderPattern::Dots),
        other => Err(ParseError::new(format!(
            "unrecognized leader-pattern {other:?}"
        ))),
    }
}

pub(crate) fn parse_border_style(value: &str) -> Result<BorderStyle, ParseError> {
    match value.trim() {
        "none" | "hidden" => Ok(BorderStyle::None),
        "solid" => Ok(BorderStyle::Solid),
        "dashed" => Ok(BorderStyle::Dashed),
        "dotted" => Ok(BorderStyle::Dotted),
        "double" => Ok(BorderStyle::Double),
        other => Err(ParseError::new(format!(
            "unrecognized border-style {other:?}"
        ))),
    }
}

pub(crate) fn parse_absolute_position(value: &str) -> Result<AbsolutePosition, ParseError> {
    match value.trim() {
        "auto" | "relative" => Ok(AbsolutePosition::Auto),
        "absolute" => Ok(AbsolutePosition::Absolute),
        "fixed" => Ok(AbsolutePosition::Fixed),
        other => Err(ParseError::new(format!(
            "unrecognized absolute-position {other:?}"
        ))),
    }
}

pub(crate) fn parse_scaling(value: &str) -> Result<Scaling, ParseError> {
    match value.trim() {
        "uniform" => Ok(Scaling::Uniform),
        "non-uniform" => Ok(Scaling::NonUniform),
        other => Err(ParseError::new(format!("unrecognized scaling {other:?}"))),
    }
}

pub(crate) fn parse_int(value: &str) -> Result<u32, ParseError> {
    value
        .trim()
        .parse()
        .map_err(|_| ParseError::new(format!("malformed integer {value:?}")))
}

pub(crate) fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(ParseError::new(format!("unrecognized boolean {other:?}"))),
    }
}
