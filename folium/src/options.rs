// Copyright 2025 the Folium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout configuration.

/// Line breaking algorithm selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineBreaking {
    /// First-fit, linear in the number of items.
    #[default]
    Greedy,
    /// Total-fit in the Knuth-Plass style; falls back to greedy for
    /// paragraphs with no feasible solution.
    Optimal,
}

/// What to do when an image cannot be decoded or probed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageErrorPolicy {
    /// Fail the layout run.
    #[default]
    Throw,
    /// Substitute a 1x1 placeholder and warn.
    Placeholder,
    /// Drop the graphic and warn.
    Skip,
}

/// Options recognized by the layout engine.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    pub line_breaking: LineBreaking,
    pub enable_hyphenation: bool,
    /// ISO 639-1 code, optionally with a region subtag.
    pub hyphenation_language: String,
    /// Minimum characters left before a hyphenation break.
    pub min_left_chars: usize,
    /// Minimum characters left after a hyphenation break.
    pub min_right_chars: usize,
    /// Minimum lines of a split paragraph at the top of a page.
    pub widows: u32,
    /// Minimum lines of a split paragraph at the bottom of a page.
    pub orphans: u32,
    /// Assumed resolution for images lacking DPI metadata.
    pub default_image_dpi: f32,
    pub allow_absolute_image_paths: bool,
    pub allowed_image_base_path: Option<String>,
    pub max_image_size_bytes: u64,
    /// Quota for user-supplied font data, in bytes.
    pub max_font_memory: u64,
    pub image_error_policy: ImageErrorPolicy,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            line_breaking: LineBreaking::Greedy,
            enable_hyphenation: false,
            hyphenation_language: "en".into(),
            min_left_chars: 2,
            min_right_chars: 3,
            widows: 2,
            orphans: 2,
            default_image_dpi: 96.0,
            allow_absolute_image_paths: false,
            allowed_image_base_path: None,
            max_image_size_bytes: 64 * 1024 * 1024,
            max_font_memory: 64 * 1024 * 1024,
            image_error_policy: ImageErrorPolicy::default(),
        }
    }
}
