// Copyright 2025 the Folium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! External graphic sizing: intrinsic size from the image prober, the
//! content-width/content-height/scaling rules, and the resource policy.

use crate::context::LayoutContext;
use crate::diag::{Diagnostic, DiagnosticSink, LayoutError, WarnCode};
use crate::fo::{FoTree, NodeId};
use crate::options::ImageErrorPolicy;
use crate::style::{Scaling, Style};

/// What the external image prober reports for a source.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInfo {
    pub format: String,
    pub width_px: u32,
    pub height_px: u32,
    pub dpi_x: Option<f32>,
    pub dpi_y: Option<f32>,
    /// Size of the encoded resource, when known.
    pub file_size: Option<u64>,
}

/// Collaborator interface: probes an image source for its metadata.
pub trait ImageProbe {
    fn probe(&self, source: &str) -> Result<ImageInfo, String>;
}

/// A display size decided for a graphic.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GraphicSize {
    pub source: String,
    pub width: f32,
    pub height: f32,
}

/// Resolves the display size of an `external-graphic`. Returns `None` when
/// the graphic is dropped under the configured error policy.
pub(crate) fn resolve_graphic(
    ctx: &mut LayoutContext,
    tree: &FoTree,
    node: NodeId,
    style: &Style,
) -> Result<Option<GraphicSize>, LayoutError> {
    let Some(raw_source) = tree.property(node, "src") else {
        ctx.diag.warn(Diagnostic {
            code: WarnCode::MissingImage,
            message: "external-graphic without src".to_owned(),
            location: style.id.clone(),
        });
        return Ok(None);
    };
    let source = raw_source
        .trim()
        .strip_prefix("url(")
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(raw_source.trim())
        .trim_matches(['\'', '"'])
        .to_owned();

    check_path_policy(ctx, &source)?;

    let info = match ctx.image_probe.as_ref().map(|probe| probe.probe(&source)) {
        Some(Ok(info)) => info,
        Some(Err(error)) => return image_error(ctx, &source, &error),
        None => return image_error(ctx, &source, "no image prober configured"),
    };
    if let Some(file_size) = info.file_size {
        if file_size > ctx.options.max_image_size_bytes {
            return Err(LayoutError::ResourcePolicy(format!(
                "image {source:?} is {file_size} bytes, over the max_image_size_bytes cap of {}",
                ctx.options.max_image_size_bytes
            )));
        }
    }

    let dpi_x = info.dpi_x.unwrap_or(ctx.options.default_image_dpi);
    let dpi_y = info.dpi_y.unwrap_or(ctx.options.default_image_dpi);
    let intrinsic_width = info.width_px as f32 * 72.0 / dpi_x.max(1.0);
    let intrinsic_height = info.height_px as f32 * 72.0 / dpi_y.max(1.0);

    let content_width = style.content_width.resolve(intrinsic_width);
    let content_height = style.content_height.resolve(intrinsic_height);
    let (width, height) = match (content_width, content_height, style.scaling) {
        (None, None, _) => (intrinsic_width, intrinsic_height),
        (Some(w), None, Scaling::Uniform) => (w, intrinsic_height * w / intrinsic_width.max(1e-6)),
        (Some(w), None, Scaling::NonUniform) => (w, intrinsic_height),
        (None, Some(h), Scaling::Uniform) => (intrinsic_width * h / intrinsic_height.max(1e-6), h),
        (None, Some(h), Scaling::NonUniform) => (intrinsic_width, h),
        (Some(w), Some(h), Scaling::NonUniform) => (w, h),
        (Some(w), Some(h), Scaling::Uniform) => {
            // Fit inside the requested box, preserving the aspect ratio.
            let scale = (w / intrinsic_width.max(1e-6)).min(h / intrinsic_height.max(1e-6));
            (intrinsic_width * scale, intrinsic_height * scale)
        }
    };

    Ok(Some(GraphicSize {
        source,
        width,
        height,
    }))
}

fn check_path_policy(ctx: &LayoutContext, source: &str) -> Result<(), LayoutError> {
    let is_url = source.contains("://");
    if is_url {
        return Ok(());
    }
    let is_absolute = source.starts_with('/')
        || (source.len() > 2 && source.as_bytes()[1] == b':' && source.as_bytes()[2] == b'\\');
    if is_absolute && !ctx.options.allow_absolute_image_paths {
        return Err(LayoutError::ResourcePolicy(format!(
            "absolute image path {source:?} rejected; set allow_absolute_image_paths to permit it"
        )));
    }
    if let Some(base) = &ctx.options.allowed_image_base_path {
        if !source.starts_with(base.as_str()) {
            return Err(LayoutError::ResourcePolicy(format!(
                "image {source:?} is outside allowed_image_base_path {base:?}"
            )));
        }
    }
    Ok(())
}

/// Applies the configured image error policy.
fn image_error(
    ctx: &mut LayoutContext,
    source: &str,
    error: &str,
) -> Result<Option<GraphicSize>, LayoutError> {
    match ctx.options.image_error_policy {
        ImageErrorPolicy::Throw => Err(LayoutError::Image(source.to_owned(), error.to_owned())),
        ImageErrorPolicy::Placeholder => {
            ctx.diag.warn(Diagnostic {
                code: WarnCode::MissingImage,
                message: format!("{source:?}: {error}; substituting a 1x1 placeholder"),
                location: None,
            });
            Ok(Some(GraphicSize {
                source: source.to_owned(),
                width: 1.0,
                height: 1.0,
            }))
        }
        ImageErrorPolicy::Skip => {
            ctx.diag.warn(Diagnostic {
                code: WarnCode::MissingImage,
                message: format!("{source:?}: {error}; skipping"),
                location: None,
            });
            Ok(None)
        }
    }
}
