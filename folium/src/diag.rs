// Copyright 2025 the Folium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diagnostics and the fatal error type.
//!
//! Recoverable problems (bad property values, missing resources, unsupported
//! features) are reported through a [`DiagnosticSink`] and replaced by
//! documented defaults; they never abort a layout run. Unrecoverable problems
//! surface as [`LayoutError`].

use thiserror::Error;

/// Classification of a recoverable warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarnCode {
    /// A property value could not be parsed.
    BadValue,
    /// A length carried an unrecognized unit.
    BadUnit,
    /// A color could not be parsed.
    BadColor,
    /// A recognized but unimplemented feature was requested.
    UnsupportedFeature,
    /// An image could not be probed or decoded.
    MissingImage,
    /// A requested font could not be resolved and a fallback was substituted.
    MissingFont,
    /// No hyphenation patterns exist for the requested language.
    UnknownLanguage,
    /// A reference (`ref-id`, `internal-destination`) did not resolve.
    UnresolvedReference,
}

/// One recoverable warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: WarnCode,
    pub message: String,
    /// Best-effort description of the source location, e.g. a property name
    /// or an element id.
    pub location: Option<String>,
}

/// Receiver for recoverable warnings.
pub trait DiagnosticSink {
    fn warn(&mut self, diagnostic: Diagnostic);
}

/// The default sink: collects warnings in order.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    warnings: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Removes and returns all collected warnings.
    pub fn drain(&mut self) -> Vec<Diagnostic> {
        core::mem::take(&mut self.warnings)
    }
}

impl DiagnosticSink for Diagnostics {
    fn warn(&mut self, diagnostic: Diagnostic) {
        log::debug!(
            "{:?}: {} ({})",
            diagnostic.code,
            diagnostic.message,
            diagnostic.location.as_deref().unwrap_or("unknown location"),
        );
        self.warnings.push(diagnostic);
    }
}

/// A failure that aborts the layout run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("no simple-page-master named {0:?} in the layout-master-set")]
    MissingPageMaster(String),
    #[error("malformed source tree: {0}")]
    MalformedTree(String),
    #[error("region {name:?} of master {master:?} has zero width or height")]
    ZeroRegion { master: String, name: String },
    #[error("resource policy violation: {0}")]
    ResourcePolicy(String),
    #[error("invalid image {0:?}: {1}")]
    Image(String, String),
    #[error("invalid font {0:?}: {1}")]
    Font(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_collects_in_order() {
        let mut diags = Diagnostics::new();
        diags.warn(Diagnostic {
            code: WarnCode::BadUnit,
            message: "unknown unit 'furlong'".into(),
            location: Some("font-size".into()),
        });
        diags.warn(Diagnostic {
            code: WarnCode::BadColor,
            message: "bad color '#zzz'".into(),
            location: None,
        });
        assert_eq!(diags.warnings().len(), 2);
        assert_eq!(diags.warnings()[0].code, WarnCode::BadUnit);
        assert_eq!(diags.drain().len(), 2);
        assert!(diags.is_empty());
    }

    #[test]
    fn error_messages_name_the_offender() {
        let err = LayoutError::MissingPageMaster("simple".into());
        assert!(err.to_string().contains("simple"));
    }
}
