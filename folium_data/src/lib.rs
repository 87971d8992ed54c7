// Copyright 2025 the Folium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Static tables the folium layout engine needs at runtime:
//!
//! - Adobe base-14 font metrics (advance widths, vertical metrics and common
//!   kerning pairs, all in 1/1000 em units).
//! - A compact range table mapping characters to their Unicode bidirectional
//!   class, plus the paired-bracket list.
//! - Liang hyphenation pattern sets for English, German, French and Spanish.
//!
//! Everything in this crate is `'static` and immutable; the engine never
//! mutates these tables and may share them freely across layout runs.

#![no_std]

pub mod afm;
pub mod bidi_class;
pub mod hyphen;
