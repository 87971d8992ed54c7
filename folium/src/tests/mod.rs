// Copyright 2025 the Folium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integration tests: whole documents through the public API.

mod test_pagination;
mod test_scenarios;
mod test_statics;
mod utils;
