// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster and vector image handling.

pub mod codec;
pub mod svg;

pub use codec::{decode, encode};
