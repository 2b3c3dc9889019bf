// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Structured-data handling: the generic value tree, format codecs, and the
// XML structural mapper.

pub mod codecs;
pub mod mapper;
pub mod value;

pub use codecs::{as_table, parse, serialize};
pub use value::DataValue;
