// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Spreadsheet workbook handling.

pub mod reader;
pub mod writer;

pub use reader::{read_rows, SheetCell};
pub use writer::write_rows;
