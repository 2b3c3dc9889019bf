// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Workbook reading. Only the first worksheet takes part in conversion.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use formwerk_core::error::{FormwerkError, Result};

/// A single spreadsheet cell, reduced to the types conversion keeps.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetCell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl SheetCell {
    /// Cell content as display text, the form CSV export uses.
    pub fn as_text(&self) -> String {
        match self {
            SheetCell::Empty => String::new(),
            SheetCell::Text(v) => v.clone(),
            SheetCell::Number(v) => v.to_string(),
            SheetCell::Bool(v) => v.to_string(),
        }
    }
}

/// Read the first worksheet of an XLSX, XLS, or ODS workbook.
pub fn read_rows(bytes: &[u8]) -> Result<Vec<Vec<SheetCell>>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| FormwerkError::MalformedInput(format!("workbook open: {e}")))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| FormwerkError::MalformedInput("workbook has no sheets".to_string()))?
        .map_err(|e| FormwerkError::MalformedInput(format!("worksheet read: {e}")))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect())
}

fn cell_from_data(data: &Data) -> SheetCell {
    match data {
        Data::Empty => SheetCell::Empty,
        Data::String(v) => SheetCell::Text(v.clone()),
        Data::Float(v) => SheetCell::Number(*v),
        Data::Int(v) => SheetCell::Number(*v as f64),
        Data::Bool(v) => SheetCell::Bool(*v),
        // Formula errors keep their spreadsheet spelling, e.g. #DIV/0!.
        Data::Error(e) => SheetCell::Text(e.to_string()),
        // Serial date number; exports render it as its numeric value.
        Data::DateTime(v) => SheetCell::Number(v.as_f64()),
        Data::DateTimeIso(v) | Data::DurationIso(v) => SheetCell::Text(v.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_text_renders_each_variant() {
        assert_eq!(SheetCell::Empty.as_text(), "");
        assert_eq!(SheetCell::Text("abc".into()).as_text(), "abc");
        assert_eq!(SheetCell::Number(2.5).as_text(), "2.5");
        assert_eq!(SheetCell::Number(42.0).as_text(), "42");
        assert_eq!(SheetCell::Bool(true).as_text(), "true");
    }

    #[test]
    fn garbage_bytes_are_not_a_workbook() {
        assert!(matches!(
            read_rows(b"definitely not a workbook"),
            Err(FormwerkError::MalformedInput(_))
        ));
    }
}
