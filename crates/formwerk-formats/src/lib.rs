// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// formwerk-formats — Conversion handlers for the Formwerk service.
//
// Provides the per-family conversion routines (image recode, PDF write and
// rasterize, txt/docx documents, structured-data codecs with the XML
// structural mapper, spreadsheet read/write) and the orchestrator that
// dispatches a routed request to the right handler. Everything here is
// synchronous; callers that live on an async runtime offload to a blocking
// task.

pub mod convert;
pub mod data;
pub mod document;
pub mod image;
pub mod pdf;
pub mod sheet;

// Re-export the primary entry points so callers can use
// `formwerk_formats::convert_file` etc.
pub use convert::{convert_bytes, convert_file};
pub use data::value::DataValue;
pub use pdf::reader::PdfReader;
pub use pdf::writer::PdfWriter;
