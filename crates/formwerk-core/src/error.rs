// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Formwerk.

use thiserror::Error;

use crate::types::Format;

/// Top-level error type for all Formwerk operations.
///
/// The first group carries the conversion failure causes surfaced by the
/// orchestrator; callers can log the precise cause while the HTTP layer
/// keeps its coarse user-facing contract.
#[derive(Debug, Error)]
pub enum FormwerkError {
    // -- Conversion causes --
    #[error("unsupported conversion: {from} to {to}")]
    UnsupportedConversion { from: Format, to: Format },

    #[error("input file not found: {0}")]
    InputNotFound(String),

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("failed to write output: {0}")]
    WriteFailure(String),

    #[error("conversion failed: {0}")]
    Unknown(String),

    // -- Backend availability --
    #[error("PDF rasterizer unavailable: {0}")]
    RasterUnavailable(String),

    // -- Request handling --
    #[error("conversion timed out after {0}s")]
    Timeout(u64),

    #[error("server error: {0}")]
    Server(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FormwerkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_conversion_names_both_formats() {
        let error = FormwerkError::UnsupportedConversion {
            from: Format::Pdf,
            to: Format::Docx,
        };
        assert_eq!(error.to_string(), "unsupported conversion: pdf to docx");
    }

    #[test]
    fn io_errors_convert_into_the_workspace_type() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let error = FormwerkError::from(io);
        assert!(matches!(error, FormwerkError::Io(_)));
    }
}
