// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Wire-level error contract. Messages are fixed strings; internal causes
// are logged server-side and never leaked into responses.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ApiError {
    // -- Request validation --
    #[error("No file provided")]
    NoFile,
    #[error("No file selected")]
    NoFileSelected,
    #[error("No target format specified")]
    NoTargetFormat,
    #[error("File type not supported")]
    UnsupportedFileType,

    // -- Payload limits --
    #[error("File too large")]
    TooLarge,

    // -- Conversion --
    #[error("Conversion failed")]
    ConversionFailed,
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NoFile
            | ApiError::NoFileSelected
            | ApiError::NoTargetFormat
            | ApiError::UnsupportedFileType => StatusCode::BAD_REQUEST,
            ApiError::TooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::ConversionFailed | ApiError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Classify a multipart read failure. Body-limit overruns surface as
    /// 413 through the limited body; anything else means the form carried
    /// no usable file field.
    pub fn from_multipart(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::TooLarge
        } else {
            ApiError::NoFile
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (self.status_code(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_bad_requests() {
        for error in [
            ApiError::NoFile,
            ApiError::NoFileSelected,
            ApiError::NoTargetFormat,
            ApiError::UnsupportedFileType,
        ] {
            assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn messages_match_the_wire_contract() {
        assert_eq!(ApiError::NoFile.to_string(), "No file provided");
        assert_eq!(ApiError::NoFileSelected.to_string(), "No file selected");
        assert_eq!(
            ApiError::NoTargetFormat.to_string(),
            "No target format specified"
        );
        assert_eq!(
            ApiError::UnsupportedFileType.to_string(),
            "File type not supported"
        );
        assert_eq!(ApiError::TooLarge.to_string(), "File too large");
        assert_eq!(ApiError::ConversionFailed.to_string(), "Conversion failed");
        assert_eq!(ApiError::Internal.to_string(), "Internal server error");
    }

    #[test]
    fn oversize_and_conversion_failures_have_their_statuses() {
        assert_eq!(
            ApiError::TooLarge.status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            ApiError::ConversionFailed.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
