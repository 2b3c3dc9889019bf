// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Request handlers. The convert endpoint validates the multipart form,
// stages the upload in a request-scoped workdir, and runs the conversion
// on a blocking task under the configured deadline.

use std::time::Duration;

use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use formwerk_core::{Format, FormwerkError};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::routes::AppContext;

/// Served at `/` when no frontend is deployed in front of the service.
const INDEX_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Formwerk File Converter</title>
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
</head>
<body>
    <h1>Formwerk File Converter</h1>
    <p>POST a multipart form to <code>/convert</code> with a <code>file</code>
    part carrying the upload and a <code>format</code> part naming the target
    extension. The converted file comes back as an attachment.</p>
    <pre>curl -F file=@report.csv -F format=json http://localhost:5000/convert -o report.json</pre>
    <h2>Supported conversions</h2>
    <ul>
        <li>Images (png, jpg, jpeg, gif, bmp, svg, webp) to any other image format, or to pdf</li>
        <li>PDF first page to png, jpg, jpeg, bmp or gif</li>
        <li>Documents: txt and docx to each other, or to pdf</li>
        <li>Data files (csv, json, xml, yaml) to each other, or to pdf</li>
        <li>Spreadsheets (xlsx, xls, ods) to csv, xlsx or ods</li>
    </ul>
    <p>Health probe: <code>GET /health</code></p>
</body>
</html>
"#;

pub async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

#[instrument(skip_all)]
pub async fn convert(
    State(ctx): State<AppContext>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let mut multipart = multipart.map_err(|_| ApiError::NoFile)?;

    let mut file_bytes: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;
    let mut target_name: Option<String> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(ApiError::from_multipart(e)),
        };
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                filename = field.file_name().map(str::to_owned);
                let bytes = field.bytes().await.map_err(ApiError::from_multipart)?;
                file_bytes = Some(bytes.to_vec());
            }
            Some("format") => {
                let text = field.text().await.map_err(ApiError::from_multipart)?;
                target_name = Some(text);
            }
            _ => {}
        }
    }

    let file_bytes = file_bytes.ok_or(ApiError::NoFile)?;
    let filename = filename
        .filter(|name| !name.is_empty())
        .ok_or(ApiError::NoFileSelected)?;
    let target_name = target_name
        .filter(|name| !name.is_empty())
        .ok_or(ApiError::NoTargetFormat)?;
    let source = Format::from_filename(&filename).ok_or(ApiError::UnsupportedFileType)?;

    // An unrecognized target is not a validation failure: it falls through
    // to the conversion outcome, like any other unroutable pair.
    let Some(target) = Format::from_extension(&target_name) else {
        warn!(target = %target_name, "Unknown target format");
        return Err(ApiError::ConversionFailed);
    };

    info!(
        filename = %filename,
        source = %source,
        target = %target,
        input_bytes = file_bytes.len(),
        "Conversion requested"
    );

    let output = run_conversion(&ctx, file_bytes, source, target).await?;

    let disposition = format!("attachment; filename=\"converted.{}\"", target.extension());
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, target.mime_type().to_owned()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        output,
    )
        .into_response())
}

/// Run one conversion on a blocking task under the configured deadline.
///
/// The workdir moves into the task, so a run abandoned at the deadline still
/// removes its files when it eventually finishes.
async fn run_conversion(
    ctx: &AppContext,
    input: Vec<u8>,
    source: Format,
    target: Format,
) -> Result<Vec<u8>, ApiError> {
    let workdir = tempfile::Builder::new()
        .prefix(&format!("formwerk-{}", Uuid::new_v4()))
        .tempdir()
        .map_err(|e| {
            error!(error = %e, "Could not create a working directory");
            ApiError::Internal
        })?;

    let input_name = format!("input.{}", source.extension());
    let output_name = format!("converted.{}", target.extension());
    let task = tokio::task::spawn_blocking(move || {
        let input_path = workdir.path().join(input_name);
        let output_path = workdir.path().join(output_name);
        std::fs::write(&input_path, &input)?;
        formwerk_formats::convert_file(&input_path, &output_path, source, target)?;
        Ok::<_, FormwerkError>(std::fs::read(&output_path)?)
    });

    let deadline = Duration::from_secs(ctx.config.conversion_timeout_secs);
    let outcome = match tokio::time::timeout(deadline, task).await {
        Err(_) => Err(FormwerkError::Timeout(ctx.config.conversion_timeout_secs)),
        Ok(Err(e)) => {
            error!(error = %e, "Conversion task did not complete");
            return Err(ApiError::Internal);
        }
        Ok(Ok(outcome)) => outcome,
    };

    match outcome {
        Ok(bytes) => Ok(bytes),
        Err(e) => {
            warn!(error = %e, "Conversion failed");
            Err(ApiError::ConversionFailed)
        }
    }
}
