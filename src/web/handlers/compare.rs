// POST /compare: compare two uploaded documents.
//
// Returns 400 if either file is missing, 413 if the request is over the
// upload limit, 500 if a document can't be extracted (including unsupported
// file types), and the rendered result page otherwise.

use std::sync::Arc;

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde_json::json;
use tracing::{info, warn};

use crate::compare::{compare_files, CompareOptions, Comparison};
use crate::error::{error_chain, CompareError};
use crate::output::similarity_band;
use crate::web::uploads::{sanitize_file_name, UploadDir};
use crate::web::{text_error, AppState};

const FIELDS: [&str; 2] = ["file1", "file2"];

struct Upload {
    file_name: String,
    bytes: Vec<u8>,
}

pub async fn compare(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut uploads: [Option<Upload>; 2] = [None, None];

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return multipart_error(e),
        };
        let Some(slot) = field
            .name()
            .and_then(|name| FIELDS.iter().position(|f| *f == name))
        else {
            continue;
        };
        // An empty file input still submits a part, with no file name
        let Some(file_name) = field.file_name().and_then(sanitize_file_name) else {
            continue;
        };
        let bytes = match field.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) => return multipart_error(e),
        };
        uploads[slot] = Some(Upload { file_name, bytes });
    }

    let [Some(first), Some(second)] = uploads else {
        return error_response(CompareError::MissingInput(
            "Please upload two files".to_string(),
        ));
    };

    let config = Arc::clone(&state.config);
    let embedder = Arc::clone(&state.embedder);
    let options = CompareOptions {
        context_lines: config.diff_context,
    };

    // Saving, extraction and inference all block, so the whole request body
    // runs on the blocking pool. upload_dir lives until the comparison is
    // done and is cleaned up when the closure returns.
    let outcome = tokio::task::spawn_blocking(
        move || -> anyhow::Result<Result<Comparison, CompareError>> {
            let upload_dir = UploadDir::create(&config.upload_dir, config.keep_uploads)?;
            let path1 = upload_dir.save(FIELDS[0], &first.file_name, &first.bytes)?;
            let path2 = upload_dir.save(FIELDS[1], &second.file_name, &second.bytes)?;
            Ok(compare_files(embedder.as_ref(), &path1, &path2, options))
        },
    )
    .await;

    match outcome {
        Ok(Ok(Ok(comparison))) => {
            info!(similarity = comparison.similarity, "Served comparison");
            let data = json!({
                "similarity": format!("{:.4}", comparison.similarity),
                "band": similarity_band(comparison.similarity),
                "differences": comparison.diff.to_string(),
            });
            match super::render_page(&state.templates, super::RESULT_PAGE, &data) {
                Ok(page) => Html(page).into_response(),
                Err(e) => {
                    warn!(error = %e, "Could not render result page");
                    text_error(StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}"))
                }
            }
        }
        Ok(Ok(Err(e))) => error_response(e),
        Ok(Err(e)) => {
            warn!(error = %e, "Could not store uploads");
            text_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Could not store uploads: {e:#}"),
            )
        }
        Err(e) => text_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Comparison task failed: {e}"),
        ),
    }
}

/// A multipart read failure keeps the status axum assigns it, so a body
/// over the upload limit is 413 rather than a generic bad request.
fn multipart_error(err: MultipartError) -> Response {
    let status = err.status();
    warn!(status = status.as_u16(), error = %err, "Rejected upload");
    text_error(status, format!("Upload rejected: {}", err.body_text()))
}

fn error_response(err: CompareError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let message = match &err {
        CompareError::MissingInput(msg) => msg.clone(),
        CompareError::UnsupportedFormat(_) | CompareError::ExtractionFailed { .. } => {
            format!("Error extracting text: {}", error_chain(&err))
        }
        CompareError::Scoring(_) => format!("Error comparing documents: {}", error_chain(&err)),
    };
    warn!(status = status.as_u16(), "{message}");
    text_error(status, message)
}
