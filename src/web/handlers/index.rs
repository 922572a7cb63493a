// GET /: the upload form.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde_json::json;
use tracing::warn;

use crate::extract::supported_extensions;
use crate::web::{text_error, AppState};

pub async fn index(State(state): State<AppState>) -> Response {
    let formats: Vec<String> = supported_extensions()
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect();

    match super::render_page(
        &state.templates,
        super::INDEX_PAGE,
        &json!({ "formats": formats.join(", ") }),
    ) {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            warn!(error = %e, "Could not render upload form");
            text_error(StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}"))
        }
    }
}
