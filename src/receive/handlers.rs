//! HTTP handlers for the upload form and submissions.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::common::constants::MAX_MEMORY_BYTES;
use crate::common::AppError;
use crate::receive::state::ReceiveAppState;
use crate::receive::storage::UploadBatch;
use crate::ui::web::{self, UploadFormContext};

/// Any non-POST request to `/` shows the form.
pub async fn upload_form(State(state): State<ReceiveAppState>) -> impl IntoResponse {
    let ctx = UploadFormContext {
        allow_multiple: state.allow_multiple,
    };
    (web::hardening_headers(), Html(web::render_upload_form(&ctx)))
}

/// Accept one submission: collect, check multiplicity, persist, count once.
///
/// Failures render the error page with 200, as browsers show it in place of
/// the form. They are never counted.
pub async fn receive_upload(
    State(state): State<ReceiveAppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    match process_upload(&state, multipart).await {
        Ok(file_count) => {
            tracing::info!(file_count, "Upload complete");
            state.session.record_transfer();
            (
                web::hardening_headers(),
                Html(web::render_message("Upload successful!")),
            )
                .into_response()
        }
        Err(err) => err.into_page(StatusCode::OK),
    }
}

async fn process_upload(
    state: &ReceiveAppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<usize, AppError> {
    let mut multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let batch = UploadBatch::collect(&mut multipart, MAX_MEMORY_BYTES).await?;
    tracing::debug!(file_count = batch.len(), "receive_upload");

    // Nothing is written if the batch is rejected here
    batch.ensure_allowed(state.allow_multiple)?;

    let saved = batch.persist(state.destination()).await?;
    Ok(saved.len())
}
