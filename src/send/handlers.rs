//! HTTP handlers for the redirect and file routes.

use anyhow::Context;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, Method, Response, StatusCode},
    response::IntoResponse,
};
use tokio_util::io::ReaderStream;

use crate::common::AppError;
use crate::send::stream::CompletionStream;
use crate::utils::encoding::escape_path_segment;

use super::SendAppState;

/// `GET /` and any path that is not the file route send the peer to the file route.
pub async fn redirect_to_file(State(state): State<SendAppState>) -> Response<Body> {
    redirect(&state)
}

fn redirect(state: &SendAppState) -> Response<Body> {
    (StatusCode::FOUND, [(header::LOCATION, state.file_route())]).into_response()
}

/// Stream the shared file as an attachment and count it once fully handed off.
///
/// HEAD gets the same headers with no body and is never counted.
pub async fn send_file(
    method: Method,
    Path(requested): Path<String>,
    State(state): State<SendAppState>,
) -> Result<Response<Body>, AppError> {
    // Path captures are already percent-decoded.
    if requested != state.file_name {
        tracing::debug!(%requested, "Redirecting to file route");
        return Ok(redirect(&state));
    }

    let file = tokio::fs::File::open(&state.file_path).await?;
    let metadata = file.metadata().await?;
    if !metadata.is_file() {
        return Err(AppError::NotFound(format!(
            "{} is not a regular file",
            state.file_name
        )));
    }
    let size = metadata.len();

    let content_type = mime_guess::from_path(&state.file_path)
        .first_or_octet_stream()
        .to_string();
    let disposition = format!(
        "attachment; filename=\"{}\"",
        escape_path_segment(&state.file_name)
    );

    tracing::info!(file = %state.file_name, bytes = size, %method, "Serving download");

    let body = if method == Method::HEAD {
        Body::empty()
    } else {
        let session = state.session.clone();
        Body::from_stream(CompletionStream::new(ReaderStream::new(file), size, move || {
            session.record_transfer();
        }))
    };

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, size)
        .header(header::CONTENT_DISPOSITION, disposition)
        .header(header::ACCEPT_RANGES, "none")
        .body(body)
        .context("build response")?;

    Ok(response)
}
