//! Router definitions for download and upload modes

use crate::{
    common::AppError,
    receive::{self, ReceiveAppState},
    send::{self, SendAppState},
};
use axum::{extract::DefaultBodyLimit, routing::*, Router};
use tower_http::trace::TraceLayer;

/// Build the router for download mode: `/<name>` serves the file, every other path redirects there.
pub fn create_send_router(state: &SendAppState) -> Router {
    Router::new()
        .route("/", get(send::handlers::redirect_to_file))
        .route("/*requested", get(send::handlers::send_file))
        .fallback(send::handlers::redirect_to_file)
        .with_state(state.clone())
        .layer(TraceLayer::new_for_http())
}

/// Build the router for upload mode. Every method other than POST on `/` gets the form.
pub fn create_receive_router(state: &ReceiveAppState) -> Router {
    Router::new()
        .route(
            "/",
            post(receive::handlers::receive_upload).fallback(receive::handlers::upload_form),
        )
        .fallback(not_found)
        .with_state(state.clone())
        // Uploads are spooled to disk past the memory budget, so no size cap.
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
}

async fn not_found() -> AppError {
    AppError::NotFound("404 page not found".to_string())
}
