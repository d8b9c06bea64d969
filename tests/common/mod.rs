#![allow(dead_code)]

pub mod config_test_utils;
pub mod receive_http;
pub mod send_http;

use std::num::NonZeroU32;

use http_body_util::BodyExt;
use ruff::common::{TransferLimit, TransferSession};
use tempfile::TempDir;

pub fn setup_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

pub fn limited_session(count: u32) -> TransferSession {
    TransferSession::new(TransferLimit::Limited(
        NonZeroU32::new(count).expect("count must be positive"),
    ))
}

pub fn unlimited_session() -> TransferSession {
    TransferSession::new(TransferLimit::Unlimited)
}

/// Drain a response body, then drop it the way a finished transport does.
pub async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes()
        .to_vec()
}

pub async fn body_text(response: axum::response::Response) -> String {
    String::from_utf8(body_bytes(response).await).expect("body is not utf-8")
}
