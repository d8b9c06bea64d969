use std::path::PathBuf;

use axum::{
    body::Body,
    http::{header, Method, Request},
    Router,
};

use ruff::common::TransferSession;
use ruff::receive::ReceiveAppState;
use ruff::server::build_receive_server;

pub const BOUNDARY: &str = "ruff-test-boundary";

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

//===========
// App Factory
//===========
pub fn create_receive_test_app(
    destination: PathBuf,
    allow_multiple: bool,
    session: TransferSession,
) -> (Router, ReceiveAppState) {
    let (server, state) = build_receive_server(allow_multiple, destination, session);
    (server.app, state)
}

//=================
// Multipart Bodies
//=================
/// One form part. `file_name: None` makes it a plain text field.
pub struct Part<'a> {
    pub field: &'a str,
    pub file_name: Option<&'a str>,
    pub data: &'a [u8],
}

impl<'a> Part<'a> {
    pub fn file(file_name: &'a str, data: &'a [u8]) -> Self {
        Self {
            field: "file",
            file_name: Some(file_name),
            data,
        }
    }

    pub fn text(field: &'a str, data: &'a [u8]) -> Self {
        Self {
            field,
            file_name: None,
            data,
        }
    }
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part.file_name {
            Some(name) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        part.field, name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(b"Content-Type: application/octet-stream\r\n");
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.field)
                        .as_bytes(),
                );
            }
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

//=================
// Request Builders
//=================
pub fn upload_request(parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/")
        .header(header::CONTENT_TYPE, multipart_content_type())
        .body(Body::from(multipart_body(parts)))
        .expect("Failed to build upload request")
}

pub fn build_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build request")
}
