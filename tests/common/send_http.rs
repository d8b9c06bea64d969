use std::path::Path;

use axum::{
    body::Body,
    http::{Method, Request},
    Router,
};

use ruff::common::TransferSession;
use ruff::send::SendAppState;
use ruff::server::build_send_server;

//===========
// App Factory
//===========
/// Write `contents` to `dir/name` and build a download router serving it.
pub fn create_send_test_app(
    dir: &Path,
    name: &str,
    contents: &[u8],
    session: TransferSession,
) -> (Router, SendAppState) {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("Failed to write test file");

    let (server, state) = build_send_server(path, name.to_string(), session);
    (server.app, state)
}

//=================
// Request Builders
//=================
pub fn build_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build request")
}

pub fn get(uri: &str) -> Request<Body> {
    build_request(Method::GET, uri)
}
