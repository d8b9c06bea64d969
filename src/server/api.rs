use super::{routes, runtime};
use crate::common::{SessionConfig, TransferMode, TransferSession};
use crate::receive::ReceiveAppState;
use crate::send::SendAppState;
use anyhow::{Context, Result};
use axum::Router;
use std::path::PathBuf;

// Server configuration
pub struct ServerInstance {
    pub app: Router,
    pub display_name: String, // shown in startup output
}

impl ServerInstance {
    pub fn new(app: Router, display_name: String) -> Self {
        Self { app, display_name }
    }
}

/// Serve whichever transfer the session config asks for until it ends.
pub async fn start_session(config: &SessionConfig) -> Result<()> {
    match &config.mode {
        TransferMode::Download {
            file_path,
            file_name,
        } => start_send_server(file_path.clone(), file_name.clone(), config).await,
        TransferMode::Upload { allow_multiple } => {
            let destination =
                std::env::current_dir().context("Failed to resolve upload destination")?;
            start_receive_server(*allow_multiple, destination, config).await
        }
    }
}

//----------------
// SEND SERVER
//---------------
pub fn build_send_server(
    file_path: PathBuf,
    file_name: String,
    session: TransferSession,
) -> (ServerInstance, SendAppState) {
    let display_name = file_name.clone();
    let state = SendAppState::new(session, file_path, file_name);
    let app = routes::create_send_router(&state);
    (ServerInstance::new(app, display_name), state)
}

pub async fn start_send_server(
    file_path: PathBuf,
    file_name: String,
    config: &SessionConfig,
) -> Result<()> {
    let session = TransferSession::new(config.limit);
    let (server, state) = build_send_server(file_path, file_name, session);
    runtime::run_session(server, state, config).await
}

//----------------
// RECEIVE SERVER
//----------------
pub fn build_receive_server(
    allow_multiple: bool,
    destination: PathBuf,
    session: TransferSession,
) -> (ServerInstance, ReceiveAppState) {
    let display_name = destination.display().to_string();
    let state = ReceiveAppState::new(session, allow_multiple, destination);
    let app = routes::create_receive_router(&state);
    (ServerInstance::new(app, display_name), state)
}

pub async fn start_receive_server(
    allow_multiple: bool,
    destination: PathBuf,
    config: &SessionConfig,
) -> Result<()> {
    let session = TransferSession::new(config.limit);
    let (server, state) = build_receive_server(allow_multiple, destination, session);
    runtime::run_session(server, state, config).await
}
