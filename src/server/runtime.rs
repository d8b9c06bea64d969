//! Runtime lifecycle: start the listener, announce it, wait for the session
//! to end, then drain within the grace period.

use crate::common::constants::SHUTDOWN_GRACE_PERIOD;
use crate::common::session_core::CompletionSignal;
use crate::common::{GraceOutcome, SessionConfig, TransferSession, TransferState};
use crate::server::ServerInstance;
use crate::transport::local::{get_local_ip, start_local_server};
use crate::ui::tui::{generate_qr, spinner, spinner_error, spinner_success};
use anyhow::{Context, Result};
use axum::Router;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// A listener serving one session.
///
/// The session is marked closed once the listener has fully drained, so
/// [`RunningServer::shutdown`] can tell a clean close from a timeout.
pub struct RunningServer {
    port: u16,
    handle: axum_server::Handle,
    session: TransferSession,
    completion: CompletionSignal,
}

impl RunningServer {
    pub fn start(app: Router, session: TransferSession, port: u16) -> Result<Self> {
        let completion = session
            .take_completion()
            .context("Session is already bound to a listener")?;

        let (port, handle, server_task) = start_local_server(app, port)?;

        let closer = session.clone();
        tokio::spawn(async move {
            if let Err(e) = server_task.await {
                tracing::error!("Server task failed: {}", e);
            }
            closer.mark_closed();
        });

        Ok(Self {
            port,
            handle,
            session,
            completion,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn wait_for_shutdown_request(&self) {
        self.session.wait_for_shutdown_request().await;
    }

    /// Stop accepting connections and wait up to `grace` for in-flight ones.
    pub async fn shutdown(self, grace: Duration) -> GraceOutcome {
        self.handle.graceful_shutdown(None);
        tracing::info!("Server stopped accepting new connections");

        let outcome = self.completion.wait_with_grace(grace).await;
        match outcome {
            GraceOutcome::Closed => tracing::info!("Server shutdown complete"),
            GraceOutcome::TimedOut => tracing::warn!(
                connections = self.handle.connection_count(),
                "Grace period elapsed with connections still open"
            ),
        }
        outcome
    }
}

/// Serve one session to completion: announce it, then drain on shutdown.
pub async fn run_session<S: TransferState>(
    server: ServerInstance,
    state: S,
    config: &SessionConfig,
) -> Result<()> {
    let ServerInstance { app, display_name } = server;
    let session = state.session().clone();

    let start_spinner = spinner("Starting local server...");
    let running = match RunningServer::start(app, session.clone(), config.port) {
        Ok(running) => {
            spinner_success(
                &start_spinner,
                &format!("Server ready on port {}", running.port()),
            );
            running
        }
        Err(err) => {
            spinner_error(&start_spinner, "Failed to start server");
            return Err(err);
        }
    };

    let local_ip = match get_local_ip() {
        Ok(ip) => ip,
        Err(err) => {
            running.shutdown(Duration::ZERO).await;
            return Err(err.into());
        }
    };

    let url = share_url(local_ip, running.port(), &state.share_path());
    tracing::info!(
        name = %display_name,
        receiving = state.is_receiving(),
        remaining = session.remaining(),
        "Session ready"
    );

    if config.show_qr {
        match generate_qr(&url) {
            Ok(qr) => println!("{qr}"),
            Err(e) => tracing::warn!("Could not render QR code: {:#}", e),
        }
    }
    println!("{url}");

    // Ctrl+C ends the session through the same path as the last transfer
    let signal_session = session.clone();
    let ctrl_c_task = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            tracing::error!("Failed to listen for Ctrl+C");
            return;
        }
        tracing::info!("Ctrl+C received - initiating graceful shutdown");
        signal_session.request_shutdown();
    });

    running.wait_for_shutdown_request().await;
    ctrl_c_task.abort();

    running.shutdown(SHUTDOWN_GRACE_PERIOD).await;
    Ok(())
}

/// `http://<ip>:<port><path>`, bracketing IPv6 hosts.
fn share_url(ip: IpAddr, port: u16, path: &str) -> String {
    format!("http://{}{}", SocketAddr::new(ip, port), path)
}
