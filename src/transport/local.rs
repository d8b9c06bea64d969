//! Listener bootstrap and LAN address discovery.
//!
//! The server binds all interfaces so peers on the same network can reach it.

use anyhow::{Context, Result};
use hyper_util::rt::TokioTimer;
use std::net::{IpAddr, SocketAddr, UdpSocket};
use tokio::task::JoinHandle;

use super::timeout::WriteTimeoutAcceptor;
use crate::common::constants::IO_TIMEOUT;

/// The host's LAN-facing address could not be determined.
#[derive(Debug, thiserror::Error)]
#[error("failed to determine local network address: {0}")]
pub struct NetworkError(#[from] std::io::Error);

fn bind_addr(port: u16) -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], port))
}

/// Starts the Axum server in the background.
///
/// Returns the bound port (useful when `port` is 0), the handle used to drain
/// it, and the task that finishes once the listener has fully closed.
pub fn start_local_server(
    app: axum::Router,
    port: u16,
) -> Result<(u16, axum_server::Handle, JoinHandle<()>)> {
    let listener = std::net::TcpListener::bind(bind_addr(port)).with_context(|| {
        format!(
            "Failed to bind to port {port} - port already in use.\n\n\
             Is another ruff instance running?\n\
             Or is another service using this port?"
        )
    })?;

    listener
        .set_nonblocking(true)
        .context("Failed to set listener to non-blocking mode")?;

    let port = listener.local_addr()?.port();

    let server_handle = axum_server::Handle::new();
    let server_handle_clone = server_handle.clone();

    let mut server =
        axum_server::from_tcp(listener).acceptor(WriteTimeoutAcceptor::new(IO_TIMEOUT));
    // Request heads must arrive within IO_TIMEOUT; body reads are bounded by the handlers
    server
        .http_builder()
        .http1()
        .timer(TokioTimer::new())
        .header_read_timeout(IO_TIMEOUT);

    let task = tokio::spawn(async move {
        if let Err(e) = server
            .handle(server_handle_clone)
            .serve(app.into_make_service())
            .await
        {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok((port, server_handle, task))
}

/// Best-effort local non-loopback IP discovery for the share URL.
///
/// No packets are sent; connecting a UDP socket only selects a route.
pub fn get_local_ip() -> Result<IpAddr, NetworkError> {
    let socket = UdpSocket::bind("0.0.0.0:0")?;
    socket.connect("8.8.8.8:80")?;
    Ok(socket.local_addr()?.ip())
}
