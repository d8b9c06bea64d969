//! Per-connection write deadline for accepted sockets.
//!
//! Only writes are bounded here. Hyper keeps a read parked for EOF detection
//! while a response streams, so reads are bounded at the HTTP layer instead:
//! request heads by hyper's header read timeout, upload bodies per read.

use axum_server::accept::Accept;
use std::future::{ready, Ready};
use std::io;
use std::pin::Pin;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_io_timeout::TimeoutStream;

/// Fails a connection whose peer stops draining it for longer than `timeout`.
#[derive(Debug, Clone, Copy)]
pub struct WriteTimeoutAcceptor {
    timeout: Duration,
}

impl WriteTimeoutAcceptor {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl<I, S> Accept<I, S> for WriteTimeoutAcceptor
where
    I: AsyncRead + AsyncWrite + Send + 'static,
{
    type Stream = Pin<Box<TimeoutStream<I>>>;
    type Service = S;
    type Future = Ready<io::Result<(Self::Stream, Self::Service)>>;

    fn accept(&self, stream: I, service: S) -> Self::Future {
        let mut stream = TimeoutStream::new(stream);
        stream.set_write_timeout(Some(self.timeout));
        ready(Ok((Box::pin(stream), service)))
    }
}
