//! Body stream that reports when a download has been handed off in full.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::Stream;

/// Wraps a file stream and runs `on_complete` once every expected byte has
/// been yielded and the body has been released by the transport.
///
/// Hyper drops a fixed-length body as soon as the last byte is written, so
/// completion is decided on drop rather than on end-of-stream. Read errors
/// and short bodies (client went away, file shrank) never complete.
pub struct CompletionStream<S, F: FnOnce()> {
    inner: S,
    expected: u64,
    sent: u64,
    failed: bool,
    on_complete: Option<F>,
}

impl<S, F: FnOnce()> CompletionStream<S, F> {
    pub fn new(inner: S, expected: u64, on_complete: F) -> Self {
        Self {
            inner,
            expected,
            sent: 0,
            failed: false,
            on_complete: Some(on_complete),
        }
    }
}

impl<S, F> Stream for CompletionStream<S, F>
where
    S: Stream<Item = io::Result<Bytes>> + Unpin,
    F: FnOnce() + Unpin,
{
    type Item = io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match Pin::new(&mut this.inner).poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                this.sent += chunk.len() as u64;
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(e))) => {
                this.failed = true;
                Poll::Ready(Some(Err(e)))
            }
            other => other,
        }
    }
}

impl<S, F: FnOnce()> Drop for CompletionStream<S, F> {
    fn drop(&mut self) {
        if self.failed || self.sent < self.expected {
            tracing::debug!(
                sent = self.sent,
                expected = self.expected,
                "Download ended early; not counted"
            );
            return;
        }
        if let Some(on_complete) = self.on_complete.take() {
            on_complete();
        }
    }
}
