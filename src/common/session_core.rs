//! Transfer counting and the shutdown handshake shared by both modes.
//!
//! Phases move strictly forward: `Listening -> ShutdownRequested -> Closed`.
//! Handlers only ever call [`TransferSession::record_transfer`]; the runtime
//! observes the request, drains the listener, then calls
//! [`TransferSession::mark_closed`].

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::common::config::TransferLimit;
use crate::common::constants::UNLIMITED;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Listening,
    ShutdownRequested,
    Closed,
}

/// Result of counting one completed transfer unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    /// No limit configured; nothing was counted.
    Unlimited,
    /// Counted, and this many units remain (0 once the limit was already hit).
    Counted { remaining: i64 },
    /// This transfer used up the limit and requested shutdown.
    Exhausted,
}

/// How the grace-period wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraceOutcome {
    Closed,
    TimedOut,
}

struct SessionState {
    remaining: AtomicI64,
    shutdown_requested: AtomicBool,
    closed: AtomicBool,
    shutdown: CancellationToken,
    completion_tx: Mutex<Option<oneshot::Sender<()>>>,
    completion_rx: Mutex<Option<oneshot::Receiver<()>>>,
}

/// Shared handle to the one session this process serves.
#[derive(Clone)]
pub struct TransferSession {
    inner: Arc<SessionState>,
}

impl TransferSession {
    pub fn new(limit: TransferLimit) -> Self {
        let (tx, rx) = oneshot::channel();
        Self {
            inner: Arc::new(SessionState {
                remaining: AtomicI64::new(limit.initial_remaining()),
                shutdown_requested: AtomicBool::new(false),
                closed: AtomicBool::new(false),
                shutdown: CancellationToken::new(),
                completion_tx: Mutex::new(Some(tx)),
                completion_rx: Mutex::new(Some(rx)),
            }),
        }
    }

    /// Count one completed transfer unit, requesting shutdown on the last one.
    pub fn record_transfer(&self) -> TransferOutcome {
        let decremented = self
            .inner
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                (current > 0).then(|| current - 1)
            });

        match decremented {
            Ok(1) => {
                tracing::info!("Transfer limit reached");
                self.request_shutdown();
                TransferOutcome::Exhausted
            }
            Ok(previous) => {
                let remaining = previous - 1;
                tracing::debug!(remaining, "Transfer completed");
                TransferOutcome::Counted { remaining }
            }
            Err(UNLIMITED) => {
                tracing::debug!("Transfer completed (unlimited)");
                TransferOutcome::Unlimited
            }
            // Admitted before the limit was hit; shutdown is already underway.
            Err(_) => {
                tracing::debug!("Transfer completed after limit reached");
                TransferOutcome::Counted { remaining: 0 }
            }
        }
    }

    /// Ask the runtime to stop accepting work. Only the first caller gets `true`.
    pub fn request_shutdown(&self) -> bool {
        if self.inner.shutdown_requested.swap(true, Ordering::AcqRel) {
            return false;
        }
        tracing::info!("Shutdown requested");
        self.inner.shutdown.cancel();
        true
    }

    pub fn shutdown_requested(&self) -> bool {
        self.inner.shutdown_requested.load(Ordering::Acquire)
    }

    /// Resolves once shutdown has been requested by any handler or signal.
    pub async fn wait_for_shutdown_request(&self) {
        self.inner.shutdown.cancelled().await;
    }

    /// Remaining transfer units, or -1 when unlimited.
    pub fn remaining(&self) -> i64 {
        self.inner.remaining.load(Ordering::Acquire)
    }

    pub fn phase(&self) -> SessionPhase {
        if self.inner.closed.load(Ordering::Acquire) {
            SessionPhase::Closed
        } else if self.shutdown_requested() {
            SessionPhase::ShutdownRequested
        } else {
            SessionPhase::Listening
        }
    }

    /// Fire the completion signal. Only the first call fires; later calls return `false`.
    pub fn mark_closed(&self) -> bool {
        let sender = lock_recovering(&self.inner.completion_tx, "mark_closed").take();
        let Some(sender) = sender else {
            return false;
        };
        self.inner.closed.store(true, Ordering::Release);
        // The receiver may already be gone if the driver stopped waiting.
        let _ = sender.send(());
        tracing::debug!("Listener closed");
        true
    }

    /// Hand out the completion receiver. Returns `None` after the first call.
    pub fn take_completion(&self) -> Option<CompletionSignal> {
        lock_recovering(&self.inner.completion_rx, "take_completion")
            .take()
            .map(|rx| CompletionSignal { rx })
    }
}

/// Single-consumer side of the "listener closed" notification.
pub struct CompletionSignal {
    rx: oneshot::Receiver<()>,
}

impl CompletionSignal {
    /// Wait for the listener to close, but never longer than `grace`.
    pub async fn wait_with_grace(self, grace: Duration) -> GraceOutcome {
        match tokio::time::timeout(grace, self.rx).await {
            Ok(Ok(())) => GraceOutcome::Closed,
            // Sender dropped without firing: nothing left to wait for.
            Ok(Err(_)) => GraceOutcome::Closed,
            Err(_) => GraceOutcome::TimedOut,
        }
    }
}

fn lock_recovering<'a, T>(mutex: &'a Mutex<T>, op: &str) -> std::sync::MutexGuard<'a, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::error!("Session lock poisoned during {}, recovering", op);
            poisoned.into_inner()
        }
    }
}
