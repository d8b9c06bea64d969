use crate::common::{TransferSession, TransferState};
use std::ops::Deref;
use std::path::PathBuf;
use std::sync::Arc;

/// Cheaply cloned handle to upload state stored behind `Arc`.
#[derive(Clone)]
pub struct ReceiveAppState {
    inner: Arc<ReceiveAppStateInner>,
}

/// Upload-specific application state
pub struct ReceiveAppStateInner {
    pub session: TransferSession,
    pub allow_multiple: bool,
    pub destination: PathBuf,
}

impl Deref for ReceiveAppState {
    type Target = ReceiveAppStateInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl ReceiveAppState {
    pub fn new(session: TransferSession, allow_multiple: bool, destination: PathBuf) -> Self {
        Self {
            inner: Arc::new(ReceiveAppStateInner {
                session,
                allow_multiple,
                destination,
            }),
        }
    }

    pub fn destination(&self) -> &PathBuf {
        &self.destination
    }
}

impl TransferState for ReceiveAppState {
    fn session(&self) -> &TransferSession {
        &self.session
    }

    fn share_path(&self) -> String {
        String::new()
    }

    fn is_receiving(&self) -> bool {
        true
    }
}
