use crate::common::{TransferSession, TransferState};
use crate::utils::encoding::escape_path_segment;
use std::ops::Deref;
use std::path::PathBuf;
use std::sync::Arc;

/// Cheaply cloned handle to download state stored behind `Arc`.
#[derive(Clone)]
pub struct SendAppState {
    inner: Arc<SendAppStateInner>,
}

/// Download-specific state passed to handlers via the Axum State extractor
pub struct SendAppStateInner {
    pub session: TransferSession,
    pub file_path: PathBuf,
    pub file_name: String,
}

impl Deref for SendAppState {
    type Target = SendAppStateInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl SendAppState {
    pub fn new(session: TransferSession, file_path: PathBuf, file_name: String) -> Self {
        Self {
            inner: Arc::new(SendAppStateInner {
                session,
                file_path,
                file_name,
            }),
        }
    }

    /// URL path of the file route, e.g. `/my%20cat.jpg`.
    pub fn file_route(&self) -> String {
        format!("/{}", escape_path_segment(&self.file_name))
    }
}

impl TransferState for SendAppState {
    fn session(&self) -> &TransferSession {
        &self.session
    }

    fn share_path(&self) -> String {
        self.file_route()
    }

    fn is_receiving(&self) -> bool {
        false
    }
}
