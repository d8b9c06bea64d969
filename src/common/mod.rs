pub mod config;
pub mod constants;
pub mod errors;
pub mod session_core;

pub use config::{AppConfig, CliArgs, SessionConfig, TransferLimit, TransferMode};
pub use errors::AppError;
pub use session_core::{GraceOutcome, SessionPhase, TransferOutcome, TransferSession};

/// Trait for application states (download/upload) used by runtime
pub trait TransferState: Clone + Send + Sync + 'static {
    fn session(&self) -> &TransferSession;

    /// Path peers should open, relative to the server root (empty for `/`).
    fn share_path(&self) -> String;

    fn is_receiving(&self) -> bool;
}
