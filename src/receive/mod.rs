pub mod handlers;
mod state;
pub mod storage;

pub use state::ReceiveAppState;
pub use storage::{UploadBatch, UploadEntry};
