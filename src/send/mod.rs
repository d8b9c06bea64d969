pub mod handlers;
mod state;
mod stream;

pub use state::SendAppState;
pub use stream::CompletionStream;
