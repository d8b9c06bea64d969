// Submodules
mod api;
pub mod routes;
pub mod runtime;

// Public API (what main.rs imports)
pub use api::{
    build_receive_server, build_send_server, start_receive_server, start_send_server,
    start_session, ServerInstance,
};
pub use runtime::RunningServer;
