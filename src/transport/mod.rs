pub mod local;
pub mod timeout;
