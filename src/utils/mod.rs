pub mod encoding;
pub mod security;
