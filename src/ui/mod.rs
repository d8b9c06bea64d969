pub mod tui;
pub mod web;
