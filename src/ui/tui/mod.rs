mod output;
mod ui;

pub use output::{spinner, spinner_error, spinner_success};
pub use ui::generate_qr;
