use anyhow::{Context, Result};
use qrcode::render::unicode;
use qrcode::{EcLevel, QrCode};

/// Half-block QR code for the share URL, sized for a terminal.
pub fn generate_qr(url: &str) -> Result<String> {
    let code = QrCode::with_error_correction_level(url.as_bytes(), EcLevel::M)
        .context("Failed to generate QR code")?;

    Ok(code
        .render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Light)
        .light_color(unicode::Dense1x2::Dark)
        .quiet_zone(true)
        .build())
}
