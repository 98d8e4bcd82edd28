//! QR symbol rendering

use qrcode::render::{svg, unicode};
use qrcode::{EcLevel, QrCode};

use crate::error::{QrError, Result};

/// Pixel size of the code on a card
pub const CARD_SIZE: u32 = 200;

/// Pixel size of the code on the print view
pub const PRINT_SIZE: u32 = 300;

fn encode(payload: &str) -> Result<QrCode> {
    QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::H)
        .map_err(|e| QrError::Render(e.to_string()))
}

/// Render `payload` as an inline `<svg>` element, black on white
pub fn svg(payload: &str, size: u32) -> Result<String> {
    let document = encode(payload)?
        .render::<svg::Color>()
        .min_dimensions(size, size)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build();

    // strip the XML prolog so the element can sit inside an HTML page
    match document.find("<svg") {
        Some(start) => Ok(document[start..].to_string()),
        None => Ok(document),
    }
}

/// Render `payload` with unicode half blocks for a terminal
pub fn terminal(payload: &str) -> Result<String> {
    Ok(encode(payload)?
        .render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Light)
        .light_color(unicode::Dense1x2::Dark)
        .build())
}
