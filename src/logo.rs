use std::path::Path;

use image::imageops::{self, FilterType};
use image::RgbaImage;
use tracing::debug;

use crate::error::{ComposeError, Result};

/// Side length of the logo square for a QR bitmap `qr_width` pixels wide.
pub fn logo_side(qr_width: u32) -> u32 {
    qr_width / 5
}

/// Top-left corner that centers a `side` square on the canvas.
pub fn logo_offset(canvas: (u32, u32), side: u32) -> (i64, i64) {
    let (w, h) = canvas;
    (
        (w as i64 - side as i64).div_euclid(2),
        (h as i64 - side as i64).div_euclid(2),
    )
}

/// Pastes the logo centered on `qr_image`, blending through its alpha channel.
pub fn try_add_logo(qr_image: &mut RgbaImage, logo_path: &Path) -> Result<()> {
    let side = logo_side(qr_image.width());
    if side == 0 {
        return Err(ComposeError::Logo(format!(
            "QR image is {} px wide, too small for a logo",
            qr_image.width()
        )));
    }

    let logo = image::open(logo_path)
        .map_err(|e| ComposeError::Logo(format!("cannot open '{}': {e}", logo_path.display())))?;
    let logo = logo.resize_exact(side, side, FilterType::Lanczos3).to_rgba8();

    let (x, y) = logo_offset(qr_image.dimensions(), side);
    imageops::overlay(qr_image, &logo, x, y);
    debug!(side, x, y, logo = %logo_path.display(), "logo composited");
    Ok(())
}

/// Embeds a logo in the center of the QR code. On any failure the error is
/// reported and the QR image comes back untouched.
pub fn add_logo_to_qr(mut qr_image: RgbaImage, logo_path: impl AsRef<Path>) -> RgbaImage {
    match try_add_logo(&mut qr_image, logo_path.as_ref()) {
        Ok(()) => qr_image,
        Err(e) => {
            println!("❌ Error adding logo: {e}");
            qr_image
        }
    }
}
