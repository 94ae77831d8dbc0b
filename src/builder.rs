use image::{ImageBuffer, Rgba, RgbaImage};
use qrcode::{Color, QrCode};
use tracing::debug;

use crate::color::parse_color;
use crate::error::{ComposeError, Result};
use crate::request::QrRequest;

/// Largest canvas side, in pixels, the rasterizer will allocate.
pub const MAX_CANVAS_SIDE: u32 = 16_384;

/// Encodes the request and paints it into a fresh RGBA bitmap.
pub fn build_qr(request: &QrRequest) -> Result<RgbaImage> {
    if request.box_size == 0 {
        return Err(ComposeError::BoxSize);
    }
    let fill = parse_color(&request.fill_color)?;
    let back = parse_color(&request.back_color)?;
    let code = request.encode()?;
    let image = rasterize(&code, request.box_size, request.border, fill, back)?;
    debug!(
        modules = code.width(),
        width = image.width(),
        "rasterized QR symbol"
    );
    Ok(image)
}

/// Side length of the bitmap, or an error when it would exceed
/// [`MAX_CANVAS_SIDE`].
pub fn canvas_side(modules: usize, box_size: u32, border: u32) -> Result<u32> {
    let side = u32::try_from(modules)
        .ok()
        .and_then(|m| border.checked_mul(2)?.checked_add(m))
        .and_then(|m| m.checked_mul(box_size))
        .filter(|&side| side <= MAX_CANVAS_SIDE);
    side.ok_or_else(|| {
        ComposeError::TooLarge(format!(
            "{modules} modules with border {border} at {box_size} px per module exceeds {MAX_CANVAS_SIDE} px"
        ))
    })
}

/// Paints each dark module as a `box_size` square, offset by `border` modules.
pub fn rasterize(code: &QrCode, box_size: u32, border: u32, fill: Rgba<u8>, back: Rgba<u8>) -> Result<RgbaImage> {
    let width = code.width();
    let size = canvas_side(width, box_size, border)?;
    let mut img: RgbaImage = ImageBuffer::from_pixel(size, size, back);

    for y in 0..width {
        for x in 0..width {
            if code[(x, y)] != Color::Dark {
                continue;
            }
            let left = (border + x as u32) * box_size;
            let top = (border + y as u32) * box_size;
            for dy in 0..box_size {
                for dx in 0..box_size {
                    img.put_pixel(left + dx, top + dy, fill);
                }
            }
        }
    }

    Ok(img)
}
