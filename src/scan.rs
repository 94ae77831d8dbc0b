use std::path::Path;

use image::GrayImage;
use tracing::debug;

use crate::error::{ComposeError, Result};

/// Decodes every QR symbol found in the image at `path`.
pub fn decode_payloads(path: &Path) -> Result<Vec<String>> {
    let img = image::open(path)?.to_luma8();
    let payloads = decode_luma(&img)?;
    if payloads.is_empty() {
        return Err(ComposeError::NotFound(path.display().to_string()));
    }
    Ok(payloads)
}

/// Decodes every QR symbol in an in-memory grayscale image.
pub fn decode_luma(img: &GrayImage) -> Result<Vec<String>> {
    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        img.width() as usize,
        img.height() as usize,
        |x, y| img.get_pixel(x as u32, y as u32).0[0],
    );
    let grids = prepared.detect_grids();
    debug!(grids = grids.len(), "detected QR grids");

    let mut payloads = Vec::with_capacity(grids.len());
    for grid in &grids {
        let (_meta, content) = grid.decode()?;
        payloads.push(content);
    }
    Ok(payloads)
}

/// True when the image at `path` decodes back to exactly `expected`.
pub fn verify_payload(path: &Path, expected: &str) -> Result<bool> {
    Ok(decode_payloads(path)?.iter().any(|p| p == expected))
}
