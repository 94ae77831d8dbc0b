use std::io::Cursor;
use std::path::Path;

use image::codecs::pnm::{PnmSubtype, SampleEncoding};
use image::{DynamicImage, ImageFormat, ImageOutputFormat, RgbaImage};
use tracing::debug;

use crate::error::Result;

pub const JPEG_QUALITY: u8 = 95;

fn output_format(format: ImageFormat) -> ImageOutputFormat {
    match format {
        ImageFormat::Jpeg => ImageOutputFormat::Jpeg(JPEG_QUALITY),
        ImageFormat::Pnm => ImageOutputFormat::Pnm(PnmSubtype::Pixmap(SampleEncoding::Binary)),
        other => other.into(),
    }
}

/// Encodes the image as RGB in the format named by the file extension and
/// writes it in one go. JPEG uses [`JPEG_QUALITY`]. The file is only created
/// once encoding has succeeded.
pub fn save_image(img: &RgbaImage, path: &Path) -> Result<()> {
    let format = ImageFormat::from_path(path)?;
    let rgb = DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(img.clone()).to_rgb8());

    let mut encoded = Cursor::new(Vec::new());
    rgb.write_to(&mut encoded, output_format(format))?;
    std::fs::write(path, encoded.into_inner())?;

    debug!(path = %path.display(), ?format, "image written");
    Ok(())
}
