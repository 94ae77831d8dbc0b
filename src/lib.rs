//! Compose QR code images: encode a payload, paint it in custom colors,
//! optionally embed a logo and stamp a caption, then write the result to disk.
//!
//! ```no_run
//! use qrcompose::{generate_qr_code, QrJob, TextOverlay, TextPosition};
//!
//! let job = QrJob::new("https://spintegration.fi/", "spintegration_qr.png")
//!     .with_logo("logo.png")
//!     .with_text(TextOverlay::new("SPI", TextPosition::Corner));
//! generate_qr_code(&job);
//! ```

pub mod builder;
pub mod color;
pub mod error;
pub mod font;
pub mod job;
pub mod logo;
pub mod output;
pub mod request;
pub mod scan;
pub mod text;

use std::path::PathBuf;

use image::RgbaImage;
use tracing::{debug, info};

pub use builder::build_qr;
pub use error::{ComposeError, Result};
pub use job::QrJob;
pub use logo::add_logo_to_qr;
pub use output::save_image;
pub use request::{ErrorCorrection, QrRequest};
pub use text::{add_text_to_qr, TextOverlay, TextPosition};

/// Runs the whole pipeline in memory. Only QR construction can fail here;
/// logo and text problems are reported and skipped.
pub fn compose(job: &QrJob) -> Result<RgbaImage> {
    let mut image = build_qr(&job.request)?;

    if let Some(logo_path) = &job.logo_path {
        image = add_logo_to_qr(image, logo_path);
    }
    if let Some(overlay) = &job.text {
        image = text::add_overlay_to_qr(image, overlay);
    }

    debug!(width = image.width(), height = image.height(), "composition finished");
    Ok(image)
}

/// Composes the image and writes it to `job.filename`.
pub fn try_generate_qr_code(job: &QrJob) -> Result<PathBuf> {
    let image = compose(job)?;
    save_image(&image, &job.filename)?;
    info!(path = %job.filename.display(), "QR code saved");
    Ok(job.filename.clone())
}

/// Generates the QR code and reports the outcome on the console. Errors never
/// reach the caller; `None` means nothing was written.
pub fn generate_qr_code(job: &QrJob) -> Option<PathBuf> {
    match try_generate_qr_code(job) {
        Ok(path) => {
            println!(
                "✅ QR code successfully saved as '{}'. Scan it with your phone!",
                path.display()
            );
            Some(path)
        }
        Err(e) => {
            println!("❌ Error generating QR code: {e}");
            None
        }
    }
}
