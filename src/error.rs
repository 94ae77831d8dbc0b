use thiserror::Error;

/// Everything that can go wrong while composing or saving a QR image.
#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("QR encoding failed: {0}")]
    Encode(#[from] qrcode::types::QrError),

    #[error("invalid QR version {0} (expected 1..=40)")]
    Version(i16),

    #[error("box size must be at least 1 pixel")]
    BoxSize,

    #[error("image too large: {0}")]
    TooLarge(String),

    #[error("invalid color: {0}")]
    Color(String),

    #[error("logo error: {0}")]
    Logo(String),

    #[error("font error: {0}")]
    Font(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid job file: {0}")]
    Job(#[from] serde_json::Error),

    #[error("no QR code found in {0}")]
    NotFound(String),

    #[error("QR decoding failed: {0}")]
    Decode(#[from] rqrr::DeQRError),
}

pub type Result<T> = std::result::Result<T, ComposeError>;
