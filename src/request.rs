use std::fmt;
use std::str::FromStr;

use qrcode::types::QrError;
use qrcode::{EcLevel, QrCode, Version};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ComposeError, Result};

pub const MIN_VERSION: i16 = 1;
pub const MAX_VERSION: i16 = 40;

pub const DEFAULT_FILL_COLOR: &str = "#8b43c9";
pub const DEFAULT_BACK_COLOR: &str = "white";
pub const DEFAULT_VERSION: i16 = 6;
pub const DEFAULT_BOX_SIZE: u32 = 15;
pub const DEFAULT_BORDER: u32 = 6;

/// Redundancy tier of the symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ErrorCorrection {
    #[serde(alias = "l", alias = "low")]
    L,
    #[serde(alias = "m", alias = "medium")]
    M,
    #[serde(alias = "q", alias = "quartile")]
    Q,
    #[default]
    #[serde(alias = "h", alias = "high")]
    H,
}

impl From<ErrorCorrection> for EcLevel {
    fn from(ec: ErrorCorrection) -> Self {
        match ec {
            ErrorCorrection::L => EcLevel::L,
            ErrorCorrection::M => EcLevel::M,
            ErrorCorrection::Q => EcLevel::Q,
            ErrorCorrection::H => EcLevel::H,
        }
    }
}

impl FromStr for ErrorCorrection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "l" | "low" => Ok(Self::L),
            "m" | "medium" => Ok(Self::M),
            "q" | "quartile" => Ok(Self::Q),
            "h" | "high" => Ok(Self::H),
            other => Err(format!("unknown error correction level '{other}' (use L, M, Q or H)")),
        }
    }
}

impl fmt::Display for ErrorCorrection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::L => "L",
            Self::M => "M",
            Self::Q => "Q",
            Self::H => "H",
        };
        f.write_str(s)
    }
}

fn default_fill_color() -> String {
    DEFAULT_FILL_COLOR.to_string()
}

fn default_back_color() -> String {
    DEFAULT_BACK_COLOR.to_string()
}

fn default_version() -> i16 {
    DEFAULT_VERSION
}

fn default_box_size() -> u32 {
    DEFAULT_BOX_SIZE
}

fn default_border() -> u32 {
    DEFAULT_BORDER
}

fn default_fit() -> bool {
    true
}

/// Everything the encoder and rasterizer need to produce the bare QR bitmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrRequest {
    pub data: String,
    #[serde(default = "default_version")]
    pub version: i16,
    #[serde(default)]
    pub error_correction: ErrorCorrection,
    /// Pixel edge length of one module.
    #[serde(default = "default_box_size")]
    pub box_size: u32,
    /// Quiet zone width, in modules.
    #[serde(default = "default_border")]
    pub border: u32,
    #[serde(default = "default_fill_color")]
    pub fill_color: String,
    #[serde(default = "default_back_color")]
    pub back_color: String,
    /// Grow past `version` when the payload does not fit.
    #[serde(default = "default_fit")]
    pub fit: bool,
}

impl QrRequest {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            version: DEFAULT_VERSION,
            error_correction: ErrorCorrection::default(),
            box_size: DEFAULT_BOX_SIZE,
            border: DEFAULT_BORDER,
            fill_color: default_fill_color(),
            back_color: default_back_color(),
            fit: true,
        }
    }

    /// Encodes the payload, starting at `version` and, when `fit` is set,
    /// stepping up until the data fits.
    pub fn encode(&self) -> Result<QrCode> {
        if !(MIN_VERSION..=MAX_VERSION).contains(&self.version) {
            return Err(ComposeError::Version(self.version));
        }
        let level: EcLevel = self.error_correction.into();
        let bytes = self.data.as_bytes();

        if !self.fit {
            return Ok(QrCode::with_version(bytes, Version::Normal(self.version), level)?);
        }

        for version in self.version..=MAX_VERSION {
            match QrCode::with_version(bytes, Version::Normal(version), level) {
                Ok(code) => {
                    debug!(version, requested = self.version, "payload fits");
                    return Ok(code);
                }
                Err(QrError::DataTooLong) => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(QrError::DataTooLong.into())
    }
}

/// Number of modules along one side of a normal symbol.
pub fn modules_for_version(version: i16) -> usize {
    17 + 4 * version as usize
}
