use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use image::{Rgba, RgbaImage};
use rusttype::{point, Font, Scale};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ComposeError, Result};
use crate::font::BitmapFont;

pub const DEFAULT_TEXT: &str = "SPI";
pub const DEFAULT_FONT_SIZE: f32 = 200.0;
pub const MAX_FONT_SIZE: f32 = 4096.0;
pub const CORNER_OFFSET: (i64, i64) = (5, 5);
pub const TEXT_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// TrueType faces tried, in order, before falling back to the bitmap font.
pub const PREFERRED_FONTS: &[&str] = &[
    "arial.ttf",
    "/usr/share/fonts/truetype/msttcorefonts/Arial.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextPosition {
    #[default]
    Center,
    Corner,
}

impl FromStr for TextPosition {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "center" | "centre" => Ok(Self::Center),
            "corner" => Ok(Self::Corner),
            other => Err(format!("unknown text position '{other}' (use center or corner)")),
        }
    }
}

impl fmt::Display for TextPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Center => f.write_str("center"),
            Self::Corner => f.write_str("corner"),
        }
    }
}

fn default_text() -> String {
    DEFAULT_TEXT.to_string()
}

fn default_font_size() -> f32 {
    DEFAULT_FONT_SIZE
}

/// Text to stamp onto the QR image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextOverlay {
    #[serde(default = "default_text")]
    pub text: String,
    #[serde(default)]
    pub position: TextPosition,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    /// Tried ahead of [`PREFERRED_FONTS`].
    #[serde(default)]
    pub font_path: Option<PathBuf>,
}

impl Default for TextOverlay {
    fn default() -> Self {
        Self {
            text: default_text(),
            position: TextPosition::default(),
            font_size: DEFAULT_FONT_SIZE,
            font_path: None,
        }
    }
}

impl TextOverlay {
    pub fn new(text: impl Into<String>, position: TextPosition) -> Self {
        Self {
            text: text.into(),
            position,
            ..Default::default()
        }
    }

    /// Walks the font chain: explicit path, preferred faces, then the bitmap font.
    pub fn resolve_font(&self) -> Result<TextFont> {
        check_font_size(self.font_size)?;
        let explicit = self.font_path.iter().map(PathBuf::as_path);
        let preferred = PREFERRED_FONTS.iter().map(Path::new);
        for path in explicit.chain(preferred) {
            if !path.is_file() {
                continue;
            }
            match TextFont::truetype_from_file(path, self.font_size) {
                Ok(font) => {
                    debug!(font = %path.display(), "using TrueType font");
                    return Ok(font);
                }
                Err(e) => warn!(font = %path.display(), error = %e, "skipping unusable font"),
            }
        }
        debug!("no TrueType font available, using bitmap font");
        Ok(TextFont::Bitmap(BitmapFont::for_pixel_size(self.font_size)))
    }
}

fn check_font_size(px: f32) -> Result<()> {
    if px.is_finite() && px > 0.0 && px <= MAX_FONT_SIZE {
        Ok(())
    } else {
        Err(ComposeError::Font(format!(
            "font size must be in (0, {MAX_FONT_SIZE}], got {px}"
        )))
    }
}

/// Ink box of a string drawn with its origin at (0, 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextBox {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

impl TextBox {
    pub fn width(&self) -> i64 {
        self.right - self.left
    }

    pub fn height(&self) -> i64 {
        self.bottom - self.top
    }

    fn shifted(self, dy: i64) -> Self {
        Self {
            top: self.top + dy,
            bottom: self.bottom + dy,
            ..self
        }
    }

    fn union(self, other: Self) -> Self {
        Self {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

pub enum TextFont {
    TrueType { font: Font<'static>, scale: Scale },
    Bitmap(BitmapFont),
}

impl TextFont {
    pub fn truetype_from_file(path: &Path, px: f32) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::truetype_from_bytes(bytes, px)
    }

    pub fn truetype_from_bytes(bytes: Vec<u8>, px: f32) -> Result<Self> {
        check_font_size(px)?;
        let font = Font::try_from_vec(bytes)
            .ok_or_else(|| ComposeError::Font("not a TrueType/OpenType font".into()))?;
        Ok(Self::TrueType {
            font,
            scale: Scale::uniform(px),
        })
    }

    /// Distance between the tops of consecutive lines.
    pub fn line_height(&self) -> i64 {
        match self {
            Self::Bitmap(bitmap) => bitmap.line_height() as i64,
            Self::TrueType { font, scale } => {
                let v = font.v_metrics(*scale);
                (v.ascent - v.descent + v.line_gap).ceil() as i64
            }
        }
    }

    fn line_box(&self, line: &str) -> Option<TextBox> {
        match self {
            Self::Bitmap(bitmap) => {
                let (w, h) = bitmap.measure(line);
                (w > 0).then(|| TextBox {
                    left: 0,
                    top: 0,
                    right: w as i64,
                    bottom: h as i64,
                })
            }
            Self::TrueType { font, scale } => {
                let ascent = font.v_metrics(*scale).ascent;
                font.layout(line, *scale, point(0.0, ascent))
                    .filter_map(|g| g.pixel_bounding_box())
                    .map(|bb| TextBox {
                        left: bb.min.x as i64,
                        top: bb.min.y as i64,
                        right: bb.max.x as i64,
                        bottom: bb.max.y as i64,
                    })
                    .reduce(TextBox::union)
            }
        }
    }

    /// Bounding box of `text` when drawn at (0, 0); the origin is the top of
    /// the first line, not the baseline. Lines split on `\n` stack downward.
    pub fn bbox(&self, text: &str) -> TextBox {
        let lh = self.line_height();
        text.split('\n')
            .enumerate()
            .filter_map(|(i, line)| Some(self.line_box(line)?.shifted(i as i64 * lh)))
            .reduce(TextBox::union)
            .unwrap_or_default()
    }

    pub fn draw(&self, img: &mut RgbaImage, origin: (i64, i64), text: &str, color: Rgba<u8>) {
        let lh = self.line_height();
        for (i, line) in text.split('\n').enumerate() {
            self.draw_line(img, (origin.0, origin.1 + i as i64 * lh), line, color);
        }
    }

    fn draw_line(&self, img: &mut RgbaImage, origin: (i64, i64), line: &str, color: Rgba<u8>) {
        match self {
            Self::Bitmap(bitmap) => bitmap.draw(img, origin, line, color),
            Self::TrueType { font, scale } => {
                let ascent = font.v_metrics(*scale).ascent;
                let start = point(origin.0 as f32, origin.1 as f32 + ascent);
                let (w, h) = (img.width() as i64, img.height() as i64);
                for g in font.layout(line, *scale, start) {
                    let Some(bb) = g.pixel_bounding_box() else {
                        continue;
                    };
                    g.draw(|gx, gy, v| {
                        let px = gx as i64 + bb.min.x as i64;
                        let py = gy as i64 + bb.min.y as i64;
                        if px < 0 || py < 0 || px >= w || py >= h {
                            return;
                        }
                        let a = v.clamp(0.0, 1.0);
                        if a == 0.0 {
                            return;
                        }
                        let dst = img.get_pixel_mut(px as u32, py as u32);
                        for c in 0..3 {
                            dst.0[c] = (color.0[c] as f32 * a + dst.0[c] as f32 * (1.0 - a)).round() as u8;
                        }
                        dst.0[3] = 255;
                    });
                }
            }
        }
    }
}

/// Where the text origin goes for a canvas and text of the given sizes.
/// Centering uses floor division, so an oversized text gets a negative origin.
pub fn text_origin(canvas: (u32, u32), text_size: (i64, i64), position: TextPosition) -> (i64, i64) {
    match position {
        TextPosition::Center => (
            (canvas.0 as i64 - text_size.0).div_euclid(2),
            (canvas.1 as i64 - text_size.1).div_euclid(2),
        ),
        TextPosition::Corner => CORNER_OFFSET,
    }
}

/// Measures and draws `text` in black, returning the origin it was drawn at.
/// Nothing is drawn when an error is returned.
pub fn try_add_text(image: &mut RgbaImage, text: &str, position: TextPosition, font: &TextFont) -> Result<(i64, i64)> {
    if text.chars().any(|c| c.is_control() && c != '\n') {
        return Err(ComposeError::Font("text contains control characters other than newlines".into()));
    }
    let bbox = font.bbox(text);
    if !text.trim().is_empty() && bbox.width() == 0 {
        return Err(ComposeError::Font(format!("font has no visible glyphs for '{text}'")));
    }
    let origin = text_origin(image.dimensions(), (bbox.width(), bbox.height()), position);
    font.draw(image, origin, text, TEXT_COLOR);
    debug!(text, %position, x = origin.0, y = origin.1, "text stamped");
    Ok(origin)
}

/// Stamps the overlay onto the image. On failure the error is reported and
/// the image comes back unchanged.
pub fn add_overlay_to_qr(mut image: RgbaImage, overlay: &TextOverlay) -> RgbaImage {
    let stamped = overlay
        .resolve_font()
        .and_then(|font| try_add_text(&mut image, &overlay.text, overlay.position, &font));
    if let Err(e) = stamped {
        println!("❌ Error adding text: {e}");
    }
    image
}

/// Adds text to the QR code using the default font chain and size.
pub fn add_text_to_qr(image: RgbaImage, text: &str, position: TextPosition) -> RgbaImage {
    add_overlay_to_qr(image, &TextOverlay::new(text, position))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn canvas(size: u32) -> RgbaImage {
        RgbaImage::from_pixel(size, size, WHITE)
    }

    fn bitmap(scale: u32) -> TextFont {
        TextFont::Bitmap(BitmapFont::new(scale))
    }

    #[test]
    fn corner_is_fixed_regardless_of_length() {
        for text in ["A", "SPI", "a much longer caption than usual"] {
            let mut img = canvas(300);
            let origin = try_add_text(&mut img, text, TextPosition::Corner, &bitmap(2)).unwrap();
            assert_eq!(origin, (5, 5));
        }
    }

    #[test]
    fn center_uses_floor_division() {
        let mut img = canvas(795);
        let origin = try_add_text(&mut img, "SPI", TextPosition::Center, &bitmap(1)).unwrap();
        assert_eq!(origin, ((795 - 17) / 2, (795 - 7) / 2));
        // first column of 'S' has its second row set
        assert_eq!(*img.get_pixel(389, 395), TEXT_COLOR);
    }

    #[test]
    fn oversized_text_gets_negative_origin() {
        assert_eq!(text_origin((10, 10), (15, 3), TextPosition::Center), (-3, 3));
    }

    #[test]
    fn position_parses_from_strings() {
        assert_eq!("corner".parse::<TextPosition>().unwrap(), TextPosition::Corner);
        assert_eq!("CENTER".parse::<TextPosition>().unwrap(), TextPosition::Center);
        assert!("middle".parse::<TextPosition>().is_err());
    }

    #[test]
    fn newlines_stack_lines() {
        let font = bitmap(1);
        let bbox = font.bbox("AB\nC");
        assert_eq!(bbox, TextBox { left: 0, top: 0, right: 11, bottom: 15 });

        let mut img = canvas(40);
        let origin = try_add_text(&mut img, "AB\nC", TextPosition::Corner, &font).unwrap();
        assert_eq!(origin, (5, 5));
        // 'C' starts one line (8 px) below 'A'; its first column spans rows 1..=5
        assert_eq!(*img.get_pixel(5, 5 + 8 + 1), TEXT_COLOR);
        assert_eq!(*img.get_pixel(5, 5 + 8), WHITE);
    }

    #[test]
    fn unusable_font_sizes_leave_image_untouched() {
        for font_size in [1e12, f32::NAN, f32::INFINITY, 0.0, -3.0] {
            let before = canvas(40);
            let overlay = TextOverlay {
                font_size,
                ..TextOverlay::new("SPI", TextPosition::Center)
            };
            assert!(overlay.resolve_font().is_err());
            assert_eq!(add_overlay_to_qr(before.clone(), &overlay), before);
        }
    }

    fn system_font(px: f32) -> Option<TextFont> {
        PREFERRED_FONTS
            .iter()
            .map(Path::new)
            .filter(|p| p.is_file())
            .find_map(|p| TextFont::truetype_from_file(p, px).ok())
    }

    #[test]
    fn truetype_center_follows_floor_division() {
        let Some(font) = system_font(64.0) else {
            eprintln!("no TrueType font installed, skipping");
            return;
        };
        let bbox = font.bbox("SPI");
        assert!(bbox.width() > 0 && bbox.height() > 0);

        let mut img = canvas(400);
        let origin = try_add_text(&mut img, "SPI", TextPosition::Center, &font).unwrap();
        assert_eq!(
            origin,
            ((400 - bbox.width()).div_euclid(2), (400 - bbox.height()).div_euclid(2))
        );

        let (x0, y0) = (origin.0 + bbox.left, origin.1 + bbox.top);
        let (x1, y1) = (origin.0 + bbox.right, origin.1 + bbox.bottom);
        let mut inked = 0;
        for (x, y, p) in img.enumerate_pixels() {
            if *p == WHITE {
                continue;
            }
            inked += 1;
            let (x, y) = (x as i64, y as i64);
            assert!(x >= x0 && x < x1 && y >= y0 && y < y1, "ink at ({x}, {y}) outside box");
        }
        assert!(inked > 0);
    }

    #[test]
    fn truetype_corner_is_fixed() {
        let Some(font) = system_font(32.0) else {
            eprintln!("no TrueType font installed, skipping");
            return;
        };
        let mut img = canvas(300);
        assert_eq!(try_add_text(&mut img, "SPI", TextPosition::Corner, &font).unwrap(), (5, 5));
    }

    #[test]
    fn control_characters_leave_image_untouched() {
        let before = canvas(40);
        let overlay = TextOverlay::new("a\u{7}b", TextPosition::Corner);
        let after = add_overlay_to_qr(before.clone(), &overlay);
        assert_eq!(before, after);
    }

    #[test]
    fn bogus_font_file_falls_back_to_bitmap() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ttf");
        std::fs::write(&path, b"definitely not a font").unwrap();
        assert!(TextFont::truetype_from_file(&path, 20.0).is_err());

        let overlay = TextOverlay {
            font_path: Some(path),
            ..TextOverlay::new("SPI", TextPosition::Corner)
        };
        let img = add_overlay_to_qr(canvas(400), &overlay);
        assert!(img.pixels().any(|p| *p == TEXT_COLOR));
    }

    #[test]
    fn empty_text_is_a_no_op() {
        let before = canvas(20);
        let after = add_text_to_qr(before.clone(), "", TextPosition::Center);
        assert_eq!(before, after);
    }
}
