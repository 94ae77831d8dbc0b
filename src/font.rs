//! Built-in 5x7 bitmap font, used when no TrueType font can be loaded.

use image::{Rgba, RgbaImage};

pub const GLYPH_WIDTH: u32 = 5;
pub const GLYPH_HEIGHT: u32 = 7;
/// Horizontal distance between glyph origins, one blank column included.
pub const GLYPH_ADVANCE: u32 = 6;
/// Vertical distance between baselines of stacked lines.
pub const LINE_ADVANCE: u32 = GLYPH_HEIGHT + 1;
pub const MAX_SCALE: u32 = 512;

const FIRST: u8 = 0x20;
const LAST: u8 = 0x7e;

// Column-major, least significant bit at the top.
const GLYPHS: [[u8; 5]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x5f, 0x00, 0x00], // !
    [0x00, 0x07, 0x00, 0x07, 0x00], // "
    [0x14, 0x7f, 0x14, 0x7f, 0x14], // #
    [0x24, 0x2a, 0x7f, 0x2a, 0x12], // $
    [0x23, 0x13, 0x08, 0x64, 0x62], // %
    [0x36, 0x49, 0x55, 0x22, 0x50], // &
    [0x00, 0x05, 0x03, 0x00, 0x00], // '
    [0x00, 0x1c, 0x22, 0x41, 0x00], // (
    [0x00, 0x41, 0x22, 0x1c, 0x00], // )
    [0x08, 0x2a, 0x1c, 0x2a, 0x08], // *
    [0x08, 0x08, 0x3e, 0x08, 0x08], // +
    [0x00, 0x50, 0x30, 0x00, 0x00], // ,
    [0x08, 0x08, 0x08, 0x08, 0x08], // -
    [0x00, 0x60, 0x60, 0x00, 0x00], // .
    [0x20, 0x10, 0x08, 0x04, 0x02], // /
    [0x3e, 0x51, 0x49, 0x45, 0x3e], // 0
    [0x00, 0x42, 0x7f, 0x40, 0x00], // 1
    [0x42, 0x61, 0x51, 0x49, 0x46], // 2
    [0x21, 0x41, 0x45, 0x4b, 0x31], // 3
    [0x18, 0x14, 0x12, 0x7f, 0x10], // 4
    [0x27, 0x45, 0x45, 0x45, 0x39], // 5
    [0x3c, 0x4a, 0x49, 0x49, 0x30], // 6
    [0x01, 0x71, 0x09, 0x05, 0x03], // 7
    [0x36, 0x49, 0x49, 0x49, 0x36], // 8
    [0x06, 0x49, 0x49, 0x29, 0x1e], // 9
    [0x00, 0x36, 0x36, 0x00, 0x00], // :
    [0x00, 0x56, 0x36, 0x00, 0x00], // ;
    [0x08, 0x14, 0x22, 0x41, 0x00], // <
    [0x14, 0x14, 0x14, 0x14, 0x14], // =
    [0x00, 0x41, 0x22, 0x14, 0x08], // >
    [0x02, 0x01, 0x51, 0x09, 0x06], // ?
    [0x32, 0x49, 0x79, 0x41, 0x3e], // @
    [0x7e, 0x11, 0x11, 0x11, 0x7e], // A
    [0x7f, 0x49, 0x49, 0x49, 0x36], // B
    [0x3e, 0x41, 0x41, 0x41, 0x22], // C
    [0x7f, 0x41, 0x41, 0x22, 0x1c], // D
    [0x7f, 0x49, 0x49, 0x49, 0x41], // E
    [0x7f, 0x09, 0x09, 0x01, 0x01], // F
    [0x3e, 0x41, 0x41, 0x51, 0x32], // G
    [0x7f, 0x08, 0x08, 0x08, 0x7f], // H
    [0x00, 0x41, 0x7f, 0x41, 0x00], // I
    [0x20, 0x40, 0x41, 0x3f, 0x01], // J
    [0x7f, 0x08, 0x14, 0x22, 0x41], // K
    [0x7f, 0x40, 0x40, 0x40, 0x40], // L
    [0x7f, 0x02, 0x04, 0x02, 0x7f], // M
    [0x7f, 0x04, 0x08, 0x10, 0x7f], // N
    [0x3e, 0x41, 0x41, 0x41, 0x3e], // O
    [0x7f, 0x09, 0x09, 0x09, 0x06], // P
    [0x3e, 0x41, 0x51, 0x21, 0x5e], // Q
    [0x7f, 0x09, 0x19, 0x29, 0x46], // R
    [0x46, 0x49, 0x49, 0x49, 0x31], // S
    [0x01, 0x01, 0x7f, 0x01, 0x01], // T
    [0x3f, 0x40, 0x40, 0x40, 0x3f], // U
    [0x1f, 0x20, 0x40, 0x20, 0x1f], // V
    [0x7f, 0x20, 0x18, 0x20, 0x7f], // W
    [0x63, 0x14, 0x08, 0x14, 0x63], // X
    [0x03, 0x04, 0x78, 0x04, 0x03], // Y
    [0x61, 0x51, 0x49, 0x45, 0x43], // Z
    [0x00, 0x7f, 0x41, 0x41, 0x00], // [
    [0x02, 0x04, 0x08, 0x10, 0x20], // backslash
    [0x00, 0x41, 0x41, 0x7f, 0x00], // ]
    [0x04, 0x02, 0x01, 0x02, 0x04], // ^
    [0x40, 0x40, 0x40, 0x40, 0x40], // _
    [0x00, 0x01, 0x02, 0x04, 0x00], // `
    [0x20, 0x54, 0x54, 0x54, 0x78], // a
    [0x7f, 0x48, 0x44, 0x44, 0x38], // b
    [0x38, 0x44, 0x44, 0x44, 0x20], // c
    [0x38, 0x44, 0x44, 0x48, 0x7f], // d
    [0x38, 0x54, 0x54, 0x54, 0x18], // e
    [0x08, 0x7e, 0x09, 0x01, 0x02], // f
    [0x0c, 0x52, 0x52, 0x52, 0x3e], // g
    [0x7f, 0x08, 0x04, 0x04, 0x78], // h
    [0x00, 0x44, 0x7d, 0x40, 0x00], // i
    [0x20, 0x40, 0x44, 0x3d, 0x00], // j
    [0x7f, 0x10, 0x28, 0x44, 0x00], // k
    [0x00, 0x41, 0x7f, 0x40, 0x00], // l
    [0x7c, 0x04, 0x18, 0x04, 0x78], // m
    [0x7c, 0x08, 0x04, 0x04, 0x78], // n
    [0x38, 0x44, 0x44, 0x44, 0x38], // o
    [0x7c, 0x14, 0x14, 0x14, 0x08], // p
    [0x08, 0x14, 0x14, 0x18, 0x7c], // q
    [0x7c, 0x08, 0x04, 0x04, 0x08], // r
    [0x48, 0x54, 0x54, 0x54, 0x20], // s
    [0x04, 0x3f, 0x44, 0x40, 0x20], // t
    [0x3c, 0x40, 0x40, 0x20, 0x7c], // u
    [0x1c, 0x20, 0x40, 0x20, 0x1c], // v
    [0x3c, 0x40, 0x30, 0x40, 0x3c], // w
    [0x44, 0x28, 0x10, 0x28, 0x44], // x
    [0x0c, 0x50, 0x50, 0x50, 0x3c], // y
    [0x44, 0x64, 0x54, 0x4c, 0x44], // z
    [0x00, 0x08, 0x36, 0x41, 0x00], // {
    [0x00, 0x00, 0x7f, 0x00, 0x00], // |
    [0x00, 0x41, 0x36, 0x08, 0x00], // }
    [0x08, 0x04, 0x08, 0x10, 0x08], // ~
];

fn glyph(c: char) -> &'static [u8; 5] {
    let code = u32::from(c);
    let idx = if (FIRST as u32..=LAST as u32).contains(&code) {
        code as u8
    } else {
        b'?'
    };
    &GLYPHS[(idx - FIRST) as usize]
}

/// The fallback face. Every pixel of the 5x7 grid is drawn as a
/// `scale` x `scale` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapFont {
    pub scale: u32,
}

impl BitmapFont {
    pub fn new(scale: u32) -> Self {
        Self {
            scale: scale.clamp(1, MAX_SCALE),
        }
    }

    /// Picks the block scale so the cap height roughly matches `px`.
    pub fn for_pixel_size(px: f32) -> Self {
        if !px.is_finite() {
            return Self::new(1);
        }
        Self::new((px / LINE_ADVANCE as f32).round().clamp(1.0, MAX_SCALE as f32) as u32)
    }

    /// Width and height of one line, without the trailing gap.
    pub fn measure(&self, line: &str) -> (u64, u64) {
        let n = line.chars().count() as u64;
        if n == 0 {
            return (0, 0);
        }
        let scale = u64::from(self.scale);
        (
            (n * u64::from(GLYPH_ADVANCE) - u64::from(GLYPH_ADVANCE - GLYPH_WIDTH)) * scale,
            u64::from(GLYPH_HEIGHT) * scale,
        )
    }

    pub fn line_height(&self) -> u64 {
        u64::from(LINE_ADVANCE) * u64::from(self.scale)
    }

    pub fn draw(&self, img: &mut RgbaImage, origin: (i64, i64), text: &str, color: Rgba<u8>) {
        let s = self.scale as i64;
        let (w, h) = (img.width() as i64, img.height() as i64);

        for (i, c) in text.chars().enumerate() {
            let base_x = origin.0 + i as i64 * GLYPH_ADVANCE as i64 * s;
            if base_x >= w {
                break;
            }
            for (col, bits) in glyph(c).iter().enumerate() {
                for row in 0..GLYPH_HEIGHT as i64 {
                    if bits & (1 << row) == 0 {
                        continue;
                    }
                    let x0 = base_x + col as i64 * s;
                    let y0 = origin.1 + row * s;
                    for y in y0.max(0)..(y0 + s).min(h) {
                        for x in x0.max(0)..(x0 + s).min(w) {
                            img.put_pixel(x as u32, y as u32, color);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    #[test]
    fn table_covers_printable_ascii() {
        assert_eq!(GLYPHS.len(), (LAST - FIRST + 1) as usize);
        assert_eq!(glyph('A'), &[0x7e, 0x11, 0x11, 0x11, 0x7e]);
        assert_eq!(glyph('é'), glyph('?'));
    }

    #[test]
    fn measure_scales_with_block_size() {
        assert_eq!(BitmapFont::new(1).measure("SPI"), (17, 7));
        assert_eq!(BitmapFont::new(3).measure("SPI"), (51, 21));
        assert_eq!(BitmapFont::new(2).measure(""), (0, 0));
    }

    #[test]
    fn pixel_size_maps_to_scale() {
        assert_eq!(BitmapFont::for_pixel_size(200.0).scale, 25);
        assert_eq!(BitmapFont::for_pixel_size(1.0).scale, 1);
        assert_eq!(BitmapFont::for_pixel_size(1e12).scale, MAX_SCALE);
        assert_eq!(BitmapFont::for_pixel_size(f32::NAN).scale, 1);
        assert_eq!(BitmapFont::for_pixel_size(-40.0).scale, 1);
    }

    #[test]
    fn draws_and_clips() {
        let mut img = RgbaImage::from_pixel(10, 10, WHITE);
        BitmapFont::new(1).draw(&mut img, (0, 0), "I", BLACK);
        // 'I' has its stem in column 2
        for y in 0..7 {
            assert_eq!(*img.get_pixel(2, y), BLACK);
        }
        assert_eq!(*img.get_pixel(0, 3), WHITE);

        let mut img = RgbaImage::from_pixel(4, 4, WHITE);
        BitmapFont::new(2).draw(&mut img, (-3, -3), "WW", BLACK);
    }
}
