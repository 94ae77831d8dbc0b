use image::Rgba;

use crate::error::{ComposeError, Result};

const NAMED: &[(&str, [u8; 3])] = &[
    ("white", [255, 255, 255]),
    ("black", [0, 0, 0]),
    ("red", [255, 0, 0]),
    ("lime", [0, 255, 0]),
    ("green", [0, 128, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("purple", [128, 0, 128]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
    ("silver", [192, 192, 192]),
    ("orange", [255, 165, 0]),
    ("navy", [0, 0, 128]),
    ("teal", [0, 128, 128]),
    ("maroon", [128, 0, 0]),
    ("olive", [128, 128, 0]),
    ("aqua", [0, 255, 255]),
    ("cyan", [0, 255, 255]),
    ("fuchsia", [255, 0, 255]),
    ("magenta", [255, 0, 255]),
];

/// Parses `#rrggbb`, `#rgb` or a basic color name into an opaque pixel.
pub fn parse_color(s: &str) -> Result<Rgba<u8>> {
    let trimmed = s.trim();
    let lower = trimmed.to_ascii_lowercase();

    if let Some((_, rgb)) = NAMED.iter().find(|(name, _)| *name == lower) {
        return Ok(Rgba([rgb[0], rgb[1], rgb[2], 255]));
    }

    let digits = lower
        .strip_prefix('#')
        .ok_or_else(|| ComposeError::Color(trimmed.to_string()))?;

    let expanded = match digits.len() {
        6 => digits.to_string(),
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        _ => return Err(ComposeError::Color(trimmed.to_string())),
    };

    let b = hex::decode(&expanded).map_err(|_| ComposeError::Color(trimmed.to_string()))?;
    Ok(Rgba([b[0], b[1], b[2], 255]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_hex() {
        assert_eq!(parse_color("#8b43c9").unwrap(), Rgba([0x8b, 0x43, 0xc9, 255]));
        assert_eq!(parse_color("#8B43C9").unwrap(), Rgba([0x8b, 0x43, 0xc9, 255]));
    }

    #[test]
    fn parses_short_hex() {
        assert_eq!(parse_color("#f0a").unwrap(), Rgba([0xff, 0x00, 0xaa, 255]));
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!(parse_color("white").unwrap(), Rgba([255, 255, 255, 255]));
        assert_eq!(parse_color(" Black ").unwrap(), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(parse_color("chartreuse-ish"), Err(ComposeError::Color(_))));
        assert!(matches!(parse_color("#12345"), Err(ComposeError::Color(_))));
        assert!(matches!(parse_color("#gggggg"), Err(ComposeError::Color(_))));
    }
}
