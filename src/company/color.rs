//! CSS hex colors.
//!
//! Palette entries come from config files written by people, so parsing is
//! strict: anything that is not `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA`
//! returns `None` and the caller decides on a fallback.

use std::fmt;

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

fn hex_byte(hi: u8, lo: u8) -> Option<u8> {
    Some(hex_digit(hi)? << 4 | hex_digit(lo)?)
}

/// Short-form nibble, `F` → `FF`.
fn hex_nibble(b: u8) -> Option<u8> {
    let d = hex_digit(b)?;
    Some(d << 4 | d)
}

/// Parse CSS hex color string.
///
/// Supports: #RGB, #RRGGBB, #RGBA, #RRGGBBAA
pub fn parse_hex_color(s: &str) -> Option<Rgba> {
    let bytes = s.trim().as_bytes();
    let (&hash, digits) = bytes.split_first()?;
    if hash != b'#' {
        return None;
    }

    match *digits {
        [r, g, b] => Some(Rgba {
            r: hex_nibble(r)?,
            g: hex_nibble(g)?,
            b: hex_nibble(b)?,
            a: 255,
        }),
        [r, g, b, a] => Some(Rgba {
            r: hex_nibble(r)?,
            g: hex_nibble(g)?,
            b: hex_nibble(b)?,
            a: hex_nibble(a)?,
        }),
        [r1, r2, g1, g2, b1, b2] => Some(Rgba {
            r: hex_byte(r1, r2)?,
            g: hex_byte(g1, g2)?,
            b: hex_byte(b1, b2)?,
            a: 255,
        }),
        [r1, r2, g1, g2, b1, b2, a1, a2] => Some(Rgba {
            r: hex_byte(r1, r2)?,
            g: hex_byte(g1, g2)?,
            b: hex_byte(b1, b2)?,
            a: hex_byte(a1, a2)?,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_digit() {
        assert_eq!(hex_digit(b'0'), Some(0));
        assert_eq!(hex_digit(b'9'), Some(9));
        assert_eq!(hex_digit(b'a'), Some(10));
        assert_eq!(hex_digit(b'F'), Some(15));
        assert_eq!(hex_digit(b'g'), None);
    }

    #[test]
    fn test_parse_hex_rgb() {
        let c = parse_hex_color("#FF8800");
        assert_eq!(c, Some(Rgba { r: 255, g: 136, b: 0, a: 255 }));
    }

    #[test]
    fn test_parse_hex_short() {
        let c = parse_hex_color("#F80");
        assert_eq!(c, Some(Rgba { r: 255, g: 136, b: 0, a: 255 }));
    }

    #[test]
    fn test_parse_hex_rgba() {
        let c = parse_hex_color("#FF880080");
        assert_eq!(c, Some(Rgba { r: 255, g: 136, b: 0, a: 128 }));
        let c = parse_hex_color("#F808");
        assert_eq!(c, Some(Rgba { r: 255, g: 136, b: 0, a: 136 }));
    }

    #[test]
    fn test_parse_palette_defaults() {
        assert_eq!(parse_hex_color("#e0f2ff"), Some(Rgba::rgb(0xe0, 0xf2, 0xff)));
        assert_eq!(parse_hex_color(" #fff "), Some(Rgba::WHITE));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(parse_hex_color(""), None);
        assert_eq!(parse_hex_color("fff"), None);
        assert_eq!(parse_hex_color("#ff"), None);
        assert_eq!(parse_hex_color("#gggggg"), None);
        assert_eq!(parse_hex_color("#1234567"), None);
        assert_eq!(parse_hex_color("#ёж"), None);
    }

    #[test]
    fn test_display_round_trips_hex() {
        assert_eq!(Rgba::rgb(0xe6, 0xfc, 0xe6).to_string(), "#e6fce6");
        let translucent = Rgba { r: 0, g: 0, b: 0, a: 0x80 };
        assert_eq!(translucent.to_string(), "#00000080");
    }
}
