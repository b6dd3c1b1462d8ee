// Accent colour value
//
// Colours are accepted as 6 hex digits with or without a leading '#', in
// either case, and always emitted lower-case. The RGBA form used by
// Hyprland-style configs is the same digits with an opaque alpha appended.

use std::fmt;

/// Alpha channel appended when a marker asks for `rgba(RRGGBBAA)`
const OPAQUE_ALPHA: u8 = 0xff;

/// An RGB colour as it appears in theme files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` or `RRGGBB` (surrounding whitespace ignored).
    /// Returns None for anything else, including 3- and 8-digit forms.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self::rgb(r, g, b))
    }

    /// `#rrggbb`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// `rgba(rrggbbff)`
    pub fn to_rgba(self) -> String {
        format!(
            "rgba({:02x}{:02x}{:02x}{:02x})",
            self.r, self.g, self.b, OPAQUE_ALPHA
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!(Color::parse("#ff0000"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(Color::parse("00FF00"), Some(Color::rgb(0, 255, 0)));
        assert_eq!(Color::parse("  #0000ff \n"), Some(Color::rgb(0, 0, 255)));
    }

    #[test]
    fn test_parse_rejects_wrong_lengths() {
        assert_eq!(Color::parse("#12"), None);
        assert_eq!(Color::parse("#fff"), None);
        assert_eq!(Color::parse("#70c7f0ff"), None);
        assert_eq!(Color::parse(""), None);
        assert_eq!(Color::parse("#"), None);
    }

    #[test]
    fn test_parse_rejects_non_hex() {
        assert_eq!(Color::parse("#70c7fg"), None);
        assert_eq!(Color::parse("##70c7f"), None);
        // multi-byte input must not panic on slicing
        assert_eq!(Color::parse("#ééé"), None);
    }

    #[test]
    fn test_output_is_lowercase() {
        let color = Color::parse("#70C7F0").unwrap();
        assert_eq!(color.to_hex(), "#70c7f0");
        assert_eq!(color.to_rgba(), "rgba(70c7f0ff)");
        assert_eq!(color.to_string(), "#70c7f0");
    }
}
