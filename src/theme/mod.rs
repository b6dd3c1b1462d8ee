// Resolved theme values
//
// Architecture:
// - Color: a validated #RRGGBB value
// - Overrides: raw command-line values, unvalidated
// - ResolvedTheme: final value set, computed once per run and never mutated
//
// Resolution priority:
// 1. Command-line overrides
// 2. theme.toml ([accent] and [ui])
// 3. Built-in defaults

mod color;
mod resolve;

pub use color::Color;
pub use resolve::{resolve, Overrides};

/// Built-in accent used when neither flags nor theme.toml provide one
pub const DEFAULT_PRIMARY: Color = Color::rgb(0x7d, 0xd6, 0xf6);
/// Bright companion of DEFAULT_PRIMARY
pub const DEFAULT_PRIMARY_BRIGHT: Color = Color::rgb(0x97, 0xde, 0xf8);
pub const DEFAULT_ROUNDING: u32 = 10;
pub const DEFAULT_WAYBAR_FLOATING: bool = true;
pub const DEFAULT_WAYBAR_BORDER_RADIUS: u32 = 12;
pub const DEFAULT_WAYBAR_PADDING: &str = "3px 4px";
pub const DEFAULT_WAYBAR_MARGIN: &str = "4px 6px";

/// Which accent colour a marker refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorField {
    Primary,
    PrimaryBright,
    Secondary,
    SecondaryBright,
}

/// Complete value set propagated into theme files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTheme {
    // ─── Accent Colors ───────────────────────────────────────
    pub accent_primary: Color,
    pub accent_primary_bright: Color,
    pub accent_secondary: Color,
    pub accent_secondary_bright: Color,

    // ─── Window Manager ──────────────────────────────────────
    pub corner_rounding: u32,

    // ─── Status Bar ──────────────────────────────────────────
    pub statusbar_floating: bool,
    pub waybar_border_radius: u32,
    pub waybar_padding: String,
    pub waybar_margin: String,
}

impl ResolvedTheme {
    pub fn color(&self, field: ColorField) -> Color {
        match field {
            ColorField::Primary => self.accent_primary,
            ColorField::PrimaryBright => self.accent_primary_bright,
            ColorField::Secondary => self.accent_secondary,
            ColorField::SecondaryBright => self.accent_secondary_bright,
        }
    }
}

impl Default for ResolvedTheme {
    fn default() -> Self {
        Self {
            accent_primary: DEFAULT_PRIMARY,
            accent_primary_bright: DEFAULT_PRIMARY_BRIGHT,
            accent_secondary: DEFAULT_PRIMARY,
            accent_secondary_bright: DEFAULT_PRIMARY_BRIGHT,
            corner_rounding: DEFAULT_ROUNDING,
            statusbar_floating: DEFAULT_WAYBAR_FLOATING,
            waybar_border_radius: DEFAULT_WAYBAR_BORDER_RADIUS,
            waybar_padding: DEFAULT_WAYBAR_PADDING.to_string(),
            waybar_margin: DEFAULT_WAYBAR_MARGIN.to_string(),
        }
    }
}
