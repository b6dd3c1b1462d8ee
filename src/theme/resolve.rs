// Value resolver - layers command-line overrides over theme.toml
//
// Every supplied value is validated here, before any theme file is touched.

use super::{
    Color, ResolvedTheme, DEFAULT_PRIMARY, DEFAULT_PRIMARY_BRIGHT, DEFAULT_ROUNDING,
    DEFAULT_WAYBAR_BORDER_RADIUS, DEFAULT_WAYBAR_FLOATING, DEFAULT_WAYBAR_MARGIN,
    DEFAULT_WAYBAR_PADDING,
};
use crate::config::{FileAccent, FileUi};
use crate::error::{ApplyError, Result};

const BOOL_EXPECTED: &str = "true or false";
const INT_EXPECTED: &str = "a non-negative integer";
const CSS_EXPECTED: &str = "a CSS length list such as '3px 4px'";

/// Raw values from the command line. `None` means "keep the stored value".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub accent: Option<String>,
    pub accent_bright: Option<String>,
    pub accent_secondary: Option<String>,
    pub accent_secondary_bright: Option<String>,
    pub rounding: Option<u32>,
    pub waybar_floating: Option<String>,
    pub waybar_border_radius: Option<u32>,
    pub waybar_padding: Option<String>,
    pub waybar_margin: Option<String>,
}

impl Overrides {
    /// True when no flag was supplied (a pure normalization pass)
    pub fn is_empty(&self) -> bool {
        self.accent.is_none()
            && self.accent_bright.is_none()
            && self.accent_secondary.is_none()
            && self.accent_secondary_bright.is_none()
            && self.rounding.is_none()
            && self.waybar_floating.is_none()
            && self.waybar_border_radius.is_none()
            && self.waybar_padding.is_none()
            && self.waybar_margin.is_none()
    }
}

/// Parse a boolean option token.
///
/// Accepts true/false plus the yes/no, on/off and 1/0 spellings, ignoring case.
pub fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(ApplyError::invalid_option(name, value, BOOL_EXPECTED)),
    }
}

/// Produce the effective theme: flag > theme.toml > default.
///
/// A bright variant that is set nowhere mirrors its base colour, except
/// that the built-in primary keeps its built-in bright companion.
pub fn resolve(accent: &FileAccent, ui: &FileUi, overrides: &Overrides) -> Result<ResolvedTheme> {
    let primary = pick_color(
        overrides.accent.as_deref(),
        "--accent",
        accent.primary.as_deref(),
        "theme.toml [accent] primary",
    )?;
    let primary_bright = pick_color(
        overrides.accent_bright.as_deref(),
        "--accent-bright",
        accent.primary_bright.as_deref(),
        "theme.toml [accent] primary_bright",
    )?;
    let secondary = pick_color(
        overrides.accent_secondary.as_deref(),
        "--accent-secondary",
        accent.secondary.as_deref(),
        "theme.toml [accent] secondary",
    )?;
    let secondary_bright = pick_color(
        overrides.accent_secondary_bright.as_deref(),
        "--accent-secondary-bright",
        accent.secondary_bright.as_deref(),
        "theme.toml [accent] secondary_bright",
    )?;

    let accent_primary = primary.unwrap_or(DEFAULT_PRIMARY);
    let accent_primary_bright = primary_bright.unwrap_or(match primary {
        Some(color) => color,
        None => DEFAULT_PRIMARY_BRIGHT,
    });
    let accent_secondary = secondary.unwrap_or(accent_primary);
    let accent_secondary_bright = secondary_bright.unwrap_or(match secondary {
        Some(color) => color,
        None => accent_primary_bright,
    });

    let corner_rounding = match overrides.rounding {
        Some(value) => value,
        None => pick_stored_int(ui.rounding, "theme.toml [ui] rounding")?
            .unwrap_or(DEFAULT_ROUNDING),
    };

    let statusbar_floating = match overrides.waybar_floating.as_deref() {
        Some(token) => parse_bool("--waybar-floating", token)?,
        None => ui.waybar_floating.unwrap_or(DEFAULT_WAYBAR_FLOATING),
    };

    let waybar_border_radius = match overrides.waybar_border_radius {
        Some(value) => value,
        None => pick_stored_int(
            ui.waybar_border_radius,
            "theme.toml [ui] waybar_border_radius",
        )?
        .unwrap_or(DEFAULT_WAYBAR_BORDER_RADIUS),
    };

    let waybar_padding = pick_css_value(
        overrides.waybar_padding.as_deref(),
        "--waybar-padding",
        ui.waybar_padding.as_deref(),
        "theme.toml [ui] waybar_padding",
    )?
    .unwrap_or_else(|| DEFAULT_WAYBAR_PADDING.to_string());

    let waybar_margin = pick_css_value(
        overrides.waybar_margin.as_deref(),
        "--waybar-margin",
        ui.waybar_margin.as_deref(),
        "theme.toml [ui] waybar_margin",
    )?
    .unwrap_or_else(|| DEFAULT_WAYBAR_MARGIN.to_string());

    Ok(ResolvedTheme {
        accent_primary,
        accent_primary_bright,
        accent_secondary,
        accent_secondary_bright,
        corner_rounding,
        statusbar_floating,
        waybar_border_radius,
        waybar_padding,
        waybar_margin,
    })
}

fn pick_color(
    flag: Option<&str>,
    flag_name: &str,
    stored: Option<&str>,
    stored_name: &str,
) -> Result<Option<Color>> {
    let (value, source_name) = match (flag, stored) {
        (Some(value), _) => (value, flag_name),
        (None, Some(value)) => (value, stored_name),
        (None, None) => return Ok(None),
    };

    Color::parse(value)
        .map(Some)
        .ok_or_else(|| ApplyError::InvalidColor {
            source_name: source_name.to_string(),
            value: value.to_string(),
        })
}

fn pick_stored_int(stored: Option<i64>, name: &str) -> Result<Option<u32>> {
    match stored {
        None => Ok(None),
        Some(value) => u32::try_from(value)
            .map(Some)
            .map_err(|_| ApplyError::invalid_option(name, &value.to_string(), INT_EXPECTED)),
    }
}

// Padding and margin are spliced into a single CSS declaration, so anything
// that could end the declaration or the TOML string is rejected.
fn pick_css_value(
    flag: Option<&str>,
    flag_name: &str,
    stored: Option<&str>,
    stored_name: &str,
) -> Result<Option<String>> {
    let (value, name) = match (flag, stored) {
        (Some(value), _) => (value, flag_name),
        (None, Some(value)) => (value, stored_name),
        (None, None) => return Ok(None),
    };

    let trimmed = value.trim();
    let forbidden = |c: char| matches!(c, ';' | '{' | '}' | '"' | '\\' | '\n' | '\r');
    if trimmed.is_empty() || trimmed.contains(forbidden) {
        return Err(ApplyError::invalid_option(name, value, CSS_EXPECTED));
    }
    Ok(Some(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored_accent(primary: &str) -> FileAccent {
        FileAccent {
            primary: Some(primary.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_inputs_give_defaults() {
        let theme = resolve(&FileAccent::default(), &FileUi::default(), &Overrides::default())
            .unwrap();
        assert_eq!(theme, ResolvedTheme::default());
    }

    #[test]
    fn test_flag_wins_over_store() {
        let overrides = Overrides {
            accent: Some("#70C7F0".to_string()),
            ..Default::default()
        };
        let theme = resolve(&stored_accent("#112233"), &FileUi::default(), &overrides).unwrap();
        assert_eq!(theme.accent_primary, Color::rgb(0x70, 0xc7, 0xf0));
    }

    #[test]
    fn test_flag_without_hash_and_no_store() {
        for input in ["70c7f0", "#70c7f0", "70C7F0", "#70C7F0"] {
            let overrides = Overrides {
                accent: Some(input.to_string()),
                ..Default::default()
            };
            let theme =
                resolve(&FileAccent::default(), &FileUi::default(), &overrides).unwrap();
            assert_eq!(theme.accent_primary.to_hex(), "#70c7f0", "input {input}");
        }
    }

    #[test]
    fn test_store_used_when_no_flag() {
        let accent = FileAccent {
            primary: Some("#112233".to_string()),
            primary_bright: Some("#445566".to_string()),
            secondary: Some("#778899".to_string()),
            secondary_bright: None,
        };
        let theme = resolve(&accent, &FileUi::default(), &Overrides::default()).unwrap();
        assert_eq!(theme.accent_primary.to_hex(), "#112233");
        assert_eq!(theme.accent_primary_bright.to_hex(), "#445566");
        assert_eq!(theme.accent_secondary.to_hex(), "#778899");
        // unset bright variant mirrors its base colour
        assert_eq!(theme.accent_secondary_bright.to_hex(), "#778899");
    }

    #[test]
    fn test_secondary_falls_back_to_primary() {
        let theme = resolve(&stored_accent("#112233"), &FileUi::default(), &Overrides::default())
            .unwrap();
        assert_eq!(theme.accent_secondary, theme.accent_primary);
        assert_eq!(theme.accent_primary_bright, theme.accent_primary);
        assert_eq!(theme.accent_secondary_bright, theme.accent_primary_bright);
    }

    #[test]
    fn test_invalid_flag_color_names_flag() {
        let overrides = Overrides {
            accent: Some("#12".to_string()),
            ..Default::default()
        };
        let err = resolve(&FileAccent::default(), &FileUi::default(), &overrides).unwrap_err();
        match err {
            ApplyError::InvalidColor { source_name, value } => {
                assert_eq!(source_name, "--accent");
                assert_eq!(value, "#12");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_stored_color_names_key() {
        let err = resolve(&stored_accent("blue"), &FileUi::default(), &Overrides::default())
            .unwrap_err();
        assert!(err.to_string().contains("theme.toml [accent] primary"));
    }

    #[test]
    fn test_invalid_store_is_ignored_when_flag_given() {
        let overrides = Overrides {
            accent: Some("#70c7f0".to_string()),
            ..Default::default()
        };
        let theme = resolve(&stored_accent("blue"), &FileUi::default(), &overrides).unwrap();
        assert_eq!(theme.accent_primary.to_hex(), "#70c7f0");
    }

    #[test]
    fn test_ui_overrides() {
        let ui = FileUi {
            rounding: Some(8),
            waybar_floating: Some(true),
            ..Default::default()
        };
        let overrides = Overrides {
            rounding: Some(0),
            waybar_floating: Some("false".to_string()),
            ..Default::default()
        };
        let theme = resolve(&FileAccent::default(), &ui, &overrides).unwrap();
        assert_eq!(theme.corner_rounding, 0);
        assert!(!theme.statusbar_floating);
    }

    #[test]
    fn test_negative_stored_rounding_rejected() {
        let ui = FileUi {
            rounding: Some(-3),
            ..Default::default()
        };
        let err = resolve(&FileAccent::default(), &ui, &Overrides::default()).unwrap_err();
        assert!(matches!(err, ApplyError::InvalidOption { .. }));
    }

    #[test]
    fn test_parse_bool_tokens() {
        assert!(parse_bool("--waybar-floating", "true").unwrap());
        assert!(parse_bool("--waybar-floating", "TRUE").unwrap());
        assert!(parse_bool("--waybar-floating", "yes").unwrap());
        assert!(!parse_bool("--waybar-floating", "false").unwrap());
        assert!(!parse_bool("--waybar-floating", "0").unwrap());

        let err = parse_bool("--waybar-floating", "maybe").unwrap_err();
        assert!(err.to_string().contains("--waybar-floating"));
        assert!(err.to_string().contains("true or false"));
    }

    #[test]
    fn test_css_values_validated() {
        let overrides = Overrides {
            waybar_padding: Some("2px; color: red".to_string()),
            ..Default::default()
        };
        let err = resolve(&FileAccent::default(), &FileUi::default(), &overrides).unwrap_err();
        assert!(err.to_string().contains("--waybar-padding"));

        let overrides = Overrides {
            waybar_margin: Some("  0 8px ".to_string()),
            ..Default::default()
        };
        let theme = resolve(&FileAccent::default(), &FileUi::default(), &overrides).unwrap();
        assert_eq!(theme.waybar_margin, "0 8px");
    }

    #[test]
    fn test_overrides_is_empty() {
        assert!(Overrides::default().is_empty());
        let overrides = Overrides {
            rounding: Some(4),
            ..Default::default()
        };
        assert!(!overrides.is_empty());
    }
}
