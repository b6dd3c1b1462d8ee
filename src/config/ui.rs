//! UI options section

use serde::Deserialize;

/// `[ui]` as loaded from theme.toml
///
/// Integers are read signed so a negative value is reported as an invalid
/// option rather than a parse failure.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct FileUi {
    /// Hyprland window corner rounding
    pub rounding: Option<i64>,
    /// Waybar floats above windows with its own margin and radius
    pub waybar_floating: Option<bool>,
    pub waybar_border_radius: Option<i64>,
    pub waybar_padding: Option<String>,
    pub waybar_margin: Option<String>,
}
