//! Theme files the applicator knows about
//!
//! The set is fixed: one or more files per supported application, relative
//! to the theme directory. A theme need not ship every file; missing ones
//! are reported and skipped by the applicator.

use std::path::{Path, PathBuf};

/// One known theme file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSpec {
    /// Application the file configures
    pub app: &'static str,
    /// Path relative to the theme directory
    pub file: &'static str,
    /// Lines that must exist in the file; appended when absent
    pub required_lines: &'static [&'static str],
    /// Holds the floating bar box whose marked declarations must exist
    pub floating_declarations: bool,
}

/// A known theme file located inside a concrete theme directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFile {
    pub app: &'static str,
    pub path: PathBuf,
    pub required_lines: &'static [&'static str],
    pub floating_declarations: bool,
}

/// Waybar blur/transparency needs these layer rules in Hyprland
const HYPRLAND_WAYBAR_LAYERRULES: &[&str] =
    &["layerrule = blur, waybar", "layerrule = ignorezero, waybar"];

const fn target(app: &'static str, file: &'static str) -> TargetSpec {
    TargetSpec {
        app,
        file,
        required_lines: &[],
        floating_declarations: false,
    }
}

pub const KNOWN_TARGETS: &[TargetSpec] = &[
    TargetSpec {
        app: "Hyprland",
        file: "hyprland.conf",
        required_lines: HYPRLAND_WAYBAR_LAYERRULES,
        floating_declarations: false,
    },
    target("Hyprlock", "hyprlock.conf"),
    TargetSpec {
        app: "Waybar",
        file: "waybar.css",
        required_lines: &[],
        floating_declarations: true,
    },
    target("Mako", "mako.ini"),
    target("SwayOSD", "swayosd.css"),
    target("Walker", "walker.css"),
    target("Neovim", "neovim.lua"),
    target("Alacritty", "alacritty.toml"),
    target("Kitty", "kitty.conf"),
    target("Ghostty", "ghostty.conf"),
    target("btop", "btop.theme"),
];

/// Known targets resolved against `theme_dir`, in processing order
pub fn enumerate(theme_dir: &Path) -> Vec<TargetFile> {
    KNOWN_TARGETS
        .iter()
        .map(|spec| TargetFile {
            app: spec.app,
            path: theme_dir.join(spec.file),
            required_lines: spec.required_lines,
            floating_declarations: spec.floating_declarations,
        })
        .collect()
}
