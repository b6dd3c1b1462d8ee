//! Config store (theme.toml)
//!
//! theme.toml is the single source of truth for the accent colours and UI
//! options of a theme. It is read once before any file is rewritten and
//! written back once after the pass, so a later run without flags
//! reproduces the same result.
//!
//! Location, in order of precedence:
//! 1. `--config <path>`
//! 2. `<theme dir>/theme.toml`, where the theme dir is `--theme-dir`, the
//!    current directory if it holds a theme.toml, or the Omarchy current
//!    theme (~/.config/omarchy/current/theme)

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{ApplyError, Result};
use crate::theme::{Color, ResolvedTheme};

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod accent;
mod observability;
mod serialization;
mod ui;


// ─────────────────────────────────────────────────────────────────────────────
// Re-exports
// ─────────────────────────────────────────────────────────────────────────────

pub use accent::FileAccent;
pub use observability::{FileLogging, LoggingConfig};
pub use serialization::render_store;
pub use ui::FileUi;

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// File name of the config store inside a theme directory
pub const STORE_FILE_NAME: &str = "theme.toml";

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// theme.toml structure. Unknown sections and keys are ignored here and
/// preserved on write.
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    /// Optional [accent] section
    pub accent: Option<FileAccent>,

    /// Optional [ui] section
    pub ui: Option<FileUi>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Config Store
// ─────────────────────────────────────────────────────────────────────────────

/// Loaded theme.toml plus the text it was parsed from
#[derive(Debug, Clone)]
pub struct ConfigStore {
    pub path: PathBuf,
    pub accent: FileAccent,
    pub ui: FileUi,
    pub logging: LoggingConfig,
    contents: String,
}

impl ConfigStore {
    /// Pick the theme directory when `--theme-dir` was not given
    pub fn default_theme_dir() -> Option<PathBuf> {
        if let Ok(cwd) = std::env::current_dir() {
            if cwd.join(STORE_FILE_NAME).is_file() {
                return Some(cwd);
            }
        }
        dirs::home_dir().map(|home| {
            home.join(".config")
                .join("omarchy")
                .join("current")
                .join("theme")
        })
    }

    /// Read and parse the store. A missing or unreadable file is fatal.
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|source| ApplyError::UnreadableConfigStore {
                path: path.to_path_buf(),
                source,
            })?;
        Self::parse(path, contents)
    }

    /// Parse store text that was already read from `path`
    pub fn parse(path: &Path, contents: String) -> Result<Self> {
        let file: FileConfig =
            toml::from_str(&contents).map_err(|e| ApplyError::MalformedConfigStore {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            accent: file.accent.unwrap_or_default(),
            ui: file.ui.unwrap_or_default(),
            logging: LoggingConfig::from_file(file.logging),
            contents,
        })
    }

    /// The store text as last read or written
    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Store text with the resolved values written in.
    ///
    /// Fails when the values cannot be written back in place, e.g. when
    /// `[accent]` is an inline table. The rendered text must parse and hold
    /// exactly `theme`, otherwise nothing may be written.
    pub fn render(&self, theme: &ResolvedTheme) -> Result<String> {
        let rendered = render_store(&self.contents, theme);
        let malformed = |message: String| ApplyError::MalformedConfigStore {
            path: self.path.clone(),
            message,
        };

        let file: FileConfig = toml::from_str(&rendered)
            .map_err(|e| malformed(format!("values cannot be written back in place: {e}")))?;
        if !holds_theme(&file, theme) {
            return Err(malformed(
                "values cannot be written back in place; use [accent] and [ui] tables".to_string(),
            ));
        }
        Ok(rendered)
    }

    /// Write the resolved values back. Returns false when the file already
    /// held exactly these values.
    pub fn save(&mut self, theme: &ResolvedTheme) -> Result<bool> {
        let rendered = self.render(theme)?;
        if rendered == self.contents {
            return Ok(false);
        }

        std::fs::write(&self.path, &rendered).map_err(|source| ApplyError::Write {
            path: self.path.clone(),
            source,
        })?;
        self.contents = rendered;
        Ok(true)
    }

    /// Create a store holding the built-in defaults. Never overwrites an
    /// existing file; returns false in that case.
    pub fn init(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| ApplyError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let template = render_store("", &ResolvedTheme::default());
        std::fs::write(path, template).map_err(|source| ApplyError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(true)
    }
}

/// Whether parsed store values are exactly `theme`
fn holds_theme(file: &FileConfig, theme: &ResolvedTheme) -> bool {
    let (Some(accent), Some(ui)) = (&file.accent, &file.ui) else {
        return false;
    };
    let hex = |value: &Option<String>, expected: Color| {
        value.as_deref() == Some(expected.to_hex().as_str())
    };

    hex(&accent.primary, theme.accent_primary)
        && hex(&accent.primary_bright, theme.accent_primary_bright)
        && hex(&accent.secondary, theme.accent_secondary)
        && hex(&accent.secondary_bright, theme.accent_secondary_bright)
        && ui.rounding == Some(i64::from(theme.corner_rounding))
        && ui.waybar_floating == Some(theme.statusbar_floating)
        && ui.waybar_border_radius == Some(i64::from(theme.waybar_border_radius))
        && ui.waybar_padding.as_deref() == Some(theme.waybar_padding.as_str())
        && ui.waybar_margin.as_deref() == Some(theme.waybar_margin.as_str())
}
