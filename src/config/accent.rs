//! Accent colour section
//!
//! Values are kept as raw strings; validation happens in the resolver so
//! that errors can name the exact key.

use serde::Deserialize;

/// `[accent]` as loaded from theme.toml
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct FileAccent {
    pub primary: Option<String>,
    pub primary_bright: Option<String>,
    pub secondary: Option<String>,
    pub secondary_bright: Option<String>,
}
