//! Error types for value resolution, store access and file rewriting

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving values or touching files on disk.
///
/// Validation variants (`InvalidColor`, `InvalidOption`, store read/parse)
/// are raised before any target file is opened for writing. `Read` and
/// `Write` are per-file and do not stop the pass.
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("invalid colour for {source_name}: {value:?} (expected #RRGGBB or RRGGBB, 6 hex digits)")]
    InvalidColor { source_name: String, value: String },

    #[error("invalid value for {name}: {value:?} (expected {expected})")]
    InvalidOption {
        name: String,
        value: String,
        expected: &'static str,
    },

    #[error("cannot read config store {}: {source}", path.display())]
    UnreadableConfigStore {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config store {}: {message}", path.display())]
    MalformedConfigStore { path: PathBuf, message: String },

    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ApplyError {
    /// Shorthand for an unrecognized option token
    pub fn invalid_option(name: &str, value: &str, expected: &'static str) -> Self {
        Self::InvalidOption {
            name: name.to_string(),
            value: value.to_string(),
            expected,
        }
    }
}

pub type Result<T, E = ApplyError> = std::result::Result<T, E>;
