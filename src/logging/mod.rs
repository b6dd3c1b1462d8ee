// Logging module - tracing subscriber setup
//
// Diagnostics go to stderr through a fmt layer so that stdout carries only
// the run report. Filter precedence: RUST_LOG > command-line verbosity >
// [logging] level in theme.toml > "info".

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Verbosity requested on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Verbosity {
    pub verbose: u8,
    pub quiet: bool,
}

impl Verbosity {
    /// Level implied by -q / -v, if any
    pub fn level(&self) -> Option<&'static str> {
        if self.quiet {
            return Some("error");
        }
        match self.verbose {
            0 => None,
            1 => Some("debug"),
            _ => Some("trace"),
        }
    }
}

/// Filter directive for this crate at the given level
pub fn default_directive(level: &str) -> String {
    format!("apply_theme={level},warn")
}

/// Install the global subscriber. `configured_level` comes from theme.toml
/// and is used only when neither RUST_LOG nor a verbosity flag is set.
pub fn init(verbosity: Verbosity, configured_level: &str) {
    let level = match verbosity.level() {
        Some(level) => level,
        None => configured_level,
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directive(level).into());

    // try_init: a second call (tests, re-entry) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .try_init();
}
