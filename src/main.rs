// apply-theme - accent propagation for Omarchy desktop themes
//
// Rewrites the accent colours and UI options of a theme across the config
// files of every application it styles, then records the values in the
// theme's theme.toml so the next run reproduces them.
//
// Architecture:
// - Config store (theme.toml): default values, read once and written once
// - Resolver: command-line flags layered over the store into one immutable
//   ResolvedTheme, validated before any file is touched
// - Rewriter: marker table scanned line by line; only the value literal on a
//   marked line changes
// - Applicator: one sequential pass over the known theme files; missing
//   files are skipped with a warning, per-file failures do not stop the pass

mod apply;
mod cli;
mod config;
mod error;
mod logging;
mod rewrite;
mod targets;
mod theme;
mod util;

use std::process::ExitCode;

fn main() -> ExitCode {
    match cli::handle_cli() {
        Ok(code) => code,
        Err(e) => {
            // Fatal before the pass started: nothing was written
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
