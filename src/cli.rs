// CLI module - command-line argument parsing and handlers
//
// Default action applies the theme: flags override theme.toml, every known
// theme file is rewritten, and theme.toml is updated with the result.
//
// Subcommands for configuration management:
// - config --show: Display effective values (flags > theme.toml > defaults)
// - config --path: Show the theme.toml path
// - config --init: Create theme.toml with defaults if it does not exist

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::apply::{self, ApplyOptions, FileOutcome, RunReport, StoreOutcome};
use crate::config::{ConfigStore, STORE_FILE_NAME, VERSION};
use crate::logging::{self, Verbosity};
use crate::targets;
use crate::theme::{resolve, Overrides, ResolvedTheme};

/// Omarchy theme accent applicator
#[derive(Parser)]
#[command(name = "apply-theme")]
#[command(version = VERSION)]
#[command(
    about = "Propagate accent colours and UI options across theme files",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub location: LocationArgs,

    #[command(flatten)]
    pub values: ValueArgs,

    /// Do not write the resolved values back to theme.toml
    #[arg(long)]
    pub no_write_config: bool,

    /// Show what would change without writing any file
    #[arg(long)]
    pub dry_run: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Where the theme lives
#[derive(Args, Debug, Clone, Default)]
pub struct LocationArgs {
    /// Theme directory holding theme.toml and the per-application files
    #[arg(long, value_name = "DIR", global = true)]
    pub theme_dir: Option<PathBuf>,

    /// Path to theme.toml (default: <theme dir>/theme.toml)
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,
}

/// Values that override theme.toml
#[derive(Args, Debug, Clone, Default)]
pub struct ValueArgs {
    /// Primary accent (#RRGGBB)
    #[arg(long, value_name = "HEX")]
    pub accent: Option<String>,

    /// Bright primary accent (#RRGGBB)
    #[arg(long, value_name = "HEX")]
    pub accent_bright: Option<String>,

    /// Secondary accent (#RRGGBB)
    #[arg(long, value_name = "HEX")]
    pub accent_secondary: Option<String>,

    /// Bright secondary accent (#RRGGBB)
    #[arg(long, value_name = "HEX")]
    pub accent_secondary_bright: Option<String>,

    /// Window corner rounding in pixels
    #[arg(long, value_name = "N")]
    pub rounding: Option<u32>,

    /// Float Waybar above windows (true/false)
    #[arg(long, value_name = "BOOL")]
    pub waybar_floating: Option<String>,

    /// Waybar border radius in pixels while floating
    #[arg(long, value_name = "N")]
    pub waybar_border_radius: Option<u32>,

    /// Waybar padding while floating (e.g. '3px 4px')
    #[arg(long, value_name = "CSS")]
    pub waybar_padding: Option<String>,

    /// Waybar margin while floating (e.g. '4px 6px')
    #[arg(long, value_name = "CSS")]
    pub waybar_margin: Option<String>,
}

impl From<ValueArgs> for Overrides {
    fn from(args: ValueArgs) -> Self {
        Self {
            accent: args.accent,
            accent_bright: args.accent_bright,
            accent_secondary: args.accent_secondary,
            accent_secondary_bright: args.accent_secondary_bright,
            rounding: args.rounding,
            waybar_floating: args.waybar_floating,
            waybar_border_radius: args.waybar_border_radius,
            waybar_padding: args.waybar_padding,
            waybar_margin: args.waybar_margin,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage theme.toml
    Config {
        /// Show effective values
        #[arg(long)]
        show: bool,

        /// Show theme.toml path
        #[arg(long)]
        path: bool,

        /// Create theme.toml with defaults if missing
        #[arg(long)]
        init: bool,
    },
}

/// Theme directory and store path for this invocation
#[derive(Debug, Clone, PartialEq, Eq)]
struct Paths {
    theme_dir: PathBuf,
    store: PathBuf,
}

impl Paths {
    fn resolve(args: &LocationArgs) -> Result<Self> {
        let theme_dir = match &args.theme_dir {
            Some(dir) => dir.clone(),
            None => ConfigStore::default_theme_dir()
                .context("could not determine the theme directory; pass --theme-dir")?,
        };
        let store = args
            .config
            .clone()
            .unwrap_or_else(|| theme_dir.join(STORE_FILE_NAME));
        Ok(Self { theme_dir, store })
    }
}

/// Parse the command line and run it
pub fn handle_cli() -> Result<ExitCode> {
    let cli = Cli::parse();
    let verbosity = Verbosity {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };
    let paths = Paths::resolve(&cli.location)?;

    match cli.command {
        Some(Commands::Config { show, path, init }) => {
            logging::init(verbosity, "info");
            if path {
                println!("{}", paths.store.display());
            } else if init {
                handle_config_init(&paths.store)?;
            } else if show {
                handle_config_show(&paths.store, cli.values.into())?;
            } else {
                // No flag provided, show help
                println!("Usage: apply-theme config [--show|--path|--init]");
                println!();
                println!("Options:");
                println!("  --show    Display effective values (flags > theme.toml > defaults)");
                println!("  --path    Show theme.toml path");
                println!("  --init    Create theme.toml with defaults if missing");
            }
            Ok(ExitCode::SUCCESS)
        }
        None => {
            let options = ApplyOptions {
                dry_run: cli.dry_run,
                write_store: !cli.no_write_config,
            };
            handle_apply(&paths, cli.values.into(), options, verbosity)
        }
    }
}

fn handle_apply(
    paths: &Paths,
    overrides: Overrides,
    options: ApplyOptions,
    verbosity: Verbosity,
) -> Result<ExitCode> {
    // Store and flags are validated before any theme file is opened
    let mut store = ConfigStore::load(&paths.store)?;
    logging::init(verbosity, &store.logging.level);

    let theme = resolve(&store.accent, &store.ui, &overrides)?;
    if options.write_store {
        // A store that cannot take the values back is fatal up front
        store.render(&theme)?;
    }
    if overrides.is_empty() {
        tracing::debug!("no overrides given, normalizing from {}", paths.store.display());
    }
    tracing::debug!(?theme, "resolved theme");

    let targets = targets::enumerate(&paths.theme_dir);
    let report = apply::run(&mut store, &theme, &targets, options);
    print_report(&report, &paths.theme_dir, &paths.store);

    if report.has_failures() {
        eprintln!("Some files could not be updated; fix the errors above and run again.");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_config_init(path: &Path) -> Result<()> {
    if ConfigStore::init(path)? {
        println!("Created theme config: {}", path.display());
    } else {
        println!("Theme config already exists: {}", path.display());
    }
    Ok(())
}

fn handle_config_show(path: &Path, overrides: Overrides) -> Result<()> {
    let store = ConfigStore::load(path)?;
    let theme = resolve(&store.accent, &store.ui, &overrides)?;

    println!("# Effective values (flags > theme.toml > defaults)");
    println!();
    print_theme(&theme);
    println!();
    println!("[logging]");
    println!("level = {:?}", store.logging.level);
    println!();
    println!("# Source: {}", path.display());
    Ok(())
}

fn print_theme(theme: &ResolvedTheme) {
    println!("[accent]");
    println!("primary = \"{}\"", theme.accent_primary);
    println!("primary_bright = \"{}\"", theme.accent_primary_bright);
    println!("secondary = \"{}\"", theme.accent_secondary);
    println!("secondary_bright = \"{}\"", theme.accent_secondary_bright);
    println!();
    println!("[ui]");
    println!("rounding = {}", theme.corner_rounding);
    println!("waybar_floating = {}", theme.statusbar_floating);
    println!("waybar_border_radius = {}", theme.waybar_border_radius);
    println!("waybar_padding = {:?}", theme.waybar_padding);
    println!("waybar_margin = {:?}", theme.waybar_margin);
}

fn print_report(report: &RunReport, theme_dir: &Path, store_path: &Path) {
    let mut lines: Vec<String> = report
        .updated()
        .map(|file| {
            let shown = file.path.strip_prefix(theme_dir).unwrap_or(&file.path);
            match file.outcome {
                FileOutcome::Updated {
                    changed_lines,
                    appended_lines: 0,
                } => format!(
                    " - {} ({}, {} lines)",
                    shown.display(),
                    file.app,
                    changed_lines
                ),
                FileOutcome::Updated {
                    changed_lines,
                    appended_lines,
                } => format!(
                    " - {} ({}, {} lines, {} added)",
                    shown.display(),
                    file.app,
                    changed_lines,
                    appended_lines
                ),
                _ => format!(" - {}", shown.display()),
            }
        })
        .collect();

    if matches!(report.store, StoreOutcome::Updated) {
        let shown = store_path.strip_prefix(theme_dir).unwrap_or(store_path);
        lines.push(format!(" - {}", shown.display()));
    }

    let missing = report.missing().count();
    if lines.is_empty() {
        println!("No files required updates.");
        print_missing(missing);
        return;
    }

    if report.dry_run {
        println!("Would update (dry run):");
    } else {
        println!("Applied theme updates in:");
    }
    for line in &lines {
        println!("{}", line);
    }

    if !report.dry_run && report.updated().next().is_some() {
        println!();
        println!("Reminder: reload to apply:");
        println!("  hyprctl reload");
        println!("  killall waybar && waybar &  # or pkill -SIGUSR2 waybar");
        println!("  makoctl reload  # if using mako");
    }
    print_missing(missing);
}

fn print_missing(count: usize) {
    if count > 0 {
        println!();
        println!("Skipped {} file(s) not present in this theme.", count);
    }
}
