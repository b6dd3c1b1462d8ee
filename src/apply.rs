//! Applicator - one linear pass over the theme files
//!
//! Files are read, rewritten and written one at a time. Edits are not
//! transactional: a failure on one file is recorded and the pass moves on,
//! leaving earlier files rewritten. Re-running after fixing the cause
//! converges to the same end state.

use std::path::{Path, PathBuf};

use crate::config::ConfigStore;
use crate::error::ApplyError;
use crate::rewrite::{append_missing_lines, ensure_floating_declarations, rewrite_text};
use crate::targets::TargetFile;
use crate::theme::ResolvedTheme;

/// How a run treats the disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyOptions {
    /// Compute and report changes without writing anything
    pub dry_run: bool,
    /// Write the resolved values back to theme.toml
    pub write_store: bool,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            write_store: true,
        }
    }
}

/// What happened to one target file
#[derive(Debug)]
pub enum FileOutcome {
    /// Rewritten (or would be, in a dry run)
    Updated {
        changed_lines: usize,
        appended_lines: usize,
    },
    /// Read fine, nothing to change; not written
    Unchanged,
    /// Not present in this theme
    Missing,
    Failed(ApplyError),
}

#[derive(Debug)]
pub struct FileReport {
    pub app: &'static str,
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

/// What happened to theme.toml
#[derive(Debug)]
pub enum StoreOutcome {
    Updated,
    Unchanged,
    Skipped,
    Failed(ApplyError),
}

/// Summary of one invocation
#[derive(Debug)]
pub struct RunReport {
    pub files: Vec<FileReport>,
    pub store: StoreOutcome,
    pub dry_run: bool,
}

impl RunReport {
    /// Files that were (or would be) rewritten
    pub fn updated(&self) -> impl Iterator<Item = &FileReport> {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, FileOutcome::Updated { .. }))
    }

    pub fn missing(&self) -> impl Iterator<Item = &Path> {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, FileOutcome::Missing))
            .map(|f| f.path.as_path())
    }

    pub fn failures(&self) -> impl Iterator<Item = &ApplyError> {
        let files = self.files.iter().filter_map(|f| match &f.outcome {
            FileOutcome::Failed(err) => Some(err),
            _ => None,
        });
        let store = match &self.store {
            StoreOutcome::Failed(err) => Some(err),
            _ => None,
        };
        files.chain(store)
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

/// Rewrite one target file in place.
pub fn apply_file(target: &TargetFile, theme: &ResolvedTheme, dry_run: bool) -> FileOutcome {
    let text = match std::fs::read_to_string(&target.path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(
                app = target.app,
                "skipping {}: file not found",
                target.path.display()
            );
            return FileOutcome::Missing;
        }
        Err(source) => {
            let err = ApplyError::Read {
                path: target.path.clone(),
                source,
            };
            tracing::error!("{}", err);
            return FileOutcome::Failed(err);
        }
    };

    let rewrite = rewrite_text(&text, theme);
    let (updated, mut appended_lines) =
        append_missing_lines(&rewrite.text, target.required_lines);
    let updated = if target.floating_declarations {
        let (ensured, added) = ensure_floating_declarations(&updated, theme);
        appended_lines += added;
        ensured
    } else {
        updated
    };

    if updated == text {
        tracing::debug!("{} already up to date", target.path.display());
        return FileOutcome::Unchanged;
    }

    if !dry_run {
        if let Err(source) = std::fs::write(&target.path, &updated) {
            let err = ApplyError::Write {
                path: target.path.clone(),
                source,
            };
            tracing::error!("{}", err);
            return FileOutcome::Failed(err);
        }
    }

    tracing::info!(
        app = target.app,
        changed_lines = rewrite.changed_lines,
        appended_lines,
        dry_run,
        "updated {}",
        target.path.display()
    );
    FileOutcome::Updated {
        changed_lines: rewrite.changed_lines,
        appended_lines,
    }
}

/// Apply `theme` to every target, then persist it to the store.
///
/// `theme` must already be resolved: all validation happens before this
/// point, so nothing here aborts the pass.
pub fn run(
    store: &mut ConfigStore,
    theme: &ResolvedTheme,
    targets: &[TargetFile],
    options: ApplyOptions,
) -> RunReport {
    let files = targets
        .iter()
        .map(|target| FileReport {
            app: target.app,
            path: target.path.clone(),
            outcome: apply_file(target, theme, options.dry_run),
        })
        .collect();

    let store_outcome = if !options.write_store {
        StoreOutcome::Skipped
    } else if options.dry_run {
        match store.render(theme) {
            Ok(rendered) if rendered == store.contents() => StoreOutcome::Unchanged,
            Ok(_) => StoreOutcome::Updated,
            Err(err) => {
                tracing::error!("{}", err);
                StoreOutcome::Failed(err)
            }
        }
    } else {
        match store.save(theme) {
            Ok(true) => {
                tracing::info!("updated {}", store.path.display());
                StoreOutcome::Updated
            }
            Ok(false) => StoreOutcome::Unchanged,
            Err(err) => {
                tracing::error!("{}", err);
                StoreOutcome::Failed(err)
            }
        }
    };

    RunReport {
        files,
        store: store_outcome,
        dry_run: options.dry_run,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::STORE_FILE_NAME;
    use crate::targets::enumerate;
    use crate::theme::{resolve, Overrides};
    use std::fs;
    use tempfile::TempDir;

    const HYPRLAND: &str = "\
general {
    col.active_border = rgba(33ccffee) # accent:primary-rgba
    rounding = 10 # config:rounding
}
layerrule = blur, waybar
layerrule = ignorezero, waybar
";

    const WAYBAR: &str = "\
@define-color accent #33ccff; /* accent:primary */
window#waybar > box {
    border-radius: 12px; /* config:waybar_floating:border-radius */
    padding: 3px 4px; /* config:waybar_floating:padding */
    margin: 4px 6px; /* config:waybar_floating:margin */
}
";

    const STORE: &str = "\
[accent]
primary = \"#33ccff\"

[ui]
rounding = 10
waybar_floating = true
";

    fn theme_dir() -> TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join(STORE_FILE_NAME), STORE).unwrap();
        fs::write(dir.path().join("hyprland.conf"), HYPRLAND).unwrap();
        fs::write(dir.path().join("waybar.css"), WAYBAR).unwrap();
        fs::write(dir.path().join("mako.ini"), "font=sans 10\n").unwrap();
        dir
    }

    fn load(dir: &TempDir, overrides: &Overrides) -> (ConfigStore, ResolvedTheme) {
        let store = ConfigStore::load(&dir.path().join(STORE_FILE_NAME)).unwrap();
        let theme = resolve(&store.accent, &store.ui, overrides).unwrap();
        (store, theme)
    }

    #[test]
    fn test_run_rewrites_existing_and_skips_missing() {
        let dir = theme_dir();
        let overrides = Overrides {
            accent: Some("#70C7F0".to_string()),
            rounding: Some(0),
            waybar_floating: Some("false".to_string()),
            ..Default::default()
        };
        let (mut store, theme) = load(&dir, &overrides);
        let targets = enumerate(dir.path());

        let report = run(&mut store, &theme, &targets, ApplyOptions::default());

        assert!(!report.has_failures());
        let updated: Vec<_> = report.updated().map(|f| f.app).collect();
        assert_eq!(updated, vec!["Hyprland", "Waybar"]);

        let missing: Vec<_> = report.missing().collect();
        assert!(missing.contains(&dir.path().join("neovim.lua").as_path()));
        assert!(!missing.contains(&dir.path().join("mako.ini").as_path()));

        let hypr = fs::read_to_string(dir.path().join("hyprland.conf")).unwrap();
        assert!(hypr.contains("col.active_border = rgba(70c7f0ff) # accent:primary-rgba"));
        assert!(hypr.contains("rounding = 0 # config:rounding"));

        let waybar = fs::read_to_string(dir.path().join("waybar.css")).unwrap();
        assert!(waybar.contains("@define-color accent #70c7f0; /* accent:primary */"));
        assert!(waybar.contains("border-radius: 0; /* config:waybar_floating:border-radius */"));

        assert!(matches!(report.store, StoreOutcome::Updated));
        let stored = fs::read_to_string(dir.path().join(STORE_FILE_NAME)).unwrap();
        assert!(stored.contains("primary = \"#70c7f0\""));
        assert!(stored.contains("rounding = 0"));
        assert!(stored.contains("waybar_floating = false"));
    }

    #[test]
    fn test_second_run_without_flags_changes_nothing() {
        let dir = theme_dir();
        let overrides = Overrides {
            accent_secondary: Some("f070c7".to_string()),
            ..Default::default()
        };
        let (mut store, theme) = load(&dir, &overrides);
        let targets = enumerate(dir.path());
        run(&mut store, &theme, &targets, ApplyOptions::default());

        let (mut store, theme) = load(&dir, &Overrides::default());
        assert_eq!(theme.accent_secondary.to_hex(), "#f070c7");
        let report = run(&mut store, &theme, &targets, ApplyOptions::default());
        assert_eq!(report.updated().count(), 0);
        assert!(matches!(report.store, StoreOutcome::Unchanged));
    }

    #[test]
    fn test_unmarked_file_is_not_written() {
        let dir = theme_dir();
        let mako = dir.path().join("mako.ini");
        let before = fs::metadata(&mako).unwrap().modified().unwrap();

        let (mut store, theme) = load(&dir, &Overrides::default());
        let report = run(&mut store, &theme, &enumerate(dir.path()), ApplyOptions::default());

        let mako_report = report.files.iter().find(|f| f.app == "Mako").unwrap();
        assert!(matches!(mako_report.outcome, FileOutcome::Unchanged));
        assert_eq!(fs::metadata(&mako).unwrap().modified().unwrap(), before);
    }

    #[test]
    fn test_required_lines_are_appended() {
        let dir = theme_dir();
        fs::write(dir.path().join("hyprland.conf"), "rounding = 10 # config:rounding\n").unwrap();

        let (mut store, theme) = load(&dir, &Overrides::default());
        let report = run(&mut store, &theme, &enumerate(dir.path()), ApplyOptions::default());

        let hypr = report.files.iter().find(|f| f.app == "Hyprland").unwrap();
        match hypr.outcome {
            FileOutcome::Updated {
                changed_lines,
                appended_lines,
            } => {
                assert_eq!(changed_lines, 0);
                assert_eq!(appended_lines, 2);
            }
            ref other => panic!("unexpected outcome: {other:?}"),
        }
        let text = fs::read_to_string(dir.path().join("hyprland.conf")).unwrap();
        assert!(text.ends_with("layerrule = blur, waybar\nlayerrule = ignorezero, waybar\n"));
    }

    #[test]
    fn test_floating_declarations_are_added_to_waybar() {
        let dir = theme_dir();
        let css = "window#waybar > box {\n    background-color: @bg;\n}\n";
        fs::write(dir.path().join("waybar.css"), css).unwrap();

        let (mut store, theme) = load(&dir, &Overrides::default());
        assert!(theme.statusbar_floating);
        let report = run(&mut store, &theme, &enumerate(dir.path()), ApplyOptions::default());

        let waybar = report.files.iter().find(|f| f.app == "Waybar").unwrap();
        assert!(matches!(
            waybar.outcome,
            FileOutcome::Updated {
                changed_lines: 0,
                appended_lines: 3
            }
        ));
        let text = fs::read_to_string(dir.path().join("waybar.css")).unwrap();
        assert_eq!(
            text,
            "window#waybar > box {
    background-color: @bg;
    border-radius: 12px; /* config:waybar_floating:border-radius */
    padding: 3px 4px; /* config:waybar_floating:padding */
    margin: 4px 6px; /* config:waybar_floating:margin */
}
"
        );

        let report = run(&mut store, &theme, &enumerate(dir.path()), ApplyOptions::default());
        assert_eq!(report.updated().count(), 0);
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = theme_dir();
        let overrides = Overrides {
            accent: Some("#70c7f0".to_string()),
            ..Default::default()
        };
        let (mut store, theme) = load(&dir, &overrides);
        let options = ApplyOptions {
            dry_run: true,
            write_store: true,
        };

        let report = run(&mut store, &theme, &enumerate(dir.path()), options);

        assert_eq!(report.updated().count(), 2);
        assert!(matches!(report.store, StoreOutcome::Updated));
        assert_eq!(fs::read_to_string(dir.path().join("hyprland.conf")).unwrap(), HYPRLAND);
        assert_eq!(fs::read_to_string(dir.path().join(STORE_FILE_NAME)).unwrap(), STORE);
    }

    #[test]
    fn test_store_write_can_be_skipped() {
        let dir = theme_dir();
        let overrides = Overrides {
            accent: Some("#70c7f0".to_string()),
            ..Default::default()
        };
        let (mut store, theme) = load(&dir, &overrides);
        let options = ApplyOptions {
            dry_run: false,
            write_store: false,
        };

        let report = run(&mut store, &theme, &enumerate(dir.path()), options);

        assert!(matches!(report.store, StoreOutcome::Skipped));
        assert_eq!(fs::read_to_string(dir.path().join(STORE_FILE_NAME)).unwrap(), STORE);
    }

    #[test]
    fn test_unreadable_target_does_not_stop_the_pass() {
        let dir = theme_dir();
        // a directory where a file is expected cannot be read as text
        fs::create_dir(dir.path().join("hyprlock.conf")).unwrap();
        let overrides = Overrides {
            accent: Some("#70c7f0".to_string()),
            ..Default::default()
        };
        let (mut store, theme) = load(&dir, &overrides);

        let report = run(&mut store, &theme, &enumerate(dir.path()), ApplyOptions::default());

        assert!(report.has_failures());
        let failure = report.failures().next().unwrap();
        assert!(failure.to_string().contains("hyprlock.conf"));
        // files after the failing one were still processed
        let waybar = fs::read_to_string(dir.path().join("waybar.css")).unwrap();
        assert!(waybar.contains("#70c7f0"));
        assert!(matches!(report.store, StoreOutcome::Updated));
    }
}
