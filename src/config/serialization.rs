//! Config serialization to TOML
//!
//! Resolved values are written into the existing theme.toml text in place.
//! Only the values of managed keys in [accent] and [ui] change; comments,
//! key order, unknown keys and unrelated sections stay byte-for-byte.
//! Missing keys are appended to the end of their section, missing sections
//! to the end of the file. Root-level dotted keys (`accent.primary = ..`)
//! are rewritten where they stand and extended with further dotted keys.

use std::ops::Range;

use crate::theme::ResolvedTheme;
use crate::util::split_terminator;

/// Leading comment of a freshly generated theme.toml
const HEADER: &str = "# Theme configuration (colors + UI)\n# Managed by apply-theme\n";

/// One managed section with its keys and rendered TOML values
struct Section {
    name: &'static str,
    entries: Vec<(&'static str, String)>,
}

fn quoted(value: &str) -> String {
    format!("\"{}\"", value)
}

fn managed_sections(theme: &ResolvedTheme) -> Vec<Section> {
    vec![
        Section {
            name: "accent",
            entries: vec![
                ("primary", quoted(&theme.accent_primary.to_hex())),
                ("primary_bright", quoted(&theme.accent_primary_bright.to_hex())),
                ("secondary", quoted(&theme.accent_secondary.to_hex())),
                (
                    "secondary_bright",
                    quoted(&theme.accent_secondary_bright.to_hex()),
                ),
            ],
        },
        Section {
            name: "ui",
            entries: vec![
                ("rounding", theme.corner_rounding.to_string()),
                ("waybar_floating", theme.statusbar_floating.to_string()),
                (
                    "waybar_border_radius",
                    theme.waybar_border_radius.to_string(),
                ),
                ("waybar_padding", quoted(&theme.waybar_padding)),
                ("waybar_margin", quoted(&theme.waybar_margin)),
            ],
        },
    ]
}

/// Render theme.toml text holding `theme`, starting from `existing`.
///
/// Empty input produces a complete default document.
pub fn render_store(existing: &str, theme: &ResolvedTheme) -> String {
    let sections = managed_sections(theme);
    if existing.trim().is_empty() {
        return render_template(&sections);
    }

    let newline = if existing.contains("\r\n") { "\r\n" } else { "\n" };

    let mut out: Vec<String> = Vec::new();
    let mut seen = vec![false; sections.len()];
    let mut written: Vec<Vec<bool>> = sections
        .iter()
        .map(|s| vec![false; s.entries.len()])
        .collect();
    let mut current: Option<usize> = None;
    // Index in `out` of the last non-blank line of the current section
    let mut last_content = 0;
    // Lines before the first header belong to the root table
    let mut in_root = true;
    // Index in `out` of the last root-level dotted key of each section
    let mut dotted: Vec<Option<usize>> = vec![None; sections.len()];

    for raw in existing.split_inclusive('\n') {
        let (content, terminator) = split_terminator(raw);

        if let Some(name) = section_header(content) {
            if let Some(idx) = current {
                insert_missing(&mut out, last_content, &sections[idx], &written[idx], newline);
            }
            in_root = false;
            current = sections.iter().position(|s| s.name == name);
            if let Some(idx) = current {
                seen[idx] = true;
            }
            out.push(raw.to_string());
            last_content = out.len() - 1;
            continue;
        }

        if let Some(idx) = current {
            let managed = locate_value(content).and_then(|(key, range)| {
                sections[idx]
                    .entries
                    .iter()
                    .position(|(k, _)| *k == key)
                    .map(|pos| (pos, range))
            });

            if let Some((pos, range)) = managed {
                written[idx][pos] = true;
                let value = &sections[idx].entries[pos].1;
                out.push(format!(
                    "{}{}{}{}",
                    &content[..range.start],
                    value,
                    &content[range.end..],
                    terminator
                ));
                last_content = out.len() - 1;
                continue;
            }

            if !content.trim().is_empty() {
                last_content = out.len();
            }
        }

        if in_root {
            if let Some((idx, pos, range)) = locate_dotted(content, &sections) {
                seen[idx] = true;
                written[idx][pos] = true;
                let value = &sections[idx].entries[pos].1;
                out.push(format!(
                    "{}{}{}{}",
                    &content[..range.start],
                    value,
                    &content[range.end..],
                    terminator
                ));
                dotted[idx] = Some(out.len() - 1);
                continue;
            }
        }

        out.push(raw.to_string());
    }

    if let Some(idx) = current {
        insert_missing(&mut out, last_content, &sections[idx], &written[idx], newline);
    }

    // Root lines precede every header, so these indices are still valid.
    // Splice from the bottom up to keep the earlier ones valid as well.
    let mut dotted_sections: Vec<(usize, usize)> = dotted
        .iter()
        .enumerate()
        .filter_map(|(idx, at)| at.map(|at| (at, idx)))
        .collect();
    dotted_sections.sort_unstable_by(|a, b| b.cmp(a));
    for (at, idx) in dotted_sections {
        let section = &sections[idx];
        let missing: Vec<String> = section
            .entries
            .iter()
            .zip(&written[idx])
            .filter(|(_, done)| !**done)
            .map(|((key, value), _)| format!("{}.{key} = {value}{newline}", section.name))
            .collect();
        if missing.is_empty() {
            continue;
        }
        if !out[at].ends_with('\n') {
            out[at].push_str(newline);
        }
        out.splice(at + 1..at + 1, missing);
    }

    let mut rendered = out.concat();
    for (section, _) in sections.iter().zip(&seen).filter(|(_, seen)| !**seen) {
        if !rendered.ends_with('\n') {
            rendered.push_str(newline);
        }
        if !rendered.ends_with(&format!("{newline}{newline}")) {
            rendered.push_str(newline);
        }
        rendered.push_str(&format!("[{}]{}", section.name, newline));
        for (key, value) in &section.entries {
            rendered.push_str(&format!("{key} = {value}{newline}"));
        }
    }
    rendered
}

fn render_template(sections: &[Section]) -> String {
    let mut output = String::from(HEADER);
    for section in sections {
        output.push('\n');
        output.push_str(&format!("[{}]\n", section.name));
        for (key, value) in &section.entries {
            output.push_str(&format!("{key} = {value}\n"));
        }
    }
    output
}

fn insert_missing(
    out: &mut Vec<String>,
    after: usize,
    section: &Section,
    written: &[bool],
    newline: &str,
) {
    let missing: Vec<String> = section
        .entries
        .iter()
        .zip(written)
        .filter(|(_, done)| !**done)
        .map(|((key, value), _)| format!("{key} = {value}{newline}"))
        .collect();
    if missing.is_empty() {
        return;
    }

    // last line of the file may lack a terminator
    if !out[after].ends_with('\n') {
        out[after].push_str(newline);
    }
    let at = after + 1;
    out.splice(at..at, missing);
}

/// Table name of a `[table]` header line. Array-of-tables headers yield an
/// empty name so they close the current section without matching one.
fn section_header(content: &str) -> Option<&str> {
    let trimmed = content.trim();
    if !trimmed.starts_with('[') {
        return None;
    }
    if trimmed.starts_with("[[") {
        return Some("");
    }
    let end = trimmed.find(']')?;
    Some(trimmed[1..end].trim().trim_matches('"'))
}

/// Key and byte range of the value on a `key = value  # comment` line
fn locate_value(content: &str) -> Option<(&str, Range<usize>)> {
    let indent = content.len() - content.trim_start().len();
    let body = &content[indent..];
    if body.is_empty() || body.starts_with('#') {
        return None;
    }

    let eq = body.find('=')?;
    let key = body[..eq].trim().trim_matches('"');
    if key.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }

    let after_eq = &body[eq + 1..];
    let lead = after_eq.len() - after_eq.trim_start().len();
    let value_start = indent + eq + 1 + lead;
    let value_text = &content[value_start..];

    // basic ("..") and literal ('..') strings both end at their own quote
    let quote = value_text.chars().next().filter(|c| *c == '"' || *c == '\'');
    let value_len = match quote {
        Some(q) => value_text[1..]
            .find(q)
            .map(|i| i + 2)
            .unwrap_or(value_text.len()),
        None => {
            let end = value_text.find('#').unwrap_or(value_text.len());
            value_text[..end].trim_end().len()
        }
    };

    Some((key, value_start..value_start + value_len))
}

/// Managed section, entry index and value range of a root-level
/// `section.key = value` line
fn locate_dotted(content: &str, sections: &[Section]) -> Option<(usize, usize, Range<usize>)> {
    let (key, range) = locate_value(content)?;
    let (table, field) = key.split_once('.')?;
    let idx = sections.iter().position(|s| s.name == table)?;
    let pos = sections[idx].entries.iter().position(|(k, _)| *k == field)?;
    Some((idx, pos, range))
}
