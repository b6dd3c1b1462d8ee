// Marker scanner and rewriter
//
// Works on raw file text: each line is checked against the marker table and,
// on a match, only the value literal on that line is replaced. Indentation,
// surrounding syntax, trailing comments and line terminators are kept as is.
// A line already holding the desired value counts as unchanged, so a second
// pass over rewritten text is a no-op.

mod markers;

use markers::{find_marker, Slot};

use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::theme::ResolvedTheme;
use crate::util::split_terminator;

static HEX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#[0-9a-fA-F]{6}").expect("static regex"));

static RGBA_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"rgba\([0-9a-fA-F]{8}\)").expect("static regex"));

/// Integer following `=` or `:` (`rounding = 10`, `border-radius: 10px`)
static INT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[=:]\s*(\d+)").expect("static regex"));

/// Boolean following `=` or `:`, optionally quoted (`floating = true`,
/// `"floating": "on"`). Words inside key names never match.
static BOOL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[=:]\s*"?(true|false|yes|no|on|off)\b"#).expect("static regex")
});

/// Value part of a CSS declaration (`padding: 3px 4px;`)
static CSS_VALUE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[A-Za-z-]+\s*:\s*([^;]*?)\s*;").expect("static regex")
});

/// Opening of the Waybar bar block (`window#waybar > box {`)
static WAYBAR_BOX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"window#waybar\s*>\s*box\s*\{").expect("static regex"));

/// Result of rewriting one file's text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    pub changed_lines: usize,
}

/// Rewrite every marked line of `text` with values from `theme`.
pub fn rewrite_text(text: &str, theme: &ResolvedTheme) -> Rewrite {
    if !markers::MARKER_PREFIXES.iter().any(|p| text.contains(p)) {
        return Rewrite {
            text: text.to_string(),
            changed_lines: 0,
        };
    }

    let mut output = String::with_capacity(text.len());
    let mut changed_lines = 0;

    for (index, raw) in text.split_inclusive('\n').enumerate() {
        let (content, terminator) = split_terminator(raw);
        match rewrite_line(content, theme) {
            Some(updated) => {
                tracing::debug!(line = index + 1, "{} -> {}", content.trim(), updated.trim());
                output.push_str(&updated);
                output.push_str(terminator);
                changed_lines += 1;
            }
            None => output.push_str(raw),
        }
    }

    Rewrite {
        text: output,
        changed_lines,
    }
}

/// Rewrite a single line (without terminator). Returns None when the line
/// has no marker, no value literal to replace, or already holds the value.
pub fn rewrite_line(line: &str, theme: &ResolvedTheme) -> Option<String> {
    let marker = find_marker(line)?;

    match marker.slot {
        Slot::Hex(field) => replace_match(&HEX_PATTERN, line, &theme.color(field).to_hex()),
        Slot::Rgba(field) => replace_match(&RGBA_PATTERN, line, &theme.color(field).to_rgba()),
        Slot::Rounding => {
            replace_group(&INT_PATTERN, line, |_| theme.corner_rounding.to_string())
        }
        Slot::Floating => replace_group(&BOOL_PATTERN, line, |caps| {
            boolean_literal(&caps[1], theme.statusbar_floating).to_string()
        }),
        Slot::WaybarBorderRadius => replace_group(&CSS_VALUE_PATTERN, line, |_| {
            floating_value(theme, format!("{}px", theme.waybar_border_radius))
        }),
        Slot::WaybarPadding => replace_group(&CSS_VALUE_PATTERN, line, |_| {
            floating_value(theme, theme.waybar_padding.clone())
        }),
        Slot::WaybarMargin => replace_group(&CSS_VALUE_PATTERN, line, |_| {
            floating_value(theme, theme.waybar_margin.clone())
        }),
    }
}

/// Append each of `required` that is not already a line of `text`.
/// Returns the new text and the number of lines added.
pub fn append_missing_lines(text: &str, required: &[&str]) -> (String, usize) {
    let newline = if text.contains("\r\n") { "\r\n" } else { "\n" };
    let mut output = text.to_string();
    let mut added = 0;

    for line in required {
        let present = output
            .split_inclusive('\n')
            .any(|raw| without_comment(split_terminator(raw).0) == *line);
        if present {
            continue;
        }
        if !output.is_empty() && !output.ends_with('\n') {
            output.push_str(newline);
        }
        output.push_str(line);
        output.push_str(newline);
        added += 1;
    }

    (output, added)
}

/// Make sure a floating Waybar has its marked border-radius, padding and
/// margin declarations. Missing ones go into the `window#waybar > box`
/// block after its background-color, or to the end of the file when there
/// is no such block. Nothing is added while floating is off.
/// Returns the new text and the number of declarations added.
pub fn ensure_floating_declarations(text: &str, theme: &ResolvedTheme) -> (String, usize) {
    if !theme.statusbar_floating {
        return (text.to_string(), 0);
    }

    let declarations = [
        ("border-radius", format!("{}px", theme.waybar_border_radius)),
        ("padding", theme.waybar_padding.clone()),
        ("margin", theme.waybar_margin.clone()),
    ];
    let missing: Vec<String> = declarations
        .iter()
        .filter(|(property, _)| !text.contains(&format!("config:waybar_floating:{property}")))
        .map(|(property, value)| {
            format!("{property}: {value}; /* config:waybar_floating:{property} */")
        })
        .collect();
    if missing.is_empty() {
        return (text.to_string(), 0);
    }

    let Some(at) = box_insert_point(text) else {
        let lines: Vec<&str> = missing.iter().map(String::as_str).collect();
        return append_missing_lines(text, &lines);
    };

    let newline = if text.contains("\r\n") { "\r\n" } else { "\n" };
    let mut block = String::new();
    if !text[..at].ends_with('\n') {
        block.push_str(newline);
    }
    for declaration in &missing {
        block.push_str("    ");
        block.push_str(declaration);
        block.push_str(newline);
    }

    let mut output = String::with_capacity(text.len() + block.len());
    output.push_str(&text[..at]);
    output.push_str(&block);
    output.push_str(&text[at..]);
    (output, missing.len())
}

/// Byte offset inside the `window#waybar > box` block where declarations
/// are inserted: after the background-color line, else at the start of
/// the closing brace's line
fn box_insert_point(text: &str) -> Option<usize> {
    let open = WAYBAR_BOX_PATTERN.find(text)?;
    let close = open.end() + text[open.end()..].find('}')?;

    let mut offset = open.end();
    for raw in text[open.end()..close].split_inclusive('\n') {
        offset += raw.len();
        let content = split_terminator(raw).0.trim_start();
        if content.starts_with("background-color") && raw.ends_with('\n') {
            return Some(offset);
        }
    }

    let line_start = text[..close].rfind('\n').map_or(0, |i| i + 1);
    if line_start > open.end() && text[line_start..close].trim().is_empty() {
        Some(line_start)
    } else {
        Some(close)
    }
}

/// Line content before a trailing `#` comment, trimmed
fn without_comment(line: &str) -> &str {
    line.split('#').next().unwrap_or(line).trim()
}

// Floating off collapses the bar's own box back onto the screen edge
fn floating_value(theme: &ResolvedTheme, value: String) -> String {
    if theme.statusbar_floating {
        value
    } else {
        "0".to_string()
    }
}

/// Same boolean, spelled like the token already in the file
fn boolean_literal(existing: &str, value: bool) -> &'static str {
    match (existing, value) {
        ("yes" | "no", true) => "yes",
        ("yes" | "no", false) => "no",
        ("on" | "off", true) => "on",
        ("on" | "off", false) => "off",
        (_, true) => "true",
        (_, false) => "false",
    }
}

/// Replace the first whole match of `pattern`
fn replace_match(pattern: &Regex, line: &str, replacement: &str) -> Option<String> {
    let found = pattern.find(line)?;
    if found.as_str() == replacement {
        return None;
    }
    Some(format!(
        "{}{}{}",
        &line[..found.start()],
        replacement,
        &line[found.end()..]
    ))
}

/// Replace capture group 1 of the first match of `pattern`
fn replace_group(
    pattern: &Regex,
    line: &str,
    replacement: impl FnOnce(&Captures<'_>) -> String,
) -> Option<String> {
    let caps = pattern.captures(line)?;
    let group = caps.get(1)?;
    let value = replacement(&caps);
    if group.as_str() == value {
        return None;
    }
    Some(format!(
        "{}{}{}",
        &line[..group.start()],
        value,
        &line[group.end()..]
    ))
}
