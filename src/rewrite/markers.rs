// Marker vocabulary
//
// A marker is a literal tag placed in a comment or attribute on the line
// whose value it controls. Each tag maps to one resolved value and the
// textual form that value takes on the line.
//
// Order matters: a line is matched against the table top to bottom and the
// first tag found wins, so longer tags sit above the tags they contain
// ("accent:primary-rgba" above "accent:primary").

use crate::theme::ColorField;

/// What a marked line carries and how it is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// `#rrggbb`
    Hex(ColorField),
    /// `rgba(rrggbbff)`
    Rgba(ColorField),
    /// Bare integer after `=` or `:`
    Rounding,
    /// Boolean literal in the file's own spelling
    Floating,
    /// CSS declaration values that only apply while Waybar floats
    WaybarBorderRadius,
    WaybarPadding,
    WaybarMargin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub tag: &'static str,
    pub slot: Slot,
}

const fn marker(tag: &'static str, slot: Slot) -> Marker {
    Marker { tag, slot }
}

pub const MARKERS: &[Marker] = &[
    // Primary
    marker("accent:primary-bright-rgba", Slot::Rgba(ColorField::PrimaryBright)),
    marker("accent:primary-rgba", Slot::Rgba(ColorField::Primary)),
    marker("accent:primary-bright", Slot::Hex(ColorField::PrimaryBright)),
    marker("accent:primary", Slot::Hex(ColorField::Primary)),
    // Secondary
    marker("accent:secondary-bright-rgba", Slot::Rgba(ColorField::SecondaryBright)),
    marker("accent:secondary-bright", Slot::Hex(ColorField::SecondaryBright)),
    marker("accent:secondary-rgba", Slot::Rgba(ColorField::Secondary)),
    marker("accent:secondary", Slot::Hex(ColorField::Secondary)),
    // UI
    marker("config:waybar_floating:border-radius", Slot::WaybarBorderRadius),
    marker("config:waybar_floating:padding", Slot::WaybarPadding),
    marker("config:waybar_floating:margin", Slot::WaybarMargin),
    marker("config:waybar_floating", Slot::Floating),
    marker("config:rounding", Slot::Rounding),
];

/// Substrings every marker starts with; files without either are skipped
pub const MARKER_PREFIXES: &[&str] = &["accent:", "config:"];

/// First marker found on `line`, in table order
pub fn find_marker(line: &str) -> Option<&'static Marker> {
    MARKERS.iter().find(|m| line.contains(m.tag))
}
