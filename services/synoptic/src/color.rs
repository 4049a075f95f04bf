//! Fill color and status codec for diagram components

use std::fmt;

use serde::{Deserialize, Serialize};

/// The rendered status of a diagram component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Active,
    Inactive,
}

impl Status {
    /// The opposite status
    pub fn flipped(self) -> Self {
        match self {
            Status::Active => Status::Inactive,
            Status::Inactive => Status::Active,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Active => write!(f, "active"),
            Status::Inactive => write!(f, "inactive"),
        }
    }
}

/// Two-color palette of a component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub active: String,
    pub inactive: String,
}

impl Palette {
    /// The fill color for a status
    pub fn color_for(&self, status: Status) -> &str {
        match status {
            Status::Active => &self.active,
            Status::Inactive => &self.inactive,
        }
    }
}

/// CSS color names a palette or the rendering surface may use
const NAMED_COLORS: &[(&str, &str)] = &[
    ("black", "#000000"),
    ("blue", "#0000ff"),
    ("cyan", "#00ffff"),
    ("gray", "#808080"),
    ("green", "#008000"),
    ("grey", "#808080"),
    ("lime", "#00ff00"),
    ("magenta", "#ff00ff"),
    ("maroon", "#800000"),
    ("navy", "#000080"),
    ("olive", "#808000"),
    ("orange", "#ffa500"),
    ("purple", "#800080"),
    ("red", "#ff0000"),
    ("silver", "#c0c0c0"),
    ("teal", "#008080"),
    ("white", "#ffffff"),
    ("yellow", "#ffff00"),
];

/// Normalize a color to lowercase `#rrggbb` where the notation is known.
///
/// Handles hex (`#rgb` and `#rrggbb`), the `rgb()`/`rgba()` computed forms
/// and common CSS color names. Unknown notations pass through trimmed and
/// lowercased, to be compared literally; this function never fails.
pub fn normalize_color(raw: &str) -> String {
    let color = raw.trim().to_ascii_lowercase();

    if let Some(hex) = color.strip_prefix('#') {
        if hex.len() == 3 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            let mut expanded = String::with_capacity(7);
            expanded.push('#');
            for c in hex.chars() {
                expanded.push(c);
                expanded.push(c);
            }
            return expanded;
        }
        return color;
    }

    if let Some([r, g, b]) = parse_rgb_function(&color) {
        return format!("#{:02x}{:02x}{:02x}", r, g, b);
    }

    if let Some((_, hex)) = NAMED_COLORS.iter().find(|(name, _)| *name == color) {
        return (*hex).to_string();
    }

    color
}

/// Parse `rgb(r, g, b)` or `rgba(r, g, b, a)` into its color channels.
/// The alpha channel does not affect the fill and is discarded.
fn parse_rgb_function(color: &str) -> Option<[u8; 3]> {
    let args = color
        .strip_prefix("rgba(")
        .or_else(|| color.strip_prefix("rgb("))?
        .strip_suffix(')')?;

    let mut parts = args.split(',').map(str::trim);
    let r = parts.next()?.parse().ok()?;
    let g = parts.next()?.parse().ok()?;
    let b = parts.next()?.parse().ok()?;
    Some([r, g, b])
}

/// Decode a rendered fill color into a status against a component's palette.
///
/// Equality with the palette's active color under canonical form means
/// active; anything else is inactive.
pub fn status_for(rendered: &str, palette: &Palette) -> Status {
    if normalize_color(rendered) == normalize_color(&palette.active) {
        Status::Active
    } else {
        Status::Inactive
    }
}
