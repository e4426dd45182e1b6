use serde::{Deserialize, Serialize};
use tracing::debug;

/// 6-color pastel palette for general use.
pub const PRIMARY: &[&str] = &[
    "#fbb4ae", "#b3e2cd", "#fdcdac", "#cbd5e8", "#bdbdbd", "#e5d8bd",
];

/// Primary palette followed by 5 softer tones for more categories.
pub const EXTENDED: &[&str] = &[
    "#fbb4ae", "#b3e2cd", "#fdcdac", "#cbd5e8", "#bdbdbd", "#e5d8bd", "#a6cee3", "#ffb3c6",
    "#b2df8a", "#ffe6a7", "#cab2d6",
];

/// Blue gradient for sequential data such as ablations.
pub const GRADIENT: &[&str] = &[
    "#b3e2cd", "#efedf8", "#e3e5f6", "#d7ddef", "#cbd5e8", "#bdbdbd",
];

/// 3-color palette for breakdowns.
pub const BREAKDOWN: &[&str] = &["#fbb4ae", "#b3e2cd", "#fdcdac"];

/// High-contrast colors for line charts.
pub const LINES: &[&str] = &[
    "#000000", "#007700", "#666666", "#0077bb", "#cc3311", "#ee7733",
];

/// Named, fixed palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    Primary,
    Extended,
    Gradient,
    Breakdown,
    Lines,
}

impl Palette {
    /// Looks a palette up by name, ignoring ASCII case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "primary" => Some(Self::Primary),
            "extended" => Some(Self::Extended),
            "gradient" => Some(Self::Gradient),
            "breakdown" => Some(Self::Breakdown),
            "lines" => Some(Self::Lines),
            _ => None,
        }
    }

    #[must_use]
    pub fn colors(self) -> &'static [&'static str] {
        match self {
            Self::Primary => PRIMARY,
            Self::Extended => EXTENDED,
            Self::Gradient => GRADIENT,
            Self::Breakdown => BREAKDOWN,
            Self::Lines => LINES,
        }
    }
}

/// Color specification accepted by every plotter: a palette name or an
/// explicit ordered list of color values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    Named(String),
    List(Vec<String>),
}

impl Default for ColorSpec {
    fn default() -> Self {
        Self::Named("primary".to_owned())
    }
}

impl From<&str> for ColorSpec {
    fn from(value: &str) -> Self {
        Self::Named(value.to_owned())
    }
}

impl From<Palette> for ColorSpec {
    fn from(value: Palette) -> Self {
        let name = match value {
            Palette::Primary => "primary",
            Palette::Extended => "extended",
            Palette::Gradient => "gradient",
            Palette::Breakdown => "breakdown",
            Palette::Lines => "lines",
        };
        Self::Named(name.to_owned())
    }
}

impl From<Vec<String>> for ColorSpec {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<&[&str]> for ColorSpec {
    fn from(value: &[&str]) -> Self {
        Self::List(value.iter().map(|color| (*color).to_owned()).collect())
    }
}

/// Returns `n` colors from the named palette, cycling from the start when `n`
/// exceeds the palette length. Unknown names fall back to the primary palette.
#[must_use]
pub fn get_colors(n: usize, scheme: &str) -> Vec<String> {
    let palette = Palette::from_name(scheme).unwrap_or_else(|| {
        debug!(scheme, "unknown palette name, using primary");
        Palette::Primary
    });
    cycle(palette.colors(), n)
}

/// Resolves a color specification into exactly `n` color values.
///
/// Never fails: unknown palette names and empty explicit lists resolve through
/// the primary palette.
#[must_use]
pub fn resolve_colors(spec: &ColorSpec, n: usize) -> Vec<String> {
    match spec {
        ColorSpec::Named(name) => get_colors(n, name),
        ColorSpec::List(list) if list.is_empty() => get_colors(n, "primary"),
        ColorSpec::List(list) => cycle(list, n),
    }
}

fn cycle<S: AsRef<str>>(values: &[S], n: usize) -> Vec<String> {
    (0..n)
        .map(|i| values[i % values.len()].as_ref().to_owned())
        .collect()
}
