use serde::{Deserialize, Serialize};

use crate::error::{PlotError, PlotResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    #[must_use]
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self { alpha, ..self }
    }

    /// Parses any CSS color (`#hex`, `rgb()`, `hsl()`, named colors) plus
    /// the single-letter and `tab:` shorthands used by plotting palettes.
    pub fn parse(value: &str) -> PlotResult<Self> {
        let value = value.trim();
        let css = shorthand(&value.to_ascii_lowercase()).unwrap_or(value);
        let color = csscolorparser::parse(css).map_err(|err| {
            PlotError::InvalidData(format!("unrecognized color `{value}`: {err}"))
        })?;
        Ok(Self::rgba(
            f64::from(color.r),
            f64::from(color.g),
            f64::from(color.b),
            f64::from(color.a),
        ))
    }

    /// `#rrggbb` form, alpha excluded.
    #[must_use]
    pub fn to_hex(self) -> String {
        let byte = |channel: f64| (channel.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            byte(self.red),
            byte(self.green),
            byte(self.blue)
        )
    }

    pub fn validate(self) -> PlotResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(PlotError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// Single-letter and Tableau names, which CSS does not define.
fn shorthand(name: &str) -> Option<&'static str> {
    let hex = match name {
        "k" => "#000000",
        "w" => "#ffffff",
        "r" => "#ff0000",
        "g" => "#008000",
        "b" => "#0000ff",
        "c" => "#00bfbf",
        "m" => "#bf00bf",
        "y" => "#bfbf00",
        "tab:blue" => "#1f77b4",
        "tab:orange" => "#ff7f0e",
        "tab:green" => "#2ca02c",
        "tab:red" => "#d62728",
        "tab:purple" => "#9467bd",
        "tab:brown" => "#8c564b",
        "tab:pink" => "#e377c2",
        "tab:gray" | "tab:grey" => "#7f7f7f",
        "tab:olive" => "#bcbd22",
        "tab:cyan" => "#17becf",
        _ => return None,
    };
    Some(hex)
}

fn ensure_finite(values: &[f64], what: &str) -> PlotResult<()> {
    if values.iter().all(|value| value.is_finite()) {
        Ok(())
    } else {
        Err(PlotError::InvalidData(format!(
            "{what} coordinates must be finite"
        )))
    }
}

/// Draw command for one line segment in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinePrimitive {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke_width: f64,
    pub color: Color,
    pub dashed: bool,
}

impl LinePrimitive {
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64, stroke_width: f64, color: Color) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            stroke_width,
            color,
            dashed: false,
        }
    }

    #[must_use]
    pub const fn dashed(mut self) -> Self {
        self.dashed = true;
        self
    }

    pub fn validate(self) -> PlotResult<()> {
        ensure_finite(&[self.x1, self.y1, self.x2, self.y2], "line")?;
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(PlotError::InvalidData(
                "line stroke width must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// Connected run of points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolylinePrimitive {
    pub points: Vec<(f64, f64)>,
    pub stroke_width: f64,
    pub color: Color,
}

impl PolylinePrimitive {
    pub fn validate(&self) -> PlotResult<()> {
        for (x, y) in &self.points {
            ensure_finite(&[*x, *y], "polyline")?;
        }
        if self.points.len() < 2 {
            return Err(PlotError::InvalidData(
                "polyline needs at least two points".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// Closed filled shape, optionally stroked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonPrimitive {
    pub points: Vec<(f64, f64)>,
    pub fill_color: Option<Color>,
    pub stroke_color: Color,
    pub stroke_width: f64,
}

impl PolygonPrimitive {
    pub fn validate(&self) -> PlotResult<()> {
        for (x, y) in &self.points {
            ensure_finite(&[*x, *y], "polygon")?;
        }
        if let Some(fill) = self.fill_color {
            fill.validate()?;
        }
        self.stroke_color.validate()
    }
}

/// Filled rectangle with an optional border.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectPrimitive {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill_color: Color,
    pub border_width: f64,
    pub border_color: Color,
}

impl RectPrimitive {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64, fill_color: Color) -> Self {
        Self {
            x,
            y,
            width,
            height,
            fill_color,
            border_width: 0.0,
            border_color: fill_color,
        }
    }

    #[must_use]
    pub const fn with_border(mut self, border_width: f64, border_color: Color) -> Self {
        self.border_width = border_width;
        self.border_color = border_color;
        self
    }

    pub fn validate(self) -> PlotResult<()> {
        ensure_finite(&[self.x, self.y, self.width, self.height], "rect")?;
        if self.width < 0.0 || self.height < 0.0 {
            return Err(PlotError::InvalidData(
                "rect size must be >= 0".to_owned(),
            ));
        }
        self.fill_color.validate()?;
        self.border_color.validate()
    }
}

/// Marker glyphs cycled through by line charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerShape {
    Circle,
    Square,
    TriangleUp,
    Diamond,
    TriangleDown,
    TriangleLeft,
    TriangleRight,
    Pentagon,
    Hexagon,
}

impl MarkerShape {
    /// Cycle order used for successive line series.
    pub const CYCLE: [Self; 9] = [
        Self::Circle,
        Self::Square,
        Self::TriangleUp,
        Self::Diamond,
        Self::TriangleDown,
        Self::TriangleLeft,
        Self::TriangleRight,
        Self::Pentagon,
        Self::Hexagon,
    ];

    #[must_use]
    pub fn for_series(index: usize) -> Self {
        Self::CYCLE[index % Self::CYCLE.len()]
    }

    /// Outline of the glyph centered on `(x, y)`; `None` for circles.
    #[must_use]
    pub fn outline(self, x: f64, y: f64, size: f64) -> Option<Vec<(f64, f64)>> {
        let r = size * 0.5;
        let regular = |sides: usize, rotation: f64| {
            (0..sides)
                .map(|k| {
                    let angle = rotation + std::f64::consts::TAU * k as f64 / sides as f64;
                    (x + r * angle.cos(), y + r * angle.sin())
                })
                .collect::<Vec<_>>()
        };
        use std::f64::consts::FRAC_PI_2;
        match self {
            Self::Circle => None,
            Self::Square => Some(vec![
                (x - r, y - r),
                (x + r, y - r),
                (x + r, y + r),
                (x - r, y + r),
            ]),
            Self::Diamond => Some(vec![(x, y - r), (x + r, y), (x, y + r), (x - r, y)]),
            Self::TriangleUp => Some(regular(3, -FRAC_PI_2)),
            Self::TriangleDown => Some(regular(3, FRAC_PI_2)),
            Self::TriangleLeft => Some(regular(3, std::f64::consts::PI)),
            Self::TriangleRight => Some(regular(3, 0.0)),
            Self::Pentagon => Some(regular(5, -FRAC_PI_2)),
            Self::Hexagon => Some(regular(6, -FRAC_PI_2)),
        }
    }
}

/// One marker glyph in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerPrimitive {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub shape: MarkerShape,
    pub color: Color,
}

impl MarkerPrimitive {
    pub fn validate(self) -> PlotResult<()> {
        ensure_finite(&[self.x, self.y, self.size], "marker")?;
        self.color.validate()
    }
}

/// Horizontal text alignment relative to `TextPrimitive::x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextHAlign {
    Left,
    Center,
    Right,
}

/// Vertical text alignment relative to `TextPrimitive::y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextVAlign {
    Top,
    Middle,
    Baseline,
}

/// Draw command for one label in pixel space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPrimitive {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size_px: f64,
    pub color: Color,
    pub h_align: TextHAlign,
    pub v_align: TextVAlign,
    /// Counter-clockwise rotation around `(x, y)`, in degrees.
    pub rotation_deg: f64,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        x: f64,
        y: f64,
        font_size_px: f64,
        color: Color,
        h_align: TextHAlign,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_size_px,
            color,
            h_align,
            v_align: TextVAlign::Baseline,
            rotation_deg: 0.0,
        }
    }

    #[must_use]
    pub fn with_v_align(mut self, v_align: TextVAlign) -> Self {
        self.v_align = v_align;
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation_deg: f64) -> Self {
        self.rotation_deg = rotation_deg;
        self
    }

    pub fn validate(&self) -> PlotResult<()> {
        if self.text.is_empty() {
            return Err(PlotError::InvalidData(
                "text primitive must not be empty".to_owned(),
            ));
        }
        ensure_finite(&[self.x, self.y, self.rotation_deg], "text")?;
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(PlotError::InvalidData(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::{Color, MarkerShape};

    #[test]
    fn hex_colors_round_trip() {
        let color = Color::parse("#fbb4ae").expect("color");
        assert_eq!(color.to_hex(), "#fbb4ae");
        assert_eq!(Color::parse("#fff").expect("short"), Color::WHITE);
        assert!((Color::parse("#00000080").expect("alpha").alpha - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn named_and_shorthand_colors_parse() {
        assert_eq!(Color::parse("orange").expect("css name").to_hex(), "#ffa500");
        assert_eq!(Color::parse("Navy").expect("css name").to_hex(), "#000080");
        assert_eq!(Color::parse("tab:blue").expect("tableau").to_hex(), "#1f77b4");
        assert_eq!(Color::parse("k").expect("letter"), Color::BLACK);
        assert_eq!(Color::parse("rgb(255, 0, 0)").expect("css fn").to_hex(), "#ff0000");
    }

    #[test]
    fn malformed_colors_are_rejected() {
        assert!(Color::parse("#zzzzzz").is_err());
        assert!(Color::parse("#12345").is_err());
        assert!(Color::parse("not-a-color").is_err());
    }

    #[test]
    fn marker_cycle_wraps() {
        assert_eq!(MarkerShape::for_series(0), MarkerShape::Circle);
        assert_eq!(MarkerShape::for_series(9), MarkerShape::Circle);
        assert_eq!(MarkerShape::for_series(3), MarkerShape::Diamond);
    }
}
