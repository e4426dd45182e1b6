use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::colors::ColorSpec;
use crate::core::scale::{linspace, logspace};
use crate::core::types::Viewport;
use crate::error::{PlotError, PlotResult};

/// Pixels per inch used when turning a figure size into a viewport.
pub const PIXELS_PER_INCH: f64 = 100.0;

/// Figure dimensions in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FigureSize {
    pub width: f64,
    pub height: f64,
}

impl FigureSize {
    /// Full column width.
    pub const FULL_WIDTH: Self = Self::new(14.0, 4.5);
    /// Half column width.
    pub const HALF_WIDTH: Self = Self::new(7.0, 4.5);
    pub const DOUBLE_WIDE: Self = Self::new(28.0, 4.5);
    pub const TALL: Self = Self::new(14.0, 6.0);
    pub const SQUARE: Self = Self::new(8.0, 8.0);

    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Full width with a custom height.
    #[must_use]
    pub const fn full(height: f64) -> Self {
        Self::new(14.0, height)
    }

    /// Double width with a custom height.
    #[must_use]
    pub const fn double(height: f64) -> Self {
        Self::new(28.0, height)
    }

    #[must_use]
    pub fn viewport(self) -> Viewport {
        let to_px = |inches: f64| {
            if inches.is_finite() && inches > 0.0 {
                (inches * PIXELS_PER_INCH).round() as u32
            } else {
                0
            }
        };
        Viewport::new(to_px(self.width), to_px(self.height))
    }
}

impl Default for FigureSize {
    fn default() -> Self {
        Self::FULL_WIDTH
    }
}

/// Font sizes in points plus the font family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub label: f64,
    pub tick: f64,
    pub legend: f64,
    pub title: f64,
    pub annotation: f64,
    pub family: String,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            label: 32.0,
            tick: 21.0,
            legend: 32.0,
            title: 32.0,
            annotation: 26.0,
            family: "Times New Roman".to_owned(),
        }
    }
}

/// Legend placement anchor, named after the point of the legend box that is
/// pinned to `legend_anchor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegendLocation {
    #[serde(rename = "upper left")]
    UpperLeft,
    #[serde(rename = "upper center")]
    UpperCenter,
    #[serde(rename = "upper right")]
    UpperRight,
    #[serde(rename = "center left")]
    CenterLeft,
    #[serde(rename = "center")]
    Center,
    #[serde(rename = "center right")]
    CenterRight,
    #[serde(rename = "lower left")]
    LowerLeft,
    #[serde(rename = "lower center")]
    LowerCenter,
    #[serde(rename = "lower right")]
    LowerRight,
}

impl LegendLocation {
    /// Fraction of the legend box (horizontal, vertical from the top) that
    /// sits on the anchor point.
    #[must_use]
    pub fn box_fraction(self) -> (f64, f64) {
        match self {
            Self::UpperLeft => (0.0, 0.0),
            Self::UpperCenter => (0.5, 0.0),
            Self::UpperRight => (1.0, 0.0),
            Self::CenterLeft => (0.0, 0.5),
            Self::Center => (0.5, 0.5),
            Self::CenterRight => (1.0, 0.5),
            Self::LowerLeft => (0.0, 1.0),
            Self::LowerCenter => (0.5, 1.0),
            Self::LowerRight => (1.0, 1.0),
        }
    }

    /// Default anchor in axes-fraction coordinates (y grows upwards) used when
    /// the legend is placed inside the axes.
    #[must_use]
    pub fn inner_anchor(self) -> (f64, f64) {
        match self {
            Self::UpperLeft => (0.02, 0.98),
            Self::UpperCenter => (0.5, 0.98),
            Self::UpperRight => (0.98, 0.98),
            Self::CenterLeft => (0.02, 0.5),
            Self::Center => (0.5, 0.5),
            Self::CenterRight => (0.98, 0.5),
            Self::LowerLeft => (0.02, 0.02),
            Self::LowerCenter => (0.5, 0.02),
            Self::LowerRight => (0.98, 0.02),
        }
    }
}

/// Formatting applied to y-axis tick labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickFormat {
    Fixed { decimals: usize },
    /// Fractions rendered as whole percentages (`0.25` -> `25%`).
    Percent,
}

impl TickFormat {
    #[must_use]
    pub fn format(self, value: f64) -> String {
        match self {
            Self::Fixed { decimals } => format!("{value:.decimals$}"),
            Self::Percent => format!("{}%", (value * 100.0) as i64),
        }
    }
}

impl Default for TickFormat {
    fn default() -> Self {
        Self::Fixed { decimals: 1 }
    }
}

/// Configuration for bar charts and similar plots.
///
/// Build through [`PlotConfig::builder`]. The legend column count defaults to
/// the legend length once, when the config is built; later edits to `legend`
/// leave `legend_ncol` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub output: String,
    pub size: FigureSize,
    pub xlabel: String,
    pub ylabel: String,
    /// Y-axis upper bound.
    pub ylim: Option<f64>,
    pub ylim_min: f64,
    pub xlim: Option<(f64, f64)>,
    pub log_scale: bool,
    /// Number of y ticks, only applied when `ylim` is set.
    pub yticks: Option<usize>,
    pub ytick_format: TickFormat,
    pub legend: Vec<String>,
    pub legend_loc: LegendLocation,
    pub legend_ncol: Option<usize>,
    pub legend_anchor: (f64, f64),
    /// Group labels; when empty the first data column is used.
    pub labels: Vec<String>,
    pub label_rotation: f64,
    pub colors: ColorSpec,
    pub bar_width: f64,
    pub font: FontConfig,
    pub tight_rect: (f64, f64, f64, f64),
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            output: String::new(),
            size: FigureSize::FULL_WIDTH,
            xlabel: String::new(),
            ylabel: String::new(),
            ylim: None,
            ylim_min: 0.0,
            xlim: None,
            log_scale: false,
            yticks: Some(7),
            ytick_format: TickFormat::default(),
            legend: Vec::new(),
            legend_loc: LegendLocation::LowerCenter,
            legend_ncol: None,
            legend_anchor: (0.5, -0.1),
            labels: Vec::new(),
            label_rotation: -15.0,
            colors: ColorSpec::default(),
            bar_width: 1.3,
            font: FontConfig::default(),
            tight_rect: (-0.005, 0.05, 1.005, 1.005),
        }
    }
}

impl PlotConfig {
    #[must_use]
    pub fn builder() -> PlotConfigBuilder {
        PlotConfigBuilder::default()
    }

    /// Parses a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> PlotResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.derive_defaults())
    }

    pub fn from_json_path(path: impl AsRef<Path>) -> PlotResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|err| PlotError::io(path, err))?;
        Self::from_json_str(&json)
    }

    /// Y ticks as `(value, label)` pairs, present only when both `yticks` and
    /// `ylim` are set.
    #[must_use]
    pub fn y_ticks(&self) -> Option<Vec<(f64, String)>> {
        let count = self.yticks?;
        let upper = self.ylim?;
        let values = if self.log_scale {
            logspace(self.ylim_min.max(1e-10), upper, count)
        } else {
            linspace(self.ylim_min, upper, count)
        };
        Some(
            values
                .into_iter()
                .map(|value| (value, self.ytick_format.format(value)))
                .collect(),
        )
    }

    fn derive_defaults(mut self) -> Self {
        if self.legend_ncol.is_none() && !self.legend.is_empty() {
            self.legend_ncol = Some(self.legend.len());
        }
        self
    }
}

/// Builder for [`PlotConfig`]; `build` runs the one-time defaulting step.
#[derive(Debug, Clone, Default)]
pub struct PlotConfigBuilder {
    config: PlotConfig,
}

impl PlotConfigBuilder {
    #[must_use]
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.config.output = output.into();
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: FigureSize) -> Self {
        self.config.size = size;
        self
    }

    #[must_use]
    pub fn with_xlabel(mut self, xlabel: impl Into<String>) -> Self {
        self.config.xlabel = xlabel.into();
        self
    }

    #[must_use]
    pub fn with_ylabel(mut self, ylabel: impl Into<String>) -> Self {
        self.config.ylabel = ylabel.into();
        self
    }

    /// Sets the y-axis upper bound.
    #[must_use]
    pub fn with_ylim(mut self, ylim: Option<f64>) -> Self {
        self.config.ylim = ylim;
        self
    }

    #[must_use]
    pub fn with_ylim_min(mut self, ylim_min: f64) -> Self {
        self.config.ylim_min = ylim_min;
        self
    }

    #[must_use]
    pub fn with_xlim(mut self, xlim: Option<(f64, f64)>) -> Self {
        self.config.xlim = xlim;
        self
    }

    #[must_use]
    pub fn with_log_scale(mut self, log_scale: bool) -> Self {
        self.config.log_scale = log_scale;
        self
    }

    #[must_use]
    pub fn with_yticks(mut self, yticks: Option<usize>) -> Self {
        self.config.yticks = yticks;
        self
    }

    #[must_use]
    pub fn with_ytick_format(mut self, format: TickFormat) -> Self {
        self.config.ytick_format = format;
        self
    }

    #[must_use]
    pub fn with_legend<I, S>(mut self, legend: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.legend = legend.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_legend_loc(mut self, location: LegendLocation) -> Self {
        self.config.legend_loc = location;
        self
    }

    #[must_use]
    pub fn with_legend_ncol(mut self, ncol: usize) -> Self {
        self.config.legend_ncol = Some(ncol);
        self
    }

    #[must_use]
    pub fn with_legend_anchor(mut self, x: f64, y: f64) -> Self {
        self.config.legend_anchor = (x, y);
        self
    }

    #[must_use]
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_label_rotation(mut self, degrees: f64) -> Self {
        self.config.label_rotation = degrees;
        self
    }

    #[must_use]
    pub fn with_colors(mut self, colors: impl Into<ColorSpec>) -> Self {
        self.config.colors = colors.into();
        self
    }

    #[must_use]
    pub fn with_bar_width(mut self, bar_width: f64) -> Self {
        self.config.bar_width = bar_width;
        self
    }

    #[must_use]
    pub fn with_font(mut self, font: FontConfig) -> Self {
        self.config.font = font;
        self
    }

    #[must_use]
    pub fn with_tight_rect(mut self, rect: (f64, f64, f64, f64)) -> Self {
        self.config.tight_rect = rect;
        self
    }

    #[must_use]
    pub fn build(self) -> PlotConfig {
        self.config.derive_defaults()
    }
}

/// Configuration for kernel density plots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdeConfig {
    pub output: String,
    pub size: FigureSize,
    pub xlabel: String,
    pub ylabel: String,
    pub xlim: Option<(f64, f64)>,
    pub fill: bool,
    pub alpha: f64,
    /// Formats the density axis as percentages.
    pub use_percentage: bool,
    /// Overrides the distribution labels in the legend when non-empty.
    pub legend: Vec<String>,
    pub legend_loc: LegendLocation,
    pub colors: ColorSpec,
    pub font: FontConfig,
    pub tight_rect: (f64, f64, f64, f64),
    pub dpi: u32,
}

impl Default for KdeConfig {
    fn default() -> Self {
        Self {
            output: String::new(),
            size: FigureSize::new(12.0, 7.0),
            xlabel: "Value".to_owned(),
            ylabel: "Density".to_owned(),
            xlim: None,
            fill: true,
            alpha: 0.4,
            use_percentage: false,
            legend: Vec::new(),
            legend_loc: LegendLocation::UpperRight,
            colors: ColorSpec::Named("extended".to_owned()),
            font: FontConfig::default(),
            tight_rect: (0.0, 0.0, 1.0, 1.0),
            dpi: 300,
        }
    }
}

impl KdeConfig {
    #[must_use]
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_size(mut self, size: FigureSize) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn with_axis_labels(mut self, xlabel: impl Into<String>, ylabel: impl Into<String>) -> Self {
        self.xlabel = xlabel.into();
        self.ylabel = ylabel.into();
        self
    }

    #[must_use]
    pub fn with_xlim(mut self, xlim: Option<(f64, f64)>) -> Self {
        self.xlim = xlim;
        self
    }

    /// Sets fill and fill opacity of the density curves.
    #[must_use]
    pub fn with_fill(mut self, fill: bool, alpha: f64) -> Self {
        self.fill = fill;
        self.alpha = alpha;
        self
    }

    #[must_use]
    pub fn with_percentage(mut self, use_percentage: bool) -> Self {
        self.use_percentage = use_percentage;
        self
    }

    #[must_use]
    pub fn with_legend_loc(mut self, location: LegendLocation) -> Self {
        self.legend_loc = location;
        self
    }

    #[must_use]
    pub fn with_colors(mut self, colors: impl Into<ColorSpec>) -> Self {
        self.colors = colors.into();
        self
    }

    #[must_use]
    pub fn with_font(mut self, font: FontConfig) -> Self {
        self.font = font;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{FigureSize, LegendLocation, PlotConfig, TickFormat};

    #[test]
    fn default_config_matches_paper_layout() {
        let config = PlotConfig::default();
        assert!(config.output.is_empty());
        assert_eq!(config.size, FigureSize::new(14.0, 4.5));
        assert_eq!(config.ylim_min, 0.0);
        assert_eq!(config.legend_loc, LegendLocation::LowerCenter);
        assert_eq!(config.legend_ncol, None);
    }

    #[test]
    fn explicit_ncol_is_kept() {
        let config = PlotConfig::builder()
            .with_legend(["A", "B", "C"])
            .with_legend_ncol(5)
            .build();
        assert_eq!(config.legend_ncol, Some(5));
    }

    #[test]
    fn tick_formats_render_expected_text() {
        assert_eq!(TickFormat::Fixed { decimals: 1 }.format(2.26), "2.3");
        assert_eq!(TickFormat::Fixed { decimals: 0 }.format(7.0), "7");
        assert_eq!(TickFormat::Percent.format(0.5), "50%");
    }

    #[test]
    fn y_ticks_need_upper_bound() {
        let without_bound = PlotConfig::builder().build();
        assert!(without_bound.y_ticks().is_none());

        let with_bound = PlotConfig::builder().with_ylim(Some(6.0)).build();
        let ticks = with_bound.y_ticks().expect("ticks");
        assert_eq!(ticks.len(), 7);
        assert_eq!(ticks[0].1, "0.0");
        assert_eq!(ticks[6].1, "6.0");
    }

    #[test]
    fn figure_size_maps_to_viewport() {
        let viewport = FigureSize::HALF_WIDTH.viewport();
        assert_eq!((viewport.width, viewport.height), (700, 450));
    }
}
