pub mod colors;
pub mod config;
pub mod kde;
pub mod scale;
pub mod table;
pub mod types;

pub use colors::{ColorSpec, Palette, get_colors, resolve_colors};
pub use config::{
    FigureSize, FontConfig, KdeConfig, LegendLocation, PlotConfig, PlotConfigBuilder,
    TickFormat,
};
pub use kde::{DensityCurve, estimate_density};
pub use scale::{AxisScale, LinearScale, LogScale, linspace, logspace, nice_ticks};
pub use table::{Cell, Table};
pub use types::{PlotArea, Viewport};
