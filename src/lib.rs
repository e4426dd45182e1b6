//! paspale: preconfigured figures for academic papers.
//!
//! Tabular data goes in through a plotter (grouped bars, stacked bars, lines,
//! density curves, or two of them sharing an x-axis), and a styled vector
//! figure comes out. Plotters draw onto a backend-agnostic [`render::Surface`];
//! layout turns it into a [`render::RenderFrame`] that the SVG or Cairo
//! backends serialize.

pub mod core;
pub mod error;
pub mod plotters;
pub mod quick;
pub mod render;
pub mod telemetry;

pub use crate::core::{
    Cell, ColorSpec, FigureSize, FontConfig, KdeConfig, LegendLocation, Palette, PlotConfig,
    PlotConfigBuilder, Table, TickFormat, get_colors,
};
pub use error::{PlotError, PlotResult};
pub use plotters::{
    Alignment, BarPlotter, DualAxisPlotter, KdePlotter, LinePlotter, Plotter, StackedBarPlotter,
};
pub use quick::{DataSource, QuickOptions, paspale, paspale_with};
pub use render::{AxesView, Surface};
