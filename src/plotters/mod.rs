//! Chart renderers and the dual-axis composer.
//!
//! Every chart family implements [`Plotter`]. A plotter never owns the
//! [`Surface`] it draws into: standalone `plot` creates one and returns it,
//! while [`DualAxisPlotter`] owns a single surface and lends it to both of its
//! sub-plotters in turn, primary first.

mod bar;
mod dual_axis;
mod kde;
mod line;
mod stacked;

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::{ColorSpec, FigureSize, PlotConfig, Table, resolve_colors};
use crate::error::{PlotError, PlotResult};
use crate::render::{
    AxesView, AxisId, Handle, Legend, LegendEntry, LegendPlacement, LegendStyle, LineMark,
    MarkerShape, Spine, Surface,
};

pub use bar::BarPlotter;
pub use dual_axis::{Alignment, DualAxisPlotter};
pub use kde::{Distribution, KdePlotter};
pub use line::LinePlotter;
pub use stacked::StackedBarPlotter;

/// User hook run after axis setup, before the legend is added.
pub type CustomizeHook = Box<dyn FnMut(&mut AxesView<'_>) -> PlotResult<()>>;

/// Line width and marker size, in points, of line series.
pub const LINE_WIDTH: f64 = 2.0;
pub const MARKER_SIZE: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlotterKind {
    GroupedBar,
    StackedBar,
    Line,
    Density,
    DualAxis,
}

/// Mutable state shared by every plotter family.
#[derive(Default)]
pub struct PlotterState {
    axis: AxisId,
    table: Option<Table>,
    handles: Vec<Handle>,
    customize: Option<CustomizeHook>,
}

impl fmt::Debug for PlotterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlotterState")
            .field("axis", &self.axis)
            .field("table", &self.table)
            .field("handles", &self.handles)
            .field("customize", &self.customize.is_some())
            .finish()
    }
}

impl PlotterState {
    #[must_use]
    pub fn axis(&self) -> AxisId {
        self.axis
    }

    #[must_use]
    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    #[must_use]
    pub fn handles(&self) -> &[Handle] {
        &self.handles
    }

    pub fn set_handles(&mut self, handles: Vec<Handle>) {
        self.handles = handles;
    }
}

/// Bar-group layout recorded by a bar-family draw pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupGeometry {
    /// X position of the first bar of each group, in row order.
    pub group_starts: Vec<f64>,
    /// Total width of one group.
    pub bar_width: f64,
    /// Bars per group, at least 1.
    pub series_count: usize,
}

impl GroupGeometry {
    #[must_use]
    pub fn single_bar_width(&self) -> f64 {
        self.bar_width / self.series_count.max(1) as f64
    }

    /// Center of each group: `first_bar_x + (series_count - 1) * single_bar_width / 2`.
    #[must_use]
    pub fn centers(&self) -> Vec<f64> {
        let offset = self.series_count.saturating_sub(1) as f64 * self.single_bar_width() / 2.0;
        self.group_starts.iter().map(|start| start + offset).collect()
    }
}

/// Y-axis settings a plotter applies when it sits on the secondary axis.
#[derive(Debug, Clone, PartialEq)]
pub struct YAxisSpec {
    pub label: String,
    pub label_font: f64,
    pub lower: f64,
    pub upper: Option<f64>,
    pub tick_font: f64,
}

/// Capability set shared by every chart family.
///
/// `plot` runs the whole workflow: surface setup, `draw`, `setup_axes`,
/// `customize`, `add_legend` and, when requested, `save`.
pub trait Plotter {
    fn kind(&self) -> PlotterKind;
    fn state(&self) -> &PlotterState;
    fn state_mut(&mut self) -> &mut PlotterState;

    fn figure_size(&self) -> FigureSize;
    fn output(&self) -> &str;
    fn tight_rect(&self) -> (f64, f64, f64, f64);
    fn font_family(&self) -> &str;
    fn color_spec(&self) -> &ColorSpec;
    fn y_axis_spec(&self) -> YAxisSpec;

    /// Draws marks on the bound axis and records one handle per series.
    fn draw(&mut self, surface: &mut Surface) -> PlotResult<()>;
    fn setup_axes(&mut self, surface: &mut Surface) -> PlotResult<()>;
    /// Ordered `(handle, label)` pairs; empty means no legend.
    fn legend_entries(&self) -> Vec<LegendEntry>;
    fn legend_style(&self) -> LegendStyle;

    /// Group layout of the last draw pass, for bar-family plotters with at
    /// least one group.
    fn group_geometry(&self) -> Option<GroupGeometry> {
        None
    }

    /// Replaces the loaded dataset and forgets handles of earlier draws.
    fn load_table(&mut self, table: Table) {
        let state = self.state_mut();
        state.table = Some(table);
        state.handles.clear();
    }

    fn load_csv(&mut self, path: &Path) -> PlotResult<()> {
        let table = Table::from_csv_path(path)?;
        self.load_table(table);
        Ok(())
    }

    fn table(&self) -> Option<&Table> {
        self.state().table.as_ref()
    }

    fn handles(&self) -> &[Handle] {
        &self.state().handles
    }

    fn axis(&self) -> AxisId {
        self.state().axis
    }

    fn bind_axis(&mut self, axis: AxisId) {
        self.state_mut().axis = axis;
    }

    fn set_customize(&mut self, hook: CustomizeHook) {
        self.state_mut().customize = Some(hook);
    }

    #[must_use]
    fn with_customize<F>(mut self, hook: F) -> Self
    where
        Self: Sized,
        F: FnMut(&mut AxesView<'_>) -> PlotResult<()> + 'static,
    {
        self.set_customize(Box::new(hook));
        self
    }

    fn new_surface(&self) -> Surface {
        Surface::new(self.figure_size())
            .with_tight_rect(self.tight_rect())
            .with_font_family(self.font_family())
    }

    fn setup_surface(&mut self, _surface: &mut Surface) {
        self.bind_axis(AxisId::Primary);
    }

    /// Draws every series as a marked line through `xs`, one point per row.
    ///
    /// Rows past `xs.len()` are dropped. Plotters without a table fall back
    /// to their own `draw`.
    fn draw_aligned(&mut self, surface: &mut Surface, xs: &[f64]) -> PlotResult<()> {
        let lines: Vec<LineMark> = match self.table() {
            Some(table) => {
                let rows = table.row_count().min(xs.len());
                let series = table.series_count();
                let colors = resolve_colors(self.color_spec(), series);
                (0..series)
                    .map(|index| {
                        let ys = table.numeric_column(index + 1);
                        line_mark(xs[..rows].to_vec(), ys[..rows].to_vec(), &colors[index], index)
                    })
                    .collect()
            }
            None => return self.draw(surface),
        };

        let mut view = surface.view(self.axis());
        let handles = lines.into_iter().map(|line| view.plot(line)).collect();
        self.state_mut().handles = handles;
        Ok(())
    }

    /// Applies `y_axis_spec` to the bound axis; the lower bound always applies.
    fn setup_secondary_axis(&mut self, surface: &mut Surface) -> PlotResult<()> {
        let spec = self.y_axis_spec();
        let mut view = surface.view(self.axis());
        if !spec.label.is_empty() {
            view.set_ylabel(spec.label, spec.label_font);
        }
        view.set_ylim(spec.lower, spec.upper);
        view.set_tick_font(spec.tick_font);
        Ok(())
    }

    fn customize(&mut self, surface: &mut Surface) -> PlotResult<()> {
        let axis = self.axis();
        match self.state_mut().customize.as_mut() {
            Some(hook) => hook(&mut surface.view(axis)),
            None => Ok(()),
        }
    }

    fn add_legend(&mut self, surface: &mut Surface) -> PlotResult<()> {
        let entries = self.legend_entries();
        if !entries.is_empty() {
            surface.set_legend(Legend::new(entries, self.legend_style()));
        }
        Ok(())
    }

    fn save_to(&self, surface: &Surface, path: &str) -> PlotResult<()> {
        if path.is_empty() {
            return Err(PlotError::MissingOutputPath);
        }
        surface.save(path)?;
        info!(path, "saved figure");
        Ok(())
    }

    fn save(&self, surface: &Surface) -> PlotResult<()> {
        self.save_to(surface, self.output())
    }

    fn plot(&mut self, save: bool) -> PlotResult<Surface> {
        let mut surface = self.new_surface();
        self.setup_surface(&mut surface);
        self.draw(&mut surface)?;
        self.setup_axes(&mut surface)?;
        self.customize(&mut surface)?;
        self.add_legend(&mut surface)?;
        if save && !self.output().is_empty() {
            self.save(&surface)?;
        }
        Ok(surface)
    }
}

pub(crate) fn line_mark(xs: Vec<f64>, ys: Vec<f64>, color: &str, series: usize) -> LineMark {
    LineMark {
        xs,
        ys,
        color: color.to_owned(),
        width: LINE_WIDTH,
        marker: Some(MarkerShape::for_series(series)),
        marker_size: MARKER_SIZE,
    }
}

/// Axis setup common to the table-driven chart families.
pub(crate) fn apply_plot_config(view: &mut AxesView<'_>, config: &PlotConfig) {
    if !config.xlabel.is_empty() {
        view.set_xlabel(config.xlabel.clone(), config.font.label);
    }
    if !config.ylabel.is_empty() {
        view.set_ylabel(config.ylabel.clone(), config.font.label);
    }
    if let Some(upper) = config.ylim {
        view.set_ylim(config.ylim_min, Some(upper));
    }
    if let Some(xlim) = config.xlim {
        view.set_xlim(xlim);
    }
    if config.log_scale {
        view.set_log_scale(true);
    }
    if let Some(ticks) = config.y_ticks() {
        view.set_yticks(ticks);
    }
    view.set_tick_font(config.font.tick);
    view.set_y_grid(true);
}

/// Bar-family axes: no x ticks, no top or right spine.
pub(crate) fn hide_category_axis(view: &mut AxesView<'_>) {
    view.hide_xticks();
    view.hide_spines(&[Spine::Top, Spine::Right]);
}

pub(crate) fn y_axis_spec(config: &PlotConfig) -> YAxisSpec {
    YAxisSpec {
        label: config.ylabel.clone(),
        label_font: config.font.label,
        lower: config.ylim_min,
        upper: config.ylim,
        tick_font: config.font.tick,
    }
}

/// Figure-anchored legend without a frame.
pub(crate) fn figure_legend_style(config: &PlotConfig) -> LegendStyle {
    LegendStyle {
        location: config.legend_loc,
        placement: LegendPlacement::Figure {
            anchor: config.legend_anchor,
        },
        ncol: config.legend_ncol,
        font_size: config.font.legend,
        frame: false,
    }
}

/// Pairs handles with labels, truncating to the shorter list.
pub(crate) fn zip_entries(handles: &[Handle], labels: &[String]) -> Vec<LegendEntry> {
    handles
        .iter()
        .zip(labels)
        .map(|(handle, label)| LegendEntry::new(*handle, label.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::GroupGeometry;

    #[test]
    fn group_centers_offset_by_half_the_inner_bars() {
        let geometry = GroupGeometry {
            group_starts: vec![0.0, 2.0],
            bar_width: 1.3,
            series_count: 3,
        };
        let centers = geometry.centers();
        assert!((centers[0] - 1.3 / 3.0).abs() < 1e-12);
        assert!((centers[1] - (2.0 + 1.3 / 3.0)).abs() < 1e-12);
    }

    #[test]
    fn single_series_groups_center_on_their_start() {
        let geometry = GroupGeometry {
            group_starts: vec![0.0, 1.0, 2.0],
            bar_width: 0.6,
            series_count: 1,
        };
        assert_eq!(geometry.centers(), vec![0.0, 1.0, 2.0]);
    }
}
