use tracing::debug;

use crate::core::{Cell, ColorSpec, FigureSize, PlotConfig, resolve_colors};
use crate::error::PlotResult;
use crate::plotters::{
    GroupGeometry, Plotter, PlotterKind, PlotterState, YAxisSpec, apply_plot_config,
    figure_legend_style, hide_category_axis, y_axis_spec, zip_entries,
};
use crate::render::{LegendEntry, LegendStyle, Surface, TextHAlign, TextStyle, TextVAlign};

/// Width of each stacked column.
pub const STACK_WIDTH: f64 = 0.6;

/// Stacked bar chart: one column per row, series stacked in column order.
#[derive(Debug, Default)]
pub struct StackedBarPlotter {
    config: PlotConfig,
    state: PlotterState,
    positions: Vec<f64>,
    baselines: Vec<Vec<f64>>,
}

impl StackedBarPlotter {
    #[must_use]
    pub fn new(config: PlotConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    /// Baseline of every drawn segment, indexed `[series][row]`.
    #[must_use]
    pub fn baselines(&self) -> &[Vec<f64>] {
        &self.baselines
    }
}

impl Plotter for StackedBarPlotter {
    fn kind(&self) -> PlotterKind {
        PlotterKind::StackedBar
    }

    fn state(&self) -> &PlotterState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut PlotterState {
        &mut self.state
    }

    fn figure_size(&self) -> FigureSize {
        self.config.size
    }

    fn output(&self) -> &str {
        &self.config.output
    }

    fn tight_rect(&self) -> (f64, f64, f64, f64) {
        self.config.tight_rect
    }

    fn font_family(&self) -> &str {
        &self.config.font.family
    }

    fn color_spec(&self) -> &ColorSpec {
        &self.config.colors
    }

    fn y_axis_spec(&self) -> YAxisSpec {
        y_axis_spec(&self.config)
    }

    fn draw(&mut self, surface: &mut Surface) -> PlotResult<()> {
        self.positions.clear();
        self.baselines.clear();
        self.state.handles.clear();
        let Some(table) = self.state.table.as_ref() else {
            return Ok(());
        };

        let rows = table.row_count();
        let series = table.series_count();
        let colors = resolve_colors(&self.config.colors, series);
        self.positions = (0..rows).map(|row| row as f64).collect();

        let mut view = surface.view(self.state.axis);
        let mut bottom = vec![0.0; rows];
        let mut handles = Vec::with_capacity(series);
        for (index, color) in colors.iter().enumerate() {
            self.baselines.push(bottom.clone());
            let mut first = None;
            for (row, base) in bottom.iter_mut().enumerate() {
                let value = table
                    .cell(row, index + 1)
                    .and_then(Cell::as_f64)
                    .unwrap_or(0.0);
                let handle = view.bar(self.positions[row], value, STACK_WIDTH, *base, color);
                first.get_or_insert(handle);
                *base += value;
            }
            if let Some(handle) = first {
                handles.push(handle);
            }
        }
        hide_category_axis(&mut view);

        let style = TextStyle::new(self.config.font.annotation)
            .with_rotation(self.config.label_rotation)
            .with_align(TextHAlign::Left, TextVAlign::Top);
        for (x, label) in self.positions.iter().zip(table.labels()) {
            view.text(x - STACK_WIDTH / 2.0, self.config.ylim_min, label, style.clone());
        }

        self.state.handles = handles;
        debug!(rows, series, "drew stacked bars");
        Ok(())
    }

    fn setup_axes(&mut self, surface: &mut Surface) -> PlotResult<()> {
        apply_plot_config(&mut surface.view(self.state.axis), &self.config);
        Ok(())
    }

    fn legend_entries(&self) -> Vec<LegendEntry> {
        zip_entries(&self.state.handles, &self.config.legend)
    }

    fn legend_style(&self) -> LegendStyle {
        figure_legend_style(&self.config)
    }

    /// Each column is a one-bar group centered on its position.
    fn group_geometry(&self) -> Option<GroupGeometry> {
        if self.positions.is_empty() {
            return None;
        }
        Some(GroupGeometry {
            group_starts: self.positions.clone(),
            bar_width: STACK_WIDTH,
            series_count: 1,
        })
    }
}
