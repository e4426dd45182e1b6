use tracing::debug;

use crate::core::{Cell, ColorSpec, FigureSize, PlotConfig, Table, resolve_colors};
use crate::error::PlotResult;
use crate::plotters::{
    Plotter, PlotterKind, PlotterState, YAxisSpec, apply_plot_config, line_mark, y_axis_spec,
    zip_entries,
};
use crate::render::{LegendEntry, LegendPlacement, LegendStyle, Surface};

/// Line chart: the first column is x, every other column one marked line.
#[derive(Debug, Default)]
pub struct LinePlotter {
    config: PlotConfig,
    state: PlotterState,
}

impl LinePlotter {
    #[must_use]
    pub fn new(config: PlotConfig) -> Self {
        Self {
            config,
            state: PlotterState::default(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &PlotConfig {
        &self.config
    }
}

/// X values from the first column, or row positions when it holds text.
fn x_values(table: &Table) -> Vec<f64> {
    let numeric = table
        .rows()
        .iter()
        .all(|cells| matches!(cells.first(), Some(Cell::Number(_) | Cell::Missing)));
    if numeric {
        table.numeric_column(0)
    } else {
        (0..table.row_count()).map(|row| row as f64).collect()
    }
}

impl Plotter for LinePlotter {
    fn kind(&self) -> PlotterKind {
        PlotterKind::Line
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
        self.state.handles.clear();
        let Some(table) = self.state.table.as_ref() else {
            return Ok(());
        };

        let xs = x_values(table);
        let series = table.series_count();
        let colors = resolve_colors(&self.config.colors, series);
        let mut view = surface.view(self.state.axis);
        let handles = colors
            .iter()
            .enumerate()
            .map(|(index, color)| {
                view.plot(line_mark(
                    xs.clone(),
                    table.numeric_column(index + 1),
                    color,
                    index,
                ))
            })
            .collect();
        self.state.handles = handles;
        debug!(series, points = xs.len(), "drew line series");
        Ok(())
    }

    fn setup_axes(&mut self, surface: &mut Surface) -> PlotResult<()> {
        apply_plot_config(&mut surface.view(self.state.axis), &self.config);
        Ok(())
    }

    fn legend_entries(&self) -> Vec<LegendEntry> {
        zip_entries(&self.state.handles, &self.config.legend)
    }

    /// Single-column legend pinned inside the figure at `legend_loc`.
    fn legend_style(&self) -> LegendStyle {
        LegendStyle {
            location: self.config.legend_loc,
            placement: LegendPlacement::Figure {
                anchor: self.config.legend_loc.inner_anchor(),
            },
            ncol: Some(1),
            font_size: self.config.font.legend,
            frame: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LinePlotter, x_values};
    use crate::core::{Cell, PlotConfig, Table};
    use crate::plotters::Plotter;
    use crate::render::{AxisId, MarkerShape};

    #[test]
    fn numeric_first_column_is_x() {
        let table = Table::from_rows(
            ["size", "a", "b"],
            vec![
                vec![Cell::Number(8.0), Cell::Number(1.0), Cell::Number(2.0)],
                vec![Cell::Number(16.0), Cell::Number(3.0), Cell::Missing],
            ],
        );
        assert_eq!(x_values(&table), vec![8.0, 16.0]);

        let mut plotter = LinePlotter::new(PlotConfig::default());
        plotter.load_table(table);
        let surface = plotter.plot(false).expect("plot");
        let lines: Vec<_> = surface.lines_on(AxisId::Primary).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].marker, Some(MarkerShape::Square));
        assert!(lines[1].ys[1].is_nan());
    }

    #[test]
    fn text_first_column_falls_back_to_positions() {
        let table = Table::from_labeled_rows(&["label", "a"], &[("W1", &[1.0]), ("W2", &[2.0])]);
        assert_eq!(x_values(&table), vec![0.0, 1.0]);
    }
}
