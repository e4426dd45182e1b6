use tracing::debug;

use crate::core::{Cell, ColorSpec, FigureSize, PlotConfig, Table, resolve_colors};
use crate::error::PlotResult;
use crate::plotters::{
    GroupGeometry, Plotter, PlotterKind, PlotterState, YAxisSpec, apply_plot_config,
    figure_legend_style, hide_category_axis, y_axis_spec, zip_entries,
};
use crate::render::{LegendEntry, LegendStyle, Surface, TextHAlign, TextStyle, TextVAlign};

/// Grouped bar chart: one group per row, one bar per series column.
///
/// Groups start two units apart; each group spans `bar_width`, split evenly
/// among its series.
#[derive(Debug, Default)]
pub struct BarPlotter {
    config: PlotConfig,
    state: PlotterState,
    group_starts: Vec<f64>,
}

impl BarPlotter {
    #[must_use]
    pub fn new(config: PlotConfig) -> Self {
        Self {
            config,
            state: PlotterState::default(),
            group_starts: Vec::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    /// Bars per group used for geometry; a label-only table still counts one.
    fn bars_per_group(&self) -> usize {
        self.state
            .table
            .as_ref()
            .map_or(1, |table| table.series_count().max(1))
    }

    fn single_bar_width(&self) -> f64 {
        self.config.bar_width / self.bars_per_group() as f64
    }

    fn add_group_labels(&self, surface: &mut Surface) {
        let labels = if self.config.labels.is_empty() {
            self.state
                .table
                .as_ref()
                .map(Table::labels)
                .unwrap_or_default()
        } else {
            self.config.labels.clone()
        };

        let single = self.single_bar_width();
        let style = TextStyle::new(self.config.font.annotation)
            .with_rotation(self.config.label_rotation)
            .with_align(TextHAlign::Left, TextVAlign::Top);
        let mut view = surface.view(self.state.axis);
        for (start, label) in self.group_starts.iter().zip(labels) {
            view.text(start - single / 2.0, self.config.ylim_min, label, style.clone());
        }
    }
}

impl Plotter for BarPlotter {
    fn kind(&self) -> PlotterKind {
        PlotterKind::GroupedBar
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
        self.group_starts.clear();
        self.state.handles.clear();
        let Some(table) = self.state.table.as_ref() else {
            return Ok(());
        };

        let series = table.series_count();
        let colors = resolve_colors(&self.config.colors, series);
        let width = self.config.bar_width / series.max(1) as f64;
        let mut view = surface.view(self.state.axis);
        let mut handles = Vec::with_capacity(series);
        let mut start = 0.0;
        for row in 0..table.row_count() {
            self.group_starts.push(start);
            for (index, color) in colors.iter().enumerate() {
                let value = table
                    .cell(row, index + 1)
                    .and_then(Cell::as_f64)
                    .unwrap_or(0.0);
                let handle = view.bar(start + index as f64 * width, value, width, 0.0, color);
                if row == 0 {
                    handles.push(handle);
                }
            }
            start += 2.0;
        }
        hide_category_axis(&mut view);
        self.state.handles = handles;
        debug!(
            groups = self.group_starts.len(),
            series, "drew grouped bars"
        );

        self.add_group_labels(surface);
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

    fn group_geometry(&self) -> Option<GroupGeometry> {
        if self.group_starts.is_empty() {
            return None;
        }
        Some(GroupGeometry {
            group_starts: self.group_starts.clone(),
            bar_width: self.config.bar_width,
            series_count: self.bars_per_group(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::BarPlotter;
    use crate::core::{PlotConfig, Table};
    use crate::plotters::Plotter;

    fn two_group_table() -> Table {
        Table::from_labeled_rows(
            &["label", "a", "b", "c"],
            &[("W1", &[1.0, 2.0, 3.0]), ("W2", &[1.5, 2.5, 3.5])],
        )
    }

    #[test]
    fn groups_advance_by_two_units() {
        let mut plotter = BarPlotter::new(PlotConfig::default());
        plotter.load_table(two_group_table());
        let surface = plotter.plot(false).expect("plot");

        let geometry = plotter.group_geometry().expect("geometry");
        assert_eq!(geometry.group_starts, vec![0.0, 2.0]);
        assert_eq!(geometry.series_count, 3);
        let xs: Vec<f64> = surface.bars().map(|bar| bar.x).collect();
        let single = 1.3 / 3.0;
        assert!((xs[1] - single).abs() < 1e-12);
        assert!((xs[3] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn labels_anchor_left_of_first_bar() {
        let mut plotter = BarPlotter::new(PlotConfig::builder().with_ylim_min(0.5).build());
        plotter.load_table(two_group_table());
        let surface = plotter.plot(false).expect("plot");

        let texts: Vec<_> = surface.texts().collect();
        assert_eq!(texts.len(), 2);
        assert_eq!(texts[1].text, "W2");
        assert!((texts[1].x - (2.0 - 1.3 / 6.0)).abs() < 1e-12);
        assert_eq!(texts[1].y, 0.5);
        assert_eq!(texts[1].style.rotation, -15.0);
    }

    #[test]
    fn handles_come_from_first_group() {
        let mut plotter = BarPlotter::new(PlotConfig::default());
        plotter.load_table(two_group_table());
        plotter.plot(false).expect("plot");
        let indices: Vec<usize> = plotter.handles().iter().map(|h| h.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn label_only_table_reserves_groups() {
        let empty: &[f64] = &[];
        let table = Table::from_labeled_rows(&["label"], &[("W1", empty), ("W2", empty)]);
        let mut plotter = BarPlotter::new(PlotConfig::default());
        plotter.load_table(table);
        let surface = plotter.plot(false).expect("plot");

        assert_eq!(surface.bars().count(), 0);
        assert_eq!(surface.texts().count(), 2);
        let geometry = plotter.group_geometry().expect("geometry");
        assert_eq!(geometry.centers(), vec![0.0, 2.0]);
    }
}
