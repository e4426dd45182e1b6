use tracing::{debug, warn};

use crate::core::kde::{DEFAULT_CUT, DEFAULT_GRID_SIZE, finite_samples};
use crate::core::{ColorSpec, FigureSize, KdeConfig, Table, TickFormat, estimate_density, resolve_colors};
use crate::error::PlotResult;
use crate::plotters::{Plotter, PlotterKind, PlotterState, YAxisSpec, zip_entries};
use crate::render::{
    AreaMark, Handle, LegendEntry, LegendPlacement, LegendStyle, Spine, Surface,
};

/// One sample set with its legend label; missing values are already removed.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    pub values: Vec<f64>,
    pub label: String,
}

impl Distribution {
    #[must_use]
    pub fn new(values: &[f64], label: impl Into<String>) -> Self {
        Self {
            values: finite_samples(values),
            label: label.into(),
        }
    }
}

/// Kernel density plot with one smoothed curve per distribution.
#[derive(Debug, Default)]
pub struct KdePlotter {
    config: KdeConfig,
    state: PlotterState,
    distributions: Vec<Distribution>,
    drawn: Vec<(Handle, String)>,
}

impl KdePlotter {
    #[must_use]
    pub fn new(config: KdeConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn config(&self) -> &KdeConfig {
        &self.config
    }

    #[must_use]
    pub fn distributions(&self) -> &[Distribution] {
        &self.distributions
    }

    /// Adds one distribution, dropping missing values.
    pub fn add(&mut self, values: &[f64], label: impl Into<String>) -> &mut Self {
        self.distributions.push(Distribution::new(values, label));
        self
    }

    /// Adds one distribution per array; unlabeled arrays become `Series N`.
    pub fn load_arrays(&mut self, arrays: &[Vec<f64>], labels: &[String]) -> &mut Self {
        for (index, values) in arrays.iter().enumerate() {
            let label = labels
                .get(index)
                .cloned()
                .unwrap_or_else(|| format!("Series {}", index + 1));
            self.add(values, label);
        }
        self
    }
}

impl Plotter for KdePlotter {
    fn kind(&self) -> PlotterKind {
        PlotterKind::Density
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
        YAxisSpec {
            label: self.config.ylabel.clone(),
            label_font: self.config.font.label,
            lower: 0.0,
            upper: None,
            tick_font: self.config.font.tick,
        }
    }

    /// Replaces the distributions with one per column, labeled by header.
    fn load_table(&mut self, table: Table) {
        self.distributions.clear();
        self.drawn.clear();
        for (column, header) in table.headers().iter().enumerate() {
            self.add(&table.numeric_column(column), header.clone());
        }
        self.state.handles.clear();
    }

    fn draw(&mut self, surface: &mut Surface) -> PlotResult<()> {
        self.drawn.clear();
        let colors = resolve_colors(&self.config.colors, self.distributions.len());
        let mut view = surface.view(self.state.axis);
        for (distribution, color) in self.distributions.iter().zip(&colors) {
            let curve = estimate_density(&distribution.values, DEFAULT_GRID_SIZE, DEFAULT_CUT);
            if curve.is_empty() {
                warn!(
                    label = %distribution.label,
                    samples = distribution.values.len(),
                    "distribution has no spread, skipping curve"
                );
                continue;
            }
            let handle = view.fill_curve(AreaMark {
                xs: curve.xs,
                ys: curve.densities,
                color: color.clone(),
                fill: self.config.fill,
                alpha: self.config.alpha,
            });
            self.drawn.push((handle, distribution.label.clone()));
        }
        self.state.handles = self.drawn.iter().map(|(handle, _)| *handle).collect();
        debug!(
            distributions = self.distributions.len(),
            curves = self.drawn.len(),
            "drew density curves"
        );
        Ok(())
    }

    fn setup_axes(&mut self, surface: &mut Surface) -> PlotResult<()> {
        let mut view = surface.view(self.state.axis);
        view.set_xlabel(self.config.xlabel.clone(), self.config.font.label);
        view.set_ylabel(self.config.ylabel.clone(), self.config.font.label);
        if self.config.use_percentage {
            view.set_y_format(TickFormat::Percent);
        }
        if let Some(xlim) = self.config.xlim {
            view.set_xlim(xlim);
        }
        view.set_tick_font(self.config.font.tick);
        view.hide_spines(&[Spine::Top, Spine::Right]);
        view.set_spine_width(1.5);
        Ok(())
    }

    /// Labeled curves only; a configured legend relabels drawn curves in order.
    fn legend_entries(&self) -> Vec<LegendEntry> {
        if !self.config.legend.is_empty() {
            return zip_entries(&self.state.handles, &self.config.legend);
        }
        self.drawn
            .iter()
            .filter(|(_, label)| !label.is_empty())
            .map(|(handle, label)| LegendEntry::new(*handle, label.clone()))
            .collect()
    }

    fn legend_style(&self) -> LegendStyle {
        LegendStyle {
            location: self.config.legend_loc,
            placement: LegendPlacement::Axes,
            ncol: Some(1),
            font_size: self.config.font.legend,
            frame: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::KdePlotter;
    use crate::core::{KdeConfig, Table};
    use crate::plotters::Plotter;

    #[test]
    fn all_missing_distribution_draws_nothing() {
        let mut plotter = KdePlotter::new(KdeConfig::default());
        plotter.add(&[f64::NAN, f64::NAN, f64::NAN], "empty");
        let surface = plotter.plot(false).expect("plot");

        assert_eq!(plotter.distributions()[0].values.len(), 0);
        assert_eq!(surface.snapshot().areas, 0);
        assert!(plotter.legend_entries().is_empty());
        assert!(surface.legend().is_none());
    }

    #[test]
    fn table_columns_become_distributions() {
        let csv = "A,B\n1,10\n2,\n3,12\n4,15\n";
        let table = Table::from_reader(csv.as_bytes()).expect("table");
        let mut plotter = KdePlotter::new(KdeConfig::default());
        plotter.load_table(table);

        assert_eq!(plotter.distributions().len(), 2);
        assert_eq!(plotter.distributions()[1].values, vec![10.0, 12.0, 15.0]);
        assert!(plotter.table().is_none());
    }

    #[test]
    fn reloading_a_table_replaces_its_distributions() {
        let csv = "A,B\n1,10\n2,11\n3,12\n4,15\n";
        let mut plotter = KdePlotter::new(KdeConfig::default());
        plotter.load_table(Table::from_reader(csv.as_bytes()).expect("table"));
        plotter.load_table(Table::from_reader(csv.as_bytes()).expect("table"));
        let surface = plotter.plot(false).expect("plot");

        assert_eq!(plotter.distributions().len(), 2);
        assert_eq!(surface.snapshot().areas, 2);
        assert_eq!(surface.snapshot().legend_labels, vec!["A", "B"]);
    }

    #[test]
    fn unlabeled_curves_stay_out_of_the_legend() {
        let mut plotter = KdePlotter::new(KdeConfig::default());
        plotter.add(&[1.0, 2.0, 4.0], "").add(&[3.0, 5.0, 6.0], "B");
        plotter.plot(false).expect("plot");

        let labels: Vec<String> = plotter
            .legend_entries()
            .into_iter()
            .map(|entry| entry.label)
            .collect();
        assert_eq!(labels, vec!["B"]);
    }
}
