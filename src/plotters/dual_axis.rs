use std::fmt;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::core::{ColorSpec, FigureSize, PlotConfig, Table};
use crate::error::PlotResult;
use crate::plotters::{
    Plotter, PlotterKind, PlotterState, YAxisSpec, figure_legend_style, zip_entries,
};
use crate::render::{AxisId, Handle, LegendEntry, LegendStyle, Surface};

/// Outcome of aligning the secondary plotter with the primary's groups.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Alignment {
    /// No draw pass has run yet.
    #[default]
    Pending,
    /// Secondary points sit on the primary group centers.
    Aligned {
        centers: Vec<f64>,
        dropped_rows: usize,
    },
    /// The primary recorded no group geometry, or the secondary has no
    /// table to re-position; the secondary drew with its own x values.
    Unaligned,
}

/// Two plotters on one surface: the primary on the left y-axis, the secondary
/// on a right y-axis sharing the x-axis.
///
/// Secondary points are placed at the primary's group centers, one per row in
/// row order. The composer owns the surface for the whole workflow; each
/// sub-plotter only sees it during its own calls. Data belongs on the
/// sub-plotters (`primary_mut`, `secondary_mut`); tables loaded into the
/// composer itself are ignored.
pub struct DualAxisPlotter {
    primary: Box<dyn Plotter>,
    secondary: Box<dyn Plotter>,
    config: Option<PlotConfig>,
    state: PlotterState,
    alignment: Alignment,
}

impl fmt::Debug for DualAxisPlotter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DualAxisPlotter")
            .field("primary", &self.primary.kind())
            .field("secondary", &self.secondary.kind())
            .field("config", &self.config)
            .field("alignment", &self.alignment)
            .finish()
    }
}

impl DualAxisPlotter {
    #[must_use]
    pub fn new(primary: Box<dyn Plotter>, secondary: Box<dyn Plotter>) -> Self {
        Self {
            primary,
            secondary,
            config: None,
            state: PlotterState::default(),
            alignment: Alignment::Pending,
        }
    }

    /// Composition-level config: figure, output and legend settings. Its
    /// legend labels, when present, replace the sub-plotters' labels.
    #[must_use]
    pub fn with_config(mut self, config: PlotConfig) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn primary(&self) -> &dyn Plotter {
        self.primary.as_ref()
    }

    pub fn primary_mut(&mut self) -> &mut dyn Plotter {
        self.primary.as_mut()
    }

    #[must_use]
    pub fn secondary(&self) -> &dyn Plotter {
        self.secondary.as_ref()
    }

    pub fn secondary_mut(&mut self) -> &mut dyn Plotter {
        self.secondary.as_mut()
    }

    #[must_use]
    pub fn alignment(&self) -> &Alignment {
        &self.alignment
    }

    fn all_handles(&self) -> Vec<Handle> {
        self.primary
            .handles()
            .iter()
            .chain(self.secondary.handles())
            .copied()
            .collect()
    }
}

impl Plotter for DualAxisPlotter {
    fn kind(&self) -> PlotterKind {
        PlotterKind::DualAxis
    }

    fn state(&self) -> &PlotterState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut PlotterState {
        &mut self.state
    }

    fn figure_size(&self) -> FigureSize {
        self.config
            .as_ref()
            .map_or_else(|| self.primary.figure_size(), |config| config.size)
    }

    fn output(&self) -> &str {
        match &self.config {
            Some(config) => &config.output,
            None => self.primary.output(),
        }
    }

    fn tight_rect(&self) -> (f64, f64, f64, f64) {
        self.config
            .as_ref()
            .map_or_else(|| self.primary.tight_rect(), |config| config.tight_rect)
    }

    fn font_family(&self) -> &str {
        match &self.config {
            Some(config) => &config.font.family,
            None => self.primary.font_family(),
        }
    }

    fn color_spec(&self) -> &ColorSpec {
        self.primary.color_spec()
    }

    fn y_axis_spec(&self) -> YAxisSpec {
        self.primary.y_axis_spec()
    }

    fn load_table(&mut self, table: Table) {
        warn!(
            rows = table.row_count(),
            "composer ignores its own table, load data into a sub-plotter"
        );
    }

    fn load_csv(&mut self, path: &Path) -> PlotResult<()> {
        warn!(
            path = %path.display(),
            "composer ignores its own data, load it into a sub-plotter"
        );
        Ok(())
    }

    fn setup_surface(&mut self, surface: &mut Surface) {
        self.bind_axis(AxisId::Primary);
        surface.twinx();
        self.primary.bind_axis(AxisId::Primary);
        self.secondary.bind_axis(AxisId::Secondary);
    }

    fn draw(&mut self, surface: &mut Surface) -> PlotResult<()> {
        self.primary.draw(surface)?;

        let geometry = self.primary.group_geometry();
        let secondary_rows = self.secondary.table().map(|table| table.row_count());
        self.alignment = match (geometry, secondary_rows) {
            (Some(geometry), Some(rows)) => {
                let centers = geometry.centers();
                let kept = rows.min(centers.len());
                let dropped_rows = rows - kept;
                if dropped_rows > 0 {
                    warn!(
                        groups = centers.len(),
                        rows, dropped_rows, "secondary has more rows than primary groups"
                    );
                }
                Alignment::Aligned {
                    centers: centers[..kept].to_vec(),
                    dropped_rows,
                }
            }
            _ => Alignment::Unaligned,
        };

        match &self.alignment {
            Alignment::Aligned { centers, .. } => {
                debug!(points = centers.len(), "aligning secondary to group centers");
                self.secondary.draw_aligned(surface, centers)
            }
            _ => {
                info!(
                    primary = ?self.primary.kind(),
                    "primary has no group geometry, secondary draws unaligned"
                );
                self.secondary.draw(surface)
            }
        }
    }

    fn setup_axes(&mut self, surface: &mut Surface) -> PlotResult<()> {
        self.primary.setup_axes(surface)?;
        self.secondary.setup_secondary_axis(surface)
    }

    fn customize(&mut self, surface: &mut Surface) -> PlotResult<()> {
        self.primary.customize(surface)?;
        self.secondary.customize(surface)?;
        let axis = self.axis();
        match self.state.customize.as_mut() {
            Some(hook) => hook(&mut surface.view(axis)),
            None => Ok(()),
        }
    }

    /// Primary entries then secondary entries, unless the composition config
    /// lists its own labels.
    fn legend_entries(&self) -> Vec<LegendEntry> {
        if let Some(config) = self.config.as_ref().filter(|config| !config.legend.is_empty()) {
            return zip_entries(&self.all_handles(), &config.legend);
        }
        let mut entries = self.primary.legend_entries();
        entries.extend(self.secondary.legend_entries());
        entries
    }

    fn legend_style(&self) -> LegendStyle {
        match &self.config {
            Some(config) => figure_legend_style(config),
            None => self.primary.legend_style(),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::{Alignment, DualAxisPlotter};
    use crate::core::{PlotConfig, Table};
    use crate::plotters::{BarPlotter, LinePlotter, Plotter};
    use crate::render::AxisId;

    fn bars(rows: usize) -> BarPlotter {
        let mut plotter = BarPlotter::new(PlotConfig::default());
        let rows: Vec<(String, [f64; 2])> = (0..rows)
            .map(|row| (format!("W{row}"), [row as f64 + 1.0, row as f64 + 2.0]))
            .collect();
        let borrowed: Vec<(&str, &[f64])> = rows
            .iter()
            .map(|(label, values)| (label.as_str(), values.as_slice()))
            .collect();
        plotter.load_table(Table::from_labeled_rows(&["label", "a", "b"], &borrowed));
        plotter
    }

    fn line(rows: usize) -> LinePlotter {
        let mut plotter = LinePlotter::new(PlotConfig::default());
        let data: Vec<(String, [f64; 1])> = (0..rows)
            .map(|row| (format!("r{row}"), [0.1 * row as f64]))
            .collect();
        let borrowed: Vec<(&str, &[f64])> = data
            .iter()
            .map(|(label, values)| (label.as_str(), values.as_slice()))
            .collect();
        plotter.load_table(Table::from_labeled_rows(&["label", "miss"], &borrowed));
        plotter
    }

    #[test]
    fn secondary_rows_beyond_groups_are_dropped() {
        let mut plotter = DualAxisPlotter::new(Box::new(bars(2)), Box::new(line(5)));
        let surface = plotter.plot(false).expect("plot");

        let lines: Vec<_> = surface.lines_on(AxisId::Secondary).collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].xs.len(), 2);
        assert_relative_eq!(lines[0].xs[0], 1.3 / 4.0);
        assert_relative_eq!(lines[0].xs[1], 2.0 + 1.3 / 4.0);
        assert!(matches!(
            plotter.alignment(),
            Alignment::Aligned { dropped_rows: 3, .. }
        ));
    }

    #[test]
    fn composer_level_table_is_ignored() {
        let mut plotter = DualAxisPlotter::new(Box::new(bars(2)), Box::new(line(2)));
        plotter.load_table(Table::from_labeled_rows(&["label", "x"], &[("Z", &[9.0])]));
        let surface = plotter.plot(false).expect("plot");

        assert!(plotter.table().is_none());
        assert_eq!(surface.snapshot().bars, 4);
        assert_eq!(surface.lines_on(AxisId::Secondary).count(), 1);
    }

    #[test]
    fn debug_names_the_sub_plotter_kinds() {
        let plotter = DualAxisPlotter::new(Box::new(bars(2)), Box::new(line(2)));
        let text = format!("{plotter:?}");

        assert!(text.starts_with("DualAxisPlotter"));
        assert!(text.contains("primary: GroupedBar"));
        assert!(text.contains("secondary: Line"));
    }

    #[test]
    fn line_primary_falls_back_to_unaligned() {
        let mut plotter = DualAxisPlotter::new(Box::new(line(3)), Box::new(line(4)));
        let surface = plotter.plot(false).expect("plot");

        assert_eq!(plotter.alignment(), &Alignment::Unaligned);
        let secondary: Vec<_> = surface.lines_on(AxisId::Secondary).collect();
        assert_eq!(secondary[0].xs, vec![0.0, 1.0, 2.0, 3.0]);
    }
}
