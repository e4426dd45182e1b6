//! One-call grouped bar charts.

use std::path::{Path, PathBuf};

use crate::core::{ColorSpec, FigureSize, PlotConfig, PlotConfigBuilder, Table};
use crate::error::PlotResult;
use crate::plotters::{BarPlotter, Plotter};
use crate::render::Surface;

/// Where `paspale` reads its data from.
#[derive(Debug, Clone)]
pub enum DataSource {
    Path(PathBuf),
    Table(Table),
}

impl From<&str> for DataSource {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<&Path> for DataSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for DataSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<Table> for DataSource {
    fn from(table: Table) -> Self {
        Self::Table(table)
    }
}

/// The handful of options the quick entry point exposes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuickOptions {
    pub ylabel: String,
    pub legend: Vec<String>,
    pub ylim: Option<f64>,
    pub colors: ColorSpec,
    pub size: FigureSize,
}

impl QuickOptions {
    #[must_use]
    pub fn with_ylabel(mut self, ylabel: impl Into<String>) -> Self {
        self.ylabel = ylabel.into();
        self
    }

    #[must_use]
    pub fn with_legend<I, S>(mut self, legend: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.legend = legend.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_ylim(mut self, ylim: Option<f64>) -> Self {
        self.ylim = ylim;
        self
    }

    #[must_use]
    pub fn with_colors(mut self, colors: impl Into<ColorSpec>) -> Self {
        self.colors = colors.into();
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: FigureSize) -> Self {
        self.size = size;
        self
    }

    fn into_builder(self, output: &str) -> PlotConfigBuilder {
        PlotConfig::builder()
            .with_output(output)
            .with_ylabel(self.ylabel)
            .with_legend(self.legend)
            .with_ylim(self.ylim)
            .with_colors(self.colors)
            .with_size(self.size)
    }
}

/// Draws a grouped bar chart and saves it to `output`.
///
/// ```no_run
/// use paspale::{QuickOptions, paspale};
///
/// paspale(
///     "results.csv",
///     "comparison.svg",
///     QuickOptions::default()
///         .with_ylabel("Speedup")
///         .with_legend(["Baseline", "Optimized", "Ours"])
///         .with_ylim(Some(6.0)),
/// )?;
/// # Ok::<(), paspale::PlotError>(())
/// ```
pub fn paspale(
    data: impl Into<DataSource>,
    output: &str,
    options: QuickOptions,
) -> PlotResult<Surface> {
    paspale_with(data, options.into_builder(output))
}

/// Like [`paspale`], with every `PlotConfig` option available.
pub fn paspale_with(data: impl Into<DataSource>, config: PlotConfigBuilder) -> PlotResult<Surface> {
    let mut plotter = BarPlotter::new(config.build());
    match data.into() {
        DataSource::Path(path) => plotter.load_csv(&path)?,
        DataSource::Table(table) => plotter.load_table(table),
    }
    plotter.plot(true)
}

#[cfg(test)]
mod tests {
    use super::{QuickOptions, paspale};
    use crate::core::{FigureSize, Table};

    #[test]
    fn in_memory_table_without_output_is_not_saved() {
        let table = Table::from_labeled_rows(&["label", "a"], &[("W1", &[1.0])]);
        let surface = paspale(table, "", QuickOptions::default()).expect("plot");
        assert_eq!(surface.snapshot().bars, 1);
        assert_eq!(surface.size(), FigureSize::FULL_WIDTH);
    }

    #[test]
    fn missing_csv_reports_io_error() {
        let result = paspale("does/not/exist.csv", "out.svg", QuickOptions::default());
        assert!(matches!(result, Err(crate::PlotError::Io { .. })));
    }
}
