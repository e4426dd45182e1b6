use paspale::render::{AxisId, LegendPlacement, MarkerShape};
use paspale::{LegendLocation, LinePlotter, PlotConfig, Plotter, Table};

const SWEEP: &str = "threads,read,write\n1,10,4\n2,18,7\n4,30,\n8,41,15\n";

#[test]
fn numeric_first_column_drives_x() {
    let mut plotter = LinePlotter::new(PlotConfig::builder().with_colors("lines").build());
    plotter.load_table(Table::from_reader(SWEEP.as_bytes()).expect("table"));
    let surface = plotter.plot(false).expect("plot");

    let lines: Vec<_> = surface.lines_on(AxisId::Primary).collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].xs, vec![1.0, 2.0, 4.0, 8.0]);
    assert_eq!(lines[0].marker, Some(MarkerShape::Circle));
    assert!(lines[1].ys[2].is_nan());
    assert_eq!(lines[0].width, 2.0);
}

#[test]
fn legend_is_a_single_column_inside_the_figure() {
    let config = PlotConfig::builder()
        .with_legend(["read", "write"])
        .with_legend_loc(LegendLocation::UpperLeft)
        .build();
    let mut plotter = LinePlotter::new(config);
    plotter.load_table(Table::from_reader(SWEEP.as_bytes()).expect("table"));
    let surface = plotter.plot(false).expect("plot");

    let legend = surface.legend().expect("legend");
    assert_eq!(legend.columns(), 1);
    assert_eq!(legend.style.location, LegendLocation::UpperLeft);
    assert!(matches!(legend.style.placement, LegendPlacement::Figure { .. }));
}

#[test]
fn no_table_draws_nothing() {
    let mut plotter = LinePlotter::new(PlotConfig::default());
    let surface = plotter.plot(false).expect("plot");
    assert_eq!(surface.snapshot().lines, 0);
    assert!(plotter.handles().is_empty());
}
