use approx::assert_relative_eq;
use paspale::render::{AxisId, LegendPlacement};
use paspale::{BarPlotter, PlotConfig, Plotter, Table};

const RESULTS: &str = "label,a,b,c\nW1,1.0,2.0,3.0\nW2,1.5,2.5,3.5\n";

fn results() -> Table {
    Table::from_reader(RESULTS.as_bytes()).expect("table")
}

#[test]
fn csv_rows_become_labeled_groups() {
    let mut plotter = BarPlotter::new(PlotConfig::default());
    plotter.load_table(results());
    let surface = plotter.plot(false).expect("plot");

    let snapshot = surface.snapshot();
    assert_eq!(snapshot.bars, 6);
    assert_eq!(snapshot.texts, 2);
    assert!(snapshot.legend_labels.is_empty());
    assert!(surface.legend().is_none());

    let labels: Vec<&str> = surface.texts().map(|text| text.text.as_str()).collect();
    assert_eq!(labels, vec!["W1", "W2"]);
}

#[test]
fn bars_split_the_group_width_evenly() {
    let mut plotter = BarPlotter::new(PlotConfig::default());
    plotter.load_table(results());
    let surface = plotter.plot(false).expect("plot");

    let bars: Vec<_> = surface.bars().collect();
    for bar in &bars {
        assert_relative_eq!(bar.width, 1.3 / 3.0);
    }
    assert_relative_eq!(bars[2].x, 2.0 * 1.3 / 3.0);
    assert_relative_eq!(bars[5].height, 3.5);
}

#[test]
fn legend_labels_pair_with_series_in_order() {
    let config = PlotConfig::builder()
        .with_legend(["Baseline", "Optimized", "Ours"])
        .build();
    let mut plotter = BarPlotter::new(config);
    plotter.load_table(results());
    let surface = plotter.plot(false).expect("plot");

    let legend = surface.legend().expect("legend");
    let labels: Vec<&str> = legend.entries.iter().map(|entry| entry.label.as_str()).collect();
    assert_eq!(labels, vec!["Baseline", "Optimized", "Ours"]);
    assert_eq!(legend.columns(), 3);
    assert!(!legend.style.frame);
    assert!(matches!(
        legend.style.placement,
        LegendPlacement::Figure { anchor } if anchor == (0.5, -0.1)
    ));
}

#[test]
fn short_legend_labels_only_the_first_series() {
    let config = PlotConfig::builder().with_legend(["Only"]).build();
    let mut plotter = BarPlotter::new(config);
    plotter.load_table(results());
    let surface = plotter.plot(false).expect("plot");
    assert_eq!(surface.snapshot().legend_labels, vec!["Only"]);
}

#[test]
fn ylim_sets_axis_bounds_and_ticks() {
    let config = PlotConfig::builder().with_ylim(Some(6.0)).build();
    let mut plotter = BarPlotter::new(config);
    plotter.load_table(results());
    let surface = plotter.plot(false).expect("plot");

    let axis = surface.axis(AxisId::Primary).expect("primary axis");
    assert_eq!(axis.y_lower, Some(0.0));
    assert_eq!(axis.y_upper, Some(6.0));
    let ticks = axis.yticks.as_ref().expect("ticks");
    assert_eq!(ticks.len(), 7);
    assert_eq!(ticks[6].1, "6.0");
}

#[test]
fn customize_hook_runs_before_the_legend() {
    let mut plotter = BarPlotter::new(PlotConfig::default()).with_customize(|view| {
        view.axhline(1.0, "#ff0000", 1.0, true);
        Ok(())
    });
    plotter.load_table(results());
    let surface = plotter.plot(false).expect("plot");
    assert_eq!(surface.marks().len(), 6 + 2 + 1);
}

#[test]
fn layout_produces_a_valid_frame() {
    let mut plotter = BarPlotter::new(PlotConfig::builder().with_legend(["a", "b", "c"]).build());
    plotter.load_table(results());
    let surface = plotter.plot(false).expect("plot");
    let frame = surface.layout().expect("layout");
    frame.validate().expect("valid frame");
    assert!(frame.rects().len() >= 6);
}

#[test]
fn named_css_colors_render_and_export() {
    let config = PlotConfig::builder()
        .with_colors(vec![
            "orange".to_owned(),
            "navy".to_owned(),
            "tab:blue".to_owned(),
        ])
        .build();
    let mut plotter = BarPlotter::new(config);
    plotter.load_table(results());
    let surface = plotter.plot(false).expect("plot");
    let frame = surface.layout().expect("named colors lay out");

    let fills: Vec<String> = frame
        .rects()
        .iter()
        .map(|rect| rect.fill_color.to_hex())
        .collect();
    assert!(fills.iter().any(|fill| fill == "#ffa500"));
    assert!(fills.iter().any(|fill| fill == "#000080"));
    assert!(fills.iter().any(|fill| fill == "#1f77b4"));

    let mut renderer = paspale::render::SvgRenderer::default();
    paspale::render::Renderer::render(&mut renderer, &frame).expect("svg");
    assert!(renderer.document().contains("#ffa500"));
}
