use approx::assert_relative_eq;
use paspale::render::AxisId;
use paspale::{
    Alignment, BarPlotter, DualAxisPlotter, LinePlotter, PlotConfig, Plotter, StackedBarPlotter,
    Table,
};
use proptest::prelude::*;

fn speedups(rows: usize) -> Table {
    let rows: Vec<(String, Vec<f64>)> = (0..rows)
        .map(|row| {
            let base = row as f64 + 1.0;
            (format!("W{row}"), vec![base, base * 1.5, base * 2.0])
        })
        .collect();
    labeled(&["label", "base", "opt", "ours"], &rows)
}

fn miss_rates(rows: usize) -> Table {
    let rows: Vec<(String, Vec<f64>)> = (0..rows)
        .map(|row| (format!("W{row}"), vec![0.05 * (row as f64 + 1.0)]))
        .collect();
    labeled(&["label", "miss"], &rows)
}

fn labeled(headers: &[&str], rows: &[(String, Vec<f64>)]) -> Table {
    let borrowed: Vec<(&str, &[f64])> = rows
        .iter()
        .map(|(label, values)| (label.as_str(), values.as_slice()))
        .collect();
    Table::from_labeled_rows(headers, &borrowed)
}

fn bar_plotter(rows: usize, legend: &[&str]) -> BarPlotter {
    let mut plotter = BarPlotter::new(PlotConfig::builder().with_legend(legend.to_vec()).build());
    plotter.load_table(speedups(rows));
    plotter
}

fn line_plotter(rows: usize, legend: &[&str]) -> LinePlotter {
    let config = PlotConfig::builder()
        .with_ylabel("Miss rate")
        .with_ylim(Some(0.5))
        .with_legend(legend.to_vec())
        .build();
    let mut plotter = LinePlotter::new(config);
    plotter.load_table(miss_rates(rows));
    plotter
}

#[test]
fn secondary_points_sit_on_group_centers() {
    let mut dual = DualAxisPlotter::new(
        Box::new(bar_plotter(3, &[])),
        Box::new(line_plotter(3, &[])),
    );
    let surface = dual.plot(false).expect("plot");

    let line = surface.lines_on(AxisId::Secondary).next().expect("line");
    let center = 1.3 / 3.0;
    assert_eq!(line.xs.len(), 3);
    for (group, x) in line.xs.iter().enumerate() {
        assert_relative_eq!(*x, group as f64 * 2.0 + center);
    }
    assert_relative_eq!(line.ys[2], 0.15);
    assert_eq!(
        dual.alignment(),
        &Alignment::Aligned {
            centers: vec![center, 2.0 + center, 4.0 + center],
            dropped_rows: 0,
        }
    );
}

#[test]
fn fewer_secondary_rows_use_the_leading_groups() {
    let mut dual = DualAxisPlotter::new(
        Box::new(bar_plotter(4, &[])),
        Box::new(line_plotter(2, &[])),
    );
    let surface = dual.plot(false).expect("plot");

    let line = surface.lines_on(AxisId::Secondary).next().expect("line");
    assert_eq!(line.xs.len(), 2);
    assert_relative_eq!(line.xs[1], 2.0 + 1.3 / 3.0);
}

#[test]
fn extra_secondary_rows_are_dropped() {
    let mut dual = DualAxisPlotter::new(
        Box::new(bar_plotter(2, &[])),
        Box::new(line_plotter(6, &[])),
    );
    let surface = dual.plot(false).expect("plot");

    let line = surface.lines_on(AxisId::Secondary).next().expect("line");
    assert_eq!(line.xs.len(), 2);
    assert_eq!(line.ys.len(), 2);
    assert!(matches!(
        dual.alignment(),
        Alignment::Aligned { dropped_rows: 4, .. }
    ));
}

#[test]
fn stacked_primary_aligns_on_column_positions() {
    let mut stacked = StackedBarPlotter::new(PlotConfig::default());
    stacked.load_table(speedups(3));
    let mut dual = DualAxisPlotter::new(Box::new(stacked), Box::new(line_plotter(3, &[])));
    let surface = dual.plot(false).expect("plot");

    let line = surface.lines_on(AxisId::Secondary).next().expect("line");
    assert_eq!(line.xs, vec![0.0, 1.0, 2.0]);
}

#[test]
fn primary_without_groups_leaves_secondary_unaligned() {
    let mut primary = LinePlotter::new(PlotConfig::default());
    primary.load_table(miss_rates(3));
    let mut dual = DualAxisPlotter::new(Box::new(primary), Box::new(line_plotter(3, &[])));
    let surface = dual.plot(false).expect("plot");

    assert_eq!(dual.alignment(), &Alignment::Unaligned);
    let line = surface.lines_on(AxisId::Secondary).next().expect("line");
    assert_eq!(line.xs, vec![0.0, 1.0, 2.0]);
}

#[test]
fn secondary_axis_takes_its_own_limits_and_label() {
    let mut dual = DualAxisPlotter::new(
        Box::new(bar_plotter(2, &[])),
        Box::new(line_plotter(2, &[])),
    );
    let surface = dual.plot(false).expect("plot");

    assert!(surface.has_secondary());
    let secondary = surface.axis(AxisId::Secondary).expect("secondary");
    assert_eq!(secondary.y_lower, Some(0.0));
    assert_eq!(secondary.y_upper, Some(0.5));
    assert_eq!(
        secondary.ylabel.as_ref().map(|(label, _)| label.as_str()),
        Some("Miss rate")
    );
}

#[test]
fn merged_legend_lists_primary_then_secondary() {
    let mut dual = DualAxisPlotter::new(
        Box::new(bar_plotter(2, &["Base", "Opt", "Ours"])),
        Box::new(line_plotter(2, &["Miss rate"])),
    );
    let surface = dual.plot(false).expect("plot");

    assert_eq!(
        surface.snapshot().legend_labels,
        vec!["Base", "Opt", "Ours", "Miss rate"]
    );
}

#[test]
fn composition_legend_overrides_sub_plotter_labels() {
    let config = PlotConfig::builder()
        .with_legend(["A", "B", "C", "Misses"])
        .build();
    let mut dual = DualAxisPlotter::new(
        Box::new(bar_plotter(2, &["Base", "Opt", "Ours"])),
        Box::new(line_plotter(2, &["Miss rate"])),
    )
    .with_config(config);
    let surface = dual.plot(false).expect("plot");

    let legend = surface.legend().expect("legend");
    let labels: Vec<&str> = legend.entries.iter().map(|entry| entry.label.as_str()).collect();
    assert_eq!(labels, vec!["A", "B", "C", "Misses"]);
    assert_eq!(legend.columns(), 4);
    let handles: Vec<usize> = legend.entries.iter().map(|entry| entry.handle.index()).collect();
    let secondary_handle = dual.secondary().handles()[0];
    assert_eq!(handles[3], secondary_handle.index());
}

#[test]
fn dual_figure_lays_out_ticks_on_both_sides() {
    let mut dual = DualAxisPlotter::new(
        Box::new(bar_plotter(2, &["Base", "Opt", "Ours"])),
        Box::new(line_plotter(2, &["Miss rate"])),
    );
    let surface = dual.plot(false).expect("plot");
    let frame = surface.layout().expect("layout");
    frame.validate().expect("valid");
    assert!(frame.texts().iter().any(|text| text.text == "Miss rate"));
}

proptest! {
    #[test]
    fn aligned_point_count_is_the_smaller_of_groups_and_rows(groups in 1usize..8, rows in 1usize..12) {
        let mut dual = DualAxisPlotter::new(
            Box::new(bar_plotter(groups, &[])),
            Box::new(line_plotter(rows, &[])),
        );
        let surface = dual.plot(false).expect("plot");

        let line = surface.lines_on(AxisId::Secondary).next().expect("line");
        prop_assert_eq!(line.xs.len(), groups.min(rows));
        let dropped = match dual.alignment() {
            Alignment::Aligned { dropped_rows, .. } => *dropped_rows,
            other => return Err(TestCaseError::fail(format!("unexpected {other:?}"))),
        };
        prop_assert_eq!(dropped, rows.saturating_sub(groups));
    }
}
