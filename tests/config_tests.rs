use paspale::{FigureSize, LegendLocation, PlotConfig, TickFormat};
use proptest::prelude::*;

#[test]
fn defaults_describe_a_full_width_bar_figure() {
    let config = PlotConfig::default();
    assert_eq!(config.size, FigureSize::FULL_WIDTH);
    assert_eq!(config.bar_width, 1.3);
    assert_eq!(config.label_rotation, -15.0);
    assert_eq!(config.legend_loc, LegendLocation::LowerCenter);
    assert_eq!(config.legend_ncol, None);
    assert_eq!(config.yticks, Some(7));
}

#[test]
fn legend_column_count_is_fixed_at_build_time() {
    let mut config = PlotConfig::builder()
        .with_legend(["A", "B", "C"])
        .build();
    assert_eq!(config.legend_ncol, Some(3));

    config.legend.push("D".to_owned());
    assert_eq!(config.legend_ncol, Some(3));
}

#[test]
fn explicit_column_count_wins() {
    let config = PlotConfig::builder()
        .with_legend(["A", "B", "C"])
        .with_legend_ncol(1)
        .build();
    assert_eq!(config.legend_ncol, Some(1));
}

#[test]
fn json_fills_missing_fields_with_defaults() {
    let config = PlotConfig::from_json_str(
        r#"{ "output": "fig.svg", "legend": ["x", "y"], "legend_loc": "upper right", "ylim": 4.0 }"#,
    )
    .expect("config");
    assert_eq!(config.output, "fig.svg");
    assert_eq!(config.legend_ncol, Some(2));
    assert_eq!(config.legend_loc, LegendLocation::UpperRight);
    assert_eq!(config.bar_width, 1.3);
}

#[test]
fn malformed_json_is_an_error() {
    assert!(matches!(
        PlotConfig::from_json_str("{ not json"),
        Err(paspale::PlotError::Json(_))
    ));
}

#[test]
fn y_ticks_need_an_upper_limit() {
    assert!(PlotConfig::default().y_ticks().is_none());

    let config = PlotConfig::builder()
        .with_ylim(Some(6.0))
        .with_ytick_format(TickFormat::Fixed { decimals: 1 })
        .build();
    let ticks = config.y_ticks().expect("ticks");
    assert_eq!(ticks.len(), 7);
    assert_eq!(ticks[0].1, "0.0");
    assert_eq!(ticks[6].1, "6.0");
}

proptest! {
    #[test]
    fn built_column_count_tracks_legend_length(count in 1usize..12) {
        let labels: Vec<String> = (0..count).map(|i| format!("s{i}")).collect();
        let config = PlotConfig::builder().with_legend(labels).build();
        prop_assert_eq!(config.legend_ncol, Some(count));
    }
}
