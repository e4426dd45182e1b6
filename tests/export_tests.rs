use std::fs;
use std::path::PathBuf;

use paspale::render::{NullRenderer, Renderer, SvgRenderer};
use paspale::{BarPlotter, PlotConfig, PlotError, Plotter, Table};

fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("paspale-{}-{name}", std::process::id()))
}

fn plotter(output: &str) -> BarPlotter {
    let config = PlotConfig::builder()
        .with_output(output)
        .with_ylabel("Speedup")
        .with_legend(["a", "b"])
        .build();
    let mut plotter = BarPlotter::new(config);
    plotter.load_table(Table::from_labeled_rows(
        &["label", "a", "b"],
        &[("W1", &[1.0, 2.0]), ("W2", &[3.0, 4.0])],
    ));
    plotter
}

#[test]
fn saving_without_output_path_fails_and_writes_nothing() {
    let mut plotter = plotter("");
    let surface = plotter.plot(false).expect("plot");
    assert!(matches!(
        plotter.save(&surface),
        Err(PlotError::MissingOutputPath)
    ));
}

#[test]
fn svg_output_creates_parent_directories() {
    let dir = scratch("nested");
    let path = dir.join("deeper").join("figure.svg");
    let _ = fs::remove_dir_all(&dir);

    let mut plotter = plotter(path.to_str().expect("utf-8 path"));
    plotter.plot(true).expect("plot and save");

    let document = fs::read_to_string(&path).expect("svg written");
    assert!(document.starts_with("<?xml"));
    assert!(document.contains("Speedup"));
    assert!(document.contains("</svg>"));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn unknown_extension_is_rejected_before_writing() {
    let dir = scratch("unsupported");
    let path = dir.join("figure.bmp");
    let _ = fs::remove_dir_all(&dir);

    let mut plotter = plotter(path.to_str().expect("utf-8 path"));
    let result = plotter.plot(true);
    assert!(matches!(
        result,
        Err(PlotError::UnsupportedFormat { ref extension }) if extension == "bmp"
    ));
    assert!(!dir.exists());
}

#[test]
fn null_renderer_counts_laid_out_primitives() {
    let mut plotter = plotter("");
    let surface = plotter.plot(false).expect("plot");
    let frame = surface.layout().expect("layout");

    let mut renderer = NullRenderer::default();
    renderer.render(&frame).expect("render");
    assert!(renderer.last_rect_count >= 4);
    assert!(renderer.last_text_count >= 4);
}

#[test]
fn svg_renderer_escapes_text() {
    let config = PlotConfig::builder().with_ylabel("Latency <ms> & more").build();
    let mut plotter = BarPlotter::new(config);
    plotter.load_table(Table::from_labeled_rows(&["label", "a"], &[("W1", &[1.0])]));
    let frame = plotter.plot(false).expect("plot").layout().expect("layout");

    let mut renderer = SvgRenderer::default();
    renderer.render(&frame).expect("render");
    assert!(renderer.document().contains("Latency &lt;ms&gt; &amp; more"));
    assert!(renderer.last_stats().texts_drawn > 0);
}
