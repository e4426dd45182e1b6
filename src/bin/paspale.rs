use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use paspale::telemetry::init_default_tracing;
use paspale::{FigureSize, PlotResult, QuickOptions, paspale};

#[derive(Debug, Parser)]
#[command(
    name = "paspale",
    version = "0.1.0",
    about = "PasPale - Academic paper plotting tool"
)]
struct Cli {
    /// CSV file whose first column holds the group labels.
    data: Option<PathBuf>,

    /// Output file; the extension picks the format.
    #[arg(short, long, default_value = "output.svg")]
    output: String,

    /// Y-axis label.
    #[arg(short, long, default_value = "")]
    ylabel: String,

    /// Legend labels, one per series.
    #[arg(short, long, num_args = 1..)]
    legend: Vec<String>,

    /// Y-axis upper limit.
    #[arg(long)]
    ylim: Option<f64>,

    /// Palette name.
    #[arg(long, default_value = "primary")]
    colors: String,

    /// Figure width and height in inches.
    #[arg(long, num_args = 2, value_names = ["W", "H"], default_values_t = [14.0, 4.5])]
    size: Vec<f64>,
}

impl Cli {
    fn options(&self) -> QuickOptions {
        let size = match self.size.as_slice() {
            [width, height] => FigureSize::new(*width, *height),
            _ => FigureSize::FULL_WIDTH,
        };
        QuickOptions::default()
            .with_ylabel(self.ylabel.clone())
            .with_legend(self.legend.clone())
            .with_ylim(self.ylim)
            .with_colors(self.colors.as_str())
            .with_size(size)
    }
}

fn run(cli: &Cli, data: PathBuf) -> PlotResult<()> {
    paspale(data, &cli.output, cli.options())?;
    println!("Saved: {}", cli.output);
    Ok(())
}

fn main() -> ExitCode {
    let _ = init_default_tracing();
    let cli = Cli::parse();

    let Some(data) = cli.data.clone() else {
        if Cli::command().print_help().is_err() {
            return ExitCode::FAILURE;
        }
        return ExitCode::SUCCESS;
    };

    match run(&cli, data) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
