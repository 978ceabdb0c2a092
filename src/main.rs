mod app;
mod color;
mod config;
mod data;
mod render;
mod state;
mod ui;

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use config::{BrightnessScale, Delimiter, LoadOptions, PlotOptions, RunConfig};
use state::ViewState;

#[derive(Parser)]
#[command(author, version, about = "Render a variable-star light curve from delimited text")]
struct Args {
    /// Delimited text file with time and brightness columns
    input: PathBuf,
    /// Image to write; format from the extension (.png or .svg)
    #[arg(short, long, default_value = "light_curve.png")]
    output: PathBuf,
    /// Skip writing an image (useful with --show or --stats-json)
    #[arg(long, default_value_t = false)]
    no_output: bool,
    /// Zero-based index of the time column
    #[arg(long, default_value_t = 0)]
    time_column: usize,
    /// Zero-based index of the brightness column
    #[arg(long, default_value_t = 1)]
    brightness_column: usize,
    /// Zero-based index of an optional measurement-error column
    #[arg(long)]
    error_column: Option<usize>,
    /// Rows with a different number of fields are skipped
    #[arg(long)]
    columns: Option<usize>,
    /// Field separator: a single character, "tab" or "whitespace"
    #[arg(short, long, default_value = ",")]
    delimiter: Delimiter,
    /// Treat the first line as column names
    #[arg(long, default_value_t = false)]
    header: bool,
    /// Whether brightness is flux or magnitude (inverts the y axis)
    #[arg(long, value_enum, default_value_t = BrightnessScale::Flux)]
    scale: BrightnessScale,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    x_label: Option<String>,
    #[arg(long)]
    y_label: Option<String>,
    /// Image width in pixels (at most 8192)
    #[arg(long)]
    width: Option<u32>,
    /// Image height in pixels (at most 8192)
    #[arg(long)]
    height: Option<u32>,
    /// Write summary statistics as JSON
    #[arg(long)]
    stats_json: Option<PathBuf>,
    /// Load column and plot settings from a JSON file instead of the flags
    #[arg(long)]
    config: Option<PathBuf>,
    /// Also open a window showing the plot
    #[arg(long, default_value_t = false)]
    show: bool,
}

impl Args {
    fn run_config(&self) -> anyhow::Result<RunConfig> {
        if let Some(path) = &self.config {
            return Ok(RunConfig::load(path)?);
        }

        let defaults = PlotOptions::default();
        Ok(RunConfig {
            input: LoadOptions {
                delimiter: self.delimiter,
                has_header: self.header,
                time_column: self.time_column,
                brightness_column: self.brightness_column,
                error_column: self.error_column,
                expected_columns: self.columns,
            },
            plot: PlotOptions {
                scale: self.scale,
                title: self.title.clone().unwrap_or(defaults.title),
                x_label: self.x_label.clone().unwrap_or(defaults.x_label),
                y_label: self.y_label.clone(),
                width: self.width.unwrap_or(defaults.width),
                height: self.height.unwrap_or(defaults.height),
            },
        })
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = args.run_config()?;
    log::debug!("Run config: {config:?}");

    let (curve, report) = data::loader::load_file(&args.input, &config.input)?;

    match curve.summary() {
        Some(summary) => println!("{summary}"),
        None => println!("No valid observations in {}", args.input.display()),
    }
    if report.rows_skipped > 0 {
        println!(
            "Kept {} of {} rows ({} malformed rows skipped)",
            report.rows_kept(),
            report.rows_read,
            report.rows_skipped
        );
    }

    if let Some(path) = &args.stats_json {
        let json = serde_json::to_string_pretty(&curve.summary())
            .context("serializing summary statistics")?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    }

    if !args.no_output {
        render::render_to_file(&curve, &config.plot, &args.output)
            .with_context(|| format!("rendering {}", args.output.display()))?;
        println!("Light curve saved to '{}'", args.output.display());
    }

    if args.show {
        app::show(ViewState::new(args.input.clone(), curve, report, config.plot))?;
    }

    Ok(())
}
