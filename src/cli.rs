use crate::config::{Config, load_config};
use crate::ingest::convert_dir;
use crate::layout::{LayoutResult, compute_layout};
use crate::layout_dump::{layout_to_json, write_layout_dump};
use crate::model::parse_raw_dataset;
use crate::normalize::normalize;
use crate::playback::Visibility;
use crate::render::{render_svg, write_output_png, write_output_svg};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hypergraph", version, about = "Frequent-itemset hypergraph layout and snapshot renderer")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Lay out a JSON dataset and write SVG, PNG or the layout as JSON
    Layout(LayoutArgs),
    /// Convert a directory of itemset files (one per interval) to a JSON dataset
    Convert(ConvertArgs),
}

#[derive(clap::Args, Debug)]
pub struct LayoutArgs {
    /// Input dataset (.json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for SVG and JSON if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config file (JSON or JSON5)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// Animation step to draw
    #[arg(short = 's', long = "step", default_value_t = 0)]
    pub step: usize,

    /// Percentage below which a frequency is hidden
    #[arg(short = 't', long = "threshold")]
    pub threshold: Option<f32>,
}

#[derive(clap::Args, Debug)]
pub struct ConvertArgs {
    /// Directory with one itemset file per interval
    pub dir: PathBuf,

    /// Output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

pub fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match args.command {
        Command::Layout(args) => run_layout(args),
        Command::Convert(args) => run_convert(args),
    }
}

fn run_layout(args: LayoutArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    if let Some(threshold) = args.threshold {
        config.playback.threshold = threshold;
    }

    let input = read_input(args.input.as_deref())?;
    let layout = build_layout(&input, &config).context("could not render graph")?;
    info!(
        nodes = layout.nodes.len(),
        links = layout.links.len(),
        "layout computed"
    );

    match args.output_format {
        OutputFormat::Json => match args.output.as_deref() {
            Some(path) => write_layout_dump(path, &layout)?,
            None => println!("{}", layout_to_json(&layout)?),
        },
        OutputFormat::Svg => {
            let svg = snapshot_svg(&layout, &config, args.step);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            let svg = snapshot_svg(&layout, &config, args.step);
            write_output_png(&svg, &output, &config.render)?;
        }
    }
    Ok(())
}

fn run_convert(args: ConvertArgs) -> Result<()> {
    let dataset = convert_dir(&args.dir)?;
    let json = serde_json::to_string(&dataset)?;
    match args.output.as_deref() {
        Some(path) => {
            std::fs::write(path, json)?;
            info!(path = %path.display(), itemsets = dataset.len(), "data converted");
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Parses, normalizes and lays out a JSON dataset in one step.
pub fn build_layout(input: &str, config: &Config) -> Result<LayoutResult> {
    let raw = parse_raw_dataset(input).context("input is not a valid dataset")?;
    let dataset = normalize(&raw)?;
    Ok(compute_layout(&dataset, &config.layout, &config.render)?)
}

fn snapshot_svg(layout: &LayoutResult, config: &Config, step: usize) -> String {
    let step = step.min(layout.steps.saturating_sub(1));
    let visibility = Visibility::at_step(layout, step, config.playback.threshold);
    render_svg(layout, &visibility, step, &config.theme, &config.layout)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return std::fs::read_to_string(path)
                .with_context(|| format!("cannot read {}", path.display()));
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!(
        "Output path required for {} output",
        ext
    ))
}
