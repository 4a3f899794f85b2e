mod export;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use gantt_scene_core::Project;
use gantt_scene_protocol::MonospaceMetrics;
use log::info;

/// Render a project's task table or resource heatmap to SVG or JSON.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Project description (JSON)
    #[arg(value_parser)]
    project: PathBuf,
    /// Which chart to build
    #[arg(long, value_enum, default_value_t = View::Table)]
    view: View,
    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Svg)]
    format: Format,
    /// Write here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
    /// Use the dark palette for SVG output
    #[arg(long)]
    dark: bool,
    /// Override the row height of both charts, in pixels
    #[arg(long)]
    row_height: Option<f64>,
    /// Advance of one character when measuring labels, in pixels
    #[arg(long, default_value_t = 7.0)]
    char_width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum View {
    Table,
    Heatmap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Svg,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let data = std::fs::read(&args.project)
        .with_context(|| format!("reading {}", args.project.display()))?;
    let mut project = Project::from_json(&data)
        .with_context(|| format!("loading project {}", args.project.display()))?;
    if let Some(row_height) = args.row_height {
        project.table.row_height = row_height;
        project.heatmap.row_height = row_height;
    }

    let metrics = MonospaceMetrics::new(args.char_width, 14.0);
    let chart = export::build(&project, args.view, &metrics);
    info!(
        "built {:?} view of `{}`: {} commands, {}x{}px",
        args.view,
        project.name,
        chart.commands.len(),
        chart.width,
        chart.height
    );

    let bytes = match args.format {
        Format::Svg => export::svg(&chart, args.dark).into_bytes(),
        Format::Json => serde_json::to_vec_pretty(&chart.commands)?,
    };
    export::write(args.output.as_deref(), &bytes)
}
