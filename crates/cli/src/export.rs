use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use gantt_scene_core::{Project, render_svg};
use gantt_scene_protocol::{RenderCommand, TextMetrics};

use crate::View;

/// A chart resolved against concrete metrics, with the canvas size it needs.
pub struct Chart {
    pub commands: Vec<RenderCommand>,
    pub width: f64,
    pub height: f64,
}

pub fn build(project: &Project, view: View, metrics: &dyn TextMetrics) -> Chart {
    match view {
        View::Table => {
            let table = project.table_scene(metrics);
            Chart {
                commands: table.scene.to_commands(metrics),
                width: table.width,
                height: table.height,
            }
        }
        View::Heatmap => {
            let scene = project.heatmap_scene();
            Chart {
                commands: scene.to_commands(metrics),
                width: project.heatmap.chart_width,
                height: project.heatmap_height() + scene.offset().y,
            }
        }
    }
}

pub fn svg(chart: &Chart, dark: bool) -> String {
    render_svg(&chart.commands, chart.width, chart.height, dark)
}

pub fn write(output: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
            Ok(())
        }
    }
}
