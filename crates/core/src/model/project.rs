use std::collections::HashSet;

use chrono::NaiveDate;
use gantt_scene_protocol::{Scene, TextMetrics};
use log::{debug, warn};
use serde::Deserialize;
use thiserror::Error;

use crate::config::{ChartWindow, HeatmapConfig, TableConfig};
use crate::model::load::{EntityLoads, LoadContribution, LoadError, date_millis};
use crate::model::table::{Column, ColumnKey, Row, TreeItem};
use crate::offsets::{Offset, OffsetError, OffsetRuler};
use crate::tree::flatten;
use crate::views::heatmap::{build_heatmap, heatmap_height};
use crate::views::table::{TableScene, layout_table};

const DAY_MS: i64 = 86_400_000;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("malformed project file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid chart offsets: {0}")]
    Offsets(#[from] OffsetError),
    #[error("chart ends on {end} before it starts on {start}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },
    #[error("invalid load of resource `{resource}`")]
    Load {
        resource: String,
        #[source]
        source: LoadError,
    },
}

#[derive(Debug, Deserialize)]
struct ProjectFile {
    #[serde(default)]
    name: String,
    #[serde(default)]
    columns: Vec<Column>,
    #[serde(default)]
    tasks: Vec<TreeItem>,
    chart: ChartFile,
    #[serde(default)]
    resources: Vec<ResourceFile>,
    #[serde(default)]
    table: TableConfig,
    heatmap: Option<HeatmapConfig>,
}

#[derive(Debug, Deserialize)]
struct ChartFile {
    start: NaiveDate,
    end: NaiveDate,
    #[serde(default = "default_day_width")]
    day_width: f64,
    /// Explicit ruler steps; one `day_width` step per day when absent.
    #[serde(default)]
    offsets: Vec<OffsetFile>,
}

fn default_day_width() -> f64 {
    20.0
}

#[derive(Debug, Deserialize)]
struct OffsetFile {
    end: NaiveDate,
    end_px: f64,
}

#[derive(Debug, Deserialize)]
struct ResourceFile {
    name: String,
    #[serde(default)]
    expanded: bool,
    #[serde(default)]
    loads: Vec<LoadFile>,
}

#[derive(Debug, Deserialize)]
struct LoadFile {
    start: NaiveDate,
    end: NaiveDate,
    load: f64,
    #[serde(default)]
    task: Option<i64>,
}

/// A project loaded from its JSON description, ready to build scenes from.
#[derive(Debug, Clone)]
pub struct Project {
    pub name: String,
    pub columns: Vec<Column>,
    pub tasks: Vec<TreeItem>,
    pub resources: Vec<EntityLoads>,
    pub window: ChartWindow,
    pub ruler: OffsetRuler,
    pub table: TableConfig,
    pub heatmap: HeatmapConfig,
}

impl Project {
    pub fn from_json(bytes: &[u8]) -> Result<Self, ProjectError> {
        let file: ProjectFile = serde_json::from_slice(bytes)?;

        let chart = file.chart;
        if chart.end < chart.start {
            return Err(ProjectError::InvalidWindow {
                start: chart.start,
                end: chart.end,
            });
        }
        let origin = date_millis(chart.start);
        let ruler = if chart.offsets.is_empty() {
            let days = (chart.end - chart.start).num_days().max(0) as usize;
            OffsetRuler::uniform(origin, DAY_MS, chart.day_width, days)
        } else {
            let offsets = chart
                .offsets
                .iter()
                .map(|o| Offset {
                    end: date_millis(o.end),
                    end_px: o.end_px,
                })
                .collect();
            OffsetRuler::new(origin, 0.0, offsets)?
        };
        let window = ChartWindow::new(origin, date_millis(chart.end));

        let resources = file
            .resources
            .into_iter()
            .map(ResourceFile::into_entity)
            .collect::<Result<Vec<_>, _>>()?;

        let heatmap = file.heatmap.unwrap_or_else(|| HeatmapConfig {
            chart_width: ruler.width(),
            ..HeatmapConfig::default()
        });

        warn_unknown_keys(&file.columns, &file.tasks);

        debug!(
            "loaded project `{}`: {} columns, {} top-level tasks, {} resources",
            file.name,
            file.columns.len(),
            file.tasks.len(),
            resources.len()
        );

        Ok(Self {
            name: file.name,
            columns: file.columns,
            tasks: file.tasks,
            resources,
            window,
            ruler,
            table: file.table,
            heatmap,
        })
    }

    /// Visible task rows, depth first.
    pub fn rows(&self) -> Vec<Row> {
        flatten(&self.tasks, 0)
    }

    pub fn table_scene(&self, metrics: &dyn TextMetrics) -> TableScene {
        layout_table(&self.columns, &self.rows(), &self.table, metrics)
    }

    pub fn heatmap_scene(&self) -> Scene {
        build_heatmap(&self.resources, &self.ruler, &self.heatmap, self.window)
    }

    pub fn heatmap_height(&self) -> f64 {
        heatmap_height(&self.resources, &self.heatmap)
    }
}

impl ResourceFile {
    fn into_entity(self) -> Result<EntityLoads, ProjectError> {
        let mut loads = Vec::with_capacity(self.loads.len());
        for load in &self.loads {
            let contribution = LoadContribution::new(
                date_millis(load.start),
                date_millis(load.end),
                load.load,
                load.task,
            )
            .map_err(|source| ProjectError::Load {
                resource: self.name.clone(),
                source,
            })?;
            loads.push(contribution);
        }
        Ok(EntityLoads {
            name: self.name,
            loads,
            expanded: self.expanded,
        })
    }
}

/// Cells keyed by a column the table does not have are never drawn; say so
/// once per key.
fn warn_unknown_keys(columns: &[Column], tasks: &[TreeItem]) {
    let known: HashSet<&ColumnKey> = columns.iter().map(|c| &c.key).collect();
    let mut reported: HashSet<&ColumnKey> = HashSet::new();
    let mut stack: Vec<&TreeItem> = tasks.iter().collect();
    while let Some(item) = stack.pop() {
        for key in item.values.keys() {
            if !known.contains(key) && reported.insert(key) {
                warn!("tasks use column `{key}` which the table does not declare");
            }
        }
        stack.extend(&item.children);
    }
}
