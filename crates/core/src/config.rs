use serde::{Deserialize, Serialize};

/// Layout parameters of a tree table, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub header_height: f64,
    pub row_height: f64,
    /// Margin left of the first and right of the last column.
    pub horizontal_offset: f64,
    /// Indentation per tree level.
    pub indent_unit: f64,
    /// Gap between a cell edge and its text.
    pub text_padding: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            header_height: 30.0,
            row_height: 24.0,
            horizontal_offset: 0.0,
            indent_unit: 15.0,
            text_padding: 5.0,
        }
    }
}

/// Layout parameters of a resource load heatmap, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapConfig {
    pub row_height: f64,
    /// Length of the separator lines between entities.
    pub chart_width: f64,
    /// Vertical scroll offset applied to the whole scene.
    pub y_offset: f64,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            row_height: 24.0,
            chart_width: 800.0,
            y_offset: 0.0,
        }
    }
}

/// Visible date range of the chart, in milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartWindow {
    pub start: i64,
    pub end: i64,
}

impl ChartWindow {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Whether any part of `[start, end)` can be visible.
    pub fn overlaps(&self, start: i64, end: i64) -> bool {
        start <= self.end && end > self.start
    }
}
