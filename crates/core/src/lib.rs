//! Scene builders for project charts.
//!
//! ```text
//!   task tree ──▶ tree::flatten ──▶ rows ──▶ views::table ──────┐
//!                                                               ├──▶ Scene ──▶ RenderCommand[] ──▶ SVG, UI…
//!   resource loads ──▶ distribution::distribute ──▶ views::heatmap ┘
//! ```

pub mod config;
pub mod distribution;
pub mod model;
pub mod offsets;
pub mod svg;
pub mod tree;
pub mod views;

pub use config::{ChartWindow, HeatmapConfig, TableConfig};
pub use distribution::distribute;
pub use model::{
    Column, ColumnKey, EntityLoads, LoadBorder, LoadContribution, LoadError, Moment, Project,
    ProjectError, Row, TreeItem,
};
pub use offsets::{DateOffsetLookup, Offset, OffsetError, OffsetRuler};
pub use svg::render_svg;
pub use tree::flatten;
pub use views::heatmap::{build_heatmap, heatmap_height};
pub use views::table::{TableScene, layout_table};
