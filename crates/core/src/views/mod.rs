pub mod heatmap;
pub mod table;
