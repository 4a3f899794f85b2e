pub mod load;
pub mod project;
pub mod table;

pub use load::{
    DAY_OFF_LOAD, EntityLoads, LoadBorder, LoadContribution, LoadError, Moment, date_millis,
};
pub use project::{Project, ProjectError};
pub use table::{Column, ColumnKey, Row, TreeItem};
