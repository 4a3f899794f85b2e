pub mod commands;
pub mod metrics;
pub mod scene;
pub mod shared_str;
pub mod style;
pub mod types;

pub use commands::{HAlign, RenderCommand, VAlign};
pub use metrics::{MonospaceMetrics, TextMetrics};
pub use scene::{Label, LabelSelector, Layer, Line, ModelRef, Primitive, Rectangle, Scene, Text};
pub use shared_str::SharedStr;
pub use style::{LoadLevel, SegmentCaps, Style, UnknownStyle};
pub use types::{Point, Rect};
