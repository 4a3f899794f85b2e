use serde::{Deserialize, Serialize};

use crate::scene::ModelRef;
use crate::shared_str::SharedStr;
use crate::style::Style;
use crate::types::{Point, Rect};

/// A single, stateless render instruction resolved from a [`Scene`].
///
/// Resolution applies the scene offset and evaluates every lazy text label
/// against the renderer's metrics, so renderers consume this list
/// sequentially without calling back into the scene.
///
/// [`Scene`]: crate::Scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Draw a filled rectangle, optionally bound to a model object for
    /// hit-testing.
    DrawRect {
        rect: Rect,
        style: Style,
        model: Option<ModelRef>,
    },

    /// Draw an already selected label at an anchor point.
    DrawText {
        position: Point,
        text: SharedStr,
        style: Style,
        h_align: HAlign,
        v_align: VAlign,
    },

    /// Draw a line segment.
    DrawLine { from: Point, to: Point, style: Style },

    /// Start of a z-ordered layer. Layer 0 is painted first.
    BeginLayer { index: usize },

    /// End of the current layer.
    EndLayer,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VAlign {
    Top,
    #[default]
    Center,
    Bottom,
}
