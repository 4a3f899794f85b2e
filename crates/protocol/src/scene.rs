use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::commands::{HAlign, RenderCommand, VAlign};
use crate::metrics::TextMetrics;
use crate::shared_str::SharedStr;
use crate::style::Style;
use crate::types::{Point, Rect};

/// A label chosen for a text primitive at paint time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub text: SharedStr,
    /// Measured pixel width of `text`.
    pub width: f64,
}

impl Label {
    pub fn measured(text: impl Into<SharedStr>, metrics: &dyn TextMetrics) -> Self {
        let text = text.into();
        let width = metrics.text_width(&text);
        Self { text, width }
    }
}

/// Picks zero or one label for a text once the renderer's metrics are known.
///
/// Must be free of side effects: renderers may call it once to measure and
/// again to draw.
pub type LabelSelector = Arc<dyn Fn(&dyn TextMetrics) -> Option<Label> + Send + Sync>;

/// Opaque back-reference from a shape to the thing it depicts. Used only for
/// hit-testing; it never owns or keeps the model alive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ModelRef {
    /// Index of a data row in the table it was laid out from.
    Row(usize),
    /// Accumulated load of a heatmap segment of the given entity.
    Load { entity: usize, value: f64 },
    /// Task whose assignment a load-detail rectangle shows.
    Task(i64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    rect: Rect,
    style: Style,
    model: Option<ModelRef>,
    attributes: BTreeMap<String, String>,
}

impl Rectangle {
    /// A negative width grows the box to the left of `x`.
    pub fn new(x: f64, y: f64, w: f64, h: f64, style: Style) -> Self {
        let (x, w) = if w < 0.0 { (x + w, -w) } else { (x, w) };
        Self {
            rect: Rect::new(x, y, w, h),
            style,
            model: None,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_model(mut self, model: ModelRef) -> Self {
        self.model = Some(model);
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn style(&self) -> Style {
        self.style
    }

    pub fn model(&self) -> Option<ModelRef> {
        self.model
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }
}

#[derive(Clone)]
pub struct Text {
    anchor: Point,
    h_align: HAlign,
    v_align: VAlign,
    style: Style,
    selector: LabelSelector,
}

impl Text {
    pub fn new(anchor: Point, style: Style, selector: LabelSelector) -> Self {
        Self {
            anchor,
            h_align: HAlign::Left,
            v_align: VAlign::Bottom,
            style,
            selector,
        }
    }

    /// A text whose label is always `text`.
    pub fn fixed(anchor: Point, style: Style, text: impl Into<SharedStr>) -> Self {
        let text = text.into();
        Self::new(
            anchor,
            style,
            Arc::new(move |metrics: &dyn TextMetrics| Some(Label::measured(text.clone(), metrics))),
        )
    }

    pub fn with_alignment(mut self, h_align: HAlign, v_align: VAlign) -> Self {
        self.h_align = h_align;
        self.v_align = v_align;
        self
    }

    pub fn anchor(&self) -> Point {
        self.anchor
    }

    pub fn h_align(&self) -> HAlign {
        self.h_align
    }

    pub fn v_align(&self) -> VAlign {
        self.v_align
    }

    pub fn style(&self) -> Style {
        self.style
    }

    /// Run the label selector against the painting backend's metrics.
    pub fn label(&self, metrics: &dyn TextMetrics) -> Option<Label> {
        (self.selector)(metrics)
    }
}

impl fmt::Debug for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Text")
            .field("anchor", &self.anchor)
            .field("h_align", &self.h_align)
            .field("v_align", &self.v_align)
            .field("style", &self.style)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    from: Point,
    to: Point,
    style: Style,
}

impl Line {
    pub fn new(from: Point, to: Point, style: Style) -> Self {
        Self { from, to, style }
    }

    pub fn from(&self) -> Point {
        self.from
    }

    pub fn to(&self) -> Point {
        self.to
    }

    pub fn style(&self) -> Style {
        self.style
    }
}

#[derive(Debug, Clone)]
pub enum Primitive {
    Rect(Rectangle),
    Text(Text),
    Line(Line),
}

/// Insertion-ordered primitives painted together.
#[derive(Debug, Clone, Default)]
pub struct Layer {
    primitives: Vec<Primitive>,
}

impl Layer {
    pub fn push_rect(&mut self, rect: Rectangle) {
        self.primitives.push(Primitive::Rect(rect));
    }

    pub fn push_text(&mut self, text: Text) {
        self.primitives.push(Primitive::Text(text));
    }

    pub fn push_line(&mut self, line: Line) {
        self.primitives.push(Primitive::Line(line));
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn rects(&self) -> impl Iterator<Item = &Rectangle> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Rect(r) => Some(r),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &Text> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Text(t) => Some(t),
            _ => None,
        })
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Line(l) => Some(l),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

/// Backend-agnostic description of a chart: layered primitives plus one
/// global pixel offset.
///
/// Scene builders fill a fresh `Scene` per build and hand it to a renderer.
/// The offset is fixed at construction and applied when the scene is
/// consumed (see [`Scene::to_commands`] and [`Scene::primitive_at`]), never
/// baked into stored coordinates.
#[derive(Debug, Clone)]
pub struct Scene {
    offset: Point,
    layers: Vec<Layer>,
}

impl Scene {
    pub fn new() -> Self {
        Self::with_offset(0.0, 0.0)
    }

    pub fn with_offset(dx: f64, dy: f64) -> Self {
        Self {
            offset: Point::new(dx, dy),
            layers: vec![Layer::default()],
        }
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Add a layer above all existing ones and return its index.
    pub fn new_layer(&mut self) -> usize {
        self.layers.push(Layer::default());
        self.layers.len() - 1
    }

    pub fn layer_mut(&mut self, index: usize) -> Option<&mut Layer> {
        self.layers.get_mut(index)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    fn default_layer(&mut self) -> &mut Layer {
        if self.layers.is_empty() {
            self.layers.push(Layer::default());
        }
        &mut self.layers[0]
    }

    /// Add to the default layer.
    pub fn push_rect(&mut self, rect: Rectangle) {
        self.default_layer().push_rect(rect);
    }

    pub fn push_text(&mut self, text: Text) {
        self.default_layer().push_text(text);
    }

    pub fn push_line(&mut self, line: Line) {
        self.default_layer().push_line(line);
    }

    pub fn len(&self) -> usize {
        self.layers.iter().map(Layer::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(Layer::is_empty)
    }

    pub fn rects(&self) -> impl Iterator<Item = &Rectangle> {
        self.layers.iter().flat_map(Layer::rects)
    }

    pub fn texts(&self) -> impl Iterator<Item = &Text> {
        self.layers.iter().flat_map(Layer::texts)
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.layers.iter().flat_map(Layer::lines)
    }

    /// The topmost rectangle containing `(x, y)` in painted coordinates.
    ///
    /// Upper layers win; within a layer the earliest inserted rectangle wins.
    pub fn primitive_at(&self, x: f64, y: f64) -> Option<&Rectangle> {
        let point = Point::new(x - self.offset.x, y - self.offset.y);
        self.layers
            .iter()
            .rev()
            .find_map(|layer| layer.rects().find(|r| r.rect.contains(point)))
    }

    /// Resolve the scene for a renderer: apply the offset and pick every
    /// text's label with `metrics`. Texts whose selector yields nothing are
    /// dropped.
    pub fn to_commands(&self, metrics: &dyn TextMetrics) -> Vec<RenderCommand> {
        let mut commands = Vec::with_capacity(self.len() + self.layers.len() * 2);
        for (index, layer) in self.layers.iter().enumerate() {
            commands.push(RenderCommand::BeginLayer { index });
            for primitive in &layer.primitives {
                match primitive {
                    Primitive::Rect(r) => commands.push(RenderCommand::DrawRect {
                        rect: r.rect.translate(self.offset),
                        style: r.style,
                        model: r.model,
                    }),
                    Primitive::Text(t) => {
                        if let Some(label) = t.label(metrics) {
                            commands.push(RenderCommand::DrawText {
                                position: t.anchor.translate(self.offset),
                                text: label.text,
                                style: t.style,
                                h_align: t.h_align,
                                v_align: t.v_align,
                            });
                        }
                    }
                    Primitive::Line(l) => commands.push(RenderCommand::DrawLine {
                        from: l.from.translate(self.offset),
                        to: l.to.translate(self.offset),
                        style: l.style,
                    }),
                }
            }
            commands.push(RenderCommand::EndLayer);
        }
        commands
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
