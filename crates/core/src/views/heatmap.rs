use std::sync::Arc;

use gantt_scene_protocol::{
    HAlign, Label, Line, ModelRef, Point, Rectangle, Scene, SegmentCaps, Style, Text, TextMetrics,
    VAlign,
};
use log::debug;

use crate::config::{ChartWindow, HeatmapConfig};
use crate::distribution::distribute;
use crate::model::{EntityLoads, LoadBorder, LoadContribution};
use crate::offsets::DateOffsetLookup;

/// Build one heatmap band per entity, top to bottom.
///
/// Each band shows the entity's day-off series underneath its accumulated
/// working load. Expanded entities are followed by one detail row per task.
/// The scene is offset vertically by `config.y_offset`.
pub fn build_heatmap(
    entities: &[EntityLoads],
    lookup: &dyn DateOffsetLookup,
    config: &HeatmapConfig,
    window: ChartWindow,
) -> Scene {
    let mut builder = HeatmapBuilder {
        scene: Scene::with_offset(0.0, config.y_offset),
        lookup,
        config,
        window,
    };

    let mut y = 0.0;
    for (index, entity) in entities.iter().enumerate() {
        let (days_off, working): (Vec<LoadContribution>, Vec<LoadContribution>) =
            entity.loads.iter().copied().partition(|l| l.is_day_off());
        builder.series(&distribute(&days_off), Series::DaysOff, index, entity, y);
        builder.series(&distribute(&working), Series::Working, index, entity, y);

        if entity.expanded {
            for task in entity.task_ids() {
                y += config.row_height;
                builder.task_row(entity, task, y);
            }
        }

        y += config.row_height;
        builder.scene.push_line(Line::new(
            Point::new(0.0, y),
            Point::new(config.chart_width, y),
            Style::ResourceSeparator,
        ));
    }

    debug!(
        "built heatmap for {} entities: {} primitives, {y}px tall",
        entities.len(),
        builder.scene.len()
    );
    builder.scene
}

/// Total height of the bands `build_heatmap` stacks for `entities`.
pub fn heatmap_height(entities: &[EntityLoads], config: &HeatmapConfig) -> f64 {
    entities
        .iter()
        .map(|e| {
            let details = if e.expanded { e.task_ids().len() } else { 0 };
            (1 + details) as f64 * config.row_height
        })
        .sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Series {
    DaysOff,
    Working,
}

struct HeatmapBuilder<'a> {
    scene: Scene,
    lookup: &'a dyn DateOffsetLookup,
    config: &'a HeatmapConfig,
    window: ChartWindow,
}

impl HeatmapBuilder<'_> {
    /// Draw the segments of one distribution in the band at `y`.
    ///
    /// A segment opens a run (`.first`) when it directly follows a zero
    /// border whose successor is positive, and closes one (`.last`) when the
    /// load drops back to zero after it.
    fn series(
        &mut self,
        borders: &[LoadBorder],
        series: Series,
        index: usize,
        entity: &EntityLoads,
        y: f64,
    ) {
        let mut opens_run = false;
        for pair in borders.windows(2) {
            let (prev, cur) = (pair[0], pair[1]);
            if prev.value == 0.0 {
                if cur.value > 0.0 {
                    opens_run = true;
                }
                continue;
            }
            let caps = SegmentCaps {
                first: opens_run,
                last: cur.value == 0.0,
            };
            opens_run = false;

            let (Some(start), Some(end)) = (prev.moment.millis(), cur.moment.millis()) else {
                continue;
            };
            let style = match series {
                Series::DaysOff => Style::DayOff,
                Series::Working => Style::load(prev.value, caps),
            };
            let Some(rect) = self.rect(start, end, y, style) else {
                continue;
            };
            let rect = rect
                .with_model(ModelRef::Load {
                    entity: index,
                    value: prev.value,
                })
                .with_attribute("entity", entity.name.as_str());
            if series == Series::Working {
                self.label(&rect, prev.value);
            }
            self.scene.push_rect(rect);
        }
    }

    /// One rectangle per contribution of `task`, each a complete run.
    fn task_row(&mut self, entity: &EntityLoads, task: i64, y: f64) {
        for load in entity.loads.iter().filter(|l| l.task() == Some(task)) {
            if load.magnitude() == 0.0 {
                continue;
            }
            let style = if load.is_day_off() {
                Style::DayOff
            } else {
                Style::load(load.magnitude(), SegmentCaps::BOTH)
            };
            let Some(rect) = self.rect(load.start(), load.end(), y, style) else {
                continue;
            };
            let rect = rect
                .with_model(ModelRef::Task(task))
                .with_attribute("entity", entity.name.as_str());
            if !load.is_day_off() {
                self.label(&rect, load.magnitude());
            }
            self.scene.push_rect(rect);
        }
    }

    /// The band-high rectangle for `[start, end)`, or `None` when it lies
    /// outside the chart window.
    fn rect(&self, start: i64, end: i64, y: f64, style: Style) -> Option<Rectangle> {
        if !self.window.overlaps(start, end) {
            return None;
        }
        let (left, right) = self.lookup.bounds(start, end);
        Some(Rectangle::new(
            left,
            y,
            right - left,
            self.config.row_height,
            style,
        ))
    }

    /// Centred percentage, shown only when it is not exactly 100% and fits
    /// the rectangle.
    fn label(&mut self, rect: &Rectangle, load: f64) {
        let bounds = rect.rect();
        let percent = load.round() as i64;
        let selector = Arc::new(move |metrics: &dyn TextMetrics| {
            if percent == 100 {
                return None;
            }
            let label = Label::measured(format!("{percent}%"), metrics);
            (label.width <= bounds.w).then_some(label)
        });
        self.scene.push_text(
            Text::new(
                Point::new(bounds.middle_x(), bounds.middle_y()),
                Style::LoadText,
                selector,
            )
            .with_alignment(HAlign::Center, VAlign::Center),
        );
    }
}
