use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maps a date range onto the chart's horizontal pixel axis.
///
/// The calendar owns what a pixel means (weekends, holidays, zoom); scene
/// builders only ask for the pixel span covering `[start, end)`, both in
/// milliseconds since the Unix epoch.
pub trait DateOffsetLookup {
    fn bounds(&self, start: i64, end: i64) -> (f64, f64);
}

impl<F> DateOffsetLookup for F
where
    F: Fn(i64, i64) -> (f64, f64),
{
    fn bounds(&self, start: i64, end: i64) -> (f64, f64) {
        self(start, end)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OffsetError {
    #[error("offset {index} does not end after the previous one")]
    Unordered { index: usize },
    #[error("offset {index} moves the ruler to the left")]
    Backwards { index: usize },
}

/// One step of the ruler: the step ends at `end` (exclusive on the left,
/// inclusive on the right) where the axis reaches `end_px`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub end: i64,
    pub end_px: f64,
}

/// Piecewise-linear ruler built from ordered offsets.
///
/// Instants inside a step are interpolated; instants before the origin or
/// after the last step clamp to the ruler's ends.
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetRuler {
    origin: i64,
    origin_px: f64,
    offsets: Vec<Offset>,
}

impl OffsetRuler {
    pub fn new(origin: i64, origin_px: f64, offsets: Vec<Offset>) -> Result<Self, OffsetError> {
        let mut prev = Offset {
            end: origin,
            end_px: origin_px,
        };
        for (index, offset) in offsets.iter().enumerate() {
            if offset.end <= prev.end {
                return Err(OffsetError::Unordered { index });
            }
            if offset.end_px < prev.end_px {
                return Err(OffsetError::Backwards { index });
            }
            prev = *offset;
        }
        Ok(Self {
            origin,
            origin_px,
            offsets,
        })
    }

    /// `count` equal steps of `step_ms` each `step_px` wide, e.g. one per day.
    ///
    /// Steps that would end beyond `i64::MAX` are left out, so the ruler may
    /// be shorter than `count` steps near the end of the timeline.
    pub fn uniform(origin: i64, step_ms: i64, step_px: f64, count: usize) -> Self {
        let step_ms = step_ms.max(1);
        let step_px = step_px.max(0.0);
        let offsets = (1..=count)
            .map_while(|i| {
                let end = i64::try_from(i)
                    .ok()
                    .and_then(|i| step_ms.checked_mul(i))
                    .and_then(|span| origin.checked_add(span))?;
                Some(Offset {
                    end,
                    end_px: step_px * i as f64,
                })
            })
            .collect();
        Self {
            origin,
            origin_px: 0.0,
            offsets,
        }
    }

    pub fn offsets(&self) -> &[Offset] {
        &self.offsets
    }

    /// Pixel position of the far end of the ruler.
    pub fn width(&self) -> f64 {
        self.offsets.last().map_or(self.origin_px, |o| o.end_px)
    }

    /// Pixel position of instant `t`.
    pub fn x_of(&self, t: i64) -> f64 {
        if t <= self.origin {
            return self.origin_px;
        }
        let index = self.offsets.partition_point(|o| o.end < t);
        let Some(step) = self.offsets.get(index) else {
            return self.width();
        };
        let (prev_end, prev_px) = match index {
            0 => (self.origin, self.origin_px),
            _ => {
                let prev = self.offsets[index - 1];
                (prev.end, prev.end_px)
            }
        };
        let fraction = (t - prev_end) as f64 / (step.end - prev_end) as f64;
        prev_px + fraction * (step.end_px - prev_px)
    }
}

impl DateOffsetLookup for OffsetRuler {
    fn bounds(&self, start: i64, end: i64) -> (f64, f64) {
        (self.x_of(start), self.x_of(end))
    }
}
