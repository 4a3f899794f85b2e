use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Magnitude that marks a contribution as a day off rather than work.
pub const DAY_OFF_LOAD: f64 = -1.0;

#[derive(Debug, Error, PartialEq)]
pub enum LoadError {
    #[error("load interval ends at {end} before it starts at {start}")]
    InvalidInterval { start: i64, end: i64 },
    #[error("load magnitude must be finite, got {0}")]
    NonFiniteMagnitude(f64),
}

/// A point on the load timeline. `Beginning` sorts before every instant and
/// stands for "since the beginning of time".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Moment {
    Beginning,
    /// Milliseconds since the Unix epoch.
    At(i64),
}

impl Moment {
    pub fn millis(self) -> Option<i64> {
        match self {
            Self::Beginning => None,
            Self::At(ms) => Some(ms),
        }
    }
}

/// Accumulated load from `moment` until the next border.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadBorder {
    pub moment: Moment,
    pub value: f64,
}

impl LoadBorder {
    pub fn new(moment: Moment, value: f64) -> Self {
        Self { moment, value }
    }
}

/// A resource's load over the half-open interval `[start, end)`.
///
/// Magnitudes are percentages of a full-time assignment; negative values
/// mark days off. Only constructed through [`LoadContribution::new`], so an
/// interval that ends before it starts never reaches a scene builder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadContribution {
    start: i64,
    end: i64,
    magnitude: f64,
    task: Option<i64>,
}

impl LoadContribution {
    pub fn new(start: i64, end: i64, magnitude: f64, task: Option<i64>) -> Result<Self, LoadError> {
        if end < start {
            return Err(LoadError::InvalidInterval { start, end });
        }
        if !magnitude.is_finite() {
            return Err(LoadError::NonFiniteMagnitude(magnitude));
        }
        Ok(Self {
            start,
            end,
            magnitude,
            task,
        })
    }

    pub fn day_off(start: i64, end: i64) -> Result<Self, LoadError> {
        Self::new(start, end, DAY_OFF_LOAD, None)
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    /// Owning task, `None` for loads not attributed to any task.
    pub fn task(&self) -> Option<i64> {
        self.task
    }

    pub fn is_day_off(&self) -> bool {
        self.magnitude < 0.0
    }
}

/// All load contributions of one tracked entity, typically a resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityLoads {
    pub name: String,
    pub loads: Vec<LoadContribution>,
    /// Expanded entities get one extra row per assigned task.
    pub expanded: bool,
}

impl EntityLoads {
    pub fn new(name: impl Into<String>, loads: Vec<LoadContribution>) -> Self {
        Self {
            name: name.into(),
            loads,
            expanded: false,
        }
    }

    pub fn expanded(mut self) -> Self {
        self.expanded = true;
        self
    }

    /// Distinct task ids in order of first appearance.
    pub fn task_ids(&self) -> Vec<i64> {
        let mut seen = HashSet::new();
        self.loads
            .iter()
            .filter_map(LoadContribution::task)
            .filter(|task| seen.insert(*task))
            .collect()
    }
}

/// Midnight UTC of `date` as milliseconds since the Unix epoch.
pub fn date_millis(date: NaiveDate) -> i64 {
    date.signed_duration_since(NaiveDate::default())
        .num_milliseconds()
}
