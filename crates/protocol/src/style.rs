use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Load level of a heatmap segment, relative to a 100% full-time assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadLevel {
    Underload,
    Normal,
    Overload,
}

impl LoadLevel {
    pub fn of(load: f64) -> Self {
        if load < 100.0 {
            Self::Underload
        } else if load > 100.0 {
            Self::Overload
        } else {
            Self::Normal
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Underload => "underload",
            Self::Normal => "normal",
            Self::Overload => "overload",
        }
    }
}

/// Which ends of a load segment start or finish a visually merged run.
///
/// Renderers draw rounded caps on these ends and flat joins elsewhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SegmentCaps {
    pub first: bool,
    pub last: bool,
}

impl SegmentCaps {
    pub const BOTH: Self = Self {
        first: true,
        last: true,
    };
}

/// Style tag attached to every primitive.
///
/// Renderers resolve a style to colors and fonts. The `Display` form is the
/// dot-separated taxonomy used by stylesheets, e.g. `load.overload.first`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    /// Table header cell background.
    TimelineArea,
    /// Line under a header cell.
    TimelineBorderBottom,
    /// Even data row background.
    Row,
    /// Odd data row background.
    OddRow,
    /// Line under a data row.
    RowBorder,
    HeaderText,
    CellText,
    Load { level: LoadLevel, caps: SegmentCaps },
    DayOff,
    /// Percentage label on a load segment.
    LoadText,
    /// Line under a resource's row band.
    ResourceSeparator,
}

impl Style {
    pub fn load(load: f64, caps: SegmentCaps) -> Self {
        Self::Load {
            level: LoadLevel::of(load),
            caps,
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimelineArea => f.write_str("timeline.area"),
            Self::TimelineBorderBottom => f.write_str("timeline.borderBottom"),
            Self::Row => f.write_str("row"),
            Self::OddRow => f.write_str("odd-row"),
            Self::RowBorder => f.write_str("table.row.border"),
            Self::HeaderText => f.write_str("table.header.text"),
            Self::CellText => f.write_str("table.cell.text"),
            Self::Load { level, caps } => {
                write!(f, "load.{}", level.as_str())?;
                if caps.first {
                    f.write_str(".first")?;
                }
                if caps.last {
                    f.write_str(".last")?;
                }
                Ok(())
            }
            Self::DayOff => f.write_str("dayoff"),
            Self::LoadText => f.write_str("text.resource.load"),
            Self::ResourceSeparator => f.write_str("resource.separator"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown style tag `{0}`")]
pub struct UnknownStyle(pub String);

impl FromStr for Style {
    type Err = UnknownStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fixed = match s {
            "timeline.area" => Some(Self::TimelineArea),
            "timeline.borderBottom" => Some(Self::TimelineBorderBottom),
            "row" => Some(Self::Row),
            "odd-row" => Some(Self::OddRow),
            "table.row.border" => Some(Self::RowBorder),
            "table.header.text" => Some(Self::HeaderText),
            "table.cell.text" => Some(Self::CellText),
            "dayoff" => Some(Self::DayOff),
            "text.resource.load" => Some(Self::LoadText),
            "resource.separator" => Some(Self::ResourceSeparator),
            _ => None,
        };
        if let Some(style) = fixed {
            return Ok(style);
        }

        let unknown = || UnknownStyle(s.to_string());
        let mut parts = s.split('.');
        if parts.next() != Some("load") {
            return Err(unknown());
        }
        let level = match parts.next() {
            Some("underload") => LoadLevel::Underload,
            Some("normal") => LoadLevel::Normal,
            Some("overload") => LoadLevel::Overload,
            _ => return Err(unknown()),
        };
        let mut caps = SegmentCaps::default();
        for modifier in parts {
            match modifier {
                "first" if !caps.first && !caps.last => caps.first = true,
                "last" if !caps.last => caps.last = true,
                _ => return Err(unknown()),
            }
        }
        Ok(Self::Load { level, caps })
    }
}

// Serialized as the taxonomy string so stylesheets and dumps share one form.
impl Serialize for Style {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Style {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_level_thresholds() {
        assert_eq!(LoadLevel::of(50.0), LoadLevel::Underload);
        assert_eq!(LoadLevel::of(100.0), LoadLevel::Normal);
        assert_eq!(LoadLevel::of(100.5), LoadLevel::Overload);
    }

    #[test]
    fn load_tags_carry_caps() {
        let s = Style::load(150.0, SegmentCaps { first: true, last: false });
        assert_eq!(s.to_string(), "load.overload.first");
        assert_eq!(Style::load(20.0, SegmentCaps::BOTH).to_string(), "load.underload.first.last");
        assert_eq!(Style::load(100.0, SegmentCaps::default()).to_string(), "load.normal");
    }

    #[test]
    fn parses_every_displayed_tag() {
        let styles = [
            Style::TimelineArea,
            Style::TimelineBorderBottom,
            Style::Row,
            Style::OddRow,
            Style::RowBorder,
            Style::HeaderText,
            Style::CellText,
            Style::DayOff,
            Style::LoadText,
            Style::ResourceSeparator,
            Style::load(10.0, SegmentCaps { first: false, last: true }),
            Style::load(200.0, SegmentCaps::BOTH),
        ];
        for style in styles {
            assert_eq!(style.to_string().parse::<Style>(), Ok(style));
        }
    }

    #[test]
    fn rejects_malformed_tags() {
        assert!("load".parse::<Style>().is_err());
        assert!("load.heavy".parse::<Style>().is_err());
        assert!("load.normal.last.first".parse::<Style>().is_err());
        assert!("timeline".parse::<Style>().is_err());
    }

    #[test]
    fn unknown_tag_error_names_the_tag() {
        let err = "load.heavy".parse::<Style>().err();
        assert_eq!(err, Some(UnknownStyle("load.heavy".to_owned())));
        assert_eq!(
            err.map(|e| e.to_string()),
            Some("unknown style tag `load.heavy`".to_owned())
        );
        let as_error: &dyn std::error::Error = &UnknownStyle(String::new());
        assert!(as_error.source().is_none());
    }

    #[test]
    fn serializes_as_tag_string() {
        let json = serde_json::to_string(&Style::OddRow).unwrap_or_default();
        assert_eq!(json, "\"odd-row\"");
    }
}
