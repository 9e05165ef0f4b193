use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::error::{Error, Result};

/// Stable identifier of a note within one session
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(Arc<str>);

impl NoteId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, IntoStaticStr, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FlickDirection {
    Up,
    Down,
    Left,
    Right,
}

impl FlickDirection {
    pub const ALL: [FlickDirection; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    pub fn arrow(&self) -> &'static str {
        match self {
            Self::Up => "↑",
            Self::Down => "↓",
            Self::Left => "←",
            Self::Right => "→",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NoteKind {
    #[default]
    Normal,
    Long {
        duration_secs: f64,
    },
    Flick {
        direction: FlickDirection,
    },
}

impl NoteKind {
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Long { .. } => "long",
            Self::Flick { .. } => "flick",
        }
    }
}

/// A single note of a chart. Immutable once generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    /// Seconds from song start to the judgement instant
    pub time: f64,
    pub lane: u8,
    #[serde(flatten)]
    pub kind: NoteKind,
}

impl Note {
    pub fn normal(id: impl AsRef<str>, time: f64, lane: u8) -> Self {
        Self {
            id: NoteId::new(id),
            time,
            lane,
            kind: NoteKind::Normal,
        }
    }

    pub fn long(id: impl AsRef<str>, time: f64, lane: u8, duration_secs: f64) -> Self {
        Self {
            id: NoteId::new(id),
            time,
            lane,
            kind: NoteKind::Long { duration_secs },
        }
    }

    pub fn flick(id: impl AsRef<str>, time: f64, lane: u8, direction: FlickDirection) -> Self {
        Self {
            id: NoteId::new(id),
            time,
            lane,
            kind: NoteKind::Flick { direction },
        }
    }

    /// Judgement instant in milliseconds
    pub fn time_ms(&self) -> f64 {
        self.time * 1000.0
    }

    /// Instant a long note should be released; the judgement instant otherwise
    pub fn end_time_ms(&self) -> f64 {
        match self.kind {
            NoteKind::Long { duration_secs } => (self.time + duration_secs) * 1000.0,
            _ => self.time_ms(),
        }
    }

    pub fn is_long(&self) -> bool {
        matches!(self.kind, NoteKind::Long { .. })
    }

    pub fn validate(&self, lane_count: u8) -> Result<()> {
        if !self.time.is_finite() || self.time < 0.0 {
            return Err(Error::InvalidInput(format!(
                "note {} has invalid time {}",
                self.id, self.time
            )));
        }
        if self.lane >= lane_count {
            return Err(Error::InvalidInput(format!(
                "note {} uses lane {} but only {} lanes exist",
                self.id, self.lane, lane_count
            )));
        }
        if let NoteKind::Long { duration_secs } = self.kind
            && (!duration_secs.is_finite() || duration_secs <= 0.0)
        {
            return Err(Error::InvalidInput(format!(
                "long note {} has non-positive duration {}",
                self.id, duration_secs
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_time() {
        assert_eq!(Note::normal("a", 1.5, 0).end_time_ms(), 1500.0);
        assert_eq!(Note::long("b", 2.0, 1, 0.5).end_time_ms(), 2500.0);
    }

    #[test]
    fn test_validate_rejects_bad_notes() {
        assert!(Note::normal("a", -0.1, 0).validate(4).is_err());
        assert!(Note::normal("a", f64::NAN, 0).validate(4).is_err());
        assert!(Note::normal("a", 1.0, 4).validate(4).is_err());
        assert!(Note::long("a", 1.0, 0, 0.0).validate(4).is_err());
        assert!(Note::normal("a", 0.0, 3).validate(4).is_ok());
    }

    #[test]
    fn test_note_json_shape() {
        let note = Note::flick("note_3", 8.0, 2, FlickDirection::Left);
        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["id"], "note_3");
        assert_eq!(json["type"], "flick");
        assert_eq!(json["direction"], "left");

        let back: Note = serde_json::from_value(json).unwrap();
        assert_eq!(back, note);
    }
}
