use serde::{Deserialize, Serialize};

use crate::chart::FlickDirection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Press,
    Release,
}

/// A lane input queued for the next tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputEvent {
    pub kind: InputKind,
    pub lane: u8,
    /// Swipe direction, if the input was a flick gesture
    pub direction: Option<FlickDirection>,
}

impl InputEvent {
    pub fn press(lane: u8) -> Self {
        Self {
            kind: InputKind::Press,
            lane,
            direction: None,
        }
    }

    pub fn release(lane: u8) -> Self {
        Self {
            kind: InputKind::Release,
            lane,
            direction: None,
        }
    }

    pub fn flick(lane: u8, direction: FlickDirection) -> Self {
        Self {
            kind: InputKind::Press,
            lane,
            direction: Some(direction),
        }
    }
}
