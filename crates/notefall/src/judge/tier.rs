use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

use crate::chart::NoteId;

/// Accuracy tier of a judgement
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, IntoStaticStr, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Tier {
    Perfect,
    Good,
    Normal,
    Miss,
}

impl Tier {
    /// Strictness rank: Perfect 3, Good 2, Normal 1, Miss 0
    pub fn rank(&self) -> u8 {
        match self {
            Self::Perfect => 3,
            Self::Good => 2,
            Self::Normal => 1,
            Self::Miss => 0,
        }
    }

    pub fn is_miss(&self) -> bool {
        matches!(self, Self::Miss)
    }

    pub fn short_name(&self) -> &'static str {
        self.into()
    }
}

/// Whether an input landed before or after its target
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, IntoStaticStr, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "UPPERCASE")]
pub enum TimingBias {
    Fast,
    Late,
    OnTime,
}

/// Result of judging one note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgementOutcome {
    pub note_id: NoteId,
    pub tier: Tier,
    pub timing_bias: TimingBias,
}

impl JudgementOutcome {
    pub fn new(note_id: NoteId, tier: Tier, timing_bias: TimingBias) -> Self {
        Self {
            note_id,
            tier,
            timing_bias,
        }
    }

    /// Outcome of a note that was never hit in time
    pub fn missed(note_id: NoteId) -> Self {
        Self::new(note_id, Tier::Miss, TimingBias::Late)
    }
}
