use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ScoreState;
use crate::chart::Difficulty;

/// Final record of a finished session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    pub timestamp: DateTime<Utc>,
    pub song_id: String,
    pub difficulty: Difficulty,
    pub score: u32,
    pub perfect: u32,
    /// Good and normal judgements merged
    pub good: u32,
    pub miss: u32,
    pub max_combo: u32,
    pub full_combo: bool,
    pub all_perfect: bool,
}

impl SessionResult {
    pub fn from_state(state: &ScoreState, song_id: &str, difficulty: Difficulty) -> Self {
        Self {
            timestamp: Utc::now(),
            song_id: song_id.to_string(),
            difficulty,
            score: state.score,
            perfect: state.perfect_count,
            good: state.good_count + state.normal_count,
            miss: state.miss_count,
            max_combo: state.max_combo,
            full_combo: state.is_full_combo(),
            all_perfect: state.is_all_perfect(),
        }
    }

    /// Label shown on the result screen
    pub fn clear_label(&self) -> &'static str {
        if self.all_perfect {
            "ALL PERFECT"
        } else if self.full_combo {
            "FULL COMBO"
        } else {
            "CLEAR"
        }
    }
}
