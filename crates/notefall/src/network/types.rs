use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chart::Difficulty;
use crate::error::{Error, Result};
use crate::score::SessionResult;
use crate::storage::{PendingScore, validate_username};

pub const DEFAULT_LIMIT: u32 = 100;
pub const MAX_LIMIT: u32 = 100;
pub const SONG_ID_MAX_CHARS: usize = 50;

/// Check a ranking limit, defaulting to 100
pub fn resolve_limit(limit: Option<u32>) -> Result<u32> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT);
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(Error::InvalidInput(format!(
            "limit must be between 1 and {}, got {}",
            MAX_LIMIT, limit
        )));
    }
    Ok(limit)
}

pub fn validate_song_id(song_id: &str) -> Result<()> {
    let chars = song_id.chars().count();
    if chars == 0 || chars > SONG_ID_MAX_CHARS {
        return Err(Error::InvalidInput(format!(
            "song id must be 1 to {} characters, got {}",
            SONG_ID_MAX_CHARS, chars
        )));
    }
    Ok(())
}

/// Payload of `submitScore`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub username: String,
    pub score: u32,
    pub song_id: String,
    pub difficulty: Difficulty,
    pub perfect: u32,
    pub good: u32,
    pub miss: u32,
    pub max_combo: u32,
}

impl ScoreSubmission {
    pub fn from_result(result: &SessionResult, username: &str) -> Self {
        Self {
            username: username.to_string(),
            score: result.score,
            song_id: result.song_id.clone(),
            difficulty: result.difficulty,
            perfect: result.perfect,
            good: result.good,
            miss: result.miss,
            max_combo: result.max_combo,
        }
    }

    /// Queued scores from older clients may lack a song id
    pub fn from_pending(pending: &PendingScore, fallback_song_id: &str) -> Self {
        Self {
            username: pending.username.clone(),
            score: pending.score,
            song_id: pending
                .song_id
                .clone()
                .unwrap_or_else(|| fallback_song_id.to_string()),
            difficulty: pending.difficulty,
            perfect: pending.perfect,
            good: pending.good,
            miss: pending.miss,
            max_combo: pending.max_combo,
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_username(&self.username)?;
        validate_song_id(&self.song_id)
    }
}

/// One leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedScore {
    pub id: u64,
    pub username: String,
    pub score: u32,
    pub song_id: String,
    pub difficulty: Difficulty,
    pub perfect: u32,
    pub good: u32,
    pub miss: u32,
    pub max_combo: u32,
    pub created_at: DateTime<Utc>,
}

/// Rankings of every difficulty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllRankings {
    pub easy: Vec<RankedScore>,
    pub normal: Vec<RankedScore>,
    pub hard: Vec<RankedScore>,
}

impl AllRankings {
    pub fn get(&self, difficulty: Difficulty) -> &[RankedScore] {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Normal => &self.normal,
            Difficulty::Hard => &self.hard,
        }
    }
}

/// Best score of a chart, ever and since the start of this month
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopScores {
    pub all_time: Option<RankedScore>,
    pub this_month: Option<RankedScore>,
}

/// Remote ranking service
pub trait Leaderboard {
    fn submit_score(&mut self, submission: &ScoreSubmission) -> Result<()>;

    fn by_difficulty(&self, difficulty: Difficulty, limit: Option<u32>) -> Result<Vec<RankedScore>>;

    fn all(&self, limit: Option<u32>) -> Result<AllRankings>;

    fn by_song(
        &self,
        song_id: &str,
        difficulty: Option<Difficulty>,
        limit: Option<u32>,
    ) -> Result<Vec<RankedScore>>;

    fn top_scores_by_song(&self, song_id: &str, difficulty: Difficulty) -> Result<TopScores>;
}
