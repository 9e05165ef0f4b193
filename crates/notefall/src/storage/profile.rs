use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::KeyValueStore;
use crate::chart::Difficulty;
use crate::config::{DEFAULT_NOTE_SPEED, clamp_note_speed};
use crate::error::{Error, Result};
use crate::score::SessionResult;

pub const HIGH_SCORES_KEY: &str = "@rhythm_game_high_scores";
pub const USERNAME_KEY: &str = "@rhythm_game_username";
pub const PENDING_SCORES_KEY: &str = "@rhythm_game_pending_scores";
pub const NOTE_SPEED_KEY: &str = "@rhythm_game_note_speed";

pub const USERNAME_MAX_CHARS: usize = 50;

/// Best score per difficulty
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighScores {
    pub easy: u32,
    pub normal: u32,
    pub hard: u32,
}

impl HighScores {
    pub fn get(&self, difficulty: Difficulty) -> u32 {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Normal => self.normal,
            Difficulty::Hard => self.hard,
        }
    }

    fn slot(&mut self, difficulty: Difficulty) -> &mut u32 {
        match difficulty {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Normal => &mut self.normal,
            Difficulty::Hard => &mut self.hard,
        }
    }
}

/// A result waiting to be submitted to the leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingScore {
    pub score: u32,
    pub perfect: u32,
    pub good: u32,
    pub miss: u32,
    pub max_combo: u32,
    pub difficulty: Difficulty,
    pub username: String,
    /// Milliseconds since the Unix epoch; unique within a queue
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub song_id: Option<String>,
}

impl PendingScore {
    pub fn from_result(result: &SessionResult, username: &str, timestamp: i64) -> Self {
        Self {
            score: result.score,
            perfect: result.perfect,
            good: result.good,
            miss: result.miss,
            max_combo: result.max_combo,
            difficulty: result.difficulty,
            username: username.to_string(),
            timestamp,
            song_id: Some(result.song_id.clone()),
        }
    }
}

/// Validate a display name: 1..=50 characters after trimming
pub fn validate_username(name: &str) -> Result<String> {
    let trimmed = name.trim();
    let chars = trimmed.chars().count();
    if chars == 0 || chars > USERNAME_MAX_CHARS {
        return Err(Error::InvalidInput(format!(
            "username must be 1 to {} characters, got {}",
            USERNAME_MAX_CHARS, chars
        )));
    }
    Ok(trimmed.to_string())
}

/// Player preferences and scores, cached in memory over a key-value store.
///
/// Storage failures never surface from setters: they are logged and the
/// in-memory value stays authoritative for the rest of the process.
pub struct Profile {
    store: Box<dyn KeyValueStore>,
    username: Option<String>,
    note_speed: f64,
    high_scores: HighScores,
    pending: Vec<PendingScore>,
}

impl Profile {
    /// Load every key from the store. Unreadable values keep their defaults.
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let mut profile = Self::with_defaults(store);

        profile.username = profile.read_key::<String>(USERNAME_KEY, true);
        if let Some(speed) = profile.read_key::<f64>(NOTE_SPEED_KEY, false) {
            profile.note_speed = clamp_note_speed(speed);
        }
        if let Some(scores) = profile.read_key(HIGH_SCORES_KEY, false) {
            profile.high_scores = scores;
        }
        if let Some(pending) = profile.read_key(PENDING_SCORES_KEY, false) {
            profile.pending = pending;
        }

        debug!(
            "Loaded profile (user: {:?}, speed: {}, pending: {})",
            profile.username,
            profile.note_speed,
            profile.pending.len()
        );
        profile
    }

    /// A profile that ignores whatever the store already holds
    pub fn with_defaults(store: Box<dyn KeyValueStore>) -> Self {
        Self {
            store,
            username: None,
            note_speed: DEFAULT_NOTE_SPEED,
            high_scores: HighScores::default(),
            pending: Vec::new(),
        }
    }

    /// Read one key. Plain strings are stored raw, everything else as JSON.
    fn read_key<T: DeserializeOwned>(&self, key: &str, raw_string: bool) -> Option<T> {
        let value = match self.store.get(key) {
            Ok(Some(value)) => value,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read {}: {}", key, e);
                return None;
            }
        };
        let parsed = if raw_string {
            serde_json::from_value(serde_json::Value::String(value))
        } else {
            serde_json::from_str(&value)
        };
        match parsed {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("Ignoring malformed value for {}: {}", key, e);
                None
            }
        }
    }

    fn persist(&mut self, key: &str, value: &str) -> bool {
        match self.store.set(key, value) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to persist {}: {}", key, e);
                false
            }
        }
    }

    fn persist_json<T: Serialize>(&mut self, key: &str, value: &T) -> bool {
        match serde_json::to_string(value) {
            Ok(json) => self.persist(key, &json),
            Err(e) => {
                warn!("Failed to encode {}: {}", key, e);
                false
            }
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn set_username(&mut self, name: &str) -> Result<()> {
        let name = validate_username(name)?;
        self.persist(USERNAME_KEY, &name);
        info!("Username set to {}", name);
        self.username = Some(name);
        Ok(())
    }

    pub fn note_speed(&self) -> f64 {
        self.note_speed
    }

    /// Store a note speed, clamped into range. Returns the stored value.
    pub fn set_note_speed(&mut self, speed: f64) -> f64 {
        let speed = clamp_note_speed(speed);
        self.note_speed = speed;
        self.persist(NOTE_SPEED_KEY, &speed.to_string());
        speed
    }

    pub fn high_scores(&self) -> HighScores {
        self.high_scores
    }

    pub fn high_score(&self, difficulty: Difficulty) -> u32 {
        self.high_scores.get(difficulty)
    }

    /// Record a score if it beats the stored best for the difficulty.
    ///
    /// Returns true when the score is a new record.
    pub fn save_high_score(&mut self, difficulty: Difficulty, score: u32) -> bool {
        let slot = self.high_scores.slot(difficulty);
        if score <= *slot {
            return false;
        }
        *slot = score;
        let scores = self.high_scores;
        self.persist_json(HIGH_SCORES_KEY, &scores);
        info!("New high score on {}: {}", difficulty.expand_name(), score);
        true
    }

    pub fn pending_scores(&self) -> &[PendingScore] {
        &self.pending
    }

    /// Queue a result for later submission under the current username
    pub fn add_pending_score(&mut self, result: &SessionResult) -> Result<PendingScore> {
        let username = self.username.clone().ok_or(Error::MissingUsername)?;

        let mut timestamp = Utc::now().timestamp_millis();
        if let Some(last) = self.pending.iter().map(|p| p.timestamp).max()
            && timestamp <= last
        {
            timestamp = last + 1;
        }

        let pending = PendingScore::from_result(result, &username, timestamp);
        self.pending.push(pending.clone());
        let queue = self.pending.clone();
        self.persist_json(PENDING_SCORES_KEY, &queue);
        info!("Queued score {} for later submission", pending.score);
        Ok(pending)
    }

    /// Remove a queued score. Returns false if no entry had that timestamp.
    pub fn remove_pending_score(&mut self, timestamp: i64) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.timestamp != timestamp);
        if self.pending.len() == before {
            return false;
        }
        let queue = self.pending.clone();
        self.persist_json(PENDING_SCORES_KEY, &queue);
        true
    }
}

impl std::fmt::Debug for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Profile")
            .field("username", &self.username)
            .field("note_speed", &self.note_speed)
            .field("high_scores", &self.high_scores)
            .field("pending", &self.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::ScoreState;
    use crate::storage::MemoryStore;

    fn result(score: u32) -> SessionResult {
        let state = ScoreState {
            score,
            perfect_count: 3,
            ..ScoreState::default()
        };
        SessionResult::from_state(&state, "zuizui_rock", Difficulty::Normal)
    }

    #[test]
    fn test_load_reads_stored_values() {
        let mut store = MemoryStore::new();
        store.set(USERNAME_KEY, "alice").unwrap();
        store.set(NOTE_SPEED_KEY, "3.5").unwrap();
        store
            .set(HIGH_SCORES_KEY, r#"{"easy":10,"normal":20,"hard":30}"#)
            .unwrap();

        let profile = Profile::load(Box::new(store));
        assert_eq!(profile.username(), Some("alice"));
        assert_eq!(profile.note_speed(), 2.0);
        assert_eq!(profile.high_score(Difficulty::Hard), 30);
        assert!(profile.pending_scores().is_empty());
    }

    #[test]
    fn test_load_survives_unavailable_store() {
        let mut store = MemoryStore::new();
        store.set_available(false);
        let mut profile = Profile::load(Box::new(store));
        assert_eq!(profile.username(), None);
        assert_eq!(profile.note_speed(), 1.0);

        assert!(profile.save_high_score(Difficulty::Easy, 500));
        assert_eq!(profile.high_score(Difficulty::Easy), 500);
    }

    #[test]
    fn test_load_ignores_malformed_values() {
        let mut store = MemoryStore::new();
        store.set(HIGH_SCORES_KEY, "not json").unwrap();
        store.set(NOTE_SPEED_KEY, "fast").unwrap();
        let profile = Profile::load(Box::new(store));
        assert_eq!(profile.high_scores(), HighScores::default());
        assert_eq!(profile.note_speed(), 1.0);
    }

    #[test]
    fn test_save_high_score_only_when_greater() {
        let mut profile = Profile::load(Box::new(MemoryStore::new()));
        assert!(profile.save_high_score(Difficulty::Normal, 1000));
        assert!(!profile.save_high_score(Difficulty::Normal, 1000));
        assert!(!profile.save_high_score(Difficulty::Normal, 900));
        assert!(profile.save_high_score(Difficulty::Normal, 1001));
        assert_eq!(profile.high_score(Difficulty::Normal), 1001);
        assert_eq!(profile.high_score(Difficulty::Easy), 0);
    }

    #[test]
    fn test_set_username_validates() {
        let mut profile = Profile::load(Box::new(MemoryStore::new()));
        assert!(profile.set_username("   ").is_err());
        assert!(profile.set_username(&"x".repeat(51)).is_err());
        profile.set_username("  bob ").unwrap();
        assert_eq!(profile.username(), Some("bob"));
    }

    #[test]
    fn test_pending_queue() {
        let mut profile = Profile::load(Box::new(MemoryStore::new()));
        assert!(matches!(
            profile.add_pending_score(&result(100)),
            Err(Error::MissingUsername)
        ));

        profile.set_username("carol").unwrap();
        let first = profile.add_pending_score(&result(100)).unwrap();
        let second = profile.add_pending_score(&result(200)).unwrap();
        assert!(second.timestamp > first.timestamp);
        assert_eq!(first.song_id.as_deref(), Some("zuizui_rock"));

        assert!(profile.remove_pending_score(first.timestamp));
        assert!(!profile.remove_pending_score(first.timestamp));
        assert_eq!(profile.pending_scores(), &[second]);
    }

    #[test]
    fn test_pending_scores_use_camel_case_keys() {
        let pending = PendingScore::from_result(&result(100), "dave", 1_700_000_000_000);
        let json = serde_json::to_value(&pending).unwrap();
        assert_eq!(json["maxCombo"], 0);
        assert_eq!(json["songId"], "zuizui_rock");
        assert_eq!(json["difficulty"], "normal");
    }
}
